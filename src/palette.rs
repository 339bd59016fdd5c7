// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colour gradients.  A handful of anchor colours are spread evenly
//! along [0, 1], each channel gets its own interpolant through them,
//! and the result is sampled once into a fixed lookup table.  The
//! renderer only ever reads from the table.

use log::debug;
use std::fmt;
use std::str::FromStr;

use crate::error::RenderError;
use crate::spline::ChannelCurve;

/// A colour with each channel in [0, 1].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorRGB {
    /// Red
    pub r: f64,
    /// Green
    pub g: f64,
    /// Blue
    pub b: f64,
}

impl ColorRGB {
    /// Build a colour from its three channels.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        ColorRGB { r, g, b }
    }

    /// Convert from hue (in degrees, any value, taken modulo 360),
    /// saturation and brightness (both clamped to [0, 1]).
    pub fn from_hsb(hue_degrees: f64, saturation: f64, brightness: f64) -> Self {
        let s = num::clamp(saturation, 0.0, 1.0);
        let v = num::clamp(brightness, 0.0, 1.0);
        let h = hue_degrees.rem_euclid(360.0) / 60.0;

        let chroma = v * s;
        let x = chroma * (1.0 - ((h % 2.0) - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = v - chroma;
        ColorRGB::new(r + m, g + m, b + m)
    }

    /// The 8-bit form of the colour.  Each channel is clamped and then
    /// scaled by 255 and floored, so only an exact 1.0 becomes 255.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let denormalize = |c: f64| (num::clamp(c, 0.0, 1.0) * 255.0).floor() as u8;
        [denormalize(self.r), denormalize(self.g), denormalize(self.b)]
    }

    fn clamped(self) -> Self {
        ColorRGB::new(
            num::clamp(self.r, 0.0, 1.0),
            num::clamp(self.g, 0.0, 1.0),
            num::clamp(self.b, 0.0, 1.0),
        )
    }
}

/// How the channels are interpolated between anchors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interpolation {
    /// Straight lines between neighbouring anchors.
    Linear,
    /// A smooth cubic spline through every anchor.  It may overshoot
    /// between anchors; the overshoot is clamped away.
    Cubic,
}

impl FromStr for Interpolation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Interpolation::Linear),
            "cubic" => Ok(Interpolation::Cubic),
            _ => Err(format!("Unknown interpolation '{}'", s)),
        }
    }
}

/// Named anchor sets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Black through navy and blue to maroon, grey, and back to black.
    Classic,
    /// Black to white.
    Grayscale,
    /// A sweep around the colour wheel from red to magenta.
    Spectrum,
}

impl Preset {
    /// All of the presets, for help text.
    pub const ALL: [Preset; 3] = [Preset::Classic, Preset::Grayscale, Preset::Spectrum];

    /// The anchor colours of the preset.
    pub fn anchors(self) -> Vec<ColorRGB> {
        match self {
            Preset::Classic => vec![
                ColorRGB::new(0.0, 0.0, 0.0),
                ColorRGB::new(0.0, 0.0, 0.5),
                ColorRGB::new(0.0, 0.0, 1.0),
                ColorRGB::new(0.5, 0.0, 0.0),
                ColorRGB::new(0.5, 0.5, 0.5),
                ColorRGB::new(0.0, 0.0, 0.0),
            ],
            Preset::Grayscale => vec![ColorRGB::new(0.0, 0.0, 0.0), ColorRGB::new(1.0, 1.0, 1.0)],
            Preset::Spectrum => (0..6)
                .map(|i| ColorRGB::from_hsb(f64::from(i) * 60.0, 1.0, 1.0))
                .collect(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Preset::Classic => "classic",
            Preset::Grayscale => "grayscale",
            Preset::Spectrum => "spectrum",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase();
        Preset::ALL
            .iter()
            .find(|p| p.to_string() == wanted)
            .cloned()
            .ok_or_else(|| format!("Unknown palette '{}'", s))
    }
}

/// A fixed table of colours sampled from a gradient.  Immutable once
/// built, so it can be shared freely between render threads.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientPalette {
    table: Vec<ColorRGB>,
}

impl GradientPalette {
    /// Spread the anchors evenly along [0, 1], interpolate each
    /// channel, and sample `table_size` evenly spaced points including
    /// both ends.  Every sampled channel is clamped into [0, 1].
    pub fn build(
        anchors: &[ColorRGB],
        interpolation: Interpolation,
        table_size: usize,
    ) -> Result<Self, RenderError> {
        if anchors.len() < 2 || table_size == 0 {
            return Err(RenderError::InvalidPaletteSpec {
                anchors: anchors.len(),
                table_size,
            });
        }

        let curve = |channel: fn(&ColorRGB) -> f64| {
            let values: Vec<f64> = anchors.iter().map(channel).collect();
            match interpolation {
                Interpolation::Linear => ChannelCurve::linear(&values),
                Interpolation::Cubic => ChannelCurve::cubic(&values),
            }
        };
        let (red, green, blue) = (curve(|c| c.r), curve(|c| c.g), curve(|c| c.b));

        let last = if table_size > 1 { (table_size - 1) as f64 } else { 1.0 };
        let table = (0..table_size)
            .map(|i| {
                let t = i as f64 / last;
                ColorRGB::new(red.at(t), green.at(t), blue.at(t)).clamped()
            })
            .collect();

        debug!(
            "palette: {} anchors, {:?}, {} entries",
            anchors.len(),
            interpolation,
            table_size
        );
        Ok(GradientPalette { table })
    }

    /// The colour at `index`.  The caller keeps the index in range.
    pub fn sample(&self, index: usize) -> ColorRGB {
        self.table[index]
    }

    /// The number of entries in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Describes whether the table has any colours at all.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The whole table.
    pub fn colors(&self) -> &[ColorRGB] {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: ColorRGB = ColorRGB::new(0.0, 0.0, 0.0);
    const WHITE: ColorRGB = ColorRGB::new(1.0, 1.0, 1.0);

    fn close(a: ColorRGB, b: ColorRGB) -> bool {
        (a.r - b.r).abs() < 1e-6 && (a.g - b.g).abs() < 1e-6 && (a.b - b.b).abs() < 1e-6
    }

    #[test]
    fn black_to_white_in_three_steps() {
        let p = GradientPalette::build(&[BLACK, WHITE], Interpolation::Linear, 3).unwrap();
        assert_eq!(p.len(), 3);
        assert!(close(p.sample(0), BLACK));
        assert!(close(p.sample(1), ColorRGB::new(0.5, 0.5, 0.5)));
        assert!(close(p.sample(2), WHITE));
    }

    #[test]
    fn single_entry_table_is_the_first_anchor() {
        let p = GradientPalette::build(&[WHITE, BLACK], Interpolation::Cubic, 1).unwrap();
        assert_eq!(p.colors(), &[WHITE]);
    }

    #[test]
    fn bad_specs_are_rejected() {
        assert_eq!(
            GradientPalette::build(&[BLACK], Interpolation::Linear, 8),
            Err(RenderError::InvalidPaletteSpec {
                anchors: 1,
                table_size: 8
            })
        );
        assert_eq!(
            GradientPalette::build(&[BLACK, WHITE], Interpolation::Linear, 0),
            Err(RenderError::InvalidPaletteSpec {
                anchors: 2,
                table_size: 0
            })
        );
    }

    #[test]
    fn cubic_overshoot_is_clamped() {
        let anchors = [BLACK, BLACK, WHITE, WHITE, BLACK];
        let p = GradientPalette::build(&anchors, Interpolation::Cubic, 101).unwrap();
        for c in p.colors() {
            for ch in &[c.r, c.g, c.b] {
                assert!(*ch >= 0.0 && *ch <= 1.0);
            }
        }
        assert!(p.colors().iter().any(|c| c.r == 1.0));
    }

    #[test]
    fn classic_palette_ends_black() {
        let p = GradientPalette::build(&Preset::Classic.anchors(), Interpolation::Cubic, 256)
            .unwrap();
        assert!(close(p.sample(0), BLACK));
        assert!(close(p.sample(255), BLACK));
        assert!(close(p.sample(102), ColorRGB::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn denormalize_floors() {
        assert_eq!(ColorRGB::new(0.5, 1.0, 0.0).to_rgb8(), [127, 255, 0]);
        assert_eq!(ColorRGB::new(0.999, 1.5, -0.2).to_rgb8(), [254, 255, 0]);
    }

    #[test]
    fn hsb_primaries() {
        assert!(close(ColorRGB::from_hsb(0.0, 1.0, 1.0), ColorRGB::new(1.0, 0.0, 0.0)));
        assert!(close(ColorRGB::from_hsb(120.0, 1.0, 1.0), ColorRGB::new(0.0, 1.0, 0.0)));
        assert!(close(ColorRGB::from_hsb(240.0, 1.0, 1.0), ColorRGB::new(0.0, 0.0, 1.0)));
        assert!(close(ColorRGB::from_hsb(-120.0, 1.0, 1.0), ColorRGB::new(0.0, 0.0, 1.0)));
        assert!(close(ColorRGB::from_hsb(420.0, 1.0, 0.5), ColorRGB::new(0.5, 0.5, 0.0)));
        assert!(close(ColorRGB::from_hsb(75.0, 0.0, 0.25), ColorRGB::new(0.25, 0.25, 0.25)));
    }

    #[test]
    fn names_parse() {
        assert_eq!("Classic".parse::<Preset>(), Ok(Preset::Classic));
        assert_eq!("spectrum".parse::<Preset>(), Ok(Preset::Spectrum));
        assert!("mauve".parse::<Preset>().is_err());
        assert_eq!("CUBIC".parse::<Interpolation>(), Ok(Interpolation::Cubic));
        assert!("bezier".parse::<Interpolation>().is_err());
    }
}
