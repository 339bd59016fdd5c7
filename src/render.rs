// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Putting it together: walk the viewport, find the stability of each
//! point, look it up in the palette, and write the colour into an
//! image buffer.

use image::{Rgb, RgbImage};
use log::{debug, info, trace};
use num::Complex;

use crate::error::RenderError;
use crate::escape::{ComplexPoint, EscapeTime};
use crate::palette::{ColorRGB, GradientPalette, Interpolation, Preset};
use crate::viewport::Viewport;

/// What the gradient is built from.
#[derive(Clone, Debug, PartialEq)]
pub struct PaletteSpec {
    /// The colours the gradient passes through, in order.
    pub anchors: Vec<ColorRGB>,
    /// How to get from one anchor to the next.
    pub interpolation: Interpolation,
    /// The number of entries in the lookup table.
    pub table_size: usize,
}

impl PaletteSpec {
    /// A spec using one of the named anchor sets.
    pub fn from_preset(preset: Preset, interpolation: Interpolation, table_size: usize) -> Self {
        PaletteSpec {
            anchors: preset.anchors(),
            interpolation,
            table_size,
        }
    }

    /// Build the lookup table.
    pub fn build(&self) -> Result<GradientPalette, RenderError> {
        GradientPalette::build(&self.anchors, self.interpolation, self.table_size)
    }
}

impl Default for PaletteSpec {
    fn default() -> Self {
        PaletteSpec::from_preset(Preset::Classic, Interpolation::Cubic, 256)
    }
}

/// Everything needed to render one image.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// The point at the center of the image.
    pub center: ComplexPoint,
    /// The width of the image along the real axis.
    pub plane_width: f64,
    /// The iteration cap.
    pub max_iterations: u32,
    /// The escape bound on `|z|`.
    pub escape_radius: f64,
    /// Use the continuous iteration count.
    pub smooth: bool,
    /// The gradient.
    pub palette: PaletteSpec,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 1920,
            height: 1080,
            center: Complex::new(-0.7435, 0.1314),
            plane_width: 0.01,
            max_iterations: 512,
            escape_radius: 1000.0,
            smooth: true,
            palette: PaletteSpec::default(),
        }
    }
}

/// Map a stability in [0, 1] onto the palette.  A stability of
/// exactly 1 would land one past the end, so it is pulled back onto
/// the last entry; the modulus catches anything else out of range.
pub fn palette_index(stability: f64, table_size: usize) -> usize {
    let raw = (stability * table_size as f64).floor().max(0.0) as usize;
    raw.min(table_size - 1) % table_size
}

/// A validated, ready-to-run render.  Built once per image and
/// shared read-only by every thread working on it.
#[derive(Clone, Debug)]
pub struct Renderer {
    viewport: Viewport,
    escape: EscapeTime,
    palette: GradientPalette,
    smooth: bool,
}

impl Renderer {
    /// Validate the whole configuration up front, so that nothing can
    /// go wrong once pixels start being written.
    pub fn new(config: &RenderConfig) -> Result<Self, RenderError> {
        let escape = EscapeTime::new(config.max_iterations, config.escape_radius)?;
        let viewport = Viewport::new(
            config.width,
            config.height,
            config.center,
            config.plane_width,
        )?;
        let palette = config.palette.build()?;
        Ok(Renderer::from_parts(viewport, escape, palette, config.smooth))
    }

    /// Assemble a renderer from parts that are already built.
    pub fn from_parts(
        viewport: Viewport,
        escape: EscapeTime,
        palette: GradientPalette,
        smooth: bool,
    ) -> Self {
        Renderer {
            viewport,
            escape,
            palette,
            smooth,
        }
    }

    /// The window being rendered.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The lookup table.
    pub fn palette(&self) -> &GradientPalette {
        &self.palette
    }

    /// The palette index for a single point.
    pub fn index_of(&self, c: ComplexPoint) -> usize {
        palette_index(self.escape.stability(c, self.smooth), self.palette.len())
    }

    /// The colour of a single point.
    pub fn color_of(&self, c: ComplexPoint) -> Rgb<u8> {
        Rgb(self.palette.sample(self.index_of(c)).to_rgb8())
    }

    /// Render the image on the calling thread, in row-major order.
    pub fn render_single(&self) -> RgbImage {
        let (width, height) = (self.viewport.width(), self.viewport.height());
        info!("rendering {}x{} on one thread", width, height);
        let mut image = RgbImage::new(width as u32, height as u32);
        for (pixel, point) in self.viewport.pixels() {
            image.put_pixel(pixel.col as u32, pixel.row as u32, self.color_of(point));
            if pixel.col + 1 == width {
                trace!("row {} of {} done", pixel.row + 1, height);
            }
        }
        info!("render complete");
        image
    }

    /// Render the image on `threads` threads.  The image is cut into
    /// bands of whole rows, one band per thread, so no two threads
    /// ever write to the same pixel.  The result is identical to
    /// `render_single`.
    pub fn render(&self, threads: usize) -> Result<RgbImage, RenderError> {
        let (width, height) = (self.viewport.width(), self.viewport.height());
        let threads = threads.max(1).min(height);
        let band = (height + threads - 1) / threads;
        info!(
            "rendering {}x{} on {} threads, {} rows each",
            width, height, threads, band
        );

        let mut image = RgbImage::new(width as u32, height as u32);
        {
            let bands: Vec<&mut [u8]> = image.chunks_mut(band * width * 3).collect();
            let total = bands.len();
            crossbeam::scope(|spawner| {
                for (i, pixels) in bands.into_iter().enumerate() {
                    spawner.spawn(move |_| {
                        let first = i * band;
                        for (pixel, point) in self.viewport.rows(first, band) {
                            let offset = ((pixel.row - first) * width + pixel.col) * 3;
                            pixels[offset..offset + 3].copy_from_slice(&self.color_of(point).0);
                        }
                        debug!(
                            "band {} of {} done: rows {} to {}",
                            i + 1,
                            total,
                            first,
                            (first + band).min(height) - 1
                        );
                    });
                }
            })
            .map_err(|_| RenderError::WorkerPanicked)?;
        }
        info!("render complete");
        Ok(image)
    }
}

/// The one entry point most callers need: validate the configuration
/// and render it on `threads` threads.
pub fn render_image(config: &RenderConfig, threads: usize) -> Result<RgbImage, RenderError> {
    let renderer = Renderer::new(config)?;
    if threads <= 1 {
        Ok(renderer.render_single())
    } else {
        renderer.render(threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 12,
            height: 9,
            center: Complex::new(-0.5, 0.0),
            plane_width: 3.0,
            max_iterations: 40,
            escape_radius: 2.0,
            smooth: true,
            palette: PaletteSpec::from_preset(Preset::Spectrum, Interpolation::Cubic, 32),
        }
    }

    #[test]
    fn palette_index_pins_the_top_edge() {
        assert_eq!(palette_index(1.0, 16), 15);
        assert_eq!(palette_index(0.0, 16), 0);
        assert_eq!(palette_index(0.5, 16), 8);
        assert_eq!(palette_index(0.999, 16), 15);
        assert_eq!(palette_index(1.0, 1), 0);
    }

    #[test]
    fn configuration_errors_surface_before_rendering() {
        let mut config = small_config();
        config.max_iterations = 0;
        assert_eq!(
            Renderer::new(&config).err(),
            Some(RenderError::InvalidIterationBound)
        );

        let mut config = small_config();
        config.escape_radius = 1.0;
        assert!(render_image(&config, 1).is_err());

        let mut config = small_config();
        config.height = 0;
        match Renderer::new(&config) {
            Err(RenderError::InvalidViewportGeometry { height: 0, .. }) => (),
            other => panic!("unexpected {:?}", other),
        }

        let mut config = small_config();
        config.palette.table_size = 0;
        match Renderer::new(&config) {
            Err(RenderError::InvalidPaletteSpec { table_size: 0, .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn image_has_the_configured_size() {
        let image = render_image(&small_config(), 1).unwrap();
        assert_eq!(image.dimensions(), (12, 9));
    }

    #[test]
    fn threaded_render_matches_single() {
        let renderer = Renderer::new(&small_config()).unwrap();
        let single = renderer.render_single();
        for threads in &[1, 2, 4, 7, 64] {
            let threaded = renderer.render(*threads).unwrap();
            assert_eq!(&*single, &*threaded, "{} threads", threads);
        }
    }

    #[test]
    fn default_config_is_valid() {
        let mut config = RenderConfig::default();
        config.width = 16;
        config.height = 9;
        assert!(Renderer::new(&config).is_ok());
    }
}
