// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can stop a render.  All of the configuration
//! variants are raised while the renderer is being assembled, so a
//! render that has started will always produce a complete image.

use failure::Fail;

/// The ways a render can fail.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum RenderError {
    /// The iteration cap must be at least one.
    #[fail(display = "The iteration bound must be greater than zero.")]
    InvalidIterationBound,

    /// The escape radius must be strictly greater than one, otherwise
    /// the smoothing correction `log(log(|z|))` has no domain.
    #[fail(
        display = "The escape radius must be greater than 1, got {}.",
        radius
    )]
    InvalidEscapeRadius {
        /// The radius that was supplied.
        radius: f64,
    },

    /// The pixel grid was empty, or the window onto the complex plane
    /// had no width.
    #[fail(
        display = "Invalid viewport: {}x{} pixels over a plane width of {}.",
        width, height, plane_width
    )]
    InvalidViewportGeometry {
        /// Width of the pixel grid.
        width: usize,
        /// Height of the pixel grid.
        height: usize,
        /// Width of the window on the real axis.
        plane_width: f64,
    },

    /// A gradient needs at least two anchors and at least one entry.
    #[fail(
        display = "Invalid palette: {} anchor colours and a table of {} entries.",
        anchors, table_size
    )]
    InvalidPaletteSpec {
        /// Number of anchor colours supplied.
        anchors: usize,
        /// Requested size of the lookup table.
        table_size: usize,
    },

    /// One of the threads of a threaded render died.
    #[fail(display = "A render thread panicked.")]
    WorkerPanicked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let e = RenderError::InvalidEscapeRadius { radius: 0.5 };
        assert_eq!(
            format!("{}", e),
            "The escape radius must be greater than 1, got 0.5."
        );

        let e = RenderError::InvalidPaletteSpec {
            anchors: 1,
            table_size: 16,
        };
        assert!(format!("{}", e).contains("1 anchor colours"));
    }
}
