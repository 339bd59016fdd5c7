#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Smooth-coloured Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring `z` and adding `c`, starting from
//! zero, never runs off to infinity.  Points outside the set do run
//! off, and the number of steps they take before crossing a fixed
//! radius is a measure of how "unstable" they are.  Normalised into
//! [0, 1], that stability is what we map through a colour gradient.
//!
//! Counting whole steps paints the outside of the set in hard bands.
//! Smooth mode replaces the count with a continuous estimate derived
//! from how far past the radius the orbit landed, which blends the
//! bands into one another.
//!
//! The pieces, from the bottom up:
//!
//! - [`escape`]: the iteration and the stability value.
//! - [`viewport`]: pixels to points on the complex plane.
//! - [`palette`]: anchor colours to a fixed lookup table.
//! - [`render`]: all of the above, one pixel at a time.

pub mod error;
pub mod escape;
pub mod palette;
pub mod render;
mod spline;
pub mod viewport;

pub use error::RenderError;
pub use escape::{stability, ComplexPoint, EscapeTime, IterationResult};
pub use palette::{ColorRGB, GradientPalette, Interpolation, Preset};
pub use render::{palette_index, render_image, PaletteSpec, RenderConfig, Renderer};
pub use viewport::{Pixel, Viewport};
