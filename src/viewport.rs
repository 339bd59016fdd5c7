// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport struct, which describes a relationship
//! between a grid of pixels with its origin at the top left, and a
//! window onto the complex plane described by its center and its
//! width along the real axis.
use itertools::iproduct;
use log::debug;
use num::Complex;

use crate::error::RenderError;
use crate::escape::ComplexPoint;

/// The row and column of a pixel.  Row 0 is the top of the image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pixel {
    /// Counted downward from the top edge.
    pub row: usize,
    /// Counted rightward from the left edge.
    pub col: usize,
}

/// Maps pixels on the integral grid to points on the complex plane.
/// The same scale is used along both axes, so the height of the
/// window on the complex plane follows from the shape of the grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    width: usize,
    height: usize,
    center: ComplexPoint,
    plane_width: f64,
    plane_height: f64,
    // The size of one pixel on the complex plane.
    scale: f64,
}

impl Viewport {
    /// Constructor.  Takes the size of the pixel grid, the point at
    /// the center of the image, and the width of the image along the
    /// real axis.
    pub fn new(
        width: usize,
        height: usize,
        center: ComplexPoint,
        plane_width: f64,
    ) -> Result<Viewport, RenderError> {
        if width < 1 || height < 1 || !(plane_width > 0.0) || !plane_width.is_finite() {
            return Err(RenderError::InvalidViewportGeometry {
                width,
                height,
                plane_width,
            });
        }

        let scale = plane_width / (width as f64);
        let plane_height = plane_width * (height as f64) / (width as f64);
        debug!(
            "viewport: {}x{} centered on {} spanning {} x {}",
            width, height, center, plane_width, plane_height
        );

        Ok(Viewport {
            width,
            height,
            center,
            plane_width,
            plane_height,
            scale,
        })
    }

    /// Width of the pixel grid.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the pixel grid.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The distance between neighbouring pixels on the complex plane.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The height of the window along the imaginary axis.
    pub fn plane_height(&self) -> f64 {
        self.plane_height
    }

    /// The total number of pixels in the grid.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Describes whether the grid has any pixels at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Given a pixel, return the point under the middle of it.  The
    /// imaginary axis points up while rows count down, hence the
    /// subtraction.
    pub fn pixel_to_point(&self, pixel: Pixel) -> ComplexPoint {
        Complex::new(
            self.center.re - self.plane_width / 2.0 + (pixel.col as f64 + 0.5) * self.scale,
            self.center.im + self.plane_height / 2.0 - (pixel.row as f64 + 0.5) * self.scale,
        )
    }

    /// Every pixel with its point, top row first and left to right
    /// along each row.  Calling it again starts over.
    pub fn pixels<'a>(&'a self) -> impl Iterator<Item = (Pixel, ComplexPoint)> + 'a {
        iproduct!(0..self.height, 0..self.width).map(move |(row, col)| {
            let pixel = Pixel { row, col };
            (pixel, self.pixel_to_point(pixel))
        })
    }

    /// The pixels of a band of rows, in the same order as `pixels`.
    pub fn rows<'a>(
        &'a self,
        first: usize,
        count: usize,
    ) -> impl Iterator<Item = (Pixel, ComplexPoint)> + 'a {
        let last = (first + count).min(self.height);
        iproduct!(first..last, 0..self.width).map(move |(row, col)| {
            let pixel = Pixel { row, col };
            (pixel, self.pixel_to_point(pixel))
        })
    }
}
