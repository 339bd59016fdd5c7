// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time algorithm.  Take a point `c` on the complex plane,
//! start at zero and repeatedly square and add `c`.  Points in the
//! Mandelbrot set never leave a small disc around the origin; points
//! outside it fly off to infinity, and how quickly they do so is what
//! we paint.

use log::debug;
use num::Complex;

use crate::error::RenderError;

/// A single coordinate on the complex plane.
pub type ComplexPoint = Complex<f64>;

/// What happened when we iterated a point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IterationResult {
    /// The number of times `z = z * z + c` was applied.  Equal to the
    /// cap if the orbit never escaped.
    pub count: u32,
    /// `|z|` at the moment iteration stopped.
    pub magnitude: f64,
}

/// The iteration cap and escape bound.  Once built these are known
/// good, so `stability` never has to worry about its inputs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeTime {
    max_iterations: u32,
    escape_radius: f64,
}

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// True if the point lies inside the main cardioid or the period-2
/// bulb.  Such points never escape, and their orbits stay within
/// `|z| <= 2`.
pub fn in_cardioid_or_bulb(point: ComplexPoint) -> bool {
    let y = point.im * point.im;
    let q = y + (point.re - D4) * (point.re - D4);
    q * (q + point.re - D4) < y * D4 || (point.re + 1.0) * (point.re + 1.0) + y < D16
}

impl EscapeTime {
    /// Requires at least one iteration and an escape radius greater
    /// than one.
    pub fn new(max_iterations: u32, escape_radius: f64) -> Result<Self, RenderError> {
        if max_iterations == 0 {
            return Err(RenderError::InvalidIterationBound);
        }
        // Written so that NaN is rejected as well.
        if !(escape_radius > 1.0) {
            return Err(RenderError::InvalidEscapeRadius {
                radius: escape_radius,
            });
        }
        debug!(
            "escape time: {} iterations, radius {}",
            max_iterations, escape_radius
        );
        Ok(EscapeTime {
            max_iterations,
            escape_radius,
        })
    }

    /// Iterate the orbit of `c` until it escapes or we hit the cap.
    pub fn iterate(&self, c: ComplexPoint) -> IterationResult {
        // Past about 1.3e154 the squared radius is infinite, and only
        // the unsquared comparison still works.
        let radius_sqr = self.escape_radius * self.escape_radius;
        let squared = radius_sqr.is_finite();
        let mut z = Complex::new(0.0_f64, 0.0_f64);
        let mut count = 0;
        while count < self.max_iterations {
            z = z * z + c;
            count += 1;
            let escaped = if squared {
                z.norm_sqr() > radius_sqr
            } else {
                z.norm() > self.escape_radius
            };
            // A NaN orbit can only come from a non-finite c; call it escaped.
            if escaped || z.re.is_nan() || z.im.is_nan() {
                break;
            }
        }
        IterationResult {
            count,
            magnitude: z.norm(),
        }
    }

    /// Turn an iteration result into a value in [0, 1], where 1 means
    /// the point never escaped.
    ///
    /// In smooth mode the integer count is replaced by the continuous
    /// count `n + 1 - log2(ln |z|)`, which interpolates inside the step
    /// where the orbit escaped and removes banding.  Because the
    /// escape test guarantees `|z| > escape_radius > 1`, the double
    /// logarithm is always defined; should that ever not hold we fall
    /// back to the integer count.
    pub fn normalize(&self, result: IterationResult, smooth: bool) -> f64 {
        if result.count >= self.max_iterations {
            return 1.0;
        }
        let max = f64::from(self.max_iterations);
        let n = f64::from(result.count);
        if !smooth || !(result.magnitude > 1.0) || result.magnitude.is_infinite() {
            return n / max;
        }
        let smoothed = n + 1.0 - result.magnitude.ln().ln() / 2.0_f64.ln();
        num::clamp(smoothed / max, 0.0, 1.0)
    }

    /// The stability of a single point.
    pub fn stability(&self, c: ComplexPoint, smooth: bool) -> f64 {
        if self.escape_radius >= 2.0 && in_cardioid_or_bulb(c) {
            return 1.0;
        }
        self.normalize(self.iterate(c), smooth)
    }
}

/// One-shot form of [`EscapeTime::stability`] that validates its
/// configuration on every call.
pub fn stability(
    c: ComplexPoint,
    max_iterations: u32,
    escape_radius: f64,
    smooth: bool,
) -> Result<f64, RenderError> {
    Ok(EscapeTime::new(max_iterations, escape_radius)?.stability(c, smooth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_iterations() {
        assert_eq!(
            EscapeTime::new(0, 2.0),
            Err(RenderError::InvalidIterationBound)
        );
    }

    #[test]
    fn rejects_small_escape_radius() {
        for radius in &[1.0, 0.5, -3.0, std::f64::NAN] {
            match EscapeTime::new(10, *radius) {
                Err(RenderError::InvalidEscapeRadius { .. }) => (),
                other => panic!("expected radius error, got {:?}", other),
            }
        }
    }

    #[test]
    fn interior_points_are_stable() {
        let points = [
            Complex::new(0.0, 0.0),
            Complex::new(-0.5, 0.0),
            Complex::new(0.2, 0.3),
            Complex::new(-1.0, 0.0),
            Complex::new(-1.1, 0.1),
        ];
        for max in &[1, 2, 50, 1000] {
            let et = EscapeTime::new(*max, 2.0).unwrap();
            for c in &points {
                assert_eq!(et.stability(*c, false), 1.0, "{} at {}", c, max);
                assert_eq!(et.stability(*c, true), 1.0, "{} at {}", c, max);
            }
        }
    }

    #[test]
    fn interior_points_are_stable_without_the_shortcut() {
        // iterate() never takes the cardioid shortcut.
        let et = EscapeTime::new(500, 1000.0).unwrap();
        let r = et.iterate(Complex::new(-0.5, 0.0));
        assert_eq!(r.count, 500);
        assert_eq!(et.normalize(r, true), 1.0);
    }

    #[test]
    fn far_points_escape_on_the_first_step() {
        let et = EscapeTime::new(64, 2.0).unwrap();
        for c in &[Complex::new(5.0, 0.0), Complex::new(-3.0, 3.0)] {
            let r = et.iterate(*c);
            assert_eq!(r.count, 1);
            assert_eq!(et.stability(*c, false), 1.0 / 64.0);
        }
    }

    #[test]
    fn huge_escape_radius_still_escapes_on_time() {
        let et = EscapeTime::new(50, 1e160).unwrap();
        let r = et.iterate(Complex::new(2.0, 0.0));
        // 2, 6, 38, 1446, ... the tenth step is about 1.8e202.
        assert_eq!(r.count, 10);
        assert!(r.magnitude.is_finite() && r.magnitude > 1e160);
        let s = et.normalize(r, true);
        assert!((s - 0.0428).abs() < 1e-3, "smooth value {}", s);

        let et = EscapeTime::new(50, 1e200).unwrap();
        assert_eq!(et.iterate(Complex::new(1e180, 0.0)).count, 2);
    }

    #[test]
    fn cardioid_check() {
        assert!(in_cardioid_or_bulb(Complex::new(0.0, 0.0)));
        assert!(in_cardioid_or_bulb(Complex::new(-1.0, 0.0)));
        assert!(!in_cardioid_or_bulb(Complex::new(0.5, 0.0)));
        assert!(!in_cardioid_or_bulb(Complex::new(-2.0, 1.0)));
    }

    #[test]
    fn raising_the_cap_never_lowers_the_count() {
        let c = Complex::new(-0.75, 0.1);
        let mut last = 0;
        for max in &[1, 2, 5, 10, 20, 40, 80, 160] {
            let count = EscapeTime::new(*max, 2.0).unwrap().iterate(c).count;
            assert!(count >= last);
            last = count;
        }
        // Once it has escaped, the count stops moving.
        let a = EscapeTime::new(1000, 2.0).unwrap().iterate(c).count;
        let b = EscapeTime::new(5000, 2.0).unwrap().iterate(c).count;
        assert!(a < 1000);
        assert_eq!(a, b);
    }

    #[test]
    fn smooth_values_are_continuous() {
        let et = EscapeTime::new(100, 1000.0).unwrap();
        let c1 = Complex::new(0.5, 0.5);
        let c2 = Complex::new(0.5 + 1e-9, 0.5);
        let (r1, r2) = (et.iterate(c1), et.iterate(c2));
        assert_eq!(r1.count, r2.count);
        let (s1, s2) = (et.stability(c1, true), et.stability(c2, true));
        assert!((s1 - s2).abs() < 1e-6, "{} vs {}", s1, s2);
    }

    #[test]
    fn smooth_values_stay_in_range() {
        let et = EscapeTime::new(20, 2.0).unwrap();
        for c in &[
            Complex::new(100.0, 100.0),
            Complex::new(0.26, 0.0),
            Complex::new(-0.75, 0.2),
        ] {
            let s = et.stability(*c, true);
            assert!(s >= 0.0 && s <= 1.0, "{} gave {}", c, s);
        }
    }

    #[test]
    fn degenerate_magnitude_falls_back_to_the_integer_count() {
        let et = EscapeTime::new(10, 2.0).unwrap();
        let r = IterationResult {
            count: 3,
            magnitude: 1.0,
        };
        assert_eq!(et.normalize(r, true), 0.3);
    }

    #[test]
    fn one_shot_form_validates() {
        assert_eq!(
            stability(Complex::new(0.0, 0.0), 0, 2.0, false),
            Err(RenderError::InvalidIterationBound)
        );
        assert_eq!(stability(Complex::new(0.0, 0.0), 10, 2.0, false), Ok(1.0));
    }
}
