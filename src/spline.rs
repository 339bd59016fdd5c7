// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! One-dimensional interpolants over equally spaced knots on [0, 1].
//!
//! Both kinds are stored the same way: the knot values and the second
//! derivative at every knot.  A straight line between knots is just a
//! cubic whose second derivatives are all zero.

/// A curve through `values[i]` at `i / (values.len() - 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelCurve {
    values: Vec<f64>,
    second: Vec<f64>,
}

impl ChannelCurve {
    /// Piecewise linear.  Requires at least two values.
    pub fn linear(values: &[f64]) -> Self {
        debug_assert!(values.len() >= 2);
        ChannelCurve {
            values: values.to_vec(),
            second: vec![0.0; values.len()],
        }
    }

    /// A not-a-knot cubic spline: twice continuously differentiable,
    /// and with a continuous third derivative across the second and
    /// second-to-last knots.  Three values give the parabola through
    /// them, two give the line.
    pub fn cubic(values: &[f64]) -> Self {
        debug_assert!(values.len() >= 2);
        let k = values.len();
        let h = 1.0 / (k - 1) as f64;
        let second = match k {
            2 => vec![0.0; 2],
            3 => {
                let d = (values[0] - 2.0 * values[1] + values[2]) / (h * h);
                vec![d; 3]
            }
            _ => not_a_knot(values, h),
        };
        ChannelCurve {
            values: values.to_vec(),
            second,
        }
    }

    /// Evaluate at `t`, which is clamped into [0, 1].
    pub fn at(&self, t: f64) -> f64 {
        let segments = self.values.len() - 1;
        let h = 1.0 / segments as f64;
        let t = num::clamp(t, 0.0, 1.0);
        let i = ((t * segments as f64) as usize).min(segments - 1);

        let (x0, x1) = (i as f64 * h, (i + 1) as f64 * h);
        let (a, b) = (x1 - t, t - x0);
        let (m0, m1) = (self.second[i], self.second[i + 1]);
        let (y0, y1) = (self.values[i], self.values[i + 1]);

        m0 * a * a * a / (6.0 * h)
            + m1 * b * b * b / (6.0 * h)
            + (y0 - m0 * h * h / 6.0) * a / h
            + (y1 - m1 * h * h / 6.0) * b / h
    }
}

// Second derivatives of the spline through four or more values.  The
// interior rows are the usual continuity conditions; the first and
// last rows say the third derivative doesn't jump at knots 1 and k-2.
fn not_a_knot(values: &[f64], h: f64) -> Vec<f64> {
    let k = values.len();
    let mut rows = vec![vec![0.0; k + 1]; k];

    rows[0][0] = 1.0;
    rows[0][1] = -2.0;
    rows[0][2] = 1.0;
    for i in 1..k - 1 {
        rows[i][i - 1] = 1.0;
        rows[i][i] = 4.0;
        rows[i][i + 1] = 1.0;
        rows[i][k] = 6.0 * (values[i - 1] - 2.0 * values[i] + values[i + 1]) / (h * h);
    }
    rows[k - 1][k - 3] = 1.0;
    rows[k - 1][k - 2] = -2.0;
    rows[k - 1][k - 1] = 1.0;

    solve(rows)
}

// Gaussian elimination with partial pivoting on an augmented matrix.
// The systems here are tiny and always non-singular.
fn solve(mut rows: Vec<Vec<f64>>) -> Vec<f64> {
    let n = rows.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&a, &b| {
                rows[a][col]
                    .abs()
                    .partial_cmp(&rows[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        rows.swap(col, pivot);
        let top = rows[col].clone();
        for row in rows.iter_mut().skip(col + 1) {
            let factor = row[col] / top[col];
            if factor == 0.0 {
                continue;
            }
            for j in col..=n {
                row[j] -= factor * top[j];
            }
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|j| rows[row][j] * x[j]).sum();
        x[row] = (rows[row][n] - tail) / rows[row][row];
    }
    x
}
