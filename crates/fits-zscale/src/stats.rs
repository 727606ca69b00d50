//! Descriptive statistics used by the ZScale estimator.
//!
//! Floating-point helpers come from `libm` so the module works without `std`.

use alloc::vec::Vec;

use crate::error::{Error, Result};

/// A sample point for linear regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Slope and intercept of a least-squares line `y = m·x + c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Slope.
    pub m: f64,
    /// Intercept.
    pub c: f64,
}

impl LinearFit {
    /// Evaluate the line at `x`.
    #[inline]
    pub fn at(&self, x: f64) -> f64 {
        self.m * x + self.c
    }
}

/// Divisor used by [`variance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Divide by `n - 1` (sample variance).
    Unbiased,
    /// Divide by `n` (population variance).
    #[default]
    Uncorrected,
    /// Divide by `n + 1`.
    Biased,
}

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of `values`, averaging the two middle values for even lengths.
/// NaN for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_of_sorted(&sorted)
}

/// Median of an already sorted slice.
pub(crate) fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Variance of `values` around their mean.
pub fn variance(values: &[f64], normalization: Normalization) -> f64 {
    let n = values.len() as f64;
    let divisor = match normalization {
        Normalization::Unbiased => n - 1.0,
        Normalization::Uncorrected => n,
        Normalization::Biased => n + 1.0,
    };
    let average = mean(values);
    values
        .iter()
        .map(|&v| (v - average) * (v - average))
        .sum::<f64>()
        / divisor
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    libm::sqrt(variance(values, Normalization::Uncorrected))
}

/// Ordinary least-squares fit over `points`.
///
/// Fails with [`Error::RegressionDegenerate`] when there are no points or all
/// x-values are equal.
pub fn linear_regression(points: &[Point]) -> Result<LinearFit> {
    if points.is_empty() {
        return Err(Error::RegressionDegenerate);
    }
    let n = points.len() as f64;
    let (sum_x, sum_y, sum_xy, sum_x2) = points.iter().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sx2), p| (sx + p.x, sy + p.y, sxy + p.x * p.y, sx2 + p.x * p.x),
    );

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return Err(Error::RegressionDegenerate);
    }

    let m = (n * sum_xy - sum_x * sum_y) / denominator;
    let c = (sum_y - m * sum_x) / n;
    Ok(LinearFit { m, c })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ---- mean / median ----

    #[test]
    fn mean_of_values() {
        assert!(close(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5));
        assert!(close(mean(&[-5.0, 5.0]), 0.0));
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[7.0]), 7.0);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn median_does_not_reorder_input() {
        let values = vec![5.0, 1.0, 3.0];
        let _ = median(&values);
        assert_eq!(values, vec![5.0, 1.0, 3.0]);
    }

    // ---- variance ----

    #[test]
    fn variance_normalizations() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(close(variance(&values, Normalization::Uncorrected), 4.0));
        assert!(close(variance(&values, Normalization::Unbiased), 32.0 / 7.0));
        assert!(close(variance(&values, Normalization::Biased), 32.0 / 9.0));
        assert!(close(std_dev(&values), 2.0));
    }

    #[test]
    fn variance_of_constant_is_zero() {
        assert_eq!(variance(&[3.0; 10], Normalization::default()), 0.0);
    }

    // ---- regression ----

    #[test]
    fn regression_on_exact_line() {
        let points: Vec<Point> = (0..10)
            .map(|i| Point {
                x: i as f64,
                y: 2.0 * i as f64 + 1.0,
            })
            .collect();
        let fit = linear_regression(&points).unwrap();
        assert!(close(fit.m, 2.0));
        assert!(close(fit.c, 1.0));
        assert!(close(fit.at(20.0), 41.0));
    }

    #[test]
    fn regression_on_noisy_points() {
        let points = [
            Point { x: 1.0, y: 2.0 },
            Point { x: 2.0, y: 3.0 },
            Point { x: 3.0, y: 5.0 },
            Point { x: 4.0, y: 4.0 },
            Point { x: 5.0, y: 6.0 },
        ];
        let fit = linear_regression(&points).unwrap();
        assert!(close(fit.m, 0.9));
        assert!(close(fit.c, 1.3));
    }

    #[test]
    fn regression_without_points_is_degenerate() {
        assert!(matches!(
            linear_regression(&[]),
            Err(Error::RegressionDegenerate)
        ));
    }

    #[test]
    fn regression_with_constant_x_is_degenerate() {
        let points = [Point { x: 1.0, y: 1.0 }, Point { x: 1.0, y: 5.0 }];
        assert!(matches!(
            linear_regression(&points),
            Err(Error::RegressionDegenerate)
        ));
    }
}
