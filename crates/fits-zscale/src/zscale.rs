//! ZScale display interval estimation.
//!
//! A uniform subsample of the pixels is sorted and fitted with a straight
//! line (value against rank). Outliers are removed by iterative k-sigma
//! clipping of the fit residuals, and the clipped slope, scaled by the
//! contrast factor, is extended around the median to give the interval.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::Result;
use crate::stats::{linear_regression, median_of_sorted, std_dev, LinearFit, Point};

/// Tuning parameters for [`zscale_interval`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScaleOptions {
    /// Maximum number of pixels sampled from the image.
    pub sample_size: usize,
    /// Divides the fitted slope; smaller values widen the interval.
    pub contrast_factor: f64,
    /// Fraction of the sample that may be rejected before giving up on the fit.
    pub max_rejection_fraction: f64,
    /// Residuals beyond this many standard deviations are rejected.
    pub k_sigma_clipping_rejection: f64,
    /// Maximum number of clipping passes.
    pub iterations: usize,
}

impl Default for ZScaleOptions {
    fn default() -> Self {
        ZScaleOptions {
            sample_size: 1000,
            contrast_factor: 0.25,
            max_rejection_fraction: 0.2,
            k_sigma_clipping_rejection: 2.5,
            iterations: 3,
        }
    }
}

impl ZScaleOptions {
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_contrast_factor(mut self, contrast_factor: f64) -> Self {
        self.contrast_factor = contrast_factor;
        self
    }

    pub fn with_max_rejection_fraction(mut self, fraction: f64) -> Self {
        self.max_rejection_fraction = fraction;
        self
    }

    pub fn with_k_sigma(mut self, k: f64) -> Self {
        self.k_sigma_clipping_rejection = k;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }
}

/// Display range `[low, high]` chosen for an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastInterval {
    pub low: f64,
    pub high: f64,
}

impl ContrastInterval {
    /// The interval returned for an image without samples.
    pub const EMPTY: ContrastInterval = ContrastInterval {
        low: f64::NAN,
        high: f64::NAN,
    };

    /// `high - low`.
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Returns `true` if both bounds are NaN.
    pub fn is_empty(&self) -> bool {
        self.low.is_nan() && self.high.is_nan()
    }
}

/// Outcome of one clipping pass.
struct ClipPass {
    fit: LinearFit,
    accepted: Vec<bool>,
    count: usize,
}

/// Fit the accepted points, then re-mark every point against the residual
/// threshold. The input mask is left untouched.
fn clip_pass(points: &[Point], accepted: &[bool], k_sigma: f64) -> Result<ClipPass> {
    let good: Vec<Point> = points
        .iter()
        .zip(accepted)
        .filter(|(_, &ok)| ok)
        .map(|(p, _)| *p)
        .collect();
    let fit = linear_regression(&good)?;

    let residuals: Vec<f64> = points.iter().map(|p| p.y - fit.at(p.x)).collect();
    let good_residuals: Vec<f64> = residuals
        .iter()
        .zip(accepted)
        .filter(|(_, &ok)| ok)
        .map(|(r, _)| *r)
        .collect();
    let threshold = k_sigma * std_dev(&good_residuals);

    // NaN residuals compare false and are rejected.
    let accepted: Vec<bool> = residuals
        .iter()
        .map(|&r| libm::fabs(r) <= threshold)
        .collect();
    let count = accepted.iter().filter(|&&ok| ok).count();

    Ok(ClipPass {
        fit,
        accepted,
        count,
    })
}

/// Take every `stride`-th sample, drop non-finite values, and sort.
fn sorted_sample(samples: &[f64], sample_size: usize) -> Vec<f64> {
    let total = samples.len();
    let effective = sample_size.clamp(1, total);
    let stride = (total / effective).max(1);

    let mut sample: Vec<f64> = (0..effective)
        .filter_map(|i| samples.get(i * stride).copied())
        .filter(|v| v.is_finite())
        .collect();
    sample.sort_by(f64::total_cmp);
    sample
}

/// Compute the ZScale display interval of `samples`.
///
/// Never fails: an empty input gives NaN bounds, and whenever too few points
/// survive clipping the sample minimum and maximum are returned.
pub fn zscale_interval(samples: &[f64], options: &ZScaleOptions) -> ContrastInterval {
    match samples {
        [] => return ContrastInterval::EMPTY,
        [only] => {
            return ContrastInterval {
                low: *only,
                high: *only,
            }
        }
        _ => {}
    }

    let sorted = sorted_sample(samples, options.sample_size);
    let n = sorted.len();
    if n == 0 {
        return ContrastInterval::EMPTY;
    }
    let min_value = sorted[0];
    let max_value = sorted[n - 1];
    let fallback = ContrastInterval {
        low: min_value,
        high: max_value,
    };

    let points: Vec<Point> = sorted
        .iter()
        .enumerate()
        .map(|(x, &y)| Point { x: x as f64, y })
        .collect();

    let minimum_good =
        (libm::floor(n as f64 * options.max_rejection_fraction) as usize).max(5);

    let mut accepted = vec![true; n];
    let mut count = n;
    let mut fit: Option<LinearFit> = None;

    if count >= minimum_good {
        for _ in 0..options.iterations {
            let pass = match clip_pass(&points, &accepted, options.k_sigma_clipping_rejection) {
                Ok(pass) => pass,
                Err(e) => {
                    log::warn!("stopping sigma clipping: {e}");
                    break;
                }
            };
            let previous = count;
            fit = Some(pass.fit);
            accepted = pass.accepted;
            count = pass.count;
            if count >= previous || count < minimum_good {
                break;
            }
        }
    }

    let fit = match fit {
        Some(fit) if count >= minimum_good => fit,
        _ => return fallback,
    };

    // Values are sorted, so any negative slope is rounding noise.
    let mut slope = fit.m.max(0.0);
    if options.contrast_factor > 0.0 {
        slope /= options.contrast_factor;
    }

    let median = median_of_sorted(&sorted);
    let median_rank = ((n - 1) / 2) as f64;

    let low = min_value.max(median - (median_rank - 1.0) * slope);
    let high = max_value.min(median + (n as f64 - median_rank) * slope);

    log::debug!("zscale over {n} samples ({count} kept): [{low}, {high}]");
    ContrastInterval { low, high }
}
