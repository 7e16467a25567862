//! Statistical Features Computation
//!
//! Moments follow the convention the classifier's training features were produced
//! with: population standard deviation, and the bias-corrected sample skewness (G1)
//! and excess kurtosis (G2). Changing either convention silently shifts every
//! normalized feature the classifier sees.

use crate::FeatureError;
use serde::{Deserialize, Serialize};

/// Moment sums (and the kurtosis numerator / denominator) below this magnitude are
/// floating-point residue and count as zero
const MOMENT_EPSILON: f64 = 1e-14;

/// Statistical features of a flux series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalFeatures {
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Median (mean of the two middle values for even lengths)
    pub median: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Bias-corrected sample skewness; `NaN` below 3 samples, 0 for a constant series
    pub skewness: f64,
    /// Bias-corrected sample excess kurtosis; `NaN` below 4 samples, 0 for a constant series
    pub kurtosis: f64,
}

impl StatisticalFeatures {
    /// Compute statistical features from a non-empty slice of values
    pub fn compute(values: &[f64]) -> Result<Self, FeatureError> {
        if values.is_empty() {
            return Err(FeatureError::EmptySample);
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let min = nan_propagating_extreme(values, f64::min);
        let max = nan_propagating_extreme(values, f64::max);

        // Central moment sums
        let mut m2 = 0.0;
        let mut m3 = 0.0;
        let mut m4 = 0.0;

        for &v in values {
            let d = v - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }

        let std_dev = (m2 / n).sqrt();
        let skewness = sample_skewness(n, zero_out_residue(m2), zero_out_residue(m3));
        let kurtosis = sample_excess_kurtosis(n, m2, m4);

        Ok(Self {
            mean,
            std_dev,
            median: median(values),
            min,
            max,
            skewness,
            kurtosis,
        })
    }
}

/// "Dip" statistics of `mean - flux`: transits show up as positive values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DipFeatures {
    /// Deepest dip below the mean
    pub max: f64,
    /// Mean of the differences (zero up to rounding)
    pub mean: f64,
    /// Population standard deviation of the differences
    pub std_dev: f64,
}

impl DipFeatures {
    /// Compute dip statistics relative to a precomputed flux mean
    pub fn compute(values: &[f64], flux_mean: f64) -> Result<Self, FeatureError> {
        if values.is_empty() {
            return Err(FeatureError::EmptySample);
        }

        let n = values.len() as f64;
        let diffs: Vec<f64> = values.iter().map(|&v| flux_mean - v).collect();

        let max = nan_propagating_extreme(&diffs, f64::max);
        let mean = diffs.iter().sum::<f64>() / n;
        let variance = diffs.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / n;

        Ok(Self {
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

fn zero_out_residue(sum: f64) -> f64 {
    if sum.abs() < MOMENT_EPSILON {
        0.0
    } else {
        sum
    }
}

/// Fold with `pick`, except that any `NaN` in the input makes the result `NaN`
fn nan_propagating_extreme(values: &[f64], pick: fn(f64, f64) -> f64) -> f64 {
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return f64::NAN;
    };
    iter.fold(first, |acc, v| if acc.is_nan() || v.is_nan() { f64::NAN } else { pick(acc, v) })
}

fn median(values: &[f64]) -> f64 {
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// G1 = n·√(n−1)/(n−2) · m3 / m2^1.5, with m2, m3 as central moment sums
fn sample_skewness(n: f64, m2: f64, m3: f64) -> f64 {
    if n < 3.0 {
        return f64::NAN;
    }
    if m2 == 0.0 {
        return 0.0;
    }
    (n * (n - 1.0).sqrt() / (n - 2.0)) * (m3 / m2.powf(1.5))
}

/// G2 = n(n+1)(n−1)·m4 / ((n−2)(n−3)·m2²) − 3(n−1)² / ((n−2)(n−3))
///
/// The residue cutoff applies to the whole numerator and denominator, not to `m4`
/// alone: `m4` of a ppm-scatter series is far below the cutoff while the ratio is not.
fn sample_excess_kurtosis(n: f64, m2: f64, m4: f64) -> f64 {
    if n < 4.0 {
        return f64::NAN;
    }
    let denominator = zero_out_residue((n - 2.0) * (n - 3.0) * m2 * m2);
    if denominator == 0.0 {
        return 0.0;
    }
    let numerator = zero_out_residue(n * (n + 1.0) * (n - 1.0) * m4);
    let adjustment = 3.0 * (n - 1.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0));
    numerator / denominator - adjustment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_moments() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = StatisticalFeatures::compute(&values).unwrap();
        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
    }

    #[test]
    fn test_symmetric_series_has_zero_skew() {
        let stats = StatisticalFeatures::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(stats.skewness.abs() < 1e-12);
    }

    #[test]
    fn test_uniform_series_kurtosis() {
        // Bias-corrected excess kurtosis of 1..=5 is -1.2
        let stats = StatisticalFeatures::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((stats.kurtosis + 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_right_skewed_series() {
        // Sample skewness of [1, 2, 3, 10] is 1.763632614803888
        let stats = StatisticalFeatures::compute(&[1.0, 2.0, 3.0, 10.0]).unwrap();
        assert!((stats.skewness - 1.763_632_614_803_888).abs() < 1e-9);
        assert!(stats.kurtosis > 0.0);
    }

    #[test]
    fn test_even_length_median() {
        let stats = StatisticalFeatures::compute(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn test_constant_series() {
        let stats = StatisticalFeatures::compute(&[0.1; 6]).unwrap();
        assert!((stats.mean - 0.1).abs() < 1e-12);
        assert!(stats.std_dev < 1e-12);
        assert_eq!(stats.skewness, 0.0);
        assert_eq!(stats.kurtosis, 0.0);
    }

    #[test]
    fn test_near_constant_series_kurtosis_is_zero() {
        // Denominator (n-2)(n-3)·m2² = 6e-18 falls under the residue cutoff
        let stats = StatisticalFeatures::compute(&[1.0, 1.00001, 1.00002, 1.00003, 1.00004]).unwrap();
        assert_eq!(stats.kurtosis, 0.0);
    }

    #[test]
    fn test_low_scatter_series_keeps_true_kurtosis() {
        // ppm-level scatter: m4 ~ 1e-15 on its own, yet the ratio is well defined.
        // A uniform grid has excess kurtosis close to -1.2.
        let values: Vec<f64> = (0..1000).map(|i| 1.0 + 1e-4 * (i as f64 / 999.0 - 0.5)).collect();
        let stats = StatisticalFeatures::compute(&values).unwrap();
        assert!((stats.kurtosis + 1.2).abs() < 0.01, "kurtosis = {}", stats.kurtosis);
    }

    #[test]
    fn test_nan_propagates_to_order_statistics() {
        let stats = StatisticalFeatures::compute(&[1.0, f64::NAN, 0.5, 2.0]).unwrap();
        assert!(stats.mean.is_nan());
        assert!(stats.median.is_nan());
        assert!(stats.min.is_nan());
        assert!(stats.max.is_nan());

        let dips = DipFeatures::compute(&[1.0, f64::NAN, 0.5], 1.0).unwrap();
        assert!(dips.max.is_nan());
    }

    #[test]
    fn test_short_series_shape_undefined() {
        let stats = StatisticalFeatures::compute(&[1.0, 2.0]).unwrap();
        assert!(stats.skewness.is_nan());
        assert!(stats.kurtosis.is_nan());

        let stats = StatisticalFeatures::compute(&[1.0, 2.0, 4.0]).unwrap();
        assert!(!stats.skewness.is_nan());
        assert!(stats.kurtosis.is_nan());
    }

    #[test]
    fn test_empty_values_rejected() {
        assert_eq!(
            StatisticalFeatures::compute(&[]),
            Err(FeatureError::EmptySample)
        );
        assert_eq!(DipFeatures::compute(&[], 0.0), Err(FeatureError::EmptySample));
    }

    #[test]
    fn test_dip_statistics() {
        let values = vec![1.0, 1.0, 0.9, 1.0, 1.1];
        let dips = DipFeatures::compute(&values, 1.0).unwrap();
        assert!((dips.max - 0.1).abs() < 1e-12);
        assert!(dips.mean.abs() < 1e-12);
        let stats = StatisticalFeatures::compute(&values).unwrap();
        assert!((dips.std_dev - stats.std_dev).abs() < 1e-12);
    }
}
