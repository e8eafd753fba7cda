//! Descriptive statistics for batches of model outputs.

use serde::{Deserialize, Serialize};

/// Summary statistics of a sample.
///
/// The standard deviation is the sample (Bessel-corrected) estimate and is
/// zero for a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleStatistics {
    /// Number of observations.
    pub n: usize,
    pub mean: f64,
    pub std: f64,
    /// Coefficient of variation, `std / mean × 100`, in percent.
    ///
    /// Zero when the mean is zero.
    pub cv_pct: f64,
    pub min: f64,
    pub max: f64,
}

impl SampleStatistics {
    /// Computes statistics for the given values.
    ///
    /// Returns `None` for an empty sample.
    ///
    /// # Example
    ///
    /// ```
    /// use focus_cliff::support::stats::SampleStatistics;
    ///
    /// let stats = SampleStatistics::from_values(&[2.0, 4.0, 6.0]).unwrap();
    /// assert_eq!(stats.mean, 4.0);
    /// assert_eq!(stats.std, 2.0);
    /// assert_eq!(stats.cv_pct, 50.0);
    /// ```
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;

        let n = values.len();
        let (min, max, sum) = rest
            .iter()
            .fold((first, first, first), |(min, max, sum), &x| {
                (min.min(x), max.max(x), sum + x)
            });

        #[allow(clippy::cast_precision_loss)]
        let mean = sum / n as f64;

        let std = if n > 1 {
            let sq: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
            #[allow(clippy::cast_precision_loss)]
            let var = sq / (n - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };

        let cv_pct = if mean == 0.0 { 0.0 } else { std / mean * 100.0 };

        Some(Self {
            n,
            mean,
            std,
            cv_pct,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn empty_sample_has_no_statistics() {
        assert!(SampleStatistics::from_values(&[]).is_none());
    }

    #[test]
    fn single_observation() {
        let stats = SampleStatistics::from_values(&[43.0]).unwrap();
        assert_eq!(stats.n, 1);
        assert_relative_eq!(stats.mean, 43.0);
        assert_relative_eq!(stats.std, 0.0);
        assert_relative_eq!(stats.cv_pct, 0.0);
        assert_relative_eq!(stats.min, 43.0);
        assert_relative_eq!(stats.max, 43.0);
    }

    #[test]
    fn bessel_corrected_spread() {
        let values = [10.0, 12.0, 14.0, 16.0];
        let stats = SampleStatistics::from_values(&values).unwrap();

        // Sum of squared deviations is 20, divided by n - 1 = 3.
        let expected_std = (20.0_f64 / 3.0).sqrt();
        assert_relative_eq!(stats.mean, 13.0);
        assert_relative_eq!(stats.std, expected_std, epsilon = 1e-12);
        assert_relative_eq!(stats.cv_pct, expected_std / 13.0 * 100.0, epsilon = 1e-12);
        assert_relative_eq!(stats.min, 10.0);
        assert_relative_eq!(stats.max, 16.0);
    }

    #[test]
    fn zero_mean_reports_zero_cv() {
        let stats = SampleStatistics::from_values(&[-1.0, 1.0]).unwrap();
        assert_relative_eq!(stats.mean, 0.0);
        assert_relative_eq!(stats.cv_pct, 0.0);
    }
}
