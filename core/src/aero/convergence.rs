use crate::math::stats::StatsHelper;
use crate::prelude::{FoilError, FoilResult};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// One panel-count sample of a refinement study.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceSample {
    pub n: usize,
    pub dpan_cl: f64,
    /// `dpan_cl - reference`.
    pub error: f64,
    pub log_n: f64,
    /// Natural log of `|error|`.
    pub log_error: f64,
}

/// Advisory findings that do not invalidate the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConvergenceWarning {
    /// `|error|` grew when the panel count increased to `at_n`.
    NonMonotonic { at_n: usize, previous: f64, current: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    pub reference_cl: f64,
    /// Samples ordered by increasing panel count.
    pub samples: Vec<ConvergenceSample>,
    /// Negative slope of `log|error|` against `log n`.
    pub order: f64,
    pub intercept: f64,
    pub r_value: f64,
    /// RMS distance of `log|error|` from the fitted line.
    pub residual_rms: f64,
    pub warnings: Vec<ConvergenceWarning>,
}

impl ConvergenceReport {
    pub fn is_monotonic(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn errors(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.error).collect()
    }
}

pub struct ConvergenceMetric;

impl ConvergenceMetric {
    /// Fits `log|dpan_cl - reference|` against `log n` by least squares.
    ///
    /// Every error must be non-zero and share one sign; a sign change means the
    /// sequence crossed the reference and no power law describes it.
    pub fn estimate(samples: &[(usize, f64)], reference: f64) -> FoilResult<ConvergenceReport> {
        let mut ordered: Vec<(usize, f64)> = samples.to_vec();
        ordered.sort_by_key(|&(n, _)| n);

        let distinct = ordered.windows(2).filter(|w| w[0].0 != w[1].0).count() + 1;
        if ordered.is_empty() || distinct < 2 {
            return Err(FoilError::Convergence(format!(
                "need at least two distinct panel counts, got {}",
                if ordered.is_empty() { 0 } else { distinct }
            )));
        }

        let mut rows = Vec::with_capacity(ordered.len());
        for &(n, dpan_cl) in &ordered {
            let error = dpan_cl - reference;
            if !error.is_finite() || n == 0 {
                return Err(FoilError::Convergence(format!(
                    "sample n={} has non-finite error",
                    n
                )));
            }
            if error == 0.0 {
                return Err(FoilError::Convergence(format!(
                    "sample n={} matches the reference exactly",
                    n
                )));
            }
            rows.push(ConvergenceSample {
                n,
                dpan_cl,
                error,
                log_n: (n as f64).ln(),
                log_error: error.abs().ln(),
            });
        }

        let positive = rows[0].error > 0.0;
        if let Some(flip) = rows.iter().find(|row| (row.error > 0.0) != positive) {
            return Err(FoilError::Convergence(format!(
                "error changes sign at n={} ({:+.3e})",
                flip.n, flip.error
            )));
        }

        let warnings: Vec<ConvergenceWarning> = rows
            .windows(2)
            .filter(|w| w[1].error.abs() > w[0].error.abs())
            .map(|w| ConvergenceWarning::NonMonotonic {
                at_n: w[1].n,
                previous: w[0].error.abs(),
                current: w[1].error.abs(),
            })
            .collect();
        let logger = LogManager::new();
        for warning in &warnings {
            logger.record_warning(warning);
        }

        let log_n: Vec<f64> = rows.iter().map(|r| r.log_n).collect();
        let log_error: Vec<f64> = rows.iter().map(|r| r.log_error).collect();
        let fit = StatsHelper::linear_regression(&log_n, &log_error).ok_or_else(|| {
            FoilError::Convergence("regression over log n is degenerate".into())
        })?;
        let residuals: Vec<f64> = log_n
            .iter()
            .zip(&log_error)
            .map(|(x, y)| y - (fit.intercept + fit.slope * x))
            .collect();

        Ok(ConvergenceReport {
            reference_cl: reference,
            samples: rows,
            order: -fit.slope,
            intercept: fit.intercept,
            r_value: fit.r_value,
            residual_rms: StatsHelper::rms(&residuals),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn power_law(order: f64, scale: f64) -> Vec<(usize, f64)> {
        [10, 20, 40, 80]
            .iter()
            .map(|&n| (n, 1.0 + scale * (n as f64).powf(-order)))
            .collect()
    }

    #[test]
    fn recovers_order_of_exact_power_law() {
        let report = ConvergenceMetric::estimate(&power_law(2.0, 3.0), 1.0).unwrap();
        assert!((report.order - 2.0).abs() < 1e-9);
        assert!((report.intercept - 3.0_f64.ln()).abs() < 1e-9);
        assert!(report.residual_rms < 1e-9);
        assert!(report.is_monotonic());
    }

    #[test]
    fn negative_errors_of_one_sign_are_accepted() {
        let report = ConvergenceMetric::estimate(&power_law(1.0, -0.5), 1.0).unwrap();
        assert!((report.order - 1.0).abs() < 1e-9);
        assert!(report.errors().iter().all(|e| *e < 0.0));
    }

    #[test]
    fn sign_change_is_rejected() {
        let samples = [(10, 1.1), (20, 0.95), (40, 1.01)];
        assert!(matches!(
            ConvergenceMetric::estimate(&samples, 1.0),
            Err(FoilError::Convergence(_))
        ));
    }

    #[test]
    fn single_panel_count_is_rejected() {
        assert!(ConvergenceMetric::estimate(&[(10, 1.1), (10, 1.2)], 1.0).is_err());
        assert!(ConvergenceMetric::estimate(&[], 1.0).is_err());
    }

    #[test]
    fn growing_error_raises_warning() {
        let samples = [(40, 1.01), (10, 1.2), (20, 1.3)];
        let report = ConvergenceMetric::estimate(&samples, 1.0).unwrap();
        assert_eq!(report.samples[0].n, 10);
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            report.warnings[0],
            ConvergenceWarning::NonMonotonic { at_n: 20, .. }
        ));
    }
}
