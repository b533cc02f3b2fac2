/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient of the samples.
    pub r_value: f64,
}

pub struct StatsHelper;

impl StatsHelper {
    pub fn rms(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f64).sqrt()
    }

    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Least-squares fit of `ys` against `xs`. Returns `None` when fewer than two
    /// samples are given or all `xs` coincide.
    pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }
        let x_mean = Self::mean(xs);
        let y_mean = Self::mean(ys);
        let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
        for (&x, &y) in xs.iter().zip(ys) {
            let dx = x - x_mean;
            let dy = y - y_mean;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }
        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let r_value = if syy == 0.0 {
            1.0
        } else {
            sxy / (sxx * syy).sqrt()
        };
        Some(LinearFit {
            slope,
            intercept: y_mean - slope * x_mean,
            r_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residual_rms_of_a_noisy_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let noise = [0.1, -0.1, -0.1, 0.1];
        let ys: Vec<f64> = xs.iter().zip(noise).map(|(x, e)| x + e).collect();
        let fit = StatsHelper::linear_regression(&xs, &ys).unwrap();
        assert!((fit.slope - 1.0).abs() < 1e-12);
        assert!(fit.intercept.abs() < 1e-12);
        assert!(fit.r_value > 0.99 && fit.r_value < 1.0);

        let residuals: Vec<f64> = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| y - (fit.slope * x + fit.intercept))
            .collect();
        assert!((StatsHelper::rms(&residuals) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn rms_weighs_both_signs() {
        assert!((StatsHelper::rms(&[3.0, -4.0]) - 12.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(StatsHelper::mean(&[3.0, -4.0]), -0.5);
        assert_eq!(StatsHelper::rms(&[]), 0.0);
    }

    #[test]
    fn regression_recovers_exact_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| -2.0 * x + 0.5).collect();
        let fit = StatsHelper::linear_regression(&xs, &ys).unwrap();
        assert!((fit.slope + 2.0).abs() < 1e-12);
        assert!((fit.intercept - 0.5).abs() < 1e-12);
        assert!((fit.r_value + 1.0).abs() < 1e-12);
    }

    #[test]
    fn regression_needs_distinct_abscissae() {
        assert!(StatsHelper::linear_regression(&[1.0, 1.0], &[2.0, 3.0]).is_none());
        assert!(StatsHelper::linear_regression(&[1.0], &[2.0]).is_none());
    }
}
