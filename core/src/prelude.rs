use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest panel count that still yields a closed, two-sided surface.
pub const MIN_PANELS: usize = 4;

/// Largest accepted panel count. The dense solve is cubic in `n`.
pub const MAX_PANELS: usize = 2000;

/// Common error type for every core evaluation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FoilError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("geometry did not converge after {iterations} iterations (residual {residual:.3e})")]
    GeometryConvergence { iterations: usize, residual: f64 },
    #[error("panel system is singular: {0}")]
    SolverSingularity(String),
    #[error("convergence estimate unavailable: {0}")]
    Convergence(String),
}

pub type FoilResult<T> = Result<T, FoilError>;

/// Immutable description of a single aerofoil evaluation.
///
/// `alpha` is in degrees. `eps` is the thickness parameter: thin sections
/// reach a maximum thickness of about `2·eps` of chord, and a finite wedge adds
/// its own lens thickness on top. `beta` is the camber parameter, close to the
/// maximum camber as a fraction of chord. `tau` is the trailing-edge wedge
/// angle in radians and `n` the number of panels around the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct AerofoilConfig {
    alpha: f64,
    eps: f64,
    beta: f64,
    tau: f64,
    n: usize,
}

#[derive(Deserialize)]
struct RawConfig {
    alpha: f64,
    eps: f64,
    beta: f64,
    tau: f64,
    n: usize,
}

impl TryFrom<RawConfig> for AerofoilConfig {
    type Error = FoilError;

    fn try_from(raw: RawConfig) -> FoilResult<Self> {
        AerofoilConfig::new(raw.alpha, raw.eps, raw.beta, raw.tau, raw.n)
    }
}

impl AerofoilConfig {
    pub fn new(alpha: f64, eps: f64, beta: f64, tau: f64, n: usize) -> FoilResult<Self> {
        for (label, value) in [("alpha", alpha), ("eps", eps), ("beta", beta), ("tau", tau)] {
            if !value.is_finite() {
                return Err(FoilError::InvalidParameter(format!(
                    "{} must be finite, got {}",
                    label, value
                )));
            }
        }
        if eps <= 0.0 {
            return Err(FoilError::InvalidParameter(format!(
                "eps must be positive, got {}",
                eps
            )));
        }
        if tau <= 0.0 || tau > 2.0 {
            return Err(FoilError::InvalidParameter(format!(
                "tau must lie in (0, 2], got {}",
                tau
            )));
        }
        if !(MIN_PANELS..=MAX_PANELS).contains(&n) {
            return Err(FoilError::InvalidParameter(format!(
                "n must lie in [{}, {}], got {}",
                MIN_PANELS, MAX_PANELS, n
            )));
        }

        Ok(Self {
            alpha,
            eps,
            beta,
            tau,
            n,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_radians(&self) -> f64 {
        self.alpha.to_radians()
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns a copy with a different panel count.
    pub fn with_panels(&self, n: usize) -> FoilResult<Self> {
        Self::new(self.alpha, self.eps, self.beta, self.tau, n)
    }

    /// Returns a copy with a different incidence (degrees).
    pub fn with_alpha(&self, alpha: f64) -> FoilResult<Self> {
        Self::new(alpha, self.eps, self.beta, self.tau, self.n)
    }

    /// Label identifying the configuration, e.g. `alpha=0,eps=0.06,beta=0.02,tau=0.15,n=150`.
    pub fn name(&self) -> String {
        format!(
            "alpha={},eps={},beta={},tau={},n={}",
            self.alpha, self.eps, self.beta, self.tau, self.n
        )
    }

    /// Name with the given field omitted; used to title a sweep over that field.
    pub fn name_without(&self, field: SweepField) -> String {
        self.name()
            .split(',')
            .filter(|part| !part.starts_with(&format!("{}=", field)))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// The single configuration field varied by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepField {
    Alpha,
    Eps,
    Beta,
    Tau,
    N,
}

impl fmt::Display for SweepField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SweepField::Alpha => "alpha",
            SweepField::Eps => "eps",
            SweepField::Beta => "beta",
            SweepField::Tau => "tau",
            SweepField::N => "n",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for SweepField {
    type Err = FoilError;

    fn from_str(s: &str) -> FoilResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alpha" => Ok(SweepField::Alpha),
            "eps" => Ok(SweepField::Eps),
            "beta" => Ok(SweepField::Beta),
            "tau" => Ok(SweepField::Tau),
            "n" => Ok(SweepField::N),
            other => Err(FoilError::InvalidParameter(format!(
                "unknown sweep field '{}'",
                other
            ))),
        }
    }
}

/// Describes a sweep: exactly one varying field and the values it takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    pub field: SweepField,
    pub values: Vec<f64>,
}

impl SweepSpec {
    pub fn new(field: SweepField, values: Vec<f64>) -> Self {
        Self { field, values }
    }

    /// Expands the sweep around `base`, validating every generated config.
    pub fn configs(&self, base: &AerofoilConfig) -> FoilResult<Vec<AerofoilConfig>> {
        if self.values.is_empty() {
            return Err(FoilError::InvalidParameter(format!(
                "sweep over {} has no values",
                self.field
            )));
        }

        self.values
            .iter()
            .map(|&value| self.apply(base, value))
            .collect()
    }

    pub fn label(&self, value: f64) -> String {
        format!("{}={}", self.field, value)
    }

    fn apply(&self, base: &AerofoilConfig, value: f64) -> FoilResult<AerofoilConfig> {
        let c = base;
        match self.field {
            SweepField::Alpha => AerofoilConfig::new(value, c.eps, c.beta, c.tau, c.n),
            SweepField::Eps => AerofoilConfig::new(c.alpha, value, c.beta, c.tau, c.n),
            SweepField::Beta => AerofoilConfig::new(c.alpha, c.eps, value, c.tau, c.n),
            SweepField::Tau => AerofoilConfig::new(c.alpha, c.eps, c.beta, value, c.n),
            SweepField::N => {
                if value < 0.0 || value.fract() != 0.0 || value > MAX_PANELS as f64 {
                    return Err(FoilError::InvalidParameter(format!(
                        "panel count must be a whole number in [{}, {}], got {}",
                        MIN_PANELS, MAX_PANELS, value
                    )));
                }
                AerofoilConfig::new(c.alpha, c.eps, c.beta, c.tau, value as usize)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AerofoilConfig {
        AerofoilConfig::new(0.0, 0.06, 0.02, 0.15, 150).unwrap()
    }

    #[test]
    fn config_rejects_out_of_range_values() {
        assert!(matches!(
            AerofoilConfig::new(0.0, 0.06, 0.02, 0.15, 2),
            Err(FoilError::InvalidParameter(_))
        ));
        assert!(AerofoilConfig::new(0.0, 0.0, 0.02, 0.15, 10).is_err());
        assert!(AerofoilConfig::new(0.0, 0.06, 0.02, 0.0, 10).is_err());
        assert!(AerofoilConfig::new(0.0, 0.06, 0.02, 2.01, 10).is_err());
        assert!(AerofoilConfig::new(f64::NAN, 0.06, 0.02, 0.15, 10).is_err());
        assert!(AerofoilConfig::new(0.0, 0.06, 0.02, 2.0, 4).is_ok());
    }

    #[test]
    fn config_name_lists_every_field() {
        assert_eq!(base().name(), "alpha=0,eps=0.06,beta=0.02,tau=0.15,n=150");
        assert_eq!(
            base().name_without(SweepField::Eps),
            "alpha=0,beta=0.02,tau=0.15,n=150"
        );
    }

    #[test]
    fn sweep_varies_only_the_named_field() {
        let sweep = SweepSpec::new(SweepField::Beta, vec![0.01, 0.03]);
        let configs = sweep.configs(&base()).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[1].beta(), 0.03);
        assert_eq!(configs[1].eps(), 0.06);
        assert_eq!(configs[1].n(), 150);
        assert_eq!(sweep.label(0.03), "beta=0.03");
    }

    #[test]
    fn sweep_over_panels_requires_whole_numbers() {
        let sweep = SweepSpec::new(SweepField::N, vec![10.0, 20.5]);
        assert!(sweep.configs(&base()).is_err());
        let sweep = SweepSpec::new(SweepField::N, vec![10.0, 20.0]);
        assert_eq!(sweep.configs(&base()).unwrap()[1].n(), 20);
    }

    #[test]
    fn oversized_panel_counts_are_rejected() {
        assert!(AerofoilConfig::new(0.0, 0.06, 0.02, 0.15, MAX_PANELS).is_ok());
        assert!(matches!(
            AerofoilConfig::new(0.0, 0.06, 0.02, 0.15, MAX_PANELS + 1),
            Err(FoilError::InvalidParameter(_))
        ));
        for huge in [1e30, f64::MAX, (MAX_PANELS + 1) as f64] {
            let sweep = SweepSpec::new(SweepField::N, vec![20.0, huge]);
            assert!(matches!(
                sweep.configs(&base()),
                Err(FoilError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn sweep_field_parses_case_insensitively() {
        assert_eq!("EPS".parse::<SweepField>().unwrap(), SweepField::Eps);
        assert!("gamma".parse::<SweepField>().is_err());
    }
}
