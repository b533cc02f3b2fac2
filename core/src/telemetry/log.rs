use crate::aero::convergence::ConvergenceWarning;
use crate::evaluate::SolutionState;
use log::{info, warn};

/// Thin wrapper over the `log` facade that formats core events consistently.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn record_solution(&self, state: &SolutionState) {
        info!(
            "{} -> Cl {:.6}, dpan_cl {:.6}, max thickness {:.4}, max camber {:.4} at x {:.3}",
            state.config.name(),
            state.cl(),
            state.dpan_cl,
            state.max_thickness,
            state.max_camber,
            state.max_camber_x
        );
    }

    pub fn record_warning(&self, warning: &ConvergenceWarning) {
        match warning {
            ConvergenceWarning::NonMonotonic {
                at_n,
                previous,
                current,
            } => warn!(
                "non-monotonic convergence at n={}: |error| {:.3e} -> {:.3e}",
                at_n, previous, current
            ),
        }
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
