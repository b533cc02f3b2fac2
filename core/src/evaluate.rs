use crate::aero::analytic::AnalyticLift;
use crate::aero::panel::{PanelMesh, PanelSolver};
use crate::geometry::naca::NacaDigits;
use crate::geometry::surface::{AerofoilSurface, SurfaceDecomposer};
use crate::geometry::transform::KarmanTrefftz;
use crate::interface::records::{SummaryRecord, SurfaceRow};
use crate::prelude::{AerofoilConfig, FoilResult};
use crate::telemetry::log::LogManager;

/// Every derived quantity of one evaluation. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct SolutionState {
    pub config: AerofoilConfig,
    /// Closed outline, `n + 1` points from trailing edge to trailing edge.
    pub surface: AerofoilSurface,
    pub upper: Vec<(f64, f64)>,
    pub lower: Vec<(f64, f64)>,
    pub camber: Vec<(f64, f64)>,
    pub thickness: Vec<(f64, f64)>,
    pub analytic: AnalyticLift,
    pub dpan_cl: f64,
    /// `(x, Cp)` at each panel control point, in surface order.
    pub cp: Vec<(f64, f64)>,
    pub max_camber: f64,
    pub max_camber_x: f64,
    pub max_thickness: f64,
}

impl SolutionState {
    /// Analytic (Kutta condition) lift coefficient.
    pub fn cl(&self) -> f64 {
        self.analytic.cl
    }

    pub fn name(&self) -> String {
        self.config.name()
    }

    /// Panel-method error against the analytic reference.
    pub fn error(&self) -> f64 {
        self.dpan_cl - self.analytic.cl
    }

    pub fn naca_digits(&self) -> NacaDigits {
        NacaDigits::nearest(self.max_camber, self.max_camber_x, self.max_thickness)
    }

    /// `(x, y, Cp)` per control point.
    pub fn data_rows(&self) -> Vec<SurfaceRow> {
        self.surface
            .points()
            .windows(2)
            .zip(&self.cp)
            .map(|(pair, &(_, cp))| SurfaceRow {
                x: 0.5 * (pair[0].0 + pair[1].0),
                y: 0.5 * (pair[0].1 + pair[1].1),
                cp,
            })
            .collect()
    }

    pub fn summary(&self) -> SummaryRecord {
        SummaryRecord {
            name: self.name(),
            alpha: self.config.alpha(),
            eps: self.config.eps(),
            beta: self.config.beta(),
            tau: self.config.tau(),
            n: self.config.n(),
            max_camber: self.max_camber,
            max_camber_x: self.max_camber_x,
            max_thickness: self.max_thickness,
            cl: self.analytic.cl,
            thin_cl: self.analytic.thin_cl,
            dpan_cl: self.dpan_cl,
        }
    }
}

/// Evaluates one configuration: fits the section, decomposes it, and computes
/// the analytic and panel-method lift.
pub fn evaluate(config: &AerofoilConfig) -> FoilResult<SolutionState> {
    let mapping = KarmanTrefftz::new(config.eps(), config.beta(), config.tau())?;
    let surface = mapping.surface(config.n());
    let parts = SurfaceDecomposer::decompose(&surface);
    let (max_camber_x, max_camber) = parts.max_camber();
    let max_thickness = parts.max_thickness();

    let alpha = config.alpha_radians();
    let analytic = AnalyticLift::compute(&mapping, alpha);
    let mesh = PanelMesh::from_surface(&surface)?;
    let panel = PanelSolver::solve(&mesh, alpha)?;
    let cp = panel
        .control_points
        .iter()
        .zip(&panel.cp)
        .map(|(point, &cp)| (point.0, cp))
        .collect();

    let state = SolutionState {
        config: *config,
        surface,
        upper: parts.upper,
        lower: parts.lower,
        camber: parts.camber,
        thickness: parts.thickness,
        analytic,
        dpan_cl: panel.cl,
        cp,
        max_camber,
        max_camber_x,
        max_thickness,
    };
    LogManager::new().record_solution(&state);
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_bundles_consistent_arrays() {
        let config = AerofoilConfig::new(2.0, 0.05, 0.01, 0.1, 40).unwrap();
        let state = evaluate(&config).unwrap();
        assert_eq!(state.surface.points().len(), 41);
        assert_eq!(state.cp.len(), 40);
        assert_eq!(state.data_rows().len(), 40);
        assert_eq!(state.camber.len(), state.thickness.len());
        assert_eq!(state.summary().n, 40);
        assert!(state.cl().is_finite() && state.dpan_cl.is_finite());
    }

    #[test]
    fn evaluation_is_deterministic() {
        let config = AerofoilConfig::new(1.0, 0.06, 0.02, 0.15, 30).unwrap();
        let a = evaluate(&config).unwrap();
        let b = evaluate(&config).unwrap();
        assert_eq!(a.surface, b.surface);
        assert_eq!(a.dpan_cl, b.dpan_cl);
        assert_eq!(a.cl(), b.cl());
    }

    #[test]
    fn bluntest_wedge_still_evaluates() {
        let config = AerofoilConfig::new(2.0, 0.02, 0.0, 2.0, 20).unwrap();
        let state = evaluate(&config).unwrap();
        assert!(state.max_thickness > 0.04);
        assert!(state.cl() > 0.0 && state.dpan_cl > 0.0);
    }
}
