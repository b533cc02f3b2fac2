pub mod analytic;
pub mod convergence;
pub mod panel;

pub use analytic::AnalyticLift;
pub use convergence::{ConvergenceMetric, ConvergenceReport, ConvergenceSample, ConvergenceWarning};
pub use panel::{Panel, PanelMesh, PanelSolution, PanelSolver};
