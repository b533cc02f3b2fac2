use crate::aero::convergence::ConvergenceSample;
use serde::{Deserialize, Serialize};

/// Scalar results of one evaluation, flattened for tabular export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub name: String,
    pub alpha: f64,
    pub eps: f64,
    pub beta: f64,
    pub tau: f64,
    pub n: usize,
    pub max_camber: f64,
    pub max_camber_x: f64,
    pub max_thickness: f64,
    pub cl: f64,
    pub thin_cl: f64,
    pub dpan_cl: f64,
}

/// Surface position and pressure coefficient at a panel control point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRow {
    pub x: f64,
    pub y: f64,
    pub cp: f64,
}

/// One row of a panel-refinement study.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub n: usize,
    pub cl: f64,
    pub dpan_cl: f64,
    pub error: f64,
    pub log_n: f64,
    pub log_error: f64,
}

impl OrderRecord {
    pub fn from_sample(sample: &ConvergenceSample, cl: f64) -> Self {
        Self {
            n: sample.n,
            cl,
            dpan_cl: sample.dpan_cl,
            error: sample.error,
            log_n: sample.log_n,
            log_error: sample.log_error,
        }
    }
}
