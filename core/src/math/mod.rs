pub mod interp;
pub mod matrix;
pub mod stats;

pub use interp::{interpolate, peak, Peak};
pub use matrix::MatrixHelper;
pub use stats::{LinearFit, StatsHelper};
