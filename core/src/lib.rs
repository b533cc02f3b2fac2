//! Aerofoil geometry and lift solvers for Karman–Trefftz sections.
//!
//! A section is built from a small parameter set, decomposed into upper,
//! lower and camber lines, and evaluated both analytically and with a panel
//! method. Every evaluation is a pure function of its [`AerofoilConfig`].

pub mod aero;
pub mod evaluate;
pub mod geometry;
pub mod interface;
pub mod math;
pub mod prelude;
pub mod telemetry;

pub use evaluate::{evaluate, SolutionState};
pub use prelude::{AerofoilConfig, FoilError, FoilResult, SweepField, SweepSpec};
