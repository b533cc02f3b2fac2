pub mod naca;
pub mod surface;
pub mod transform;

pub use naca::{Naca4Digit, NacaDigits};
pub use surface::{AerofoilSurface, Decomposition, SurfaceDecomposer};
pub use transform::{CirclePlane, KarmanTrefftz};
