//! Shape-only coordinate files for external viscous solvers: one `x y` pair
//! per line, no header, trailing edge to trailing edge.

use crate::geometry::surface::AerofoilSurface;
use std::io::{self, Write};

pub fn write_coordinates<W: Write>(surface: &AerofoilSurface, mut writer: W) -> io::Result<()> {
    writer.write_all(coordinates_string(surface).as_bytes())?;
    writer.flush()
}

pub fn coordinates_string(surface: &AerofoilSurface) -> String {
    surface
        .points()
        .iter()
        .map(|&(x, y)| format!("{:.10e} {:.10e}\n", x, y))
        .collect()
}
