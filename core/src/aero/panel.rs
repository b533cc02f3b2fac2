//! Linear-strength vortex panel method.
//!
//! Each panel carries a vortex sheet whose strength varies linearly between
//! the node values `gamma[j]` and `gamma[j + 1]` (equivalently, a quadratic
//! doublet distribution). The `n + 1` node strengths are fixed by `n`
//! flow-tangency conditions at the panel midpoints plus the Kutta condition
//! `gamma[0] + gamma[n] = 0`, i.e. zero net vorticity at the trailing edge.

use crate::geometry::surface::AerofoilSurface;
use crate::math::matrix::MatrixHelper;
use crate::prelude::{FoilError, FoilResult};
use ndarray::{Array1, Array2};
use std::f64::consts::PI;

const MIN_PANEL_LENGTH: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub midpoint: (f64, f64),
    pub length: f64,
    pub tangent: (f64, f64),
    /// Outward unit normal.
    pub normal: (f64, f64),
}

impl Panel {
    fn new(start: (f64, f64), end: (f64, f64)) -> FoilResult<Self> {
        let dx = end.0 - start.0;
        let dy = end.1 - start.1;
        let length = dx.hypot(dy);
        if !(length > MIN_PANEL_LENGTH) {
            return Err(FoilError::SolverSingularity(format!(
                "panel from ({:.6}, {:.6}) has length {:.3e}",
                start.0, start.1, length
            )));
        }
        let tangent = (dx / length, dy / length);
        Ok(Self {
            start,
            end,
            midpoint: (0.5 * (start.0 + end.0), 0.5 * (start.1 + end.1)),
            length,
            tangent,
            // clockwise traversal puts the body on the right of the tangent
            normal: (-tangent.1, tangent.0),
        })
    }

    /// Converts a global offset from the panel start into panel coordinates.
    fn to_local(&self, point: (f64, f64)) -> (f64, f64) {
        let dx = point.0 - self.start.0;
        let dy = point.1 - self.start.1;
        let (tx, ty) = self.tangent;
        (dx * tx + dy * ty, dy * tx - dx * ty)
    }

    fn to_global(&self, u: f64, v: f64) -> (f64, f64) {
        let (tx, ty) = self.tangent;
        (u * tx - v * ty, u * ty + v * tx)
    }

    /// Velocities induced at `point` by unit vortex strength at the start and
    /// end nodes of this panel.
    fn influence(&self, point: (f64, f64), on_panel: bool) -> ((f64, f64), (f64, f64)) {
        let s = self.length;
        let (x, mut y) = self.to_local(point);
        if on_panel {
            y = 0.0;
        }

        let theta_1 = y.atan2(x);
        let theta_2 = y.atan2(x - s);
        let i0 = theta_2 - theta_1;
        let j0 = 0.5 * ((x * x + y * y) / ((x - s) * (x - s) + y * y)).ln();
        let i1 = x * i0 - y * j0;
        let j1 = x * j0 - s + y * i0;

        let ua = -(i0 - i1 / s) / (2.0 * PI);
        let ub = -(i1 / s) / (2.0 * PI);
        let va = (j0 - j1 / s) / (2.0 * PI);
        let vb = (j1 / s) / (2.0 * PI);

        (self.to_global(ua, va), self.to_global(ub, vb))
    }
}

/// Flat panels joining consecutive surface points. Built once per solve.
#[derive(Debug, Clone)]
pub struct PanelMesh {
    panels: Vec<Panel>,
}

impl PanelMesh {
    pub fn from_surface(surface: &AerofoilSurface) -> FoilResult<Self> {
        let panels = surface
            .points()
            .windows(2)
            .map(|pair| Panel::new(pair[0], pair[1]))
            .collect::<FoilResult<Vec<_>>>()?;
        if panels.len() < 3 {
            return Err(FoilError::SolverSingularity(format!(
                "{} panels can not enclose a body",
                panels.len()
            )));
        }
        Ok(Self { panels })
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PanelSolution {
    /// Vortex strength at each of the `n + 1` nodes.
    pub strengths: Vec<f64>,
    pub control_points: Vec<(f64, f64)>,
    /// Pressure coefficient at each control point.
    pub cp: Vec<f64>,
    /// Lift coefficient from integrating `cp` over the surface.
    pub cl: f64,
}

pub struct PanelSolver;

impl PanelSolver {
    /// `alpha` in radians, freestream speed 1.
    pub fn solve(mesh: &PanelMesh, alpha: f64) -> FoilResult<PanelSolution> {
        let panels = mesh.panels();
        let n = panels.len();
        let freestream = (alpha.cos(), alpha.sin());

        let mut system = Array2::<f64>::zeros((n + 1, n + 1));
        let mut rhs = Array1::<f64>::zeros(n + 1);
        for (i, target) in panels.iter().enumerate() {
            let (nx, ny) = target.normal;
            for (j, source) in panels.iter().enumerate() {
                let (va, vb) = source.influence(target.midpoint, i == j);
                system[[i, j]] += va.0 * nx + va.1 * ny;
                system[[i, j + 1]] += vb.0 * nx + vb.1 * ny;
            }
            rhs[i] = -(freestream.0 * nx + freestream.1 * ny);
        }
        system[[n, 0]] = 1.0;
        system[[n, n]] = 1.0;

        let gamma = MatrixHelper::solve(system.view(), rhs.view())?;

        // the body interior is at rest, so the surface speed equals the sheet strength
        let cp: Vec<f64> = (0..n)
            .map(|j| {
                let speed = 0.5 * (gamma[j] + gamma[j + 1]);
                1.0 - speed * speed
            })
            .collect();

        let (mut fx, mut fy) = (0.0, 0.0);
        for (panel, &c) in panels.iter().zip(&cp) {
            fx -= c * panel.normal.0 * panel.length;
            fy -= c * panel.normal.1 * panel.length;
        }
        let cl = fy * alpha.cos() - fx * alpha.sin();

        Ok(PanelSolution {
            strengths: gamma.to_vec(),
            control_points: panels.iter().map(|p| p.midpoint).collect(),
            cp,
            cl,
        })
    }
}
