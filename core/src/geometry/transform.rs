//! Karman–Trefftz conformal mapping from an offset circle to an aerofoil.
//!
//! Branch points of the mapping sit at `±1` in the auxiliary plane. The circle
//! is centred at `(-mu_x, mu_y)` and always passes through `+1`, which becomes
//! the trailing edge. The mapped curve is translated, rotated and scaled so the
//! leading edge lands on `(0, 0)` and the trailing edge on `(1, 0)`.

use crate::geometry::surface::AerofoilSurface;
use crate::prelude::{FoilError, FoilResult};
use log::debug;
use num_complex::Complex64;
use std::f64::consts::PI;

/// `8/(3√3)`: Joukowski thickness ratio `(3√3/4)·mu_x` solved for `2·eps`.
pub const THICKNESS_OFFSET: f64 = 1.539_600_717_839_002;

const LEADING_EDGE_SCAN: usize = 512;
const MAX_BISECTIONS: usize = 200;

/// Points sampled uniformly by angle on the auxiliary-plane circle, starting
/// and ending at the trailing-edge branch point.
#[derive(Debug, Clone)]
pub struct CirclePlane {
    pub centre: Complex64,
    pub radius: f64,
    pub points: Vec<Complex64>,
}

#[derive(Debug, Clone)]
pub struct KarmanTrefftz {
    exponent: f64,
    centre: Complex64,
    radius: f64,
    theta_te: f64,
    theta_le: f64,
    trailing_edge: Complex64,
    leading_edge: Complex64,
}

impl KarmanTrefftz {
    /// Builds the mapping for a given circle offset and trailing-edge angle.
    pub fn from_offset(mu_x: f64, mu_y: f64, tau: f64) -> FoilResult<Self> {
        if !(mu_x > 0.0) || !mu_y.is_finite() {
            return Err(FoilError::InvalidParameter(format!(
                "circle offset ({}, {}) must have positive mu_x",
                mu_x, mu_y
            )));
        }
        let exponent = 2.0 - tau / PI;
        let centre = Complex64::new(-mu_x, mu_y);
        let radius = (Complex64::new(1.0, 0.0) - centre).norm();
        let theta_te = (Complex64::new(1.0, 0.0) - centre).arg();

        let mut mapping = Self {
            exponent,
            centre,
            radius,
            theta_te,
            theta_le: theta_te - PI,
            trailing_edge: Complex64::new(exponent, 0.0),
            leading_edge: Complex64::new(-exponent, 0.0),
        };
        mapping.theta_le = mapping.locate_leading_edge()?;
        mapping.leading_edge = mapping.map_angle(mapping.theta_le);

        let chord = mapping.trailing_edge - mapping.leading_edge;
        if !chord.norm().is_finite() || chord.norm() == 0.0 {
            return Err(FoilError::InvalidParameter(format!(
                "degenerate chord for offset ({}, {}) and tau {}",
                mu_x, mu_y, tau
            )));
        }
        Ok(mapping)
    }

    /// Section for thickness parameter `eps`, camber parameter `beta` and
    /// trailing-edge wedge angle `tau` (radians).
    ///
    /// The circle centre is `(-THICKNESS_OFFSET·eps, 2·beta)`. In the thin
    /// Joukowski limit (`eps`, `beta`, `tau` all small) this gives a maximum
    /// thickness of `2·eps` and a maximum camber of `beta`, both fractions of
    /// chord; a finite wedge adds the thickness of the lens through both
    /// branch points. Every `eps > 0` and `tau` in `(0, 2]` maps to a section.
    pub fn new(eps: f64, beta: f64, tau: f64) -> FoilResult<Self> {
        let mapping = Self::from_offset(THICKNESS_OFFSET * eps, 2.0 * beta, tau)?;
        debug!(
            "mapped eps {} beta {} tau {}: exponent {:.6}, radius {:.6}, chord {:.6}",
            eps,
            beta,
            tau,
            mapping.exponent,
            mapping.radius,
            mapping.chord()
        );
        Ok(mapping)
    }

    /// Maps an auxiliary-plane point. Uses the ratio form
    /// `z = k (1 + r) / (1 - r)`, `r = ((zeta - 1) / (zeta + 1))^k`, with the
    /// power taken through the complex logarithm so the trailing edge (`r -> 0`)
    /// stays well conditioned.
    pub fn map(&self, zeta: Complex64) -> Complex64 {
        let k = self.exponent;
        let w = (zeta - 1.0) / (zeta + 1.0);
        if w.norm() == 0.0 {
            return Complex64::new(k, 0.0);
        }
        let r = (w.ln() * k).exp();
        (r + 1.0) / (Complex64::new(1.0, 0.0) - r) * k
    }

    fn circle_point(&self, theta: f64) -> Complex64 {
        self.centre + Complex64::from_polar(self.radius, theta)
    }

    fn map_angle(&self, theta: f64) -> Complex64 {
        self.map(self.circle_point(theta))
    }

    /// d/dθ of the squared distance between the mapped point and the trailing
    /// edge, halved. Zero at the leading edge.
    fn distance_slope(&self, theta: f64) -> f64 {
        let k = self.exponent;
        let rim = Complex64::from_polar(self.radius, theta);
        let zeta = self.centre + rim;
        let w = (zeta - 1.0) / (zeta + 1.0);
        let r = (w.ln() * k).exp();
        let z = (r + 1.0) / (Complex64::new(1.0, 0.0) - r) * k;
        let one_minus_r = Complex64::new(1.0, 0.0) - r;
        let dz_dzeta = r * (4.0 * k * k) / (one_minus_r * one_minus_r * (zeta * zeta - 1.0));
        let dz_dtheta = dz_dzeta * Complex64::i() * rim;
        ((z - self.trailing_edge).conj() * dz_dtheta).re
    }

    /// Circle angle of the point furthest from the trailing edge: a coarse
    /// scan followed by bisection on [`Self::distance_slope`].
    fn locate_leading_edge(&self) -> FoilResult<f64> {
        let step = 2.0 * PI / LEADING_EDGE_SCAN as f64;
        let mut best = (0.0, self.theta_te - PI);
        for j in 1..LEADING_EDGE_SCAN {
            let theta = self.theta_te - step * j as f64;
            let distance = (self.map_angle(theta) - self.trailing_edge).norm();
            if distance > best.0 {
                best = (distance, theta);
            }
        }

        let (mut a, mut b) = (best.1 - step, best.1 + step);
        let mut fa = self.distance_slope(a);
        let fb = self.distance_slope(b);
        if !(fa.is_finite() && fb.is_finite()) || fa.signum() == fb.signum() {
            return Err(FoilError::GeometryConvergence {
                iterations: 0,
                residual: fa.abs().min(fb.abs()),
            });
        }
        for _ in 0..MAX_BISECTIONS {
            let mid = 0.5 * (a + b);
            if mid <= a || mid >= b {
                break;
            }
            let fm = self.distance_slope(mid);
            if (fm > 0.0) == (fa > 0.0) {
                a = mid;
                fa = fm;
            } else {
                b = mid;
            }
        }
        Ok(0.5 * (a + b))
    }

    fn normalise(&self, z: Complex64) -> Complex64 {
        (z - self.leading_edge) / (self.trailing_edge - self.leading_edge)
    }

    /// Normalised surface point for circle angle `theta`.
    pub fn surface_point(&self, theta: f64) -> (f64, f64) {
        let z = self.normalise(self.map_angle(theta));
        (z.re, z.im)
    }

    /// Samples `n + 1` circle points clockwise from the trailing edge; the last
    /// point closes the loop.
    pub fn circle_plane(&self, n: usize) -> CirclePlane {
        let step = 2.0 * PI / n as f64;
        let points = (0..=n)
            .map(|j| self.circle_point(self.theta_te - step * j as f64))
            .collect();
        CirclePlane {
            centre: self.centre,
            radius: self.radius,
            points,
        }
    }

    /// Maps the circle to the closed aerofoil: trailing edge, lower surface,
    /// leading edge, upper surface, trailing edge.
    pub fn surface(&self, n: usize) -> AerofoilSurface {
        let plane = self.circle_plane(n);
        let last = plane.points.len() - 1;
        let points = plane
            .points
            .iter()
            .enumerate()
            .map(|(j, &zeta)| {
                if j == 0 || j == last {
                    (1.0, 0.0)
                } else {
                    let z = self.normalise(self.map(zeta));
                    (z.re, z.im)
                }
            })
            .collect();
        AerofoilSurface::new(points)
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    pub fn centre(&self) -> Complex64 {
        self.centre
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Circle angle of the trailing-edge branch point.
    pub fn theta_te(&self) -> f64 {
        self.theta_te
    }

    pub fn theta_le(&self) -> f64 {
        self.theta_le
    }

    /// Chord length in the mapped (un-normalised) plane.
    pub fn chord(&self) -> f64 {
        (self.trailing_edge - self.leading_edge).norm()
    }

    /// Inclination of the chord line in the mapped plane.
    pub fn chord_angle(&self) -> f64 {
        (self.trailing_edge - self.leading_edge).arg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::surface::SurfaceDecomposer;
    use crate::math::interp::peak;

    #[test]
    fn trailing_edge_maps_to_exponent() {
        let mapping = KarmanTrefftz::from_offset(0.1, 0.05, 0.2).unwrap();
        let te = mapping.map(Complex64::new(1.0, 0.0));
        assert_eq!(te, Complex64::new(mapping.exponent(), 0.0));
        let near = mapping.map(Complex64::new(1.0 + 1e-14, 1e-14));
        assert!((near - te).norm() < 1e-10);
    }

    #[test]
    fn circle_passes_through_trailing_edge_branch_point() {
        let mapping = KarmanTrefftz::from_offset(0.08, 0.04, 0.15).unwrap();
        let plane = mapping.circle_plane(16);
        assert_eq!(plane.points.len(), 17);
        assert!((plane.points[0] - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        assert!((plane.points[16] - plane.points[0]).norm() < 1e-12);
    }

    #[test]
    fn symmetric_circle_gives_symmetric_section() {
        let mapping = KarmanTrefftz::from_offset(0.1, 0.0, 0.15).unwrap();
        assert!((mapping.theta_le().abs() - PI).abs() < 1e-9);
        let (x, y) = mapping.surface_point(mapping.theta_le());
        assert!(x.abs() < 1e-12 && y.abs() < 1e-12);
        let upper = mapping.surface_point(mapping.theta_te() - 0.7);
        let lower = mapping.surface_point(mapping.theta_te() + 0.7);
        assert!((upper.0 - lower.0).abs() < 1e-9);
        assert!((upper.1 + lower.1).abs() < 1e-9);
    }

    #[test]
    fn joukowski_limit_reproduces_flat_plate_chord() {
        // k -> 2 with a circle through both branch points is the flat plate of chord 4
        let mapping = KarmanTrefftz::from_offset(1e-9, 0.0, 1e-9).unwrap();
        assert!((mapping.chord() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn thin_section_matches_thickness_and_camber_targets() {
        let mapping = KarmanTrefftz::new(0.005, 0.004, 1e-4).unwrap();
        let parts = SurfaceDecomposer::decompose(&mapping.surface(512));
        let thickness = peak(&parts.thickness, false).unwrap();
        let camber = peak(&parts.camber, true).unwrap();
        assert!((thickness.value - 0.01).abs() < 5e-4);
        assert!((camber.value - 0.004).abs() < 2e-4);
    }

    #[test]
    fn trailing_edge_wedge_angle_is_tau() {
        for (eps, beta, tau) in [(0.06, 0.02, 0.15), (0.02, 0.0, 2.0), (0.3, 0.1, 1.0)] {
            let mapping = KarmanTrefftz::new(eps, beta, tau).unwrap();
            let lower = mapping.surface_point(mapping.theta_te() - 1e-4);
            let upper = mapping.surface_point(mapping.theta_te() + 1e-4);
            let (lx, ly) = (lower.0 - 1.0, lower.1);
            let (ux, uy) = (upper.0 - 1.0, upper.1);
            let angle = ((lx * ux + ly * uy) / (lx.hypot(ly) * ux.hypot(uy))).acos();
            assert!((angle - tau).abs() < 1e-3, "tau {} gave {}", tau, angle);
        }
    }

    #[test]
    fn every_valid_wedge_angle_maps_to_a_section() {
        for tau in [1e-3, 0.15, 0.5, 1.0, 1.5, 2.0] {
            for eps in [1e-3, 0.01, 0.06, 0.3] {
                let mapping = KarmanTrefftz::new(eps, 0.02, tau).unwrap();
                let surface = mapping.surface(40);
                assert!(surface.is_closed(0.0));
                assert!(surface.points().iter().all(|p| p.0.is_finite() && p.1.is_finite()));
            }
        }
    }
}
