use crate::geometry::surface::SurfaceDecomposer;
use crate::geometry::transform::KarmanTrefftz;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Panel count of the surface whose camber line feeds the thin-aerofoil
/// integral. Fixed so the reference does not depend on the panel count under
/// test.
pub const QUADRATURE_PANELS: usize = 8192;

/// Closed-form lift of a mapped section.
///
/// `cl` is the potential-flow lift of the conformal map with the circulation
/// fixed by the Kutta condition at the trailing edge; it is the exact limit the
/// panel method converges to. `thin_cl` is the thin-aerofoil estimate
/// `2π(alpha - alpha_zero_lift)` from the camber line alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyticLift {
    /// Circulation per unit freestream speed and chord, positive for positive lift.
    pub circulation: f64,
    pub cl: f64,
    /// Zero-lift incidence in radians.
    pub alpha_zero_lift: f64,
    pub thin_cl: f64,
}

impl AnalyticLift {
    /// `alpha` in radians, measured from the chord line.
    pub fn compute(mapping: &KarmanTrefftz, alpha: f64) -> Self {
        // far field of the mapping is the identity, so the normalised freestream
        // meets the circle at alpha + chord angle
        let incidence = alpha + mapping.chord_angle() - mapping.theta_te();
        let circulation = 4.0 * PI * mapping.radius() / mapping.chord() * incidence.sin();

        let parts = SurfaceDecomposer::decompose(&mapping.surface(QUADRATURE_PANELS));
        let alpha_zero_lift = alpha_zero_lift(&parts.camber);

        Self {
            circulation,
            cl: 2.0 * circulation,
            alpha_zero_lift,
            thin_cl: 2.0 * PI * (alpha - alpha_zero_lift),
        }
    }
}

/// Thin-aerofoil zero-lift angle
/// `-(1/π) ∫₀^π (dyc/dx)(cos θ - 1) dθ` with `x = (1 - cos θ)/2`.
///
/// `camber` must be sampled on the cosine grid `x_i = (1 - cos(π i/m))/2`, as
/// produced by [`SurfaceDecomposer`]. Slopes use three-point differences on the
/// non-uniform grid; the integral uses Simpson's rule (trapezoidal when `m` is
/// odd).
pub fn alpha_zero_lift(camber: &[(f64, f64)]) -> f64 {
    if camber.len() < 3 {
        return 0.0;
    }
    let m = camber.len() - 1;
    let slope = |i: usize| -> f64 {
        let (x, y) = camber[i];
        if i == 0 {
            let (x1, y1) = camber[1];
            return (y1 - y) / (x1 - x);
        }
        if i == m {
            let (x0, y0) = camber[m - 1];
            return (y - y0) / (x - x0);
        }
        let (x0, y0) = camber[i - 1];
        let (x2, y2) = camber[i + 1];
        let h1 = x - x0;
        let h2 = x2 - x;
        -h2 / (h1 * (h1 + h2)) * y0 + (h2 - h1) / (h1 * h2) * y + h1 / (h2 * (h1 + h2)) * y2
    };

    let h = PI / m as f64;
    let integrand: Vec<f64> = (0..=m)
        .map(|i| slope(i) * ((h * i as f64).cos() - 1.0))
        .collect();

    let integral = if m % 2 == 0 {
        let interior: f64 = (1..m)
            .map(|i| if i % 2 == 1 { 4.0 } else { 2.0 } * integrand[i])
            .sum();
        (integrand[0] + integrand[m] + interior) * h / 3.0
    } else {
        let interior: f64 = integrand[1..m].iter().sum();
        (0.5 * (integrand[0] + integrand[m]) + interior) * h
    };

    -integral / PI
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine_grid(m: usize, camber: impl Fn(f64) -> f64) -> Vec<(f64, f64)> {
        (0..=m)
            .map(|i| {
                let x = 0.5 * (1.0 - (PI * i as f64 / m as f64).cos());
                (x, camber(x))
            })
            .collect()
    }

    #[test]
    fn parabolic_arc_zero_lift_angle_is_minus_twice_camber() {
        let h = 0.03;
        let camber = cosine_grid(512, |x| 4.0 * h * x * (1.0 - x));
        assert!((alpha_zero_lift(&camber) + 2.0 * h).abs() < 1e-8);
    }

    #[test]
    fn flat_camber_line_has_no_zero_lift_offset() {
        let camber = cosine_grid(64, |_| 0.0);
        assert_eq!(alpha_zero_lift(&camber), 0.0);
    }

    #[test]
    fn flat_plate_limit_recovers_two_pi_sin_alpha() {
        let mapping = KarmanTrefftz::from_offset(1e-9, 0.0, 1e-9).unwrap();
        let alpha = 3.0_f64.to_radians();
        let lift = AnalyticLift::compute(&mapping, alpha);
        assert!((lift.cl - 2.0 * PI * alpha.sin()).abs() < 1e-6);
        assert!((lift.thin_cl - 2.0 * PI * alpha).abs() < 1e-9);
    }

    #[test]
    fn positive_camber_lifts_at_zero_incidence() {
        let mapping = KarmanTrefftz::new(0.06, 0.02, 0.15).unwrap();
        let lift = AnalyticLift::compute(&mapping, 0.0);
        assert!(lift.cl > 0.0);
        assert!(lift.alpha_zero_lift < 0.0);
        assert!((lift.cl - 0.2512).abs() < 2e-3);
        assert!((lift.thin_cl - 0.2241).abs() < 2e-3);
    }
}
