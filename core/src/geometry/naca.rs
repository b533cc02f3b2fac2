//! NACA 4-digit sections used as the nearest conventional comparison for a
//! mapped aerofoil.

use crate::geometry::surface::AerofoilSurface;
use crate::prelude::{FoilError, FoilResult, MIN_PANELS};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// The four digits `m p tt`: camber in percent of chord, its location in tenths
/// of chord and thickness in percent of chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NacaDigits {
    pub camber: u8,
    pub camber_x: u8,
    pub thickness: u8,
}

impl NacaDigits {
    /// Rounds measured section properties (fractions of chord) to the nearest
    /// designation.
    pub fn nearest(max_camber: f64, max_camber_x: f64, max_thickness: f64) -> Self {
        let camber = (100.0 * max_camber.abs()).round().clamp(0.0, 9.0) as u8;
        let camber_x = if camber == 0 {
            0
        } else {
            (10.0 * max_camber_x).round().clamp(1.0, 9.0) as u8
        };
        let thickness = (100.0 * max_thickness).round().clamp(1.0, 99.0) as u8;
        Self {
            camber,
            camber_x,
            thickness,
        }
    }
}

impl fmt::Display for NacaDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{:02}", self.camber, self.camber_x, self.thickness)
    }
}

impl std::str::FromStr for NacaDigits {
    type Err = FoilError;

    fn from_str(s: &str) -> FoilResult<Self> {
        let digits: Vec<u8> = s
            .trim()
            .trim_start_matches("naca")
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(|| FoilError::InvalidParameter(format!("'{}' is not numeric", s)))?;
        if digits.len() != 4 {
            return Err(FoilError::InvalidParameter(format!(
                "NACA 4-digit designation needs four digits, got '{}'",
                s
            )));
        }
        Ok(Self {
            camber: digits[0],
            camber_x: digits[1],
            thickness: digits[2] * 10 + digits[3],
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Naca4Digit {
    digits: NacaDigits,
    m: f64,
    p: f64,
    t: f64,
}

impl Naca4Digit {
    pub fn new(digits: NacaDigits) -> FoilResult<Self> {
        if digits.thickness == 0 {
            return Err(FoilError::InvalidParameter(
                "NACA section needs non-zero thickness".into(),
            ));
        }
        if digits.camber > 0 && digits.camber_x == 0 {
            return Err(FoilError::InvalidParameter(
                "cambered NACA section needs a camber location".into(),
            ));
        }
        Ok(Self {
            digits,
            m: digits.camber as f64 / 100.0,
            p: digits.camber_x as f64 / 10.0,
            t: digits.thickness as f64 / 100.0,
        })
    }

    pub fn name(&self) -> String {
        format!("naca{}", self.digits)
    }

    pub fn digits(&self) -> NacaDigits {
        self.digits
    }

    /// Camber height and slope at `x`.
    fn camber_line(&self, x: f64) -> (f64, f64) {
        let (m, p) = (self.m, self.p);
        if m == 0.0 || p == 0.0 {
            return (0.0, 0.0);
        }
        if x < p {
            (m / (p * p) * (2.0 * p * x - x * x), 2.0 * m / (p * p) * (p - x))
        } else {
            let q = (1.0 - p) * (1.0 - p);
            (
                m / q * (1.0 - 2.0 * p + 2.0 * p * x - x * x),
                2.0 * m / q * (p - x),
            )
        }
    }

    /// Half thickness with the closed trailing-edge coefficient.
    fn half_thickness(&self, x: f64) -> f64 {
        5.0 * self.t
            * (0.2969 * x.sqrt() + (-0.1260 + (-0.3516 + (0.2843 - 0.1036 * x) * x) * x) * x)
    }

    fn point(&self, x: f64, upper: bool) -> (f64, f64) {
        let (yc, slope) = self.camber_line(x);
        let yt = self.half_thickness(x);
        let theta = slope.atan();
        let sign = if upper { 1.0 } else { -1.0 };
        (x - sign * yt * theta.sin(), yc + sign * yt * theta.cos())
    }

    /// Closed outline with `n` cosine-spaced panels in the same
    /// TE-lower-LE-upper-TE order as the mapped sections.
    pub fn surface(&self, n: usize) -> FoilResult<AerofoilSurface> {
        if n < MIN_PANELS {
            return Err(FoilError::InvalidParameter(format!(
                "n must be at least {}, got {}",
                MIN_PANELS, n
            )));
        }
        let lower_panels = n / 2;
        let upper_panels = n - lower_panels;
        let station = |i: usize, panels: usize| 0.5 * (1.0 - (PI * i as f64 / panels as f64).cos());

        let mut points = Vec::with_capacity(n + 1);
        for i in (0..=lower_panels).rev() {
            points.push(self.point(station(i, lower_panels), false));
        }
        for i in 1..=upper_panels {
            points.push(self.point(station(i, upper_panels), true));
        }
        Ok(AerofoilSurface::new(points))
    }
}
