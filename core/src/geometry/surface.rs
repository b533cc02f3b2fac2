use crate::math::interp::{interpolate, peak};
use std::f64::consts::PI;

/// Closed aerofoil outline in chord-normalised coordinates.
///
/// Points run from the trailing edge along the lower surface, round the leading
/// edge and back along the upper surface; the first and last points are both
/// the trailing edge, so `n` panels are described by `n + 1` points. The leading
/// edge sits at the origin, although with an odd panel count no sample lands
/// on it.
#[derive(Debug, Clone, PartialEq)]
pub struct AerofoilSurface {
    points: Vec<(f64, f64)>,
}

impl AerofoilSurface {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn panel_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Index of the sample with the smallest `x`; the first one on ties.
    pub fn leading_edge_index(&self) -> usize {
        self.points
            .iter()
            .enumerate()
            .fold(0, |best, (idx, p)| {
                if p.0 < self.points[best].0 {
                    idx
                } else {
                    best
                }
            })
    }

    pub fn is_closed(&self, tolerance: f64) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => (a.0 - b.0).hypot(a.1 - b.1) <= tolerance,
            _ => false,
        }
    }
}

/// Upper, lower, camber and thickness views of a surface.
///
/// `upper` and `lower` are ordered by increasing `x` and share their first
/// (leading-edge, always the origin) and last (trailing-edge) points. `camber` and `thickness`
/// are sampled on a common cosine-spaced grid so `camber[i]` is the midpoint of
/// the two surfaces at `thickness[i].0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub upper: Vec<(f64, f64)>,
    pub lower: Vec<(f64, f64)>,
    pub camber: Vec<(f64, f64)>,
    pub thickness: Vec<(f64, f64)>,
}

impl Decomposition {
    /// `(x, value)` of the largest camber magnitude, signed.
    pub fn max_camber(&self) -> (f64, f64) {
        peak(&self.camber, true)
            .map(|p| (p.x, p.value))
            .unwrap_or((0.0, 0.0))
    }

    pub fn max_thickness(&self) -> f64 {
        peak(&self.thickness, false)
            .map(|p| p.value)
            .unwrap_or(0.0)
    }

    pub fn thickness_at(&self, x: f64) -> f64 {
        let (xs, ys) = unzip(&self.thickness);
        interpolate(&xs, &ys, x)
    }

    pub fn camber_at(&self, x: f64) -> f64 {
        let (xs, ys) = unzip(&self.camber);
        interpolate(&xs, &ys, x)
    }
}

pub struct SurfaceDecomposer;

impl SurfaceDecomposer {
    pub fn decompose(surface: &AerofoilSurface) -> Decomposition {
        let points = surface.points();
        let le = surface.leading_edge_index();

        let mut lower: Vec<(f64, f64)> = points[..=le].to_vec();
        let mut upper: Vec<(f64, f64)> = points[le..].to_vec();
        // The foremost sample misses the origin when the panel count is odd.
        // Keep it on its own side only and close both sides at the origin.
        if points[le] != (0.0, 0.0) {
            if points[le].1 > 0.0 {
                lower.pop();
            } else {
                upper.remove(0);
            }
            lower.push((0.0, 0.0));
            upper.insert(0, (0.0, 0.0));
        }
        lower.sort_by(|a, b| a.0.total_cmp(&b.0));
        upper.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (ux, uy) = unzip(&upper);
        let (lx, ly) = unzip(&lower);

        let stations = (surface.panel_count() / 2).max(2);
        let mut camber = Vec::with_capacity(stations + 1);
        let mut thickness = Vec::with_capacity(stations + 1);
        for i in 0..=stations {
            let x = 0.5 * (1.0 - (PI * i as f64 / stations as f64).cos());
            let yu = interpolate(&ux, &uy, x);
            let yl = interpolate(&lx, &ly, x);
            camber.push((x, 0.5 * (yu + yl)));
            thickness.push((x, yu - yl));
        }

        Decomposition {
            upper,
            lower,
            camber,
            thickness,
        }
    }
}

fn unzip(points: &[(f64, f64)]) -> (Vec<f64>, Vec<f64>) {
    points.iter().copied().unzip()
}
