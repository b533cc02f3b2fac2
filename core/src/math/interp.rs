/// Linear interpolation of `ys(xs)` at `x`; `xs` must be non-decreasing.
/// Values outside the sampled range clamp to the end points.
pub fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    match xs.len() {
        0 => return 0.0,
        1 => return ys[0],
        _ => {}
    }
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }

    // first index with xs[hi] > x
    let hi = xs.partition_point(|&v| v <= x).clamp(1, last);
    let lo = hi - 1;
    let span = xs[hi] - xs[lo];
    if span <= 0.0 {
        return ys[lo];
    }
    let t = (x - xs[lo]) / span;
    ys[lo] + t * (ys[hi] - ys[lo])
}

/// Extremum located by scanning a sampled curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub index: usize,
    pub x: f64,
    pub value: f64,
}

/// Scans `(x, y)` samples for the largest `y` (or largest `|y|` when
/// `by_magnitude`), keeping the first occurrence on ties.
pub fn peak(points: &[(f64, f64)], by_magnitude: bool) -> Option<Peak> {
    let key = |y: f64| if by_magnitude { y.abs() } else { y };
    let (first, rest) = points.split_first()?;
    let mut best = Peak {
        index: 0,
        x: first.0,
        value: first.1,
    };
    for (offset, &(x, y)) in rest.iter().enumerate() {
        if key(y) > key(best.value) {
            best = Peak {
                index: offset + 1,
                x,
                value: y,
            };
        }
    }
    Some(best)
}

impl Peak {
    /// Refines the scanned extremum with the vertex of the parabola through the
    /// peak sample and its two neighbours. Edge peaks are returned unchanged.
    pub fn refined(self, points: &[(f64, f64)]) -> Peak {
        if self.index == 0 || self.index + 1 >= points.len() {
            return self;
        }
        let (x0, y0) = points[self.index - 1];
        let (x1, y1) = points[self.index];
        let (x2, y2) = points[self.index + 1];

        let denom = (x0 - x1) * (x0 - x2) * (x1 - x2);
        if denom == 0.0 {
            return self;
        }
        let a = (x2 * (y1 - y0) + x1 * (y0 - y2) + x0 * (y2 - y1)) / denom;
        let b = (x2 * x2 * (y0 - y1) + x1 * x1 * (y2 - y0) + x0 * x0 * (y1 - y2)) / denom;
        let c = (x1 * x2 * (x1 - x2) * y0 + x2 * x0 * (x2 - x0) * y1 + x0 * x1 * (x0 - x1) * y2)
            / denom;
        if a == 0.0 {
            return self;
        }

        let xv = -b / (2.0 * a);
        if xv < x0.min(x2) || xv > x0.max(x2) {
            return self;
        }
        Peak {
            index: self.index,
            x: xv,
            value: c - b * b / (4.0 * a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_is_linear_between_samples_and_clamped_outside() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 2.0, 0.0];
        assert_eq!(interpolate(&xs, &ys, 0.5), 1.0);
        assert_eq!(interpolate(&xs, &ys, 2.0), 1.0);
        assert_eq!(interpolate(&xs, &ys, 1.0), 2.0);
        assert_eq!(interpolate(&xs, &ys, -1.0), 0.0);
        assert_eq!(interpolate(&xs, &ys, 4.0), 0.0);
    }

    #[test]
    fn peak_keeps_first_of_equal_values() {
        let points = [(0.0, 1.0), (0.5, 3.0), (1.0, 3.0)];
        let found = peak(&points, false).unwrap();
        assert_eq!(found.index, 1);
        assert_eq!(found.x, 0.5);
    }

    #[test]
    fn peak_by_magnitude_reports_signed_value() {
        let points = [(0.0, 0.0), (0.5, -0.2), (1.0, 0.1)];
        let found = peak(&points, true).unwrap();
        assert_eq!(found.value, -0.2);
        assert!(peak(&[], true).is_none());
    }

    #[test]
    fn refined_peak_finds_parabola_vertex() {
        let f = |x: f64| 1.0 - (x - 0.3) * (x - 0.3);
        let points: Vec<(f64, f64)> = (0..=10)
            .map(|i| {
                let x = i as f64 / 10.0;
                (x, f(x))
            })
            .collect();
        let found = peak(&points, false).unwrap().refined(&points);
        assert!((found.x - 0.3).abs() < 1e-12);
        assert!((found.value - 1.0).abs() < 1e-12);
    }
}
