use crate::prelude::{FoilError, FoilResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Pivots smaller than this fraction of the largest matrix entry are treated as singular.
const RELATIVE_PIVOT_TOLERANCE: f64 = 1e-12;

pub struct MatrixHelper;

impl MatrixHelper {
    /// Solves the dense system `a * x = b` by Gaussian elimination with partial pivoting.
    pub fn solve(a: ArrayView2<f64>, b: ArrayView1<f64>) -> FoilResult<Array1<f64>> {
        let n = a.nrows();
        if a.ncols() != n || b.len() != n {
            return Err(FoilError::SolverSingularity(format!(
                "system shape {}x{} does not match right-hand side of length {}",
                a.nrows(),
                a.ncols(),
                b.len()
            )));
        }
        if n == 0 {
            return Ok(Array1::zeros(0));
        }

        let mut a: Array2<f64> = a.to_owned();
        let mut b: Array1<f64> = b.to_owned();
        let scale = a.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if !scale.is_finite() || scale == 0.0 {
            return Err(FoilError::SolverSingularity(
                "matrix is zero or non-finite".into(),
            ));
        }
        let threshold = scale * RELATIVE_PIVOT_TOLERANCE;

        for col in 0..n {
            let mut pivot_row = col;
            let mut pivot_val = a[[col, col]].abs();
            for r in (col + 1)..n {
                let v = a[[r, col]].abs();
                if v > pivot_val {
                    pivot_val = v;
                    pivot_row = r;
                }
            }

            if pivot_val <= threshold {
                return Err(FoilError::SolverSingularity(format!(
                    "pivot {:.3e} below tolerance at column {}",
                    pivot_val, col
                )));
            }

            if pivot_row != col {
                for c in 0..n {
                    a.swap([pivot_row, c], [col, c]);
                }
                b.swap(pivot_row, col);
            }

            let pivot = a[[col, col]];
            for r in (col + 1)..n {
                let factor = a[[r, col]] / pivot;
                if factor == 0.0 {
                    continue;
                }
                a[[r, col]] = 0.0;
                for c in (col + 1)..n {
                    a[[r, c]] -= factor * a[[col, c]];
                }
                b[r] -= factor * b[col];
            }
        }

        let mut x = Array1::<f64>::zeros(n);
        for i in (0..n).rev() {
            let mut rhs = b[i];
            for j in (i + 1)..n {
                rhs -= a[[i, j]] * x[j];
            }
            x[i] = rhs / a[[i, i]];
        }

        if let Some(idx) = x.iter().position(|v| !v.is_finite()) {
            return Err(FoilError::SolverSingularity(format!(
                "non-finite solution at index {}",
                idx
            )));
        }

        Ok(x)
    }
}
