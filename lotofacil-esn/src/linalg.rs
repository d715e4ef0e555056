use anyhow::{Result, anyhow};
use faer::prelude::Solve;
use faer::{Mat, Side};
use ndarray::Array2;

fn ndarray_to_faer(arr: &Array2<f64>) -> Mat<f64> {
    Mat::from_fn(arr.nrows(), arr.ncols(), |i, j| arr[[i, j]])
}

fn faer_to_ndarray(mat: &Mat<f64>) -> Array2<f64> {
    Array2::from_shape_fn((mat.nrows(), mat.ncols()), |(i, j)| mat[(i, j)])
}

/// Solve a symmetric positive-definite system A * X = B via Cholesky.
fn cholesky_solve(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    let llt = ndarray_to_faer(a)
        .llt(Side::Lower)
        .map_err(|_| anyhow!("Cholesky: matrix not positive-definite"))?;
    let x = llt.solve(&ndarray_to_faer(b));
    Ok(faer_to_ndarray(&x))
}

/// Ridge regression: W_out = Y * H^T * (H * H^T + lambda * I)^{-1}
///
/// - h: [state_dim, T], one column per training sample
/// - y: [output_dim, T]
/// - returns W_out: [output_dim, state_dim]
///
/// Solves on whichever of d×d (primal) or T×T (dual) is smaller.
pub fn ridge_regression(h: &Array2<f64>, y: &Array2<f64>, lambda: f64) -> Result<Array2<f64>> {
    let d = h.nrows();
    let t = h.ncols();

    if t < d {
        // G = H^T * H + lambda * I_T, solve G * Z = Y^T, W_out = (H * Z)^T
        let mut g = h.t().dot(h);
        for i in 0..t {
            g[[i, i]] += lambda;
        }
        let z = cholesky_solve(&g, &y.t().to_owned())?;
        Ok(h.dot(&z).t().to_owned())
    } else {
        // A = H * H^T + lambda * I, solve A * W_out^T = (Y * H^T)^T
        let mut a = h.dot(&h.t());
        for i in 0..d {
            a[[i, i]] += lambda;
        }
        let b_t = y.dot(&h.t()).t().to_owned();
        let w_out_t = cholesky_solve(&a, &b_t)?;
        Ok(w_out_t.t().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_ridge_regression_identity() {
        let h = Array2::eye(3);
        let y = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let w = ridge_regression(&h, &y, 1e-8).unwrap();
        assert_eq!(w.shape(), &[2, 3]);
        for i in 0..2 {
            for j in 0..3 {
                assert!((w[[i, j]] - y[[i, j]]).abs() < 0.01, "w[{i},{j}]={}", w[[i, j]]);
            }
        }
    }

    #[test]
    fn test_ridge_regression_small() {
        // H*H^T = [[5,1],[1,1]], Y*H^T = [[9,5]] => W = [[1, 4]]
        let h = array![[1.0, 2.0], [1.0, 0.0]];
        let y = array![[5.0, 2.0]];
        let w = ridge_regression(&h, &y, 1e-8).unwrap();
        assert!((w[[0, 0]] - 1.0).abs() < 0.01, "w[0,0]={}", w[[0, 0]]);
        assert!((w[[0, 1]] - 4.0).abs() < 0.01, "w[0,1]={}", w[[0, 1]]);
    }

    #[test]
    fn test_ridge_regression_dual_path() {
        let h = Array2::from_shape_fn((10, 3), |(i, j)| (i * 3 + j + 1) as f64 * 0.1);
        let y = Array2::from_shape_fn((2, 3), |(i, j)| (i * 3 + j + 1) as f64);

        let w = ridge_regression(&h, &y, 0.01).unwrap();
        assert_eq!(w.shape(), &[2, 10]);

        let y_hat = w.dot(&h);
        for i in 0..2 {
            for j in 0..3 {
                assert!((y_hat[[i, j]] - y[[i, j]]).abs() < 0.5, "y_hat[{i},{j}]={}", y_hat[[i, j]]);
            }
        }
    }
}
