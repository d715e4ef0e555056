use anyhow::Result;
use ndarray::linalg::general_mat_vec_mul;
use ndarray::{Array1, Array2};
use rand::Rng;
use rand::distr::Uniform;
use sprs::CsMat;

use crate::config::EsnConfig;

pub struct Reservoir {
    pub w_in: Array2<f64>,
    pub w_res: CsMat<f64>,
    pub state: Array1<f64>,
    buf: Array1<f64>,
    pub leaking_rate: f64,
    noise: Option<Uniform<f64>>,
}

impl Reservoir {
    pub fn new(input_dim: usize, config: &EsnConfig, rng: &mut impl Rng) -> Result<Self> {
        let size = config.reservoir_size;

        // W_in: dense, Uniform[-input_scaling, +input_scaling]
        let dist_in = Uniform::new(-config.input_scaling, config.input_scaling)?;
        let w_in = Array2::from_shape_fn((size, input_dim), |_| rng.sample(dist_in));

        // W_res: sparse (sparsity fraction of zeros), non-zeros Uniform[-1, 1]
        let dist_res = Uniform::new(-1.0, 1.0)?;
        let mut w_res = Array2::from_shape_fn((size, size), |_| {
            if rng.random::<f64>() < config.sparsity {
                0.0
            } else {
                rng.sample(dist_res)
            }
        });

        let rho = power_iteration(&w_res, rng)?;
        if rho > 1e-10 {
            w_res.mapv_inplace(|x| x * config.spectral_radius / rho);
        }

        let mut tri = sprs::TriMat::new((size, size));
        for ((i, j), &v) in w_res.indexed_iter() {
            if v != 0.0 {
                tri.add_triplet(i, j, v);
            }
        }

        let noise = if config.noise_amplitude > 0.0 {
            Some(Uniform::new(-config.noise_amplitude, config.noise_amplitude)?)
        } else {
            None
        };

        Ok(Reservoir {
            w_in,
            w_res: tri.to_csr(),
            state: Array1::zeros(size),
            buf: Array1::zeros(size),
            leaking_rate: config.leaking_rate,
            noise,
        })
    }

    pub fn size(&self) -> usize {
        self.state.len()
    }

    /// Single reservoir step: h(t) = (1-a)*h(t-1) + a*tanh(W_in*x + W_res*h(t-1)) + noise
    pub fn step(&mut self, input: &Array1<f64>, rng: &mut impl Rng) {
        general_mat_vec_mul(1.0, &self.w_in, input, 0.0, &mut self.buf);

        for (row, row_vec) in self.w_res.outer_iterator().enumerate() {
            for (col, &val) in row_vec.iter() {
                self.buf[row] += val * self.state[col];
            }
        }

        let a = self.leaking_rate;
        self.state.zip_mut_with(&self.buf, |h, &pre| {
            *h = *h * (1.0 - a) + pre.tanh() * a;
        });

        if let Some(noise) = &self.noise {
            for v in self.state.iter_mut() {
                *v += rng.sample(noise);
            }
        }
    }

    /// Run the reservoir over a sequence of inputs, returning all states.
    pub fn run_sequence(&mut self, inputs: &[Array1<f64>], rng: &mut impl Rng) -> Vec<Array1<f64>> {
        inputs
            .iter()
            .map(|x| {
                self.step(x, rng);
                self.state.clone()
            })
            .collect()
    }

    pub fn reset_state(&mut self) {
        self.state.fill(0.0);
    }
}

/// Estimate the spectral radius of a matrix via power iteration.
pub fn power_iteration(w: &Array2<f64>, rng: &mut impl Rng) -> Result<f64> {
    let n = w.nrows();
    if n == 0 {
        return Ok(0.0);
    }

    let dist = Uniform::new(-1.0, 1.0)?;
    let mut v: Array1<f64> = Array1::from_shape_fn(n, |_| rng.sample(dist));
    let norm = v.dot(&v).sqrt();
    if norm < 1e-15 {
        return Ok(0.0);
    }
    v /= norm;

    let mut lambda = 0.0;

    for _ in 0..200 {
        let w_v: Array1<f64> = w.dot(&v);
        let new_lambda = w_v.dot(&w_v).sqrt();
        if new_lambda < 1e-15 {
            return Ok(0.0);
        }
        v = &w_v / new_lambda;

        if (new_lambda - lambda).abs() < 1e-10 {
            return Ok(new_lambda);
        }
        lambda = new_lambda;
    }

    Ok(lambda)
}

#[cfg(test)]
fn w_res_dense(sparse: &CsMat<f64>) -> Array2<f64> {
    let (rows, cols) = sparse.shape();
    let mut dense = Array2::zeros((rows, cols));
    for (row, row_vec) in sparse.outer_iterator().enumerate() {
        for (col, &val) in row_vec.iter() {
            dense[[row, col]] = val;
        }
    }
    dense
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(size: usize, sparsity: f64, leaking_rate: f64) -> EsnConfig {
        EsnConfig {
            reservoir_size: size,
            spectral_radius: 0.95,
            sparsity,
            leaking_rate,
            input_scaling: 0.1,
            noise_amplitude: 0.0,
            ..EsnConfig::default()
        }
    }

    #[test]
    fn test_matrix_shapes() {
        let mut rng = StdRng::seed_from_u64(42);
        let r = Reservoir::new(25, &config(100, 0.9, 0.3), &mut rng).unwrap();
        assert_eq!(r.w_in.shape(), &[100, 25]);
        assert_eq!(r.w_res.shape(), (100, 100));
        assert_eq!(r.size(), 100);
    }

    #[test]
    fn test_spectral_radius_within_tolerance() {
        let mut rng = StdRng::seed_from_u64(42);
        let r = Reservoir::new(10, &config(50, 0.8, 0.3), &mut rng).unwrap();
        let rho = power_iteration(&w_res_dense(&r.w_res), &mut rng).unwrap();
        assert!((rho - 0.95).abs() / 0.95 < 0.05, "rho={rho}");
    }

    #[test]
    fn test_sparsity() {
        let mut rng = StdRng::seed_from_u64(42);
        let r = Reservoir::new(10, &config(200, 0.9, 0.3), &mut rng).unwrap();
        let total = (200 * 200) as f64;
        let actual = (total - r.w_res.nnz() as f64) / total;
        assert!((actual - 0.9).abs() < 0.05, "actual_sparsity={actual}");
    }

    #[test]
    fn test_deterministic_seed() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let r1 = Reservoir::new(10, &config(50, 0.9, 0.3), &mut rng1).unwrap();
        let mut rng2 = StdRng::seed_from_u64(42);
        let r2 = Reservoir::new(10, &config(50, 0.9, 0.3), &mut rng2).unwrap();

        assert_eq!(r1.w_in, r2.w_in);
        assert_eq!(w_res_dense(&r1.w_res), w_res_dense(&r2.w_res));
    }

    #[test]
    fn test_leaking_rate_zero_no_update() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut r = Reservoir::new(10, &config(20, 0.5, 0.0), &mut rng).unwrap();
        r.step(&Array1::ones(10), &mut rng);
        assert!(r.state.iter().all(|v| v.abs() < 1e-10));
    }

    #[test]
    fn test_leaking_rate_one_full_update() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut r = Reservoir::new(10, &config(20, 0.5, 1.0), &mut rng).unwrap();
        let input = Array1::ones(10);
        r.step(&input, &mut rng);
        let expected = r.w_in.dot(&input).mapv(|x| x.tanh());
        for i in 0..20 {
            assert!((r.state[i] - expected[i]).abs() < 1e-10, "state[{i}]");
        }
    }

    #[test]
    fn test_run_sequence_and_reset() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut r = Reservoir::new(10, &config(20, 0.9, 0.3), &mut rng).unwrap();
        let inputs: Vec<Array1<f64>> = (0..5).map(|_| Array1::ones(10)).collect();
        let states = r.run_sequence(&inputs, &mut rng);
        assert_eq!(states.len(), 5);
        assert!(r.state.iter().any(|v| v.abs() > 1e-10));
        r.reset_state();
        assert!(r.state.iter().all(|v| v.abs() < 1e-15));
    }

    #[test]
    fn test_power_iteration_scaled_identity() {
        let mut rng = StdRng::seed_from_u64(42);
        let rho = power_iteration(&(Array2::eye(5) * 3.0), &mut rng).unwrap();
        assert!((rho - 3.0).abs() < 0.01, "rho={rho}");
    }
}
