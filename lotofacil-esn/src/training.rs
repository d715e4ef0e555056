use anyhow::{Result, bail};
use ndarray::{Array1, Array2, s};
use rand::SeedableRng;
use rand::rngs::StdRng;

use lotofacil_db::models::{Draw, POOL_SIZE};

use crate::config::EsnConfig;
use crate::encoding::{INPUT_DIM, encode_draw};
use crate::linalg::ridge_regression;
use crate::reservoir::Reservoir;

pub struct TrainedEsn {
    pub config: EsnConfig,
    pub reservoir: Reservoir,
    pub w_out: Array2<f64>,
    pub samples: usize,
}

/// Reset the reservoir, feed one window of draws and return the extended
/// state [state; last input] used by the read-out.
fn window_features(
    reservoir: &mut Reservoir,
    window: &[Array1<f64>],
    rng: &mut StdRng,
) -> Array1<f64> {
    let rs = reservoir.size();
    let mut extended = Array1::zeros(rs + INPUT_DIM);

    reservoir.reset_state();
    for input in window {
        reservoir.step(input, rng);
    }
    extended.slice_mut(s![..rs]).assign(&reservoir.state);
    if let Some(last) = window.last() {
        extended.slice_mut(s![rs..]).assign(last);
    }
    extended
}

/// Train the read-out to map each window of `config.window` draws to the
/// indicator vector of the draw that follows it.
/// Draws are in chronological order (oldest first).
pub fn train(draws: &[Draw], config: &EsnConfig) -> Result<TrainedEsn> {
    config.validate()?;
    let window = config.window;
    let n = draws.len();
    if n <= window {
        bail!("Need at least {} draws, got {n}", window + 1);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let inputs: Vec<Array1<f64>> = draws.iter().map(encode_draw).collect();
    let mut reservoir = Reservoir::new(INPUT_DIM, config, &mut rng)?;

    let samples = n - window;
    let state_dim = config.reservoir_size + INPUT_DIM;
    let mut h_mat = Array2::zeros((state_dim, samples));
    let mut y_mat = Array2::zeros((POOL_SIZE, samples));

    for (col, t) in (window..n).enumerate() {
        let features = window_features(&mut reservoir, &inputs[t - window..t], &mut rng);
        h_mat.column_mut(col).assign(&features);
        y_mat.column_mut(col).assign(&inputs[t]);
    }

    let w_out = ridge_regression(&h_mat, &y_mat, config.ridge_lambda)?;
    log::debug!(
        "ESN trained: {samples} samples, reservoir={}, window={window}",
        config.reservoir_size
    );

    Ok(TrainedEsn {
        config: config.clone(),
        reservoir,
        w_out,
        samples,
    })
}

/// Predict per-number scores for the draw following the last `window`
/// draws. Scores are clamped to [0, 1]; index i is number i+1.
pub fn predict_next(esn: &mut TrainedEsn, draws: &[Draw]) -> Result<Vec<f64>> {
    let window = esn.config.window;
    if draws.len() < window {
        bail!("Need at least {window} draws to predict, got {}", draws.len());
    }

    let mut rng = StdRng::seed_from_u64(esn.config.seed.wrapping_add(1));
    let inputs: Vec<Array1<f64>> = draws[draws.len() - window..].iter().map(encode_draw).collect();
    let features = window_features(&mut esn.reservoir, &inputs, &mut rng);

    let raw = esn.w_out.dot(&features);
    Ok(raw.iter().map(|&v| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }).collect())
}

pub fn fit_predict(draws: &[Draw], config: &EsnConfig) -> Result<Vec<f64>> {
    let mut esn = train(draws, config)?;
    predict_next(&mut esn, draws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotofacil_db::models::make_test_draws;

    fn small_config() -> EsnConfig {
        EsnConfig {
            reservoir_size: 20,
            spectral_radius: 0.9,
            sparsity: 0.8,
            noise_amplitude: 0.0,
            ..EsnConfig::default()
        }
    }

    #[test]
    fn test_train_needs_window_plus_one() {
        let draws = make_test_draws(10);
        assert!(train(&draws, &small_config()).is_err());
        let draws = make_test_draws(11);
        let esn = train(&draws, &small_config()).unwrap();
        assert_eq!(esn.samples, 1);
        assert_eq!(esn.w_out.shape(), &[25, 20 + 25]);
    }

    #[test]
    fn test_predict_shape_and_range() {
        let draws = make_test_draws(60);
        let probs = fit_predict(&draws, &small_config()).unwrap();
        assert_eq!(probs.len(), 25);
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_predict_deterministic() {
        let draws = make_test_draws(60);
        let a = fit_predict(&draws, &small_config()).unwrap();
        let b = fit_predict(&draws, &small_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_learns_periodic_sequence() {
        // make_test_draws cycles with period 25; the draw after any window is
        // fully determined by it, so the top 15 scores should match it.
        let draws = make_test_draws(200);
        let config = EsnConfig {
            reservoir_size: 100,
            ridge_lambda: 1e-4,
            noise_amplitude: 0.0,
            ..EsnConfig::default()
        };
        let probs = fit_predict(&draws, &config).unwrap();
        let next = &make_test_draws(201)[200];

        let mut ranked: Vec<usize> = (0..25).collect();
        ranked.sort_by(|&a, &b| probs[b].total_cmp(&probs[a]));
        let hits = ranked[..15]
            .iter()
            .filter(|&&i| next.contains((i + 1) as u8))
            .count();
        assert!(hits >= 12, "hits={hits}");
    }
}
