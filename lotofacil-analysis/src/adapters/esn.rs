use anyhow::Result;

use lotofacil_db::models::Draw;
use lotofacil_esn::config::EsnConfig;
use lotofacil_esn::training;

use super::SequenceBackend;

/// Echo state network sequence model.
#[derive(Debug, Clone, Default)]
pub struct EsnBackend {
    pub config: EsnConfig,
}

impl EsnBackend {
    pub fn new(config: EsnConfig) -> Self {
        Self { config }
    }
}

impl SequenceBackend for EsnBackend {
    fn name(&self) -> &str {
        "esn"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn fit_predict(&self, draws: &[Draw], window: usize) -> Result<Vec<f64>> {
        let config = EsnConfig {
            window,
            ..self.config.clone()
        };
        training::fit_predict(draws, &config)
    }
}
