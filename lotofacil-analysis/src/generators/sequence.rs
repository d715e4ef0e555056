use anyhow::{Context, Result, bail};

use lotofacil_db::history::History;
use lotofacil_db::models::POOL_SIZE;

use super::{GameGenerator, Selection, top};
use crate::adapters::SequenceBackend;
use crate::scoring::rank_by_score;

/// Learns next-draw probabilities from sliding windows of past draws and
/// plays the 15 most likely numbers.
pub struct SequencePrediction {
    backend: Box<dyn SequenceBackend>,
    window: usize,
}

impl SequencePrediction {
    pub fn new(backend: Box<dyn SequenceBackend>, window: usize) -> Self {
        Self { backend, window }
    }
}

impl GameGenerator for SequencePrediction {
    fn name(&self) -> &str {
        "sequencia"
    }

    fn label(&self) -> &str {
        "Predição Sequencial"
    }

    fn min_draws(&self) -> usize {
        self.window + 1
    }

    fn select(&self, history: &History) -> Result<Selection> {
        if !self.backend.is_available() {
            bail!("modelo sequencial '{}' indisponível", self.backend.name());
        }

        let probs = self
            .backend
            .fit_predict(history.draws(), self.window)
            .with_context(|| format!("falha no treino do modelo sequencial ({})", self.backend.name()))?;
        if probs.len() != POOL_SIZE {
            bail!("modelo devolveu {} probabilidades, esperado {}", probs.len(), POOL_SIZE);
        }

        let numbers = top(&rank_by_score(&probs));
        let mut details = vec![format!(
            "Modelo {} treinado com janelas de {} sorteios ({} amostras)",
            self.backend.name(),
            self.window,
            history.len() - self.window
        )];
        details.extend(
            numbers
                .iter()
                .map(|&n| format!("  Número {:2}: probabilidade {:.3}", n, probs[(n - 1) as usize])),
        );

        Ok(Selection { numbers, details })
    }
}
