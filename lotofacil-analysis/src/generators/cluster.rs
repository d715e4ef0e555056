use anyhow::{Context, Result, bail};

use lotofacil_db::history::History;
use lotofacil_db::models::POOL_SIZE;

use super::{GameGenerator, Selection, top};
use crate::adapters::{ClusterBackend, indicator_matrix};
use crate::scoring::rank_by_score;

/// Clusters draws as indicator vectors and plays the top of the largest
/// cluster's centroid.
pub struct Clustering {
    backend: Box<dyn ClusterBackend>,
    k: usize,
    seed: u64,
}

impl Clustering {
    pub fn new(backend: Box<dyn ClusterBackend>, k: usize, seed: u64) -> Self {
        Self { backend, k, seed }
    }
}

impl GameGenerator for Clustering {
    fn name(&self) -> &str {
        "clusters"
    }

    fn label(&self) -> &str {
        "Clustering K-means"
    }

    fn min_draws(&self) -> usize {
        self.k.max(1)
    }

    fn select(&self, history: &History) -> Result<Selection> {
        if !self.backend.is_available() {
            bail!("biblioteca de clustering '{}' indisponível", self.backend.name());
        }

        let data = indicator_matrix(history.draws());
        let fit = self
            .backend
            .fit(&data, self.k, self.seed)
            .with_context(|| format!("falha no clustering ({})", self.backend.name()))?;
        if fit.labels.len() != data.nrows() || fit.centroids.dim() != (self.k, POOL_SIZE) {
            bail!(
                "clustering devolveu formato inesperado: {} rótulos, centróides {:?}",
                fit.labels.len(),
                fit.centroids.dim()
            );
        }

        let Some(largest) = fit.largest() else {
            bail!("clustering sem clusters");
        };
        let centroid: Vec<f64> = fit.centroids.row(largest).to_vec();
        let numbers = top(&rank_by_score(&centroid));

        let mut details = vec![format!(
            "{} clusters, {} iterações ({})",
            self.k,
            fit.iterations,
            self.backend.name()
        )];
        for (label, size) in fit.sizes().iter().enumerate() {
            details.push(format!("  Cluster {}: {} sorteios", label, size));
        }
        details.push(format!("Maior cluster: {}", largest));
        details.extend(
            numbers
                .iter()
                .map(|&n| format!("  Número {:2}: centróide {:.3}", n, centroid[(n - 1) as usize])),
        );

        Ok(Selection { numbers, details })
    }
}
