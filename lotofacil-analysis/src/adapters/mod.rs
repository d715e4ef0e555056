//! Swappable numerical back-ends for the clustering and sequence-prediction
//! generators. Generators only see the traits, so tests can inject fakes
//! and builds without the `esn` feature still report a useful outcome.

#[cfg(feature = "esn")]
pub mod esn;
pub mod kmeans;

use anyhow::{Result, bail};
use ndarray::Array2;

use lotofacil_db::models::{Draw, POOL_SIZE};

/// Result of a clustering run: one label per input row and one centroid
/// row per cluster.
#[derive(Debug, Clone)]
pub struct Clustering {
    pub labels: Vec<usize>,
    pub centroids: Array2<f64>,
    pub iterations: usize,
}

impl Clustering {
    /// Members per cluster, indexed by label.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.nrows()];
        for &label in &self.labels {
            if let Some(size) = sizes.get_mut(label) {
                *size += 1;
            }
        }
        sizes
    }

    /// Label with the most members, lowest label on ties.
    pub fn largest(&self) -> Option<usize> {
        let sizes = self.sizes();
        let max = *sizes.iter().max()?;
        sizes.iter().position(|&s| s == max)
    }
}

pub trait ClusterBackend: Send + Sync {
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
    /// Partition the rows of `data` into `k` groups.
    fn fit(&self, data: &Array2<f64>, k: usize, seed: u64) -> Result<Clustering>;
}

pub trait SequenceBackend: Send + Sync {
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
    /// Probability of each number 1..=25 appearing in the draw after
    /// `draws`, learned from windows of `window` consecutive draws.
    fn fit_predict(&self, draws: &[Draw], window: usize) -> Result<Vec<f64>>;
}

/// Stand-in for a sequence model that was not compiled in.
pub struct Unavailable;

impl SequenceBackend for Unavailable {
    fn name(&self) -> &str {
        "indisponível"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn fit_predict(&self, _draws: &[Draw], _window: usize) -> Result<Vec<f64>> {
        bail!("biblioteca de predição sequencial indisponível (compilado sem a feature `esn`)")
    }
}

pub struct Backends {
    pub cluster: Box<dyn ClusterBackend>,
    pub sequence: Box<dyn SequenceBackend>,
}

impl Default for Backends {
    fn default() -> Self {
        Self {
            cluster: Box::new(kmeans::KMeans::default()),
            sequence: default_sequence(),
        }
    }
}

#[cfg(feature = "esn")]
fn default_sequence() -> Box<dyn SequenceBackend> {
    Box::new(esn::EsnBackend::default())
}

#[cfg(not(feature = "esn"))]
fn default_sequence() -> Box<dyn SequenceBackend> {
    Box::new(Unavailable)
}

/// One 25-column 0/1 indicator row per draw.
pub fn indicator_matrix(draws: &[Draw]) -> Array2<f64> {
    let mut data = Array2::zeros((draws.len(), POOL_SIZE));
    for (mut row, draw) in data.rows_mut().into_iter().zip(draws) {
        for &n in &draw.numbers {
            row[(n - 1) as usize] = 1.0;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotofacil_db::models::make_test_draws;

    #[test]
    fn test_indicator_matrix() {
        let draws = make_test_draws(3);
        let data = indicator_matrix(&draws);
        assert_eq!(data.dim(), (3, 25));
        for (row, draw) in data.rows().into_iter().zip(&draws) {
            assert_eq!(row.sum(), 15.0);
            for &n in &draw.numbers {
                assert_eq!(row[(n - 1) as usize], 1.0);
            }
        }
    }

    #[test]
    fn test_clustering_largest_ties_to_lowest() {
        let clustering = Clustering {
            labels: vec![2, 1, 2, 1, 0],
            centroids: Array2::zeros((3, 25)),
            iterations: 1,
        };
        assert_eq!(clustering.sizes(), vec![1, 2, 2]);
        assert_eq!(clustering.largest(), Some(1));
    }

    #[test]
    fn test_unavailable_backend() {
        let backend = Unavailable;
        assert!(!backend.is_available());
        assert!(backend.fit_predict(&make_test_draws(20), 10).is_err());
    }

    #[test]
    fn test_default_backends() {
        let backends = Backends::default();
        assert!(backends.cluster.is_available());
        assert_eq!(backends.sequence.is_available(), cfg!(feature = "esn"));
    }
}
