use anyhow::{Result, bail};
use ndarray::{Array2, ArrayView1};
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ClusterBackend, Clustering};

/// Seeded k-means: k-means++ seeding followed by Lloyd iterations.
#[derive(Debug, Clone)]
pub struct KMeans {
    pub max_iterations: usize,
    /// Stop once no centroid moves by more than this (squared distance).
    pub tolerance: f64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            tolerance: 1e-6,
        }
    }
}

fn sq_dist(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the nearest centroid, lowest index on ties.
fn nearest(point: ArrayView1<f64>, centroids: &Array2<f64>) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (j, centroid) in centroids.rows().into_iter().enumerate() {
        let d = sq_dist(point, centroid);
        if d < best_dist {
            best_dist = d;
            best = j;
        }
    }
    best
}

fn init_plus_plus(data: &Array2<f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let n = data.nrows();
    let mut centroids = Array2::zeros((k, data.ncols()));
    centroids.row_mut(0).assign(&data.row(rng.random_range(0..n)));

    let mut dists: Vec<f64> = data.rows().into_iter().map(|p| sq_dist(p, centroids.row(0))).collect();
    for c in 1..k {
        // all points already coincide with a centroid: fall back to uniform
        let idx = match WeightedIndex::new(&dists) {
            Ok(weighted) => weighted.sample(rng),
            Err(_) => rng.random_range(0..n),
        };
        centroids.row_mut(c).assign(&data.row(idx));
        for (d, p) in dists.iter_mut().zip(data.rows()) {
            *d = d.min(sq_dist(p, centroids.row(c)));
        }
    }
    centroids
}

impl KMeans {
    pub fn run(&self, data: &Array2<f64>, k: usize, seed: u64) -> Result<Clustering> {
        let n = data.nrows();
        if n == 0 {
            bail!("k-means sem dados");
        }
        if k == 0 || k > n {
            bail!("número de clusters inválido: {} (deve estar entre 1 e {})", k, n);
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut centroids = init_plus_plus(data, k, &mut rng);
        let mut labels = vec![usize::MAX; n];
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;

            let mut changed = false;
            for (label, point) in labels.iter_mut().zip(data.rows()) {
                let best = nearest(point, &centroids);
                if best != *label {
                    *label = best;
                    changed = true;
                }
            }

            let mut sums = Array2::<f64>::zeros(centroids.dim());
            let mut counts = vec![0usize; k];
            for (&label, point) in labels.iter().zip(data.rows()) {
                let mut row = sums.row_mut(label);
                row += &point;
                counts[label] += 1;
            }

            let mut shift: f64 = 0.0;
            for (j, &count) in counts.iter().enumerate() {
                // empty clusters keep their previous centroid
                if count == 0 {
                    continue;
                }
                let mean = sums.row(j).mapv(|v| v / count as f64);
                shift = shift.max(sq_dist(mean.view(), centroids.row(j)));
                centroids.row_mut(j).assign(&mean);
            }

            if !changed || shift < self.tolerance {
                break;
            }
        }

        log::debug!("k-means: k={}, {} iterações", k, iterations);
        Ok(Clustering {
            labels,
            centroids,
            iterations,
        })
    }
}

impl ClusterBackend for KMeans {
    fn name(&self) -> &str {
        "k-means"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn fit(&self, data: &Array2<f64>, k: usize, seed: u64) -> Result<Clustering> {
        self.run(data, k, seed)
    }
}
