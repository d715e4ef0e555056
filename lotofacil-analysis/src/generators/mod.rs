pub mod cluster;
pub mod frequency;
pub mod multifactor;
pub mod parity;
pub mod pattern;
pub mod range;
pub mod repetition;
pub mod sequence;

use anyhow::Result;
use rayon::prelude::*;

use lotofacil_db::history::History;
use lotofacil_db::models::{CandidateSet, PICK_COUNT};

use crate::adapters::Backends;
use crate::config::AnalysisConfig;

/// Numbers picked by a generator plus the lines explaining the pick.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub numbers: Vec<u8>,
    pub details: Vec<String>,
}

/// What every generator returns: a game, or no game and the reason why.
#[derive(Debug, Clone, PartialEq)]
pub struct GameOutcome {
    pub name: String,
    pub label: String,
    pub set: Option<CandidateSet>,
    pub details: Vec<String>,
}

impl GameOutcome {
    pub fn is_empty(&self) -> bool {
        self.set.is_none()
    }
}

pub trait GameGenerator: Send + Sync {
    fn name(&self) -> &str;
    /// Human-readable title used in reports.
    fn label(&self) -> &str;
    fn min_draws(&self) -> usize {
        1
    }
    fn select(&self, history: &History) -> Result<Selection>;

    /// Runs `select` and turns every failure into an empty outcome.
    fn generate(&self, history: &History) -> GameOutcome {
        let mut outcome = GameOutcome {
            name: self.name().to_string(),
            label: self.label().to_string(),
            set: None,
            details: Vec::new(),
        };

        if history.len() < self.min_draws() {
            outcome.details.push(format!(
                "Histórico insuficiente : {} sorteio(s), mínimo {}",
                history.len(),
                self.min_draws()
            ));
            log::warn!("{} : {}", self.name(), outcome.details[0]);
            return outcome;
        }

        match self.select(history) {
            Ok(selection) => {
                outcome.details = selection.details;
                match CandidateSet::new(selection.numbers) {
                    Ok(set) => {
                        log::info!("{} : {}", self.name(), set);
                        outcome.set = Some(set);
                    }
                    Err(e) => {
                        log::error!("{} produziu um jogo inválido : {:#}", self.name(), e);
                        outcome.details.push(format!("Jogo inválido : {:#}", e));
                    }
                }
            }
            Err(e) => {
                log::warn!("{} : {:#}", self.name(), e);
                outcome.details.push(format!("{:#}", e));
            }
        }
        outcome
    }
}

/// Generators in report order. ML generators are left out when
/// `config.include_ml` is false.
pub fn all_generators(config: &AnalysisConfig, backends: Backends) -> Vec<Box<dyn GameGenerator>> {
    let mut generators: Vec<Box<dyn GameGenerator>> = vec![
        Box::new(frequency::MostFrequent),
        Box::new(frequency::LeastFrequent),
        Box::new(pattern::PatternProbability),
        Box::new(parity::ParityBalanced),
        Box::new(repetition::Repetition),
        Box::new(range::RangeDistribution),
        Box::new(multifactor::MultiFactor::new(config.recent_window, config.hot_window)),
    ];
    if config.include_ml {
        generators.push(Box::new(cluster::Clustering::new(
            backends.cluster,
            config.clusters,
            config.seed,
        )));
        generators.push(Box::new(sequence::SequencePrediction::new(
            backends.sequence,
            config.sequence_window,
        )));
    }
    generators
}

/// Runs every generator on the same history. Outcomes come back in
/// generator order whether or not they ran in parallel.
pub fn run_all(history: &History, generators: &[Box<dyn GameGenerator>], parallel: bool) -> Vec<GameOutcome> {
    if parallel {
        generators.par_iter().map(|g| g.generate(history)).collect()
    } else {
        generators.iter().map(|g| g.generate(history)).collect()
    }
}

/// First `PICK_COUNT` entries of a ranking.
pub(crate) fn top(ranked: &[u8]) -> Vec<u8> {
    ranked.iter().take(PICK_COUNT).copied().collect()
}

pub(crate) fn format_numbers(numbers: &[u8]) -> String {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    format!("{:?}", sorted)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::adapters::{ClusterBackend, Clustering, SequenceBackend};
    use lotofacil_db::models::{Draw, make_test_draws};
    use ndarray::Array2;

    /// Three draws: 1-3 drawn every time, 12-15 and 21-24 once.
    pub fn sample_history() -> History {
        History::from_numbers(&[
            [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
            [1, 2, 3, 4, 5, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25],
            [1, 2, 3, 6, 7, 8, 9, 10, 11, 16, 17, 18, 19, 20, 25],
        ])
        .unwrap()
    }

    pub struct FixedSequence(pub Vec<f64>);

    impl SequenceBackend for FixedSequence {
        fn name(&self) -> &str {
            "fixed"
        }
        fn is_available(&self) -> bool {
            true
        }
        fn fit_predict(&self, _draws: &[Draw], _window: usize) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }
    }

    pub struct FirstCluster;

    impl ClusterBackend for FirstCluster {
        fn name(&self) -> &str {
            "first"
        }
        fn is_available(&self) -> bool {
            true
        }
        fn fit(&self, data: &Array2<f64>, k: usize, _seed: u64) -> Result<Clustering> {
            let mut centroids = Array2::zeros((k, data.ncols()));
            centroids.row_mut(0).assign(&data.row(0));
            Ok(Clustering {
                labels: vec![0; data.nrows()],
                centroids,
                iterations: 1,
            })
        }
    }

    fn fake_backends() -> Backends {
        Backends {
            cluster: Box::new(FirstCluster),
            sequence: Box::new(FixedSequence((1..=25).map(|n| n as f64 / 25.0).collect())),
        }
    }

    #[test]
    fn test_every_generator_returns_fifteen_distinct() {
        let history = History::new(make_test_draws(40));
        let generators = all_generators(&AnalysisConfig::default(), fake_backends());
        assert_eq!(generators.len(), 9);
        for outcome in run_all(&history, &generators, false) {
            let set = outcome.set.as_ref().unwrap_or_else(|| panic!("{} empty: {:?}", outcome.name, outcome.details));
            assert_eq!(set.numbers().len(), 15);
            assert!(set.numbers().windows(2).all(|w| w[0] < w[1]), "{}", outcome.name);
        }
    }

    #[test]
    fn test_generators_are_idempotent() {
        let history = History::new(make_test_draws(40));
        let generators = all_generators(&AnalysisConfig::default(), Backends::default());
        let first = run_all(&history, &generators, false);
        let second = run_all(&history, &generators, false);
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let history = History::new(make_test_draws(30));
        let generators = all_generators(&AnalysisConfig::default(), fake_backends());
        assert_eq!(run_all(&history, &generators, true), run_all(&history, &generators, false));
    }

    #[test]
    fn test_skip_ml() {
        let config = AnalysisConfig { include_ml: false, ..AnalysisConfig::default() };
        let generators = all_generators(&config, Backends::default());
        assert_eq!(generators.len(), 7);
    }

    #[test]
    fn test_empty_history_degrades() {
        let generators = all_generators(&AnalysisConfig::default(), fake_backends());
        for outcome in run_all(&History::default(), &generators, false) {
            assert!(outcome.is_empty(), "{}", outcome.name);
            assert!(outcome.details[0].contains("insuficiente"));
        }
    }

    #[test]
    fn test_short_history_sequence_is_empty() {
        let history = History::new(make_test_draws(10));
        let generators = all_generators(&AnalysisConfig::default(), fake_backends());
        let outcomes = run_all(&history, &generators, false);
        let sequence = outcomes.iter().find(|o| o.name == "sequencia").unwrap();
        assert!(sequence.is_empty());
        assert!(outcomes.iter().filter(|o| o.name != "sequencia").all(|o| !o.is_empty()));
    }

    struct Broken;

    impl GameGenerator for Broken {
        fn name(&self) -> &str {
            "broken"
        }
        fn label(&self) -> &str {
            "Quebrado"
        }
        fn select(&self, _history: &History) -> Result<Selection> {
            Ok(Selection { numbers: vec![1, 2, 3], details: vec!["três".to_string()] })
        }
    }

    #[test]
    fn test_invalid_selection_is_reported() {
        let outcome = Broken.generate(&sample_history());
        assert!(outcome.is_empty());
        assert_eq!(outcome.details.len(), 2);
        assert!(outcome.details[1].contains("inválido"));
    }
}
