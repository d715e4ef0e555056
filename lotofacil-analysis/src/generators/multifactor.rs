use anyhow::Result;

use lotofacil_db::history::History;

use super::{GameGenerator, Selection, top};
use crate::scoring::{multi_factor_scores, rank_by_score};

/// Top 15 by the blended multi-factor score.
pub struct MultiFactor {
    recent_window: usize,
    hot_window: usize,
}

impl MultiFactor {
    pub fn new(recent_window: usize, hot_window: usize) -> Self {
        Self {
            recent_window,
            hot_window,
        }
    }
}

impl GameGenerator for MultiFactor {
    fn name(&self) -> &str {
        "multifatorial"
    }

    fn label(&self) -> &str {
        "Scoring Multifatorial"
    }

    fn select(&self, history: &History) -> Result<Selection> {
        let scores = multi_factor_scores(history.draws(), self.recent_window, self.hot_window);
        let totals: Vec<f64> = scores.iter().map(|s| s.total).collect();
        let numbers = top(&rank_by_score(&totals));

        let mut details = vec![format!(
            "Janelas: recente {} sorteios, quente {} sorteios",
            self.recent_window, self.hot_window
        )];
        details.extend(numbers.iter().enumerate().map(|(i, &n)| {
            let s = &scores[(n - 1) as usize];
            format!(
                "{:2}. Número {:2}: {:5.1} pontos (Total: {}, Recente: {})",
                i + 1,
                n,
                s.total,
                s.overall_count,
                s.recent_count
            )
        }));

        Ok(Selection { numbers, details })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::tests::sample_history;

    #[test]
    fn test_multifactor_sample() {
        // 1-3 score 80, 4-5 about 76.7, then the twelve numbers drawn twice
        let outcome = MultiFactor::new(50, 5).generate(&sample_history());
        let set = outcome.set.unwrap();
        assert_eq!(set.numbers(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 16, 17, 18, 19]);
        assert_eq!(outcome.details.len(), 16);
        assert_eq!(outcome.details[1], " 1. Número  1:  80.0 pontos (Total: 3, Recente: 3)");
    }

    #[test]
    fn test_multifactor_single_draw() {
        let history = History::from_numbers(&[[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]]).unwrap();
        let set = MultiFactor::new(50, 5).generate(&history).set.unwrap();
        assert_eq!(set.numbers(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
    }
}
