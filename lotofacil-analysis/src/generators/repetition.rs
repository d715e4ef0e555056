use anyhow::Result;

use lotofacil_db::history::History;
use lotofacil_db::models::{Draw, PICK_COUNT};

use super::{GameGenerator, Selection, format_numbers};
use crate::frequency::{FrequencyTable, all_numbers};

/// Repeats as many numbers from the last draw as consecutive draws usually
/// share, completes with frequent numbers outside it.
pub struct Repetition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatStats {
    /// Mean shared count across consecutive pairs, truncated.
    pub mean: usize,
    pub min: usize,
    pub max: usize,
}

pub fn repeat_stats(draws: &[Draw]) -> Option<RepeatStats> {
    let overlaps: Vec<usize> = draws.windows(2).map(|w| w[0].overlap(&w[1])).collect();
    let min = *overlaps.iter().min()?;
    let max = *overlaps.iter().max()?;
    Some(RepeatStats {
        mean: overlaps.iter().sum::<usize>() / overlaps.len(),
        min,
        max,
    })
}

impl GameGenerator for Repetition {
    fn name(&self) -> &str {
        "repeticoes"
    }

    fn label(&self) -> &str {
        "Repetições"
    }

    fn min_draws(&self) -> usize {
        2
    }

    fn select(&self, history: &History) -> Result<Selection> {
        let (Some(stats), Some(last)) = (repeat_stats(history.draws()), history.last()) else {
            anyhow::bail!("São necessários pelo menos 2 sorteios");
        };
        log::debug!("repetições : {:?}", stats);

        // ranked without the last draw so it does not inflate its own numbers
        let table = FrequencyTable::from_draws(history.without_last());
        let from_last = table.rank_desc(last.numbers);
        let outside = table.rank_desc(all_numbers().filter(|&n| !last.contains(n)));

        // two 15-of-25 draws always share at least 5 numbers, so the 10
        // numbers outside the last draw are enough to complete the game
        let repeated: Vec<u8> = from_last.iter().take(stats.mean).copied().collect();
        let fresh: Vec<u8> = outside
            .iter()
            .take(PICK_COUNT - repeated.len())
            .copied()
            .collect();

        let mut numbers = repeated.clone();
        numbers.extend(&fresh);

        let details = vec![
            format!("Média de números que repetem: {}", stats.mean),
            format!("Mínimo: {} | Máximo: {}", stats.min, stats.max),
            format!("Último sorteio: {}", format_numbers(&last.numbers)),
            format!("Repetidos do último: {}", format_numbers(&repeated)),
            format!("Números novos: {}", format_numbers(&fresh)),
        ];

        Ok(Selection { numbers, details })
    }
}
