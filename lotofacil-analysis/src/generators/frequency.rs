use anyhow::Result;

use lotofacil_db::history::History;

use super::{GameGenerator, Selection, format_numbers, top};
use crate::frequency::FrequencyTable;

/// The 15 numbers drawn most often.
pub struct MostFrequent;

/// The 15 numbers drawn least often.
pub struct LeastFrequent;

fn count_lines(table: &FrequencyTable, numbers: &[u8]) -> Vec<String> {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    let mut lines = vec![format!("Números: {}", format_numbers(&sorted))];
    lines.extend(
        sorted
            .iter()
            .map(|&n| format!("Número {:2}: {:4} vezes", n, table.count(n))),
    );
    lines
}

impl GameGenerator for MostFrequent {
    fn name(&self) -> &str {
        "mais-sorteados"
    }

    fn label(&self) -> &str {
        "Mais sorteados"
    }

    fn select(&self, history: &History) -> Result<Selection> {
        let table = FrequencyTable::from_draws(history.draws());
        let numbers = top(&table.ranked_desc());
        let details = count_lines(&table, &numbers);
        Ok(Selection { numbers, details })
    }
}

impl GameGenerator for LeastFrequent {
    fn name(&self) -> &str {
        "menos-sorteados"
    }

    fn label(&self) -> &str {
        "Menos sorteados"
    }

    fn select(&self, history: &History) -> Result<Selection> {
        let table = FrequencyTable::from_draws(history.draws());
        let numbers = top(&table.ranked_asc());
        let details = count_lines(&table, &numbers);
        Ok(Selection { numbers, details })
    }
}
