use anyhow::Result;

use lotofacil_db::history::History;
use lotofacil_db::models::{Draw, PICK_COUNT};

use super::{GameGenerator, Selection, format_numbers};
use crate::frequency::{FrequencyTable, all_numbers};

/// Most frequent numbers arranged in the historically most common
/// even/odd split.
pub struct ParityBalanced;

/// Most common even-count among the draws and how often it occurred.
/// Ties go to the largest even-count.
pub fn dominant_even_count(draws: &[Draw]) -> (usize, usize) {
    let mut occurrences = [0usize; PICK_COUNT + 1];
    for draw in draws {
        occurrences[draw.even_count()] += 1;
    }

    let mut best = (0, 0);
    for (evens, &count) in occurrences.iter().enumerate() {
        if count > 0 && count >= best.1 {
            best = (evens, count);
        }
    }
    best
}

impl GameGenerator for ParityBalanced {
    fn name(&self) -> &str {
        "pares-impares"
    }

    fn label(&self) -> &str {
        "Equilíbrio Par/Ímpar"
    }

    fn select(&self, history: &History) -> Result<Selection> {
        let (evens, occurrences) = dominant_even_count(history.draws());
        let odds = PICK_COUNT - evens;
        log::debug!("paridade dominante : {evens} pares / {odds} ímpares");

        let table = FrequencyTable::from_draws(history.draws());
        let even_ranked = table.rank_desc(all_numbers().filter(|n| n % 2 == 0));
        let odd_ranked = table.rank_desc(all_numbers().filter(|n| n % 2 == 1));

        let chosen_even: Vec<u8> = even_ranked.into_iter().take(evens).collect();
        let chosen_odd: Vec<u8> = odd_ranked.into_iter().take(odds).collect();
        let mut numbers = chosen_even.clone();
        numbers.extend(&chosen_odd);

        let share = occurrences as f64 / history.len() as f64 * 100.0;
        let details = vec![
            format!("Distribuição mais comum: {} pares e {} ímpares", evens, odds),
            format!("Ocorreu {} vezes ({:.1}%)", occurrences, share),
            format!("Pares: {}", format_numbers(&chosen_even)),
            format!("Ímpares: {}", format_numbers(&chosen_odd)),
        ];

        Ok(Selection { numbers, details })
    }
}
