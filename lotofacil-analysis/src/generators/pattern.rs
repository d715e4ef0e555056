use anyhow::Result;

use lotofacil_db::history::History;

use super::{GameGenerator, Selection, format_numbers, top};
use crate::runs::analyze_all;
use crate::scoring::{pattern_score, rank_by_score};

/// Top 15 numbers by run-length pattern score.
pub struct PatternProbability;

impl GameGenerator for PatternProbability {
    fn name(&self) -> &str {
        "padrao"
    }

    fn label(&self) -> &str {
        "Padrão/Probabilidade"
    }

    fn select(&self, history: &History) -> Result<Selection> {
        let stats = analyze_all(history.draws());
        let scores: Vec<f64> = stats.iter().map(pattern_score).collect();
        let numbers = top(&rank_by_score(&scores));

        let mut details = Vec::with_capacity(numbers.len() * 2 + 1);
        for &n in &numbers {
            let st = &stats[(n - 1) as usize];
            let (status, streak) = if st.appeared_last() {
                ("PRESENTE", st.current_presence)
            } else {
                ("AUSENTE", st.current_absence)
            };
            details.push(format!(
                "Número {:2}: Score {:5.1} | {} há {} sorteio(s)",
                n,
                scores[(n - 1) as usize],
                status,
                streak
            ));
            details.push(format!(
                "  Média presente: {:.1} | Média ausente: {:.1}",
                st.mean_presence(),
                st.mean_absence()
            ));
        }
        details.push(format!("Números selecionados: {}", format_numbers(&numbers)));

        Ok(Selection { numbers, details })
    }
}
