use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use lotofacil_analysis::generators::GameOutcome;

const TITLE: &str = "JOGOS LOTOFÁCIL GERADOS";

/// One line per generator, numbered in report order.
pub fn render_report(outcomes: &[GameOutcome]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out, "{}\n", "=".repeat(50));
    for (i, outcome) in outcomes.iter().enumerate() {
        let _ = writeln!(out, "{}", report_line(i + 1, outcome));
    }
    out
}

pub fn report_line(index: usize, outcome: &GameOutcome) -> String {
    let head = format!("Jogo {} ({}):", index, outcome.label);
    match &outcome.set {
        Some(set) => format!("{head} {set}"),
        None => {
            let reason = outcome.details.last().map(String::as_str).unwrap_or("sem detalhes");
            format!("{head} indisponível - {reason}")
        }
    }
}

pub fn write_report(path: &Path, outcomes: &[GameOutcome]) -> Result<()> {
    fs::write(path, render_report(outcomes))
        .with_context(|| format!("Impossível gravar {}", path.display()))?;
    log::info!("relatório gravado em {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotofacil_db::models::CandidateSet;

    fn outcome(label: &str, set: Option<CandidateSet>, details: &[&str]) -> GameOutcome {
        GameOutcome {
            name: label.to_lowercase(),
            label: label.to_string(),
            set,
            details: details.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_report() {
        let set = CandidateSet::new(1..=15).unwrap();
        let outcomes = vec![
            outcome("Mais sorteados", Some(set), &["Número  1: 3 vezes"]),
            outcome("Predição Sequencial", None, &["Histórico insuficiente : 3 sorteio(s), mínimo 11"]),
        ];
        let text = render_report(&outcomes);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "JOGOS LOTOFÁCIL GERADOS");
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2], "");
        assert_eq!(
            lines[3],
            "Jogo 1 (Mais sorteados): [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]"
        );
        assert_eq!(
            lines[4],
            "Jogo 2 (Predição Sequencial): indisponível - Histórico insuficiente : 3 sorteio(s), mínimo 11"
        );
    }

    #[test]
    fn test_empty_outcome_without_details() {
        let line = report_line(8, &outcome("Clustering K-means", None, &[]));
        assert_eq!(line, "Jogo 8 (Clustering K-means): indisponível - sem detalhes");
    }

    #[test]
    fn test_write_report() {
        let path = std::env::temp_dir().join(format!("lotofacil_report_{}.txt", std::process::id()));
        let outcomes = vec![outcome("Repetições", CandidateSet::new(11..=25).ok(), &[])];
        write_report(&path, &outcomes).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("Jogo 1 (Repetições): [11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25]\n"));
        fs::remove_file(&path).unwrap();
    }
}
