use std::path::Path;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use lotofacil_analysis::frequency::FrequencyTable;
use lotofacil_analysis::generators::GameOutcome;
use lotofacil_analysis::runs::RunStats;
use lotofacil_db::history::{EXPECTED_SHAPE, LoadReport};
use lotofacil_db::models::Draw;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_load_summary(path: &Path, report: &LoadReport) {
    println!("Arquivo: {}", path.display());
    println!("  Linhas lidas      : {}", report.total_rows);
    println!("  Sorteios válidos  : {}", report.accepted);
    if report.rejected > 0 {
        println!("  Linhas ignoradas  : {} (formato esperado: {})", report.rejected, EXPECTED_SHAPE);
    }
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Nenhum sorteio para exibir.");
        return;
    }

    let mut table = new_table(vec!["Concurso", "Data", "Dezenas", "Pares"]);
    for draw in draws {
        let date = draw
            .date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            draw.contest.clone().unwrap_or_else(|| "-".to_string()),
            date,
            join_numbers(&draw.numbers),
            draw.even_count().to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_stats(table: &FrequencyTable, stats: &[RunStats], total: usize) {
    println!("\n📊 Estatísticas sobre {} sorteios\n", total);

    let mut out = new_table(vec![
        "Número",
        "Frequência",
        "%",
        "Seq. média",
        "Seq. máx.",
        "Aus. média",
        "Aus. máx.",
        "Situação",
    ]);

    for n in table.ranked_desc() {
        let st = &stats[(n - 1) as usize];
        let status = if st.appeared_last() {
            Cell::new(format!("presente há {}", st.current_presence)).fg(Color::Green)
        } else {
            Cell::new(format!("ausente há {}", st.current_absence)).fg(Color::Red)
        };
        out.add_row(vec![
            Cell::new(format!("{:2}", n)),
            Cell::new(table.count(n)),
            Cell::new(format!("{:.1}", table.count(n) as f64 / total as f64 * 100.0)),
            Cell::new(format!("{:.2}", st.mean_presence())),
            Cell::new(st.max_presence()),
            Cell::new(format!("{:.2}", st.mean_absence())),
            Cell::new(st.max_absence()),
            status,
        ]);
    }
    println!("{out}");
}

pub fn display_run_detail(stats: &RunStats) {
    println!("\n── Número {} ──", stats.number);
    println!("  Sorteios analisados  : {}", stats.total_draws);
    println!("  Aparições            : {}", stats.total_appearances);
    println!(
        "  Sequências presentes : {:?} (média {:.2}, máx. {})",
        stats.presence_runs,
        stats.mean_presence(),
        stats.max_presence()
    );
    println!(
        "  Sequências ausentes  : {:?} (média {:.2}, máx. {})",
        stats.absence_runs,
        stats.mean_absence(),
        stats.max_absence()
    );
    if stats.appeared_last() {
        println!("  Situação atual       : presente há {} sorteio(s)", stats.current_presence);
    } else if stats.current_absence > 0 {
        println!("  Situação atual       : ausente há {} sorteio(s)", stats.current_absence);
    }
}

pub fn display_outcomes(outcomes: &[GameOutcome]) {
    for (i, outcome) in outcomes.iter().enumerate() {
        println!("\n{}", "=".repeat(60));
        println!("JOGO {}: {}", i + 1, outcome.label.to_uppercase());
        println!("{}", "=".repeat(60));
        for line in &outcome.details {
            println!("{line}");
        }
        match &outcome.set {
            Some(set) => println!("\nJogo selecionado: {set}"),
            None => println!("\nJogo indisponível"),
        }
    }
}

pub fn display_summary(outcomes: &[GameOutcome]) {
    println!("\n🎲 Resumo dos jogos\n");

    let mut table = new_table(vec!["#", "Estratégia", "Dezenas", "Pares"]);
    for (i, outcome) in outcomes.iter().enumerate() {
        let (numbers, evens) = match &outcome.set {
            Some(set) => (Cell::new(join_numbers(set.numbers())), set.even_count().to_string()),
            None => (Cell::new("indisponível").fg(Color::Yellow), "-".to_string()),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&outcome.label),
            numbers,
            Cell::new(evens),
        ]);
    }
    println!("{table}");
}
