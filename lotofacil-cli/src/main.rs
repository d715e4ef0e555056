mod display;
mod report;

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use lotofacil_analysis::adapters::Backends;
use lotofacil_analysis::config::AnalysisConfig;
use lotofacil_analysis::frequency::FrequencyTable;
use lotofacil_analysis::generators::{all_generators, run_all};
use lotofacil_analysis::runs::{analyze_all, analyze_runs};
use lotofacil_db::history::{History, LoadReport, load_csv};
use lotofacil_db::models::POOL_SIZE;

use crate::display::{
    display_draws, display_load_summary, display_outcomes, display_run_detail, display_stats, display_summary,
};

#[derive(Parser)]
#[command(name = "lotofacil", about = "Analisador de sorteios da Lotofácil")]
struct Cli {
    /// Logs detalhados (nível info)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Gerar os jogos com todas as estratégias
    Analyze {
        /// Histórico em CSV separado por ';'
        #[arg(short, long, default_value = "historico_lotofacil.csv")]
        file: PathBuf,

        /// Arquivo de saída dos jogos
        #[arg(short, long, default_value = "jogos_gerados.txt")]
        output: PathBuf,

        /// Não gravar o arquivo de saída
        #[arg(long)]
        no_report: bool,

        /// Número de clusters do K-means
        #[arg(long, default_value = "5")]
        clusters: usize,

        /// Seed para a reprodutibilidade
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Janela de sorteios recentes do scoring multifatorial
        #[arg(long, default_value = "50")]
        recent_window: usize,

        /// Janela de sorteios "quentes" do scoring multifatorial
        #[arg(long, default_value = "5")]
        hot_window: usize,

        /// Hiperparâmetros do modelo sequencial (JSON)
        #[arg(long)]
        esn_config: Option<PathBuf>,

        /// Ignorar as estratégias de machine learning
        #[arg(long)]
        skip_ml: bool,

        /// Executar as estratégias em paralelo
        #[arg(long)]
        parallel: bool,
    },

    /// Frequência e sequências de cada número
    Stats {
        #[arg(short, long, default_value = "historico_lotofacil.csv")]
        file: PathBuf,
    },

    /// Detalhar as sequências de presença/ausência de um número
    Runs {
        #[arg(short, long, default_value = "historico_lotofacil.csv")]
        file: PathBuf,

        /// Número entre 1 e 25
        number: u8,
    },

    /// Listar os últimos sorteios
    List {
        #[arg(short, long, default_value = "historico_lotofacil.csv")]
        file: PathBuf,

        /// Quantidade de sorteios a exibir
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Gravar a configuração padrão do modelo sequencial
    EsnConfig {
        #[arg(short, long, default_value = "esn_config.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Analyze {
            file,
            output,
            no_report,
            clusters,
            seed,
            recent_window,
            hot_window,
            esn_config,
            skip_ml,
            parallel,
        } => {
            let config = AnalysisConfig {
                recent_window,
                hot_window,
                clusters,
                seed,
                include_ml: !skip_ml,
                ..AnalysisConfig::default()
            };
            let report_path = (!no_report).then_some(output.as_path());
            cmd_analyze(&file, report_path, config, esn_config.as_deref(), parallel)
        }
        Command::Stats { file } => cmd_stats(&file),
        Command::Runs { file, number } => cmd_runs(&file, number),
        Command::List { file, last } => cmd_list(&file, last),
        Command::EsnConfig { output } => cmd_esn_config(&output),
    }
}

fn load(file: &Path) -> Result<(History, LoadReport)> {
    let (history, report) = load_csv(file)?;
    display_load_summary(file, &report);
    Ok((history, report))
}

#[cfg(feature = "esn")]
fn backends(esn_config: Option<&Path>, seed: u64) -> Result<Backends> {
    use lotofacil_analysis::adapters::esn::EsnBackend;
    use lotofacil_esn::config::EsnConfig;

    let config = match esn_config {
        Some(path) => EsnConfig::load(path)?,
        None => EsnConfig {
            seed,
            ..EsnConfig::default()
        },
    };
    Ok(Backends {
        sequence: Box::new(EsnBackend::new(config)),
        ..Backends::default()
    })
}

#[cfg(not(feature = "esn"))]
fn backends(esn_config: Option<&Path>, _seed: u64) -> Result<Backends> {
    if esn_config.is_some() {
        log::warn!("--esn-config ignorado: binário compilado sem a feature `esn`");
    }
    Ok(Backends::default())
}

fn cmd_analyze(
    file: &Path,
    report_path: Option<&Path>,
    config: AnalysisConfig,
    esn_config: Option<&Path>,
    parallel: bool,
) -> Result<()> {
    let (history, _) = load(file)?;
    if history.is_empty() {
        bail!("Nenhum sorteio válido em {}", file.display());
    }

    let generators = all_generators(&config, backends(esn_config, config.seed)?);
    let outcomes = run_all(&history, &generators, parallel);

    display_outcomes(&outcomes);
    display_summary(&outcomes);

    if let Some(path) = report_path {
        report::write_report(path, &outcomes)?;
        println!("\n✓ Jogos salvos em '{}'", path.display());
    }
    Ok(())
}

fn cmd_stats(file: &Path) -> Result<()> {
    let (history, _) = load(file)?;
    if history.is_empty() {
        println!("Nenhum sorteio para analisar.");
        return Ok(());
    }
    let table = FrequencyTable::from_draws(history.draws());
    display_stats(&table, &analyze_all(history.draws()), history.len());
    Ok(())
}

fn cmd_runs(file: &Path, number: u8) -> Result<()> {
    if !(1..=POOL_SIZE as u8).contains(&number) {
        bail!("Número {} fora do intervalo 1-{}", number, POOL_SIZE);
    }
    let (history, _) = load(file)?;
    display_run_detail(&analyze_runs(history.draws(), number));
    Ok(())
}

fn cmd_list(file: &Path, last: usize) -> Result<()> {
    let (history, _) = load(file)?;
    display_draws(history.tail(last));
    Ok(())
}

#[cfg(feature = "esn")]
fn cmd_esn_config(output: &Path) -> Result<()> {
    lotofacil_esn::config::EsnConfig::default().save(output)?;
    println!("Configuração gravada em '{}'", output.display());
    Ok(())
}

#[cfg(not(feature = "esn"))]
fn cmd_esn_config(_output: &Path) -> Result<()> {
    bail!("binário compilado sem a feature `esn`")
}
