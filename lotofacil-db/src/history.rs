use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use crate::models::{Draw, PICK_COUNT};

pub const EXPECTED_SHAPE: &str =
    "CSV separado por ';' com cabeçalho Concurso;Data Sorteio;Bola1;Bola2;...;Bola15 (uma linha por sorteio)";

/// Past draws in chronological order (oldest first). Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    draws: Vec<Draw>,
}

impl History {
    pub fn new(draws: Vec<Draw>) -> Self {
        History { draws }
    }

    /// Convenience for fixtures: every row must be a valid draw.
    pub fn from_numbers(rows: &[[u8; PICK_COUNT]]) -> Result<Self> {
        let draws = rows
            .iter()
            .map(|row| Draw::new(*row))
            .collect::<Result<Vec<_>>>()?;
        Ok(History { draws })
    }

    /// Builds the history from raw rows, dropping every row that does not
    /// yield exactly 15 distinct balls in 1..=25. Row order is preserved.
    pub fn from_rows(rows: impl IntoIterator<Item = RawRow>) -> (History, LoadReport) {
        let mut report = LoadReport::default();
        let mut draws = Vec::new();

        for (i, row) in rows.into_iter().enumerate() {
            report.total_rows += 1;
            match row.to_draw() {
                Ok(draw) => {
                    draws.push(draw);
                    report.accepted += 1;
                }
                Err(e) => {
                    log::warn!("Linha {} ignorada : {:#}", i + 1, e);
                    report.rejected += 1;
                }
            }
        }

        (History { draws }, report)
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn last(&self) -> Option<&Draw> {
        self.draws.last()
    }

    /// The most recent `n` draws (all of them when `n` exceeds the length).
    pub fn tail(&self, n: usize) -> &[Draw] {
        let start = self.draws.len().saturating_sub(n);
        &self.draws[start..]
    }

    /// Every draw except the most recent one.
    pub fn without_last(&self) -> &[Draw] {
        let end = self.draws.len().saturating_sub(1);
        &self.draws[..end]
    }
}

/// One input row before validation. A `None` ball is a missing field.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub contest: Option<String>,
    pub date: Option<String>,
    pub balls: Vec<Option<String>>,
}

impl RawRow {
    pub fn from_fields<S: AsRef<str>>(balls: &[S]) -> Self {
        RawRow {
            contest: None,
            date: None,
            balls: balls.iter().map(|s| Some(s.as_ref().to_string())).collect(),
        }
    }

    fn to_draw(&self) -> Result<Draw> {
        let numbers = parse_balls(&self.balls)?;
        let date = self.date.as_deref().and_then(parse_date);
        Ok(Draw::new(numbers)?.with_metadata(self.contest.clone(), date))
    }
}

pub fn parse_balls(fields: &[Option<String>]) -> Result<[u8; PICK_COUNT]> {
    if fields.len() != PICK_COUNT {
        bail!("{} bolas encontradas, {} esperadas", fields.len(), PICK_COUNT);
    }
    let mut numbers = [0u8; PICK_COUNT];
    for (i, field) in fields.iter().enumerate() {
        let raw = field
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Bola{} ausente", i + 1))?;
        numbers[i] = raw
            .parse::<u8>()
            .with_context(|| format!("Bola{} não numérica : '{}'", i + 1, raw))?;
    }
    Ok(numbers)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y").ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: u32,
    pub accepted: u32,
    pub rejected: u32,
}

/// Header positions of the columns the loader reads.
struct ColumnLayout {
    contest: Option<usize>,
    date: Option<usize>,
    balls: Vec<usize>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::ByteRecord) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| latin1(h).trim().trim_start_matches('\u{feff}').to_string())
            .collect();
        let find = |wanted: &str| names.iter().position(|n| n.eq_ignore_ascii_case(wanted));

        let mut balls = Vec::with_capacity(PICK_COUNT);
        for i in 1..=PICK_COUNT {
            let col = format!("Bola{}", i);
            match find(&col) {
                Some(idx) => balls.push(idx),
                None => bail!("Coluna '{}' ausente. Formato esperado : {}", col, EXPECTED_SHAPE),
            }
        }

        Ok(ColumnLayout {
            contest: find("Concurso"),
            date: find("Data Sorteio"),
            balls,
        })
    }

    fn extract(&self, record: &csv::ByteRecord) -> RawRow {
        let get = |idx: usize| record.get(idx).map(latin1);
        RawRow {
            contest: self.contest.and_then(get).map(|s| s.trim().to_string()),
            date: self.date.and_then(get),
            balls: self.balls.iter().map(|&idx| get(idx)).collect(),
        }
    }
}

/// Latin-1 maps every byte to the code point of the same value.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

pub fn load_csv(path: &Path) -> Result<(History, LoadReport)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if matches!(ext.as_deref(), Some("xlsx") | Some("xls")) {
        bail!(
            "Planilha {:?} não suportada diretamente : exporte-a como {}",
            path,
            EXPECTED_SHAPE
        );
    }
    if !path.exists() {
        bail!("Arquivo {:?} não encontrado. Formato esperado : {}", path, EXPECTED_SHAPE);
    }

    let file = File::open(path).with_context(|| format!("Impossível abrir {:?}", path))?;
    let loaded = load_from_reader(file).with_context(|| format!("Falha ao ler {:?}", path))?;
    log::info!(
        "{:?} : {} sorteios aceitos, {} linhas ignoradas",
        path,
        loaded.1.accepted,
        loaded.1.rejected
    );
    Ok(loaded)
}

pub fn load_from_reader<R: Read>(input: R) -> Result<(History, LoadReport)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(input);

    let headers = reader
        .byte_headers()
        .context("Cabeçalho ilegível")?
        .clone();
    let layout = ColumnLayout::from_headers(&headers)?;

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        match record {
            Ok(record) => rows.push(layout.extract(&record)),
            Err(e) => {
                log::warn!("Erro de leitura : {}", e);
                // an unreadable record still occupies a row slot and is rejected
                rows.push(RawRow::default());
            }
        }
    }

    Ok(History::from_rows(rows))
}
