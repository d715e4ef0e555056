use anyhow::Result;

use lotofacil_db::history::History;
use lotofacil_db::models::{Draw, PICK_COUNT, POOL_SIZE};

use super::{GameGenerator, Selection, format_numbers};
use crate::frequency::FrequencyTable;

const BAND_WIDTH: u8 = 5;
const BANDS: usize = POOL_SIZE / BAND_WIDTH as usize;

/// Picks from each band of five numbers as many as the band usually holds.
pub struct RangeDistribution;

fn band_members(band: usize) -> std::ops::RangeInclusive<u8> {
    let start = band as u8 * BAND_WIDTH + 1;
    start..=start + BAND_WIDTH - 1
}

fn band_label(band: usize) -> String {
    let members = band_members(band);
    format!("{:02}-{:02}", members.start(), members.end())
}

/// Mean count of drawn numbers per band.
pub fn band_means(draws: &[Draw]) -> [f64; BANDS] {
    let mut sums = [0usize; BANDS];
    for draw in draws {
        for &n in &draw.numbers {
            sums[((n - 1) / BAND_WIDTH) as usize] += 1;
        }
    }
    let mut means = [0.0; BANDS];
    if !draws.is_empty() {
        for (mean, &sum) in means.iter_mut().zip(&sums) {
            *mean = sum as f64 / draws.len() as f64;
        }
    }
    means
}

/// Quotas round half to even.
pub fn band_quotas(means: &[f64; BANDS]) -> [usize; BANDS] {
    let mut quotas = [0usize; BANDS];
    for (quota, &mean) in quotas.iter_mut().zip(means) {
        *quota = (mean.round_ties_even() as usize).min(BAND_WIDTH as usize);
    }
    quotas
}

impl GameGenerator for RangeDistribution {
    fn name(&self) -> &str {
        "distribuicao"
    }

    fn label(&self) -> &str {
        "Distribuição Espacial"
    }

    fn select(&self, history: &History) -> Result<Selection> {
        let table = FrequencyTable::from_draws(history.draws());
        let means = band_means(history.draws());
        let quotas = band_quotas(&means);
        log::debug!("cotas por faixa : {:?}", quotas);

        let mut details = vec!["Distribuição média por faixa:".to_string()];
        let mut numbers = Vec::with_capacity(PICK_COUNT);
        for band in 0..BANDS {
            details.push(format!(
                "  Faixa {}: {} números (média: {:.2})",
                band_label(band),
                quotas[band],
                means[band]
            ));
            numbers.extend(table.rank_desc(band_members(band)).into_iter().take(quotas[band]));
        }

        let planned: usize = quotas.iter().sum();
        if planned < PICK_COUNT {
            let padding: Vec<u8> = table
                .ranked_desc()
                .into_iter()
                .filter(|n| !numbers.contains(n))
                .take(PICK_COUNT - planned)
                .collect();
            details.push(format!(
                "Cotas somam {}: completado com {}",
                planned,
                format_numbers(&padding)
            ));
            numbers.extend(padding);
        } else if planned > PICK_COUNT {
            let mut kept = table.rank_desc(numbers.iter().copied());
            let dropped = kept.split_off(PICK_COUNT);
            details.push(format!(
                "Cotas somam {}: removidos {}",
                planned,
                format_numbers(&dropped)
            ));
            numbers = kept;
        }

        for band in 0..BANDS {
            let members = band_members(band);
            let in_band: Vec<u8> = numbers.iter().copied().filter(|n| members.contains(n)).collect();
            details.push(format!("  Faixa {}: {}", band_label(band), format_numbers(&in_band)));
        }

        Ok(Selection { numbers, details })
    }
}
