use lotofacil_db::models::{Draw, POOL_SIZE};

/// Occurrence counts of numbers 1..=25 over a slice of draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; POOL_SIZE],
}

impl FrequencyTable {
    pub fn from_draws(draws: &[Draw]) -> Self {
        let mut counts = [0u32; POOL_SIZE];
        for draw in draws {
            for &n in &draw.numbers {
                counts[(n - 1) as usize] += 1;
            }
        }
        FrequencyTable { counts }
    }

    pub fn count(&self, number: u8) -> u32 {
        self.counts[(number - 1) as usize]
    }

    pub fn counts(&self) -> &[u32; POOL_SIZE] {
        &self.counts
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `numbers` ordered by count, highest first. The sort is stable, so
    /// equal counts keep the order they came in.
    pub fn rank_desc(&self, numbers: impl IntoIterator<Item = u8>) -> Vec<u8> {
        let mut ranked: Vec<u8> = numbers.into_iter().collect();
        ranked.sort_by(|&a, &b| self.count(b).cmp(&self.count(a)));
        ranked
    }

    /// `numbers` ordered by count, lowest first (stable).
    pub fn rank_asc(&self, numbers: impl IntoIterator<Item = u8>) -> Vec<u8> {
        let mut ranked: Vec<u8> = numbers.into_iter().collect();
        ranked.sort_by_key(|&n| self.count(n));
        ranked
    }

    /// All 25 numbers, most frequent first, ties by ascending number.
    pub fn ranked_desc(&self) -> Vec<u8> {
        self.rank_desc(all_numbers())
    }

    /// All 25 numbers, least frequent first, ties by ascending number.
    pub fn ranked_asc(&self) -> Vec<u8> {
        self.rank_asc(all_numbers())
    }
}

pub fn all_numbers() -> impl Iterator<Item = u8> {
    1..=POOL_SIZE as u8
}
