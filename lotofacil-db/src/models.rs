use std::fmt;

use anyhow::{Result, bail};
use chrono::NaiveDate;

/// Lotofácil balls are numbered 1..=25.
pub const POOL_SIZE: usize = 25;
/// Every draw (and every generated game) holds 15 balls.
pub const PICK_COUNT: usize = 15;

/// One historical result. `numbers` is always sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub contest: Option<String>,
    pub date: Option<NaiveDate>,
    pub numbers: [u8; PICK_COUNT],
}

impl Draw {
    pub fn new(mut numbers: [u8; PICK_COUNT]) -> Result<Self> {
        validate_numbers(&numbers)?;
        numbers.sort_unstable();
        Ok(Draw {
            contest: None,
            date: None,
            numbers,
        })
    }

    pub fn with_metadata(mut self, contest: Option<String>, date: Option<NaiveDate>) -> Self {
        self.contest = contest;
        self.date = date;
        self
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    pub fn even_count(&self) -> usize {
        self.numbers.iter().filter(|&&n| n % 2 == 0).count()
    }

    /// Balls shared with another draw.
    pub fn overlap(&self, other: &Draw) -> usize {
        self.numbers.iter().filter(|&&n| other.contains(n)).count()
    }
}

/// A generated game: 15 distinct numbers in 1..=25, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateSet([u8; PICK_COUNT]);

impl CandidateSet {
    /// Sorts and deduplicates `numbers`; fails unless exactly 15 valid numbers remain.
    pub fn new(numbers: impl IntoIterator<Item = u8>) -> Result<Self> {
        let mut values: Vec<u8> = numbers.into_iter().collect();
        values.sort_unstable();
        values.dedup();

        if let Some(&n) = values.iter().find(|&&n| !in_domain(n)) {
            bail!("Número {} fora do intervalo (1-{})", n, POOL_SIZE);
        }
        if values.len() != PICK_COUNT {
            bail!(
                "Jogo inválido : {} números distintos, {} esperados",
                values.len(),
                PICK_COUNT
            );
        }

        let mut arr = [0u8; PICK_COUNT];
        arr.copy_from_slice(&values);
        Ok(CandidateSet(arr))
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.0
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }

    pub fn even_count(&self) -> usize {
        self.0.iter().filter(|&&n| n % 2 == 0).count()
    }
}

impl fmt::Display for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", n)?;
        }
        write!(f, "]")
    }
}

fn in_domain(n: u8) -> bool {
    n >= 1 && n as usize <= POOL_SIZE
}

pub fn validate_numbers(numbers: &[u8; PICK_COUNT]) -> Result<()> {
    for &n in numbers {
        if !in_domain(n) {
            bail!("Bola {} fora do intervalo (1-{})", n, POOL_SIZE);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Bola repetida : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

/// Deterministic, valid draws for tests: draw `i` holds 15 consecutive
/// numbers (wrapping at 25) starting at a position that moves by 7.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let start = (i * 7) % POOL_SIZE;
            let mut numbers = [0u8; PICK_COUNT];
            for (j, slot) in numbers.iter_mut().enumerate() {
                *slot = ((start + j) % POOL_SIZE + 1) as u8;
            }
            numbers.sort_unstable();
            Draw {
                contest: Some(format!("{}", i + 1)),
                date: None,
                numbers,
            }
        })
        .collect()
}
