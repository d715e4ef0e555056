use lotofacil_db::models::Draw;

use crate::frequency::all_numbers;

/// Presence/absence run statistics of one number over the history.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub number: u8,
    pub total_draws: usize,
    pub total_appearances: usize,
    pub presence_runs: Vec<usize>,
    pub absence_runs: Vec<usize>,
    /// Length of the streak the number is on as of the last draw if it was
    /// drawn, else 0.
    pub current_presence: usize,
    /// Draws since the number was last seen, 0 if it was in the last draw.
    pub current_absence: usize,
}

impl RunStats {
    pub fn appeared_last(&self) -> bool {
        self.current_presence > 0
    }

    pub fn mean_presence(&self) -> f64 {
        mean(&self.presence_runs)
    }

    pub fn mean_absence(&self) -> f64 {
        mean(&self.absence_runs)
    }

    pub fn max_presence(&self) -> usize {
        self.presence_runs.iter().copied().max().unwrap_or(0)
    }

    pub fn max_absence(&self) -> usize {
        self.absence_runs.iter().copied().max().unwrap_or(0)
    }
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<usize>() as f64 / values.len() as f64
    }
}

/// `trace[i]` is true when `number` was drawn in `draws[i]`.
pub fn presence_trace(draws: &[Draw], number: u8) -> Vec<bool> {
    draws.iter().map(|d| d.contains(number)).collect()
}

pub fn analyze_runs(draws: &[Draw], number: u8) -> RunStats {
    let trace = presence_trace(draws, number);

    let mut presence_runs = Vec::new();
    let mut absence_runs = Vec::new();
    let mut current: Option<(bool, usize)> = None;

    for &present in &trace {
        current = match current {
            Some((sign, len)) if sign == present => Some((sign, len + 1)),
            Some((sign, len)) => {
                close_run(sign, len, &mut presence_runs, &mut absence_runs);
                Some((present, 1))
            }
            None => Some((present, 1)),
        };
    }
    if let Some((sign, len)) = current {
        close_run(sign, len, &mut presence_runs, &mut absence_runs);
    }

    // Trailing streak: single backward scan while the value matches the last draw.
    let (current_presence, current_absence) = match trace.last() {
        Some(&last) => {
            let streak = trace.iter().rev().take_while(|&&p| p == last).count();
            if last { (streak, 0) } else { (0, streak) }
        }
        None => (0, 0),
    };

    RunStats {
        number,
        total_draws: trace.len(),
        total_appearances: trace.iter().filter(|&&p| p).count(),
        presence_runs,
        absence_runs,
        current_presence,
        current_absence,
    }
}

fn close_run(present: bool, len: usize, presence: &mut Vec<usize>, absence: &mut Vec<usize>) {
    if present {
        presence.push(len);
    } else {
        absence.push(len);
    }
}

/// Run statistics for every number, indexed by `number - 1`.
pub fn analyze_all(draws: &[Draw]) -> Vec<RunStats> {
    all_numbers().map(|n| analyze_runs(draws, n)).collect()
}
