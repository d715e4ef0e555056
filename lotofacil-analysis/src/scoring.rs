use lotofacil_db::models::Draw;

use crate::frequency::{FrequencyTable, all_numbers};
use crate::runs::{RunStats, analyze_all};

const OVERALL_WEIGHT: f64 = 25.0;
const RECENT_WEIGHT: f64 = 30.0;
const PATTERN_WEIGHT: f64 = 25.0;
const HOT_REPEATED_BONUS: f64 = 20.0;
const HOT_ONCE_BONUS: f64 = 10.0;

/// Heuristic "next draw" score from run statistics. Only meaningful for
/// ranking; stays roughly within [-30, 90].
pub fn pattern_score(stats: &RunStats) -> f64 {
    let mut score = 0.0;

    if stats.appeared_last() {
        // still inside the usual presence window?
        if (stats.current_presence as f64) < stats.mean_presence() {
            score += 50.0;
        } else {
            score += 20.0;
        }
    } else if (stats.current_absence as f64) >= stats.mean_absence() {
        // overdue
        score += 60.0;
    } else {
        score += 10.0;
    }

    if stats.total_draws > 0 {
        score += stats.total_appearances as f64 / stats.total_draws as f64 * 30.0;
    }

    if stats.appeared_last() && stats.current_presence as f64 > stats.max_presence() as f64 * 0.8 {
        score -= 30.0;
    }

    score
}

/// Numbers ordered by score, highest first. `scores[i]` belongs to number
/// `i + 1`; equal scores keep ascending number order.
pub fn rank_by_score(scores: &[f64]) -> Vec<u8> {
    let mut ranked: Vec<u8> = (1..=scores.len() as u8).collect();
    ranked.sort_by(|&a, &b| scores[(b - 1) as usize].total_cmp(&scores[(a - 1) as usize]));
    ranked
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiFactorScore {
    pub number: u8,
    pub overall_count: u32,
    pub recent_count: u32,
    pub hot_count: u32,
    pub pattern: f64,
    pub total: f64,
}

/// Blend of overall frequency, frequency over the last `recent_window`
/// draws, the pattern score and appearances in the last `hot_window` draws.
/// Indexed by `number - 1`.
pub fn multi_factor_scores(draws: &[Draw], recent_window: usize, hot_window: usize) -> Vec<MultiFactorScore> {
    let overall = FrequencyTable::from_draws(draws);
    let recent = FrequencyTable::from_draws(tail(draws, recent_window));
    let hot = FrequencyTable::from_draws(tail(draws, hot_window));
    let stats = analyze_all(draws);

    let max_overall = overall.max();
    let max_recent = recent.max();

    all_numbers()
        .zip(stats.iter())
        .map(|(n, st)| {
            let pattern = pattern_score(st);
            let mut total = normalized(overall.count(n), max_overall) * OVERALL_WEIGHT;
            total += normalized(recent.count(n), max_recent) * RECENT_WEIGHT;
            total += pattern / 100.0 * PATTERN_WEIGHT;
            total += match hot.count(n) {
                0 => 0.0,
                1 => HOT_ONCE_BONUS,
                _ => HOT_REPEATED_BONUS,
            };
            MultiFactorScore {
                number: n,
                overall_count: overall.count(n),
                recent_count: recent.count(n),
                hot_count: hot.count(n),
                pattern,
                total,
            }
        })
        .collect()
}

fn normalized(count: u32, max: u32) -> f64 {
    if max == 0 { 0.0 } else { count as f64 / max as f64 }
}

fn tail(draws: &[Draw], n: usize) -> &[Draw] {
    &draws[draws.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::tests::sample_history;
    use crate::runs::analyze_runs;

    fn stats(presence: Vec<usize>, absence: Vec<usize>, cur_p: usize, cur_a: usize, total_draws: usize) -> RunStats {
        RunStats {
            number: 1,
            total_draws,
            total_appearances: presence.iter().sum(),
            presence_runs: presence,
            absence_runs: absence,
            current_presence: cur_p,
            current_absence: cur_a,
        }
    }

    #[test]
    fn test_overdue_absent() {
        // absent for 3, mean absence 2 => +60, frequency 3/7*30
        let s = stats(vec![2, 1], vec![1, 3], 0, 3, 7);
        let expected = 60.0 + 3.0 / 7.0 * 30.0;
        assert!((pattern_score(&s) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_recently_absent() {
        let s = stats(vec![2, 1], vec![3, 1], 0, 1, 7);
        let expected = 10.0 + 3.0 / 7.0 * 30.0;
        assert!((pattern_score(&s) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_present_within_window() {
        // current run 1 < mean 3, 1 <= 0.8*5
        let s = stats(vec![5, 3, 1], vec![2, 2], 1, 0, 13);
        let expected = 50.0 + 9.0 / 13.0 * 30.0;
        assert!((pattern_score(&s) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_present_long_streak_penalized() {
        // current run 3 = max 3 => +20 - 30
        let s = stats(vec![1, 3], vec![2], 3, 0, 6);
        let expected = 20.0 + 4.0 / 6.0 * 30.0 - 30.0;
        assert!((pattern_score(&s) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_pattern_score_sample() {
        // number 1 drawn every time: +20, +30, -30
        let s = analyze_runs(sample_history().draws(), 1);
        assert!((pattern_score(&s) - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_rank_by_score_stable() {
        let mut scores = vec![0.0; 25];
        scores[9] = 5.0;
        scores[4] = 5.0;
        scores[0] = -1.0;
        let ranked = rank_by_score(&scores);
        assert_eq!(&ranked[..3], &[5, 10, 2]);
        assert_eq!(ranked[24], 1);
    }

    #[test]
    fn test_multi_factor_components() {
        let history = sample_history();
        let scores = multi_factor_scores(history.draws(), 50, 5);
        assert_eq!(scores.len(), 25);

        let one = &scores[0];
        assert_eq!(one.overall_count, 3);
        assert_eq!(one.recent_count, 3);
        assert_eq!(one.hot_count, 3);
        // 25 + 30 + 20/100*25 + 20
        assert!((one.total - 80.0).abs() < 1e-10, "total={}", one.total);
    }

    #[test]
    fn test_multi_factor_recent_window() {
        let history = sample_history();
        // only the last draw is recent and hot
        let scores = multi_factor_scores(history.draws(), 1, 1);
        assert_eq!(scores[11].recent_count, 0); // 12 not in last draw
        assert_eq!(scores[24].recent_count, 1); // 25 in last draw
        assert_eq!(scores[24].hot_count, 1);
    }

    #[test]
    fn test_multi_factor_empty() {
        let scores = multi_factor_scores(&[], 50, 5);
        assert_eq!(scores.len(), 25);
        assert!(scores.iter().all(|s| s.total.is_finite()));
    }
}
