//! Statistics of the local user's solves.
//!
//! DNF solves count toward `solves` but are left out of every average and
//! of `best`. Rolling averages take the first N eligible solves in turn
//! order and stay empty until N eligible solves exist.

use serde::Serialize;

use super::config::AverageDivisor;
use super::solve::SolveTime;

/// Window sizes of the rolling averages.
pub const ROLLING_WINDOWS: [usize; 4] = [5, 12, 50, 100];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub solves: usize,
    pub best: Option<u64>,
    pub avg: Option<f64>,
    pub avg5: Option<f64>,
    pub avg12: Option<f64>,
    pub avg50: Option<f64>,
    pub avg100: Option<f64>,
}

impl Stats {
    pub fn compute(times: &[SolveTime], username: Option<&str>, divisor: AverageDivisor) -> Self {
        let Some(username) = username else {
            return Self::default();
        };

        let mut mine: Vec<&SolveTime> = times.iter().filter(|t| t.username == username).collect();
        mine.sort_by_key(|t| t.turn_no);

        let eligible: Vec<u64> = mine.iter().filter(|t| !t.is_dnf()).map(|t| t.time).collect();
        let rolling = |n: usize| rolling_average(&eligible, n, divisor);

        Self {
            solves: mine.len(),
            best: eligible.iter().copied().min(),
            avg: mean(&eligible),
            avg5: rolling(ROLLING_WINDOWS[0]),
            avg12: rolling(ROLLING_WINDOWS[1]),
            avg50: rolling(ROLLING_WINDOWS[2]),
            avg100: rolling(ROLLING_WINDOWS[3]),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "solves": self.solves,
            "best": self.best,
            "avg": self.avg,
            "avg5": self.avg5,
            "avg12": self.avg12,
            "avg50": self.avg50,
            "avg100": self.avg100
        })
    }
}

/// Durations are summed as `u128`, which cannot overflow for any slice of `u64`.
fn sum(values: &[u64]) -> u128 {
    values.iter().map(|v| u128::from(*v)).sum()
}

fn mean(values: &[u64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(sum(values) as f64 / values.len() as f64)
}

fn rolling_average(eligible: &[u64], n: usize, divisor: AverageDivisor) -> Option<f64> {
    if n == 0 || eligible.len() < n {
        return None;
    }
    let total = sum(&eligible[..n]);
    let denominator = match divisor {
        AverageDivisor::Window => n,
        AverageDivisor::TotalEligible => eligible.len(),
    };
    Some(total as f64 / denominator as f64)
}
