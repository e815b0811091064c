//! Best-probe selection
//!
//! Selection only ever considers accepted probes and walks them in input
//! order, so the order candidates are generated in decides ties: the
//! earlier candidate wins. Strategies may stop early once a candidate is
//! good enough that no later one could be preferred.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::probe::Probe;

/// How to choose among accepted probes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// First accepted probe in input order
    FirstAcceptable,
    /// Highest quality score; stop at the first score `>= optimal`
    MaxQuality { optimal: f64 },
    /// GC content closest to `target`; stop at the first distance `<= optimal_tolerance`
    BestGc { target: f64, optimal_tolerance: f64 },
}

impl SelectionStrategy {
    /// Max quality, stopping only on a perfect score
    pub fn max_quality() -> Self {
        SelectionStrategy::MaxQuality { optimal: 1.0 }
    }

    /// Closest GC to `target`, stopping only on an exact match
    pub fn best_gc(target: f64) -> Self {
        SelectionStrategy::BestGc {
            target,
            optimal_tolerance: 0.0,
        }
    }
}

impl Default for SelectionStrategy {
    fn default() -> Self {
        Self::max_quality()
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionStrategy::FirstAcceptable => write!(f, "first acceptable"),
            SelectionStrategy::MaxQuality { optimal } => {
                write!(f, "max quality (optimal {})", optimal)
            }
            SelectionStrategy::BestGc {
                target,
                optimal_tolerance,
            } => write!(f, "best GC {} (±{})", target, optimal_tolerance),
        }
    }
}

/// Pick the best accepted probe from `candidates`
///
/// Candidates after an early stop are never pulled from the iterator.
pub fn select_best<I>(candidates: I, strategy: &SelectionStrategy) -> Option<Probe>
where
    I: IntoIterator<Item = Probe>,
{
    let mut accepted = candidates.into_iter().filter(Probe::is_accepted);
    match *strategy {
        SelectionStrategy::FirstAcceptable => accepted.next(),
        SelectionStrategy::MaxQuality { optimal } => best_by(
            accepted,
            |p| p.quality_score().unwrap_or(f64::NEG_INFINITY),
            |a, b| a > b,
            |score| score >= optimal,
        ),
        SelectionStrategy::BestGc {
            target,
            optimal_tolerance,
        } => best_by(
            accepted,
            |p| (p.gc_content() - target).abs(),
            |a, b| a < b,
            |distance| distance <= optimal_tolerance,
        ),
    }
}

/// Linear scan keeping the best so far under a strict comparison
fn best_by<I, K, B, S>(candidates: I, key: K, better: B, good_enough: S) -> Option<Probe>
where
    I: Iterator<Item = Probe>,
    K: Fn(&Probe) -> f64,
    B: Fn(f64, f64) -> bool,
    S: Fn(f64) -> bool,
{
    let mut best: Option<(f64, Probe)> = None;
    for probe in candidates {
        let value = key(&probe);
        let replace = match &best {
            None => true,
            Some((best_value, _)) => better(value, *best_value),
        };
        if replace {
            best = Some((value, probe));
            if good_enough(value) {
                break;
            }
        }
    }
    best.map(|(_, probe)| probe)
}
