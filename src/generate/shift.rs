//! Local shift refinement of tiled probes
//!
//! An ideal tiling position may land on a poor sequence. Each tiled probe
//! is therefore allowed to move a few bases, within a window that keeps
//! the tiling gap-free, keeps the target edges covered, and never moves a
//! probe outward past where the tiling put it.

use std::cmp::{max, min};
use std::collections::BTreeMap;

use log::trace;

use crate::candidate::Outward;
use crate::probe::{Probe, ProbeGeometry};
use crate::region::GenomicInterval;
use crate::select::{select_best, SelectionStrategy};

/// Window computation and placement for one tiled target
#[derive(Debug, Clone)]
pub struct LocalShift<'a> {
    /// Target region being tiled
    pub region: &'a GenomicInterval,
    /// Interval every probe must stay inside
    pub bounds: &'a GenomicInterval,
    pub geometry: ProbeGeometry,
    /// Furthest a probe may move from its ideal start
    pub shift_max: i64,
}

impl<'a> LocalShift<'a> {
    /// Inclusive range of starts allowed for the probe at `ideal[index]`
    ///
    /// `previous` is the probe placed for `index - 1`, if one was found.
    /// Returns `(ideal, ideal)` if the constraints are inconsistent.
    pub fn window(
        &self,
        ideal: &[i64],
        index: usize,
        previous: Option<&GenomicInterval>,
    ) -> (i64, i64) {
        let length = self.geometry.length();
        let position = ideal[index];

        let mut lo = max(position - self.shift_max, self.bounds.start());
        let mut hi = min(
            position + self.shift_max,
            self.geometry.start_for_end(self.bounds.end()),
        );
        lo = max(lo, self.geometry.min_start_overlapping(self.region));
        hi = min(hi, self.geometry.max_start_overlapping(self.region));

        if let Some(previous) = previous {
            lo = max(lo, previous.start() + 1);
            hi = min(hi, previous.end() + 1);
        }
        if let Some(next) = ideal.get(index + 1) {
            lo = max(lo, next - length);
        }

        if index == 0 {
            lo = max(lo, min(position, self.region.start()));
            hi = min(hi, max(position, self.region.start()));
        }
        if index + 1 == ideal.len() {
            let end = self.geometry.end_for_start(position);
            lo = max(lo, self.geometry.start_for_end(min(end, self.region.end())));
            hi = min(hi, self.geometry.start_for_end(max(end, self.region.end())));
        }

        if lo > hi {
            trace!(
                "Shift window for {} at {} is empty, keeping ideal start",
                self.region,
                position
            );
            return (position, position);
        }
        (lo, hi)
    }

    /// Place one probe per ideal start, choosing among `accepted` probes
    /// (keyed by start) within each window
    ///
    /// Positions with no accepted probe in their window are skipped, which
    /// leaves a gap for the caller to report.
    pub fn place(
        &self,
        ideal: &[i64],
        accepted: &BTreeMap<i64, Probe>,
        strategy: &SelectionStrategy,
    ) -> Vec<Probe> {
        let mut placed: Vec<Probe> = Vec::with_capacity(ideal.len());
        let mut previous: Option<GenomicInterval> = None;

        for index in 0..ideal.len() {
            let (lo, hi) = self.window(ideal, index, previous.as_ref());
            let candidates = Outward::new(ideal[index], lo, hi)
                .filter_map(|start| accepted.get(&start))
                .cloned();
            match select_best(candidates, strategy) {
                Some(probe) => {
                    previous = probe.region().cloned();
                    trace!(
                        "Placed probe {} for ideal start {} (window {}-{})",
                        probe.definition(),
                        ideal[index],
                        lo,
                        hi
                    );
                    placed.push(probe);
                }
                None => {
                    trace!(
                        "No acceptable probe near {} (window {}-{})",
                        ideal[index],
                        lo,
                        hi
                    );
                    previous = None;
                }
            }
        }
        placed
    }
}
