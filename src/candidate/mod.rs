//! Candidate probe placement
//!
//! Enumerates where a probe *could* go, without judging whether it is any
//! good. Enumeration order matters: selection breaks ties in favour of the
//! earlier candidate, so region scans run left to right and anchor searches
//! run outward from the anchor (`0, +1, -1, +2, -2, ...`).

use crate::error::PanelError;
use crate::probe::ProbeGeometry;
use crate::region::{center_offset, GenomicInterval};

/// Integers in `[lo, hi]` ordered by distance from `origin`, positive side first
///
/// `origin` itself need not lie inside the range.
#[derive(Debug, Clone)]
pub struct Outward {
    origin: i64,
    lo: i64,
    hi: i64,
    next_distance: i64,
    negative: Option<i64>,
}

impl Outward {
    pub fn new(origin: i64, lo: i64, hi: i64) -> Self {
        Self {
            origin,
            lo,
            hi,
            next_distance: 0,
            negative: None,
        }
    }

    fn in_range(&self, value: i64) -> bool {
        value >= self.lo && value <= self.hi
    }
}

impl Iterator for Outward {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        loop {
            if let Some(distance) = self.negative.take() {
                let value = self.origin - distance;
                if self.in_range(value) {
                    return Some(value);
                }
                continue;
            }

            let distance = self.next_distance;
            if self.origin + distance > self.hi && self.origin - distance < self.lo {
                return None;
            }
            self.next_distance += 1;
            if distance > 0 {
                self.negative = Some(distance);
            }
            let value = self.origin + distance;
            if self.in_range(value) {
                return Some(value);
            }
        }
    }
}

/// Generates candidate probe intervals for one probe length
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator {
    geometry: ProbeGeometry,
}

impl CandidateGenerator {
    pub fn new(geometry: ProbeGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &ProbeGeometry {
        &self.geometry
    }

    /// Every probe overlapping `region` and inside the chromosome, left to right
    pub fn overlapping(
        &self,
        region: &GenomicInterval,
        chromosome_length: i64,
    ) -> impl Iterator<Item = GenomicInterval> + '_ {
        let first = self.geometry.min_start_overlapping(region).max(1);
        let last = self
            .geometry
            .max_start_overlapping(region)
            .min(self.geometry.start_for_end(chromosome_length));
        self.starts(region.chromosome().to_string(), first, last)
    }

    /// Every probe lying entirely inside `region`, left to right
    pub fn contained(
        &self,
        region: &GenomicInterval,
        chromosome_length: i64,
    ) -> impl Iterator<Item = GenomicInterval> + '_ {
        let first = region.start();
        let last = self
            .geometry
            .start_for_end(region.end().min(chromosome_length));
        self.starts(region.chromosome().to_string(), first, last)
    }

    fn starts(
        &self,
        chromosome: String,
        first: i64,
        last: i64,
    ) -> impl Iterator<Item = GenomicInterval> + '_ {
        (first..=last).filter_map(move |start| self.geometry.probe_at_start(&chromosome, start))
    }

    /// Probes centered at `anchor + offset` for offsets `0, +1, -1, ...`
    ///
    /// Only probes within `[min_start, max_end]` (and at or after position 1)
    /// are produced; the search stops once both directions leave the bounds.
    ///
    /// # Errors
    ///
    /// Fails if the bounds cannot hold a single probe. That is a caller bug:
    /// callers are expected to reject undersized targets themselves.
    pub fn outward_from(
        &self,
        chromosome: &str,
        anchor: i64,
        min_start: i64,
        max_end: i64,
    ) -> Result<impl Iterator<Item = GenomicInterval> + '_, PanelError> {
        let min_start = min_start.max(1);
        let (first_start, last_start) = self
            .geometry
            .start_range_within(min_start, max_end)
            .ok_or_else(|| {
                PanelError::geometry(format!(
                    "no {}bp probe fits in {}:{}-{}",
                    self.geometry.length(),
                    chromosome,
                    min_start,
                    max_end
                ))
            })?;

        let offset = center_offset(self.geometry.length());
        let chromosome = chromosome.to_string();
        Ok(
            Outward::new(anchor, first_start - offset, last_start - offset)
                .filter_map(move |center| self.geometry.probe_centered_at(&chromosome, center)),
        )
    }

    /// One centered probe per position, in input order, skipping any that
    /// would run off the chromosome
    pub fn centered_at_each<'a, I>(
        &'a self,
        chromosome: &'a str,
        positions: I,
        chromosome_length: i64,
    ) -> impl Iterator<Item = GenomicInterval> + 'a
    where
        I: IntoIterator<Item = i64> + 'a,
    {
        positions.into_iter().filter_map(move |position| {
            self.geometry
                .probe_centered_at(chromosome, position)
                .filter(|probe| probe.end() <= chromosome_length)
        })
    }
}
