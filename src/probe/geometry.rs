//! Geometry of fixed-length probes
//!
//! Every helper here is derived from "a probe of length `L` aligned at its
//! start, end or center", so the bounds stay consistent with the centering
//! convention in [`crate::region::center_offset`].

use crate::region::{Alignment, GenomicInterval};

/// Probe placement arithmetic for one probe length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeGeometry {
    length: i64,
}

impl ProbeGeometry {
    /// # Panics
    ///
    /// Panics if `length < 1`; configuration validation rejects that earlier.
    pub fn new(length: i64) -> Self {
        assert!(length >= 1, "probe length must be positive, got {length}");
        Self { length }
    }

    pub fn length(&self) -> i64 {
        self.length
    }

    /// End position of a probe starting at `start`
    pub fn end_for_start(&self, start: i64) -> i64 {
        start + self.length - 1
    }

    /// Start position of a probe ending at `end`
    pub fn start_for_end(&self, end: i64) -> i64 {
        end - self.length + 1
    }

    /// Probe interval starting at `start`; `None` if it would begin before position 1
    pub fn probe_at_start(&self, chromosome: &str, start: i64) -> Option<GenomicInterval> {
        GenomicInterval::of_length(chromosome, start, self.length, Alignment::StartAt)
    }

    pub fn probe_at_end(&self, chromosome: &str, end: i64) -> Option<GenomicInterval> {
        GenomicInterval::of_length(chromosome, end, self.length, Alignment::EndAt)
    }

    pub fn probe_centered_at(&self, chromosome: &str, center: i64) -> Option<GenomicInterval> {
        GenomicInterval::of_length(chromosome, center, self.length, Alignment::CenteredAt)
    }

    /// Smallest start of a probe that still overlaps `region`
    pub fn min_start_overlapping(&self, region: &GenomicInterval) -> i64 {
        self.start_for_end(region.start())
    }

    /// Largest start of a probe that still overlaps `region`
    pub fn max_start_overlapping(&self, region: &GenomicInterval) -> i64 {
        region.end()
    }

    /// Largest end of a probe that still overlaps `region`
    pub fn max_end_overlapping(&self, region: &GenomicInterval) -> i64 {
        self.end_for_start(region.end())
    }

    /// Smallest start of a probe that overlaps or abuts `region`
    pub fn min_start_without_gap(&self, region: &GenomicInterval) -> i64 {
        self.min_start_overlapping(region) - 1
    }

    /// Largest end of a probe that overlaps or abuts `region`
    pub fn max_end_without_gap(&self, region: &GenomicInterval) -> i64 {
        self.max_end_overlapping(region) + 1
    }

    /// Starts in `[min_start, max_end - L + 1]` of probes fitting inside the bounds
    ///
    /// Returns `None` if no probe fits.
    pub fn start_range_within(&self, min_start: i64, max_end: i64) -> Option<(i64, i64)> {
        let max_start = self.start_for_end(max_end);
        (min_start <= max_start).then_some((min_start, max_start))
    }

    /// Number of probes spaced `spacing` apart that fit in `available` bases
    pub fn max_probes_in(&self, available: i64, spacing: i64) -> i64 {
        if available < self.length {
            return 0;
        }
        (available - self.length) / spacing.max(1) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i64, end: i64) -> GenomicInterval {
        GenomicInterval::new("chr1", start, end).unwrap()
    }

    #[test]
    fn test_probe_intervals() {
        let geometry = ProbeGeometry::new(120);
        assert_eq!(geometry.probe_at_start("chr1", 100), Some(iv(100, 219)));
        assert_eq!(geometry.probe_at_end("chr1", 219), Some(iv(100, 219)));
        assert_eq!(geometry.probe_centered_at("chr1", 159), Some(iv(100, 219)));
        assert_eq!(geometry.probe_at_end("chr1", 50), None);
    }

    #[test]
    fn test_overlap_bounds() {
        let geometry = ProbeGeometry::new(120);
        let region = iv(1000, 1400);
        assert_eq!(geometry.min_start_overlapping(&region), 881);
        assert_eq!(geometry.max_start_overlapping(&region), 1400);
        assert_eq!(geometry.max_end_overlapping(&region), 1519);
        assert_eq!(geometry.min_start_without_gap(&region), 880);
        assert_eq!(geometry.max_end_without_gap(&region), 1520);

        // The extreme probes touch the region by exactly one base
        let leftmost = geometry.probe_at_start("chr1", 881).unwrap();
        assert_eq!(leftmost.intersect(&region).unwrap().len(), 1);
        let rightmost = geometry.probe_at_end("chr1", 1519).unwrap();
        assert_eq!(rightmost.intersect(&region).unwrap().len(), 1);
    }

    #[test]
    fn test_start_range_within() {
        let geometry = ProbeGeometry::new(10);
        assert_eq!(geometry.start_range_within(1, 10), Some((1, 1)));
        assert_eq!(geometry.start_range_within(1, 20), Some((1, 11)));
        assert_eq!(geometry.start_range_within(1, 9), None);
    }

    #[test]
    fn test_max_probes_in() {
        let geometry = ProbeGeometry::new(120);
        assert_eq!(geometry.max_probes_in(119, 60), 0);
        assert_eq!(geometry.max_probes_in(120, 60), 1);
        assert_eq!(geometry.max_probes_in(240, 60), 3);
        assert_eq!(geometry.max_probes_in(639, 60), 9);
    }
}
