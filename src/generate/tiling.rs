//! Minimal-probe tiling of a target region
//!
//! Finds the fewest probes that cover a region, allowing a few edge bases
//! to stay uncovered when that saves a probe, then spreads the spare bases
//! between overlap and outward extension and centers the tiling on the
//! region. All arithmetic is integer except the single rounding of the
//! extension share, so the result is deterministic.

use std::cmp::{max, min};

use log::trace;

use crate::config::TilingConfig;
use crate::probe::ProbeGeometry;
use crate::region::{center_offset, GenomicInterval};

/// Probe count needed to cover `region_length` bases, leaving at most
/// `max_uncovered_edge_bases` uncovered (never less than one probe)
pub fn min_probe_count(
    region_length: i64,
    probe_length: i64,
    max_uncovered_edge_bases: i64,
) -> i64 {
    let required = region_length - max_uncovered_edge_bases;
    if required <= 0 {
        return 1;
    }
    max(1, (required + probe_length - 1) / probe_length)
}

/// Ideal probe starts tiling `region` within `probe_bounds`
///
/// No probe starts more than `L - 1` bases outside `region` or leaves
/// `probe_bounds`. Returns an empty list if the minimal tiling does not fit.
pub fn tile(
    region: &GenomicInterval,
    probe_bounds: &GenomicInterval,
    geometry: &ProbeGeometry,
    config: &TilingConfig,
) -> Vec<i64> {
    let length = geometry.length();
    let region_length = region.len();

    let lo = max(probe_bounds.start(), geometry.min_start_overlapping(region));
    let hi = min(probe_bounds.end(), geometry.max_end_overlapping(region));
    let available = hi - lo + 1;

    let count = min_probe_count(region_length, length, config.max_uncovered_edge_bases);
    let min_spacing = max(1, length - config.max_overlap);
    let max_count = geometry.max_probes_in(available, min_spacing);
    if count > max_count {
        trace!(
            "No tiling of {} in {}: need {} probes, at most {} fit",
            region,
            probe_bounds,
            count,
            max_count
        );
        return Vec::new();
    }

    let extra = count * length - region_length;
    if extra == 0 {
        let starts: Vec<i64> = (0..count).map(|i| region.start() + i * length).collect();
        trace!("Back-to-back tiling of {}: {:?}", region, starts);
        return starts;
    }

    let span = if extra < 0 {
        count * length
    } else {
        let extension = (extra as f64 * config.extension_balance).round() as i64;
        let overlap = if count == 1 {
            0
        } else {
            min(extra - extension, (count - 1) * config.max_overlap)
        };
        count * length - overlap
    };
    let span = span.clamp((count - 1) * min_spacing + length, available);

    let mut first = region.center() + center_offset(span);
    if first < lo {
        first = lo;
    }
    if first + span - 1 > hi {
        first = hi - span + 1;
    }

    let starts: Vec<i64> = if count == 1 {
        vec![first]
    } else {
        (0..count)
            .map(|i| first + (i * (span - length)) / (count - 1))
            .collect()
    };
    trace!(
        "Tiling of {} within {}: {} probes over {} bases, starts {:?}",
        region,
        probe_bounds,
        count,
        span,
        starts
    );
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i64, end: i64) -> GenomicInterval {
        GenomicInterval::new("chr1", start, end).unwrap()
    }

    fn wide_bounds(region: &GenomicInterval) -> GenomicInterval {
        iv(max(1, region.start() - 1000), region.end() + 1000)
    }

    fn tile_default(region: &GenomicInterval) -> Vec<i64> {
        tile(
            region,
            &wide_bounds(region),
            &ProbeGeometry::new(120),
            &TilingConfig::default(),
        )
    }

    #[test]
    fn test_min_probe_count() {
        assert_eq!(min_probe_count(401, 120, 20), 4);
        assert_eq!(min_probe_count(380, 120, 20), 3);
        assert_eq!(min_probe_count(381, 120, 20), 4);
        assert_eq!(min_probe_count(10, 120, 20), 1);
        assert_eq!(min_probe_count(240, 120, 0), 2);
    }

    #[test]
    fn test_four_probe_tiling() {
        let region = iv(1000, 1400);
        let starts = tile_default(&region);
        assert_eq!(starts, vec![980, 1087, 1194, 1301]);
        // Covers the whole region, extends at most L-1 either side
        assert!(starts[0] <= region.start() && starts[0] >= region.start() - 119);
        assert!(starts[3] + 119 >= region.end() && starts[3] <= region.end());
    }

    #[test]
    fn test_exact_multiple_is_back_to_back() {
        let region = iv(1000, 1239);
        assert_eq!(tile_default(&region), vec![1000, 1120]);
    }

    #[test]
    fn test_single_probe_centered() {
        let region = iv(1000, 1049);
        let starts = tile_default(&region);
        assert_eq!(starts.len(), 1);
        let probe = iv(starts[0], starts[0] + 119);
        assert!(probe.contains(&region));
        assert_eq!(probe.center(), region.center());
    }

    #[test]
    fn test_uncovered_edges_centered() {
        // 250 bases, 20 may be left uncovered: two back-to-back probes
        let region = iv(1000, 1249);
        let starts = tile_default(&region);
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[1] - starts[0], 120);
        let left_gap = starts[0] - region.start();
        let right_gap = region.end() - (starts[1] + 119);
        assert_eq!(left_gap + right_gap, 10);
        assert!((left_gap - right_gap).abs() <= 1);
    }

    #[test]
    fn test_clamped_into_bounds() {
        let region = iv(1000, 1049);
        let bounds = iv(1000, 1300);
        let starts = tile(&region, &bounds, &ProbeGeometry::new(120), &TilingConfig::default());
        assert_eq!(starts, vec![1000]);
    }

    #[test]
    fn test_infeasible_bounds() {
        let region = iv(1000, 1400);
        let bounds = iv(1000, 1400);
        let config = TilingConfig {
            max_overlap: 20,
            ..TilingConfig::default()
        };
        // Four probes need at least 3 * 100 + 120 = 420 bases
        assert!(tile(&region, &bounds, &ProbeGeometry::new(120), &config).is_empty());
        let narrow = iv(1000, 1100);
        assert!(tile(&narrow, &narrow, &ProbeGeometry::new(120), &config).is_empty());
    }

    #[test]
    fn test_balance_extremes() {
        let region = iv(1000, 1400);
        let geometry = ProbeGeometry::new(120);
        let bounds = wide_bounds(&region);

        let overlap = TilingConfig {
            extension_balance: 0.0,
            ..TilingConfig::default()
        };
        let starts = tile(&region, &bounds, &geometry, &overlap);
        assert_eq!(starts.first(), Some(&1000));
        assert_eq!(starts.last().map(|s| s + 119), Some(1400));

        let extend = TilingConfig {
            extension_balance: 1.0,
            ..TilingConfig::default()
        };
        let starts = tile(&region, &bounds, &geometry, &extend);
        let spacing: Vec<i64> = starts.windows(2).map(|w| w[1] - w[0]).collect();
        assert_eq!(spacing, vec![120, 120, 120]);
    }

    #[test]
    fn test_spacing_never_below_minimum() {
        let config = TilingConfig {
            max_overlap: 30,
            extension_balance: 0.0,
            ..TilingConfig::default()
        };
        let region = iv(1000, 1300);
        let starts = tile(&region, &wide_bounds(&region), &ProbeGeometry::new(120), &config);
        assert_eq!(starts.len(), 3);
        assert!(starts.windows(2).all(|w| w[1] - w[0] >= 90 && w[1] - w[0] <= 120));
    }
}
