//! Genomic positions, intervals and 1-D interval arithmetic
//!
//! All coordinates are 1-based and inclusive on both ends, matching the
//! way panel targets and probes are described. Intervals never span more
//! than one chromosome.
//!
//! # Examples
//!
//! ```
//! use ferro_panel::region::{uncovered, GenomicInterval};
//!
//! let target = GenomicInterval::new("chr1", 1000, 1400).unwrap();
//! let covered = vec![GenomicInterval::new("chr1", 900, 1300).unwrap()];
//!
//! let gaps = uncovered(&target, &covered);
//! assert_eq!(gaps, vec![GenomicInterval::new("chr1", 1301, 1400).unwrap()]);
//! ```

use serde::Serialize;
use std::cmp::{max, min};
use std::fmt;

use crate::error::PanelError;

/// A single 1-based position on a chromosome
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GenomicPosition {
    chromosome: String,
    position: i64,
}

impl GenomicPosition {
    /// Create a position, failing if `position < 1`
    pub fn new(chromosome: impl Into<String>, position: i64) -> Result<Self, PanelError> {
        let chromosome = chromosome.into();
        if position < 1 {
            return Err(PanelError::InvalidInterval {
                chromosome,
                start: position,
                end: position,
            });
        }
        Ok(Self {
            chromosome,
            position,
        })
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    /// The single-base interval at this position
    pub fn to_interval(&self) -> GenomicInterval {
        GenomicInterval {
            chromosome: self.chromosome.clone(),
            start: self.position,
            end: self.position,
        }
    }
}

impl fmt::Display for GenomicPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chromosome, self.position)
    }
}

/// A closed interval `[start, end]` on one chromosome
///
/// # Invariant
///
/// `1 <= start <= end`. Constructors reject anything else, so every value of
/// this type is a valid, non-empty interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GenomicInterval {
    chromosome: String,
    start: i64,
    end: i64,
}

/// How an interval of a given length is placed relative to an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// The interval starts at the anchor
    StartAt,
    /// The interval ends at the anchor
    EndAt,
    /// The anchor is the interval's center (see [`center_offset`])
    CenteredAt,
}

impl GenomicInterval {
    /// Create an interval, failing if `start < 1` or `start > end`
    pub fn new(chromosome: impl Into<String>, start: i64, end: i64) -> Result<Self, PanelError> {
        let chromosome = chromosome.into();
        if start < 1 || start > end {
            return Err(PanelError::InvalidInterval {
                chromosome,
                start,
                end,
            });
        }
        Ok(Self {
            chromosome,
            start,
            end,
        })
    }

    /// Create an interval, returning `None` instead of an error
    pub fn try_new(chromosome: impl Into<String>, start: i64, end: i64) -> Option<Self> {
        if start < 1 || start > end {
            return None;
        }
        Some(Self {
            chromosome: chromosome.into(),
            start,
            end,
        })
    }

    /// Interval of `length` bases placed relative to `anchor`
    ///
    /// Returns `None` if `length < 1` or the interval would start before position 1.
    pub fn of_length(
        chromosome: impl Into<String>,
        anchor: i64,
        length: i64,
        alignment: Alignment,
    ) -> Option<Self> {
        if length < 1 {
            return None;
        }
        let start = aligned_start(anchor, length, alignment);
        Self::try_new(chromosome, start, start + length - 1)
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of bases in the interval
    pub fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    /// Always false; kept for API symmetry with collections
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Center position using the [`center_offset`] convention
    pub fn center(&self) -> i64 {
        self.start - center_offset(self.len())
    }

    pub fn contains_position(&self, position: i64) -> bool {
        position >= self.start && position <= self.end
    }

    /// True if `other` lies entirely inside this interval
    pub fn contains(&self, other: &GenomicInterval) -> bool {
        self.chromosome == other.chromosome && other.start >= self.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &GenomicInterval) -> bool {
        self.chromosome == other.chromosome && self.start <= other.end && other.start <= self.end
    }

    /// True if the intervals overlap or their ends differ by exactly one base
    pub fn overlaps_or_adjacent(&self, other: &GenomicInterval) -> bool {
        self.chromosome == other.chromosome
            && self.start <= other.end + 1
            && other.start <= self.end + 1
    }

    /// Intersection of two intervals, or `None` if they don't overlap
    pub fn intersect(&self, other: &GenomicInterval) -> Option<GenomicInterval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(GenomicInterval {
            chromosome: self.chromosome.clone(),
            start: max(self.start, other.start),
            end: min(self.end, other.end),
        })
    }

    /// Smallest interval containing both; `None` across chromosomes
    pub fn span(&self, other: &GenomicInterval) -> Option<GenomicInterval> {
        if self.chromosome != other.chromosome {
            return None;
        }
        Some(GenomicInterval {
            chromosome: self.chromosome.clone(),
            start: min(self.start, other.start),
            end: max(self.end, other.end),
        })
    }

    /// Same chromosome, new bounds
    pub fn with_bounds(&self, start: i64, end: i64) -> Option<GenomicInterval> {
        Self::try_new(self.chromosome.clone(), start, end)
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

/// Offset from the center to the start of an interval of `length` bases
///
/// `center_offset(len) = -(len / 2) + (1 - len % 2)`. Even lengths put the
/// center on the left of the two middle bases. [`GenomicInterval::center`]
/// is the exact inverse, so `of_length(c, len, CenteredAt).center() == c`.
pub fn center_offset(length: i64) -> i64 {
    -(length / 2) + (1 - length % 2)
}

/// Start position of an interval of `length` aligned to `anchor`
///
/// Unlike [`GenomicInterval::of_length`] the result may be below 1.
pub fn aligned_start(anchor: i64, length: i64, alignment: Alignment) -> i64 {
    match alignment {
        Alignment::StartAt => anchor,
        Alignment::EndAt => anchor - length + 1,
        Alignment::CenteredAt => anchor + center_offset(length),
    }
}

/// Merge intervals that overlap or are adjacent
///
/// The output is sorted by chromosome then start.
pub fn merge_overlapping_or_adjacent<I>(intervals: I) -> Vec<GenomicInterval>
where
    I: IntoIterator<Item = GenomicInterval>,
{
    let mut sorted: Vec<GenomicInterval> = intervals.into_iter().collect();
    sorted.sort();

    let mut merged: Vec<GenomicInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if last.overlaps_or_adjacent(&interval) => {
                last.end = max(last.end, interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Sorted `(start, end)` pairs of the covered intervals that overlap `target`
fn overlapping_bounds<'a, I>(target: &GenomicInterval, covered: I) -> Vec<(i64, i64)>
where
    I: IntoIterator<Item = &'a GenomicInterval>,
{
    let mut bounds: Vec<(i64, i64)> = covered
        .into_iter()
        .filter(|c| c.overlaps(target))
        .map(|c| (c.start, c.end))
        .collect();
    bounds.sort_unstable();
    bounds
}

/// Sub-intervals of `target` not covered by any of `covered`
///
/// The result is sorted, pairwise disjoint and contained in `target`.
pub fn uncovered<'a, I>(target: &GenomicInterval, covered: I) -> Vec<GenomicInterval>
where
    I: IntoIterator<Item = &'a GenomicInterval>,
{
    let mut gaps = Vec::new();
    // Rightmost covered position seen so far
    let mut frontier = target.start - 1;

    for (start, end) in overlapping_bounds(target, covered) {
        if start > frontier + 1 {
            gaps.push(GenomicInterval {
                chromosome: target.chromosome.clone(),
                start: frontier + 1,
                end: min(start - 1, target.end),
            });
        }
        frontier = max(frontier, end);
        if frontier >= target.end {
            break;
        }
    }

    if frontier < target.end {
        gaps.push(GenomicInterval {
            chromosome: target.chromosome.clone(),
            start: frontier + 1,
            end: target.end,
        });
    }
    gaps
}

/// True if the union of `covered` contains every base of `target`
pub fn is_fully_covered<'a, I>(target: &GenomicInterval, covered: I) -> bool
where
    I: IntoIterator<Item = &'a GenomicInterval>,
{
    let mut frontier = target.start - 1;
    for (start, end) in overlapping_bounds(target, covered) {
        if start > frontier + 1 {
            return false;
        }
        frontier = max(frontier, end);
        if frontier >= target.end {
            return true;
        }
    }
    frontier >= target.end
}
