//! Coverage oracle
//!
//! Answers whether a region is already captured by probes accepted in
//! earlier generation phases. The index only ever grows, so once a region
//! is reported covered it stays covered.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::probe::{Probe, SequenceDefinition};
use crate::region::{is_fully_covered, uncovered, GenomicInterval};

/// Queryable view over all probe intervals placed so far
pub trait PanelCoverage {
    /// Covered intervals on `chromosome`, in no particular order
    fn covered_regions(&self, chromosome: &str) -> &[GenomicInterval];

    /// True if every base of `region` is covered
    fn is_covered(&self, region: &GenomicInterval) -> bool {
        is_fully_covered(region, self.covered_regions(region.chromosome()))
    }

    /// Parts of `region` not yet covered, sorted
    fn uncovered_parts(&self, region: &GenomicInterval) -> Vec<GenomicInterval> {
        uncovered(region, self.covered_regions(region.chromosome()))
    }
}

impl<T: PanelCoverage + ?Sized> PanelCoverage for &T {
    fn covered_regions(&self, chromosome: &str) -> &[GenomicInterval] {
        (**self).covered_regions(chromosome)
    }
}

/// Per-chromosome index of covered intervals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageIndex {
    by_chromosome: BTreeMap<String, Vec<GenomicInterval>>,
}

impl CoverageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, interval: GenomicInterval) {
        self.by_chromosome
            .entry(interval.chromosome().to_string())
            .or_default()
            .push(interval);
    }

    /// Index every reference interval the probe is built from
    pub fn add_probe(&mut self, probe: &Probe) {
        for region in probe.definition().reference_regions() {
            self.add(region.clone());
        }
    }

    /// Number of indexed intervals
    pub fn len(&self) -> usize {
        self.by_chromosome.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_chromosome.values().all(Vec::is_empty)
    }

    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.by_chromosome.keys().map(String::as_str)
    }
}

impl PanelCoverage for CoverageIndex {
    fn covered_regions(&self, chromosome: &str) -> &[GenomicInterval] {
        self.by_chromosome
            .get(chromosome)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Extend<GenomicInterval> for CoverageIndex {
    fn extend<I: IntoIterator<Item = GenomicInterval>>(&mut self, iter: I) {
        for interval in iter {
            self.add(interval);
        }
    }
}

impl FromIterator<GenomicInterval> for CoverageIndex {
    fn from_iter<I: IntoIterator<Item = GenomicInterval>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

/// Decides whether a sequence definition is subject to coverage checks
///
/// Exact reference regions always are. A variant definition is only when
/// its net insertion/deletion is below `max_indel`, i.e. a reference probe
/// over the same span would capture nearly the same sequence. Everything
/// else is treated as never covered, so novel-sequence probes are always
/// placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoveragePolicy {
    pub max_indel_for_coverage_check: i64,
}

impl CoveragePolicy {
    pub fn new(max_indel_for_coverage_check: i64) -> Self {
        Self {
            max_indel_for_coverage_check,
        }
    }

    pub fn needs_coverage_check(&self, definition: &SequenceDefinition) -> bool {
        definition.is_exact_region()
            || definition
                .indel_size()
                .is_some_and(|size| size < self.max_indel_for_coverage_check)
    }

    /// True if the definition is checkable and every reference piece is covered
    pub fn is_covered<C: PanelCoverage + ?Sized>(
        &self,
        definition: &SequenceDefinition,
        coverage: &C,
    ) -> bool {
        self.needs_coverage_check(definition)
            && definition
                .reference_regions()
                .into_iter()
                .all(|region| coverage.is_covered(region))
    }
}

impl Default for CoveragePolicy {
    fn default() -> Self {
        Self::new(30)
    }
}
