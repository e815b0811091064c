//! Results of probe generation
//!
//! A [`ProbeGenerationResult`] is a plain accumulator of four ordered lists.
//! Combining two results concatenates each list, so results from
//! independent generation calls can be folded in any grouping with the
//! same outcome. No de-duplication happens: if two calls place overlapping
//! probes, both are kept.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::probe::{Probe, TargetMetadata};
use crate::region::GenomicInterval;

/// A region probes are aiming to hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRegion {
    pub region: GenomicInterval,
    pub metadata: TargetMetadata,
}

impl TargetRegion {
    pub fn new(region: GenomicInterval, metadata: TargetMetadata) -> Self {
        Self { region, metadata }
    }
}

/// A target, or part of one, that could not be satisfied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRegion {
    pub region: GenomicInterval,
    pub metadata: TargetMetadata,
    /// Human-readable reason, including the criteria that were not met
    pub reason: String,
}

impl RejectedRegion {
    pub fn new(
        region: GenomicInterval,
        metadata: TargetMetadata,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            region,
            metadata,
            reason: reason.into(),
        }
    }
}

/// Accepted probes plus candidate, covered and rejected target records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProbeGenerationResult {
    pub probes: Vec<Probe>,
    pub candidate_targets: Vec<TargetRegion>,
    pub covered_targets: Vec<TargetRegion>,
    pub rejected_regions: Vec<RejectedRegion>,
}

impl ProbeGenerationResult {
    /// The empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Result for a target that was only recorded as a candidate
    pub fn candidate(target: TargetRegion) -> Self {
        Self {
            candidate_targets: vec![target],
            ..Self::default()
        }
    }

    /// Result for a target that is rejected as a whole
    pub fn rejected(
        region: GenomicInterval,
        metadata: TargetMetadata,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            candidate_targets: vec![TargetRegion::new(region.clone(), metadata.clone())],
            rejected_regions: vec![RejectedRegion::new(region, metadata, reason)],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
            && self.candidate_targets.is_empty()
            && self.covered_targets.is_empty()
            && self.rejected_regions.is_empty()
    }

    /// Concatenate `other` after `self`
    pub fn combine(mut self, other: ProbeGenerationResult) -> Self {
        self.extend(other);
        self
    }

    /// Append `other` in place
    pub fn extend(&mut self, other: ProbeGenerationResult) {
        self.probes.extend(other.probes);
        self.candidate_targets.extend(other.candidate_targets);
        self.covered_targets.extend(other.covered_targets);
        self.rejected_regions.extend(other.rejected_regions);
    }

    /// Aggregate counts for reporting
    pub fn summary(&self) -> ResultSummary {
        let mut rejections_by_reason = BTreeMap::new();
        for rejected in &self.rejected_regions {
            *rejections_by_reason.entry(rejected.reason.clone()).or_insert(0) += 1;
        }
        let mut probes_by_type = BTreeMap::new();
        for probe in &self.probes {
            *probes_by_type
                .entry(probe.metadata().target_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        ResultSummary {
            probes: self.probes.len(),
            candidate_targets: self.candidate_targets.len(),
            covered_targets: self.covered_targets.len(),
            rejected_regions: self.rejected_regions.len(),
            rejected_bases: self.rejected_regions.iter().map(|r| r.region.len()).sum(),
            rejections_by_reason,
            probes_by_type,
        }
    }
}

impl FromIterator<ProbeGenerationResult> for ProbeGenerationResult {
    fn from_iter<I: IntoIterator<Item = ProbeGenerationResult>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::combine)
    }
}

/// Counts describing a [`ProbeGenerationResult`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub probes: usize,
    pub candidate_targets: usize,
    pub covered_targets: usize,
    pub rejected_regions: usize,
    pub rejected_bases: i64,
    /// Rejected region counts keyed by reason text
    pub rejections_by_reason: BTreeMap<String, usize>,
    /// Probe counts keyed by target type
    pub probes_by_type: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{SequenceDefinition, TargetType};

    fn iv(start: i64, end: i64) -> GenomicInterval {
        GenomicInterval::new("chr1", start, end).unwrap()
    }

    fn metadata(target_type: TargetType) -> TargetMetadata {
        TargetMetadata::new(target_type, "result")
    }

    fn probe(start: i64, target_type: TargetType) -> Probe {
        Probe::new(
            SequenceDefinition::single_region(iv(start, start + 3)),
            "ACGT".to_string(),
            metadata(target_type),
            Some(1.0),
        )
    }

    fn sample(start: i64) -> ProbeGenerationResult {
        ProbeGenerationResult {
            probes: vec![probe(start, TargetType::GeneExon)],
            candidate_targets: vec![TargetRegion::new(
                iv(start, start + 10),
                metadata(TargetType::GeneExon),
            )],
            covered_targets: vec![TargetRegion::new(
                iv(start, start + 3),
                metadata(TargetType::GeneExon),
            )],
            rejected_regions: vec![RejectedRegion::new(
                iv(start + 4, start + 10),
                metadata(TargetType::GeneExon),
                "no probe",
            )],
        }
    }

    #[test]
    fn test_empty_is_identity() {
        let a = sample(1);
        assert_eq!(ProbeGenerationResult::new().combine(a.clone()), a);
        assert_eq!(a.clone().combine(ProbeGenerationResult::new()), a);
        assert!(ProbeGenerationResult::new().is_empty());
    }

    #[test]
    fn test_combine_is_associative() {
        let (a, b, c) = (sample(1), sample(100), sample(200));
        let left = a.clone().combine(b.clone()).combine(c.clone());
        let right = a.combine(b.combine(c));
        assert_eq!(left, right);
        assert_eq!(left.probes.len(), 3);
        assert_eq!(left.probes[1].region(), Some(&iv(100, 103)));
    }

    #[test]
    fn test_combine_keeps_duplicates() {
        let combined = sample(1).combine(sample(1));
        assert_eq!(combined.probes.len(), 2);
        assert_eq!(combined.covered_targets.len(), 2);
    }

    #[test]
    fn test_collect() {
        let combined: ProbeGenerationResult = (0..4).map(|i| sample(i * 50 + 1)).collect();
        assert_eq!(combined.candidate_targets.len(), 4);
    }

    #[test]
    fn test_rejected_constructor() {
        let result = ProbeGenerationResult::rejected(
            iv(1, 50),
            metadata(TargetType::CustomRegion),
            "too short",
        );
        assert_eq!(result.candidate_targets.len(), 1);
        assert_eq!(result.rejected_regions[0].region, iv(1, 50));
        assert!(result.probes.is_empty());
    }

    #[test]
    fn test_summary() {
        let mut result = sample(1).combine(sample(100));
        result.probes.push(probe(300, TargetType::AmberSite));
        let summary = result.summary();
        assert_eq!(summary.probes, 3);
        assert_eq!(summary.rejected_regions, 2);
        assert_eq!(summary.rejected_bases, 14);
        assert_eq!(summary.rejections_by_reason.get("no probe"), Some(&2));
        assert_eq!(summary.probes_by_type.get("GENE_EXON"), Some(&2));
        assert_eq!(summary.probes_by_type.get("AMBER_SITE"), Some(&1));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(sample(1)).unwrap();
        assert_eq!(json["rejected_regions"][0]["reason"], "no probe");
        assert_eq!(json["candidate_targets"][0]["metadata"]["target_type"], "GENE_EXON");
    }
}
