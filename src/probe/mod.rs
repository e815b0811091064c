//! Probes and the metadata describing what they target
//!
//! A [`Probe`] is built from an immutable [`SequenceDefinition`] recipe by the
//! [`ProbeFactory`], starts out unevaluated, and is stamped accepted or
//! rejected by [`evaluate`](crate::evaluate::evaluate).

pub mod factory;
pub mod geometry;
pub mod sequence;

pub use factory::ProbeFactory;
pub use geometry::ProbeGeometry;
pub use sequence::{reverse_complement, OrientedRegion, SequenceDefinition, SequenceShape};

use serde::Serialize;
use std::fmt;

use crate::evaluate::{Criteria, RejectionReason};
use crate::region::GenomicInterval;

/// The kind of target a probe was generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    /// Coding or non-coding exon of a gene
    GeneExon,
    /// Promoter region upstream of a gene
    GenePromoter,
    /// Flanking region up- or downstream of a gene
    GeneFlank,
    /// Evenly spaced backbone sites for copy number estimation
    #[serde(rename = "CN_BACKBONE")]
    CopyNumberBackbone,
    /// Heterozygous SNP sites used for B-allele frequency
    AmberSite,
    /// Structural variant breakend
    StructuralVariant,
    /// User supplied region
    CustomRegion,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::GeneExon => "GENE_EXON",
            TargetType::GenePromoter => "GENE_PROMOTER",
            TargetType::GeneFlank => "GENE_FLANK",
            TargetType::CopyNumberBackbone => "CN_BACKBONE",
            TargetType::AmberSite => "AMBER_SITE",
            TargetType::StructuralVariant => "STRUCTURAL_VARIANT",
            TargetType::CustomRegion => "CUSTOM_REGION",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a probe or region is aiming to hit
///
/// Used as the grouping key when covered regions are merged, so two
/// targets are "the same" only if all three fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetMetadata {
    pub target_type: TargetType,
    /// Free-form description, e.g. a gene and exon name
    pub description: String,
    /// Opaque payload carried through for summary statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

impl TargetMetadata {
    pub fn new(target_type: TargetType, description: impl Into<String>) -> Self {
        Self {
            target_type,
            description: description.into(),
            extra: None,
        }
    }

    /// Attach an opaque payload
    pub fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.extra = Some(extra);
        self
    }
}

impl fmt::Display for TargetMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.target_type, self.description)
    }
}

/// Outcome of evaluating a probe against a [`Criteria`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub criteria: Criteria,
    /// `None` if the probe was accepted
    pub rejection: Option<RejectionReason>,
}

/// A realized probe with its evaluation state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Probe {
    definition: SequenceDefinition,
    sequence: String,
    metadata: TargetMetadata,
    quality_score: Option<f64>,
    gc_content: f64,
    evaluation: Option<Evaluation>,
}

impl Probe {
    /// Create an unevaluated probe
    ///
    /// GC content is computed from `sequence`. `quality_score` is `None`
    /// when the sequence could not be scored (e.g. it contains `N`).
    pub fn new(
        definition: SequenceDefinition,
        sequence: String,
        metadata: TargetMetadata,
        quality_score: Option<f64>,
    ) -> Self {
        let gc_content = gc_fraction(&sequence);
        Self {
            definition,
            sequence,
            metadata,
            quality_score,
            gc_content,
            evaluation: None,
        }
    }

    pub fn definition(&self) -> &SequenceDefinition {
        &self.definition
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn metadata(&self) -> &TargetMetadata {
        &self.metadata
    }

    pub fn quality_score(&self) -> Option<f64> {
        self.quality_score
    }

    pub fn gc_content(&self) -> f64 {
        self.gc_content
    }

    /// The reference interval, if the probe is a plain reference region
    pub fn region(&self) -> Option<&GenomicInterval> {
        self.definition.as_single_region()
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    pub fn criteria(&self) -> Option<&Criteria> {
        self.evaluation.as_ref().map(|e| &e.criteria)
    }

    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        self.evaluation.as_ref().and_then(|e| e.rejection)
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluation.is_some()
    }

    pub fn is_accepted(&self) -> bool {
        matches!(&self.evaluation, Some(e) if e.rejection.is_none())
    }

    pub fn is_rejected(&self) -> bool {
        matches!(&self.evaluation, Some(e) if e.rejection.is_some())
    }

    pub(crate) fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluation = Some(evaluation);
        self
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.definition, self.metadata)
    }
}

/// Fraction of G/C bases (case-insensitive); 0 for an empty sequence
pub fn gc_fraction(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }
    let gc = sequence
        .bytes()
        .filter(|b| matches!(b, b'G' | b'C' | b'g' | b'c'))
        .count();
    gc as f64 / sequence.len() as f64
}

/// True if every base is one of A, C, G, T (case-insensitive)
pub fn is_normal_dna(sequence: &str) -> bool {
    sequence
        .bytes()
        .all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T'))
}
