//! Probe generation requests
//!
//! Target sources (genes, custom regions, fixed sites, structural variants)
//! hand the engine a stream of these, in the priority order they should be
//! placed.

use crate::evaluate::Criteria;
use crate::probe::{SequenceDefinition, TargetMetadata};
use crate::region::{GenomicInterval, GenomicPosition};
use crate::select::SelectionStrategy;

/// One placement request
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeGenerationSpec {
    /// Tile the whole region, skipping parts already covered
    CoverRegion {
        region: GenomicInterval,
        metadata: TargetMetadata,
        criteria: Criteria,
        strategy: SelectionStrategy,
    },
    /// One probe lying entirely inside the region
    CoverOneSubregion {
        region: GenomicInterval,
        metadata: TargetMetadata,
        criteria: Criteria,
        strategy: SelectionStrategy,
    },
    /// One probe centered on any of the positions
    CoverOneOfPositions {
        positions: Vec<GenomicPosition>,
        metadata: TargetMetadata,
        criteria: Criteria,
        strategy: SelectionStrategy,
    },
    /// One probe containing the position, as close to centered as possible
    CoverPosition {
        position: GenomicPosition,
        metadata: TargetMetadata,
        criteria: Criteria,
        strategy: SelectionStrategy,
    },
    /// Exactly the probe described by the definition
    CoverSequence {
        definition: SequenceDefinition,
        metadata: TargetMetadata,
        criteria: Criteria,
    },
}

impl ProbeGenerationSpec {
    pub fn metadata(&self) -> &TargetMetadata {
        match self {
            ProbeGenerationSpec::CoverRegion { metadata, .. }
            | ProbeGenerationSpec::CoverOneSubregion { metadata, .. }
            | ProbeGenerationSpec::CoverOneOfPositions { metadata, .. }
            | ProbeGenerationSpec::CoverPosition { metadata, .. }
            | ProbeGenerationSpec::CoverSequence { metadata, .. } => metadata,
        }
    }

    pub fn criteria(&self) -> &Criteria {
        match self {
            ProbeGenerationSpec::CoverRegion { criteria, .. }
            | ProbeGenerationSpec::CoverOneSubregion { criteria, .. }
            | ProbeGenerationSpec::CoverOneOfPositions { criteria, .. }
            | ProbeGenerationSpec::CoverPosition { criteria, .. }
            | ProbeGenerationSpec::CoverSequence { criteria, .. } => criteria,
        }
    }

    /// Short name of the request kind, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeGenerationSpec::CoverRegion { .. } => "cover_region",
            ProbeGenerationSpec::CoverOneSubregion { .. } => "cover_one_subregion",
            ProbeGenerationSpec::CoverOneOfPositions { .. } => "cover_one_of_positions",
            ProbeGenerationSpec::CoverPosition { .. } => "cover_position",
            ProbeGenerationSpec::CoverSequence { .. } => "cover_sequence",
        }
    }
}
