// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-panel: probe placement and selection for capture panels
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! Given target regions, positions, or explicit variant sequences, the
//! engine enumerates candidate probes of a fixed length, scores and filters
//! them against quality and GC criteria, and tiles each target with the
//! fewest acceptable probes. Targets are placed in phases; later phases see
//! the coverage of earlier ones, so overlapping targets are not tiled twice.
//! Anything that cannot be covered is reported as a rejected region rather
//! than an error.
//!
//! # Example
//!
//! ```
//! use ferro_panel::{
//!     Criteria, GenomicInterval, InMemoryGenome, MockScorer, PanelConfig, PanelData,
//!     ProbeGenerationSpec, ProbeGenerator, SelectionStrategy, TargetMetadata, TargetType,
//! };
//!
//! let genome = InMemoryGenome::new().with_chromosome("chr1", "ACGT".repeat(1000));
//! let generator =
//!     ProbeGenerator::new(PanelConfig::default(), genome, MockScorer::default()).unwrap();
//!
//! let mut panel = PanelData::new();
//! let summary = panel
//!     .run_phase(
//!         "genes",
//!         &generator,
//!         vec![ProbeGenerationSpec::CoverRegion {
//!             region: GenomicInterval::new("chr1", 1000, 1400).unwrap(),
//!             metadata: TargetMetadata::new(TargetType::GeneExon, "GENE exon 1"),
//!             criteria: Criteria::default(),
//!             strategy: SelectionStrategy::max_quality(),
//!         }],
//!     )
//!     .unwrap();
//! assert_eq!(summary.probes, 4);
//! assert_eq!(summary.rejected_regions, 0);
//! ```

pub mod candidate;
pub mod config;
pub mod coverage;
pub mod error;
pub mod evaluate;
pub mod generate;
pub mod panel;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod probe;
pub mod quality;
pub mod reference;
pub mod region;
pub mod result;
pub mod select;

// Re-export commonly used types
pub use config::{PanelConfig, TilingConfig};
pub use coverage::{CoverageIndex, CoveragePolicy, PanelCoverage};
pub use error::{ErrorCode, PanelError};
pub use evaluate::{Criteria, RejectionReason};
pub use generate::{ProbeGenerationSpec, ProbeGenerator};
pub use panel::PanelData;
pub use probe::{
    OrientedRegion, Probe, ProbeGeometry, SequenceDefinition, TargetMetadata, TargetType,
};
pub use quality::{MockScorer, QualityScorer};
pub use reference::{InMemoryGenome, RefGenome};
pub use region::{GenomicInterval, GenomicPosition};
pub use result::{ProbeGenerationResult, RejectedRegion, ResultSummary, TargetRegion};
pub use select::SelectionStrategy;

/// Result type alias for ferro-panel operations
pub type Result<T> = std::result::Result<T, PanelError>;
