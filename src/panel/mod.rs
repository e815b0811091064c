//! Panel accumulation across generation phases
//!
//! [`PanelData`] owns everything placed so far: the combined
//! [`ProbeGenerationResult`] and a [`CoverageIndex`] of the accepted probes.
//! Phases run in the order they are called; each one sees the coverage of
//! the phases before it, never its own.
//!
//! # Example
//!
//! ```
//! use ferro_panel::config::PanelConfig;
//! use ferro_panel::evaluate::Criteria;
//! use ferro_panel::generate::{ProbeGenerationSpec, ProbeGenerator};
//! use ferro_panel::panel::PanelData;
//! use ferro_panel::probe::{TargetMetadata, TargetType};
//! use ferro_panel::quality::MockScorer;
//! use ferro_panel::reference::InMemoryGenome;
//! use ferro_panel::region::GenomicInterval;
//! use ferro_panel::select::SelectionStrategy;
//!
//! let genome = InMemoryGenome::new().with_chromosome("chr1", "ACGT".repeat(1000));
//! let generator =
//!     ProbeGenerator::new(PanelConfig::default(), genome, MockScorer::default()).unwrap();
//!
//! let spec = ProbeGenerationSpec::CoverRegion {
//!     region: GenomicInterval::new("chr1", 1000, 1400).unwrap(),
//!     metadata: TargetMetadata::new(TargetType::GeneExon, "GENE exon 1"),
//!     criteria: Criteria::default(),
//!     strategy: SelectionStrategy::max_quality(),
//! };
//!
//! let mut panel = PanelData::new();
//! let first = panel.run_phase("genes", &generator, vec![spec.clone()]).unwrap();
//! assert_eq!(first.probes, 4);
//!
//! // The same target in a later phase is already covered
//! let second = panel.run_phase("custom", &generator, vec![spec]).unwrap();
//! assert_eq!(second.probes, 0);
//! ```

use log::info;
use serde::Serialize;

use crate::coverage::{CoverageIndex, PanelCoverage};
use crate::error::PanelError;
use crate::generate::{ProbeGenerationSpec, ProbeGenerator};
use crate::probe::{is_normal_dna, Probe};
use crate::quality::QualityScorer;
use crate::reference::RefGenome;
use crate::region::GenomicInterval;
use crate::result::{ProbeGenerationResult, ResultSummary};

/// Summary of one completed phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseSummary {
    pub name: String,
    pub summary: ResultSummary,
}

/// Accumulated panel state
#[derive(Debug, Clone, Default)]
pub struct PanelData {
    result: ProbeGenerationResult,
    coverage: CoverageIndex,
    phases: Vec<PhaseSummary>,
}

impl PanelData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything accumulated so far, in phase order
    pub fn result(&self) -> &ProbeGenerationResult {
        &self.result
    }

    pub fn into_result(self) -> ProbeGenerationResult {
        self.result
    }

    pub fn coverage(&self) -> &CoverageIndex {
        &self.coverage
    }

    pub fn phases(&self) -> &[PhaseSummary] {
        &self.phases
    }

    pub fn probe_count(&self) -> usize {
        self.result.probes.len()
    }

    /// Fold a result into the panel
    ///
    /// Every probe must be accepted, contain only A, C, G, T, and match its
    /// definition's length. On violation nothing is added.
    pub fn add(&mut self, result: ProbeGenerationResult) -> Result<(), PanelError> {
        for probe in &result.probes {
            check_accepted_probe(probe)?;
        }
        for probe in &result.probes {
            self.coverage.add_probe(probe);
        }
        self.result.extend(result);
        Ok(())
    }

    /// Generate every request of one phase against the coverage of the
    /// previous phases, then fold the phase result in
    ///
    /// # Errors
    ///
    /// Fails on the first request that is structurally invalid; the panel
    /// is left unchanged in that case.
    pub fn run_phase<R, Q, I>(
        &mut self,
        name: &str,
        generator: &ProbeGenerator<R, Q>,
        specs: I,
    ) -> Result<ResultSummary, PanelError>
    where
        R: RefGenome,
        Q: QualityScorer,
        I: IntoIterator<Item = ProbeGenerationSpec>,
    {
        let mut phase = ProbeGenerationResult::new();
        let mut requests = 0usize;
        for spec in specs {
            phase.extend(generator.generate(&spec, Some(&self.coverage))?);
            requests += 1;
        }

        let summary = phase.summary();
        self.add(phase)?;
        info!(
            "Phase {}: {} requests, {} probes, {} covered targets, {} rejected regions ({} bases)",
            name,
            requests,
            summary.probes,
            summary.covered_targets,
            summary.rejected_regions,
            summary.rejected_bases
        );
        self.phases.push(PhaseSummary {
            name: name.to_string(),
            summary: summary.clone(),
        });
        Ok(summary)
    }
}

impl PanelCoverage for PanelData {
    fn covered_regions(&self, chromosome: &str) -> &[GenomicInterval] {
        self.coverage.covered_regions(chromosome)
    }
}

fn check_accepted_probe(probe: &Probe) -> Result<(), PanelError> {
    if !probe.is_accepted() {
        return Err(PanelError::InvalidSequence {
            msg: format!("probe {} was not accepted", probe),
        });
    }
    if !is_normal_dna(probe.sequence()) {
        return Err(PanelError::InvalidSequence {
            msg: format!("accepted probe {} has non-ACGT bases", probe),
        });
    }
    if probe.sequence().len() as i64 != probe.definition().len() {
        return Err(PanelError::InvalidSequence {
            msg: format!(
                "accepted probe {} has {} bases, definition has {}",
                probe,
                probe.sequence().len(),
                probe.definition().len()
            ),
        });
    }
    Ok(())
}
