//! Probe placement engine
//!
//! [`ProbeGenerator`] composes candidate generation, evaluation, selection,
//! tiling and local shift into the placement operations:
//!
//! - [`cover_region`](ProbeGenerator::cover_region): tile a whole target,
//!   skipping parts already covered by earlier phases
//! - [`cover_one_subregion`](ProbeGenerator::cover_one_subregion): one
//!   probe inside a region
//! - [`cover_position`](ProbeGenerator::cover_position) and
//!   [`cover_one_of_positions`](ProbeGenerator::cover_one_of_positions):
//!   one probe on a position set
//! - [`cover_sequence`](ProbeGenerator::cover_sequence): exactly one
//!   caller-defined (usually variant) probe
//!
//! A target that cannot be satisfied always produces a
//! [`RejectedRegion`]; only structural misuse returns `Err`.
//!
//! # Example
//!
//! ```
//! use ferro_panel::config::PanelConfig;
//! use ferro_panel::evaluate::Criteria;
//! use ferro_panel::generate::ProbeGenerator;
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
//! let region = GenomicInterval::new("chr1", 1000, 1400).unwrap();
//! let metadata = TargetMetadata::new(TargetType::CustomRegion, "doc");
//! let criteria = Criteria::default();
//! let strategy = SelectionStrategy::max_quality();
//! let result = generator
//!     .cover_region(&region, &metadata, &criteria, &strategy, None)
//!     .unwrap();
//! assert_eq!(result.probes.len(), 4);
//! assert!(result.rejected_regions.is_empty());
//! ```

pub mod request;
pub mod shift;
pub mod tiling;

pub use request::ProbeGenerationSpec;
pub use shift::LocalShift;

use std::cmp::{max, min};
use std::collections::BTreeMap;

use log::{debug, trace, warn};

use crate::candidate::CandidateGenerator;
use crate::config::PanelConfig;
use crate::coverage::PanelCoverage;
use crate::error::PanelError;
use crate::evaluate::{evaluate, evaluate_all, Criteria};
use crate::probe::{Probe, ProbeFactory, ProbeGeometry, SequenceDefinition, TargetMetadata};
use crate::quality::QualityScorer;
use crate::reference::RefGenome;
use crate::region::{merge_overlapping_or_adjacent, uncovered, GenomicInterval, GenomicPosition};
use crate::result::{ProbeGenerationResult, RejectedRegion, TargetRegion};
use crate::select::{select_best, SelectionStrategy};

/// Probes and rejections produced for one uncovered sub-interval
#[derive(Debug, Default)]
struct SubregionPlacement {
    probes: Vec<Probe>,
    rejected: Vec<RejectedRegion>,
}

/// Places probes for target requests
pub struct ProbeGenerator<R, Q> {
    config: PanelConfig,
    geometry: ProbeGeometry,
    candidates: CandidateGenerator,
    factory: ProbeFactory<R, Q>,
}

impl<R: RefGenome, Q: QualityScorer> ProbeGenerator<R, Q> {
    /// Create a generator
    ///
    /// # Errors
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: PanelConfig, genome: R, scorer: Q) -> Result<Self, PanelError> {
        config.validate()?;
        let geometry = ProbeGeometry::new(config.probe_length);
        Ok(Self {
            config,
            geometry,
            candidates: CandidateGenerator::new(geometry),
            factory: ProbeFactory::new(genome, scorer),
        })
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn geometry(&self) -> &ProbeGeometry {
        &self.geometry
    }

    pub fn factory(&self) -> &ProbeFactory<R, Q> {
        &self.factory
    }

    /// Dispatch one request
    ///
    /// `coverage` is consulted by the coverage-aware operations
    /// (`CoverRegion` and `CoverSequence`).
    pub fn generate(
        &self,
        spec: &ProbeGenerationSpec,
        coverage: Option<&dyn PanelCoverage>,
    ) -> Result<ProbeGenerationResult, PanelError> {
        trace!(
            "{} [{}] with criteria {}",
            spec.kind(),
            spec.metadata(),
            spec.criteria()
        );
        match spec {
            ProbeGenerationSpec::CoverRegion {
                region,
                metadata,
                criteria,
                strategy,
            } => self.cover_region(region, metadata, criteria, strategy, coverage),
            ProbeGenerationSpec::CoverOneSubregion {
                region,
                metadata,
                criteria,
                strategy,
            } => self.cover_one_subregion(region, metadata, criteria, strategy),
            ProbeGenerationSpec::CoverOneOfPositions {
                positions,
                metadata,
                criteria,
                strategy,
            } => self.cover_one_of_positions(positions, metadata, criteria, strategy),
            ProbeGenerationSpec::CoverPosition {
                position,
                metadata,
                criteria,
                strategy,
            } => self.cover_position(position, metadata, criteria, strategy),
            ProbeGenerationSpec::CoverSequence {
                definition,
                metadata,
                criteria,
            } => self.cover_sequence(definition, metadata, criteria, coverage),
        }
    }

    /// Cover every base of `region` with a minimal tiling of acceptable probes
    ///
    /// With a coverage oracle only the uncovered parts of `region` are
    /// tiled. Each part is scanned for acceptable probes; every maximal run
    /// of overlapping acceptable probes bounds one tiling, and each tiled
    /// position is refined by local shift. Bases that end up uncovered are
    /// rejected, except edge bases the tiling left out on purpose.
    pub fn cover_region(
        &self,
        region: &GenomicInterval,
        metadata: &TargetMetadata,
        criteria: &Criteria,
        strategy: &SelectionStrategy,
        coverage: Option<&dyn PanelCoverage>,
    ) -> Result<ProbeGenerationResult, PanelError> {
        let chromosome_length = self.chromosome_length(region)?;
        let targets = match coverage {
            Some(coverage) => coverage.uncovered_parts(region),
            None => vec![region.clone()],
        };

        let mut result =
            ProbeGenerationResult::candidate(TargetRegion::new(region.clone(), metadata.clone()));
        if targets.is_empty() {
            debug!("{} [{}] is already covered", region, metadata);
            return Ok(result);
        }

        for target in &targets {
            let placement =
                self.cover_subinterval(target, chromosome_length, metadata, criteria, strategy)?;
            result.probes.extend(placement.probes);
            result.rejected_regions.extend(placement.rejected);
        }

        let placed = merge_overlapping_or_adjacent(
            result.probes.iter().filter_map(|probe| probe.region().cloned()),
        );
        result.covered_targets = placed
            .iter()
            .filter_map(|interval| interval.intersect(region))
            .map(|covered| TargetRegion::new(covered, metadata.clone()))
            .collect();

        debug!(
            "{} [{}]: {} uncovered parts, {} probes, {} rejected regions",
            region,
            metadata,
            targets.len(),
            result.probes.len(),
            result.rejected_regions.len()
        );
        Ok(result)
    }

    fn cover_subinterval(
        &self,
        target: &GenomicInterval,
        chromosome_length: i64,
        metadata: &TargetMetadata,
        criteria: &Criteria,
        strategy: &SelectionStrategy,
    ) -> Result<SubregionPlacement, PanelError> {
        let evaluated = self.evaluated(
            self.candidates.overlapping(target, chromosome_length),
            metadata,
            criteria,
        )?;
        let accepted: BTreeMap<i64, Probe> = evaluated
            .into_iter()
            .filter(Probe::is_accepted)
            .filter_map(|probe| {
                let start = probe.region()?.start();
                Some((start, probe))
            })
            .collect();
        let acceptable = merge_overlapping_or_adjacent(
            accepted.values().filter_map(|probe| probe.region().cloned()),
        );

        let mut placement = SubregionPlacement::default();
        for gap in uncovered(target, &acceptable) {
            placement.rejected.push(RejectedRegion::new(
                gap,
                metadata.clone(),
                format!("no probe meeting criteria {}", criteria),
            ));
        }

        for bounds in &acceptable {
            let Some(tiled) = bounds.intersect(target) else {
                continue;
            };
            let ideal = tiling::tile(&tiled, bounds, &self.geometry, &self.config.tiling);
            if ideal.is_empty() {
                warn!(
                    "No tiling of {} fits acceptable region {} [{}]",
                    tiled, bounds, metadata
                );
                placement.rejected.push(RejectedRegion::new(
                    tiled,
                    metadata.clone(),
                    format!(
                        "no probe tiling within acceptable region {} meeting criteria {}",
                        bounds, criteria
                    ),
                ));
                continue;
            }

            let shift = LocalShift {
                region: &tiled,
                bounds,
                geometry: self.geometry,
                shift_max: self.config.tiling.shift_max,
            };
            let placed = shift.place(&ideal, &accepted, strategy);
            let placed_regions: Vec<GenomicInterval> = placed
                .iter()
                .filter_map(|probe| probe.region().cloned())
                .collect();

            // Edge bases the tiling leaves out on purpose are not rejections
            let first = ideal[0];
            let last = self.geometry.end_for_start(ideal[ideal.len() - 1]);
            if let Some(intended) =
                tiled.with_bounds(max(first, tiled.start()), min(last, tiled.end()))
            {
                for gap in uncovered(&intended, &placed_regions) {
                    placement.rejected.push(RejectedRegion::new(
                        gap,
                        metadata.clone(),
                        format!("no probe found meeting criteria {} and tiling", criteria),
                    ));
                }
            }
            placement.probes.extend(placed);
        }

        placement.rejected.sort_by(|a, b| a.region.cmp(&b.region));
        Ok(placement)
    }

    /// Place the single best probe lying entirely inside `region`
    ///
    /// Candidates are tried outward from the region's center. A region
    /// shorter than the probe is rejected.
    pub fn cover_one_subregion(
        &self,
        region: &GenomicInterval,
        metadata: &TargetMetadata,
        criteria: &Criteria,
        strategy: &SelectionStrategy,
    ) -> Result<ProbeGenerationResult, PanelError> {
        self.chromosome_length(region)?;
        let reason = || format!("no probe within region meeting criteria {}", criteria);
        if region.len() < self.geometry.length() {
            debug!(
                "{} [{}] is shorter than the probe length {}",
                region,
                metadata,
                self.geometry.length()
            );
            return Ok(ProbeGenerationResult::rejected(
                region.clone(),
                metadata.clone(),
                reason(),
            ));
        }

        let candidates: Vec<GenomicInterval> = self
            .candidates
            .outward_from(region.chromosome(), region.center(), region.start(), region.end())?
            .collect();
        let best = select_best(self.evaluated(candidates, metadata, criteria)?, strategy);
        Ok(self.single_probe_result(region, metadata, best, reason))
    }

    /// Place the best probe containing `position`, searching outward from
    /// the probe centered on it
    pub fn cover_position(
        &self,
        position: &GenomicPosition,
        metadata: &TargetMetadata,
        criteria: &Criteria,
        strategy: &SelectionStrategy,
    ) -> Result<ProbeGenerationResult, PanelError> {
        let target = position.to_interval();
        let chromosome_length = self.chromosome_length(&target)?;
        let min_start = max(1, self.geometry.start_for_end(position.position()));
        let max_end = min(
            chromosome_length,
            self.geometry.end_for_start(position.position()),
        );
        let reason = || format!("no probe covering {} meeting criteria {}", position, criteria);
        if max_end - min_start + 1 < self.geometry.length() {
            debug!(
                "{} [{}] is on a chromosome shorter than the probe length {}",
                position,
                metadata,
                self.geometry.length()
            );
            return Ok(ProbeGenerationResult::rejected(target, metadata.clone(), reason()));
        }

        let candidates: Vec<GenomicInterval> = self
            .candidates
            .outward_from(position.chromosome(), position.position(), min_start, max_end)?
            .collect();
        let best = select_best(self.evaluated(candidates, metadata, criteria)?, strategy);
        Ok(self.single_probe_result(&target, metadata, best, reason))
    }

    /// Place the best probe centered on any one of `positions`
    ///
    /// A single position is delegated to [`cover_position`](Self::cover_position).
    ///
    /// # Errors
    ///
    /// Fails if `positions` is empty or spans several chromosomes.
    pub fn cover_one_of_positions(
        &self,
        positions: &[GenomicPosition],
        metadata: &TargetMetadata,
        criteria: &Criteria,
        strategy: &SelectionStrategy,
    ) -> Result<ProbeGenerationResult, PanelError> {
        let (first, rest) = positions
            .split_first()
            .ok_or_else(|| PanelError::geometry("no positions to cover"))?;
        if rest.is_empty() {
            return self.cover_position(first, metadata, criteria, strategy);
        }
        if let Some(other) = rest.iter().find(|p| p.chromosome() != first.chromosome()) {
            return Err(PanelError::geometry(format!(
                "positions {} and {} are on different chromosomes",
                first, other
            )));
        }

        let lo = positions.iter().map(GenomicPosition::position).min();
        let hi = positions.iter().map(GenomicPosition::position).max();
        let (Some(lo), Some(hi)) = (lo, hi) else {
            return Err(PanelError::geometry("no positions to cover"));
        };
        let union = GenomicInterval::new(first.chromosome(), lo, hi)?;
        let chromosome_length = self.chromosome_length(&union)?;

        let candidates: Vec<GenomicInterval> = self
            .candidates
            .centered_at_each(
                first.chromosome(),
                positions.iter().map(GenomicPosition::position),
                chromosome_length,
            )
            .collect();
        let best = select_best(self.evaluated(candidates, metadata, criteria)?, strategy);
        Ok(self.single_probe_result(&union, metadata, best, || {
            format!(
                "no probe centered on any of {} positions meeting criteria {}",
                positions.len(),
                criteria
            )
        }))
    }

    /// Place exactly the probe described by `definition`
    ///
    /// If the definition is subject to coverage checks and all its
    /// reference pieces are already covered, no probe is built and the
    /// pieces are recorded as covered.
    ///
    /// # Errors
    ///
    /// Fails if the definition is not exactly one probe length long, or
    /// if its reference pieces are unmapped.
    pub fn cover_sequence(
        &self,
        definition: &SequenceDefinition,
        metadata: &TargetMetadata,
        criteria: &Criteria,
        coverage: Option<&dyn PanelCoverage>,
    ) -> Result<ProbeGenerationResult, PanelError> {
        if definition.len() != self.geometry.length() {
            return Err(PanelError::InvalidDefinition {
                msg: format!(
                    "{} is {} bases, probes are {}",
                    definition,
                    definition.len(),
                    self.geometry.length()
                ),
            });
        }

        let targets: Vec<TargetRegion> = definition
            .reference_regions()
            .into_iter()
            .map(|region| TargetRegion::new(region.clone(), metadata.clone()))
            .collect();
        let mut result = ProbeGenerationResult {
            candidate_targets: targets.clone(),
            ..ProbeGenerationResult::default()
        };

        if let Some(coverage) = coverage {
            if self.config.coverage.is_covered(definition, coverage) {
                debug!("{} [{}] is already covered", definition, metadata);
                result.covered_targets = targets;
                return Ok(result);
            }
        }

        let probe = evaluate(
            self.factory.create_probe(definition.clone(), metadata)?,
            criteria,
        );
        match probe.rejection_reason() {
            None => {
                debug!("{} [{}]: accepted", definition, metadata);
                result.covered_targets = targets;
                result.probes.push(probe);
            }
            Some(reason) => {
                debug!("{} [{}]: rejected on {}", definition, metadata, reason);
                result.rejected_regions = targets
                    .into_iter()
                    .map(|target| {
                        RejectedRegion::new(
                            target.region,
                            target.metadata,
                            format!(
                                "probe {} failed {} check with criteria {}",
                                definition, reason, criteria
                            ),
                        )
                    })
                    .collect();
            }
        }
        Ok(result)
    }

    /// Chromosome length, failing if `region` runs past it
    fn chromosome_length(&self, region: &GenomicInterval) -> Result<i64, PanelError> {
        let length = self.factory.genome().chromosome_length(region.chromosome())?;
        if region.end() > length {
            return Err(PanelError::RegionOutOfBounds {
                chromosome: region.chromosome().to_string(),
                start: region.start(),
                end: region.end(),
                length,
            });
        }
        Ok(length)
    }

    /// Build and evaluate reference probes for `intervals`, in order
    fn evaluated<I>(
        &self,
        intervals: I,
        metadata: &TargetMetadata,
        criteria: &Criteria,
    ) -> Result<Vec<Probe>, PanelError>
    where
        I: IntoIterator<Item = GenomicInterval>,
    {
        let definitions: Vec<SequenceDefinition> = intervals
            .into_iter()
            .map(SequenceDefinition::single_region)
            .collect();
        let probes = self.factory.create_probes(definitions, metadata)?;
        Ok(evaluate_all(probes, criteria))
    }

    fn single_probe_result<F>(
        &self,
        target: &GenomicInterval,
        metadata: &TargetMetadata,
        best: Option<Probe>,
        reason: F,
    ) -> ProbeGenerationResult
    where
        F: FnOnce() -> String,
    {
        match best {
            Some(probe) => {
                debug!("{} [{}]: placed {}", target, metadata, probe.definition());
                let mut result = ProbeGenerationResult::candidate(TargetRegion::new(
                    target.clone(),
                    metadata.clone(),
                ));
                if let Some(covered) = probe.region().and_then(|region| region.intersect(target)) {
                    result
                        .covered_targets
                        .push(TargetRegion::new(covered, metadata.clone()));
                }
                result.probes.push(probe);
                result
            }
            None => {
                debug!("{} [{}]: no acceptable probe", target, metadata);
                ProbeGenerationResult::rejected(target.clone(), metadata.clone(), reason())
            }
        }
    }
}
