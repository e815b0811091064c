//! Realization of sequence definitions into probes
//!
//! The factory looks up reference bases, assembles variant sequences,
//! and obtains quality scores. Scoring prefers the scorer's region fast
//! path; everything else is scored in one batch per call, and the scores
//! are scattered back to their probes in input order.

use log::trace;

use crate::error::PanelError;
use crate::probe::sequence::{reverse_complement, OrientedRegion, SequenceShape};
use crate::probe::{is_normal_dna, Probe, SequenceDefinition, TargetMetadata};
use crate::quality::QualityScorer;
use crate::reference::RefGenome;

/// Builds unevaluated [`Probe`]s from [`SequenceDefinition`]s
pub struct ProbeFactory<R, Q> {
    genome: R,
    scorer: Q,
}

impl<R: RefGenome, Q: QualityScorer> ProbeFactory<R, Q> {
    pub fn new(genome: R, scorer: Q) -> Self {
        Self { genome, scorer }
    }

    pub fn genome(&self) -> &R {
        &self.genome
    }

    pub fn scorer(&self) -> &Q {
        &self.scorer
    }

    /// Build the bases described by `definition`
    ///
    /// # Errors
    ///
    /// Fails if a reference piece is unmapped, or if the assembled sequence
    /// length disagrees with the definition.
    pub fn realize(&self, definition: &SequenceDefinition) -> Result<String, PanelError> {
        let sequence = match definition.shape() {
            SequenceShape::SingleRegion { region } => self.genome.bases(region)?,
            SequenceShape::TwoSided { start, insert, end } => {
                let mut sequence = self.piece(start)?;
                sequence.push_str(insert);
                sequence.push_str(&self.piece(end)?);
                sequence
            }
            SequenceShape::StartInsert { start, insert } => {
                let mut sequence = self.piece(start)?;
                sequence.push_str(insert);
                sequence
            }
            SequenceShape::InsertEnd { insert, end } => {
                let mut sequence = insert.clone();
                sequence.push_str(&self.piece(end)?);
                sequence
            }
        };

        if sequence.len() as i64 != definition.len() {
            return Err(PanelError::InvalidSequence {
                msg: format!(
                    "{} realized to {} bases, expected {}",
                    definition,
                    sequence.len(),
                    definition.len()
                ),
            });
        }
        Ok(sequence)
    }

    fn piece(&self, piece: &OrientedRegion) -> Result<String, PanelError> {
        let bases = self.genome.bases(&piece.region)?.to_ascii_uppercase();
        Ok(if piece.reverse {
            reverse_complement(&bases)
        } else {
            bases
        })
    }

    /// Build a single probe
    pub fn create_probe(
        &self,
        definition: SequenceDefinition,
        metadata: &TargetMetadata,
    ) -> Result<Probe, PanelError> {
        let mut probes = self.create_probes(vec![definition], metadata)?;
        probes.pop().ok_or_else(|| PanelError::QualityUnavailable {
            msg: "scorer returned no probe".to_string(),
        })
    }

    /// Build probes for `definitions`, preserving order
    ///
    /// Sequences with non-ACGT bases are left unscored; the evaluator
    /// rejects them on sequence validity before quality is consulted.
    pub fn create_probes(
        &self,
        definitions: Vec<SequenceDefinition>,
        metadata: &TargetMetadata,
    ) -> Result<Vec<Probe>, PanelError> {
        let mut sequences = Vec::with_capacity(definitions.len());
        let mut scores: Vec<Option<f64>> = Vec::with_capacity(definitions.len());
        let mut pending: Vec<usize> = Vec::new();

        for definition in &definitions {
            let sequence = self.realize(definition)?;
            let score = if is_normal_dna(&sequence) {
                let fast = definition
                    .as_single_region()
                    .and_then(|region| self.scorer.score_region(region));
                if fast.is_none() {
                    pending.push(sequences.len());
                }
                fast
            } else {
                None
            };
            sequences.push(sequence);
            scores.push(score);
        }

        if !pending.is_empty() {
            let batch: Vec<String> = pending.iter().map(|&i| sequences[i].clone()).collect();
            let batch_scores = self.scorer.score_sequences(&batch)?;
            if batch_scores.len() != batch.len() {
                return Err(PanelError::QualityUnavailable {
                    msg: format!(
                        "scorer returned {} scores for {} sequences",
                        batch_scores.len(),
                        batch.len()
                    ),
                });
            }
            trace!("Scored {} sequences in one batch", batch.len());
            for (index, score) in pending.into_iter().zip(batch_scores) {
                scores[index] = Some(score);
            }
        }

        Ok(definitions
            .into_iter()
            .zip(sequences)
            .zip(scores)
            .map(|((definition, sequence), score)| {
                Probe::new(definition, sequence, metadata.clone(), score)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::TargetType;
    use crate::quality::MockScorer;
    use crate::reference::InMemoryGenome;
    use crate::region::GenomicInterval;

    fn iv(start: i64, end: i64) -> GenomicInterval {
        GenomicInterval::new("chr1", start, end).unwrap()
    }

    fn metadata() -> TargetMetadata {
        TargetMetadata::new(TargetType::CustomRegion, "factory")
    }

    fn genome() -> InMemoryGenome {
        InMemoryGenome::new().with_chromosome("chr1", "AACCGGTTNNACGT")
    }

    #[test]
    fn test_realize_single_region() {
        let factory = ProbeFactory::new(genome(), MockScorer::default());
        let def = SequenceDefinition::single_region(iv(1, 4));
        assert_eq!(factory.realize(&def).unwrap(), "AACC");
    }

    #[test]
    fn test_realize_variant_pieces() {
        let factory = ProbeFactory::new(genome(), MockScorer::default());
        let def = SequenceDefinition::two_sided(
            OrientedRegion::forward(iv(1, 2)),
            "TTT",
            OrientedRegion::reverse(iv(3, 6)),
        )
        .unwrap();
        // CCGG reverse-complemented is CCGG
        assert_eq!(factory.realize(&def).unwrap(), "AATTTCCGG");

        let def = SequenceDefinition::insert_end("G", OrientedRegion::reverse(iv(1, 3))).unwrap();
        assert_eq!(factory.realize(&def).unwrap(), "GGTT");
    }

    #[test]
    fn test_realize_out_of_bounds() {
        let factory = ProbeFactory::new(genome(), MockScorer::default());
        let def = SequenceDefinition::single_region(iv(10, 20));
        assert!(matches!(
            factory.realize(&def),
            Err(PanelError::RegionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_create_probes_uses_fast_path() {
        let scorer = MockScorer::new(0.6);
        let factory = ProbeFactory::new(genome(), &scorer);
        let probes = factory
            .create_probes(
                vec![
                    SequenceDefinition::single_region(iv(1, 4)),
                    SequenceDefinition::single_region(iv(5, 8)),
                ],
                &metadata(),
            )
            .unwrap();
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[0].quality_score(), Some(0.6));
        assert_eq!(probes[1].sequence(), "GGTT");
        assert_eq!(scorer.batch_count(), 0);
    }

    #[test]
    fn test_create_probes_batches_fallback_in_order() {
        let mut scorer = MockScorer::new(0.5).sequence_only();
        scorer.set_sequence_score("GGTT", 0.9);
        let factory = ProbeFactory::new(genome(), &scorer);
        let probes = factory
            .create_probes(
                vec![
                    SequenceDefinition::single_region(iv(1, 4)),
                    SequenceDefinition::single_region(iv(7, 10)),
                    SequenceDefinition::single_region(iv(5, 8)),
                ],
                &metadata(),
            )
            .unwrap();
        assert_eq!(scorer.batch_count(), 1);
        assert_eq!(probes[0].quality_score(), Some(0.5));
        // TTNN is not scored
        assert_eq!(probes[1].quality_score(), None);
        assert_eq!(probes[2].quality_score(), Some(0.9));
    }
}
