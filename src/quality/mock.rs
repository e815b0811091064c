//! Mock quality scorer for testing

use std::cell::Cell;
use std::collections::HashMap;

use crate::error::PanelError;
use crate::quality::QualityScorer;
use crate::region::GenomicInterval;

/// Scorer returning configurable fixed scores
///
/// Lookup order for a region: exact-region override, then the minimum of
/// every penalty interval the region overlaps, then the default (only if
/// the region fast path is enabled). Sequences use per-sequence overrides,
/// then the default.
#[derive(Debug, Clone)]
pub struct MockScorer {
    default_score: f64,
    region_fast_path: bool,
    region_scores: HashMap<GenomicInterval, f64>,
    penalties: Vec<(GenomicInterval, f64)>,
    sequence_scores: HashMap<String, f64>,
    batches: Cell<usize>,
}

impl MockScorer {
    /// Scorer giving every probe `default_score` through the region fast path
    pub fn new(default_score: f64) -> Self {
        Self {
            default_score,
            region_fast_path: true,
            region_scores: HashMap::new(),
            penalties: Vec::new(),
            sequence_scores: HashMap::new(),
            batches: Cell::new(0),
        }
    }

    /// Disable the region fast path so every probe goes through sequence scoring
    pub fn sequence_only(mut self) -> Self {
        self.region_fast_path = false;
        self
    }

    /// Score for the probe covering exactly `region`
    pub fn set_region_score(&mut self, region: GenomicInterval, score: f64) {
        self.region_scores.insert(region, score);
    }

    /// Cap the score of every probe overlapping `region`
    pub fn add_penalty(&mut self, region: GenomicInterval, score: f64) {
        self.penalties.push((region, score));
    }

    /// Builder-style [`add_penalty`](Self::add_penalty)
    pub fn with_penalty(mut self, region: GenomicInterval, score: f64) -> Self {
        self.add_penalty(region, score);
        self
    }

    pub fn set_sequence_score(&mut self, sequence: impl Into<String>, score: f64) {
        self.sequence_scores.insert(sequence.into(), score);
    }

    /// Number of `score_sequences` calls made so far
    pub fn batch_count(&self) -> usize {
        self.batches.get()
    }
}

impl Default for MockScorer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl QualityScorer for MockScorer {
    fn score_region(&self, region: &GenomicInterval) -> Option<f64> {
        if let Some(score) = self.region_scores.get(region) {
            return Some(*score);
        }
        let penalty = self
            .penalties
            .iter()
            .filter(|(penalized, _)| penalized.overlaps(region))
            .map(|(_, score)| *score)
            .reduce(f64::min);
        match penalty {
            Some(score) => Some(score),
            None if self.region_fast_path => Some(self.default_score),
            None => None,
        }
    }

    fn score_sequences(&self, sequences: &[String]) -> Result<Vec<f64>, PanelError> {
        self.batches.set(self.batches.get() + 1);
        Ok(sequences
            .iter()
            .map(|s| {
                self.sequence_scores
                    .get(s)
                    .copied()
                    .unwrap_or(self.default_score)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i64, end: i64) -> GenomicInterval {
        GenomicInterval::new("chr1", start, end).unwrap()
    }

    #[test]
    fn test_default_score() {
        let scorer = MockScorer::new(0.8);
        assert_eq!(scorer.score_region(&iv(1, 120)), Some(0.8));
        assert_eq!(scorer.score_sequences(&["ACGT".to_string()]).unwrap(), vec![0.8]);
        assert_eq!(scorer.batch_count(), 1);
    }

    #[test]
    fn test_penalties_take_minimum() {
        let scorer = MockScorer::new(0.9)
            .with_penalty(iv(100, 110), 0.3)
            .with_penalty(iv(105, 200), 0.1);
        assert_eq!(scorer.score_region(&iv(1, 104)), Some(0.3));
        assert_eq!(scorer.score_region(&iv(1, 120)), Some(0.1));
        assert_eq!(scorer.score_region(&iv(201, 320)), Some(0.9));
    }

    #[test]
    fn test_region_override_wins() {
        let mut scorer = MockScorer::new(0.9).with_penalty(iv(100, 110), 0.3);
        scorer.set_region_score(iv(1, 120), 0.95);
        assert_eq!(scorer.score_region(&iv(1, 120)), Some(0.95));
    }

    #[test]
    fn test_sequence_only() {
        let mut scorer = MockScorer::new(0.7).sequence_only();
        scorer.set_sequence_score("GGGG", 0.2);
        assert_eq!(scorer.score_region(&iv(1, 120)), None);
        let scores = scorer
            .score_sequences(&["GGGG".to_string(), "ACGT".to_string()])
            .unwrap();
        assert_eq!(scores, vec![0.2, 0.7]);
    }
}
