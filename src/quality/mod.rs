//! Probe quality scoring
//!
//! The quality model itself lives outside this crate; the engine only needs
//! a score in `[0, 1]` per probe. Scorers expose a fast path keyed by
//! reference region (typically a precomputed profile) and a batched fallback
//! that scores raw sequences.

pub mod mock;

pub use mock::MockScorer;

use crate::error::PanelError;
use crate::region::GenomicInterval;

/// Trait for scoring probe quality
pub trait QualityScorer {
    /// Score of the probe covering exactly `region`, if known without
    /// looking at the sequence
    fn score_region(&self, _region: &GenomicInterval) -> Option<f64> {
        None
    }

    /// Score a batch of sequences
    ///
    /// Must return exactly one score per input, in input order.
    fn score_sequences(&self, sequences: &[String]) -> Result<Vec<f64>, PanelError>;
}

impl<T: QualityScorer + ?Sized> QualityScorer for &T {
    fn score_region(&self, region: &GenomicInterval) -> Option<f64> {
        (**self).score_region(region)
    }

    fn score_sequences(&self, sequences: &[String]) -> Result<Vec<f64>, PanelError> {
        (**self).score_sequences(sequences)
    }
}

/// Blanket implementation for boxed scorers, including trait objects
impl<T: QualityScorer + ?Sized> QualityScorer for Box<T> {
    fn score_region(&self, region: &GenomicInterval) -> Option<f64> {
        (**self).score_region(region)
    }

    fn score_sequences(&self, sequences: &[String]) -> Result<Vec<f64>, PanelError> {
        (**self).score_sequences(sequences)
    }
}
