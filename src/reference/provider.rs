//! Reference genome trait
//!
//! Defines the interface for looking up reference bases.

use crate::error::PanelError;
use crate::region::GenomicInterval;

/// Trait for providing reference genome bases
///
/// Implementations might include:
/// - InMemoryGenome for tests and small references
/// - an indexed FASTA reader for whole genomes
pub trait RefGenome {
    /// Length of a chromosome
    fn chromosome_length(&self, chromosome: &str) -> Result<i64, PanelError>;

    /// Uppercase bases of `region` (1-based, inclusive)
    ///
    /// The returned string has exactly `region.len()` bases. Fails if the
    /// chromosome is unknown or the region runs past its end.
    fn bases(&self, region: &GenomicInterval) -> Result<String, PanelError>;

    /// Check if a chromosome exists
    fn has_chromosome(&self, chromosome: &str) -> bool {
        self.chromosome_length(chromosome).is_ok()
    }
}

impl<T: RefGenome + ?Sized> RefGenome for &T {
    fn chromosome_length(&self, chromosome: &str) -> Result<i64, PanelError> {
        (**self).chromosome_length(chromosome)
    }

    fn bases(&self, region: &GenomicInterval) -> Result<String, PanelError> {
        (**self).bases(region)
    }

    fn has_chromosome(&self, chromosome: &str) -> bool {
        (**self).has_chromosome(chromosome)
    }
}

/// Blanket implementation for boxed providers, including trait objects
impl<T: RefGenome + ?Sized> RefGenome for Box<T> {
    fn chromosome_length(&self, chromosome: &str) -> Result<i64, PanelError> {
        (**self).chromosome_length(chromosome)
    }

    fn bases(&self, region: &GenomicInterval) -> Result<String, PanelError> {
        (**self).bases(region)
    }

    fn has_chromosome(&self, chromosome: &str) -> bool {
        (**self).has_chromosome(chromosome)
    }
}
