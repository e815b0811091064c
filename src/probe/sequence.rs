//! Sequence definitions: the recipe a probe's bases are built from
//!
//! A definition is either a single reference region or a variant form made
//! of reference pieces and an inserted literal sequence. Only four shapes are
//! legal and each has its own constructor, so an illegal combination cannot
//! be represented.
//!
//! ```
//! use ferro_panel::probe::{OrientedRegion, SequenceDefinition};
//! use ferro_panel::region::GenomicInterval;
//!
//! // A 10bp deletion breakend: 60 bases before and 60 bases after the gap
//! let left = GenomicInterval::new("chr1", 941, 1000).unwrap();
//! let right = GenomicInterval::new("chr1", 1011, 1070).unwrap();
//! let def = SequenceDefinition::two_sided(
//!     OrientedRegion::forward(left),
//!     "",
//!     OrientedRegion::forward(right),
//! )
//! .unwrap();
//! assert_eq!(def.len(), 120);
//! assert_eq!(def.indel_size(), Some(10));
//! ```

use serde::Serialize;
use std::fmt;

use crate::error::PanelError;
use crate::probe::is_normal_dna;
use crate::region::GenomicInterval;

/// A reference interval, optionally reverse-complemented
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrientedRegion {
    pub region: GenomicInterval,
    pub reverse: bool,
}

impl OrientedRegion {
    pub fn forward(region: GenomicInterval) -> Self {
        Self {
            region,
            reverse: false,
        }
    }

    pub fn reverse(region: GenomicInterval) -> Self {
        Self {
            region,
            reverse: true,
        }
    }
}

impl fmt::Display for OrientedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strand = if self.reverse { '-' } else { '+' };
        write!(f, "{}({})", self.region, strand)
    }
}

/// The legal shapes of a sequence definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum SequenceShape {
    /// Exactly one forward reference interval
    SingleRegion { region: GenomicInterval },
    /// Reference piece, optional insert, reference piece
    TwoSided {
        start: OrientedRegion,
        insert: String,
        end: OrientedRegion,
    },
    /// Reference piece followed by a non-empty insert
    StartInsert { start: OrientedRegion, insert: String },
    /// Non-empty insert followed by a reference piece
    InsertEnd { insert: String, end: OrientedRegion },
}

/// Immutable recipe for a probe sequence
///
/// Never holds the computed bases; see
/// [`ProbeFactory`](crate::probe::ProbeFactory) for realization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SequenceDefinition {
    shape: SequenceShape,
}

impl SequenceDefinition {
    /// Definition for a plain reference region
    pub fn single_region(region: GenomicInterval) -> Self {
        Self {
            shape: SequenceShape::SingleRegion { region },
        }
    }

    /// Two reference pieces with an optional insert between them
    ///
    /// # Errors
    ///
    /// Fails if the insert contains non-ACGT bases, or if there is no insert
    /// and the pieces are forward and adjacent (that is a single region).
    pub fn two_sided(
        start: OrientedRegion,
        insert: impl Into<String>,
        end: OrientedRegion,
    ) -> Result<Self, PanelError> {
        let insert = normalize_insert(insert.into())?;
        if insert.is_empty()
            && !start.reverse
            && !end.reverse
            && start.region.chromosome() == end.region.chromosome()
            && start.region.end() + 1 == end.region.start()
        {
            return Err(PanelError::InvalidDefinition {
                msg: format!(
                    "{} and {} are adjacent with no insert; use a single region",
                    start.region, end.region
                ),
            });
        }
        Ok(Self {
            shape: SequenceShape::TwoSided { start, insert, end },
        })
    }

    /// A reference piece followed by an inserted sequence
    pub fn start_insert(
        start: OrientedRegion,
        insert: impl Into<String>,
    ) -> Result<Self, PanelError> {
        let insert = non_empty_insert(insert.into())?;
        Ok(Self {
            shape: SequenceShape::StartInsert { start, insert },
        })
    }

    /// An inserted sequence followed by a reference piece
    pub fn insert_end(insert: impl Into<String>, end: OrientedRegion) -> Result<Self, PanelError> {
        let insert = non_empty_insert(insert.into())?;
        Ok(Self {
            shape: SequenceShape::InsertEnd { insert, end },
        })
    }

    pub fn shape(&self) -> &SequenceShape {
        &self.shape
    }

    /// Total sequence length: the sum of the present pieces
    pub fn len(&self) -> i64 {
        match &self.shape {
            SequenceShape::SingleRegion { region } => region.len(),
            SequenceShape::TwoSided { start, insert, end } => {
                start.region.len() + insert.len() as i64 + end.region.len()
            }
            SequenceShape::StartInsert { start, insert } => {
                start.region.len() + insert.len() as i64
            }
            SequenceShape::InsertEnd { insert, end } => insert.len() as i64 + end.region.len(),
        }
    }

    /// Always false: every shape has at least one non-empty piece
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True if the probe is exactly one forward reference interval
    pub fn is_exact_region(&self) -> bool {
        matches!(self.shape, SequenceShape::SingleRegion { .. })
    }

    pub fn as_single_region(&self) -> Option<&GenomicInterval> {
        match &self.shape {
            SequenceShape::SingleRegion { region } => Some(region),
            _ => None,
        }
    }

    pub fn insert(&self) -> Option<&str> {
        match &self.shape {
            SequenceShape::SingleRegion { .. } => None,
            SequenceShape::TwoSided { insert, .. }
            | SequenceShape::StartInsert { insert, .. }
            | SequenceShape::InsertEnd { insert, .. } => Some(insert),
        }
    }

    /// Reference pieces in sequence order
    pub fn pieces(&self) -> Vec<&OrientedRegion> {
        match &self.shape {
            SequenceShape::SingleRegion { .. } => Vec::new(),
            SequenceShape::TwoSided { start, end, .. } => vec![start, end],
            SequenceShape::StartInsert { start, .. } => vec![start],
            SequenceShape::InsertEnd { end, .. } => vec![end],
        }
    }

    /// All reference intervals the sequence is built from
    pub fn reference_regions(&self) -> Vec<&GenomicInterval> {
        match &self.shape {
            SequenceShape::SingleRegion { region } => vec![region],
            _ => self.pieces().into_iter().map(|p| &p.region).collect(),
        }
    }

    /// Net insertion/deletion size relative to the reference
    ///
    /// Defined for a single region (0) and for a forward/forward two-sided
    /// definition on one chromosome with the pieces in reference order:
    /// `|insert length - reference gap|`. `None` for every other shape,
    /// where the sequence has no reference-equivalent.
    pub fn indel_size(&self) -> Option<i64> {
        match &self.shape {
            SequenceShape::SingleRegion { .. } => Some(0),
            SequenceShape::TwoSided { start, insert, end }
                if !start.reverse
                    && !end.reverse
                    && start.region.chromosome() == end.region.chromosome()
                    && start.region.end() < end.region.start() =>
            {
                let gap = end.region.start() - start.region.end() - 1;
                Some((insert.len() as i64 - gap).abs())
            }
            _ => None,
        }
    }
}

impl fmt::Display for SequenceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            SequenceShape::SingleRegion { region } => write!(f, "{}", region),
            SequenceShape::TwoSided { start, insert, end } => {
                write!(f, "{}|{}|{}", start, insert, end)
            }
            SequenceShape::StartInsert { start, insert } => write!(f, "{}|{}", start, insert),
            SequenceShape::InsertEnd { insert, end } => write!(f, "{}|{}", insert, end),
        }
    }
}

fn normalize_insert(insert: String) -> Result<String, PanelError> {
    if !is_normal_dna(&insert) {
        return Err(PanelError::InvalidSequence {
            msg: format!("insert '{}' contains non-ACGT bases", insert),
        });
    }
    Ok(insert.to_ascii_uppercase())
}

fn non_empty_insert(insert: String) -> Result<String, PanelError> {
    if insert.is_empty() {
        return Err(PanelError::InvalidDefinition {
            msg: "one-sided definition requires an insert".to_string(),
        });
    }
    normalize_insert(insert)
}

/// Reverse complement of an uppercase DNA sequence; `N` and unknown bases map to `N`
pub fn reverse_complement(sequence: &str) -> String {
    sequence
        .bytes()
        .rev()
        .map(|b| match b.to_ascii_uppercase() {
            b'A' => 'T',
            b'C' => 'G',
            b'G' => 'C',
            b'T' => 'A',
            _ => 'N',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i64, end: i64) -> GenomicInterval {
        GenomicInterval::new("chr1", start, end).unwrap()
    }

    #[test]
    fn test_single_region() {
        let def = SequenceDefinition::single_region(iv(100, 219));
        assert_eq!(def.len(), 120);
        assert!(def.is_exact_region());
        assert_eq!(def.as_single_region(), Some(&iv(100, 219)));
        assert_eq!(def.indel_size(), Some(0));
        assert_eq!(def.insert(), None);
    }

    #[test]
    fn test_two_sided_adjacent_without_insert_rejected() {
        let result = SequenceDefinition::two_sided(
            OrientedRegion::forward(iv(100, 159)),
            "",
            OrientedRegion::forward(iv(160, 219)),
        );
        assert!(matches!(result, Err(PanelError::InvalidDefinition { .. })));
    }

    #[test]
    fn test_two_sided_adjacent_with_insert_allowed() {
        let def = SequenceDefinition::two_sided(
            OrientedRegion::forward(iv(100, 159)),
            "acgt",
            OrientedRegion::forward(iv(160, 215)),
        )
        .unwrap();
        assert_eq!(def.len(), 120);
        assert_eq!(def.insert(), Some("ACGT"));
        assert_eq!(def.indel_size(), Some(4));
        assert!(!def.is_exact_region());
    }

    #[test]
    fn test_two_sided_reverse_adjacent_allowed() {
        let def = SequenceDefinition::two_sided(
            OrientedRegion::forward(iv(100, 159)),
            "",
            OrientedRegion::reverse(iv(160, 219)),
        )
        .unwrap();
        assert_eq!(def.indel_size(), None);
        assert_eq!(def.reference_regions().len(), 2);
    }

    #[test]
    fn test_insert_must_be_dna() {
        let result = SequenceDefinition::start_insert(OrientedRegion::forward(iv(1, 60)), "ACNT");
        assert!(matches!(result, Err(PanelError::InvalidSequence { .. })));
    }

    #[test]
    fn test_one_sided_requires_insert() {
        let result = SequenceDefinition::insert_end("", OrientedRegion::forward(iv(1, 60)));
        assert!(matches!(result, Err(PanelError::InvalidDefinition { .. })));

        let def =
            SequenceDefinition::insert_end("AAAA", OrientedRegion::forward(iv(1, 60))).unwrap();
        assert_eq!(def.len(), 64);
        assert_eq!(def.indel_size(), None);
    }

    #[test]
    fn test_cross_chromosome_has_no_indel_size() {
        let other = GenomicInterval::new("chr2", 500, 559).unwrap();
        let def = SequenceDefinition::two_sided(
            OrientedRegion::forward(iv(100, 159)),
            "",
            OrientedRegion::forward(other),
        )
        .unwrap();
        assert_eq!(def.indel_size(), None);
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement("AACGTN"), "NACGTT");
        assert_eq!(reverse_complement("acg"), "CGT");
        assert_eq!(reverse_complement(""), "");
    }

    #[test]
    fn test_display() {
        let def =
            SequenceDefinition::start_insert(OrientedRegion::reverse(iv(1, 60)), "GG").unwrap();
        assert_eq!(def.to_string(), "chr1:1-60(-)|GG");
    }
}
