//! Probe acceptability evaluation
//!
//! A probe is checked against a [`Criteria`] in a fixed order, stopping at
//! the first failure:
//!
//! 1. sequence validity (only A, C, G, T)
//! 2. GC content within `target ± tolerance`
//! 3. quality score at least the minimum
//!
//! ```
//! use ferro_panel::evaluate::{evaluate, Criteria, RejectionReason};
//! use ferro_panel::probe::{Probe, SequenceDefinition, TargetMetadata, TargetType};
//! use ferro_panel::region::GenomicInterval;
//!
//! let region = GenomicInterval::new("chr1", 1, 8).unwrap();
//! let probe = Probe::new(
//!     SequenceDefinition::single_region(region),
//!     "GGGGGGGA".to_string(),
//!     TargetMetadata::new(TargetType::CustomRegion, "doc"),
//!     Some(0.9),
//! );
//! let criteria = Criteria::new(0.5, 0.45, 0.15).unwrap();
//! let probe = evaluate(probe, &criteria);
//! assert_eq!(probe.rejection_reason(), Some(RejectionReason::GcContent));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PanelError;
use crate::probe::{is_normal_dna, Evaluation, Probe};

/// Acceptance thresholds for a probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCriteria")]
pub struct Criteria {
    quality_min: f64,
    gc_target: f64,
    gc_tolerance: f64,
}

#[derive(Deserialize)]
struct RawCriteria {
    quality_min: f64,
    gc_target: f64,
    gc_tolerance: f64,
}

impl TryFrom<RawCriteria> for Criteria {
    type Error = PanelError;

    fn try_from(raw: RawCriteria) -> Result<Self, Self::Error> {
        Criteria::new(raw.quality_min, raw.gc_target, raw.gc_tolerance)
    }
}

impl Criteria {
    /// # Errors
    ///
    /// Fails unless `quality_min` is in `(0, 1]`, `gc_tolerance >= 0`, and
    /// the window `[gc_target - gc_tolerance, gc_target + gc_tolerance]`
    /// intersects `[0, 1]`.
    pub fn new(quality_min: f64, gc_target: f64, gc_tolerance: f64) -> Result<Self, PanelError> {
        if !(quality_min > 0.0 && quality_min <= 1.0) {
            return Err(PanelError::InvalidCriteria {
                msg: format!("quality minimum {} not in (0, 1]", quality_min),
            });
        }
        if !(gc_tolerance >= 0.0) || !gc_target.is_finite() {
            return Err(PanelError::InvalidCriteria {
                msg: format!("GC {} ± {} is not a valid window", gc_target, gc_tolerance),
            });
        }
        if gc_target - gc_tolerance > 1.0 || gc_target + gc_tolerance < 0.0 {
            return Err(PanelError::InvalidCriteria {
                msg: format!("GC window {} ± {} misses [0, 1]", gc_target, gc_tolerance),
            });
        }
        Ok(Self {
            quality_min,
            gc_target,
            gc_tolerance,
        })
    }

    pub fn quality_min(&self) -> f64 {
        self.quality_min
    }

    pub fn gc_target(&self) -> f64 {
        self.gc_target
    }

    pub fn gc_tolerance(&self) -> f64 {
        self.gc_tolerance
    }

    pub fn gc_min(&self) -> f64 {
        self.gc_target - self.gc_tolerance
    }

    pub fn gc_max(&self) -> f64 {
        self.gc_target + self.gc_tolerance
    }

    pub fn accepts_gc(&self, gc: f64) -> bool {
        gc >= self.gc_min() && gc <= self.gc_max()
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            quality_min: 0.5,
            gc_target: 0.45,
            gc_tolerance: 0.15,
        }
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QS>={} GC={}±{}",
            self.quality_min, self.gc_target, self.gc_tolerance
        )
    }
}

/// Why a probe was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RejectionReason {
    /// Sequence contains bases other than A, C, G, T
    #[serde(rename = "sequence")]
    Sequence,
    /// GC content outside the tolerance window
    #[serde(rename = "GC")]
    GcContent,
    /// Quality score below the minimum, or unavailable
    #[serde(rename = "QS")]
    QualityScore,
}

impl RejectionReason {
    /// Short machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::Sequence => "sequence",
            RejectionReason::GcContent => "GC",
            RejectionReason::QualityScore => "QS",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// First failed check for `probe`, or `None` if it is acceptable
pub fn check(probe: &Probe, criteria: &Criteria) -> Option<RejectionReason> {
    if !is_normal_dna(probe.sequence()) {
        return Some(RejectionReason::Sequence);
    }
    if !criteria.accepts_gc(probe.gc_content()) {
        return Some(RejectionReason::GcContent);
    }
    match probe.quality_score() {
        Some(score) if score >= criteria.quality_min() => None,
        _ => Some(RejectionReason::QualityScore),
    }
}

/// Stamp `probe` accepted or rejected under `criteria`
pub fn evaluate(probe: Probe, criteria: &Criteria) -> Probe {
    let rejection = check(&probe, criteria);
    probe.with_evaluation(Evaluation {
        criteria: criteria.clone(),
        rejection,
    })
}

/// Evaluate a batch of probes, preserving order
pub fn evaluate_all(probes: Vec<Probe>, criteria: &Criteria) -> Vec<Probe> {
    #[cfg(feature = "parallel")]
    {
        crate::parallel::evaluate_parallel(probes, criteria)
    }
    #[cfg(not(feature = "parallel"))]
    {
        probes
            .into_iter()
            .map(|probe| evaluate(probe, criteria))
            .collect()
    }
}
