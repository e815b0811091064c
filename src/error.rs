//! Error types for ferro-panel
//!
//! Errors here are structural: malformed intervals, bounds that admit no
//! probe, missing reference data, or broken configuration. A target that
//! simply cannot be covered by an acceptable probe is *not* an error; it is
//! reported as a [`RejectedRegion`](crate::result::RejectedRegion).

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Geometry errors (E1xxx)
    /// Interval with start > end or a start before position 1
    InvalidInterval = 1001,
    /// Bounds that admit no probe, or intervals on different chromosomes
    InvalidGeometry = 1002,

    // Reference errors (E2xxx)
    /// Chromosome/contig not found
    ChromosomeNotFound = 2001,
    /// Region lies outside the chromosome
    RegionOutOfBounds = 2002,

    // Probe errors (E3xxx)
    /// Sequence contains bases other than A, C, G, T or has the wrong length
    InvalidSequence = 3001,
    /// Illegal combination of sequence definition pieces
    InvalidDefinition = 3002,
    /// Quality score could not be obtained
    QualityUnavailable = 3003,

    // Configuration errors (E4xxx)
    /// Criteria outside their valid ranges
    InvalidCriteria = 4001,
    /// Panel configuration failed validation
    InvalidConfig = 4002,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// Configuration file parse error
    ConfigParse = 9002,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInterval => "invalid genomic interval",
            ErrorCode::InvalidGeometry => "bounds admit no probe",
            ErrorCode::ChromosomeNotFound => "chromosome not found",
            ErrorCode::RegionOutOfBounds => "region outside chromosome",
            ErrorCode::InvalidSequence => "invalid probe sequence",
            ErrorCode::InvalidDefinition => "invalid sequence definition",
            ErrorCode::QualityUnavailable => "quality score unavailable",
            ErrorCode::InvalidCriteria => "invalid probe criteria",
            ErrorCode::InvalidConfig => "invalid panel configuration",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::ConfigParse => "configuration parse error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-panel operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    /// Interval construction with start > end or start < 1
    #[error("Invalid interval {chromosome}:{start}-{end}")]
    InvalidInterval {
        chromosome: String,
        start: i64,
        end: i64,
    },

    /// Probe bounds or anchors that cannot hold a single probe
    #[error("Invalid probe geometry: {msg}")]
    InvalidGeometry { msg: String },

    /// Chromosome missing from the reference
    #[error("Chromosome not found: {chromosome}")]
    ChromosomeNotFound { chromosome: String },

    /// Region not mapped by the reference
    #[error("Region {chromosome}:{start}-{end} is outside the reference (length {length})")]
    RegionOutOfBounds {
        chromosome: String,
        start: i64,
        end: i64,
        length: i64,
    },

    /// Probe sequence violates its contract
    #[error("Invalid sequence: {msg}")]
    InvalidSequence { msg: String },

    /// Sequence definition with an illegal shape
    #[error("Invalid sequence definition: {msg}")]
    InvalidDefinition { msg: String },

    /// Quality scorer could not score a sequence
    #[error("Quality score unavailable: {msg}")]
    QualityUnavailable { msg: String },

    /// Criteria outside their valid ranges
    #[error("Invalid criteria: {msg}")]
    InvalidCriteria { msg: String },

    /// Configuration failed validation
    #[error("Invalid configuration: {msg}")]
    InvalidConfig { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// Configuration file could not be parsed
    #[error("Config parse error: {msg}")]
    ConfigParse { msg: String },
}

impl PanelError {
    /// Shorthand for an [`PanelError::InvalidGeometry`] error
    pub fn geometry(msg: impl Into<String>) -> Self {
        PanelError::InvalidGeometry { msg: msg.into() }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            PanelError::InvalidInterval { .. } => ErrorCode::InvalidInterval,
            PanelError::InvalidGeometry { .. } => ErrorCode::InvalidGeometry,
            PanelError::ChromosomeNotFound { .. } => ErrorCode::ChromosomeNotFound,
            PanelError::RegionOutOfBounds { .. } => ErrorCode::RegionOutOfBounds,
            PanelError::InvalidSequence { .. } => ErrorCode::InvalidSequence,
            PanelError::InvalidDefinition { .. } => ErrorCode::InvalidDefinition,
            PanelError::QualityUnavailable { .. } => ErrorCode::QualityUnavailable,
            PanelError::InvalidCriteria { .. } => ErrorCode::InvalidCriteria,
            PanelError::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            PanelError::Io { .. } => ErrorCode::IoError,
            PanelError::ConfigParse { .. } => ErrorCode::ConfigParse,
        }
    }

    /// Message prefixed with the error code, e.g. `[E1002] Invalid probe geometry: ...`
    pub fn detailed_message(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}

impl From<std::io::Error> for PanelError {
    fn from(err: std::io::Error) -> Self {
        PanelError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PanelError {
    fn from(err: toml::de::Error) -> Self {
        PanelError::ConfigParse {
            msg: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PanelError {
    fn from(err: toml::ser::Error) -> Self {
        PanelError::ConfigParse {
            msg: err.to_string(),
        }
    }
}
