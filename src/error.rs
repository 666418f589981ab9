//! Error types for item/CSL-JSON conversion.
//!
//! Conversion distinguishes two classes of problems:
//!
//! - [`ConversionError`]: structural impossibilities that abort the call
//!   (no CSL type, no mapping for an item type).
//! - [`Diagnostic`]: per-field or per-creator anomalies that are absorbed
//!   locally. The offending datum is dropped or stored literally and
//!   conversion continues.

use thiserror::Error;

/// Field name constants for consistent diagnostic reporting.
pub mod fields {
    pub const ACCESS_DATE: &str = "accessDate";
    pub const EXTRA: &str = "extra";
    pub const JURISDICTION: &str = "jurisdiction";
    pub const TITLE: &str = "title";
    pub const VERSION_NUMBER: &str = "versionNumber";
}

/// Fatal conversion errors.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("No 'type' provided in CSL-JSON")]
    MissingType,

    #[error("Unknown CSL type \"{0}\"")]
    UnknownType(String),

    #[error("Unexpected item type \"{0}\" has no CSL mapping")]
    UnmappableType(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Non-fatal anomalies noticed while converting.
///
/// Diagnostics are advisory: every one of them is also emitted as a
/// `tracing` event, and none of them changes the conversion result beyond
/// the drop or fallback it describes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("Dropped creator {index} of {variable}: no name")]
    InvalidCreator { variable: String, index: usize },

    #[error("Creator type {creator_type} is not valid for {item_type}; using primary creator type")]
    InvalidCreatorType {
        creator_type: String,
        item_type: String,
    },

    #[error("Dropped creator {index}: creator type {creator_type} has no CSL name variable")]
    UnmappedCreatorType { creator_type: String, index: usize },

    #[error("Could not parse date for {field}: \"{value}\"")]
    UnparseableDate { field: String, value: String },

    #[error("Dropped unknown field {field}")]
    UnknownField { field: String },

    #[error("Unknown CSL type \"{csl_type}\"; using 'document'")]
    TypeFallback { csl_type: String },
}

/// Collects diagnostics during a single conversion call.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it.
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(diagnostic = %diagnostic, "conversion diagnostic");
        self.entries.push(diagnostic);
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
