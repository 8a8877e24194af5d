use crate::{KEY_SEPARATOR, MISSING_IDENTIFIER_MESSAGE, PATH_SEPARATOR, SCHEME_MARKER};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single measured request, as produced by a parser adapter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleRecord {
    pub endpoint_identifier: Option<String>,
    /// Milliseconds
    pub duration: u64,
    pub size_kb: f64,
    pub successful: bool,
    /// Secondary error signal reported by summarizing tools.
    #[cfg_attr(feature = "serde", serde(default))]
    pub external_error_weight: f64,
}

impl SampleRecord {
    pub fn new(identifier: &str, duration: u64, size_kb: f64, successful: bool) -> Self {
        Self {
            endpoint_identifier: Some(identifier.to_string()),
            duration,
            size_kb,
            successful,
            external_error_weight: 0.,
        }
    }

    /// A sample whose parser could not determine which endpoint it belongs to.
    pub fn unlabeled(duration: u64, size_kb: f64, successful: bool) -> Self {
        Self {
            endpoint_identifier: None,
            duration,
            size_kb,
            successful,
            external_error_weight: 0.,
        }
    }

    pub fn with_external_error_weight(mut self, weight: f64) -> Self {
        self.external_error_weight = weight;
        self
    }

    /// The identifier, if present and non-empty.
    pub fn identifier(&self) -> Option<&str> {
        self.endpoint_identifier
            .as_deref()
            .filter(|identifier| !identifier.is_empty())
    }
}

/// Derive the lookup key for a raw endpoint identifier.
///
/// Every occurrence of [`SCHEME_MARKER`] is removed and every [`PATH_SEPARATOR`] becomes
/// [`KEY_SEPARATOR`]. Baselines are matched on this key across runs, so the rule must never
/// change.
pub fn endpoint_key(raw: &str) -> String {
    raw.replace(SCHEME_MARKER, "")
        .replace(PATH_SEPARATOR, KEY_SEPARATOR)
}

/// Non-fatal conditions raised while ingesting samples.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The sample had no endpoint identifier and was dropped.
    MissingIdentifier { duration: u64 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingIdentifier { .. } => write!(f, "{MISSING_IDENTIFIER_MESSAGE}"),
        }
    }
}
