//! Deserialization of Orf JSON for downstream consumers.
//!
//! The entry point is [`from_orf`], which checks the document `version`
//! before anything else: a consumer must never act on a document whose
//! version it does not understand.

use serde_json::Value;
use thiserror::Error;

use crate::types::Orf;
use crate::ORF_VERSION;

/// Errors while deserializing an Orf document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrfError {
    /// The document declares a version this consumer does not support.
    #[error("unsupported orf version {found} (supported: {ORF_VERSION})")]
    UnsupportedVersion { found: u64 },
    /// The document is missing a required top-level field.
    #[error("orf document missing required field: '{field}'")]
    MissingField { field: String },
    /// The document structure is invalid.
    #[error("invalid orf document: {0}")]
    InvalidDocument(String),
}

/// Deserialize an Orf JSON value into a typed document.
pub fn from_orf(value: &Value) -> Result<Orf, OrfError> {
    let version = value
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| OrfError::MissingField {
            field: "version".to_owned(),
        })?;

    if version != u64::from(ORF_VERSION) {
        return Err(OrfError::UnsupportedVersion { found: version });
    }

    serde_json::from_value(value.clone()).map_err(|e| OrfError::InvalidDocument(e.to_string()))
}
