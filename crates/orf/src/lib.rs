//! otto-orf: the Otto Representation Format.
//!
//! The Orf is the parsed, serializable form of a `.otto` pipeline file,
//! suitable for consumption by the orchestrator and other downstream
//! components. This crate owns the document types and the version-checked
//! deserialization entry point so that consumers never have to hand-roll
//! their own JSON walking.
//!
//! # Public API
//!
//! - [`Orf`] -- the document itself, with its append operations
//! - [`from_orf()`] -- deserialize a `serde_json::Value` into an [`Orf`],
//!   rejecting documents with an unsupported `version`
//! - [`OrfError`] -- deserialization error type

/// Orf compatibility version stamped into every document.
pub const ORF_VERSION: u32 = 1;

pub mod deserialize;
pub mod types;

pub use deserialize::{from_orf, OrfError};
pub use types::*;
