//! Typed errors for the settings pipeline.
//!
//! Typed errors allow pattern matching and policy-based handling; `anyhow`
//! is not used in library code. Every distinct failure the pipeline can
//! report gets its own variant, and [`SettingsError::kind`] collapses them
//! into the stable [`ErrorKind`] classification for logs and metrics.

use thiserror::Error;
use xm_types::{ErrorKind, Protocol};

/// Errors returned by the settings normalization / generation pipeline.
///
/// All variants are synchronous, final, and carry enough context for the
/// surrounding service to build an operator-facing message. No variant is
/// ever returned after a partial mutation: callers observe either the old
/// settings or the fully rewritten ones.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Settings text is not valid JSON.
    #[error("malformed {context} json: {message}")]
    MalformedJson {
        /// What was being parsed (e.g. "mtproto settings").
        context: &'static str,
        message: String,
    },

    /// Key-tool output could not be parsed into auth blocks.
    #[error("malformed enc output: {message}")]
    MalformedEncOutput { message: String },

    /// Settings object carries neither key material shape.
    #[error("mtproto settings must contain a `secret` or a non-empty `users` array")]
    EmptySettings,

    /// A user entry has no `secret` field.
    #[error("mtproto user entry is missing the `secret` field")]
    MissingSecret,

    /// Secret has the wrong length.
    #[error("mtproto secret must be exactly 32 hex characters, got {len}")]
    SecretLength { len: usize },

    /// Secret contains characters outside `[0-9a-fA-F]`.
    #[error("mtproto secret contains non-hex characters: {secret:?}")]
    SecretNotHex { secret: String },

    /// A key-type label matched none of the known families.
    #[error("unsupported key type: {label:?}")]
    UnsupportedKeyType { label: String },

    /// An auth block lacks a required entry.
    #[error("auth block {label:?} is missing the {field:?} entry")]
    IncompleteAuthBlock {
        label: String,
        field: &'static str,
    },

    /// An operation was invoked on an inbound of the wrong protocol.
    #[error("expected {expected} inbound, got {found}")]
    ProtocolMismatch {
        expected: Protocol,
        found: Protocol,
    },

    /// Settings were expected to already be in canonical shape.
    #[error("settings are not in canonical shape: {message}")]
    NotCanonical { message: String },

    /// Two inbounds share a non-empty tag.
    #[error("duplicate inbound tag: {tag:?}")]
    DuplicateTag { tag: String },
}

impl SettingsError {
    /// Classify this error for policy-level handling.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        use SettingsError::*;
        match self {
            MalformedJson { .. } | MalformedEncOutput { .. } => ErrorKind::MalformedInput,
            EmptySettings
            | MissingSecret
            | IncompleteAuthBlock { .. }
            | ProtocolMismatch { .. }
            | NotCanonical { .. }
            | DuplicateTag { .. } => ErrorKind::SchemaViolation,
            SecretLength { .. } | SecretNotHex { .. } | UnsupportedKeyType { .. } => {
                ErrorKind::InvalidFormat
            }
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T, E = SettingsError> = std::result::Result<T, E>;
