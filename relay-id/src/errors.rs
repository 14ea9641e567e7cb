//! Error types for relay-id

use std::path::PathBuf;

use crate::KeyKind;

/// Everything that can go wrong while obtaining a node identity.
///
/// None of these are recoverable locally: a node without its persisted identity
/// must not come up under a new one behind the operator's back.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("cannot write identity file {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("identity file {} exists but cannot be read: {source}", path.display())]
    StorageReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no identity file at {}", path.display())]
    IdentityNotFound { path: PathBuf },

    #[error("identity file {} is not a valid key document: {reason}", path.display())]
    InvalidRecord { path: PathBuf, reason: String },

    #[error("{kind} key text is not a valid armored block: {reason}")]
    MalformedEncoding { kind: KeyKind, reason: String },

    #[error("{kind} key payload is not a supported key: {reason}")]
    UnsupportedKeyMaterial { kind: KeyKind, reason: String },

    #[error("stored public key does not belong to the stored private key")]
    KeyMismatch,

    #[error("failed to generate Ed25519 key pair: {0}")]
    GenerationFailure(String),
}

impl IdentityError {
    pub(crate) fn malformed(kind: KeyKind, reason: impl Into<String>) -> Self {
        Self::MalformedEncoding {
            kind,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(kind: KeyKind, reason: impl Into<String>) -> Self {
        Self::UnsupportedKeyMaterial {
            kind,
            reason: reason.into(),
        }
    }
}

/// Result type alias using [`IdentityError`].
pub type Result<T> = std::result::Result<T, IdentityError>;
