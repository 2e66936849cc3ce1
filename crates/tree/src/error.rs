//! Tree error types

use thiserror::Error;

/// Errors raised while building or reading proofs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The requested leaf is not part of the element set
    #[error("Element does not exist in Merkle tree: 0x{}", hex::encode(.0))]
    NotFound([u8; 32]),

    /// Proof input that is not a sequence of 32-byte words
    #[error("Malformed proof input: {0}")]
    MalformedProofInput(String),
}
