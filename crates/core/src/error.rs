//! Error types

use paypool_tree::TreeError;
use thiserror::Error;

use crate::types::{Address, Amount};

/// Errors raised while building a commitment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitmentError {
    /// Summing a recipient's payments exceeded `uint256`
    #[error("Cumulative amount for {recipient} overflows uint256")]
    AmountOverflow {
        /// Recipient whose total overflowed
        recipient: Address,
    },
}

/// Reasons a payment claim is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// The proof is the all-zero "no proof" sentinel
    #[error("No proof issued for this recipient")]
    NoProof,

    /// The proof is not a sequence of words with a cycle and amount prefix
    #[error(transparent)]
    Malformed(#[from] TreeError),

    /// Replaying the sibling path does not reach the published root
    #[error("Proof does not reconstruct root: expected {expected}, computed {computed}")]
    RootMismatch {
        /// Published root
        expected: String,
        /// Root computed from the claim
        computed: String,
    },

    /// The claimed amount differs from the amount word in the proof
    #[error("Claimed amount {claimed} does not match proven amount {proven}")]
    AmountMismatch {
        /// Amount the claimant asked for
        claimed: Amount,
        /// Amount carried in the proof prefix
        proven: Amount,
    },

    /// The proof was issued for another payment cycle
    #[error("Proof is for cycle {proven}, expected cycle {expected}")]
    CycleMismatch {
        /// Cycle whose root is being checked
        expected: Amount,
        /// Cycle word carried in the proof prefix
        proven: Amount,
    },
}
