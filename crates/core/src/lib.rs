//! Cumulative payment commitments
//!
//! Turns a payment list into a Merkle commitment a ledger can check claims
//! against:
//! - Aggregation: one leaf per recipient holding their cumulative amount
//! - Leaf encoding: `keccak256(abi.encodePacked(address, uint256))`
//! - Proofs: `[cycle, amount, siblings...]` as a single hex string
//! - Claim checks: the ledger's verification, replayed off-chain

pub mod aggregate;
pub mod claim;
pub mod commitment;
pub mod error;
pub mod leaf;
pub mod types;

pub use aggregate::reduce_payments;
pub use claim::{verify_claim, PaymentProof, PAYMENT_PROOF_PREFIX_WORDS};
pub use commitment::{CumulativePaymentCommitment, NO_PROOF};
pub use error::{ClaimError, CommitmentError};
pub use leaf::{PaymentLeaf, PaymentLeaves, LEAF_ENCODING_VERSION, PAYMENT_LEAF_LEN};
pub use types::*;

pub use paypool_tree::{format_hash_hex, HashTree, Proof, TreeError};
