//! Sorted-pair Merkle tree for payment pool commitments
//!
//! The tree is built once over a set of records and never mutated:
//! - Canonical leaves: records are hashed, deduplicated and sorted, so the
//!   root only depends on the set of leaves
//! - Sorted-pair hashing: `keccak256(min(a, b) || max(a, b))`, the same
//!   combination an on-chain verifier replays without left/right flags
//! - Prefixed proofs: callers may put metadata words (cycle, amount) in front
//!   of the sibling path

mod error;
mod hasher;
mod proof;
mod tree;

pub use error::TreeError;
pub use hasher::{Keccak256Hasher, KeccakLeaves, LeafHasher};
pub use proof::{IntoWord, Proof};
pub use tree::{format_hash_hex, HashTree};

/// 32-byte hash type. Also the width of every proof word.
pub type Hash = [u8; 32];

/// Width of a proof word in bytes
pub const WORD_SIZE: usize = 32;

/// Root reported by a tree without leaves
pub const EMPTY_ROOT: Hash = [0u8; 32];
