//! Payment claim verification
//!
//! Mirrors the check the ledger runs when a recipient withdraws: the leaf is
//! recomputed from the caller's address and claimed amount, the sibling path
//! is replayed against the root stored for the cycle, and the amount word in
//! the proof prefix must agree with the claim.

use paypool_tree::{format_hash_hex, Proof, TreeError};
use serde::{Deserialize, Serialize};

use crate::{
    commitment::NO_PROOF,
    error::ClaimError,
    leaf::PaymentLeaf,
    types::{Address, Amount, Cycle, Hash},
};

/// Number of metadata words in front of a payment proof
pub const PAYMENT_PROOF_PREFIX_WORDS: usize = 2;

/// Decoded payment proof
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProof {
    /// Cycle word
    pub cycle: Amount,
    /// Cumulative amount word
    pub amount: Amount,
    /// Sibling hashes from leaf to root
    pub siblings: Vec<Hash>,
}

impl PaymentProof {
    /// Decode a hex proof produced for a recipient
    pub fn from_hex(proof: &str) -> Result<Self, ClaimError> {
        let mut words = Proof::from_hex(proof, 0)?.siblings;
        if words == [NO_PROOF] {
            return Err(ClaimError::NoProof);
        }
        if words.len() < PAYMENT_PROOF_PREFIX_WORDS {
            return Err(TreeError::MalformedProofInput(format!(
                "payment proof needs {PAYMENT_PROOF_PREFIX_WORDS} prefix words, found {}",
                words.len()
            ))
            .into());
        }

        let siblings = words.split_off(PAYMENT_PROOF_PREFIX_WORDS);
        Ok(Self {
            cycle: Amount::from_be_bytes(words[0]),
            amount: Amount::from_be_bytes(words[1]),
            siblings,
        })
    }

    /// Sibling path as a bare proof
    pub fn path(&self) -> Proof {
        Proof { prefix: Vec::new(), siblings: self.siblings.clone() }
    }

    /// Check a claim against the root published for `cycle`
    pub fn verify(
        &self,
        root: &Hash,
        cycle: Cycle,
        recipient: &Address,
        claimed: Amount,
    ) -> Result<(), ClaimError> {
        let expected_cycle = Amount::from(cycle);
        if self.cycle != expected_cycle {
            return Err(ClaimError::CycleMismatch { expected: expected_cycle, proven: self.cycle });
        }

        let leaf = PaymentLeaf::new(recipient, &claimed).hash();
        let computed = self.path().compute_root(&leaf);
        if computed != *root {
            return Err(ClaimError::RootMismatch {
                expected: format_hash_hex(root),
                computed: format_hash_hex(&computed),
            });
        }

        if self.amount != claimed {
            return Err(ClaimError::AmountMismatch { claimed, proven: self.amount });
        }

        Ok(())
    }
}

/// Verify a hex proof for `recipient` claiming `claimed` in `cycle`.
///
/// Returns the decoded proof when the claim holds.
pub fn verify_claim(
    root: &Hash,
    cycle: Cycle,
    recipient: &Address,
    claimed: Amount,
    proof: &str,
) -> Result<PaymentProof, ClaimError> {
    let decoded = PaymentProof::from_hex(proof)?;
    decoded.verify(root, cycle, recipient, claimed)?;
    Ok(decoded)
}
