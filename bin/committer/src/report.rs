//! Commitment report handed to the ledger operator and to recipients

use paypool_core::{Address, CumulativePaymentCommitment, Cycle, LEAF_ENCODING_VERSION};
use serde::Serialize;

/// Root to publish plus one proof per recipient
#[derive(Clone, Debug, Serialize)]
pub(crate) struct CommitmentReport {
    pub(crate) cycle: Cycle,
    pub(crate) root: String,
    pub(crate) leaf_encoding_version: u32,
    pub(crate) payments: Vec<RecipientProof>,
}

/// Proof handed to a single recipient
#[derive(Clone, Debug, Serialize)]
pub(crate) struct RecipientProof {
    pub(crate) recipient: Address,
    /// Cumulative amount, decimal
    pub(crate) amount: String,
    pub(crate) proof: String,
}

impl CommitmentReport {
    pub(crate) fn new(commitment: &CumulativePaymentCommitment, cycle: Cycle) -> Self {
        let payments = commitment
            .payments()
            .iter()
            .map(|payment| RecipientProof {
                recipient: payment.recipient,
                amount: payment.amount.to_string(),
                proof: commitment.hex_proof_for_recipient(&payment.recipient, cycle),
            })
            .collect();

        Self {
            cycle,
            root: commitment.hex_root(),
            leaf_encoding_version: LEAF_ENCODING_VERSION,
            payments,
        }
    }
}
