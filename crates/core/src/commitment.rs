//! Cumulative payment commitment

use std::collections::HashMap;

use paypool_tree::{format_hash_hex, HashTree, Proof};
use tracing::{debug, warn};

use crate::{
    aggregate::reduce_payments,
    error::CommitmentError,
    leaf::{PaymentLeaf, PaymentLeaves},
    types::{Address, Amount, Cycle, Hash, PaymentEntry, RawPayment, U256},
};

/// Word handed out in place of a proof for recipients without a leaf
pub const NO_PROOF: Hash = [0u8; 32];

/// Merkle commitment over every recipient's cumulative amount.
///
/// Built once per payment cycle from the full cumulative payment list. The
/// root is published to the ledger; each recipient gets a proof prefixed
/// with the cycle and their amount.
#[derive(Clone, Debug)]
pub struct CumulativePaymentCommitment {
    tree: HashTree<PaymentLeaves>,
    /// One entry per recipient, first-occurrence order
    payments: Vec<PaymentEntry>,
    /// Leaf record per entry, same order as `payments`
    leaves: Vec<PaymentLeaf>,
    positions: HashMap<Address, usize>,
}

impl CumulativePaymentCommitment {
    /// Build a commitment from a raw payment list.
    ///
    /// Incomplete and zero entries are dropped and repeated recipients are
    /// summed before the tree is built.
    pub fn new<I, P>(payment_list: I) -> Result<Self, CommitmentError>
    where
        I: IntoIterator<Item = P>,
        P: Into<RawPayment>,
    {
        let payments = reduce_payments(payment_list)?;
        let leaves: Vec<PaymentLeaf> = payments.iter().map(PaymentLeaf::from).collect();
        let positions: HashMap<Address, usize> =
            payments.iter().enumerate().map(|(idx, payment)| (payment.recipient, idx)).collect();

        let tree: HashTree<PaymentLeaves> = HashTree::new(&leaves);
        debug!(
            recipients = payments.len(),
            root = %tree.hex_root(),
            "built cumulative payment commitment"
        );

        Ok(Self { tree, payments, leaves, positions })
    }

    /// Build a commitment from typed entries
    pub fn from_entries(entries: &[PaymentEntry]) -> Result<Self, CommitmentError> {
        Self::new(entries.iter().copied())
    }

    /// Get the root hash
    pub fn root(&self) -> Hash {
        self.tree.root()
    }

    /// Root as `0x`-prefixed hex, the value published to the ledger
    pub fn hex_root(&self) -> String {
        self.tree.hex_root()
    }

    /// Reduced payment list
    pub fn payments(&self) -> &[PaymentEntry] {
        &self.payments
    }

    /// Leaf records, in the order of [`Self::payments`]
    pub fn leaves(&self) -> &[PaymentLeaf] {
        &self.leaves
    }

    /// Underlying tree
    pub const fn tree(&self) -> &HashTree<PaymentLeaves> {
        &self.tree
    }

    /// Number of recipients
    pub fn len(&self) -> usize {
        self.payments.len()
    }

    /// Whether no recipient is committed
    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Cumulative amount for a recipient, zero when unknown
    pub fn amount_for_recipient(&self, recipient: &Address) -> Amount {
        self.positions
            .get(recipient)
            .map(|&idx| self.payments[idx].amount)
            .unwrap_or_default()
    }

    /// Proof for a recipient, prefixed with `[cycle, amount]`
    pub fn proof_for_recipient(&self, recipient: &Address, cycle: Cycle) -> Option<Proof> {
        let &idx = self.positions.get(recipient)?;
        let leaf = &self.leaves[idx];
        let amount = self.payments[idx].amount;

        let prefix = [U256::from(cycle).to_be_bytes::<32>(), amount.to_be_bytes::<32>()];
        match self.tree.get_proof(leaf, prefix) {
            Ok(proof) => Some(proof),
            Err(err) => {
                warn!(%recipient, %err, "recipient leaf missing from tree");
                None
            }
        }
    }

    /// Hex proof for a recipient.
    ///
    /// Recipients without a leaf get the all-zero word instead of an error,
    /// which the ledger treats as a zero balance.
    pub fn hex_proof_for_recipient(&self, recipient: &Address, cycle: Cycle) -> String {
        self.proof_for_recipient(recipient, cycle)
            .map_or_else(|| format_hash_hex(&NO_PROOF), |proof| proof.to_hex())
    }
}
