//! Payment leaf encoding
//!
//! A leaf is `keccak256(recipient || amount)` where `recipient` is the raw
//! 20-byte address and `amount` is a 32-byte big-endian `uint256`. This is
//! `keccak256(abi.encodePacked(address, uint256))` on the ledger side, so the
//! layout must not change without bumping [`LEAF_ENCODING_VERSION`].

use std::fmt;

use paypool_tree::{Keccak256Hasher, LeafHasher};

use crate::types::{Address, Amount, Hash, PaymentEntry};

/// Version of the leaf pre-image layout shared with the ledger
pub const LEAF_ENCODING_VERSION: u32 = 1;

/// Byte length of an encoded leaf: 20-byte address + 32-byte amount
pub const PAYMENT_LEAF_LEN: usize = 20 + 32;

/// Encoded leaf record for one recipient
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaymentLeaf([u8; PAYMENT_LEAF_LEN]);

impl PaymentLeaf {
    /// Encode a recipient and amount
    pub fn new(recipient: &Address, amount: &Amount) -> Self {
        let mut bytes = [0u8; PAYMENT_LEAF_LEN];
        bytes[..20].copy_from_slice(recipient.as_slice());
        bytes[20..].copy_from_slice(&amount.to_be_bytes::<32>());
        Self(bytes)
    }

    /// Encoded pre-image
    pub const fn as_bytes(&self) -> &[u8; PAYMENT_LEAF_LEN] {
        &self.0
    }

    /// Recipient encoded in this leaf
    pub fn recipient(&self) -> Address {
        Address::from_slice(&self.0[..20])
    }

    /// Amount encoded in this leaf
    pub fn amount(&self) -> Amount {
        Amount::from_be_slice(&self.0[20..])
    }

    /// Leaf digest
    pub fn hash(&self) -> Hash {
        Keccak256Hasher::hash(&self.0)
    }
}

impl From<&PaymentEntry> for PaymentLeaf {
    fn from(entry: &PaymentEntry) -> Self {
        Self::new(&entry.recipient, &entry.amount)
    }
}

impl fmt::Debug for PaymentLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentLeaf")
            .field("recipient", &self.recipient())
            .field("amount", &self.amount())
            .finish()
    }
}

/// Leaf hasher for [`PaymentLeaf`] records
#[derive(Clone, Copy, Debug, Default)]
pub struct PaymentLeaves;

impl LeafHasher for PaymentLeaves {
    type Record = PaymentLeaf;

    fn is_blank(leaf: &PaymentLeaf) -> bool {
        leaf.amount().is_zero()
    }

    fn hash_leaf(leaf: &PaymentLeaf) -> Hash {
        leaf.hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, keccak256, U256};

    #[test]
    fn test_layout_is_packed_address_then_uint256() {
        let recipient = address!("0x627306090abab3a6e1400e9345bc60c78a8bef57");
        let leaf = PaymentLeaf::new(&recipient, &U256::from(0x1234));
        let bytes = leaf.as_bytes();

        assert_eq!(&bytes[..20], recipient.as_slice());
        assert_eq!(&bytes[20..50], &[0u8; 30]);
        assert_eq!(&bytes[50..], &[0x12, 0x34]);
        assert_eq!(leaf.recipient(), recipient);
        assert_eq!(leaf.amount(), U256::from(0x1234));
    }

    #[test]
    fn test_hash_matches_solidity_packed_keccak() {
        let recipient = address!("0xf17f52151ebef6c7334fad080c5704d77216b732");
        let amount = U256::from(12);

        let mut packed = Vec::new();
        packed.extend_from_slice(recipient.as_slice());
        packed.extend_from_slice(&amount.to_be_bytes::<32>());

        let leaf = PaymentLeaf::new(&recipient, &amount);
        assert_eq!(leaf.hash(), keccak256(&packed).0);
        assert_eq!(PaymentLeaves::hash_leaf(&leaf), leaf.hash());
    }

    #[test]
    fn test_amount_changes_hash() {
        let recipient = Address::repeat_byte(2);
        assert_ne!(
            PaymentLeaf::new(&recipient, &U256::from(10)).hash(),
            PaymentLeaf::new(&recipient, &U256::from(11)).hash()
        );
    }

    #[test]
    fn test_zero_amount_is_blank() {
        let leaf = PaymentLeaf::new(&Address::repeat_byte(2), &U256::ZERO);
        assert!(PaymentLeaves::is_blank(&leaf));
    }
}
