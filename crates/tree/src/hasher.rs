//! Keccak256 hashing for the payment tree

use tiny_keccak::{Hasher, Keccak};

use crate::Hash;

/// Keccak256 hasher
#[derive(Clone, Copy, Debug, Default)]
pub struct Keccak256Hasher;

impl Keccak256Hasher {
    /// Hash a single value
    pub fn hash(data: &[u8]) -> Hash {
        keccak(&[data])
    }

    /// Hash two nodes together, smaller word first.
    ///
    /// Sorting before concatenation makes the result independent of which
    /// side a node sits on, so a proof only needs the sibling values.
    pub fn combined_hash(first: &Hash, second: &Hash) -> Hash {
        let (low, high) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };

        keccak(&[low.as_slice(), high.as_slice()])
    }

    /// Combine two optional nodes. A missing side yields the other one unchanged.
    pub fn combine(first: Option<&Hash>, second: Option<&Hash>) -> Option<Hash> {
        match (first, second) {
            (Some(a), Some(b)) => Some(Self::combined_hash(a, b)),
            (Some(node), None) | (None, Some(node)) => Some(*node),
            (None, None) => None,
        }
    }
}

/// keccak256 over the concatenation of `parts`
fn keccak(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak::v256();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Maps a record to its leaf digest.
///
/// The tree is generic over this trait so that every domain can pin its own
/// leaf pre-image. Whatever an implementation hashes here is what an external
/// verifier has to recompute, byte for byte.
pub trait LeafHasher {
    /// Record type accepted by the tree
    type Record: ?Sized;

    /// Whether the record should be dropped before hashing
    fn is_blank(record: &Self::Record) -> bool;

    /// Leaf digest of the record
    fn hash_leaf(record: &Self::Record) -> Hash;
}

/// Leaves are keccak256 of raw bytes. Empty byte strings are skipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeccakLeaves;

impl LeafHasher for KeccakLeaves {
    type Record = [u8];

    fn is_blank(record: &[u8]) -> bool {
        record.is_empty()
    }

    fn hash_leaf(record: &[u8]) -> Hash {
        Keccak256Hasher::hash(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_empty_input() {
        // keccak256("")
        let expected =
            hex::decode("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
                .unwrap();
        assert_eq!(Keccak256Hasher::hash(&[]).to_vec(), expected);
    }

    #[test]
    fn test_combined_hash_is_commutative() {
        let left = [1u8; 32];
        let right = [2u8; 32];
        let hash = Keccak256Hasher::combined_hash(&left, &right);
        assert_ne!(hash, [0u8; 32]);
        assert_eq!(hash, Keccak256Hasher::combined_hash(&right, &left));
    }

    #[test]
    fn test_combined_hash_sorts_before_concat() {
        let low = [1u8; 32];
        let high = [2u8; 32];
        let mut concat = [0u8; 64];
        concat[..32].copy_from_slice(&low);
        concat[32..].copy_from_slice(&high);
        assert_eq!(Keccak256Hasher::combined_hash(&high, &low), Keccak256Hasher::hash(&concat));
    }

    #[test]
    fn test_keccak_parts_match_concatenation() {
        let parts = [b"pay".as_slice(), b"".as_slice(), b"pool".as_slice()];
        assert_eq!(keccak(&parts), Keccak256Hasher::hash(b"paypool"));
        assert_eq!(keccak(&[]), Keccak256Hasher::hash(&[]));
    }

    #[test]
    fn test_combine_identity_on_missing_side() {
        let node = [7u8; 32];
        assert_eq!(Keccak256Hasher::combine(Some(&node), None), Some(node));
        assert_eq!(Keccak256Hasher::combine(None, Some(&node)), Some(node));
        assert_eq!(Keccak256Hasher::combine(None, None), None);
    }

    #[test]
    fn test_keccak_leaves_skip_empty() {
        assert!(KeccakLeaves::is_blank(b""));
        assert!(!KeccakLeaves::is_blank(b"A"));
        assert_eq!(KeccakLeaves::hash_leaf(b"A"), Keccak256Hasher::hash(b"A"));
    }
}
