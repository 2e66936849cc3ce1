//! Immutable sorted-pair Merkle tree

use std::{borrow::Borrow, collections::HashSet, fmt, marker::PhantomData};

use tracing::debug;

use crate::{
    error::TreeError,
    hasher::{Keccak256Hasher, KeccakLeaves, LeafHasher},
    proof::{IntoWord, Proof},
    Hash, EMPTY_ROOT,
};

/// Binary Merkle tree over a canonical (deduplicated, sorted) leaf set.
///
/// Built once from its input and never updated. The root depends only on the
/// set of leaf hashes, not on the order records were supplied in.
pub struct HashTree<H: LeafHasher = KeccakLeaves> {
    /// Layer 0 is the sorted leaf set, the last layer holds the root
    layers: Vec<Vec<Hash>>,
    _hasher: PhantomData<fn() -> H>,
}

impl<H: LeafHasher> HashTree<H> {
    /// Build a tree from records.
    ///
    /// Blank records are dropped, the rest are hashed with `H`, duplicates
    /// (by hash) are removed and the hashes are sorted byte-wise.
    pub fn new<I>(elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<H::Record>,
    {
        let hashes = elements.into_iter().filter_map(|record| {
            let record = record.borrow();
            (!H::is_blank(record)).then(|| H::hash_leaf(record))
        });
        Self::from_leaf_hashes(hashes)
    }

    /// Build a tree from already hashed leaves
    pub fn from_leaf_hashes<I>(hashes: I) -> Self
    where
        I: IntoIterator<Item = Hash>,
    {
        let mut seen = HashSet::new();
        let mut elements: Vec<Hash> =
            hashes.into_iter().filter(|hash| seen.insert(*hash)).collect();
        elements.sort_unstable();

        let layers = Self::build_layers(elements);
        debug!(
            leaves = layers[0].len(),
            depth = layers.len(),
            root = %format_hash_hex(&Self::top(&layers)),
            "built merkle tree"
        );

        Self { layers, _hasher: PhantomData }
    }

    fn build_layers(elements: Vec<Hash>) -> Vec<Vec<Hash>> {
        let mut layers = vec![elements];
        while layers[layers.len() - 1].len() > 1 {
            let next = Self::next_layer(&layers[layers.len() - 1]);
            layers.push(next);
        }
        layers
    }

    /// Pair up nodes in order. An odd trailing node moves up unchanged.
    fn next_layer(layer: &[Hash]) -> Vec<Hash> {
        layer
            .chunks(2)
            .filter_map(|pair| Keccak256Hasher::combine(pair.first(), pair.get(1)))
            .collect()
    }

    fn top(layers: &[Vec<Hash>]) -> Hash {
        layers.last().and_then(|layer| layer.first()).copied().unwrap_or(EMPTY_ROOT)
    }

    /// Get the root hash. An empty tree reports [`EMPTY_ROOT`].
    pub fn root(&self) -> Hash {
        Self::top(&self.layers)
    }

    /// Root as `0x`-prefixed lowercase hex
    pub fn hex_root(&self) -> String {
        format_hash_hex(&self.root())
    }

    /// Canonical leaf set (layer 0)
    pub fn elements(&self) -> &[Hash] {
        &self.layers[0]
    }

    /// All layers, leaves first
    pub fn layers(&self) -> &[Vec<Hash>] {
        &self.layers
    }

    /// Number of layers
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Number of distinct leaves
    pub fn len(&self) -> usize {
        self.elements().len()
    }

    /// Whether the tree holds no leaves
    pub fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }

    /// Whether a record's leaf is in the tree
    pub fn contains(&self, record: &H::Record) -> bool {
        self.index_of(&H::hash_leaf(record)).is_some()
    }

    fn index_of(&self, leaf: &Hash) -> Option<usize> {
        self.elements().binary_search(leaf).ok()
    }

    /// Proof for a record, hashed with the tree's leaf hasher.
    ///
    /// The record is always hashed, even when it is already 32 bytes long. To
    /// look up a leaf by its digest use [`Self::proof_for_hash`].
    pub fn get_proof<P>(&self, record: &H::Record, prefix: P) -> Result<Proof, TreeError>
    where
        P: IntoIterator,
        P::Item: IntoWord,
    {
        self.proof_for_hash(&H::hash_leaf(record), prefix)
    }

    /// Proof for a leaf digest.
    ///
    /// Collects the sibling at every layer walking up from the leaf. Each
    /// `prefix` value becomes a 32-byte word placed before the siblings.
    pub fn proof_for_hash<P>(&self, leaf: &Hash, prefix: P) -> Result<Proof, TreeError>
    where
        P: IntoIterator,
        P::Item: IntoWord,
    {
        let mut idx = self.index_of(leaf).ok_or(TreeError::NotFound(*leaf))?;

        let mut siblings = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            if let Some(sibling) = layer.get(idx ^ 1) {
                siblings.push(*sibling);
            }
            idx /= 2;
        }

        let prefix =
            prefix.into_iter().map(IntoWord::into_word).collect::<Result<Vec<_>, _>>()?;

        Ok(Proof { prefix, siblings })
    }

    /// Hex-encoded proof for a record
    pub fn get_hex_proof<P>(&self, record: &H::Record, prefix: P) -> Result<String, TreeError>
    where
        P: IntoIterator,
        P::Item: IntoWord,
    {
        self.get_proof(record, prefix).map(|proof| proof.to_hex())
    }
}

impl<H: LeafHasher> Clone for HashTree<H> {
    fn clone(&self) -> Self {
        Self { layers: self.layers.clone(), _hasher: PhantomData }
    }
}

impl<H: LeafHasher> fmt::Debug for HashTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTree")
            .field("leaves", &self.len())
            .field("depth", &self.depth())
            .field("root", &self.hex_root())
            .finish()
    }
}

/// Format a 32-byte hash as hexadecimal string with 0x prefix
pub fn format_hash_hex(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    type Tree = HashTree<KeccakLeaves>;

    fn leaf(s: &str) -> Hash {
        Keccak256Hasher::hash(s.as_bytes())
    }

    fn tree_of(items: &[&str]) -> Tree {
        Tree::new(items.iter().map(|s| s.as_bytes()))
    }

    const NO_PREFIX: [u64; 0] = [];

    #[test]
    fn test_empty_tree() {
        let tree = tree_of(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.root(), EMPTY_ROOT);
        assert_eq!(tree.hex_root(), format!("0x{}", "0".repeat(64)));
        assert!(matches!(
            tree.get_proof(b"A".as_slice(), NO_PREFIX),
            Err(TreeError::NotFound(_))
        ));
    }

    #[test]
    fn test_blank_records_dropped() {
        assert_eq!(tree_of(&["", "A", ""]).root(), tree_of(&["A"]).root());
    }

    #[test]
    fn test_single_leaf_root_is_leaf() {
        let tree = tree_of(&["A"]);
        assert_eq!(tree.root(), leaf("A"));
        let proof = tree.get_proof(b"A".as_slice(), NO_PREFIX).unwrap();
        assert!(proof.is_empty());
    }

    #[test]
    fn test_two_leaves() {
        let tree = tree_of(&["A", "B"]);
        assert_eq!(tree.root(), Keccak256Hasher::combined_hash(&leaf("A"), &leaf("B")));
    }

    #[test]
    fn test_layers_halve() {
        let tree = tree_of(&["A", "B", "C", "D", "E"]);
        let lens: Vec<_> = tree.layers().iter().map(Vec::len).collect();
        assert_eq!(lens, vec![5, 3, 2, 1]);
    }

    #[test]
    fn test_odd_node_carried_unchanged() {
        let tree = tree_of(&["A", "B", "C"]);
        let sorted = tree.elements().to_vec();
        assert_eq!(tree.layers()[1][1], sorted[2]);
        let expected = Keccak256Hasher::combined_hash(
            &Keccak256Hasher::combined_hash(&sorted[0], &sorted[1]),
            &sorted[2],
        );
        assert_eq!(tree.root(), expected);
    }

    #[test]
    fn test_elements_sorted_and_unique() {
        let tree = tree_of(&["D", "A", "C", "A", "B"]);
        assert_eq!(tree.len(), 4);
        assert!(tree.elements().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_dedup_same_root() {
        assert_eq!(tree_of(&["A", "A", "B"]).root(), tree_of(&["A", "B"]).root());
    }

    #[test]
    fn test_order_independent_root() {
        assert_eq!(tree_of(&["A", "B", "C", "D"]).root(), tree_of(&["C", "A", "D", "B"]).root());
    }

    #[test]
    fn test_every_proof_replays_to_root() {
        let items = ["A", "B", "C", "D", "E", "F", "G"];
        let tree = tree_of(&items);
        for item in items {
            let proof = tree.get_proof(item.as_bytes(), NO_PREFIX).unwrap();
            assert!(proof.verify(&tree.root(), &leaf(item)), "proof for {item}");
        }
    }

    #[test]
    fn test_proof_for_hash_matches_record_lookup() {
        let tree = tree_of(&["A", "B", "C", "D"]);
        assert_eq!(
            tree.proof_for_hash(&leaf("C"), NO_PREFIX).unwrap(),
            tree.get_proof(b"C".as_slice(), NO_PREFIX).unwrap()
        );
    }

    #[test]
    fn test_missing_leaf() {
        let tree = tree_of(&["A", "B"]);
        assert!(!tree.contains(b"Z".as_slice()));
        assert_eq!(
            tree.get_proof(b"Z".as_slice(), NO_PREFIX),
            Err(TreeError::NotFound(leaf("Z")))
        );
    }

    #[test]
    fn test_digest_passed_as_record_is_rehashed() {
        let tree = tree_of(&["A", "B", "C"]);
        let digest = leaf("B");
        assert_eq!(
            tree.get_proof(digest.as_slice(), NO_PREFIX),
            Err(TreeError::NotFound(Keccak256Hasher::hash(&digest)))
        );
        let proof = tree.proof_for_hash(&digest, NO_PREFIX).unwrap();
        assert!(proof.verify(&tree.root(), &digest));
    }

    #[test]
    fn test_prefix_precedes_siblings() {
        let tree = tree_of(&["A", "B", "C", "D"]);
        let proof = tree.get_proof(b"A".as_slice(), [7u64, 10]).unwrap();
        assert_eq!(proof.prefix, vec![7u64.into_word().unwrap(), 10u64.into_word().unwrap()]);
        assert_eq!(proof.siblings.len(), 2);

        let hex = tree.get_hex_proof(b"A".as_slice(), [7u64, 10]).unwrap();
        assert_eq!(hex.len(), 2 + 4 * 64);
        assert_eq!(Proof::from_hex(&hex, 2).unwrap(), proof);
    }

    #[test]
    fn test_single_prefix_value() {
        let tree = tree_of(&["A", "B"]);
        let proof = tree.get_proof(b"A".as_slice(), Some(3u64)).unwrap();
        assert_eq!(proof.prefix, vec![3u64.into_word().unwrap()]);
    }
}
