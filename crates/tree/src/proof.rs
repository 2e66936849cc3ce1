//! Inclusion proofs: optional metadata prefix followed by the sibling path

use serde::{Deserialize, Serialize};

use crate::{error::TreeError, hasher::Keccak256Hasher, Hash, WORD_SIZE};

/// Conversion of prefix metadata into a 32-byte big-endian word.
///
/// Values are left-padded with zeros. Anything wider than a word is rejected.
pub trait IntoWord {
    /// Encode as a left-zero-padded 32-byte word
    fn into_word(self) -> Result<Hash, TreeError>;
}

impl IntoWord for Hash {
    fn into_word(self) -> Result<Hash, TreeError> {
        Ok(self)
    }
}

impl IntoWord for &Hash {
    fn into_word(self) -> Result<Hash, TreeError> {
        Ok(*self)
    }
}

impl IntoWord for &[u8] {
    fn into_word(self) -> Result<Hash, TreeError> {
        left_pad(self)
    }
}

macro_rules! impl_into_word_for_uint {
    ($($t:ty),*) => {
        $(
            impl IntoWord for $t {
                fn into_word(self) -> Result<Hash, TreeError> {
                    left_pad(&self.to_be_bytes())
                }
            }
        )*
    };
}

impl_into_word_for_uint!(u8, u16, u32, u64, u128, usize);

/// Left-pad big-endian bytes to a full word
fn left_pad(bytes: &[u8]) -> Result<Hash, TreeError> {
    if bytes.len() > WORD_SIZE {
        return Err(TreeError::MalformedProofInput(format!(
            "prefix value is {} bytes, a word holds {WORD_SIZE}",
            bytes.len()
        )));
    }
    let mut word = [0u8; WORD_SIZE];
    word[WORD_SIZE - bytes.len()..].copy_from_slice(bytes);
    Ok(word)
}

/// Merkle inclusion proof
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Metadata words placed ahead of the path (cycle, amount, ...)
    pub prefix: Vec<Hash>,
    /// Sibling hashes from leaf to root
    pub siblings: Vec<Hash>,
}

impl Proof {
    /// All words in wire order: prefix first, then siblings
    pub fn words(&self) -> impl Iterator<Item = &Hash> + '_ {
        self.prefix.iter().chain(self.siblings.iter())
    }

    /// Total number of words
    pub fn len(&self) -> usize {
        self.prefix.len() + self.siblings.len()
    }

    /// Whether the proof carries no words at all
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.siblings.is_empty()
    }

    /// `0x` followed by every word in hex
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(2 + self.len() * WORD_SIZE * 2);
        out.push_str("0x");
        for word in self.words() {
            out.push_str(&hex::encode(word));
        }
        out
    }

    /// Parse a hex proof whose first `prefix_len` words are metadata
    pub fn from_hex(proof: &str, prefix_len: usize) -> Result<Self, TreeError> {
        let raw = proof.strip_prefix("0x").unwrap_or(proof);
        let bytes = hex::decode(raw)
            .map_err(|e| TreeError::MalformedProofInput(format!("invalid hex: {e}")))?;

        if bytes.len() % WORD_SIZE != 0 {
            return Err(TreeError::MalformedProofInput(format!(
                "{} bytes is not a whole number of words",
                bytes.len()
            )));
        }

        let mut words: Vec<Hash> = bytes
            .chunks_exact(WORD_SIZE)
            .map(|chunk| {
                let mut word = [0u8; WORD_SIZE];
                word.copy_from_slice(chunk);
                word
            })
            .collect();

        if words.len() < prefix_len {
            return Err(TreeError::MalformedProofInput(format!(
                "expected at least {prefix_len} prefix words, found {}",
                words.len()
            )));
        }

        let siblings = words.split_off(prefix_len);
        Ok(Self { prefix: words, siblings })
    }

    /// Compute the root by replaying the sibling path from a leaf digest.
    /// The prefix takes no part in the replay.
    pub fn compute_root(&self, leaf: &Hash) -> Hash {
        self.siblings
            .iter()
            .fold(*leaf, |node, sibling| Keccak256Hasher::combined_hash(&node, sibling))
    }

    /// Verify this proof against a root hash
    pub fn verify(&self, root: &Hash, leaf: &Hash) -> bool {
        self.compute_root(leaf) == *root
    }
}
