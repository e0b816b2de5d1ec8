use chrono::Utc;
use rand::{Rng, rngs::OsRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single block in the chain with its Proof-of-Work metadata.
///
/// Immutable once mined: every field is part of the hash preimage, so any
/// change invalidates `hash` and the block must be re-mined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub parent_hash: String,
    pub data: String,
    /// Epoch seconds, microsecond precision. Fixed once when mining starts.
    pub timestamp: f64,
    pub nonce: u64, // Proof-of-Work search variable
    /// Cached SHA-256 hash of the block header, hex-encoded.
    #[serde(rename = "hash_val")]
    pub hash: String,
}

impl Block {
    /// Mine a new block: fix the timestamp, draw a random starting nonce and
    /// walk it forward until the header hash clears `difficulty`.
    ///
    /// The search is unbounded (expected ~16^difficulty attempts) and
    /// CPU-bound; callers servicing requests must dispatch it to a blocking
    /// context. The winning nonce is stored, so validators recompute the
    /// hash deterministically with no search of their own.
    pub fn mine(index: u64, parent_hash: String, data: String, difficulty: u32) -> Self {
        let mut block = Self {
            index,
            parent_hash,
            data,
            timestamp: now_secs(),
            // Random 30-bit starting point so nonces are unpredictable.
            nonce: OsRng.gen_range(0..(1u64 << 30)),
            hash: String::new(),
        };

        loop {
            let attempt = block.compute_hash();
            if leading_zero_digits(&attempt) > difficulty {
                block.hash = attempt;
                break;
            }
            block.nonce = block.nonce.wrapping_add(1);
        }

        block
    }

    /// Compute the SHA-256 hash of this block's header
    /// (excluding the `hash` field itself).
    pub fn compute_hash(&self) -> String {
        let preimage = format!(
            "{} {} {} {} {}",
            self.index, self.parent_hash, self.timestamp, self.nonce, self.data
        );
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        let digest = hasher.finalize();
        hex::encode(digest)
    }

    /// True when the stored hash matches the re-derived header hash and
    /// clears `difficulty`. (Does NOT validate chain linkage.)
    pub fn is_valid(&self, difficulty: u32) -> bool {
        self.hash == self.compute_hash() && leading_zero_digits(&self.hash) > difficulty
    }
}

/// Count of leading `'0'` hex digits in a digest string.
pub fn leading_zero_digits(hash: &str) -> u32 {
    hash.bytes().take_while(|b| *b == b'0').count() as u32
}

/// Current time as float epoch seconds.
pub fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
