use log::{debug, info};

use super::Block;
use super::block::leading_zero_digits;

/// In-memory chain store: the node's accepted sequence of blocks plus the
/// network difficulty. Single source of truth per node; mutated only through
/// [`Blockchain::add_block`] and [`Blockchain::replace`].
#[derive(Debug)]
pub struct Blockchain {
    pub chain: Vec<Block>,
    pub difficulty: u32,
}

impl Blockchain {
    /// Initialize an empty chain store. The first block arrives later,
    /// either mined locally (`/genesis`) or received over gossip.
    pub fn new(difficulty: u32) -> Self {
        Self {
            chain: Vec::new(),
            difficulty,
        }
    }

    /// Current head of the chain, if any.
    pub fn tip(&self) -> Option<&Block> {
        self.chain.last()
    }

    /// Append `block` if it is valid on top of the current tip.
    ///
    /// A genesis block (index 0) arriving on an empty store is appended
    /// unconditionally: there is no parent to check against, so the very
    /// first block a node sees is taken on trust. Every other append, local
    /// or gossiped, goes through full validation. Returns whether the block
    /// was appended; on failure the chain is untouched.
    pub fn add_block(&mut self, block: Block) -> bool {
        if self.chain.is_empty() && block.index == 0 {
            info!("appended genesis block {}", block.hash);
            self.chain.push(block);
            return true;
        }

        if validate_block(&block, self.tip(), self.difficulty) {
            info!("appended block #{} {}", block.index, block.hash);
            self.chain.push(block);
            return true;
        }

        debug!("rejected block #{} {}", block.index, block.hash);
        false
    }

    /// Wholesale chain swap, used only by reconciliation. The caller must
    /// have validated `chain` already; forks are never spliced, only
    /// replaced end to end.
    pub fn replace(&mut self, chain: Vec<Block>) {
        info!(
            "replacing chain: {} -> {} blocks",
            self.chain.len(),
            chain.len()
        );
        self.chain = chain;
    }

    /// Validate the store's own chain: genesis, linkage, hashes and PoW.
    pub fn is_valid(&self) -> bool {
        validate_chain(&self.chain, self.difficulty)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

/// Validate `block` against its claimed parent and the network difficulty.
///
/// All checks required, short-circuit on first failure:
/// 1. the stored hash matches a deterministic recompute of the header,
/// 2. the hash has strictly more leading zero hex digits than `difficulty`
///    (independently testable even though #1 already pins the full digest),
/// 3. the block was not created earlier than its parent (ties allowed),
/// 4. the stored parent hash matches the parent's hash,
/// 5. the index immediately follows the parent's.
///
/// For genesis (`parent` is `None`) only #1–#2 apply.
pub fn validate_block(block: &Block, parent: Option<&Block>, difficulty: u32) -> bool {
    if block.compute_hash() != block.hash {
        return false;
    }

    // redundant with the recompute above, kept as an explicit rule
    if leading_zero_digits(&block.hash) <= difficulty {
        return false;
    }

    if let Some(parent) = parent {
        if block.timestamp < parent.timestamp {
            return false;
        }

        if parent.hash != block.parent_hash {
            return false;
        }

        if block.index != parent.index + 1 {
            return false;
        }
    }

    true
}

/// Validate a whole chain: non-empty, valid genesis, every link valid
/// against its parent. An empty slice is "no chain", not a valid one.
pub fn validate_chain(chain: &[Block], difficulty: u32) -> bool {
    let Some(genesis) = chain.first() else {
        return false;
    };

    if !validate_block(genesis, None, difficulty) {
        return false;
    }

    chain
        .windows(2)
        .all(|pair| validate_block(&pair[1], Some(&pair[0]), difficulty))
}
