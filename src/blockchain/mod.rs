pub mod block;
pub mod model;

pub use block::Block;
pub use model::{Blockchain, validate_chain};

/// Default Proof-of-Work difficulty. A block hash needs *strictly more*
/// leading zero hex digits than this to be accepted.
pub const DEFAULT_DIFFICULTY: u32 = 3;

/// Sentinel parent hash for the genesis block. Never a real digest.
pub const GENESIS_PARENT_HASH: &str = "0";

/// Payload of the genesis block.
pub const GENESIS_DATA: &str = "Genesis Block";

/// Demo payloads for blocks mined without an explicit payload.
pub const DATA_MESSAGES: &[&str] = &[
    "hello, world",
    "yolo",
    "cpsc 310 for life",
    "https://youtu.be/dQw4w9WgXcQ",
];
