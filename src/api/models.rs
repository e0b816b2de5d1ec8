use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::blockchain::Blockchain;
use crate::net::Peer;

/// Peer request timeout. An unreachable peer is "no response" for that
/// round, never a hang.
const PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared per-node state: the chain store behind its single-writer lock,
/// the seeded peer directory, the node policy flag and the outbound HTTP
/// client.
pub struct AppState {
    pub network: Mutex<Blockchain>,
    /// Directory of peers, fixed before the server starts.
    pub directory: Vec<Peer>,
    /// Dishonest nodes accept only genesis blocks over gossip.
    pub dishonest: bool,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(difficulty: u32, directory: Vec<Peer>, dishonest: bool) -> Self {
        Self {
            network: Mutex::new(Blockchain::new(difficulty)),
            directory,
            dishonest,
            http: reqwest::Client::builder()
                .timeout(PEER_TIMEOUT)
                .build()
                .expect("build http client"),
        }
    }
}

/* ---------- Mining API Models ---------- */

#[derive(Deserialize)]
pub struct GenerateParams {
    /// Payload for the new block; a demo message is picked when omitted.
    pub data: Option<String>,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub accepted: bool,
    pub index: u64,
    pub hash: String,
    pub nonce: u64,
    pub difficulty: u32,
}

/* ---------- Gossip / Reconciliation API Models ---------- */

#[derive(Serialize)]
pub struct BroadcastResponse {
    pub accepted: bool,
}

#[derive(Serialize)]
pub struct PullResponse {
    pub replaced: bool,
    pub length: usize,
}
