use log::{debug, warn};
use reqwest::Client;

use super::Peer;
use crate::blockchain::Block;

/// Push a freshly accepted block to every directory peer.
///
/// Best-effort and fire-and-forget: no retries, no acknowledgement beyond
/// the transport response, and an unreachable peer never fails the local
/// append or stops the loop. Each receiver re-validates independently and
/// drops invalid blocks without telling us.
pub async fn broadcast_block(client: &Client, peers: &[Peer], block: &Block) {
    for peer in peers {
        let url = peer.url("/broadcast");
        match client.post(&url).query(block).send().await {
            Ok(_) => debug!("broadcast block #{} to {}", block.index, peer),
            Err(err) => warn!("peer {peer} unreachable during broadcast: {err}"),
        }
    }
}
