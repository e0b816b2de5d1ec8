use futures_util::future::join_all;
use log::{debug, warn};
use reqwest::Client;

use super::Peer;
use crate::blockchain::{Block, validate_chain};

/// Pull every directory peer's chain and pick the plurality winner.
///
/// Fetches run concurrently; a peer that is unreachable, times out, or
/// returns an invalid chain simply contributes nothing to the tally.
/// Returns `None` when no peer produced a valid chain, in which case the
/// caller keeps its current chain.
pub async fn reconcile(client: &Client, peers: &[Peer], difficulty: u32) -> Option<Vec<Block>> {
    let fetches = peers.iter().map(|peer| fetch_chain(client, peer));
    let responses = join_all(fetches).await;

    let mut valid = Vec::new();
    for (peer, response) in peers.iter().zip(responses) {
        match response {
            Some(chain) if validate_chain(&chain, difficulty) => valid.push(chain),
            Some(_) => debug!("discarding invalid chain from {peer}"),
            None => {}
        }
    }

    plurality(valid)
}

/// GET one peer's full chain. Any transport or decode failure becomes
/// "no response" for this reconciliation round.
async fn fetch_chain(client: &Client, peer: &Peer) -> Option<Vec<Block>> {
    let url = peer.url("/query");
    match client.get(&url).send().await {
        Ok(resp) => match resp.json::<Vec<Block>>().await {
            Ok(chain) => Some(chain),
            Err(err) => {
                warn!("undecodable chain from {peer}: {err}");
                None
            }
        },
        Err(err) => {
            warn!("peer {peer} unreachable during pull: {err}");
            None
        }
    }
}

/// Most frequent chain among `candidates`, ties broken by first-seen order.
///
/// Chains are keyed by their block hashes; the hash pins every header field,
/// so equal fingerprints mean field-for-field equal chains.
pub fn plurality(candidates: Vec<Vec<Block>>) -> Option<Vec<Block>> {
    let mut tally: Vec<(String, Vec<Block>, usize)> = Vec::new();

    for chain in candidates {
        let key = fingerprint(&chain);
        match tally.iter_mut().find(|(seen, _, _)| *seen == key) {
            Some(entry) => entry.2 += 1,
            None => tally.push((key, chain, 1)),
        }
    }

    // strict > keeps the earliest-seen chain on ties
    let mut winner: Option<(Vec<Block>, usize)> = None;
    for (_, chain, count) in tally {
        match &winner {
            Some((_, best)) if count <= *best => {}
            _ => winner = Some((chain, count)),
        }
    }

    winner.map(|(chain, _)| chain)
}

fn fingerprint(chain: &[Block]) -> String {
    chain
        .iter()
        .map(|b| b.hash.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
