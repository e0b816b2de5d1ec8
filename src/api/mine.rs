use actix_web::{HttpResponse, Responder, post, web};
use log::{info, warn};
use rand::seq::SliceRandom;

use super::models::{AppState, GenerateParams, MineResponse};
use crate::blockchain::{Block, DATA_MESSAGES, GENESIS_DATA, GENESIS_PARENT_HASH};
use crate::net::gossip;

/// Mine and append the genesis block, then broadcast it.
/// A node that already has a chain refuses with 409.
#[post("/genesis")]
pub async fn genesis(state: web::Data<AppState>) -> impl Responder {
    if !state.network.lock().expect("mutex poisoned").is_empty() {
        return HttpResponse::Conflict().body("chain already has a genesis block");
    }

    mine_and_publish(
        &state,
        0,
        GENESIS_PARENT_HASH.to_string(),
        GENESIS_DATA.to_string(),
    )
    .await
}

/// Mine the next block on top of the current tip, append it and broadcast.
/// On an empty chain this delegates to genesis mining.
#[post("/generate")]
pub async fn generate(
    state: web::Data<AppState>,
    params: web::Query<GenerateParams>,
) -> impl Responder {
    let data = params.into_inner().data.unwrap_or_else(|| {
        DATA_MESSAGES
            .choose(&mut rand::thread_rng())
            .expect("non-empty message pool")
            .to_string()
    });

    // Snapshot the tip, then mine without holding the lock.
    let parent = {
        let net = state.network.lock().expect("mutex poisoned");
        net.tip().map(|tip| (tip.index + 1, tip.hash.clone()))
    };

    match parent {
        Some((index, parent_hash)) => mine_and_publish(&state, index, parent_hash, data).await,
        None => {
            info!("generate called on an empty chain, mining genesis instead");
            mine_and_publish(
                &state,
                0,
                GENESIS_PARENT_HASH.to_string(),
                GENESIS_DATA.to_string(),
            )
            .await
        }
    }
}

/// Shared mine -> append -> broadcast path for `/genesis` and `/generate`.
///
/// The Proof-of-Work search is CPU-bound and unbounded, so it runs on the
/// blocking pool while `/query` and `/broadcast` stay responsive. The append
/// re-validates against the tip at append time; if the tip moved while we
/// were mining, the stale block is simply rejected and never broadcast.
async fn mine_and_publish(
    state: &web::Data<AppState>,
    index: u64,
    parent_hash: String,
    data: String,
) -> HttpResponse {
    let difficulty = state.network.lock().expect("mutex poisoned").difficulty;

    let mined = web::block(move || Block::mine(index, parent_hash, data, difficulty)).await;
    let block = match mined {
        Ok(block) => block,
        Err(err) => {
            warn!("mining task failed: {err}");
            return HttpResponse::InternalServerError().body("mining task failed");
        }
    };

    let accepted = {
        let mut net = state.network.lock().expect("mutex poisoned");
        net.add_block(block.clone())
    };

    if accepted {
        info!(
            "MINER - sealed block #{} (hash={}, nonce={})",
            block.index, block.hash, block.nonce
        );
        gossip::broadcast_block(&state.http, &state.directory, &block).await;
    } else {
        warn!("mined block #{} went stale before append", block.index);
    }

    HttpResponse::Ok().json(MineResponse {
        accepted,
        index: block.index,
        hash: block.hash,
        nonce: block.nonce,
        difficulty,
    })
}
