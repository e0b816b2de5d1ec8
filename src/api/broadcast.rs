use actix_web::{HttpResponse, Responder, post, web};
use log::{debug, info};

use super::models::{AppState, BroadcastResponse};
use crate::blockchain::Block;

/// Receive a peer-proposed block and attempt to append it.
///
/// Gossip is best-effort: an invalid block (stale fork, wrong parent, bad
/// Proof-of-Work) is dropped silently and the sender still gets a 200.
/// Malformed query params never reach this body; the extractor answers 400.
/// A dishonest node ignores every non-genesis proposal.
#[post("/broadcast")]
pub async fn listen_broadcast(
    state: web::Data<AppState>,
    params: web::Query<Block>,
) -> impl Responder {
    let block = params.into_inner();
    info!("received block #{} {}", block.index, block.hash);

    if state.dishonest && block.index != 0 {
        debug!("dishonest node ignoring non-genesis block #{}", block.index);
        return HttpResponse::Ok().json(BroadcastResponse { accepted: false });
    }

    let accepted = {
        let mut net = state.network.lock().expect("mutex poisoned");
        net.add_block(block)
    };

    HttpResponse::Ok().json(BroadcastResponse { accepted })
}
