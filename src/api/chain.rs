use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{AppState, PullResponse};
use crate::net::sync;

/// Serve this node's current chain as a bare JSON array, in chain order.
#[get("/query")]
pub async fn listen_query(state: web::Data<AppState>) -> impl Responder {
    let net = state.network.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(&net.chain)
}

/// Reconcile with the directory: pull every peer's chain, validate each,
/// and adopt the plurality winner. The fetch phase runs without the lock;
/// only the final swap takes it. If no peer returned a valid chain the
/// local chain stays as it is.
#[post("/pull")]
pub async fn pull(state: web::Data<AppState>) -> impl Responder {
    let difficulty = state.network.lock().expect("mutex poisoned").difficulty;

    let winner = sync::reconcile(&state.http, &state.directory, difficulty).await;

    let mut net = state.network.lock().expect("mutex poisoned");
    let replaced = match winner {
        Some(chain) => {
            net.replace(chain);
            true
        }
        None => {
            info!("no valid peer chains, keeping local chain");
            false
        }
    };

    HttpResponse::Ok().json(PullResponse {
        replaced,
        length: net.len(),
    })
}
