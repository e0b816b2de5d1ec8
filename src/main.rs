mod api;
mod blockchain;
mod net;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use std::env;

use api::AppState;
use blockchain::DEFAULT_DIFFICULTY;
use net::peer::parse_peers;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(6666);
    let difficulty: u32 = env::var("DIFFICULTY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DIFFICULTY);
    let dishonest = matches!(
        env::var("DISHONEST").as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    );

    // Seed the peer directory before the server starts; registration is
    // in-process configuration, not a wire endpoint.
    let directory = parse_peers(&env::var("PEERS").unwrap_or_default());

    println!(
        "⛓️ Starting joancoin node at http://{host}:{port} \
         (difficulty={difficulty}, peers={}, dishonest={dishonest})",
        directory.len()
    );

    let state = web::Data::new(AppState::new(difficulty, directory, dishonest));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
