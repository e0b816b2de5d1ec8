mod broadcast;
mod chain;
mod health;
mod mine;
pub mod models;

use actix_web::web::ServiceConfig;

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(mine::genesis)
        .service(mine::generate)
        .service(broadcast::listen_broadcast)
        .service(chain::listen_query)
        .service(chain::pull);
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use super::{AppState, init_routes};
    use crate::blockchain::{Block, GENESIS_PARENT_HASH};

    fn state(difficulty: u32, dishonest: bool) -> web::Data<AppState> {
        web::Data::new(AppState::new(difficulty, Vec::new(), dishonest))
    }

    /// Build `/broadcast` query params for a block. Payloads in these tests
    /// stay URL-safe so no percent-encoding is needed.
    fn broadcast_uri(b: &Block) -> String {
        format!(
            "/broadcast?index={}&parent_hash={}&data={}&hash_val={}&nonce={}&timestamp={}",
            b.index, b.parent_hash, b.data, b.hash, b.nonce, b.timestamp
        )
    }

    #[actix_web::test]
    async fn genesis_then_conflict() {
        let state = state(0, false);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(init_routes),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::post().uri("/genesis").to_request())
            .await;
        assert!(resp.status().is_success());
        assert_eq!(state.network.lock().unwrap().len(), 1);

        let resp = test::call_service(&app, test::TestRequest::post().uri("/genesis").to_request())
            .await;
        assert_eq!(resp.status(), 409);
        assert_eq!(state.network.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn generate_extends_the_chain() {
        let state = state(0, false);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(init_routes),
        )
        .await;

        // empty chain: generate delegates to genesis
        let resp = test::call_service(
            &app,
            test::TestRequest::post().uri("/generate").to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/generate?data=hand-picked")
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let net = state.network.lock().unwrap();
        assert_eq!(net.len(), 2);
        assert_eq!(net.chain[1].index, 1);
        assert_eq!(net.chain[1].data, "hand-picked");
        assert!(net.is_valid());
    }

    #[actix_web::test]
    async fn broadcast_appends_valid_blocks() {
        let state = state(0, false);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(init_routes),
        )
        .await;

        let genesis = Block::mine(0, GENESIS_PARENT_HASH.into(), "genesis".into(), 0);
        let child = Block::mine(1, genesis.hash.clone(), "child".into(), 0);

        for block in [&genesis, &child] {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(&broadcast_uri(block))
                    .to_request(),
            )
            .await;
            assert!(resp.status().is_success());
        }

        assert_eq!(state.network.lock().unwrap().chain, vec![genesis, child]);
    }

    #[actix_web::test]
    async fn broadcast_drops_mismatched_parent_silently() {
        let state = state(0, false);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(init_routes),
        )
        .await;

        let genesis = Block::mine(0, GENESIS_PARENT_HASH.into(), "genesis".into(), 0);
        let stranger = Block::mine(1, "00beef".into(), "fork".into(), 0);

        for block in [&genesis, &stranger] {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(&broadcast_uri(block))
                    .to_request(),
            )
            .await;
            // silent drop still answers 200
            assert!(resp.status().is_success());
        }

        assert_eq!(state.network.lock().unwrap().chain, vec![genesis]);
    }

    #[actix_web::test]
    async fn dishonest_node_accepts_only_genesis() {
        let state = state(0, true);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(init_routes),
        )
        .await;

        let genesis = Block::mine(0, GENESIS_PARENT_HASH.into(), "genesis".into(), 0);
        let child = Block::mine(1, genesis.hash.clone(), "child".into(), 0);

        // valid child, ignored on policy alone
        for block in [&genesis, &child] {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(&broadcast_uri(block))
                    .to_request(),
            )
            .await;
            assert!(resp.status().is_success());
        }

        assert_eq!(state.network.lock().unwrap().chain, vec![genesis]);
    }

    #[actix_web::test]
    async fn malformed_broadcast_is_a_client_error() {
        let state = state(0, false);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(init_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/broadcast?index=abc&data=x")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
        assert!(state.network.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn query_round_trips_the_chain() {
        let state = state(0, false);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(init_routes),
        )
        .await;

        let genesis = Block::mine(0, GENESIS_PARENT_HASH.into(), "genesis".into(), 0);
        let child = Block::mine(1, genesis.hash.clone(), "child".into(), 0);
        {
            let mut net = state.network.lock().unwrap();
            net.add_block(genesis.clone());
            net.add_block(child.clone());
        }

        let served: Vec<Block> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/query").to_request(),
        )
        .await;
        assert_eq!(served, vec![genesis, child]);
    }

    #[actix_web::test]
    async fn pull_with_no_valid_responses_keeps_local_chain() {
        // empty directory: nobody answers, so nothing is adopted
        let state = state(0, false);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(init_routes),
        )
        .await;

        let genesis = Block::mine(0, GENESIS_PARENT_HASH.into(), "genesis".into(), 0);
        state.network.lock().unwrap().add_block(genesis.clone());

        let resp = test::call_service(&app, test::TestRequest::post().uri("/pull").to_request())
            .await;
        assert!(resp.status().is_success());
        assert_eq!(state.network.lock().unwrap().chain, vec![genesis]);
    }

    #[actix_web::test]
    async fn unknown_path_is_404() {
        let state = state(0, false);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(init_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/no-such-endpoint").to_request(),
        )
        .await;
        assert_eq!(resp.status(), 404);
    }
}
