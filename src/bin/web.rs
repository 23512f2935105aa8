//! Single binary web server: REST API for running petanque contests.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default; see `ServerConfig` for the environment overrides.

use actix_web::{web::Data, App, HttpServer};
use petanque_contest_web::{api, ContestStore, ServerConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(ContestStore::new());

    // Background task: periodically remove contests nobody touched for the TTL
    let state_cleanup = state.clone();
    let (ttl, every) = (config.contest_ttl, config.cleanup_interval);
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match state_cleanup.evict_inactive(ttl) {
                Ok(0) => {}
                Ok(removed) => log::info!(
                    "Cleaned up {} inactive contest(s) (no activity for {}h)",
                    removed,
                    ttl.as_secs() / 3600
                ),
                Err(e) => log::error!("Contest cleanup failed: {}", e),
            }
        }
    });

    HttpServer::new(move || App::new().app_data(state.clone()).configure(api::configure))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
