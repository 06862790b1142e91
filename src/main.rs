use crate::config::Config;
use crate::db::connection::init_db;
use crate::db::loads::seed_loads;
use crate::db::Database;
use crate::router::{handle, AppContext};
use astra::Server;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod errors;
mod fmcsa;
mod matching;
mod negotiation;
mod responses;
mod router;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db) {
        tracing::error!("database initialization failed: {e}");
        std::process::exit(1);
    }
    if let Err(e) = seed_loads(&db) {
        tracing::error!("seeding loads failed: {e}");
        std::process::exit(1);
    }

    let addr = config.bind_addr;
    tracing::info!("starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);
    let ctx = AppContext { db, config };

    let result = server.serve(move |req, _info| match handle(req, &ctx) {
        Ok(resp) => resp,
        Err(err) => responses::error_to_response(err),
    });

    if let Err(e) = result {
        tracing::error!("server ended with error: {e}");
    }
}
