//! smartcontact-server: REST service over the contacts collection.
//!
//! If the SQLite collection cannot be opened the service still starts, reports
//! `database: disconnected` on `/api/health`, and answers 503 on the
//! collection routes so clients fall back to their local snapshot.

pub mod config;
pub mod handlers;
pub mod router;
pub mod state;
pub mod store;
pub mod utils;

use clap::Parser;
use log::{error, info, warn};

use config::{Cli, Config};
use state::AppState;
use store::ContactStore;

pub use router::build_router;

/// Entry point: parse CLI, open the collection, serve until the process ends.
pub async fn run() -> std::io::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli_and_env(cli);

    crate::logging::init();

    info!("smartcontact-server starting");
    info!("  database: {}", config.db_path.display());

    let state = match ContactStore::open(&config.db_path) {
        Ok(store) => {
            match store.count() {
                Ok(n) => info!("  connected, {} contact(s) stored", n),
                Err(e) => warn!("  connected, but counting contacts failed: {}", e),
            }
            AppState::new(store)
        }
        Err(e) => {
            error!("  database unavailable: {}", e);
            error!("  collection routes will answer 503 until restarted");
            AppState::unavailable()
        }
    };

    let app = build_router(state.into_shared());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("smartcontact-server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
