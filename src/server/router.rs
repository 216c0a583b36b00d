//! Axum router construction.

use axum::routing::{delete, get};
use axum::Router;

use crate::server::handlers;
use crate::server::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::health_handler))
        .route(
            "/api/contacts",
            get(handlers::contacts::list_contacts_handler)
                .post(handlers::contacts::create_contact_handler),
        )
        .route(
            "/api/contacts/:id",
            delete(handlers::contacts::delete_contact_handler),
        )
        .with_state(state)
}
