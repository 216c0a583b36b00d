//! Contacts collection handlers: list, create, delete.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, info};
use serde::Deserialize;

use crate::api::models::{DeleteAck, NewContact};
use crate::error::StoreError;
use crate::server::state::SharedState;
use crate::server::utils::api_error;

const LOAD_FAILED: &str = "Contacts could not be loaded from the database.";
const INVALID_INPUT: &str = "Invalid data. Name and address are required.";
const SAVE_FAILED: &str = "Contact could not be saved: the database is unavailable.";
const DELETE_FAILED: &str = "Error while deleting the contact.";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactPayload {
    name: Option<String>,
    address: Option<String>,
    created_at: Option<i64>,
}

pub async fn list_contacts_handler(State(state): State<SharedState>) -> Response {
    let st = state.lock().await;
    let Some(store) = st.store.as_ref() else {
        return api_error(StatusCode::SERVICE_UNAVAILABLE, LOAD_FAILED);
    };
    match store.list() {
        Ok(contacts) => (StatusCode::OK, axum::Json(contacts)).into_response(),
        Err(e) => {
            error!("contacts: list failed: {}", e);
            api_error(StatusCode::SERVICE_UNAVAILABLE, LOAD_FAILED)
        }
    }
}

pub async fn create_contact_handler(
    State(state): State<SharedState>,
    payload: Result<axum::Json<CreateContactPayload>, JsonRejection>,
) -> Response {
    let Ok(axum::Json(req)) = payload else {
        return api_error(StatusCode::BAD_REQUEST, INVALID_INPUT);
    };
    let draft = match NewContact::new(
        req.name.as_deref().unwrap_or_default(),
        req.address.as_deref().unwrap_or_default(),
    ) {
        Ok(draft) => draft,
        Err(_) => return api_error(StatusCode::BAD_REQUEST, INVALID_INPUT),
    };
    let draft = match req.created_at {
        Some(ts) => draft.with_created_at(ts),
        None => draft,
    };

    let st = state.lock().await;
    let Some(store) = st.store.as_ref() else {
        return api_error(StatusCode::SERVICE_UNAVAILABLE, SAVE_FAILED);
    };
    match store.insert(&draft) {
        Ok(contact) => {
            info!("contacts: saved {} ({})", contact.name, contact.id);
            (StatusCode::CREATED, axum::Json(contact)).into_response()
        }
        Err(e) => {
            error!("contacts: insert failed: {}", e);
            api_error(StatusCode::SERVICE_UNAVAILABLE, SAVE_FAILED)
        }
    }
}

pub async fn delete_contact_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let st = state.lock().await;
    let Some(store) = st.store.as_ref() else {
        return api_error(StatusCode::INTERNAL_SERVER_ERROR, DELETE_FAILED);
    };
    match store.delete(&id) {
        Ok(()) => {
            info!("contacts: deleted {}", id);
            let ack = DeleteAck {
                message: "Contact removed.".to_string(),
            };
            (StatusCode::OK, axum::Json(ack)).into_response()
        }
        Err(StoreError::NotFound(_)) => api_error(
            StatusCode::NOT_FOUND,
            "Contact was not found in the database.",
        ),
        Err(e) => {
            error!("contacts: delete {} failed: {}", id, e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, DELETE_FAILED)
        }
    }
}
