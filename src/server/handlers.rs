use std::sync::Arc;

use axum::{Extension, extract::State, http::StatusCode};
use tracing::error;

use crate::{event::RefEvent, protector::EventRouter, server::AppState};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Routes one verified delivery through a fresh router.
pub async fn webhook(
    State(state): State<AppState>,
    Extension(event): Extension<Arc<RefEvent>>,
) -> StatusCode {
    let router = EventRouter::new(
        state.policy.as_ref().clone(),
        event.repository(),
        state.gateway.clone(),
    );

    match router
        .handle(event.branch(), event.ref_type(), &event.name)
        .await
    {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            error!(
                "Failed to handle {} event for {}@{}: {}",
                event.name,
                event.repository(),
                event.branch(),
                e
            );
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
