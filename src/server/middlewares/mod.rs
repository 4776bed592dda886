pub mod gh_event;
pub mod hmac;

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
};

/// Largest payload GitHub delivers.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

async fn extract_body_from_request(req: &mut Request) -> Result<Bytes, StatusCode> {
    let body = std::mem::replace(req.body_mut(), Body::empty());

    axum::body::to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        tracing::error!("Failed to read request body: {}", e);
        StatusCode::BAD_REQUEST
    })
}

/// Restore the request body for downstream handlers
fn restore_request_body(req: &mut Request, body: Bytes) {
    *req.body_mut() = Body::from(body);
}
