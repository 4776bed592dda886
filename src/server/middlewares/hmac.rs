use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{extract_body_from_request, restore_request_body};

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
const SIGNATURE_PREFIX: &str = "sha256=";

type HmacSha256 = Hmac<Sha256>;

pub struct HmacConfig {
    pub secret: String,
    pub header_name: String,
}

/// Rejects deliveries whose body was not signed with the webhook secret.
pub async fn verify_hmac_middleware(
    State(config): State<Arc<HmacConfig>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let signature = req
        .headers()
        .get(config.header_name.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            tracing::warn!("Missing or unreadable {} header", config.header_name);
            StatusCode::UNAUTHORIZED
        })?;

    let body = extract_body_from_request(&mut req).await?;

    if !verify_signature(config.secret.as_bytes(), &body, &signature) {
        tracing::warn!("Rejected webhook with invalid signature");
        return Err(StatusCode::UNAUTHORIZED);
    }

    restore_request_body(&mut req, body);
    Ok(next.run(req).await)
}

/// Checks a `sha256=<hex>` signature in constant time.
pub fn verify_signature(secret: &[u8], body: &[u8], signature: &str) -> bool {
    let Some(encoded) = signature.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };
    let Ok(expected) = hex::decode(encoded) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };

    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}
