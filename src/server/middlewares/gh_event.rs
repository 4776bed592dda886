use std::sync::Arc;

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};

use super::{extract_body_from_request, restore_request_body};
use crate::event::RefEvent;

const GH_EVENT_HEADER: &str = "X-GitHub-Event";

/// This middleware parses the delivery into a `RefEvent` and adds it to the
/// request extensions.
pub async fn github_event(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let event_name = extract_event_from_request(&req)?;
    let body = extract_body_from_request(&mut req).await?;

    let event = RefEvent::from_slice(event_name, &body).map_err(|e| {
        tracing::error!("Failed to parse webhook event: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    req.extensions_mut().insert(Arc::new(event));
    restore_request_body(&mut req, body);

    Ok(next.run(req).await)
}

fn extract_event_from_request(req: &Request) -> Result<String, StatusCode> {
    req.headers()
        .get(GH_EVENT_HEADER)
        .ok_or_else(|| {
            tracing::error!("Missing required header: {}", GH_EVENT_HEADER);
            StatusCode::BAD_REQUEST
        })?
        .to_str()
        .map_err(|e| {
            tracing::error!("Invalid header value for {}: {}", GH_EVENT_HEADER, e);
            StatusCode::BAD_REQUEST
        })
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http};

    use super::*;

    #[test]
    fn test_extract_event_header() {
        let req = http::Request::builder()
            .header(GH_EVENT_HEADER, "delete")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_event_from_request(&req).unwrap(), "delete");
    }

    #[test]
    fn test_missing_event_header() {
        let req = http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(
            extract_event_from_request(&req).unwrap_err(),
            StatusCode::BAD_REQUEST
        );
    }
}
