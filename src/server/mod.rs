use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use crate::{
    cli::ServeArgs,
    config::ActionConfig,
    github::Github,
    policy::BranchPatternPolicy,
    protector::{ProtectionRuleGateway, RuleGateway},
};

mod handlers;
mod middlewares;

pub struct Server {
    pub address: std::net::Ipv4Addr,
    pub port: u16,
    webhook_secret: String,
    state: AppState,
}

/// Shared by every delivery. Resolved once at startup, never mutated.
#[derive(Clone)]
pub struct AppState {
    policy: Arc<BranchPatternPolicy>,
    gateway: Arc<dyn RuleGateway>,
}

impl AppState {
    pub fn new(policy: BranchPatternPolicy, gateway: Arc<dyn RuleGateway>) -> Self {
        Self {
            policy: Arc::new(policy),
            gateway,
        }
    }
}

impl Server {
    pub fn new(args: &ServeArgs) -> Result<Self> {
        let config = ActionConfig::from_inputs(&args.inputs)?;
        info!("Managing branches matching {}", config.pattern.pattern());

        let github = Github::new(&config.token, args.api_url.as_deref(), config.request_timeout)?;
        let gateway = ProtectionRuleGateway::from_config(github, &config);

        Ok(Server {
            address: args.address,
            port: args.port,
            webhook_secret: args.webhook_secret.clone(),
            state: AppState::new(config.pattern, Arc::new(gateway)),
        })
    }

    pub async fn start(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind((self.address, self.port)).await?;
        info!("Server started on {}", listener.local_addr()?);

        axum::serve(listener, get_router(self.state, self.webhook_secret)).await?;

        Ok(())
    }
}

/// Creates the Axum router with the necessary routes and middleware.
fn get_router(state: AppState, webhook_secret: String) -> Router {
    let hmac_state = Arc::new(middlewares::hmac::HmacConfig {
        secret: webhook_secret,
        header_name: middlewares::hmac::SIGNATURE_HEADER.to_string(),
    });

    Router::new()
        .route("/", get(handlers::health))
        .route(
            "/webhook",
            post(handlers::webhook)
                .layer(middleware::from_fn(middlewares::gh_event::github_event))
                .layer(middleware::from_fn_with_state(
                    hmac_state,
                    middlewares::hmac::verify_hmac_middleware,
                )),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Micros),
                ),
        )
        .with_state(state)
}
