//! One-shot GitHub Action run: one event in, at most one rule mutation out.

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    cli::RunArgs,
    config::ActionConfig,
    event::RefEvent,
    github::Github,
    protector::{EventRouter, ProtectionRuleGateway},
};

pub async fn run(args: RunArgs) -> Result<()> {
    // Configuration problems abort before any client exists.
    let config = ActionConfig::from_inputs(&args.inputs)?;
    debug!("Resolved configuration: {:?}", config);

    let event = RefEvent::from_file(&args.event_name, &args.event_path)?;
    debug!("Event name: {}", event.name);
    debug!("Ref type: {}", event.ref_type());
    debug!("Current branch: {}", event.branch());

    let github = Github::new(&config.token, args.api_url.as_deref(), config.request_timeout)?;
    let gateway = ProtectionRuleGateway::from_config(github, &config);
    let router = EventRouter::new(config.pattern.clone(), event.repository(), gateway);

    let decision = router
        .handle(event.branch(), event.ref_type(), &event.name)
        .await?;

    info!(
        "Handled {} event for {}@{}: {:?}",
        event.name,
        event.repository(),
        event.branch(),
        decision
    );

    Ok(())
}
