//! Event to action decision.
//!
//! A single event yields at most one gateway call. The checks run in a fixed
//! order and stop at the first negative answer: branch pattern, ref type,
//! event name.

use tracing::{debug, info};

use crate::{
    event::{BRANCH_REF_TYPE, CREATE_EVENT_NAME, DELETE_EVENT_NAME},
    policy::BranchPatternPolicy,
    protector::{errors::Result, gateway::RuleGateway},
    repository::Repository,
};

/// Why an event was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    PatternMismatch,
    NotABranch,
    UnhandledEvent,
}

/// What the router decided for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Create,
    Delete,
    Skip(SkipReason),
}

pub struct EventRouter<G> {
    policy: BranchPatternPolicy,
    repository: Repository,
    gateway: G,
}

impl<G: RuleGateway> EventRouter<G> {
    pub fn new(policy: BranchPatternPolicy, repository: Repository, gateway: G) -> Self {
        Self {
            policy,
            repository,
            gateway,
        }
    }

    /// Decides without side effects.
    pub fn decide(&self, branch_name: &str, ref_type: &str, event_name: &str) -> Decision {
        let matches_pattern = self.policy.matches(branch_name);
        debug!(
            "Pattern {} matches branch {}: {}",
            self.policy.pattern(),
            branch_name,
            matches_pattern
        );

        if !matches_pattern {
            return Decision::Skip(SkipReason::PatternMismatch);
        }

        if ref_type != BRANCH_REF_TYPE {
            return Decision::Skip(SkipReason::NotABranch);
        }

        match event_name {
            CREATE_EVENT_NAME => Decision::Create,
            DELETE_EVENT_NAME => Decision::Delete,
            _ => Decision::Skip(SkipReason::UnhandledEvent),
        }
    }

    /// Decides and, when warranted, issues exactly one gateway call.
    /// Gateway errors are returned unchanged.
    pub async fn handle(&self, branch_name: &str, ref_type: &str, event_name: &str) -> Result<Decision> {
        let decision = self.decide(branch_name, ref_type, event_name);

        match decision {
            Decision::Create => {
                let target = self.repository.branch(branch_name);
                info!("Creating protection rule for {}", target);
                self.gateway.create_rule(&target).await?;
            }
            Decision::Delete => {
                let target = self.repository.branch(branch_name);
                info!("Deleting protection rule for {}", target);
                self.gateway.delete_rule(&target).await?;
            }
            Decision::Skip(reason) => {
                debug!(
                    "Skipping {} event for {} ({}): {:?}",
                    event_name, branch_name, ref_type, reason
                );
            }
        }

        Ok(decision)
    }
}
