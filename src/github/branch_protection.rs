use serde::Serialize;
use url::Url;

use crate::{
    config::{ProtectionConfig, PushRestrictions},
    protector::errors::RemoteError,
    repository::RepositoryRef,
};

const ROUTE_BASE: &str = "https://api.github.com";

/// Body of `PUT /repos/{owner}/{repo}/branches/{branch}/protection`.
///
/// GitHub requires the nullable sections to be present, so `None` is sent
/// as `null` rather than skipped.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpdateBranchProtection {
    pub required_status_checks: Option<RequiredStatusChecks>,
    pub enforce_admins: bool,
    pub required_linear_history: bool,
    pub required_pull_request_reviews: RequiredPullRequestReviews,
    pub restrictions: Option<Restrictions>,
    pub allow_deletions: bool,
    pub allow_force_pushes: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RequiredStatusChecks {
    pub strict: bool,
    pub contexts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RequiredPullRequestReviews {
    pub dismiss_stale_reviews: bool,
    pub require_code_owner_reviews: bool,
    pub required_approving_review_count: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Restrictions {
    pub users: Vec<String>,
    pub teams: Vec<String>,
    pub apps: Vec<String>,
}

impl From<&PushRestrictions> for Restrictions {
    fn from(restrictions: &PushRestrictions) -> Self {
        Self {
            users: restrictions.users.clone(),
            teams: restrictions.teams.clone(),
            apps: restrictions.apps.clone(),
        }
    }
}

impl From<&ProtectionConfig> for UpdateBranchProtection {
    fn from(config: &ProtectionConfig) -> Self {
        let required_status_checks = if config.required_status_checks.is_empty() {
            None
        } else {
            Some(RequiredStatusChecks {
                strict: true,
                contexts: config.required_status_checks.clone(),
            })
        };

        Self {
            required_status_checks,
            enforce_admins: config.enforce_admins,
            required_linear_history: config.require_linear_history,
            required_pull_request_reviews: RequiredPullRequestReviews {
                dismiss_stale_reviews: config.dismiss_stale_reviews,
                require_code_owner_reviews: config.require_code_owner_reviews,
                required_approving_review_count: config.required_approving_review_count,
            },
            restrictions: config.restrictions.as_ref().map(Restrictions::from),
            allow_deletions: config.allow_deletions,
            allow_force_pushes: config.allow_force_pushes,
        }
    }
}

/// Builds the protection route, keeping the branch a single path segment so
/// `feature/foo` is sent as `feature%2Ffoo`.
pub fn protection_route(target: &RepositoryRef) -> Result<String, RemoteError> {
    let mut url = Url::parse(ROUTE_BASE).map_err(|e| RemoteError::InvalidRoute(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| RemoteError::InvalidRoute(format!("cannot extend {}", ROUTE_BASE)))?
        .extend(&[
            "repos",
            target.owner(),
            target.name(),
            "branches",
            target.branch(),
            "protection",
        ]);

    Ok(url.path().to_string())
}

/// Whether an update answer carries nothing worth reporting.
pub fn is_empty_response(response: &serde_json::Value) -> bool {
    match response {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}
