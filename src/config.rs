//! Action inputs and their resolution into run configuration.
//!
//! Inputs arrive as plain strings, the way a GitHub Action receives them
//! through `INPUT_*` environment variables. Booleans are only true for the
//! literal string `"true"`, and an empty string counts as an absent input.
//! Everything is resolved once, up front, into an [`ActionConfig`]; nothing
//! downstream reads the environment again.

use std::{str::FromStr, time::Duration};

use clap::Args;

use crate::{policy::BranchPatternPolicy, protector::errors::ConfigError};

pub const DEFAULT_RULES_LIMIT: u32 = 100;
pub const MAX_RULES_LIMIT: u32 = 100;
pub const DEFAULT_REQUIRED_REVIEWERS: u32 = 1;
pub const MAX_REQUIRED_REVIEWERS: u32 = 6;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw action inputs, exactly as supplied.
#[derive(Args, Clone, Default)]
pub struct ProtectionInputs {
    /// Regular expression a branch name must match to be managed
    #[arg(long, env("INPUT_BASE-BRANCH-PATTERN"))]
    pub base_branch_pattern: Option<String>,
    /// Token used against the GitHub REST and GraphQL APIs
    #[arg(long, env("INPUT_PERSONAL-ACCESS-TOKEN"), hide_env_values = true)]
    pub personal_access_token: Option<String>,
    /// How many existing protection rules to scan when deleting one
    #[arg(long, env("INPUT_RULES-LIMIT"))]
    pub rules_limit: Option<String>,
    #[arg(long, env("INPUT_REQUIRED-NUMBER-OF-REVIEWERS"))]
    pub required_number_of_reviewers: Option<String>,
    #[arg(long, env("INPUT_REQUIRE-REVIEW-FROM-CODEOWNERS"))]
    pub require_review_from_codeowners: Option<String>,
    #[arg(long, env("INPUT_DISMISS-STALE-PR-APPROVALS-ON-NEW-COMMITS"))]
    pub dismiss_stale_pr_approvals_on_new_commits: Option<String>,
    #[arg(long, env("INPUT_REQUIRE-LINEAR-HISTORY"))]
    pub require_linear_history: Option<String>,
    /// Enforce the rule for repository administrators too
    #[arg(long, env("INPUT_INCLUDE-ADMINISTRATORS"))]
    pub include_administrators: Option<String>,
    #[arg(long, env("INPUT_ALLOW-FORCE-PUSHES"))]
    pub allow_force_pushes: Option<String>,
    #[arg(long, env("INPUT_ALLOW-DELETIONS"))]
    pub allow_deletions: Option<String>,
    /// Comma separated status check contexts
    #[arg(long, env("INPUT_REQUIRED-STATUS-CHECKS"))]
    pub required_status_checks: Option<String>,
    /// Comma separated users allowed to push
    #[arg(long, env("INPUT_RESTRICTION-USERS"))]
    pub restriction_users: Option<String>,
    /// Comma separated teams allowed to push
    #[arg(long, env("INPUT_RESTRICTION-TEAMS"))]
    pub restriction_teams: Option<String>,
    /// Comma separated apps allowed to push
    #[arg(long, env("INPUT_RESTRICTION-APPS"))]
    pub restriction_apps: Option<String>,
    /// `warn` or `fail` when GitHub answers a protection update with nothing
    #[arg(long, env("INPUT_EMPTY-RESPONSE-SEVERITY"))]
    pub empty_response_severity: Option<String>,
    /// Per request timeout, in seconds
    #[arg(long, env("INPUT_REQUEST-TIMEOUT"))]
    pub request_timeout: Option<String>,
}

/// What to do when a protection update comes back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyResponseSeverity {
    #[default]
    Warn,
    Fail,
}

impl FromStr for EmptyResponseSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "fail" => Ok(Self::Fail),
            other => Err(format!("expected 'warn' or 'fail', got '{other}'")),
        }
    }
}

/// Users, teams and apps allowed to push to the protected branch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PushRestrictions {
    pub users: Vec<String>,
    pub teams: Vec<String>,
    pub apps: Vec<String>,
}

/// Desired settings of every rule this run creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionConfig {
    pub required_approving_review_count: u32,
    pub require_code_owner_reviews: bool,
    pub dismiss_stale_reviews: bool,
    pub require_linear_history: bool,
    pub enforce_admins: bool,
    pub allow_force_pushes: bool,
    pub allow_deletions: bool,
    pub required_status_checks: Vec<String>,
    pub restrictions: Option<PushRestrictions>,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            required_approving_review_count: DEFAULT_REQUIRED_REVIEWERS,
            require_code_owner_reviews: false,
            dismiss_stale_reviews: false,
            require_linear_history: false,
            enforce_admins: false,
            allow_force_pushes: false,
            allow_deletions: false,
            required_status_checks: Vec::new(),
            restrictions: None,
        }
    }
}

impl ProtectionConfig {
    pub fn from_inputs(inputs: &ProtectionInputs) -> Result<Self, ConfigError> {
        let required_approving_review_count = parse_bounded(
            "required-number-of-reviewers",
            &inputs.required_number_of_reviewers,
            DEFAULT_REQUIRED_REVIEWERS,
            0..=MAX_REQUIRED_REVIEWERS,
        )?;

        let required_status_checks = present(&inputs.required_status_checks)
            .map(split_list)
            .unwrap_or_default();

        Ok(Self {
            required_approving_review_count,
            require_code_owner_reviews: flag(&inputs.require_review_from_codeowners),
            dismiss_stale_reviews: flag(&inputs.dismiss_stale_pr_approvals_on_new_commits),
            require_linear_history: flag(&inputs.require_linear_history),
            enforce_admins: flag(&inputs.include_administrators),
            allow_force_pushes: flag(&inputs.allow_force_pushes),
            allow_deletions: flag(&inputs.allow_deletions),
            required_status_checks,
            restrictions: restrictions(inputs),
        })
    }
}

/// Push restrictions only apply when both users and teams are configured.
/// Apps alone never enable them.
fn restrictions(inputs: &ProtectionInputs) -> Option<PushRestrictions> {
    let users = present(&inputs.restriction_users)?;
    let teams = present(&inputs.restriction_teams)?;

    Some(PushRestrictions {
        users: split_list(users),
        teams: split_list(teams),
        apps: present(&inputs.restriction_apps)
            .map(split_list)
            .unwrap_or_default(),
    })
}

/// Fully resolved configuration for one run.
#[derive(Clone)]
pub struct ActionConfig {
    pub pattern: BranchPatternPolicy,
    pub token: String,
    pub rules_limit: u32,
    pub protection: ProtectionConfig,
    pub empty_response: EmptyResponseSeverity,
    pub request_timeout: Duration,
}

impl ActionConfig {
    /// Resolves raw inputs, failing on the first missing or malformed one.
    pub fn from_inputs(inputs: &ProtectionInputs) -> Result<Self, ConfigError> {
        let pattern = present(&inputs.base_branch_pattern)
            .ok_or(ConfigError::MissingInput("base-branch-pattern"))?;
        let token = present(&inputs.personal_access_token)
            .ok_or(ConfigError::MissingInput("personal-access-token"))?;

        let empty_response = match present(&inputs.empty_response_severity) {
            Some(value) => value.parse().map_err(|reason| ConfigError::InvalidValue {
                input: "empty-response-severity",
                value: value.to_string(),
                reason,
            })?,
            None => EmptyResponseSeverity::default(),
        };

        let timeout_secs = parse_bounded(
            "request-timeout",
            &inputs.request_timeout,
            DEFAULT_REQUEST_TIMEOUT.as_secs(),
            1..=u64::MAX,
        )?;

        Ok(Self {
            pattern: BranchPatternPolicy::new(pattern)?,
            token: token.to_string(),
            rules_limit: parse_bounded(
                "rules-limit",
                &inputs.rules_limit,
                DEFAULT_RULES_LIMIT,
                1..=MAX_RULES_LIMIT,
            )?,
            protection: ProtectionConfig::from_inputs(inputs)?,
            empty_response,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl std::fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionConfig")
            .field("pattern", &self.pattern.pattern())
            .field("token", &"***")
            .field("rules_limit", &self.rules_limit)
            .field("protection", &self.protection)
            .field("empty_response", &self.empty_response)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn flag(value: &Option<String>) -> bool {
    value.as_deref() == Some("true")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bounded<T>(
    input: &'static str,
    value: &Option<String>,
    default: T,
    range: std::ops::RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let Some(raw) = present(value) else {
        return Ok(default);
    };

    let parsed: T = raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        input,
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !range.contains(&parsed) {
        return Err(ConfigError::InvalidValue {
            input,
            value: raw.to_string(),
            reason: format!("must be between {} and {}", range.start(), range.end()),
        });
    }

    Ok(parsed)
}
