//! Event context for ref creation and deletion.
//!
//! GitHub delivers the same payload shape to an Action (through the file at
//! `GITHUB_EVENT_PATH`) and to a webhook receiver (as the request body). Only
//! the fields the router needs are modelled.

use std::path::Path;

use serde::Deserialize;

use crate::{protector::errors::Result, repository::Repository};

pub const CREATE_EVENT_NAME: &str = "create";
pub const DELETE_EVENT_NAME: &str = "delete";
pub const BRANCH_REF_TYPE: &str = "branch";

/// Partial user data model as sent by GitHub.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

/// Partial repository data model as sent by GitHub.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    pub owner: User,
}

/// Payload of a `create` or `delete` event.
///
/// `ref` and `ref_type` are absent on other event kinds; they default to
/// empty strings so such events are still routed, and skipped there.
#[derive(Debug, Clone, Deserialize)]
pub struct RefEventPayload {
    /// Short ref name, e.g. `feature/foo` rather than `refs/heads/feature/foo`.
    #[serde(rename = "ref", default)]
    pub ref_name: String,
    #[serde(default)]
    pub ref_type: String,
    pub repository: RepositoryPayload,
}

/// An event name paired with its payload.
#[derive(Debug, Clone)]
pub struct RefEvent {
    pub name: String,
    pub payload: RefEventPayload,
}

impl RefEvent {
    pub fn from_slice(name: impl Into<String>, body: &[u8]) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            payload: serde_json::from_slice(body)?,
        })
    }

    /// Loads the payload GitHub Actions writes for the running workflow.
    pub fn from_file(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let body = std::fs::read(path)?;
        Self::from_slice(name, &body)
    }

    pub fn branch(&self) -> &str {
        &self.payload.ref_name
    }

    pub fn ref_type(&self) -> &str {
        &self.payload.ref_type
    }

    pub fn repository(&self) -> Repository {
        Repository::new(
            &self.payload.repository.owner.login,
            &self.payload.repository.name,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::protector::errors::Error;

    const CREATE_PAYLOAD: &str = r#"{
        "ref": "feature/foo",
        "ref_type": "branch",
        "master_branch": "main",
        "pusher_type": "user",
        "repository": {
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "owner": { "login": "octocat", "id": 1 }
        },
        "sender": { "login": "octocat" }
    }"#;

    #[test]
    fn test_parse_create_payload() {
        let event = RefEvent::from_slice(CREATE_EVENT_NAME, CREATE_PAYLOAD.as_bytes()).unwrap();
        assert_eq!(event.name, "create");
        assert_eq!(event.branch(), "feature/foo");
        assert_eq!(event.ref_type(), BRANCH_REF_TYPE);
        assert_eq!(event.repository(), Repository::new("octocat", "Hello-World"));
    }

    #[test]
    fn test_non_ref_event_defaults() {
        let body = r#"{ "action": "opened", "repository": { "name": "r", "owner": { "login": "o" } } }"#;
        let event = RefEvent::from_slice("pull_request", body.as_bytes()).unwrap();
        assert_eq!(event.branch(), "");
        assert_eq!(event.ref_type(), "");
    }

    #[test]
    fn test_missing_repository_is_rejected() {
        let err = RefEvent::from_slice(DELETE_EVENT_NAME, br#"{ "ref": "x" }"#).unwrap_err();
        assert!(matches!(err, Error::Event(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CREATE_PAYLOAD.as_bytes()).unwrap();

        let event = RefEvent::from_file(DELETE_EVENT_NAME, file.path()).unwrap();
        assert_eq!(event.name, "delete");
        assert_eq!(event.branch(), "feature/foo");
    }

    #[test]
    fn test_missing_file() {
        let err = RefEvent::from_file(CREATE_EVENT_NAME, "/nonexistent/event.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
