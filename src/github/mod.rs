use std::{future::Future, time::Duration};

use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::debug;

use crate::{
    protector::errors::RemoteError,
    repository::{Repository, RepositoryRef},
};

pub mod branch_protection;
pub mod rules;
pub mod types;

use branch_protection::UpdateBranchProtection;
use types::{
    GraphQLResponse,
    protection::{DeleteProtectionRuleInput, DeleteRuleData, ProtectionRule, ProtectionRulesData},
};

/// The three platform calls rule synchronization is built from.
#[async_trait]
pub trait ProtectionApi: Send + Sync {
    /// Creates or replaces the protection of a single branch.
    async fn update_branch_protection(
        &self,
        target: &RepositoryRef,
        request: &UpdateBranchProtection,
    ) -> Result<serde_json::Value, RemoteError>;

    /// Lists the first `first` rules of a repository, `None` when GitHub
    /// answered without a usable payload.
    async fn list_protection_rules(
        &self,
        repository: &Repository,
        first: u32,
    ) -> Result<Option<Vec<ProtectionRule>>, RemoteError>;

    /// Deletes a rule by id. Returns the echoed client mutation id, if any.
    async fn delete_protection_rule(
        &self,
        input: &DeleteProtectionRuleInput,
    ) -> Result<Option<String>, RemoteError>;
}

/// GitHub client authenticated with a personal access token.
pub struct Github {
    client: Octocrab,
    timeout: Duration,
}

impl Github {
    /// Builds the client. `api_url` points at a GitHub Enterprise API root.
    pub fn new(token: &str, api_url: Option<&str>, timeout: Duration) -> Result<Self, RemoteError> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if let Some(api_url) = api_url {
            builder = builder.base_uri(api_url)?;
        }

        Ok(Github {
            client: builder.build()?,
            timeout,
        })
    }

    async fn with_timeout<T, F>(&self, operation: &'static str, request: F) -> Result<T, RemoteError>
    where
        F: Future<Output = octocrab::Result<T>> + Send,
    {
        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| RemoteError::Timeout {
                operation,
                seconds: self.timeout.as_secs(),
            })?
            .map_err(RemoteError::from)
    }
}

#[async_trait]
impl ProtectionApi for Github {
    async fn update_branch_protection(
        &self,
        target: &RepositoryRef,
        request: &UpdateBranchProtection,
    ) -> Result<serde_json::Value, RemoteError> {
        let route = branch_protection::protection_route(target)?;
        debug!("PUT {}: {}", route, serde_json::to_string(request).unwrap_or_default());

        // GitHub may answer with no body at all, which is not JSON.
        let body = self
            .with_timeout("update branch protection", async {
                let response = self.client._put(route.as_str(), Some(request)).await?;
                let response = octocrab::map_github_error(response).await?;
                self.client.body_to_string(response).await
            })
            .await?;

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&body).map_err(RemoteError::Body)
    }

    async fn list_protection_rules(
        &self,
        repository: &Repository,
        first: u32,
    ) -> Result<Option<Vec<ProtectionRule>>, RemoteError> {
        let payload = rules::protection_rules_query(repository, first);

        let response: GraphQLResponse<ProtectionRulesData> = self
            .with_timeout("list protection rules", self.client.graphql(&payload))
            .await?;

        let data = response.into_data().map_err(RemoteError::Graphql)?;
        Ok(data.and_then(ProtectionRulesData::into_rules))
    }

    async fn delete_protection_rule(
        &self,
        input: &DeleteProtectionRuleInput,
    ) -> Result<Option<String>, RemoteError> {
        let payload = rules::delete_protection_rule_mutation(input);

        let response: GraphQLResponse<DeleteRuleData> = self
            .with_timeout("delete protection rule", self.client.graphql(&payload))
            .await?;

        let data = response.into_data().map_err(RemoteError::Graphql)?;
        debug!("Branch protection rule delete mutation: {:?}", data);

        Ok(data
            .and_then(|d| d.delete_branch_protection_rule)
            .and_then(|p| p.client_mutation_id))
    }
}
