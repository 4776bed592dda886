//! Translation of create/delete intents into platform calls.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    config::{ActionConfig, EmptyResponseSeverity, ProtectionConfig},
    github::{
        ProtectionApi,
        branch_protection::{UpdateBranchProtection, is_empty_response},
        types::protection::{DeleteProtectionRuleInput, ProtectionRule},
    },
    protector::errors::{Error, Result},
    repository::RepositoryRef,
};

/// The two rule operations the router can ask for.
#[async_trait]
pub trait RuleGateway: Send + Sync {
    async fn create_rule(&self, target: &RepositoryRef) -> Result<()>;
    async fn delete_rule(&self, target: &RepositoryRef) -> Result<()>;
}

#[async_trait]
impl<G: RuleGateway + ?Sized> RuleGateway for Arc<G> {
    async fn create_rule(&self, target: &RepositoryRef) -> Result<()> {
        (**self).create_rule(target).await
    }

    async fn delete_rule(&self, target: &RepositoryRef) -> Result<()> {
        (**self).delete_rule(target).await
    }
}

/// Gateway backed by the GitHub protection API.
pub struct ProtectionRuleGateway<A> {
    api: A,
    protection: ProtectionConfig,
    rules_limit: u32,
    empty_response: EmptyResponseSeverity,
}

impl<A: ProtectionApi> ProtectionRuleGateway<A> {
    pub fn new(
        api: A,
        protection: ProtectionConfig,
        rules_limit: u32,
        empty_response: EmptyResponseSeverity,
    ) -> Self {
        Self {
            api,
            protection,
            rules_limit,
            empty_response,
        }
    }

    pub fn from_config(api: A, config: &ActionConfig) -> Self {
        Self::new(
            api,
            config.protection.clone(),
            config.rules_limit,
            config.empty_response,
        )
    }
}

/// Finds the rule whose pattern is exactly `branch`.
///
/// This is a plain string comparison, not a pattern evaluation: a rule for
/// `feature/*` does not protect `feature/foo` as far as deletion is concerned.
pub fn find_rule<'a>(rules: &'a [ProtectionRule], branch: &str) -> Option<&'a ProtectionRule> {
    rules.iter().find(|rule| rule.pattern == branch)
}

#[async_trait]
impl<A: ProtectionApi> RuleGateway for ProtectionRuleGateway<A> {
    async fn create_rule(&self, target: &RepositoryRef) -> Result<()> {
        let request = UpdateBranchProtection::from(&self.protection);
        debug!(
            "Restrictions created for branch {}: {}",
            target,
            serde_json::to_string(&request.restrictions).unwrap_or_default()
        );

        let response = self.api.update_branch_protection(target, &request).await?;

        if is_empty_response(&response) {
            match self.empty_response {
                EmptyResponseSeverity::Warn => {
                    warn!("Could not create rules for branch {}: empty response", target);
                    return Ok(());
                }
                EmptyResponseSeverity::Fail => {
                    return Err(Error::EmptyProtectionResponse(target.to_string()));
                }
            }
        }

        debug!("Updated protection: {}", response);
        info!("Protected branch {}", target);
        Ok(())
    }

    async fn delete_rule(&self, target: &RepositoryRef) -> Result<()> {
        let Some(rules) = self
            .api
            .list_protection_rules(target.repository(), self.rules_limit)
            .await?
        else {
            debug!("Rules were null for {}", target);
            return Ok(());
        };

        debug!(
            "Branch protection rules response: {}",
            serde_json::to_string(&rules).unwrap_or_default()
        );

        let Some(rule) = find_rule(&rules, target.branch()) else {
            debug!(
                "Rule for {} was not found in the first {} rules",
                target, self.rules_limit
            );
            return Ok(());
        };

        let input = DeleteProtectionRuleInput::new(rule.id.clone());
        self.api.delete_protection_rule(&input).await?;

        info!("Deleted protection rule {} for branch {}", rule.id, target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{
        config::PushRestrictions,
        protector::errors::RemoteError,
        repository::Repository,
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Update(RepositoryRef, UpdateBranchProtection),
        List(Repository, u32),
        Delete(DeleteProtectionRuleInput),
    }

    struct FakeApi {
        update_response: serde_json::Value,
        rules: Option<Vec<ProtectionRule>>,
        fail_listing: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                update_response: serde_json::json!({ "url": "https://api.github.com/protection" }),
                rules: Some(vec![
                    rule("BPR_1", "main"),
                    rule("BPR_2", "feature/foo"),
                    rule("BPR_3", "release/1.0"),
                ]),
                fail_listing: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn deletes(&self) -> Vec<DeleteProtectionRuleInput> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    Call::Delete(input) => Some(input),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl ProtectionApi for FakeApi {
        async fn update_branch_protection(
            &self,
            target: &RepositoryRef,
            request: &UpdateBranchProtection,
        ) -> std::result::Result<serde_json::Value, RemoteError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Update(target.clone(), request.clone()));
            Ok(self.update_response.clone())
        }

        async fn list_protection_rules(
            &self,
            repository: &Repository,
            first: u32,
        ) -> std::result::Result<Option<Vec<ProtectionRule>>, RemoteError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::List(repository.clone(), first));
            if self.fail_listing {
                return Err(RemoteError::Graphql("Bad credentials".to_string()));
            }
            Ok(self.rules.clone())
        }

        async fn delete_protection_rule(
            &self,
            input: &DeleteProtectionRuleInput,
        ) -> std::result::Result<Option<String>, RemoteError> {
            self.calls.lock().unwrap().push(Call::Delete(input.clone()));
            Ok(None)
        }
    }

    fn rule(id: &str, pattern: &str) -> ProtectionRule {
        ProtectionRule {
            id: id.to_string(),
            pattern: pattern.to_string(),
        }
    }

    fn target() -> RepositoryRef {
        RepositoryRef::new("owner", "repo", "feature/foo")
    }

    fn gateway(api: FakeApi) -> ProtectionRuleGateway<FakeApi> {
        ProtectionRuleGateway::new(api, ProtectionConfig::default(), 100, EmptyResponseSeverity::Warn)
    }

    #[test]
    fn test_find_rule_is_exact() {
        let rules = vec![
            rule("BPR_1", "main"),
            rule("BPR_2", "feature/foo"),
            rule("BPR_3", "release/1.0"),
        ];
        assert_eq!(find_rule(&rules, "feature/foo").unwrap().id, "BPR_2");
        assert!(find_rule(&rules, "feature/Foo").is_none());
        assert!(find_rule(&rules, "feature").is_none());
        assert!(find_rule(&[rule("BPR_4", "feature/*")], "feature/foo").is_none());
    }

    #[tokio::test]
    async fn test_create_issues_single_update() {
        let config = ProtectionConfig {
            required_approving_review_count: 2,
            required_status_checks: vec!["build".to_string()],
            ..Default::default()
        };
        let gateway = ProtectionRuleGateway::new(FakeApi::new(), config.clone(), 100, EmptyResponseSeverity::Warn);

        gateway.create_rule(&target()).await.unwrap();

        assert_eq!(
            gateway.api.calls(),
            vec![Call::Update(target(), UpdateBranchProtection::from(&config))]
        );
    }

    #[tokio::test]
    async fn test_create_without_teams_sends_no_restrictions() {
        let inputs = crate::config::ProtectionInputs {
            restriction_users: Some("octocat".to_string()),
            restriction_apps: Some("deploy-bot".to_string()),
            ..Default::default()
        };
        let config = ProtectionConfig::from_inputs(&inputs).unwrap();
        let gateway = ProtectionRuleGateway::new(FakeApi::new(), config, 100, EmptyResponseSeverity::Warn);

        gateway.create_rule(&target()).await.unwrap();

        let Call::Update(_, request) = &gateway.api.calls()[0] else {
            panic!("expected an update call");
        };
        assert_eq!(request.restrictions, None);
        assert!(serde_json::to_value(request).unwrap()["restrictions"].is_null());
    }

    #[tokio::test]
    async fn test_create_with_restrictions() {
        let config = ProtectionConfig {
            restrictions: Some(PushRestrictions {
                users: vec!["octocat".to_string()],
                teams: vec!["core".to_string()],
                apps: vec!["deploy-bot".to_string()],
            }),
            ..Default::default()
        };
        let gateway = ProtectionRuleGateway::new(FakeApi::new(), config, 100, EmptyResponseSeverity::Warn);

        gateway.create_rule(&target()).await.unwrap();

        let Call::Update(_, request) = &gateway.api.calls()[0] else {
            panic!("expected an update call");
        };
        let restrictions = request.restrictions.as_ref().unwrap();
        assert_eq!(restrictions.users, vec!["octocat"]);
        assert_eq!(restrictions.teams, vec!["core"]);
        assert_eq!(restrictions.apps, vec!["deploy-bot"]);
    }

    #[tokio::test]
    async fn test_empty_create_response_warns_by_default() {
        let mut api = FakeApi::new();
        api.update_response = serde_json::Value::Null;

        assert!(gateway(api).create_rule(&target()).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_create_response_can_fail() {
        let mut api = FakeApi::new();
        api.update_response = serde_json::json!({});
        let gateway = ProtectionRuleGateway::new(api, ProtectionConfig::default(), 100, EmptyResponseSeverity::Fail);

        let err = gateway.create_rule(&target()).await.unwrap_err();
        assert!(matches!(err, Error::EmptyProtectionResponse(ref t) if t == "owner/repo@feature/foo"));
    }

    #[tokio::test]
    async fn test_delete_selects_matching_rule() {
        let gateway = gateway(FakeApi::new());

        gateway.delete_rule(&target()).await.unwrap();

        let calls = gateway.api.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], Call::List(Repository::new("owner", "repo"), 100));
        let deletes = gateway.api.deletes();
        assert_eq!(deletes.len(), 1);
        assert_eq!(deletes[0].branch_protection_rule_id, "BPR_2");
    }

    #[tokio::test]
    async fn test_delete_uses_rules_limit() {
        let gateway = ProtectionRuleGateway::new(FakeApi::new(), ProtectionConfig::default(), 10, EmptyResponseSeverity::Warn);

        gateway.delete_rule(&target()).await.unwrap();

        assert_eq!(gateway.api.calls()[0], Call::List(Repository::new("owner", "repo"), 10));
    }

    #[tokio::test]
    async fn test_delete_missing_rule_is_noop() {
        let mut api = FakeApi::new();
        api.rules = Some(vec![rule("BPR_1", "main"), rule("BPR_3", "release/1.0")]);
        let gateway = gateway(api);

        gateway.delete_rule(&target()).await.unwrap();

        assert_eq!(gateway.api.calls().len(), 1);
        assert!(gateway.api.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_delete_with_empty_listing_is_noop() {
        let mut api = FakeApi::new();
        api.rules = None;
        let gateway = gateway(api);

        gateway.delete_rule(&target()).await.unwrap();

        assert!(gateway.api.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_delete_listing_error_propagates() {
        let mut api = FakeApi::new();
        api.fail_listing = true;
        let gateway = gateway(api);

        let err = gateway.delete_rule(&target()).await.unwrap_err();
        assert!(matches!(err, Error::Remote(RemoteError::Graphql(_))));
        assert!(gateway.api.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_delete_tokens_are_never_reused() {
        let gateway = gateway(FakeApi::new());

        gateway.delete_rule(&target()).await.unwrap();
        gateway.delete_rule(&target()).await.unwrap();

        let deletes = gateway.api.deletes();
        assert_eq!(deletes.len(), 2);
        assert_eq!(deletes[0].branch_protection_rule_id, deletes[1].branch_protection_rule_id);
        assert_ne!(deletes[0].client_mutation_id, deletes[1].client_mutation_id);
    }
}
