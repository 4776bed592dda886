use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, Debug)]
pub struct ProtectionRulesData {
    pub repository: Option<Repository>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub branch_protection_rules: RuleConnection,
}

#[derive(Deserialize, Debug)]
pub struct RuleConnection {
    pub edges: Vec<RuleEdge>,
}

#[derive(Deserialize, Debug)]
pub struct RuleEdge {
    pub node: ProtectionRule,
}

/// A branch protection rule as listed by GitHub.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProtectionRule {
    /// Opaque node id, the only handle the delete mutation accepts.
    pub id: String,
    pub pattern: String,
}

impl ProtectionRulesData {
    /// Flattens the connection, `None` when the repository was not resolved.
    pub fn into_rules(self) -> Option<Vec<ProtectionRule>> {
        self.repository.map(|repository| {
            repository
                .branch_protection_rules
                .edges
                .into_iter()
                .map(|edge| edge.node)
                .collect()
        })
    }
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRuleData {
    pub delete_branch_protection_rule: Option<DeleteRulePayload>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRulePayload {
    pub client_mutation_id: Option<String>,
}

/// Input of the `deleteBranchProtectionRule` mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProtectionRuleInput {
    pub branch_protection_rule_id: String,
    pub client_mutation_id: String,
}

impl DeleteProtectionRuleInput {
    /// Builds the input with a fresh idempotency token.
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            branch_protection_rule_id: rule_id.into(),
            client_mutation_id: Uuid::new_v4().to_string(),
        }
    }
}
