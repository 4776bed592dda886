use serde_json::{Value, json};

use crate::{github::types::protection::DeleteProtectionRuleInput, repository::Repository};

const PROTECTION_RULES_QUERY: &str = include_str!("graphql/protection_rules.graphql");
const DELETE_PROTECTION_RULE_MUTATION: &str = include_str!("graphql/delete_protection_rule.graphql");

/// Query listing the first `first` protection rules of `repository`.
pub fn protection_rules_query(repository: &Repository, first: u32) -> Value {
    json!({
        "query": PROTECTION_RULES_QUERY,
        "variables": {
            "owner": repository.owner(),
            "name": repository.name(),
            "first": first,
        }
    })
}

pub fn delete_protection_rule_mutation(input: &DeleteProtectionRuleInput) -> Value {
    json!({
        "query": DELETE_PROTECTION_RULE_MUTATION,
        "variables": { "input": input }
    })
}
