//! The builtin persona: default rules and replies compiled into the crate.

use crate::core::pool::{PoolError, ResponsePool};
use crate::core::rules::{PatternRuleSet, RulesError};

mod data {
    pub const RULES: &str = include_str!("../data/default/rules.ron");
    pub const RESPONSES: &str = include_str!("../data/default/responses.ron");
}

/// The default rule set, in evaluation order.
pub fn rules() -> Result<PatternRuleSet, RulesError> {
    PatternRuleSet::parse_ron(data::RULES)
}

/// The default response pools.
pub fn responses() -> Result<ResponsePool, PoolError> {
    ResponsePool::parse_ron(data::RESPONSES)
}
