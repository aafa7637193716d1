/// Intent classification over an ordered rule set.

use tracing::trace;

use crate::core::rules::{tokenize, PatternRuleSet};
use crate::schema::intent::Intent;

/// The outcome of classifying one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    /// Index of the winning rule; `None` when the fallback was used.
    pub rule_index: Option<usize>,
    /// The keyword alternative that matched, as written in the rule.
    pub keyword: Option<String>,
}

impl Classification {
    fn fallback() -> Self {
        Classification {
            intent: Intent::Default,
            rule_index: None,
            keyword: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.rule_index.is_none()
    }
}

/// Maps raw text to an intent. The first matching rule wins; no later rule
/// is tested once one matches.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: PatternRuleSet,
}

impl IntentClassifier {
    pub fn new(rules: PatternRuleSet) -> Self {
        IntentClassifier { rules }
    }

    pub fn rules(&self) -> &PatternRuleSet {
        &self.rules
    }

    /// Classify `text`, falling back to `Intent::Default`.
    pub fn classify(&self, text: &str) -> Intent {
        self.classify_detailed(text).intent
    }

    /// Classify `text` and report which rule and keyword decided it.
    pub fn classify_detailed(&self, text: &str) -> Classification {
        let tokens = tokenize(text.trim());
        if tokens.is_empty() {
            return Classification::fallback();
        }

        for (index, rule) in self.rules.rules.iter().enumerate() {
            if let Some(keyword) = rule.matcher.find(&tokens) {
                trace!(rule = index, intent = %rule.intent, keyword = %keyword.text, "rule matched");
                return Classification {
                    intent: rule.intent,
                    rule_index: Some(index),
                    keyword: Some(keyword.text.clone()),
                };
            }
        }

        trace!(tokens = tokens.len(), "no rule matched, using default");
        Classification::fallback()
    }
}
