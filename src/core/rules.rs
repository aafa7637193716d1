/// Pattern rules — ordered keyword matchers, tokenization, and RON loading.

use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::schema::intent::{Intent, UnknownIntent};

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("rule {index} ({intent}) has no keywords")]
    NoKeywords { index: usize, intent: Intent },
    #[error("rule {index} ({intent}) has keyword '{keyword}' with no word characters")]
    EmptyKeyword {
        index: usize,
        intent: Intent,
        keyword: String,
    },
    #[error("rule {index} targets the default intent, which is reachable only as a fallback")]
    DefaultAsTarget { index: usize },
    #[error(transparent)]
    UnknownIntent(#[from] UnknownIntent),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Split text into lowercase word tokens.
///
/// A word character is any alphanumeric character or `_`; everything else
/// is a boundary. Keywords and user input go through the same function, so
/// `"what's"` becomes `["what", "s"]` on both sides.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// One keyword alternative: the text as written and its token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub text: String,
    pub tokens: Vec<String>,
}

impl Keyword {
    /// True when the keyword's tokens occur as a contiguous run in `input`.
    pub fn occurs_in(&self, input: &[String]) -> bool {
        if self.tokens.is_empty() {
            return false;
        }
        input
            .windows(self.tokens.len())
            .any(|window| window == self.tokens.as_slice())
    }
}

/// A whole-word alternation over one or more keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    pub keywords: Vec<Keyword>,
}

impl Matcher {
    /// Returns the first keyword alternative found in the token stream.
    pub fn find(&self, input: &[String]) -> Option<&Keyword> {
        self.keywords.iter().find(|keyword| keyword.occurs_in(input))
    }
}

/// A single (matcher, intent) rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    pub matcher: Matcher,
    pub intent: Intent,
}

impl PatternRule {
    /// Build a rule, tokenizing each keyword. `index` is only used for
    /// error reporting.
    pub fn new<S: AsRef<str>>(
        index: usize,
        intent: Intent,
        keywords: &[S],
    ) -> Result<PatternRule, RulesError> {
        if intent.is_default() {
            return Err(RulesError::DefaultAsTarget { index });
        }
        if keywords.is_empty() {
            return Err(RulesError::NoKeywords { index, intent });
        }

        let mut parsed = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let text = keyword.as_ref();
            let tokens = tokenize(text);
            if tokens.is_empty() {
                return Err(RulesError::EmptyKeyword {
                    index,
                    intent,
                    keyword: text.to_string(),
                });
            }
            parsed.push(Keyword {
                text: text.trim().to_string(),
                tokens,
            });
        }

        Ok(PatternRule {
            matcher: Matcher { keywords: parsed },
            intent,
        })
    }
}

/// Ordered rule list. The first rule that matches wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternRuleSet {
    pub rules: Vec<PatternRule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "Rule")]
struct RonRule {
    intent: String,
    keywords: Vec<String>,
}

impl PatternRuleSet {
    /// Build a rule set from `(intent, keywords)` pairs in evaluation order.
    pub fn from_pairs<S: AsRef<str>>(
        pairs: &[(Intent, &[S])],
    ) -> Result<PatternRuleSet, RulesError> {
        let rules = pairs
            .iter()
            .enumerate()
            .map(|(index, (intent, keywords))| PatternRule::new(index, *intent, *keywords))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PatternRuleSet { rules })
    }

    /// Load a rule set from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<PatternRuleSet, RulesError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a rule set from a RON string: a list of `Rule(intent, keywords)`.
    pub fn parse_ron(input: &str) -> Result<PatternRuleSet, RulesError> {
        let raw: Vec<RonRule> = ron::from_str(input)?;
        let mut rules = Vec::with_capacity(raw.len());
        for (index, ron_rule) in raw.into_iter().enumerate() {
            let intent: Intent = ron_rule.intent.parse()?;
            rules.push(PatternRule::new(index, intent, &ron_rule.keywords)?);
        }
        Ok(PatternRuleSet { rules })
    }

    /// Intents targeted by at least one rule.
    pub fn targets(&self) -> FxHashSet<Intent> {
        self.rules.iter().map(|rule| rule.intent).collect()
    }

    /// Keywords that can never win because an earlier rule carries the
    /// same token sequence. Returned as `(rule index, keyword text)`.
    pub fn shadowed_keywords(&self) -> Vec<(usize, String)> {
        let mut seen: FxHashSet<&[String]> = FxHashSet::default();
        let mut shadowed = Vec::new();
        for (index, rule) in self.rules.iter().enumerate() {
            let mut local: Vec<&[String]> = Vec::new();
            for keyword in &rule.matcher.keywords {
                if seen.contains(keyword.tokens.as_slice()) {
                    shadowed.push((index, keyword.text.clone()));
                }
                local.push(keyword.tokens.as_slice());
            }
            seen.extend(local);
        }
        shadowed
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
