/// The conversation session: turn processing, termination, and startup
/// validation. Built via `ConversationSession::builder()`.

use rustc_hash::FxHashSet;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::builtin;
use crate::core::classifier::IntentClassifier;
use crate::core::pool::{PoolError, ResponsePool};
use crate::core::rules::{PatternRuleSet, RulesError};
use crate::core::selector::{ResponseSelector, SelectError};
use crate::schema::intent::Intent;

/// Whole-message commands that end the conversation.
pub const DEFAULT_EXIT_PHRASES: [&str; 4] = ["exit", "quit", "bye", "goodbye"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rules target '{0}' but no response pool is configured for it")]
    MissingPool(Intent),
    #[error("no response pool is configured for the default intent")]
    MissingDefaultPool,
    #[error("'{0}' has a response pool but no rule targets it")]
    UnreachableIntent(Intent),
    #[error("exit phrase '{0}' is blank")]
    BlankExitPhrase(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("rules error: {0}")]
    Rules(#[from] RulesError),
    #[error("response pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("selection error: {0}")]
    Select(#[from] SelectError),
    #[error("the session has already terminated")]
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Terminated,
}

/// One unit of host input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Text(String),
    /// The host saw end-of-input or an external interruption.
    Interrupted,
}

/// What a turn produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub reply: String,
    pub terminated: bool,
}

/// Check that every intent the session can reach has replies.
///
/// With `strict`, also require that every non-default pool is the target
/// of at least one rule.
pub fn validate(
    rules: &PatternRuleSet,
    pool: &ResponsePool,
    exit_phrases_enabled: bool,
    strict: bool,
) -> Result<(), ConfigError> {
    if !pool.contains(Intent::Default) {
        return Err(ConfigError::MissingDefaultPool);
    }

    let targets = rules.targets();
    for intent in Intent::ALL {
        if targets.contains(&intent) && !pool.contains(intent) {
            return Err(ConfigError::MissingPool(intent));
        }
    }
    if exit_phrases_enabled && !pool.contains(Intent::Goodbye) {
        return Err(ConfigError::MissingPool(Intent::Goodbye));
    }

    if strict {
        if let Some(intent) = pool
            .intents()
            .find(|intent| !intent.is_default() && !targets.contains(intent))
        {
            return Err(ConfigError::UnreachableIntent(intent));
        }
    }

    Ok(())
}

/// A single conversation. Single-owner: every turn takes `&mut self`.
///
/// Once terminated, further turns fail with `SessionError::Terminated`.
#[derive(Debug)]
pub struct ConversationSession {
    classifier: IntentClassifier,
    selector: ResponseSelector,
    exit_phrases: FxHashSet<String>,
    status: SessionStatus,
    turns: u64,
}

/// Builder for constructing a `ConversationSession`.
pub struct ConversationSessionBuilder {
    rules_path: Option<PathBuf>,
    responses_path: Option<PathBuf>,
    seed: Option<u64>,
    exit_phrases: Vec<String>,
    strict_reachability: bool,
    /// Directly provided rules (for testing without files).
    rules: Option<PatternRuleSet>,
    /// Directly provided responses (for testing without files).
    responses: Option<ResponsePool>,
}

impl ConversationSession {
    pub fn builder() -> ConversationSessionBuilder {
        ConversationSessionBuilder {
            rules_path: None,
            responses_path: None,
            seed: None,
            exit_phrases: DEFAULT_EXIT_PHRASES.iter().map(|s| s.to_string()).collect(),
            strict_reachability: false,
            rules: None,
            responses: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Number of turns processed, including the terminating one.
    pub fn turns(&self) -> u64 {
        self.turns
    }

    /// True when `text`, trimmed and lowercased, is a whole-message exit
    /// command.
    pub fn is_exit_phrase(&self, text: &str) -> bool {
        self.exit_phrases.contains(&text.trim().to_lowercase())
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn responses(&self) -> &ResponsePool {
        self.selector.pool()
    }

    /// Process one line of user text.
    pub fn process_turn(&mut self, raw: &str) -> Result<TurnOutcome, SessionError> {
        self.process(Turn::Text(raw.to_string()))
    }

    /// Process one host turn, text or interruption.
    pub fn process(&mut self, turn: Turn) -> Result<TurnOutcome, SessionError> {
        if self.status == SessionStatus::Terminated {
            return Err(SessionError::Terminated);
        }
        self.turns += 1;

        let text = match turn {
            Turn::Interrupted => {
                warn!(turn = self.turns, "conversation interrupted by host");
                let reply = self.selector.pool().interrupted().to_string();
                return Ok(self.terminate(reply));
            }
            Turn::Text(text) => text,
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!(turn = self.turns, "empty input");
            return Ok(TurnOutcome {
                reply: self.selector.pool().empty_input().to_string(),
                terminated: false,
            });
        }

        let normalized = trimmed.to_lowercase();
        if self.exit_phrases.contains(&normalized) {
            debug!(turn = self.turns, phrase = %normalized, "exit phrase");
            let reply = self.selector.select(Intent::Goodbye)?.to_string();
            return Ok(self.terminate(reply));
        }

        let intent = self.classifier.classify(&normalized);
        debug!(turn = self.turns, %intent, "classified");
        let reply = self.selector.select(intent)?.to_string();
        if intent == Intent::Goodbye {
            return Ok(self.terminate(reply));
        }

        Ok(TurnOutcome {
            reply,
            terminated: false,
        })
    }

    fn terminate(&mut self, reply: String) -> TurnOutcome {
        self.status = SessionStatus::Terminated;
        info!(turns = self.turns, "conversation terminated");
        TurnOutcome {
            reply,
            terminated: true,
        }
    }
}

impl ConversationSessionBuilder {
    pub fn rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules_path = Some(path.into());
        self
    }

    pub fn responses_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.responses_path = Some(path.into());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the whole-message exit commands. An empty list disables
    /// them; goodbye-intent matches still end the conversation.
    pub fn exit_phrases<S: AsRef<str>>(mut self, phrases: &[S]) -> Self {
        self.exit_phrases = phrases.iter().map(|p| p.as_ref().to_string()).collect();
        self
    }

    /// Reject pools for intents that no rule can reach.
    pub fn strict_reachability(mut self, strict: bool) -> Self {
        self.strict_reachability = strict;
        self
    }

    /// Provide rules directly (for testing without files).
    pub fn with_rules(mut self, rules: PatternRuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Provide responses directly (for testing without files).
    pub fn with_responses(mut self, responses: ResponsePool) -> Self {
        self.responses = Some(responses);
        self
    }

    pub fn build(self) -> Result<ConversationSession, SessionError> {
        let rules = match (self.rules, &self.rules_path) {
            (Some(rules), _) => rules,
            (None, Some(path)) => PatternRuleSet::load_from_ron(path)?,
            (None, None) => builtin::rules()?,
        };
        let responses = match (self.responses, &self.responses_path) {
            (Some(responses), _) => responses,
            (None, Some(path)) => ResponsePool::load_from_ron(path)?,
            (None, None) => builtin::responses()?,
        };

        let mut exit_phrases = FxHashSet::default();
        for phrase in &self.exit_phrases {
            let normalized = phrase.trim().to_lowercase();
            if normalized.is_empty() {
                return Err(ConfigError::BlankExitPhrase(phrase.clone()).into());
            }
            exit_phrases.insert(normalized);
        }

        validate(
            &rules,
            &responses,
            !exit_phrases.is_empty(),
            self.strict_reachability,
        )?;

        info!(
            rules = rules.len(),
            pools = responses.intents().count(),
            seeded = self.seed.is_some(),
            "conversation session ready"
        );

        let selector = match self.seed {
            Some(seed) => ResponseSelector::seeded(responses, seed),
            None => ResponseSelector::from_entropy(responses),
        };

        Ok(ConversationSession {
            classifier: IntentClassifier::new(rules),
            selector,
            exit_phrases,
            status: SessionStatus::Active,
            turns: 0,
        })
    }
}
