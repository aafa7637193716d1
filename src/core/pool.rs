/// Response pools — canned replies per intent, loaded from RON.

use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

use crate::schema::intent::{Intent, UnknownIntent};

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("response pool for '{0}' is empty")]
    EmptyPool(Intent),
    #[error("response pool for '{intent}' has a blank reply at position {position}")]
    BlankReply { intent: Intent, position: usize },
    #[error("more than one response pool is keyed to '{0}'")]
    DuplicateIntent(Intent),
    #[error("the {0} message is blank")]
    BlankMessage(&'static str),
    #[error(transparent)]
    UnknownIntent(#[from] UnknownIntent),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Replies per intent, plus the two messages a session emits without
/// consulting any pool.
///
/// Immutable once built. Iteration follows `Intent` declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePool {
    empty_input: String,
    interrupted: String,
    pools: BTreeMap<Intent, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RonResponses {
    empty_input: String,
    interrupted: String,
    pools: HashMap<String, Vec<String>>,
}

impl ResponsePool {
    /// Build a pool, rejecting empty sequences and blank replies.
    pub fn new<S: Into<String>>(
        empty_input: S,
        interrupted: S,
        pools: BTreeMap<Intent, Vec<String>>,
    ) -> Result<ResponsePool, PoolError> {
        let empty_input = empty_input.into();
        let interrupted = interrupted.into();
        if empty_input.trim().is_empty() {
            return Err(PoolError::BlankMessage("empty-input prompt"));
        }
        if interrupted.trim().is_empty() {
            return Err(PoolError::BlankMessage("interruption farewell"));
        }

        for (intent, replies) in &pools {
            if replies.is_empty() {
                return Err(PoolError::EmptyPool(*intent));
            }
            if let Some(position) = replies.iter().position(|r| r.trim().is_empty()) {
                return Err(PoolError::BlankReply {
                    intent: *intent,
                    position,
                });
            }
        }

        Ok(ResponsePool {
            empty_input,
            interrupted,
            pools,
        })
    }

    /// Load a response pool from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<ResponsePool, PoolError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a response pool from a RON string.
    pub fn parse_ron(input: &str) -> Result<ResponsePool, PoolError> {
        let raw: RonResponses = ron::from_str(input)?;
        let mut pools = BTreeMap::new();
        for (name, replies) in raw.pools {
            let intent: Intent = name.parse()?;
            if pools.insert(intent, replies).is_some() {
                return Err(PoolError::DuplicateIntent(intent));
            }
        }
        Self::new(raw.empty_input, raw.interrupted, pools)
    }

    /// Replies for `intent`, if any are configured.
    pub fn get(&self, intent: Intent) -> Option<&[String]> {
        self.pools.get(&intent).map(Vec::as_slice)
    }

    pub fn contains(&self, intent: Intent) -> bool {
        self.pools.contains_key(&intent)
    }

    /// The prompt for a turn with no text.
    pub fn empty_input(&self) -> &str {
        &self.empty_input
    }

    /// The farewell for a host interruption.
    pub fn interrupted(&self) -> &str {
        &self.interrupted
    }

    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.pools.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Intent, &[String])> + '_ {
        self.pools.iter().map(|(intent, replies)| (*intent, replies.as_slice()))
    }

    /// Replies that appear more than once within the same pool.
    pub fn duplicate_replies(&self) -> Vec<(Intent, String)> {
        let mut duplicates = Vec::new();
        for (intent, replies) in self.iter() {
            let mut seen = FxHashSet::default();
            for reply in replies {
                if !seen.insert(reply.as_str()) {
                    duplicates.push((intent, reply.clone()));
                }
            }
        }
        duplicates
    }
}
