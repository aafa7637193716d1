//! Rulechat — a rule-based conversational engine.
//!
//! Classifies free text into a fixed set of intents with ordered,
//! whole-word keyword rules, answers from per-intent reply pools, and
//! tracks whether the conversation is still going.

pub mod builtin;
pub mod core;
pub mod host;
pub mod schema;
