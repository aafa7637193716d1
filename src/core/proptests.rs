//! Property-based tests for classification, selection and turn handling.

use super::classifier::IntentClassifier;
use super::session::{ConversationSession, SessionStatus, Turn};
use crate::builtin;
use crate::schema::intent::Intent;
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

fn arb_intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        Just(Intent::Greeting),
        Just(Intent::HowAreYou),
        Just(Intent::Name),
        Just(Intent::Weather),
        Just(Intent::Goodbye),
        Just(Intent::Default),
    ]
}

fn arb_filler() -> impl Strategy<Value = String> {
    // Words that no builtin rule uses.
    prop::collection::vec(
        prop_oneof![
            Just("the"),
            Just("shipment"),
            Just("arrived"),
            Just("blue"),
            Just("seven"),
            Just("whistle"),
        ],
        0..6,
    )
    .prop_map(|words| words.join(" "))
}

fn arb_whitespace() -> impl Strategy<Value = String> {
    "[ \t\r\n]{0,8}"
}

fn session(seed: u64) -> ConversationSession {
    ConversationSession::builder().seed(seed).build().unwrap()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn classify_is_idempotent(text in ".{0,80}") {
        let classifier = IntentClassifier::new(builtin::rules().unwrap());
        prop_assert_eq!(classifier.classify(&text), classifier.classify(&text));
    }

    #[test]
    fn greeting_keyword_with_filler_is_greeting(
        before in arb_filler(),
        keyword in prop_oneof![Just("hi"), Just("hello"), Just("hey"), Just("greetings")],
        after in arb_filler(),
        shout in any::<bool>(),
    ) {
        let mut text = format!("{} {}, {}", before, keyword, after);
        if shout {
            text = text.to_uppercase();
        }
        let classifier = IntentClassifier::new(builtin::rules().unwrap());
        prop_assert_eq!(classifier.classify(&text), Intent::Greeting);
    }

    #[test]
    fn filler_alone_is_default(text in arb_filler()) {
        let classifier = IntentClassifier::new(builtin::rules().unwrap());
        prop_assert_eq!(classifier.classify(&text), Intent::Default);
    }

    #[test]
    fn selected_reply_belongs_to_pool(intent in arb_intent(), seed in any::<u64>()) {
        let responses = builtin::responses().unwrap();
        let expected = responses.get(intent).unwrap().to_vec();
        let mut selector = super::selector::ResponseSelector::seeded(responses, seed);
        let reply = selector.select(intent).unwrap();
        prop_assert!(!reply.is_empty());
        prop_assert!(expected.iter().any(|r| r == reply));
    }

    #[test]
    fn whitespace_never_terminates(blanks in prop::collection::vec(arb_whitespace(), 1..10), seed in any::<u64>()) {
        let mut session = session(seed);
        for raw in &blanks {
            let outcome = session.process_turn(raw).unwrap();
            prop_assert!(!outcome.terminated);
            prop_assert_eq!(outcome.reply.as_str(), session.responses().empty_input());
        }
        prop_assert_eq!(session.status(), SessionStatus::Active);
    }

    #[test]
    fn exit_phrases_terminate_in_any_case(
        phrase in prop_oneof![Just("exit"), Just("quit"), Just("bye"), Just("goodbye")],
        upper in prop::collection::vec(any::<bool>(), 7),
        pad in arb_whitespace(),
        seed in any::<u64>(),
    ) {
        let cased: String = phrase
            .chars()
            .zip(upper.iter().cycle())
            .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c })
            .collect();
        let raw = format!("{}{}{}", pad, cased, pad);

        let mut session = session(seed);
        let outcome = session.process_turn(&raw).unwrap();
        prop_assert!(outcome.terminated);
        let goodbyes = session.responses().get(Intent::Goodbye).unwrap();
        prop_assert!(goodbyes.contains(&outcome.reply));
    }

    #[test]
    fn terminated_is_absorbing(
        texts in prop::collection::vec(".{0,30}", 0..8),
        seed in any::<u64>(),
    ) {
        let mut session = session(seed);
        for text in &texts {
            if !session.is_active() {
                break;
            }
            session.process_turn(text).unwrap();
        }
        if session.is_active() {
            prop_assert!(session.process(Turn::Interrupted).unwrap().terminated);
        }
        prop_assert!(session.process_turn("hello").is_err());
        prop_assert_eq!(session.status(), SessionStatus::Terminated);
    }
}
