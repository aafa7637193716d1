use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of conversational intents.
///
/// `Default` is the classifier's fallback: it is reached only when no
/// pattern rule matches, and it is never the target of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    HowAreYou,
    Name,
    Weather,
    Goodbye,
    Default,
}

impl Intent {
    /// Every intent, in declaration order.
    pub const ALL: [Intent; 6] = [
        Intent::Greeting,
        Intent::HowAreYou,
        Intent::Name,
        Intent::Weather,
        Intent::Goodbye,
        Intent::Default,
    ];

    /// The snake_case label used in RON files and log output.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::HowAreYou => "how_are_you",
            Intent::Name => "name",
            Intent::Weather => "weather",
            Intent::Goodbye => "goodbye",
            Intent::Default => "default",
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Intent::Default)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown intent: '{0}'")]
pub struct UnknownIntent(pub String);

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Intent::ALL
            .into_iter()
            .find(|intent| intent.name() == wanted)
            .ok_or_else(|| UnknownIntent(s.to_string()))
    }
}
