//! Round outcome hand-off
//!
//! The core's responsibility ends at a single `round_over(won)` call; the
//! handler owns everything after that (result page, restart wiring). The
//! result-URL payload is modeled here as an injected value, never a global,
//! so rounds are testable without any network.

use serde::{Deserialize, Serialize};

/// Receives the final verdict of a round, exactly once per round.
pub trait OutcomeHandler {
    fn round_over(&mut self, won: bool);
}

/// Result page URLs, fetched once at process start by the host from an
/// endpoint returning `{"winner": <url>, "loser": <url>}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultUrls {
    pub winner: Option<String>,
    pub loser: Option<String>,
}

impl ResultUrls {
    /// Parse the payload tolerantly: a malformed document, missing key, or
    /// non-string value just leaves that URL unset. Fetch failure and parse
    /// failure look identical to the presentation layer.
    pub fn from_json(payload: &str) -> Self {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(payload) else {
            log::warn!("result URL payload did not parse");
            return Self::default();
        };
        let field = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_owned);
        Self {
            winner: field("winner"),
            loser: field("loser"),
        }
    }

    pub fn url_for(&self, won: bool) -> Option<&str> {
        let url = if won { &self.winner } else { &self.loser };
        url.as_deref()
    }
}

/// Handler that only records the verdict; useful for tests and the demo
#[derive(Debug, Default)]
pub struct RecordingHandler {
    pub verdicts: Vec<bool>,
}

impl OutcomeHandler for RecordingHandler {
    fn round_over(&mut self, won: bool) {
        self.verdicts.push(won);
    }
}
