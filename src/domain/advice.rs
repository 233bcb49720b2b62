//! Prompt assembly and the actionable-advice predicate.

use crate::domain::snapshot::IndicatorSnapshot;
use crate::ports::news_port::Headline;

pub const TRADE_HORIZON_HOURS: u32 = 4;
pub const DEFAULT_ACTION_KEYWORDS: [&str; 4] = ["BUY", "SELL", "LONG", "SHORT"];
pub const DEFAULT_CONFIDENCE_MARKERS: [&str; 1] = ["CONFIDENCE: HIGH"];
const DECISION_LABEL: &str = "DECISION:";

pub struct PromptContext<'a> {
    pub ticker: &'a str,
    pub company_name: &'a str,
    pub snapshot: &'a IndicatorSnapshot,
    pub headlines: &'a [Headline],
}

pub fn build_prompt(ctx: &PromptContext<'_>) -> String {
    let news = if ctx.headlines.is_empty() {
        "No recent headlines were found; rely on the technicals.".to_string()
    } else {
        ctx.headlines
            .iter()
            .map(|h| {
                if h.description.is_empty() {
                    format!("- {}", h.title)
                } else {
                    format!("- {} - {}", h.title, h.description)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are a senior equity trader reviewing {ticker} ({company}) for a trade \
         held about {horizon} hours.\n\
         \n\
         Technical snapshot (hourly bars):\n\
         {snapshot}\n\
         \n\
         Latest news:\n\
         {news}\n\
         \n\
         Weigh the technicals and the news together. Reply in exactly this format:\n\
         DECISION: <LONG|SHORT|HOLD>\n\
         CONFIDENCE: <HIGH|MEDIUM|LOW>\n\
         REASON: <one sentence>\n",
        ticker = ctx.ticker,
        company = ctx.company_name,
        horizon = TRADE_HORIZON_HOURS,
        snapshot = ctx.snapshot,
        news = news,
    )
}

/// Decides whether advice text is worth a notification.
///
/// Text is actionable when it carries one of the action keywords and, if any
/// confidence markers are configured, one of those markers as well.
///
/// Keywords match as whole words, case-insensitively. When the reply has a
/// `DECISION:` line only that line is searched, so a HOLD whose reason
/// mentions "short-term" or "buyers" stays quiet. Confidence markers are
/// plain case-insensitive substrings of the whole reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPolicy {
    pub action_keywords: Vec<String>,
    pub confidence_markers: Vec<String>,
}

impl Default for ActionPolicy {
    fn default() -> Self {
        Self {
            action_keywords: DEFAULT_ACTION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            confidence_markers: DEFAULT_CONFIDENCE_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ActionPolicy {
    pub fn is_actionable(&self, advice: &str) -> bool {
        let text = advice.to_uppercase();
        let scope = text
            .lines()
            .map(str::trim_start)
            .find(|line| line.starts_with(DECISION_LABEL))
            .unwrap_or(text.as_str());

        let has_action = self
            .action_keywords
            .iter()
            .any(|k| contains_word(scope, &k.to_uppercase()));
        let confident = self.confidence_markers.is_empty()
            || self
                .confidence_markers
                .iter()
                .any(|m| text.contains(&m.to_uppercase()));
        has_action && confident
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// `word` occurs in `haystack` with no word character on either side.
fn contains_word(haystack: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    haystack.match_indices(word).any(|(at, _)| {
        let before = haystack[..at].chars().next_back();
        let after = haystack[at + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}
