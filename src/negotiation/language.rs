//! Keyword scanning and reply-line composition for the rule-based buyer.
//!
//! Everything here is a pure function of the input text and profile; the
//! wording is deliberately plain so transcripts read naturally without a
//! language model.

use crate::persona::BuyerProfile;
use regex::Regex;
use std::sync::LazyLock;

/// Reply substituted verbatim when the seller's message trips the guardrail.
pub const SAFE_REDIRECT: &str = "I want to keep this professional. Let's focus on the car, \
     the numbers, and a fair deal. What can you do on the out-the-door price?";

static MONEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?\s*([0-9]{2,6})").expect("money regex is valid"));

/// All plausible dollar figures in a seller turn, in order of appearance.
pub fn extract_money(text: &str) -> Vec<i64> {
    let normalized = text.replace(',', "");
    MONEY_RE
        .captures_iter(&normalized)
        .filter_map(|c| c.get(1)?.as_str().parse::<i64>().ok())
        .collect()
}

fn has_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Topic tags for a seller turn. Drives reveals and scoring.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let keys: [(&str, &[&str]); 7] = [
        ("budget", &["budget", "out the door", "otd", "price"]),
        ("payment", &["monthly", "payment", "per month", "/month"]),
        ("trade_in", &["trade", "trade-in", "trade in"]),
        ("timeline", &["today", "this week", "urgent", "timeline"]),
        (
            "features",
            &["feature", "must-have", "awd", "4wd", "third row", "carplay", "mpg", "safety", "tow"],
        ),
        ("trust", &["fee", "fees", "transparent", "breakdown", "no pressure"]),
        ("offer", &["offer", "can do", "how about", "we're at"]),
    ];

    keys.iter()
        .filter(|(_, words)| has_any(&lowered, words))
        .map(|(tag, _)| (*tag).to_string())
        .collect()
}

/// Content the simulated buyer refuses to engage with.
pub fn detect_disallowed(text: &str) -> bool {
    let lowered = text.to_lowercase();
    has_any(
        &lowered,
        &[
            "race",
            "religion",
            "ethnicity",
            "sexual",
            "fake paystub",
            "forge",
            "fraud",
            "lie on the credit",
            "illegal",
        ],
    )
}

pub fn contains_pressure(text: &str) -> bool {
    let lowered = text.to_lowercase();
    has_any(
        &lowered,
        &["today only", "sign now", "right now", "last chance"],
    )
}

/// A turn carries a price offer when it has a dollar figure in an
/// offer/price context (explicit offers bypass this).
pub fn parse_offer(text: &str) -> Option<i64> {
    let lowered = text.to_lowercase();
    let priced_context = has_any(
        &lowered,
        &["out the door", "otd", "price", "offer", "can do", "how about"],
    );
    if !priced_context {
        return None;
    }
    extract_money(text).into_iter().find(|v| *v >= 1_000)
}

/// Monthly-payment figure, when the turn talks in per-month terms.
pub fn parse_monthly(text: &str) -> Option<i64> {
    let lowered = text.to_lowercase();
    if !has_any(&lowered, &["month", "monthly", "payment"]) {
        return None;
    }
    extract_money(text).into_iter().find(|v| (50..1_000_i64).contains(v))
}

/// Style-colored base line, keyed off the profile's traits rather than any
/// pack-specific id so it works for every pack.
pub fn base_line(profile: &BuyerProfile) -> &'static str {
    if profile.traits.trust < 0.35 {
        "I need everything broken down. I don't want surprises in the fees."
    } else if profile.traits.price_sensitivity > 0.65 {
        "I care most about the total out-the-door price."
    } else {
        "I'm comparing options and I don't want to overpay."
    }
}

/// Trust- and patience-keyed opener, emitted as transcript turn 0.
pub fn opening_line(profile: &BuyerProfile) -> String {
    let opener = if profile.traits.trust < 0.35 {
        "Hey. Before we start, I just want this to be straightforward. \
         I've had some rough dealer experiences."
    } else if profile.traits.trust > 0.7 {
        "Hey. Thanks for your time. I can tell you what I'm looking for \
         and you can tell me what's realistic."
    } else {
        "Hey. I'm shopping around and trying to see what fits."
    };

    let urgency = if profile.traits.patience < 1.0 {
        "I do need to move fairly soon."
    } else {
        "I'm not rushing, but I'm serious if it makes sense."
    };

    format!("{opener} {urgency}")
}
