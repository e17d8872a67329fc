use crate::persona::BuyerProfile;
use serde::{Deserialize, Serialize};

/// Terminal outcomes absorb: once a negotiation leaves `Ongoing` it never
/// transitions again.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Ongoing,
    Deal,
    WalkedAway,
    MaxRoundsReached,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Ongoing
    }
}

/// One-time disclosures. The buyer reveals each constraint at most once,
/// and only when the seller asks about it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealFlags {
    pub budget: bool,
    pub payment: bool,
    pub trade_in: bool,
    pub features: bool,
}

/// Full negotiation state for one run. Mutated only by the engine, one
/// state per run, advanced turn-by-turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationState {
    pub round: u32,
    pub max_rounds: u32,
    pub seller_offer: Option<i64>,
    pub buyer_counter: Option<i64>,
    pub cumulative_concession: i64,
    /// Magnitude of the previous concession; the next one never exceeds it.
    pub last_concession: Option<i64>,
    pub patience_spent: u32,
    /// Unresolved objections, in the profile's stored priority order.
    pub outstanding_objections: Vec<String>,
    pub revealed: RevealFlags,
    pub outcome: Outcome,
}

impl NegotiationState {
    pub fn new(profile: &BuyerProfile, max_rounds: u32) -> Self {
        Self {
            round: 0,
            max_rounds,
            seller_offer: None,
            buyer_counter: None,
            cumulative_concession: 0,
            last_concession: None,
            patience_spent: 0,
            outstanding_objections: profile.must_haves.iter().map(|m| m.id.clone()).collect(),
            revealed: RevealFlags::default(),
            outcome: Outcome::Ongoing,
        }
    }
}

/// Incoming seller turn. `offer` may be given explicitly by the caller;
/// otherwise the engine extracts a price from the text when one is framed
/// as an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerMessage {
    pub text: String,
    #[serde(default)]
    pub offer: Option<i64>,
}

impl SellerMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offer: None,
        }
    }

    pub fn offer(text: impl Into<String>, offer: i64) -> Self {
        Self {
            text: text.into(),
            offer: Some(offer),
        }
    }
}

/// The buyer's side of one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerReply {
    pub text: String,
    pub counter_offer: Option<i64>,
    /// Objection raised this turn, if any (catalog id).
    pub objection: Option<String>,
    pub tags: Vec<String>,
}
