use crate::negotiation::{BuyerReply, DealScore, NegotiationState, Outcome, ScoreBreakdown};
use crate::persona::BuyerProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    /// Rule-based replies; the only mode required to be deterministic
    /// turn-by-turn.
    Strict,
    /// Rule-based state with LLM-worded replies.
    Flavor,
    /// Fully LLM-worded replies; state transitions stay rule-based.
    Freeplay,
}

/// One conversational turn: the seller message, the buyer's reply, and a
/// snapshot of the state after the turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn_index: u32,
    pub seller: String,
    pub buyer: BuyerReply,
    pub state: NegotiationState,
}

/// The finalized run, handed as an opaque serializable record to the
/// external persistence collaborator. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub seed: u64,
    pub pack_version: String,
    pub pack_hash: String,
    pub run_key: String,
    pub mode: Mode,
    pub profile: BuyerProfile,
    pub profile_hash: String,
    pub transcript: Vec<TurnRecord>,
    pub outcome: Outcome,
    pub deal: Option<DealScore>,
    pub score: ScoreBreakdown,
    pub created_at: DateTime<Utc>,
}

/// Replay identity of a run. Equal seed, pack hash, and mode yield the
/// same key.
pub fn run_key(seed: u64, pack_hash: &str, mode: Mode) -> String {
    let canonical = format!("seed={seed};pack={pack_hash};mode={mode}");
    let digest = Sha256::digest(canonical.as_bytes());
    let mut key = hex::encode(digest);
    key.truncate(16);
    key
}
