use super::record::{Mode, RunRecord, TurnRecord, run_key};
use crate::error::Result;
use crate::negotiation::{
    self, NegotiationState, Outcome, SellerMessage, deal_score, score_session,
};
use crate::pack::DataPack;
use crate::persona::{self, BuyerProfile, profile_hash};
use crate::reply::ReplyGenerator;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

/// Drives one run end to end: profile generation, the opening turn, per-turn
/// stepping, and finalization into a `RunRecord`.
///
/// The runner owns the only mutable state of a run. Cancellation is simply
/// dropping it without calling `finalize`.
pub struct Runner {
    run_id: String,
    seed: u64,
    mode: Mode,
    pack_version: String,
    pack_hash: String,
    run_key: String,
    profile: BuyerProfile,
    profile_hash: String,
    state: NegotiationState,
    transcript: Vec<TurnRecord>,
    created_at: DateTime<Utc>,
}

impl Runner {
    /// Start a run. The pack must already be validated (loading validates);
    /// seed and pack fully determine the profile and the hash shown to the
    /// user.
    pub fn start(seed: u64, pack: &DataPack, mode: Mode) -> Result<Self> {
        let profile = persona::generate(seed, pack)?;
        let profile_hash = profile_hash(&profile);
        let pack_hash = pack.pack_hash();
        let run_key = run_key(seed, &pack_hash, mode);
        let state = NegotiationState::new(&profile, pack.max_rounds);

        debug!(seed, %run_key, %profile_hash, %mode, "run started");

        let opening = negotiation::opening_reply(&profile);
        let transcript = vec![TurnRecord {
            turn_index: 0,
            seller: String::new(),
            buyer: opening,
            state: state.clone(),
        }];

        Ok(Self {
            run_id: Uuid::new_v4().to_string(),
            seed,
            mode,
            pack_version: pack.version.clone(),
            pack_hash,
            run_key,
            profile,
            profile_hash,
            state,
            transcript,
            created_at: Utc::now(),
        })
    }

    pub fn profile(&self) -> &BuyerProfile {
        &self.profile
    }

    pub fn profile_hash(&self) -> &str {
        &self.profile_hash
    }

    pub fn run_key(&self) -> &str {
        &self.run_key
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.state.outcome.is_terminal()
    }

    pub fn transcript(&self) -> &[TurnRecord] {
        &self.transcript
    }

    /// Strict-mode turn: rule-based reply, deterministic replay.
    pub fn step(&mut self, seller_text: &str) -> Result<&TurnRecord> {
        self.step_message(&SellerMessage::text(seller_text))
    }

    pub fn step_message(&mut self, msg: &SellerMessage) -> Result<&TurnRecord> {
        let (next, reply) = negotiation::step(&self.profile, &self.state, msg)?;
        self.state = next;
        self.push_turn(msg.text.clone(), reply);
        Ok(self.transcript.last().expect("turn just pushed"))
    }

    /// Freeplay/flavor turn: state transitions stay rule-based, but the
    /// reply wording is delegated to the generator. On generator failure the
    /// deterministic strict reply is kept.
    pub async fn step_with(
        &mut self,
        seller_text: &str,
        generator: &dyn ReplyGenerator,
    ) -> Result<&TurnRecord> {
        if self.mode == Mode::Strict {
            return self.step(seller_text);
        }

        let msg = SellerMessage::text(seller_text);
        let (next, mut reply) = negotiation::step(&self.profile, &self.state, &msg)?;

        match generator
            .generate(&self.profile, &self.transcript, seller_text)
            .await
        {
            Ok(text) => {
                reply.text = text;
                reply.tags.push(format!("llm_{}", self.mode));
            }
            Err(err) => {
                warn!(error = %err, "reply generator failed, falling back to strict reply");
                reply.tags.push(format!("llm_fallback:{err}"));
            }
        }

        self.state = next;
        self.push_turn(msg.text, reply);
        Ok(self.transcript.last().expect("turn just pushed"))
    }

    fn push_turn(&mut self, seller: String, reply: crate::negotiation::BuyerReply) {
        let turn_index = u32::try_from(self.transcript.len()).unwrap_or(u32::MAX);
        self.transcript.push(TurnRecord {
            turn_index,
            seller,
            buyer: reply,
            state: self.state.clone(),
        });
    }

    /// Close out the run. The record is immutable from here; ownership
    /// passes to the external persistence collaborator.
    pub fn finalize(self) -> RunRecord {
        let seller_turns: Vec<String> = self
            .transcript
            .iter()
            .filter(|t| !t.seller.trim().is_empty())
            .map(|t| t.seller.clone())
            .collect();
        let outcome = self.state.outcome;
        let score = score_session(&seller_turns, &self.profile, outcome);
        let deal = (outcome == Outcome::Deal)
            .then(|| self.state.buyer_counter.map(|price| deal_score(&self.profile, price)))
            .flatten();

        RunRecord {
            run_id: self.run_id,
            seed: self.seed,
            pack_version: self.pack_version,
            pack_hash: self.pack_hash,
            run_key: self.run_key,
            mode: self.mode,
            profile: self.profile,
            profile_hash: self.profile_hash,
            transcript: self.transcript,
            outcome,
            deal,
            score,
            created_at: self.created_at,
        }
    }
}
