pub mod engine;
pub mod language;
pub mod scoring;
pub mod state;

pub use engine::{opening_reply, step};
pub use scoring::{DealScore, ScoreBreakdown, deal_score, score_session};
pub use state::{BuyerReply, NegotiationState, Outcome, RevealFlags, SellerMessage};
