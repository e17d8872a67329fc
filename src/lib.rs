#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::return_self_not_must_use
)]

//! Deterministic car-buyer persona and negotiation simulator.
//!
//! Given a numeric seed and a data pack, the engine always produces the
//! same buyer and, in strict mode, the same turn-by-turn behavior, so runs
//! are replayable and shareable as fair training seed packs.

pub mod error;
pub mod negotiation;
pub mod observability;
pub mod pack;
pub mod persona;
pub mod reply;
pub mod run;
pub mod seed;

pub use error::{DealsimError, Result};
pub use negotiation::{BuyerReply, NegotiationState, Outcome, SellerMessage};
pub use pack::DataPack;
pub use persona::{BuyerProfile, generate, profile_hash};
pub use run::{Mode, Runner};
pub use seed::{SeedStream, parse_seed};
