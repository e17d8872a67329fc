pub mod generator;
pub mod hasher;
pub mod profile;

pub use generator::generate;
pub use hasher::profile_hash;
pub use profile::{BuyerProfile, ConcessionPlan, Constraints, MustHave, TraitSet};
