pub mod record;
pub mod runner;

pub use record::{Mode, RunRecord, TurnRecord, run_key};
pub use runner::Runner;
