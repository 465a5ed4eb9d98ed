pub mod artifacts;
pub mod classifier;
pub mod contest_state;
pub mod creative;
pub mod fact_lookup;
pub mod ledger;

pub use artifacts::ArtifactService;
pub use classifier::classify;
pub use contest_state::ContestState;
pub use creative::CreativeService;
pub use fact_lookup::FactLookup;
pub use ledger::Ledger;
