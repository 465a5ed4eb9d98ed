//! # Filmweb Contest Agent
//!
//! Automated contest entries on filmweb.pl.
//!
//! ## Architecture
//!
//! The crate keeps a strict four-layer split:
//!
//! ### ① Infrastructure
//! - `infrastructure/` - holds the scarce resource (the page), exposes capabilities
//! - `PageDriver` - the only page owner, provides goto() / eval() / screenshots
//!
//! ### ② Services
//! - `services/` - single-purpose capabilities, one contest at a time
//! - `classify` - fact vs. creative question routing
//! - `CreativeService` - deterministic Polish justification answers
//! - `FactLookup` - web search for factual questions
//! - `ContestState` - ended / confirmed / submittable probes
//! - `Ledger` - append-only CSV log and daily quota source
//! - `ArtifactService` - screenshot and HTML snapshots
//!
//! ### ③ Workflow
//! - `workflow/` - the full pipeline for one contest
//! - `ContestCtx` - context (url + index)
//! - `ContestFlow` - open-check → question → answer → fill → submit → ledger
//!
//! ### ④ Orchestration
//! - `orchestrator/agent` - run lifecycle, quotas, login, statistics
//! - `orchestrator/scan` - contest discovery on the hub pages

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

pub use browser::BrowserSession;
pub use cli::Args;
pub use config::Config;
pub use error::{error_kind, AgentError};
pub use infrastructure::PageDriver;
pub use models::{AnswerMode, AnswerStyle, LedgerEntry, QuestionKind, Status};
pub use orchestrator::Agent;
pub use services::Ledger;
pub use workflow::{ContestCtx, ContestFlow};
