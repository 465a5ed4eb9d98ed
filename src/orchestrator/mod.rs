//! Orchestration layer.
//!
//! Owns the browser session and the run lifecycle. `agent` drives the whole
//! run (quota, caps, login, statistics) and `scan` collects contest
//! candidates from the hub pages. Only this layer holds the `BrowserSession`;
//! everything below works against a single `PageDriver`.

pub mod agent;
pub mod scan;

pub use agent::Agent;
