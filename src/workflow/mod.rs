pub mod contest_ctx;
pub mod contest_flow;

pub use contest_ctx::ContestCtx;
pub use contest_flow::ContestFlow;
