use thiserror::Error;

/// Domain errors raised while driving the browser and writing files.
///
/// Every variant carries a stable kind label; when a contest attempt fails,
/// the label becomes part of the `ERROR:<kind>:<message>` status recorded in
/// the ledger.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Navigation failed or timed out.
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// In-page script evaluation failed.
    #[error("script evaluation failed: {message}")]
    Script { message: String },

    /// Browser could not be launched.
    #[error("browser launch failed: {message}")]
    BrowserLaunch { message: String },

    /// Artifact file could not be written.
    #[error("artifact write failed ({path}): {source}")]
    Artifact {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Ledger file could not be created or appended.
    #[error("ledger write failed ({path}): {source}")]
    Ledger {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AgentError {
    /// Stable label for ledger status rows.
    pub fn kind(&self) -> &'static str {
        match self {
            AgentError::Navigation { .. } => "Navigation",
            AgentError::Script { .. } => "Script",
            AgentError::BrowserLaunch { .. } => "BrowserLaunch",
            AgentError::Artifact { .. } => "Artifact",
            AgentError::Ledger { .. } => "Ledger",
        }
    }
}

/// Kind label for an arbitrary error chain.
///
/// Chains that do not bottom out in an [`AgentError`] get the generic
/// "Runtime" label.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<AgentError>()
        .map(AgentError::kind)
        .unwrap_or("Runtime")
}
