use thiserror::Error;

/// Unified error type for release-notes operations
#[derive(Error, Debug)]
pub enum ReleaseNotesError {
    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("History walk failed: {0}")]
    HistoryWalk(String),

    #[error("Unable to parse issue key from commit message: [{0}]")]
    UnparseableCommitMessage(String),

    #[error("Invalid versioning strategy: {0}")]
    InvalidVersioningStrategy(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Cannot increment version: no prior tag exists in the repository")]
    NoPriorTag,

    #[error("Git operation failed: {0}")]
    GitOperation(#[from] git2::Error),

    #[error("Unsupported transport for remote URL: {0}")]
    UnsupportedTransport(String),

    #[error("Issue tracker request failed: {0}")]
    Tracker(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ReleaseNotesError>;

impl ReleaseNotesError {
    /// Create an initialization error with context
    pub fn initialization(msg: impl Into<String>) -> Self {
        ReleaseNotesError::Initialization(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseNotesError::Config(msg.into())
    }

    /// Create a history-walk error with context
    pub fn history_walk(msg: impl Into<String>) -> Self {
        ReleaseNotesError::HistoryWalk(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseNotesError::Version(msg.into())
    }

    /// Create an issue-tracker error with context
    pub fn tracker(msg: impl Into<String>) -> Self {
        ReleaseNotesError::Tracker(msg.into())
    }
}
