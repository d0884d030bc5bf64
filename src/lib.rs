pub mod changelog;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod issue_key;
pub mod jira;
pub mod ui;
pub mod version;

pub use error::{ReleaseNotesError, Result};
