use std::env;
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{ReleaseNotesError, Result};

/// Complete configuration for a release-notes run.
///
/// Loaded from an optional TOML file and overridden by environment
/// variables, then passed explicitly into the git, Jira, and changelog
/// components; nothing reads ambient global state after loading.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub jira: JiraConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,
}

/// Source-control connection settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    /// Remote URL; `git@` selects SSH transport, `https://` basic auth.
    #[serde(default)]
    pub repo_url: String,

    /// Private key material for SSH transport (PEM text, already decoded).
    #[serde(default)]
    pub private_key: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Long-lived integration branch the changelog branch merges back into.
    #[serde(default = "default_trunk_branch")]
    pub trunk_branch: String,
}

fn default_trunk_branch() -> String {
    "master".to_string()
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            repo_url: String::new(),
            private_key: None,
            username: None,
            password: None,
            trunk_branch: default_trunk_branch(),
        }
    }
}

/// Issue-tracker connection settings.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct JiraConfig {
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub api_key: String,

    /// Tracker project key, e.g. `PROJ` for issues `PROJ-123`.
    #[serde(default)]
    pub project_key: String,
}

/// Changelog write behavior.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ChangelogConfig {
    /// When true, new content is written above the prior file content,
    /// separated by a horizontal rule; when false the file is overwritten.
    #[serde(default)]
    pub prepend: bool,
}

impl Config {
    /// Loads configuration from file and environment.
    ///
    /// File lookup order:
    /// 1. Custom path provided as parameter
    /// 2. `release-notes.toml` in the current directory
    /// 3. `release-notes.toml` in the user config directory
    ///
    /// Environment variables override file values: `GIT_REPO_URL`,
    /// `GIT_PRIVATE_KEY` (base64-encoded), `GIT_USERNAME`, `GIT_PASSWORD`,
    /// `GIT_WORKING_BRANCH`, `JIRA_URL`, `JIRA_SERVICE_ACCOUNT_USERNAME`,
    /// `JIRA_SERVICE_ACCOUNT_API_KEY`, `JIRA_PROJECT_KEY`,
    /// `PREPEND_TO_CHANGELOG`.
    pub fn load(config_path: Option<&str>) -> Result<Config> {
        let mut config = Self::load_file(config_path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn load_file(config_path: Option<&str>) -> Result<Config> {
        let config_str = if let Some(path) = config_path {
            fs::read_to_string(path)?
        } else if Path::new("./release-notes.toml").exists() {
            fs::read_to_string("./release-notes.toml")?
        } else if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("release-notes.toml");
            if path.exists() {
                fs::read_to_string(path)?
            } else {
                return Ok(Config::default());
            }
        } else {
            return Ok(Config::default());
        };

        toml::from_str(&config_str)
            .map_err(|e| ReleaseNotesError::config(format!("invalid TOML: {}", e)))
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = env::var("GIT_REPO_URL") {
            self.git.repo_url = url;
        }
        if let Ok(encoded_key) = env::var("GIT_PRIVATE_KEY") {
            let decoded = BASE64.decode(encoded_key.trim()).map_err(|e| {
                ReleaseNotesError::config(format!("GIT_PRIVATE_KEY is not valid base64: {}", e))
            })?;
            let key = String::from_utf8(decoded).map_err(|_| {
                ReleaseNotesError::config("GIT_PRIVATE_KEY does not decode to UTF-8 key material")
            })?;
            self.git.private_key = Some(key);
        }
        if let Ok(username) = env::var("GIT_USERNAME") {
            self.git.username = Some(username);
        }
        if let Ok(password) = env::var("GIT_PASSWORD") {
            self.git.password = Some(password);
        }
        if let Ok(branch) = env::var("GIT_WORKING_BRANCH") {
            self.git.trunk_branch = branch;
        }

        if let Ok(url) = env::var("JIRA_URL") {
            self.jira.base_url = url;
        }
        if let Ok(username) = env::var("JIRA_SERVICE_ACCOUNT_USERNAME") {
            self.jira.username = username;
        }
        if let Ok(api_key) = env::var("JIRA_SERVICE_ACCOUNT_API_KEY") {
            self.jira.api_key = api_key;
        }
        if let Ok(project_key) = env::var("JIRA_PROJECT_KEY") {
            self.jira.project_key = project_key;
        }

        if let Ok(prepend) = env::var("PREPEND_TO_CHANGELOG") {
            self.changelog.prepend = prepend.trim().eq_ignore_ascii_case("true");
        }

        Ok(())
    }
}
