//! Issue-tracker collaborator.
//!
//! For projects using Jira, resolves the issue keys mined from source
//! control into full records for the changelog. Treated as a black-box
//! key-to-record lookup by the rest of the pipeline.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

use crate::config::JiraConfig;
use crate::error::{ReleaseNotesError, Result};

/// Bound on any single tracker request; a hung transport must not hang
/// the whole run.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// An issue record as rendered into the changelog.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub description: String,
    /// Issue type name, e.g. `Story` or `Bug`.
    pub issue_type: String,
}

#[derive(Deserialize)]
struct RawIssue {
    key: String,
    fields: RawFields,
}

#[derive(Deserialize)]
struct RawFields {
    summary: Option<String>,
    description: Option<String>,
    issuetype: RawIssueType,
}

#[derive(Deserialize)]
struct RawIssueType {
    name: String,
}

/// Basic-auth REST client for a Jira instance.
pub struct JiraClient {
    agent: ureq::Agent,
    base_url: String,
    auth_header: String,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(ReleaseNotesError::initialization(
                "JIRA_URL must be set to reach the issue tracker",
            ));
        }

        let credentials = format!("{}:{}", config.username, config.api_key);
        let auth_header = format!("Basic {}", BASE64.encode(credentials));

        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build();

        Ok(JiraClient {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    /// Fetches a single issue.
    ///
    /// Returns `Ok(None)` when the tracker answers with any error status
    /// (unknown key, missing permission); transport-level failures are
    /// fatal to the run.
    pub fn get_issue(&self, issue_key: &str) -> Result<Option<Issue>> {
        let url = format!("{}/rest/api/2/issue/{}", self.base_url, issue_key);

        let response = match self
            .agent
            .get(&url)
            .set("Authorization", &self.auth_header)
            .set("Accept", "application/json")
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(_, _)) => return Ok(None),
            Err(e) => {
                return Err(ReleaseNotesError::tracker(format!(
                    "request for [{}] failed: {}",
                    issue_key, e
                )))
            }
        };

        let raw: RawIssue = response.into_json().map_err(|e| {
            ReleaseNotesError::tracker(format!("malformed response for [{}]: {}", issue_key, e))
        })?;

        Ok(Some(Issue {
            key: raw.key,
            summary: raw.fields.summary.unwrap_or_default(),
            description: raw.fields.description.unwrap_or_default(),
            issue_type: raw.fields.issuetype.name,
        }))
    }

    /// Fetches issues for the given keys, preserving input order and
    /// silently dropping keys the tracker does not know.
    pub fn get_issue_list(&self, issue_keys: &[String]) -> Result<Vec<Issue>> {
        let mut issues = Vec::with_capacity(issue_keys.len());
        for key in issue_keys {
            if let Some(issue) = self.get_issue(key)? {
                issues.push(issue);
            }
        }
        Ok(issues)
    }
}
