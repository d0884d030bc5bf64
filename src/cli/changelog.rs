//! Changelog generation pipeline.
//!
//! Clones the configured repository, mines tags and merged issue keys,
//! resolves the release identifier, renders the changelog from tracker
//! records, and hands the artifact to the commit/tag/merge/push workflow.

use crate::changelog;
use crate::config::Config;
use crate::error::{ReleaseNotesError, Result};
use crate::git::{Credentials, GitClient};
use crate::jira::JiraClient;
use crate::ui;
use crate::version::resolve_next_version;

/// Release name recorded when the changelog is regenerated for every tag.
pub const FULL_CHANGELOG_RELEASE_NAME: &str = "full-changelog-generation";

/// Which release window the changelog covers, one per invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangelogMode {
    /// Cut a new release: issues since the last tag, named by directive.
    IncrementVersion(String),
    /// Regenerate for an existing tag.
    ForTag(String),
    /// Regenerate for every tag, oldest first.
    Full,
}

impl ChangelogMode {
    /// Resolves the mutually-exclusive changelog sub-flags into a mode.
    pub fn from_flags(
        increment_version: Option<String>,
        tag: Option<String>,
        full: bool,
    ) -> Result<Self> {
        match (increment_version, tag, full) {
            (Some(directive), None, false) => Ok(ChangelogMode::IncrementVersion(directive)),
            (None, Some(tag_name), false) => Ok(ChangelogMode::ForTag(tag_name)),
            (None, None, true) => Ok(ChangelogMode::Full),
            _ => Err(ReleaseNotesError::config(
                "exactly one of --incrementVersion, --tag, or --full must be provided",
            )),
        }
    }
}

/// Looks a requested tag up in the repository's tag list, failing when it
/// was never cut.
fn resolve_existing_tag(tags: &[String], tag_name: &str) -> Result<String> {
    tags.iter()
        .find(|t| t.as_str() == tag_name)
        .cloned()
        .ok_or_else(|| {
            ReleaseNotesError::history_walk(format!(
                "tag [{}] not found in repository history",
                tag_name
            ))
        })
}

/// Runs the full changelog pipeline for one invocation.
pub fn run(mode: ChangelogMode, config: &Config) -> Result<()> {
    ui::display_status("Changelog generation request received");

    ui::display_status("Initializing the system");
    let credentials = Credentials::from_config(&config.git)?;
    let git = GitClient::clone_from(&config.git, &credentials)?;
    let jira = JiraClient::new(&config.jira)?;

    ui::display_status("Pulling all existing tags");
    let mut tags = git.list_tags()?;
    // miner returns newest first; the resolver wants ascending order
    tags.reverse();

    let project_key = &config.jira.project_key;
    let prepend = config.changelog.prepend;

    ui::display_status("Generating changelog");
    let release_name = match mode {
        ChangelogMode::IncrementVersion(directive) => {
            let issue_keys = git.issues_since_last_tag(project_key)?;
            let release_name = resolve_next_version(&tags, &directive)?;
            let issues = jira.get_issue_list(&issue_keys)?;
            changelog::generate(git.workdir(), &release_name, &issues, prepend)?;
            release_name
        }
        ChangelogMode::ForTag(tag_name) => {
            let tag_name = resolve_existing_tag(&tags, &tag_name)?;
            let issue_keys = git.issues_within_tag(&tag_name, project_key)?;
            let issues = jira.get_issue_list(&issue_keys)?;
            changelog::generate(git.workdir(), &tag_name, &issues, prepend)?;
            tag_name
        }
        ChangelogMode::Full => {
            for tag in &tags {
                let issue_keys = git.issues_within_tag(tag, project_key)?;
                let issues = jira.get_issue_list(&issue_keys)?;
                changelog::generate(git.workdir(), tag, &issues, prepend)?;
            }
            FULL_CHANGELOG_RELEASE_NAME.to_string()
        }
    };

    ui::display_status(&format!(
        "Committing changelog to new tag [{}], merging to trunk [{}], and pushing",
        release_name,
        git.trunk()
    ));
    let report = git.commit_changelog_tag_and_push(&release_name, &credentials)?;
    ui::display_push_report(&report);

    ui::display_success("Changelog generation complete");
    Ok(())
}
