//! Tag/History Miner.
//!
//! All read operations derive from one newest-first, time-ordered walk of
//! the commits reachable from HEAD. Each commit is resolved against the
//! tag namespace the way `git name-rev` would: the exact tag name when the
//! commit is a tag target, `tag~N` when it sits N commits below the
//! nearest tag. Walk order is load-bearing: the "first tagged ancestor"
//! tie-break in [GitClient::issues_since_last_tag] depends on it.
//!
//! Tag attribution assumes commit timestamps are monotone along the walk;
//! on histories where a branch carries out-of-order author times, a commit
//! may resolve against a tag that does not actually contain it.

use std::collections::HashMap;

use git2::{Oid, Sort};

use crate::error::{ReleaseNotesError, Result};
use crate::git::GitClient;
use crate::issue_key::{extract_issue_key, BRANCH_FOLDER_CONVENTIONS, MERGE_PREAMBLE};
use crate::ui;

/// A commit's name relative to the nearest tag that contains it.
#[derive(Debug, Clone)]
struct ResolvedTag {
    name: String,
    /// Ancestor distance below the tag target; 0 means the commit is the
    /// tag target itself.
    distance: usize,
}

impl ResolvedTag {
    fn rev_name(&self) -> String {
        if self.distance == 0 {
            self.name.clone()
        } else {
            format!("{}~{}", self.name, self.distance)
        }
    }
}

struct CommitMeta {
    author_time: i64,
    short_message: String,
    resolved: Option<ResolvedTag>,
}

impl GitClient {
    /// Walks commits reachable from HEAD in reverse-chronological order
    /// and returns all exactly-tagged labels, newest first, first-seen
    /// deduplicated. Ancestor-distance names (containing `~`) are never
    /// included. Callers wanting chronological order reverse the result.
    pub fn list_tags(&self) -> Result<Vec<String>> {
        let mut tags = Vec::new();

        for meta in self.walk_history()? {
            if let Some(resolved) = &meta.resolved {
                if resolved.distance == 0 && !tags.contains(&resolved.name) {
                    tags.push(resolved.name.clone());
                }
            }
        }

        Ok(tags)
    }

    /// Collects issue keys from every merge commit authored strictly after
    /// the nearest tagged ancestor of HEAD.
    ///
    /// Merge commits whose message matches no known branch-naming
    /// convention are reported and skipped, never fatal.
    pub fn issues_since_last_tag(&self, project_key: &str) -> Result<Vec<String>> {
        let history = self.walk_history()?;

        let last_tag_time = history
            .iter()
            .find(|meta| meta.resolved.is_some())
            .map(|meta| meta.author_time)
            .ok_or_else(|| {
                ReleaseNotesError::history_walk("no tagged ancestor commit found from HEAD")
            })?;

        let mut issues = Vec::new();
        for meta in &history {
            if meta.author_time > last_tag_time
                && meta.short_message.contains(MERGE_PREAMBLE)
                && meta.short_message.contains(project_key)
            {
                collect_issue_key(&mut issues, &meta.short_message, project_key);
            }
        }

        Ok(issues)
    }

    /// Collects issue keys from merge commits whose resolved tag name
    /// contains `tag_name`, i.e. the commits merged between the previous
    /// tag and the named one.
    pub fn issues_within_tag(&self, tag_name: &str, project_key: &str) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        for meta in self.walk_history()? {
            if let Some(resolved) = &meta.resolved {
                if meta.short_message.contains(MERGE_PREAMBLE)
                    && resolved.rev_name().contains(tag_name)
                {
                    collect_issue_key(&mut issues, &meta.short_message, project_key);
                }
            }
        }

        Ok(issues)
    }

    /// Collects issue keys from merge commits resolved against either
    /// boundary tag of an explicit release window.
    pub fn issues_between_tags(
        &self,
        from_tag: &str,
        to_tag: &str,
        project_key: &str,
    ) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        for meta in self.walk_history()? {
            if let Some(resolved) = &meta.resolved {
                let rev_name = resolved.rev_name();
                if meta.short_message.contains(MERGE_PREAMBLE)
                    && (rev_name.contains(from_tag) || rev_name.contains(to_tag))
                {
                    collect_issue_key(&mut issues, &meta.short_message, project_key);
                }
            }
        }

        Ok(issues)
    }

    /// One pass over the commit log, newest first, carrying the nearest
    /// containing tag down the walk.
    fn walk_history(&self) -> Result<Vec<CommitMeta>> {
        let tag_targets = self.tag_targets()?;

        let mut revwalk = self.repo.revwalk().map_err(walk_error)?;
        revwalk.push_head().map_err(walk_error)?;
        revwalk.set_sorting(Sort::TIME).map_err(walk_error)?;

        let mut history = Vec::new();
        let mut current_tag: Option<ResolvedTag> = None;

        for oid in revwalk {
            let oid = oid.map_err(walk_error)?;
            let commit = self.repo.find_commit(oid).map_err(walk_error)?;

            if let Some(name) = tag_targets.get(&oid) {
                current_tag = Some(ResolvedTag {
                    name: name.clone(),
                    distance: 0,
                });
            } else if let Some(tag) = &mut current_tag {
                tag.distance += 1;
            }

            history.push(CommitMeta {
                author_time: commit.author().when().seconds(),
                short_message: commit.summary().unwrap_or("").to_string(),
                resolved: current_tag.clone(),
            });
        }

        Ok(history)
    }

    /// Maps tag target commits to tag labels. Handles both lightweight
    /// and annotated tags; when several tags point at one commit the
    /// first label wins, matching name-revision behavior.
    fn tag_targets(&self) -> Result<HashMap<Oid, String>> {
        let mut targets = HashMap::new();

        let tag_names = self.repo.tag_names(None).map_err(walk_error)?;
        for name in tag_names.iter().flatten() {
            let reference = self
                .repo
                .find_reference(&format!("refs/tags/{}", name))
                .map_err(walk_error)?;
            let target = reference
                .peel(git2::ObjectType::Commit)
                .map_err(walk_error)?;
            targets.entry(target.id()).or_insert_with(|| name.to_string());
        }

        Ok(targets)
    }
}

fn collect_issue_key(issues: &mut Vec<String>, short_message: &str, project_key: &str) {
    match extract_issue_key(short_message, project_key, BRANCH_FOLDER_CONVENTIONS) {
        Ok(key) => {
            if !issues.contains(&key) {
                issues.push(key);
            }
        }
        // An unrecognized branch convention excludes the commit from
        // aggregation; the run continues.
        Err(e) => ui::display_warn(&e.to_string()),
    }
}

fn walk_error(e: git2::Error) -> ReleaseNotesError {
    ReleaseNotesError::history_walk(e.to_string())
}
