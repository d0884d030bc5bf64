//! Commit/Tag/Merge/Push workflow.
//!
//! The generated changelog is recorded through a fixed sequence: create a
//! uniquely-named working branch, commit the artifact under the bot
//! identity, tag the commit with the release name, merge the branch back
//! into the trunk with an always-created merge commit, and push the trunk
//! plus all tags. The trunk is never checked out for the merge until the
//! branch's commit and tag have succeeded, so a failure up to that point
//! leaves the trunk untouched.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Local;
use git2::build::CheckoutBuilder;
use git2::{Oid, PushOptions, Signature};

use crate::changelog::CHANGELOG_DIR;
use crate::error::Result;
use crate::git::transport::Credentials;
use crate::git::GitClient;
use crate::ui;

/// Identity the changelog commits and merges are authored under.
const BOT_NAME: &str = "project-release-notes";
const BOT_EMAIL: &str = "no@no.com";

/// Remote the trunk and tags are pushed to.
pub const DEFAULT_REMOTE: &str = "origin";

/// Outcome of a push, one entry per ref. Rejected refs are reported as
/// warnings by the caller; they never abort the push as a whole.
#[derive(Debug, Clone)]
pub struct PushReport {
    pub refs: Vec<RefPushStatus>,
}

impl PushReport {
    pub fn all_ok(&self) -> bool {
        self.refs
            .iter()
            .all(|entry| matches!(entry.status, RefStatus::Ok))
    }
}

#[derive(Debug, Clone)]
pub struct RefPushStatus {
    pub refname: String,
    pub status: RefStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefStatus {
    /// The remote accepted the update or was already current.
    Ok,
    Rejected(String),
}

impl GitClient {
    /// Runs the full record-keeping sequence for a generated changelog:
    /// branch, commit, tag, merge into trunk, push.
    pub fn commit_changelog_tag_and_push(
        &self,
        release_name: &str,
        credentials: &Credentials,
    ) -> Result<PushReport> {
        let branch_name = self.checkout_changelog_branch_commit_and_tag(release_name)?;
        self.merge_changelog_branch_into_trunk(&branch_name)?;
        self.push_trunk_and_tags(credentials)
    }

    fn checkout_changelog_branch_commit_and_tag(&self, release_name: &str) -> Result<String> {
        let branch_name = self.create_changelog_branch()?;
        let commit = self.commit_artifact(release_name)?;
        self.tag_release(release_name, commit)?;
        Ok(branch_name)
    }

    /// Creates and checks out a changelog branch with a time-based unique
    /// name.
    pub fn create_changelog_branch(&self) -> Result<String> {
        let epoch_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let branch_name = format!("update-changelog-{}", epoch_millis);

        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(&branch_name, &head, false)?;
        self.checkout(&branch_name)?;

        Ok(branch_name)
    }

    /// Stages the changelog directory and commits it under the bot
    /// identity, returning the new commit id.
    pub fn commit_artifact(&self, release_name: &str) -> Result<Oid> {
        let mut index = self.repo.index()?;
        index.add_all([CHANGELOG_DIR], git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parent = self.repo.head()?.peel_to_commit()?;
        let signature = Signature::now(BOT_NAME, BOT_EMAIL)?;
        let message = format!(
            "Generated Changelog for release [{}] at [{}]",
            release_name,
            Local::now().naive_local()
        );

        let commit = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &message,
            &tree,
            &[&parent],
        )?;

        Ok(commit)
    }

    /// Creates a lightweight tag named exactly `release_name` at the given
    /// commit. Tag names are unique; colliding with an existing tag fails.
    pub fn tag_release(&self, release_name: &str, commit: Oid) -> Result<()> {
        let object = self.repo.find_object(commit, None)?;
        self.repo.tag_lightweight(release_name, &object, false)?;
        Ok(())
    }

    /// Checks the trunk back out and merges the changelog branch into it,
    /// always creating a merge commit even where a fast-forward would do.
    ///
    /// Conflicts are not expected (the change is additive to a dedicated
    /// file); when they do occur the conflicted paths are reported and the
    /// merge fails without cleaning up the worktree.
    pub fn merge_changelog_branch_into_trunk(&self, branch_name: &str) -> Result<()> {
        self.checkout(self.trunk())?;

        let branch_oid = self.repo.revparse_single(branch_name)?.id();
        let annotated = self.repo.find_annotated_commit(branch_oid)?;

        self.repo
            .merge(&[&annotated], None, Some(CheckoutBuilder::new().safe()))?;

        let mut index = self.repo.index()?;
        if index.has_conflicts() {
            for conflict in index.conflicts()? {
                let conflict = conflict?;
                if let Some(entry) = conflict.our.or(conflict.their) {
                    ui::display_warn(&format!(
                        "Merge conflict in [{}]",
                        String::from_utf8_lossy(&entry.path)
                    ));
                }
            }
            return Err(git2::Error::from_str(&format!(
                "merging [{}] into [{}] produced conflicts",
                branch_name,
                self.trunk()
            ))
            .into());
        }

        let tree_id = index.write_tree_to(&self.repo)?;
        let tree = self.repo.find_tree(tree_id)?;
        let trunk_commit = self.repo.head()?.peel_to_commit()?;
        let branch_commit = self.repo.find_commit(branch_oid)?;
        let signature = Signature::now(BOT_NAME, BOT_EMAIL)?;
        let message = format!("Merged in [{}] to {}", branch_name, self.trunk());

        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &message,
            &tree,
            &[&trunk_commit, &branch_commit],
        )?;

        self.repo.cleanup_state()?;
        Ok(())
    }

    /// Pushes the trunk branch and every tag to the configured remote,
    /// recording a per-ref status. A rejected ref does not abort the push
    /// of the remaining refs.
    pub fn push_trunk_and_tags(&self, credentials: &Credentials) -> Result<PushReport> {
        let mut remote = self.repo.find_remote(DEFAULT_REMOTE)?;

        let mut refspecs = vec![format!("refs/heads/{0}:refs/heads/{0}", self.trunk())];
        let tag_names = self.repo.tag_names(None)?;
        for tag in tag_names.iter().flatten() {
            refspecs.push(format!("refs/tags/{0}:refs/tags/{0}", tag));
        }

        let session = credentials.session()?;
        let mut callbacks = session.callbacks();

        let statuses: Rc<RefCell<Vec<RefPushStatus>>> = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&statuses);
        callbacks.push_update_reference(move |refname, status| {
            let status = match status {
                None => RefStatus::Ok,
                Some(reason) => RefStatus::Rejected(reason.to_string()),
            };
            recorder.borrow_mut().push(RefPushStatus {
                refname: refname.to_string(),
                status,
            });
            Ok(())
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec_strs: Vec<&str> = refspecs.iter().map(String::as_str).collect();
        remote.push(&refspec_strs, Some(&mut push_options))?;

        let refs = statuses.borrow().clone();
        Ok(PushReport { refs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_report_all_ok() {
        let report = PushReport {
            refs: vec![
                RefPushStatus {
                    refname: "refs/heads/master".to_string(),
                    status: RefStatus::Ok,
                },
                RefPushStatus {
                    refname: "refs/tags/1.0.1".to_string(),
                    status: RefStatus::Ok,
                },
            ],
        };
        assert!(report.all_ok());
    }

    #[test]
    fn test_push_report_with_rejection() {
        let report = PushReport {
            refs: vec![RefPushStatus {
                refname: "refs/heads/master".to_string(),
                status: RefStatus::Rejected("non-fast-forward".to_string()),
            }],
        };
        assert!(!report.all_ok());
    }
}
