//! Git collaborator.
//!
//! [GitClient] wraps a `git2` repository checked out for one run. The
//! history miner ([history]) reads tags and merged issue keys out of the
//! commit log; the workflow ([workflow]) records the generated changelog
//! back into the repository as a committed, tagged, and pushed artifact.

pub mod history;
pub mod transport;
pub mod workflow;

pub use transport::Credentials;
pub use workflow::{PushReport, RefPushStatus, RefStatus};

use std::path::{Path, PathBuf};

use git2::build::RepoBuilder;
use git2::{FetchOptions, Repository};
use tempfile::TempDir;

use crate::config::GitConfig;
use crate::error::{ReleaseNotesError, Result};

/// A repository checked out on the configured trunk branch.
///
/// Cloned repositories live in a fresh, process-exclusive temporary
/// directory that is removed when the client is dropped.
pub struct GitClient {
    pub(crate) repo: Repository,
    trunk: String,
    workdir: PathBuf,
    _workspace: Option<TempDir>,
}

impl GitClient {
    /// Clones the configured remote into a fresh temporary workspace and
    /// checks out the trunk branch.
    ///
    /// # Errors
    /// [ReleaseNotesError::Initialization] when the clone or the trunk
    /// checkout fails; nothing has been mutated remotely at that point.
    pub fn clone_from(config: &GitConfig, credentials: &Credentials) -> Result<Self> {
        let workspace = tempfile::Builder::new().prefix("workspace").tempdir()?;

        let session = credentials.session()?;
        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(session.callbacks());

        let repo = RepoBuilder::new()
            .fetch_options(fetch_options)
            .clone(&config.repo_url, workspace.path())
            .map_err(|e| {
                ReleaseNotesError::initialization(format!(
                    "unable to clone [{}]: {}",
                    config.repo_url, e
                ))
            })?;

        let client = GitClient {
            repo,
            trunk: config.trunk_branch.clone(),
            workdir: workspace.path().to_path_buf(),
            _workspace: Some(workspace),
        };

        client.checkout(&client.trunk).map_err(|e| {
            ReleaseNotesError::initialization(format!(
                "unable to check out trunk [{}]: {}",
                client.trunk, e
            ))
        })?;

        Ok(client)
    }

    /// Opens an already-checked-out repository, e.g. in tests or when the
    /// caller manages the clone itself.
    pub fn open(path: &Path, trunk: &str) -> Result<Self> {
        let repo = Repository::open(path)?;
        Ok(GitClient {
            repo,
            trunk: trunk.to_string(),
            workdir: path.to_path_buf(),
            _workspace: None,
        })
    }

    /// Root of the working tree the changelog artifact is written into.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Name of the trunk branch changelog branches merge back into.
    pub fn trunk(&self) -> &str {
        &self.trunk
    }

    /// Checks out a branch (or any revision) by name, moving HEAD.
    pub(crate) fn checkout(&self, name: &str) -> Result<()> {
        let (object, reference) = self.repo.revparse_ext(name)?;
        self.repo.checkout_tree(&object, None)?;

        match reference {
            Some(reference) => {
                let ref_name = reference.name().ok_or_else(|| {
                    ReleaseNotesError::history_walk(format!(
                        "reference for [{}] has a non-UTF-8 name",
                        name
                    ))
                })?;
                self.repo.set_head(ref_name)?;
            }
            None => self.repo.set_head_detached(object.id())?,
        }

        Ok(())
    }
}
