#![allow(dead_code)]

use std::fs;
use std::path::Path;

use git2::{Commit, Oid, Repository, Signature, Time};
use tempfile::TempDir;

/// Builds a throwaway repository on `master` with commits at strictly
/// increasing author timestamps, so "authored after the last tag" checks
/// are deterministic.
pub struct RepoFixture {
    pub dir: TempDir,
    pub repo: Repository,
    tick: i64,
}

impl RepoFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");
        repo.set_head("refs/heads/master")
            .expect("Could not point HEAD at master");

        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }

        let mut fixture = RepoFixture {
            dir,
            repo,
            tick: 1_700_000_000,
        };
        fixture.commit("Initial commit");
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Appends to a tracked file and commits with the next timestamp.
    pub fn commit(&mut self, message: &str) -> Oid {
        self.tick += 60;

        let file = self.dir.path().join("notes.txt");
        let existing = fs::read_to_string(&file).unwrap_or_default();
        fs::write(&file, format!("{}{}\n", existing, message))
            .expect("Could not write tracked file");

        let mut index = self.repo.index().expect("Could not get index");
        index
            .add_path(Path::new("notes.txt"))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");
        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = self.repo.find_tree(tree_id).expect("Could not find tree");

        let sig = Signature::new("Test User", "test@example.com", &Time::new(self.tick, 0))
            .expect("Could not build signature");

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Could not create commit")
    }

    /// Tags the current HEAD commit with a lightweight tag.
    pub fn tag(&self, name: &str) {
        let head = self
            .repo
            .head()
            .expect("Could not get HEAD")
            .peel_to_commit()
            .expect("Could not peel HEAD");
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .expect("Could not create tag");
    }

    /// Tags an arbitrary commit with a lightweight tag.
    pub fn tag_commit(&self, name: &str, oid: Oid) {
        let object = self
            .repo
            .find_object(oid, None)
            .expect("Could not find object");
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("Could not create tag");
    }

    /// Creates a bare repository and registers it as this fixture's
    /// `origin` remote, so pushes stay on the local filesystem.
    pub fn add_bare_origin(&self) -> TempDir {
        let remote_dir = TempDir::new().expect("Could not create remote dir");
        Repository::init_bare(remote_dir.path()).expect("Could not init bare repo");
        self.repo
            .remote("origin", remote_dir.path().to_str().expect("non-UTF-8 path"))
            .expect("Could not add origin remote");
        remote_dir
    }
}
