//! Git2 implementation of the RefRepository port.

use crate::domain::{BranchRef, CommitId};
use crate::ports::RefRepository;
use anyhow::{Context, Result};
use git2::{BranchType, ErrorCode, Oid, Repository};
use std::path::Path;

pub struct Git2Repo {
    repo: Repository,
}

impl Git2Repo {
    /// Open the repository at exactly `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;
        Ok(Self { repo })
    }

    /// Open the repository containing `path`, searching parent directories.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).context("Failed to open git repository")?;
        Ok(Self { repo })
    }

    pub fn discover_current_dir() -> Result<Self> {
        Self::discover(Path::new("."))
    }

    /// Name of the checked-out branch, including an unborn one.
    /// `None` for a detached HEAD.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = self
            .repo
            .find_reference("HEAD")
            .context("Failed to read HEAD")?;
        let target = match head.symbolic_target() {
            Some(target) => target,
            None => return Ok(None),
        };
        Ok(target.strip_prefix("refs/heads/").map(String::from))
    }
}

fn is_missing(e: &git2::Error) -> bool {
    matches!(
        e.code(),
        ErrorCode::NotFound | ErrorCode::UnbornBranch | ErrorCode::InvalidSpec
    )
}

fn to_commit_id(oid: Oid) -> CommitId {
    CommitId::new(oid.to_string())
}

impl RefRepository for Git2Repo {
    fn local_branches(&self) -> Result<Vec<BranchRef>> {
        let mut refs = Vec::new();
        for entry in self
            .repo
            .branches(Some(BranchType::Local))
            .context("Failed to list local branches")?
        {
            let (branch, _) = entry.context("Failed to read branch")?;
            // Skip names that are not valid UTF-8.
            let Some(name) = branch.name().ok().flatten() else {
                continue;
            };
            let tip = branch
                .get()
                .peel_to_commit()
                .ok()
                .map(|commit| to_commit_id(commit.id()));
            refs.push(BranchRef::new(name, tip));
        }
        Ok(refs)
    }

    fn find_local_branch(&self, name: &str) -> Result<Option<BranchRef>> {
        let branch = match self.repo.find_branch(name, BranchType::Local) {
            Ok(branch) => branch,
            Err(e) if is_missing(&e) => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to resolve branch '{}'", name)),
        };
        let tip = branch
            .get()
            .peel_to_commit()
            .ok()
            .map(|commit| to_commit_id(commit.id()));
        Ok(Some(BranchRef::new(name, tip)))
    }

    fn parents(&self, commit: &CommitId) -> Result<Vec<CommitId>> {
        let oid = Oid::from_str(commit.as_str())
            .with_context(|| format!("Invalid commit id '{}'", commit))?;
        let commit = self
            .repo
            .find_commit(oid)
            .with_context(|| format!("Failed to read commit {}", oid))?;
        Ok(commit.parent_ids().map(to_commit_id).collect())
    }

    fn head_commit(&self) -> Result<Option<CommitId>> {
        match self.repo.head() {
            Ok(head) => Ok(head.target().map(to_commit_id)),
            Err(e) if is_missing(&e) => Ok(None),
            Err(e) => Err(e).context("Failed to get HEAD"),
        }
    }
}
