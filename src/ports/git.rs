//! Git repository port (trait).
//! The read-only capabilities the election needs, without coupling to any implementation.

use crate::domain::{BranchRef, CommitId};
use anyhow::Result;

/// Port for reading refs and the commit graph.
/// Implementations may use git2 or in-memory test fakes.
pub trait RefRepository {
    /// List every ref in the local-branches namespace.
    fn local_branches(&self) -> Result<Vec<BranchRef>>;

    /// Look up a single local branch by short name.
    /// Returns `Ok(None)` when no such branch exists; an existing branch whose
    /// tip is not a commit comes back with `tip: None`.
    fn find_local_branch(&self, name: &str) -> Result<Option<BranchRef>>;

    /// Parent commits of `commit`, first parent first. Empty for a root commit.
    fn parents(&self, commit: &CommitId) -> Result<Vec<CommitId>>;

    /// The currently checked-out commit, or `None` on an unborn HEAD.
    fn head_commit(&self) -> Result<Option<CommitId>>;
}
