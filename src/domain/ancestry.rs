//! Commit ancestry cache builder.
//! Walks every local branch and records its history, tip first.

use super::types::{CacheState, CommitId, CommitsCache};
use crate::ports::RefRepository;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Which parent links a walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalkMode {
    /// Only the first parent of each commit: the branch's own line of work.
    #[default]
    FirstParent,
    /// Every ancestor, breadth-first from the tip, parents in stored order.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkOptions {
    pub mode: WalkMode,
    /// Maximum number of commits per chain. `None` walks to the root.
    pub max_depth: Option<usize>,
}

/// Walk history from `tip`, returning commit ids tip first.
///
/// Any parent lookup failure fails the whole walk; callers never see a
/// truncated chain.
pub fn walk_chain<R: RefRepository + ?Sized>(
    repo: &R,
    tip: &CommitId,
    options: &WalkOptions,
) -> Result<Vec<CommitId>> {
    let limit = options.max_depth.unwrap_or(usize::MAX);
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([tip.clone()]);

    while let Some(commit) = queue.pop_front() {
        if chain.len() >= limit {
            break;
        }
        if !seen.insert(commit.clone()) {
            continue;
        }

        let parents = repo.parents(&commit)?;
        chain.push(commit);

        match options.mode {
            WalkMode::FirstParent => queue.extend(parents.into_iter().take(1)),
            WalkMode::Full => queue.extend(parents),
        }
    }

    Ok(chain)
}

/// Build the cache, reporting explicitly whether the ref database was readable.
pub fn load_commits_cache<R: RefRepository + ?Sized>(repo: &R, options: &WalkOptions) -> CacheState {
    let branches = match repo.local_branches() {
        Ok(branches) => branches,
        Err(e) => {
            tracing::warn!("Unable to list local branches: {:#}", e);
            return CacheState::Unavailable;
        }
    };

    let mut cache = CommitsCache::new();
    for branch in branches {
        let Some(tip) = branch.tip else {
            tracing::debug!(branch = %branch.name, "Skipping branch without a commit tip");
            continue;
        };

        match walk_chain(repo, &tip, options) {
            Ok(chain) => cache.insert(branch.name, chain),
            Err(e) => {
                tracing::warn!(branch = %branch.name, "Skipping unreadable branch history: {:#}", e)
            }
        }
    }

    tracing::debug!(branches = cache.len(), "Built commits cache");
    CacheState::Ready(cache)
}

/// Best-effort cache: an unreadable repository yields an empty mapping.
pub fn build_commits_cache<R: RefRepository + ?Sized>(repo: &R, options: &WalkOptions) -> CommitsCache {
    load_commits_cache(repo, options).unwrap_or_default()
}
