//! Branch election: pick the server branch that best matches a local branch.
//!
//! Tiers, first match wins:
//! 1. exact name (the local branch exists and a server branch has its name)
//! 2. closest shared history with a non-main server branch
//! 3. the main server branch
//! 4. nothing
//!
//! Repository read failures never escape: they turn into "no candidate" and
//! the cascade moves on.

use super::ancestry::{load_commits_cache, walk_chain, WalkOptions};
use super::types::{BranchRef, CacheState, CommitId, CommitsCache, Election, ServerBranch};
use crate::ports::RefRepository;
use std::borrow::Cow;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElectionError {
    #[error("local branch name must not be empty")]
    EmptyBranchName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectOptions {
    pub walk: WalkOptions,
    /// Non-main candidates must be strictly closer than the main branch.
    pub main_wins_ties: bool,
    /// Use the main branch when the ref database cannot be listed at all.
    pub fallback_to_main_when_unavailable: bool,
}

impl Default for ElectOptions {
    fn default() -> Self {
        Self {
            walk: WalkOptions::default(),
            main_wins_ties: true,
            fallback_to_main_when_unavailable: false,
        }
    }
}

/// Elect a server branch for `local_branch`, returning only its name.
pub fn elect_server_branch<R: RefRepository + ?Sized>(
    local_branch: &str,
    repo: &R,
    server_branches: &[ServerBranch],
    options: &ElectOptions,
) -> Result<Option<String>, ElectionError> {
    elect(local_branch, repo, server_branches, options).map(Election::into_branch)
}

/// Elect a server branch for `local_branch`, reporting which tier decided.
///
/// `server_branches` order is the tie-break order. The only error is an empty
/// branch name.
pub fn elect<R: RefRepository + ?Sized>(
    local_branch: &str,
    repo: &R,
    server_branches: &[ServerBranch],
    options: &ElectOptions,
) -> Result<Election, ElectionError> {
    if local_branch.trim().is_empty() {
        return Err(ElectionError::EmptyBranchName);
    }
    if server_branches.is_empty() {
        return Ok(Election::NoMatch);
    }

    if let Some(branch) = exact_match(local_branch, repo, server_branches) {
        tracing::debug!(%branch, "Elected server branch by exact name");
        return Ok(Election::Exact {
            branch: branch.to_string(),
        });
    }

    let main = server_branches.iter().find(|b| b.is_main);

    let cache = match load_commits_cache(repo, &options.walk) {
        CacheState::Ready(cache) => cache,
        CacheState::Unavailable if options.fallback_to_main_when_unavailable => {
            return Ok(main_fallback(main));
        }
        CacheState::Unavailable => {
            tracing::debug!("Repository unreadable, no branch elected");
            return Ok(Election::NoMatch);
        }
    };

    match local_chain(local_branch, repo, &cache, &options.walk) {
        Some(local) => {
            if let Some((candidate, distance)) =
                closest_candidate(&local, &cache, server_branches, main, options.main_wins_ties)
            {
                tracing::debug!(branch = %candidate.name, distance, "Elected closest server branch");
                return Ok(Election::Closest {
                    branch: candidate.name.clone(),
                    distance,
                });
            }
        }
        None => tracing::debug!(local_branch, "Local ancestry unknown"),
    }

    Ok(main_fallback(main))
}

/// Distance from the local tip to the most recent local commit that is also
/// part of `candidate`'s history. `None` when nothing is shared.
pub fn shared_distance(local: &[CommitId], candidate: &[CommitId]) -> Option<usize> {
    let reachable: HashSet<&CommitId> = candidate.iter().collect();
    local.iter().position(|commit| reachable.contains(commit))
}

fn exact_match<'a, R: RefRepository + ?Sized>(
    local_branch: &str,
    repo: &R,
    server_branches: &'a [ServerBranch],
) -> Option<&'a str> {
    let server = server_branches.iter().find(|b| b.name == local_branch)?;
    match repo.find_local_branch(local_branch) {
        Ok(Some(BranchRef { tip: Some(_), .. })) => Some(server.name.as_str()),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(local_branch, "Unable to resolve local branch: {:#}", e);
            None
        }
    }
}

/// The local branch's chain from the cache, or walked from HEAD when the name
/// is not a local ref.
///
/// A ref that exists but is missing from the cache had an unreadable history;
/// HEAD may be a different branch then, so the ancestry is unknown.
fn local_chain<'c, R: RefRepository + ?Sized>(
    local_branch: &str,
    repo: &R,
    cache: &'c CommitsCache,
    walk: &WalkOptions,
) -> Option<Cow<'c, [CommitId]>> {
    if let Some(chain) = cache.get(local_branch) {
        return Some(Cow::Borrowed(chain));
    }

    match repo.find_local_branch(local_branch) {
        Ok(None) => {}
        Ok(Some(_)) => {
            tracing::warn!(local_branch, "Local branch history is unreadable");
            return None;
        }
        Err(e) => {
            tracing::warn!(local_branch, "Unable to resolve local branch: {:#}", e);
            return None;
        }
    }

    let head = match repo.head_commit() {
        Ok(head) => head?,
        Err(e) => {
            tracing::warn!("Unable to resolve HEAD: {:#}", e);
            return None;
        }
    };

    match walk_chain(repo, &head, walk) {
        Ok(chain) => Some(Cow::Owned(chain)),
        Err(e) => {
            tracing::warn!("Unable to walk history from HEAD: {:#}", e);
            None
        }
    }
}

fn closest_candidate<'a>(
    local: &[CommitId],
    cache: &CommitsCache,
    server_branches: &'a [ServerBranch],
    main: Option<&ServerBranch>,
    main_wins_ties: bool,
) -> Option<(&'a ServerBranch, usize)> {
    let main_distance = main
        .filter(|_| main_wins_ties)
        .and_then(|m| cache.get(&m.name))
        .and_then(|chain| shared_distance(local, chain));

    let mut best: Option<(&ServerBranch, usize)> = None;
    for candidate in server_branches.iter().filter(|b| !b.is_main) {
        let Some(chain) = cache.get(&candidate.name) else {
            continue;
        };
        let Some(distance) = shared_distance(local, chain) else {
            continue;
        };
        if main_distance.is_some_and(|m| distance >= m) {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }
    best
}

fn main_fallback(main: Option<&ServerBranch>) -> Election {
    match main {
        Some(main) => {
            tracing::debug!(branch = %main.name, "Falling back to main server branch");
            Election::MainFallback {
                branch: main.name.clone(),
            }
        }
        None => Election::NoMatch,
    }
}
