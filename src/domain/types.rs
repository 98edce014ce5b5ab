//! Pure data types for the branch election domain.
//! No I/O.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Opaque commit identifier (a full object hash for git).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommitId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A local branch ref as listed by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    /// Short name, e.g. `feature/login`.
    pub name: String,
    /// Tip commit. `None` when the ref does not point at a commit.
    pub tip: Option<CommitId>,
}

impl BranchRef {
    pub fn new(name: impl Into<String>, tip: Option<CommitId>) -> Self {
        Self {
            name: name.into(),
            tip,
        }
    }
}

/// A branch known to the analysis server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ServerBranch {
    pub name: String,
    pub is_main: bool,
}

impl ServerBranch {
    pub fn new(name: impl Into<String>, is_main: bool) -> Self {
        Self {
            name: name.into(),
            is_main,
        }
    }

    pub fn main(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }
}

/// Branch name → ancestry chain, tip first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommitsCache {
    chains: HashMap<String, Vec<CommitId>>,
}

impl CommitsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, branch: String, chain: Vec<CommitId>) {
        self.chains.insert(branch, chain);
    }

    pub fn get(&self, branch: &str) -> Option<&[CommitId]> {
        self.chains.get(branch).map(Vec::as_slice)
    }

    pub fn contains(&self, branch: &str) -> bool {
        self.chains.contains_key(branch)
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Branch names sorted lexically.
    pub fn branch_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.chains.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn into_map(self) -> HashMap<String, Vec<CommitId>> {
        self.chains
    }
}

/// Outcome of loading the cache: either a usable mapping or an explicit marker
/// that the ref database could not be read at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    Ready(CommitsCache),
    Unavailable,
}

impl CacheState {
    pub fn is_available(&self) -> bool {
        matches!(self, CacheState::Ready(_))
    }

    /// Best-effort view: an unavailable cache reads as empty.
    pub fn unwrap_or_default(self) -> CommitsCache {
        match self {
            CacheState::Ready(cache) => cache,
            CacheState::Unavailable => CommitsCache::default(),
        }
    }
}

/// Which tier of the election produced the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tier", rename_all = "kebab-case")]
pub enum Election {
    /// Local branch name matches a server branch.
    Exact { branch: String },
    /// Non-main server branch sharing the closest history.
    Closest { branch: String, distance: usize },
    /// Main server branch used as a fallback.
    MainFallback { branch: String },
    NoMatch,
}

impl Election {
    pub fn branch(&self) -> Option<&str> {
        match self {
            Election::Exact { branch }
            | Election::Closest { branch, .. }
            | Election::MainFallback { branch } => Some(branch),
            Election::NoMatch => None,
        }
    }

    pub fn into_branch(self) -> Option<String> {
        match self {
            Election::Exact { branch }
            | Election::Closest { branch, .. }
            | Election::MainFallback { branch } => Some(branch),
            Election::NoMatch => None,
        }
    }

    pub fn tier_name(&self) -> &'static str {
        match self {
            Election::Exact { .. } => "exact",
            Election::Closest { .. } => "closest",
            Election::MainFallback { .. } => "main-fallback",
            Election::NoMatch => "no-match",
        }
    }
}

impl fmt::Display for Election {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Election::Exact { branch } => write!(f, "{} (exact name)", branch),
            Election::Closest { branch, distance } => write!(
                f,
                "{} ({} commit{} from local tip)",
                branch,
                distance,
                if *distance == 1 { "" } else { "s" }
            ),
            Election::MainFallback { branch } => write!(f, "{} (main branch)", branch),
            Election::NoMatch => f.write_str("no match"),
        }
    }
}
