//! branch-elect - match a local git branch to the branch an analysis server knows.
//!
//! Builds a per-branch commit ancestry cache from the repository and elects the
//! server branch sharing the closest history, falling back to the main branch.
//! Repository read failures degrade the result; they never surface as errors.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;

pub use config::ElectionConfig;
pub use domain::{
    build_commits_cache, elect, elect_server_branch, load_commits_cache, CacheState, CommitId,
    CommitsCache, ElectOptions, Election, ElectionError, ServerBranch, WalkMode, WalkOptions,
};
pub use ports::RefRepository;
