pub mod ancestry;
pub mod election;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use ancestry::{build_commits_cache, load_commits_cache, walk_chain, WalkMode, WalkOptions};
pub use election::{elect, elect_server_branch, shared_distance, ElectOptions, ElectionError};
pub use types::*;
