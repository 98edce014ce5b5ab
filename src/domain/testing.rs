//! In-memory repository fake for domain tests.

use super::types::{BranchRef, CommitId};
use crate::ports::RefRepository;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct FakeRepo {
    parents: HashMap<String, Vec<String>>,
    branches: Vec<(String, Option<String>)>,
    head: Option<String>,
    unreadable: HashSet<String>,
    refs_fail: bool,
    listing_fails: bool,
    lookup_fails: bool,
    head_fails: bool,
}

impl FakeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(mut self, id: &str, parents: &[&str]) -> Self {
        self.parents
            .insert(id.to_string(), parents.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn branch(mut self, name: &str, tip: &str) -> Self {
        self.branches.push((name.to_string(), Some(tip.to_string())));
        self
    }

    pub fn dangling_branch(mut self, name: &str) -> Self {
        self.branches.push((name.to_string(), None));
        self
    }

    pub fn head(mut self, commit: &str) -> Self {
        self.head = Some(commit.to_string());
        self
    }

    /// Parent lookups for this commit fail with an I/O-style error.
    pub fn unreadable_commit(mut self, id: &str) -> Self {
        self.unreadable.insert(id.to_string());
        self
    }

    /// Every ref lookup fails, as with a corrupted ref database.
    pub fn failing_refs(mut self) -> Self {
        self.refs_fail = true;
        self
    }

    /// Only full enumeration fails; single-ref lookups still work.
    pub fn failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    /// Only single-ref lookups fail.
    pub fn failing_lookup(mut self) -> Self {
        self.lookup_fails = true;
        self
    }

    pub fn failing_head(mut self) -> Self {
        self.head_fails = true;
        self
    }
}

impl RefRepository for FakeRepo {
    fn local_branches(&self) -> Result<Vec<BranchRef>> {
        if self.refs_fail || self.listing_fails {
            return Err(anyhow!("ref database is unreadable"));
        }
        Ok(self
            .branches
            .iter()
            .map(|(name, tip)| BranchRef::new(name.as_str(), tip.as_deref().map(CommitId::from)))
            .collect())
    }

    fn find_local_branch(&self, name: &str) -> Result<Option<BranchRef>> {
        if self.refs_fail || self.lookup_fails {
            return Err(anyhow!("ref database is unreadable"));
        }
        Ok(self
            .branches
            .iter()
            .find(|(branch, _)| branch == name)
            .map(|(branch, tip)| BranchRef::new(branch.as_str(), tip.as_deref().map(CommitId::from))))
    }

    fn parents(&self, commit: &CommitId) -> Result<Vec<CommitId>> {
        if self.unreadable.contains(commit.as_str()) {
            return Err(anyhow!("failed to read object {}", commit));
        }
        self.parents
            .get(commit.as_str())
            .map(|parents| parents.iter().map(|p| CommitId::from(p.as_str())).collect())
            .ok_or_else(|| anyhow!("object not found: {}", commit))
    }

    fn head_commit(&self) -> Result<Option<CommitId>> {
        if self.head_fails || self.refs_fail {
            return Err(anyhow!("HEAD is unreadable"));
        }
        Ok(self.head.as_deref().map(CommitId::from))
    }
}
