//! Election settings, loaded from TOML.
//!
//! Lookup order: explicit path > `BRANCH_ELECT_CONFIG` > `<config dir>/branch-elect/config.toml`
//! > built-in defaults.

use crate::domain::{ElectOptions, WalkMode, WalkOptions};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "BRANCH_ELECT_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElectionConfig {
    /// Which parent links an ancestry walk follows.
    pub walk: WalkMode,
    /// Maximum chain length per branch. `None` walks to the root commit.
    pub max_depth: Option<usize>,
    /// A non-main branch only wins when strictly closer than main.
    pub main_wins_ties: bool,
    /// Fall back to main when the ref database cannot be read at all.
    pub fallback_to_main_when_unavailable: bool,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            walk: WalkMode::FirstParent,
            max_depth: None,
            main_wins_ties: true,
            fallback_to_main_when_unavailable: false,
        }
    }
}

impl ElectionConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("Invalid election config")
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("In {}", path.display()))
    }

    /// Resolve the config the way the binary does.
    ///
    /// An explicit or env-provided file must parse; the default-location file
    /// is optional and ignored with a warning when malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        if let Ok(value) = std::env::var(CONFIG_ENV) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Self::load_file(Path::new(trimmed));
            }
        }

        if let Some(path) = default_config_path().filter(|p| p.is_file()) {
            match Self::load_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!("Ignoring config {}: {:#}", path.display(), e),
            }
        }

        Ok(Self::default())
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            mode: self.walk,
            max_depth: self.max_depth,
        }
    }

    pub fn elect_options(&self) -> ElectOptions {
        ElectOptions {
            walk: self.walk_options(),
            main_wins_ties: self.main_wins_ties,
            fallback_to_main_when_unavailable: self.fallback_to_main_when_unavailable,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("branch-elect").join("config.toml"))
}
