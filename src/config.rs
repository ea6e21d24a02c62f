use std::env;
use std::path::PathBuf;

use crate::errors::{Result, TagError};

pub const HOME_ENV: &str = "TAGBOX_HOME";

pub struct AppPaths {
    pub base_dir: PathBuf,
    pub db_path: PathBuf,
    pub repo_dir: PathBuf,
}

impl AppPaths {
    /// `$TAGBOX_HOME` when set, otherwise `~/.tagbox`.
    pub fn new() -> Result<Self> {
        if let Some(base) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Self::from_base(PathBuf::from(base));
        }
        let home = dirs::home_dir()
            .ok_or_else(|| TagError::Config("could not determine home directory".into()))?;
        Self::from_base(home.join(".tagbox"))
    }

    /// Anchors `base` to the current directory so every note path stored
    /// from it is absolute, however the base was spelled.
    pub fn from_base(base: PathBuf) -> Result<Self> {
        let base = std::path::absolute(&base)
            .map_err(|e| TagError::Config(format!("{}: {}", base.display(), e)))?;
        Ok(Self {
            db_path: base.join("tagbox.db"),
            repo_dir: base.join("repo"),
            base_dir: base,
        })
    }
}

/// External programs the front end hands files to.
#[derive(Debug, Clone, PartialEq)]
pub struct Tools {
    pub editor: String,
    pub pager: String,
}

impl Tools {
    pub fn from_env() -> Self {
        Self::resolve(|key| env::var(key).ok())
    }

    fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let first = |keys: &[&str], fallback: &str| {
            keys.iter()
                .filter_map(|&k| lookup(k))
                .find(|v| !v.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        Self {
            editor: first(&["TAGBOX_EDITOR", "VISUAL", "EDITOR"], "nano"),
            pager: first(&["TAGBOX_PAGER", "PAGER"], "less"),
        }
    }
}
