pub mod models;
pub mod schema;
pub mod sqlite;

use crate::errors::Result;
use models::{FileRecord, StoreStats, TagSummary};

/// Many-to-many index between registered file paths and tag names.
///
/// Registration is explicit: `link_tag` and `unlink_tag` never create rows,
/// so callers run `register_file` and `ensure_tag` first.
pub trait TagStore {
    fn initialize(&self) -> Result<()>;
    fn register_file(&self, path: &str) -> Result<()>;
    fn ensure_tag(&self, name: &str) -> Result<()>;
    /// Returns `true` when a new link was written.
    fn link_tag(&self, path: &str, name: &str) -> Result<bool>;
    /// Returns `true` when an existing link was removed.
    fn unlink_tag(&self, path: &str, name: &str) -> Result<bool>;
    /// Paths linked to at least one of `names`, each once, sorted by path.
    fn find_files_by_any_tag(&self, names: &[&str]) -> Result<Vec<String>>;
    fn tags_for_file(&self, path: &str) -> Result<Vec<String>>;
    fn list_tags(&self) -> Result<Vec<TagSummary>>;
    fn list_files(&self) -> Result<Vec<FileRecord>>;
    fn stats(&self) -> Result<StoreStats>;
}
