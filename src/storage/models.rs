use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub id: i64,
    pub path: String,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// A tag together with how many files currently carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    pub name: String,
    pub file_count: i64,
}

#[derive(Debug, Serialize)]
pub struct StoreStats {
    pub total_files: i64,
    pub total_tags: i64,
    pub total_links: i64,
    pub orphan_tags: i64,
}
