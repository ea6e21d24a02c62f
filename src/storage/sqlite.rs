use std::fs;
use std::path::Path;

use chrono::Utc;
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use super::TagStore;
use super::models::{FileRecord, StoreStats, TagSummary};
use super::schema;
use crate::errors::{Result, TagError};

pub struct SqliteStore {
    conn: Connection,
}

fn require_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TagError::InvalidArgument("file path must not be empty".into()));
    }
    Ok(())
}

fn require_tag_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TagError::InvalidArgument("tag name must not be empty".into()));
    }
    Ok(())
}

fn row_to_file(row: &Row) -> rusqlite::Result<FileRecord> {
    Ok(FileRecord {
        id: row.get(0)?,
        path: row.get(1)?,
        created_at: row.get(2)?,
        tags: Vec::new(),
    })
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| TagError::StorageUnavailable(e.to_string()))?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                TagError::StorageUnavailable(format!("{}: {}", parent.display(), e))
            })?;
        }
        let conn = Connection::open(path)
            .map_err(|e| TagError::StorageUnavailable(format!("{}: {}", path.display(), e)))?;
        Self::new(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| TagError::StorageUnavailable(e.to_string()))?;
        Self::new(conn)
    }

    #[cfg(test)]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn file_id(&self, path: &str) -> Result<i64> {
        self.conn
            .query_row("SELECT id FROM files WHERE path = ?", params![path], |row| row.get(0))
            .optional()?
            .ok_or_else(|| TagError::FileNotFound(path.to_string()))
    }

    fn tag_id(&self, name: &str) -> Result<i64> {
        self.conn
            .query_row("SELECT id FROM tags WHERE name = ?", params![name], |row| row.get(0))
            .optional()?
            .ok_or_else(|| TagError::TagNotFound(name.to_string()))
    }

    fn tag_names(&self, file_id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT t.name FROM tags t
             JOIN file_tags ft ON ft.tag_id = t.id
             WHERE ft.file_id = ?
             ORDER BY t.name",
        )?;
        let names = stmt
            .query_map(params![file_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Resolves the file before the tag so a missing file always wins.
    fn resolve_pair(&self, path: &str, name: &str) -> Result<(i64, i64)> {
        require_path(path)?;
        require_tag_name(name)?;
        let file_id = self.file_id(path)?;
        let tag_id = self.tag_id(name)?;
        Ok((file_id, tag_id))
    }
}

impl TagStore for SqliteStore {
    fn initialize(&self) -> Result<()> {
        for statement in schema::ALL {
            self.conn
                .execute(statement, [])
                .map_err(|e| TagError::StorageUnavailable(e.to_string()))?;
        }
        info!("tag store schema ready");
        Ok(())
    }

    fn register_file(&self, path: &str) -> Result<()> {
        require_path(path)?;
        let changes = self.conn.execute(
            "INSERT OR IGNORE INTO files (path, created_at) VALUES (?, ?)",
            params![path, Utc::now()],
        )?;
        debug!("register_file {:?} (new: {})", path, changes > 0);
        Ok(())
    }

    fn ensure_tag(&self, name: &str) -> Result<()> {
        require_tag_name(name)?;
        let changes = self.conn.execute(
            "INSERT OR IGNORE INTO tags (name, created_at) VALUES (?, ?)",
            params![name, Utc::now()],
        )?;
        debug!("ensure_tag {:?} (new: {})", name, changes > 0);
        Ok(())
    }

    fn link_tag(&self, path: &str, name: &str) -> Result<bool> {
        let (file_id, tag_id) = self.resolve_pair(path, name)?;
        let changes = self.conn.execute(
            "INSERT OR IGNORE INTO file_tags (file_id, tag_id) VALUES (?, ?)",
            params![file_id, tag_id],
        )?;
        debug!("link_tag {:?} -> {:?} (changed: {})", path, name, changes > 0);
        Ok(changes > 0)
    }

    fn unlink_tag(&self, path: &str, name: &str) -> Result<bool> {
        let (file_id, tag_id) = self.resolve_pair(path, name)?;
        let changes = self.conn.execute(
            "DELETE FROM file_tags WHERE file_id = ? AND tag_id = ?",
            params![file_id, tag_id],
        )?;
        debug!("unlink_tag {:?} -> {:?} (changed: {})", path, name, changes > 0);
        Ok(changes > 0)
    }

    fn find_files_by_any_tag(&self, names: &[&str]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        for name in names {
            require_tag_name(name)?;
        }

        // Only the placeholder list is generated; every name is bound.
        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "SELECT DISTINCT f.path
             FROM files f
             JOIN file_tags ft ON ft.file_id = f.id
             JOIN tags t ON t.id = ft.tag_id
             WHERE t.name IN ({})
             ORDER BY f.path",
            placeholders
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let paths = stmt
            .query_map(params_from_iter(names.iter()), |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        debug!("find_files_by_any_tag {:?}: {} match(es)", names, paths.len());
        Ok(paths)
    }

    fn tags_for_file(&self, path: &str) -> Result<Vec<String>> {
        require_path(path)?;
        let file_id = self.file_id(path)?;
        self.tag_names(file_id)
    }

    fn list_tags(&self) -> Result<Vec<TagSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.name, COUNT(ft.file_id)
             FROM tags t
             LEFT JOIN file_tags ft ON ft.tag_id = t.id
             GROUP BY t.id
             ORDER BY t.name",
        )?;
        let tags = stmt
            .query_map([], |row| {
                Ok(TagSummary {
                    name: row.get(0)?,
                    file_count: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn list_files(&self) -> Result<Vec<FileRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, path, created_at FROM files ORDER BY path")?;
        let mut files = stmt
            .query_map([], row_to_file)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for file in &mut files {
            file.tags = self.tag_names(file.id)?;
        }
        Ok(files)
    }

    fn stats(&self) -> Result<StoreStats> {
        self.conn
            .query_row(
                "SELECT
                    (SELECT COUNT(*) FROM files),
                    (SELECT COUNT(*) FROM tags),
                    (SELECT COUNT(*) FROM file_tags),
                    (SELECT COUNT(*) FROM tags WHERE id NOT IN (SELECT tag_id FROM file_tags))",
                [],
                |row| {
                    Ok(StoreStats {
                        total_files: row.get(0)?,
                        total_tags: row.get(1)?,
                        total_links: row.get(2)?,
                        orphan_tags: row.get(3)?,
                    })
                },
            )
            .map_err(TagError::Storage)
    }
}
