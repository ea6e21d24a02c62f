use std::io::Write;
use std::path::Path;

use log::warn;
use serde::Serialize;

use crate::errors::{Result, TagError};
use crate::notes;
use crate::storage::TagStore;
use crate::tags::parse_tag_list;

/// What `untag` did with each requested name.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct UntagReport {
    pub removed: Vec<String>,
    pub not_linked: Vec<String>,
    pub unknown: Vec<String>,
}

impl UntagReport {
    pub fn message(&self, name: &str) -> String {
        let mut message = format!("Removed tags [{}] from {}.md", self.removed.join(", "), name);
        if !self.not_linked.is_empty() {
            message.push_str(&format!(" (not linked: {})", self.not_linked.join(", ")));
        }
        if !self.unknown.is_empty() {
            message.push_str(&format!(" (unknown: {})", self.unknown.join(", ")));
        }
        message
    }
}

#[derive(Debug, PartialEq)]
pub enum SearchOutcome {
    NoTags,
    NoMatches,
    Matches(Vec<String>),
}

impl SearchOutcome {
    /// Line shown instead of results, if there are none.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SearchOutcome::NoTags => Some("No tags entered."),
            SearchOutcome::NoMatches => Some("No files found for those tags."),
            SearchOutcome::Matches(_) => None,
        }
    }

    pub fn paths(&self) -> &[String] {
        match self {
            SearchOutcome::Matches(paths) => paths,
            _ => &[],
        }
    }
}

/// Registers the file, then creates and links each tag.
pub fn apply_tags(store: &impl TagStore, key: &str, tags: &[String]) -> Result<()> {
    store.register_file(key)?;
    for tag in tags {
        store.ensure_tag(tag)?;
        store.link_tag(key, tag)?;
    }
    Ok(())
}

/// Resolves a note name to its store key; the note must be on disk.
pub fn existing_note(repo_dir: &Path, name: &str) -> Result<String> {
    notes::validate_name(name)?;
    let path = notes::note_path(repo_dir, name);
    if !path.exists() {
        return Err(TagError::InvalidArgument(format!(
            "{} does not exist in {}",
            name,
            repo_dir.display()
        )));
    }
    Ok(notes::store_key(&path))
}

fn require_tags(raw: &str) -> Result<Vec<String>> {
    let tags = parse_tag_list(raw);
    if tags.is_empty() {
        return Err(TagError::InvalidArgument("no tags given".into()));
    }
    Ok(tags)
}

/// Tags a saved note after the editor closes. `None` means it was not saved.
pub fn finish_new_note(
    store: &impl TagStore,
    path: &Path,
    raw: &str,
) -> Result<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }
    let tags = parse_tag_list(raw);
    apply_tags(store, &notes::store_key(path), &tags)?;
    Ok(Some(tags))
}

pub fn tag_note(store: &impl TagStore, repo_dir: &Path, name: &str, raw: &str) -> Result<Vec<String>> {
    let key = existing_note(repo_dir, name)?;
    let tags = require_tags(raw)?;
    apply_tags(store, &key, &tags)?;
    Ok(tags)
}

/// Unknown tag names are skipped; an unregistered note is an error.
pub fn untag_note(store: &impl TagStore, repo_dir: &Path, name: &str, raw: &str) -> Result<UntagReport> {
    let key = existing_note(repo_dir, name)?;
    let mut report = UntagReport::default();
    for tag in require_tags(raw)? {
        match store.unlink_tag(&key, &tag) {
            Ok(true) => report.removed.push(tag),
            Ok(false) => report.not_linked.push(tag),
            Err(TagError::TagNotFound(_)) => {
                warn!("tag {:?} does not exist, skipping", tag);
                report.unknown.push(tag);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}

pub fn search(store: &impl TagStore, raw: &str) -> Result<SearchOutcome> {
    let tags = parse_tag_list(raw);
    if tags.is_empty() {
        return Ok(SearchOutcome::NoTags);
    }
    let names: Vec<&str> = tags.iter().map(String::as_str).collect();
    let matches = store.find_files_by_any_tag(&names)?;
    if matches.is_empty() {
        return Ok(SearchOutcome::NoMatches);
    }
    Ok(SearchOutcome::Matches(matches))
}

/// One path per line, for `search --list`.
pub fn write_list(out: &mut impl Write, paths: &[String]) -> Result<()> {
    for path in paths {
        writeln!(out, "{}", path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::SqliteStore;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (SqliteStore, TempDir) {
        let store = SqliteStore::in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("repo")).unwrap();
        (store, dir)
    }

    fn write_note(dir: &TempDir, name: &str) -> String {
        let path = notes::note_path(&dir.path().join("repo"), name);
        fs::write(&path, "body").unwrap();
        notes::store_key(&path)
    }

    // --- tag ---

    #[test]
    fn test_tag_registers_note_on_disk() {
        let (store, dir) = setup();
        let key = write_note(&dir, "ideas");
        let repo = dir.path().join("repo");

        let tags = tag_note(&store, &repo, "ideas", " rust, work ,rust").unwrap();
        assert_eq!(tags, vec!["rust", "work"]);
        assert_eq!(store.tags_for_file(&key).unwrap(), vec!["rust", "work"]);
    }

    #[test]
    fn test_tag_missing_note_rejected() {
        let (store, dir) = setup();
        let result = tag_note(&store, &dir.path().join("repo"), "ghost", "a");
        assert!(matches!(result, Err(TagError::InvalidArgument(_))));
        assert_eq!(store.stats().unwrap().total_files, 0);
    }

    #[test]
    fn test_tag_and_untag_need_tags() {
        let (store, dir) = setup();
        write_note(&dir, "ideas");
        let repo = dir.path().join("repo");
        assert!(matches!(tag_note(&store, &repo, "ideas", " , ,"), Err(TagError::InvalidArgument(_))));
        assert!(matches!(untag_note(&store, &repo, "ideas", ""), Err(TagError::InvalidArgument(_))));
    }

    // --- untag ---

    #[test]
    fn test_untag_sorts_outcomes() {
        let (store, dir) = setup();
        write_note(&dir, "ideas");
        let repo = dir.path().join("repo");
        tag_note(&store, &repo, "ideas", "keep, drop").unwrap();
        store.ensure_tag("idle").unwrap();

        let report = untag_note(&store, &repo, "ideas", "drop, idle, ghost").unwrap();
        assert_eq!(
            report,
            UntagReport {
                removed: vec!["drop".into()],
                not_linked: vec!["idle".into()],
                unknown: vec!["ghost".into()],
            }
        );
        assert_eq!(
            report.message("ideas"),
            "Removed tags [drop] from ideas.md (not linked: idle) (unknown: ghost)"
        );
    }

    #[test]
    fn test_untag_unregistered_note_fails() {
        let (store, dir) = setup();
        write_note(&dir, "loose");
        store.ensure_tag("a").unwrap();
        let result = untag_note(&store, &dir.path().join("repo"), "loose", "a");
        assert!(matches!(result, Err(TagError::FileNotFound(_))));
    }

    // --- new ---

    #[test]
    fn test_finish_new_note() {
        let (store, dir) = setup();
        let path = notes::create_note(&dir.path().join("repo"), "draft.rs").unwrap();

        let tags = finish_new_note(&store, &path, "a,b").unwrap();
        assert_eq!(tags, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(store.find_files_by_any_tag(&["b"]).unwrap(), vec![notes::store_key(&path)]);
    }

    #[test]
    fn test_finish_new_note_unsaved() {
        let (store, dir) = setup();
        let path = notes::note_path(&dir.path().join("repo"), "never");
        assert_eq!(finish_new_note(&store, &path, "a").unwrap(), None);
        assert_eq!(store.stats().unwrap().total_files, 0);
    }

    #[test]
    fn test_finish_new_note_without_tags_still_registers() {
        let (store, dir) = setup();
        let path = notes::create_note(&dir.path().join("repo"), "plain").unwrap();
        assert_eq!(finish_new_note(&store, &path, "  ").unwrap(), Some(vec![]));
        assert_eq!(store.stats().unwrap().total_files, 1);
    }

    // --- search ---

    #[test]
    fn test_search_outcomes() {
        let (store, dir) = setup();
        write_note(&dir, "a");
        tag_note(&store, &dir.path().join("repo"), "a", "x").unwrap();

        let none = search(&store, " , ").unwrap();
        assert_eq!(none, SearchOutcome::NoTags);
        assert_eq!(none.message(), Some("No tags entered."));

        let miss = search(&store, "y").unwrap();
        assert_eq!(miss.message(), Some("No files found for those tags."));
        assert!(miss.paths().is_empty());

        let hit = search(&store, "y, x").unwrap();
        assert_eq!(hit.message(), None);
        assert_eq!(hit.paths().len(), 1);
    }

    #[test]
    fn test_write_list() {
        let mut out = Vec::new();
        write_list(&mut out, &["/r/a.md".to_string(), "/r/b.md".to_string()]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/r/a.md\n/r/b.md\n");
    }
}
