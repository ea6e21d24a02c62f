use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::errors::{Result, TagError};

/// Splits a configured command line such as `code -w` into program and args.
fn split_command(command_line: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = command_line.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// Runs the editor on `path` with the terminal attached and waits for it.
pub fn open_in_editor(editor: &str, path: &Path) -> Result<()> {
    let (program, args) = split_command(editor)
        .ok_or_else(|| TagError::Editor("no editor configured".into()))?;
    debug!("launching editor {} on {}", program, path.display());
    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .map_err(|e| TagError::Editor(format!("{}: {}", program, e)))?;
    if !status.success() {
        return Err(TagError::Editor(format!("{} exited with {}", program, status)));
    }
    Ok(())
}

/// Feeds `text` to the pager's stdin and waits until the user quits it.
pub fn page(pager: &str, text: &str) -> Result<()> {
    let (program, args) = split_command(pager)
        .ok_or_else(|| TagError::Pager("no pager configured".into()))?;
    debug!("piping {} bytes to {}", text.len(), program);
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| TagError::Pager(format!("{}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        // Quitting the pager early closes the pipe; that is not a failure.
        match stdin.write_all(text.as_bytes()) {
            Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                return Err(TagError::Pager(e.to_string()));
            }
            _ => {}
        }
    }

    let status = child
        .wait()
        .map_err(|e| TagError::Pager(format!("{}: {}", program, e)))?;
    if !status.success() {
        return Err(TagError::Pager(format!("{} exited with {}", program, status)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("nano"), Some(("nano", vec![])));
        assert_eq!(split_command("  code -w --new "), Some(("code", vec!["-w", "--new"])));
        assert_eq!(split_command("   "), None);
    }

    #[test]
    fn test_blank_editor_rejected() {
        let result = open_in_editor(" ", Path::new("/tmp/x.md"));
        assert!(matches!(result, Err(TagError::Editor(_))));
    }

    #[test]
    fn test_missing_pager_program() {
        let result = page("tagbox-no-such-pager-binary", "text");
        assert!(matches!(result, Err(TagError::Pager(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_page_through_cat() {
        page("cat", "=== a ===\n\nbody\n\n").unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_failure_status() {
        let result = open_in_editor("false", Path::new("/tmp/x.md"));
        assert!(matches!(result, Err(TagError::Editor(_))));
    }
}
