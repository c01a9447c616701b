//! Display recent log entries from the application.

use anyhow::anyhow;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::logging::{get_log_dir, LOG_FILE_PREFIX};

const DEFAULT_LINES: usize = 50;

/// Prints the tail of the most recent log file.
///
/// # Errors
/// - If the log directory cannot be determined or read
/// - If the log file cannot be read
pub fn handle_logs() -> anyhow::Result<()> {
    let log_dir = get_log_dir()?;

    if !log_dir.exists() {
        println!("Log directory does not exist yet: {}", log_dir.display());
        println!("Logs will be created when siriwave runs.");
        return Ok(());
    }

    let Some(log_file) = find_latest_log(&log_dir)? else {
        println!("No log files found in: {}", log_dir.display());
        return Ok(());
    };

    let content =
        fs::read_to_string(&log_file).map_err(|e| anyhow!("Failed to read log file: {e}"))?;
    if content.is_empty() {
        println!("Log file is empty: {}", log_file.display());
        return Ok(());
    }

    let (total, tail) = tail_lines(&content, DEFAULT_LINES);
    if tail.len() < total {
        println!("Showing last {} of {} lines:", tail.len(), total);
    } else {
        println!("Showing all {total} lines:");
    }
    println!("Full log file at: {}", log_file.display());
    println!();

    for line in tail {
        println!("{line}");
    }

    Ok(())
}

/// Total line count and the last `count` lines.
fn tail_lines(content: &str, count: usize) -> (usize, Vec<&str>) {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(count);
    (lines.len(), lines[start..].to_vec())
}

/// Most recently modified log file in `log_dir`, if any.
fn find_latest_log(log_dir: &Path) -> anyhow::Result<Option<PathBuf>> {
    let entries =
        fs::read_dir(log_dir).map_err(|e| anyhow!("Failed to read log directory: {e}"))?;

    let mut latest: Option<(PathBuf, SystemTime)> = None;
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX));
        if !is_log {
            continue;
        }

        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if latest.as_ref().map_or(true, |(_, newest)| modified > *newest) {
            latest = Some((path, modified));
        }
    }

    Ok(latest.map(|(path, _)| path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_lines() {
        let content = (1..=60).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let (total, tail) = tail_lines(&content, 50);
        assert_eq!(total, 60);
        assert_eq!(tail.len(), 50);
        assert_eq!(tail[0], "line 11");
        assert_eq!(tail[49], "line 60");
    }

    #[test]
    fn test_tail_lines_short_file() {
        let (total, tail) = tail_lines("a\nb", 50);
        assert_eq!(total, 2);
        assert_eq!(tail, vec!["a", "b"]);
    }

    #[test]
    fn test_find_latest_log_ignores_other_files() {
        let dir = std::env::temp_dir().join(format!("siriwave-tail-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        assert!(find_latest_log(&dir).unwrap().is_none());

        fs::write(dir.join("unrelated.txt"), "x").unwrap();
        fs::write(dir.join("siriwave.log.2026-10-19"), "x").unwrap();
        let found = find_latest_log(&dir).unwrap().unwrap();
        assert!(found.ends_with("siriwave.log.2026-10-19"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
