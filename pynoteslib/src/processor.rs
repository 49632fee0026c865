//! File-level entry points: analyze or strip one file or a directory tree.
//!
//! Single-file operations return errors directly. Directory operations
//! isolate failures per file: a file that cannot be read, decoded or backed
//! up is recorded as a [`FileFailure`] and the batch moves on.

use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::analyze_source;
use crate::error::PynotesError;
use crate::filter::{discover_files, is_python_file, FilterConfig};
use crate::options::StripOptions;
use crate::report::{BatchReport, FileFailure, FileReport, StripReport};
use crate::rewrite::strip_source;
use crate::Result;

/// Read a Python source file as UTF-8 text.
pub fn read_source(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PynotesError::PathNotFound(path.to_path_buf()));
    }
    if !is_python_file(path) {
        return Err(PynotesError::NotPythonFile(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| PynotesError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes).map_err(|source| PynotesError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Analyze a single file.
///
/// # Example
///
/// ```rust
/// use pynoteslib::analyze;
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// let file = dir.path().join("app.py");
/// fs::write(&file, "# setup\nx = 1\n").unwrap();
///
/// let report = analyze(&file).unwrap();
/// assert_eq!(report.comment_line_count, 1);
/// assert_eq!(report.total_line_count, 3);
/// ```
pub fn analyze(path: impl AsRef<Path>) -> Result<FileReport> {
    let path = path.as_ref();
    let content = read_source(path)?;
    let analysis = analyze_source(&content);
    log::debug!("{}: analyzed via {}", path.display(), analysis.path);
    Ok(FileReport::from_analysis(path, &analysis))
}

/// Strip commentary from a single file in place.
///
/// The original content is always copied to the backup path first; if
/// that copy fails the file is left untouched. The file is only rewritten
/// when stripping changes it.
///
/// # Example
///
/// ```rust
/// use pynoteslib::{strip, StripOptions};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// let file = dir.path().join("app.py");
/// fs::write(&file, "x = 1  # note\n").unwrap();
///
/// let report = strip(&file, &StripOptions::new()).unwrap();
/// assert_eq!(report.removed, 1);
/// assert_eq!(fs::read_to_string(&file).unwrap(), "x = 1\n");
/// assert_eq!(fs::read_to_string(&report.backup).unwrap(), "x = 1  # note\n");
/// ```
pub fn strip(path: impl AsRef<Path>, options: &StripOptions) -> Result<StripReport> {
    let path = path.as_ref();
    let content = read_source(path)?;
    let result = strip_source(&content);

    let backup = backup_file(path, options)?;

    if result.content != content {
        fs::write(path, &result.content).map_err(|source| PynotesError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "{}: rewrote {} of {} lines",
            path.display(),
            result.removed,
            result.total
        );
    } else {
        log::info!("{}: no commentary to remove", path.display());
    }

    Ok(StripReport {
        path: path.to_path_buf(),
        removed: result.removed,
        total: result.total,
        backup,
    })
}

fn backup_file(path: &Path, options: &StripOptions) -> Result<PathBuf> {
    let backup = options.backup.backup_path(path);
    fs::copy(path, &backup).map_err(|source| PynotesError::Backup {
        path: path.to_path_buf(),
        backup: backup.clone(),
        source,
    })?;
    log::info!("{}: backed up to {}", path.display(), backup.display());
    Ok(backup)
}

fn run_batch<T>(
    root: &Path,
    filter: &FilterConfig,
    mut process: impl FnMut(&Path) -> Result<T>,
) -> Result<BatchReport<T>> {
    let files = discover_files(root, filter)?;
    let mut batch = BatchReport::new();

    for file in files {
        match process(&file) {
            Ok(report) => batch.files.push(report),
            Err(e) => {
                log::warn!("skipping {}: {e}", file.display());
                batch.failures.push(FileFailure::new(&file, &e));
            }
        }
    }

    Ok(batch)
}

/// Analyze every Python file under `root` that passes `filter`.
///
/// Fails only when `root` itself is missing.
pub fn analyze_directory(
    root: impl AsRef<Path>,
    filter: &FilterConfig,
) -> Result<BatchReport<FileReport>> {
    run_batch(root.as_ref(), filter, |file| analyze(file))
}

/// Strip every Python file under `root` that passes `filter`.
///
/// Fails only when `root` itself is missing.
pub fn strip_directory(
    root: impl AsRef<Path>,
    filter: &FilterConfig,
    options: &StripOptions,
) -> Result<BatchReport<StripReport>> {
    run_batch(root.as_ref(), filter, |file| strip(file, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::BackupMode;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"#!/usr/bin/env python3
"""Module doc."""

import os  # stdlib


def main():
    """
    Entry point.
    """
    path = os.getcwd()
    return path
"#;

    fn create_python_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_analyze_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("app.py");
        create_python_file(&file, SAMPLE);

        let report = analyze(&file).unwrap();
        let lines: Vec<usize> = report.comments.iter().map(|c| c.line).collect();

        assert_eq!(lines, vec![1, 2, 4, 8, 9, 10]);
        assert_eq!(report.total_line_count, 13);
        assert_eq!(report.path, file);
    }

    #[test]
    fn test_analyze_missing_file() {
        let result = analyze("/nonexistent/app.py");

        assert!(matches!(result, Err(PynotesError::PathNotFound(_))));
    }

    #[test]
    fn test_analyze_rejects_non_python() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("notes.txt");
        create_python_file(&file, "# hi\n");

        assert!(matches!(
            analyze(&file),
            Err(PynotesError::NotPythonFile(_))
        ));
    }

    #[test]
    fn test_analyze_rejects_binary() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("blob.py");
        fs::write(&file, [0xff, 0xfe, 0x00, 0x23]).unwrap();

        assert!(matches!(analyze(&file), Err(PynotesError::Decode { .. })));
    }

    #[test]
    fn test_strip_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("app.py");
        create_python_file(&file, SAMPLE);

        let report = strip(&file, &StripOptions::new()).unwrap();
        let stripped = fs::read_to_string(&file).unwrap();

        assert_eq!(report.removed, 6);
        assert_eq!(report.total, 13);
        assert_eq!(report.backup, temp.path().join("app.py.bak"));
        assert_eq!(fs::read_to_string(&report.backup).unwrap(), SAMPLE);
        assert_eq!(stripped.lines().count(), SAMPLE.lines().count());
        assert!(stripped.contains("import os\n"));
        assert!(!stripped.contains("Entry point."));
    }

    #[test]
    fn test_strip_twice_is_stable() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("app.py");
        create_python_file(&file, SAMPLE);

        strip(&file, &StripOptions::new()).unwrap();
        let first = fs::read_to_string(&file).unwrap();
        let report = strip(&file, &StripOptions::new()).unwrap();

        assert_eq!(report.removed, 0);
        assert_eq!(fs::read_to_string(&file).unwrap(), first);
        // the overwrite backup now holds the already stripped content
        assert_eq!(fs::read_to_string(&report.backup).unwrap(), first);
    }

    #[test]
    fn test_numbered_backups_accumulate() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("app.py");
        create_python_file(&file, SAMPLE);
        let options = StripOptions::new().backup(BackupMode::Numbered);

        let first = strip(&file, &options).unwrap();
        let second = strip(&file, &options).unwrap();

        assert_eq!(first.backup, temp.path().join("app.py.bak"));
        assert_eq!(second.backup, temp.path().join("app.py.bak.1"));
        assert_eq!(fs::read_to_string(&first.backup).unwrap(), SAMPLE);
    }

    #[test]
    fn test_backup_failure_leaves_file_untouched() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("app.py");
        create_python_file(&file, SAMPLE);
        // a directory in the way of the backup
        fs::create_dir(temp.path().join("app.py.bak")).unwrap();

        let result = strip(&file, &StripOptions::new());

        assert!(matches!(result, Err(PynotesError::Backup { .. })));
        assert_eq!(fs::read_to_string(&file).unwrap(), SAMPLE);
    }

    #[test]
    fn test_analyze_directory_isolates_failures() {
        let temp = tempdir().unwrap();
        create_python_file(&temp.path().join("a.py"), "# a\n");
        create_python_file(&temp.path().join("pkg/b.py"), "x = 1\n");
        fs::write(temp.path().join("pkg/c.py"), [0xff, 0xfe]).unwrap();

        let batch = analyze_directory(temp.path(), &FilterConfig::new()).unwrap();

        assert_eq!(batch.files.len(), 2);
        assert_eq!(batch.failures.len(), 1);
        assert!(batch.failures[0].path.ends_with("pkg/c.py"));
        assert_eq!(batch.totals().comment_line_count, 1);
    }

    #[test]
    fn test_strip_directory() {
        let temp = tempdir().unwrap();
        create_python_file(&temp.path().join("a.py"), "# a\nx = 1\n");
        create_python_file(&temp.path().join("pkg/b.py"), "y = 2  # b\n");

        let batch =
            strip_directory(temp.path(), &FilterConfig::new(), &StripOptions::new()).unwrap();

        assert_eq!(batch.files.len(), 2);
        assert_eq!(batch.removed(), 2);
        assert_eq!(
            fs::read_to_string(temp.path().join("pkg/b.py")).unwrap(),
            "y = 2\n"
        );
        assert!(temp.path().join("a.py.bak").exists());

        // backups are never picked up as sources on the next run
        let again =
            strip_directory(temp.path(), &FilterConfig::new(), &StripOptions::new()).unwrap();
        assert_eq!(again.files.len(), 2);
        assert_eq!(again.removed(), 0);
    }

    #[test]
    fn test_directory_missing_root() {
        let result = analyze_directory("/nonexistent/dir", &FilterConfig::new());

        assert!(matches!(result, Err(PynotesError::PathNotFound(_))));
    }
}
