//! Input options for stripping operations.
//!
//! Analysis takes no options; stripping only needs to know how backups are
//! named.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How the pre-rewrite backup of a file is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupMode {
    /// Always `<file>.py.bak`, replacing a backup left by an earlier run
    #[default]
    Overwrite,
    /// First free name among `<file>.py.bak`, `<file>.py.bak.1`, `<file>.py.bak.2`, ...
    Numbered,
}

impl BackupMode {
    /// Backup path to use for `path` under this mode.
    ///
    /// The original extension is kept and `.bak` appended to it, so
    /// `src/app.py` backs up to `src/app.py.bak`.
    pub fn backup_path(self, path: &Path) -> PathBuf {
        let base = base_backup_path(path);
        match self {
            BackupMode::Overwrite => base,
            BackupMode::Numbered => {
                if !base.exists() {
                    return base;
                }
                let mut n = 1;
                loop {
                    let candidate = numbered(&base, n);
                    if !candidate.exists() {
                        return candidate;
                    }
                    n += 1;
                }
            }
        }
    }
}

fn base_backup_path(path: &Path) -> PathBuf {
    let extension = match path.extension() {
        Some(ext) => format!("{}.bak", ext.to_string_lossy()),
        None => "bak".to_string(),
    };
    path.with_extension(extension)
}

fn numbered(base: &Path, n: usize) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}

impl FromStr for BackupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(BackupMode::Overwrite),
            "numbered" | "versioned" => Ok(BackupMode::Numbered),
            _ => Err(format!("Unknown backup mode: {}", s)),
        }
    }
}

/// Options for [`crate::strip`] and [`crate::strip_directory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripOptions {
    /// Backup naming
    pub backup: BackupMode,
}

impl StripOptions {
    /// Create default options (overwrite backups)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the backup mode
    pub fn backup(mut self, mode: BackupMode) -> Self {
        self.backup = mode;
        self
    }
}
