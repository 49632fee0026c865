//! Report records handed to renderers.
//!
//! These are plain serializable data: the CLI renders them as tables or
//! JSON, library users can consume them directly.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::classify::Analysis;
use crate::error::PynotesError;
use crate::stats::Statistics;

/// One commentary line in a [`FileReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    pub line: usize,
    pub content: String,
}

/// Commentary found in one file, with density statistics.
///
/// Ratios are percentages rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub comments: Vec<CommentRecord>,
    pub comment_line_count: usize,
    pub total_line_count: usize,
    pub comment_line_ratio: f64,
    pub comment_letter_count: usize,
    pub total_letter_count: usize,
    pub comment_letter_ratio: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl FileReport {
    /// Build the report for `path` from its analysis.
    pub fn from_analysis(path: impl Into<PathBuf>, analysis: &Analysis) -> Self {
        let stats = analysis.stats;
        Self {
            path: path.into(),
            comments: analysis
                .commentary
                .iter()
                .map(|(line, c)| CommentRecord {
                    line,
                    content: c.content.clone(),
                })
                .collect(),
            comment_line_count: stats.comment_line_count,
            total_line_count: stats.total_line_count,
            comment_line_ratio: round2(stats.comment_line_ratio),
            comment_letter_count: stats.comment_letter_count,
            total_letter_count: stats.total_letter_count,
            comment_letter_ratio: round2(stats.comment_letter_ratio),
        }
    }

    /// The counts of this report as unrounded [`Statistics`].
    pub fn statistics(&self) -> Statistics {
        Statistics::from_counts(
            self.comment_line_count,
            self.total_line_count,
            self.comment_letter_count,
            self.total_letter_count,
        )
    }
}

/// Outcome of stripping one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StripReport {
    pub path: PathBuf,
    /// Lines rewritten (emptied or cut back to their code)
    pub removed: usize,
    /// Total line count, EOF convention
    pub total: usize,
    /// Where the original content was saved
    pub backup: PathBuf,
}

/// A file that could not be processed in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

impl FileFailure {
    pub fn new(path: &Path, error: &PynotesError) -> Self {
        Self {
            path: path.to_path_buf(),
            error: error.to_string(),
        }
    }
}

/// Results of processing every discovered file under a directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport<T> {
    pub files: Vec<T>,
    pub failures: Vec<FileFailure>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl BatchReport<FileReport> {
    /// Statistics summed over every successfully analyzed file.
    pub fn totals(&self) -> Statistics {
        self.files
            .iter()
            .fold(Statistics::default(), |acc, f| acc + f.statistics())
    }
}

impl BatchReport<StripReport> {
    /// Lines rewritten across the batch.
    pub fn removed(&self) -> usize {
        self.files.iter().map(|f| f.removed).sum()
    }
}
