//! Commentary statistics for a file or a batch of files.
//!
//! Line counts follow the EOF convention: the total includes one synthetic
//! line for end-of-file, so `total_line_count = lines + 1` and an empty
//! file has a total of 1. Letter counts are character counts.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

use crate::classify::CommentaryMap;

/// Commentary density measurements.
///
/// Ratios are percentages in `[0, 100]` and are always recomputed from the
/// counts, never summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Lines carrying commentary
    pub comment_line_count: usize,
    /// Physical lines plus one for end-of-file
    pub total_line_count: usize,
    /// `comment_line_count / total_line_count * 100`
    pub comment_line_ratio: f64,
    /// Characters of distinct commentary content
    pub comment_letter_count: usize,
    /// Characters in the whole file
    pub total_letter_count: usize,
    /// `comment_letter_count / total_letter_count * 100`
    pub comment_letter_ratio: f64,
}

/// Total line count of a source text under the EOF convention.
pub fn total_lines(content: &str) -> usize {
    content.lines().count() + 1
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 100.0).clamp(0.0, 100.0)
}

impl Statistics {
    /// Build statistics from raw counts, deriving both ratios.
    pub fn from_counts(
        comment_line_count: usize,
        total_line_count: usize,
        comment_letter_count: usize,
        total_letter_count: usize,
    ) -> Self {
        Self {
            comment_line_count,
            total_line_count,
            comment_line_ratio: percentage(comment_line_count, total_line_count),
            comment_letter_count,
            total_letter_count,
            comment_letter_ratio: percentage(comment_letter_count, total_letter_count),
        }
    }

    /// Compute statistics for one file from its commentary map and raw content.
    pub fn compute(commentary: &CommentaryMap, content: &str) -> Self {
        Self::from_counts(
            commentary.len(),
            total_lines(content),
            commentary.letter_count(),
            content.chars().count(),
        )
    }
}

impl Add for Statistics {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::from_counts(
            self.comment_line_count + other.comment_line_count,
            self.total_line_count + other.total_line_count,
            self.comment_letter_count + other.comment_letter_count,
            self.total_letter_count + other.total_letter_count,
        )
    }
}

impl AddAssign for Statistics {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Commentary, CommentaryKind};

    #[test]
    fn empty_file() {
        let stats = Statistics::compute(&CommentaryMap::new(), "");

        assert_eq!(stats.total_line_count, 1);
        assert_eq!(stats.comment_line_ratio, 0.0);
        assert_eq!(stats.comment_letter_ratio, 0.0);
        assert_eq!(stats.total_letter_count, 0);
    }

    #[test]
    fn ratios_from_map() {
        let content = "# c\nx = 1\n";
        let mut map = CommentaryMap::new();
        map.insert(1, Commentary::new("# c", CommentaryKind::Comment, 0));

        let stats = Statistics::compute(&map, content);

        assert_eq!(stats.comment_line_count, 1);
        assert_eq!(stats.total_line_count, 3);
        assert!((stats.comment_line_ratio - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.comment_letter_count, 3);
        assert_eq!(stats.total_letter_count, 10);
        assert!((stats.comment_letter_ratio - 30.0).abs() < 1e-9);
    }

    #[test]
    fn letters_are_characters_not_bytes() {
        let content = "# 注释\n";
        let mut map = CommentaryMap::new();
        map.insert(1, Commentary::new("# 注释", CommentaryKind::Comment, 0));

        let stats = Statistics::compute(&map, content);

        assert_eq!(stats.comment_letter_count, 4);
        assert_eq!(stats.total_letter_count, 5);
    }

    #[test]
    fn sums_recompute_ratios() {
        let a = Statistics::from_counts(1, 4, 10, 100);
        let b = Statistics::from_counts(3, 4, 30, 100);

        let mut total = a;
        total += b;

        assert_eq!(total.comment_line_count, 4);
        assert_eq!(total.total_line_count, 8);
        assert!((total.comment_line_ratio - 50.0).abs() < 1e-9);
        assert!((total.comment_letter_ratio - 20.0).abs() < 1e-9);
    }

    #[test]
    fn total_lines_convention() {
        assert_eq!(total_lines(""), 1);
        assert_eq!(total_lines("x"), 2);
        assert_eq!(total_lines("x\n"), 2);
        assert_eq!(total_lines("x\n\n"), 3);
    }
}
