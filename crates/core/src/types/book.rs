//! Audiobook and chapter domain models

use crate::types::Validator;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

/// Opaque stable identifier for an audiobook
///
/// Identifier assignment is owned by the library; this layer only
/// compares and forwards ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(String);

impl BookId {
    /// Creates a BookId from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Where the audio content for a book lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceLocator {
    /// Local file path
    Path(PathBuf),
    /// Remote or scheme-qualified URI
    Uri(String),
}

/// Represents a chapter marker within an audiobook
///
/// `end_time_ms == 0` marks an open-ended chapter that extends to the
/// end of the content. At most one chapter may be open-ended and it
/// must be the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter number (1-based, unique per book)
    pub number: u32,
    /// Chapter title
    pub title: String,
    /// Start time in milliseconds
    pub start_time_ms: u64,
    /// End time in milliseconds (exclusive), 0 for open-ended
    pub end_time_ms: u64,
}

impl Chapter {
    /// Creates a new chapter
    pub fn new(number: u32, title: impl Into<String>, start_time_ms: u64, end_time_ms: u64) -> Self {
        Self {
            number,
            title: title.into(),
            start_time_ms,
            end_time_ms,
        }
    }

    /// Returns true if this chapter extends to the end of the content
    pub fn is_open_ended(&self) -> bool {
        self.end_time_ms == 0
    }

    /// Checks if a given position falls within this chapter
    ///
    /// The start boundary is inclusive and the end boundary exclusive,
    /// so a position equal to a chapter start belongs to that chapter.
    pub fn contains(&self, position_ms: u64) -> bool {
        position_ms >= self.start_time_ms
            && (self.is_open_ended() || position_ms < self.end_time_ms)
    }

    /// Returns the chapter duration, or None for open-ended chapters
    pub fn duration_ms(&self) -> Option<u64> {
        if self.is_open_ended() {
            None
        } else {
            Some(self.end_time_ms.saturating_sub(self.start_time_ms))
        }
    }
}

impl Validator for Chapter {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.number == 0 {
            errors.push("Chapter number must be 1-based".to_string());
        }

        if !self.is_open_ended() && self.end_time_ms <= self.start_time_ms {
            errors.push("End time must be after start time".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Represents the audiobook that is the active target of a session
///
/// Owned by the library; the coordination layer holds a read-mostly
/// reference for the active session only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audiobook {
    pub id: BookId,
    pub title: String,
    pub author: Option<String>,
    /// Chapters sorted ascending by start time, non-overlapping
    pub chapters: Vec<Chapter>,
    /// Last saved progress fraction in [0, 1]
    pub progress: f64,
    /// Last saved chapter number (1-based), 0 when unknown
    pub current_chapter: u32,
    pub source: SourceLocator,
}

impl Audiobook {
    /// Creates a new audiobook with required fields
    pub fn new(id: BookId, title: impl Into<String>, source: SourceLocator) -> Self {
        Self {
            id,
            title: title.into(),
            author: None,
            chapters: Vec::new(),
            progress: 0.0,
            current_chapter: 0,
            source,
        }
    }
}

impl Validator for Audiobook {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Title cannot be empty".to_string());
        }

        if !(0.0..=1.0).contains(&self.progress) || self.progress.is_nan() {
            errors.push("Progress must be within [0, 1]".to_string());
        }

        let mut numbers = HashSet::new();
        for chapter in &self.chapters {
            if let Err(chapter_errors) = chapter.validate() {
                for e in chapter_errors {
                    errors.push(format!("Chapter {}: {}", chapter.number, e));
                }
            }
            if !numbers.insert(chapter.number) {
                errors.push(format!("Duplicate chapter number {}", chapter.number));
            }
        }

        for pair in self.chapters.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.is_open_ended() {
                errors.push("Open-ended chapter must be the last chapter".to_string());
            } else {
                if next.start_time_ms < prev.start_time_ms {
                    errors.push("Chapters must be sorted ascending by start time".to_string());
                }
                if next.start_time_ms < prev.end_time_ms {
                    errors.push(format!(
                        "Chapters {} and {} overlap",
                        prev.number, next.number
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
