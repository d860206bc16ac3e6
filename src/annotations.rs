//! Structured annotations carried on a single move.

use serde::{Deserialize, Serialize};

/// Marker that opens an embedded engine evaluation inside a comment.
const EVAL_MARKER: &str = "[%eval";

/// Annotations extracted from the brace comment that follows a move.
///
/// The comment text is kept verbatim, marker included; a well-formed
/// `[%eval <value>]` marker additionally fills `evaluation`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<String>,
}

impl Annotations {
    /// Build annotations from one raw comment. Empty input yields an empty
    /// annotation set, never an empty comment string.
    pub fn from_comment(comment: &str) -> Self {
        let comment = comment.trim();
        if comment.is_empty() {
            return Self::default();
        }
        Self {
            comment: Some(comment.to_string()),
            evaluation: extract_eval(comment),
        }
    }

    /// Fold another comment group into this set. PGN allows several brace
    /// groups after one move; they join with a single space.
    pub fn append_comment(&mut self, text: &str) {
        match self.comment.take() {
            Some(existing) => *self = Self::from_comment(&format!("{existing} {text}")),
            None => *self = Self::from_comment(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.comment.is_none() && self.evaluation.is_none()
    }
}

/// Pull the value out of the first `[%eval ...]` marker, if any. A marker
/// that never closes, or closes on an empty value, is treated as plain text.
fn extract_eval(comment: &str) -> Option<String> {
    let start = comment.find(EVAL_MARKER)? + EVAL_MARKER.len();
    let end = start + comment[start..].find(']')?;
    let value = comment[start..end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
