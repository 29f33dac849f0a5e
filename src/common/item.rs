use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::color::Color;

/// Opaque identity of the user owning a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// A labeled image reduced to its dominant color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    label: String,
    color: Color,
}

impl Item {
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// `"{label} (#RRGGBB)"`
    pub fn render(&self) -> String {
        format!("{} ({})", self.label, self.color.to_hex())
    }
}

/// Label for an uncaptioned item at the given 1-based position.
pub fn default_label(prefix: &str, position: usize) -> String {
    format!("{prefix} #{position}")
}

/// Trimmed caption, or the positional default when the caption is missing or blank.
pub fn resolve_label(caption: Option<&str>, prefix: &str, position: usize) -> String {
    match caption.map(str::trim) {
        Some(caption) if !caption.is_empty() => caption.to_string(),
        _ => default_label(prefix, position),
    }
}
