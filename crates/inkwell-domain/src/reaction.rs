//! Reaction domain types.

use serde::{Deserialize, Serialize};

/// Typed engagement a user leaves on an ink.
///
/// A user may hold each kind at most once per ink; the set of kinds is
/// closed, unknown strings are a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Love,
    Laugh,
    Insight,
    Bookmark,
}

impl ReactionKind {
    pub const ALL: [Self; 5] = [
        Self::Like,
        Self::Love,
        Self::Laugh,
        Self::Insight,
        Self::Bookmark,
    ];

    /// Parse from the stored column value. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "like" => Some(Self::Like),
            "love" => Some(Self::Love),
            "laugh" => Some(Self::Laugh),
            "insight" => Some(Self::Insight),
            "bookmark" => Some(Self::Bookmark),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Love => "love",
            Self::Laugh => "laugh",
            Self::Insight => "insight",
            Self::Bookmark => "bookmark",
        }
    }
}
