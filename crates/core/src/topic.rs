//! Topic matching policy shared by the prompt builder and configuration.

use serde::{Deserialize, Serialize};

/// How a free-form topic is matched against the guidance table when no
/// alias resolves it exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicMatching {
    /// Fall back to substring containment against topics of the same category.
    #[default]
    Fuzzy,
    /// Alias table only.
    Strict,
}

impl TopicMatching {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fuzzy => "fuzzy",
            Self::Strict => "strict",
        }
    }
}
