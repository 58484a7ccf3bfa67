//! Shared core types: confidence witness, resolution method tags.

mod confidence;

pub use confidence::Confidence;

use serde::{Deserialize, Serialize};

/// How a reference was (or was not) resolved to a registry identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMethod {
    /// Normalized alias hit the inverted index.
    Exact,
    /// Best indexed alias scored above the similarity threshold.
    Fuzzy,
    /// Deictic reference resolved against prior speaker turns.
    Coreference,
    /// No stage produced an identity.
    Unresolved,
}

impl ResolutionMethod {
    /// Convert to the label string used in exports and logs.
    #[must_use]
    pub fn as_label(&self) -> &'static str {
        match self {
            ResolutionMethod::Exact => "exact",
            ResolutionMethod::Fuzzy => "fuzzy",
            ResolutionMethod::Coreference => "coreference",
            ResolutionMethod::Unresolved => "unresolved",
        }
    }

    /// Parse from a label string. Unknown labels map to `Unresolved`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "exact" => ResolutionMethod::Exact,
            "fuzzy" => ResolutionMethod::Fuzzy,
            "coreference" | "coref" => ResolutionMethod::Coreference,
            _ => ResolutionMethod::Unresolved,
        }
    }
}

impl std::fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

/// Classification of a candidate reference span.
///
/// Standard spans name someone directly (title, honorific, name) and go
/// through the alias index; deictic spans identify someone only through
/// conversational context ("the Member who just spoke") and go through
/// coreference. A span is never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionClass {
    /// Direct reference, resolvable against the alias index.
    Standard,
    /// Anaphoric reference, resolvable only from turn context.
    Deictic,
}
