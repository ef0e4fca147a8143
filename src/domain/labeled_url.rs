// ============================================================
// Layer 3 - Labeled URL
// ============================================================
// One row of the training corpus after its textual `type`
// column has been mapped to a class.
//
//   "benign"      -> Label::Benign     (0)
//   "defacement"  -> Label::Defacement (1)
//
// Any other `type` value has no class and the row is skipped
// by the loader.

use serde::{Deserialize, Serialize};

/// Binary class of a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Benign,
    Defacement,
}

impl Label {
    /// Parse the corpus `type` column. Surrounding whitespace and
    /// letter case are ignored; unknown values yield `None`.
    pub fn from_type(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "benign"     => Some(Label::Benign),
            "defacement" => Some(Label::Defacement),
            _            => None,
        }
    }

    /// Numeric target used by the loss function.
    pub fn as_target(self) -> u8 {
        match self {
            Label::Benign     => 0,
            Label::Defacement => 1,
        }
    }
}

/// A URL string with its ground-truth class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledUrl {
    pub url:   String,
    pub label: Label,
}

impl LabeledUrl {
    pub fn new(url: impl Into<String>, label: Label) -> Self {
        Self { url: url.into(), label }
    }
}
