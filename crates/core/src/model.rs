//! Canonical data model for batch generation requests and results.
//!
//! The bulk generation job emits one record per request; after normalization
//! and linking each usable record becomes a [`CanonicalResult`]. Optional
//! fields skip serialization when absent so downstream consumers see the same
//! key-presence semantics as the raw pipeline output (an absent field means
//! "no known alias matched", which is different from an empty value).

use mnemo_types::NonEmptyText;
use serde::{Deserialize, Serialize};

/// Language code accepted by the generation pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

/// Error returned when a language code cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("unrecognised language code: {0} (expected \"en\" or \"es\")")]
pub struct LanguageParseError(String);

impl std::str::FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(LanguageParseError(other.to_owned())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::En => f.write_str("en"),
            Language::Es => f.write_str("es"),
        }
    }
}

/// One character-to-concept mapping inside a mnemonic.
///
/// Each sub-field is resolved independently during normalization, so any of
/// them may be absent without invalidating the association as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A quiz answer as emitted by the upstream model: either the index of the
/// winning option or the option text verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizAnswer {
    Index(u64),
    Text(String),
}

/// One multiple-choice question attached to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<QuizAnswer>,
}

/// The normalized, linked output for one usable batch record.
///
/// `topic` is [`NonEmptyText`]: the parser guarantees a topic for every
/// emitted result, falling back to inference when the payload carried none.
/// `associations` and `quiz` preserve the order of the normalized input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalResult {
    /// Correlation identifier carried through from the raw record.
    pub custom_id: String,
    pub topic: NonEmptyText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associations: Option<Vec<Association>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Vec<QuizItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<Vec<String>>,
    /// Title of the matched input request, absent when linking failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_title: Option<String>,
    /// Topic body of the matched input request, absent when linking failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_topic: Option<String>,
}

/// One element of the batch request list submitted to the generation job.
///
/// The correlation step only reads `title` and `topic`; every field defaults
/// so a partial request file still loads, and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInputItem {
    /// The high-level source the item was broken down from.
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_visual_style")]
    pub visual_style: String,
}

fn default_visual_style() -> String {
    "cartoon".to_owned()
}
