//! Key normalization for heterogeneous batch payloads.
//!
//! The per-item output schema of the bulk generation job is not stable: the
//! same logical field arrives under different key names depending on the
//! response language and model phrasing (`"associations"` vs
//! `"asociaciones"`, `"quiz"` vs `"cuestionario_final"`, and so on). This
//! module maps an arbitrarily-keyed payload onto the canonical schema using
//! per-field alias tables consulted in priority order.
//!
//! The tables are data, not branches: supporting a new language or model
//! revision means appending a key to the relevant slice. The alternative —a
//! fixed expected schema — would silently drop most non-English results, and
//! fuzzy key matching would be untestable; an explicit allow-list is both
//! enumerable and auditable.
//!
//! Nothing in this module errors or panics. A field whose value does not have
//! the canonical shape (a number where a string is expected, an object where
//! a list is expected) is treated as absent for that field only.

use crate::model::{Association, QuizAnswer, QuizItem};
use serde_json::Value;

/// Direct aliases for the mnemonic story, in priority order.
const STORY_KEYS: &[&str] = &[
    "mnemonico_historia",
    "mnemonic_story",
    "mnemotecnia_historia",
    "titulo_historia",
    "historia_mnemonica",
    "mnemotecnico_historia",
];

/// Container keys checked for a nested story when no direct alias matched.
const STORY_CONTAINER_KEYS: &[&str] = &["mnemonico", "mnemotecnia"];

/// Sub-key holding the story text inside a story container object.
const NESTED_STORY_KEY: &str = "historia";

const ASSOCIATION_KEYS: &[&str] = &["asociaciones", "associations"];
const CHARACTER_KEYS: &[&str] = &[
    "personaje",
    "character",
    "personaje_elemento",
    "personaje_objeto",
];
const MEDICAL_TERM_KEYS: &[&str] = &["termino_medico", "medical_term", "elemento_medico"];
const EXPLANATION_KEYS: &[&str] = &["explicacion", "explanation", "descripcion"];

const VISUAL_PROMPT_KEYS: &[&str] = &["prompt_visual", "visual_prompt"];

const QUIZ_KEYS: &[&str] = &[
    "quiz",
    "cuestionario",
    "quiz_preguntas",
    "preguntas_quiz",
    "cuestionario_final",
];
const QUESTION_KEYS: &[&str] = &["pregunta", "question"];
const OPTION_KEYS: &[&str] = &["opciones", "options"];
const ANSWER_KEYS: &[&str] = &[
    "respuesta_correcta",
    "answer",
    "respuesta",
    "correct_answer",
];

const TOPIC_KEYS: &[&str] = &["topic", "titulo", "tema"];
const FACT_KEYS: &[&str] = &["facts", "datos", "hechos", "puntos_clave"];

/// Canonical-schema view of one decoded payload.
///
/// Every field is optional: absence means no known alias matched (or the
/// matched value had the wrong shape). Placeholder values are never
/// substituted here; topic fallback is the batch parser's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedMnemonic {
    pub topic: Option<String>,
    pub story: Option<String>,
    pub associations: Option<Vec<Association>>,
    pub visual_prompt: Option<String>,
    pub quiz: Option<Vec<QuizItem>>,
    pub facts: Option<Vec<String>>,
}

/// Maps an arbitrarily-keyed payload onto the canonical field set.
///
/// Only first- and second-level nesting is inspected. The input is usually a
/// JSON object; any other value yields an all-absent [`NormalizedMnemonic`].
pub fn normalize_keys(payload: &Value) -> NormalizedMnemonic {
    NormalizedMnemonic {
        topic: resolve_string(payload, TOPIC_KEYS),
        story: resolve_story(payload),
        associations: resolve_associations(payload),
        visual_prompt: resolve_string(payload, VISUAL_PROMPT_KEYS),
        quiz: resolve_quiz(payload),
        facts: resolve_string_list(payload, FACT_KEYS),
    }
}

/// Returns the value under the first alias present, regardless of its shape.
fn first_present<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|key| value.get(key))
}

fn resolve_string(value: &Value, aliases: &[&str]) -> Option<String> {
    first_present(value, aliases)?.as_str().map(str::to_owned)
}

fn resolve_string_list(value: &Value, aliases: &[&str]) -> Option<Vec<String>> {
    let items = first_present(value, aliases)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
    )
}

/// Resolves the story, unwrapping one level of `{ "historia": ... }` nesting.
///
/// A direct alias match is committed to even when its shape is unusable;
/// the container fallback only runs when no direct alias matched at all.
fn resolve_story(payload: &Value) -> Option<String> {
    if let Some(matched) = first_present(payload, STORY_KEYS) {
        if let Some(nested) = matched.get(NESTED_STORY_KEY) {
            return nested.as_str().map(str::to_owned);
        }
        return matched.as_str().map(str::to_owned);
    }

    STORY_CONTAINER_KEYS
        .iter()
        .find_map(|key| payload.get(key).and_then(|c| c.get(NESTED_STORY_KEY)))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

fn resolve_associations(payload: &Value) -> Option<Vec<Association>> {
    let items = first_present(payload, ASSOCIATION_KEYS)?.as_array()?;
    Some(
        items
            .iter()
            .map(|item| Association {
                character: resolve_string(item, CHARACTER_KEYS),
                medical_term: resolve_string(item, MEDICAL_TERM_KEYS),
                explanation: resolve_string(item, EXPLANATION_KEYS),
            })
            .collect(),
    )
}

fn resolve_quiz(payload: &Value) -> Option<Vec<QuizItem>> {
    let items = first_present(payload, QUIZ_KEYS)?.as_array()?;
    Some(
        items
            .iter()
            .map(|item| QuizItem {
                question: resolve_string(item, QUESTION_KEYS),
                options: resolve_string_list(item, OPTION_KEYS),
                answer: resolve_answer(item),
            })
            .collect(),
    )
}

fn resolve_answer(item: &Value) -> Option<QuizAnswer> {
    match first_present(item, ANSWER_KEYS)? {
        Value::String(text) => Some(QuizAnswer::Text(text.clone())),
        Value::Number(number) => number.as_u64().map(QuizAnswer::Index),
        _ => None,
    }
}
