//! Batch result parsing: record stream → canonical, linked results.
//!
//! A completed bulk generation job is retrieved as one line-delimited file of
//! JSON envelopes. Each line is processed independently: decode the envelope,
//! extract the embedded generated text, strip markdown code fences, decode
//! the payload, normalize its keys, link it back to the originating request
//! via the correlation id, and guarantee a topic through fallback inference.
//!
//! The unit of failure is always a single record. A line that cannot be used
//! is dropped with a [`SkippedRecord`] diagnostic; nothing a record contains
//! can abort the batch.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{BatchError, BatchResult};
use crate::model::{BatchInputItem, CanonicalResult};
use crate::normalize::{normalize_keys, NormalizedMnemonic};
use mnemo_types::NonEmptyText;

/// Correlation id prefix assigned by the job submission side.
///
/// Full format: `req-<index>-<suffix>`, where `<index>` is the zero-based
/// position of the originating request in the batch input list.
const CORRELATION_PREFIX: &str = "req-";

/// Why one record was dropped from the batch.
#[derive(Debug, thiserror::Error)]
pub enum RecordSkip {
    #[error("envelope is not valid JSON: {0}")]
    MalformedEnvelope(serde_json::Error),
    #[error("upstream generation reported an error")]
    UpstreamError,
    #[error("expected response payload path is missing")]
    IncompletePayload,
    #[error("generated text is not valid JSON: {0}")]
    MalformedPayload(serde_json::Error),
}

/// Diagnostic entry for a dropped record.
#[derive(Debug)]
pub struct SkippedRecord {
    /// Zero-based line index in the record source.
    pub line: usize,
    /// Correlation id, when the envelope decoded far enough to yield one.
    pub custom_id: Option<String>,
    pub reason: RecordSkip,
}

/// Everything one parse pass produces.
///
/// `results` preserves input line order. `skipped` records why the remaining
/// lines were dropped; callers that only want the results can ignore it.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<CanonicalResult>,
    pub skipped: Vec<SkippedRecord>,
}

/// Parses a batch results file, optionally linking against the request list
/// that produced it.
///
/// A missing results file yields an empty outcome, not an error: retrieving
/// results before the job has been downloaded is an ordinary state. A request
/// list that exists but cannot be read or decoded degrades to "no correlation
/// metadata" with a warning rather than failing the batch.
///
/// # Errors
///
/// Returns [`BatchError::ResultsRead`] only when the results file exists but
/// cannot be read.
pub fn parse_batch_results(
    results_path: &Path,
    inputs_path: Option<&Path>,
) -> BatchResult<BatchOutcome> {
    if !results_path.exists() {
        return Ok(BatchOutcome::default());
    }

    let inputs = match inputs_path {
        Some(path) => load_request_list(path),
        None => Vec::new(),
    };

    let raw = fs::read_to_string(results_path).map_err(BatchError::ResultsRead)?;

    let mut outcome = BatchOutcome::default();
    for (index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(line, index, &inputs) {
            Ok(result) => outcome.results.push(result),
            Err(skipped) => {
                tracing::warn!(
                    "skipping batch record at line {} ({}): {}",
                    skipped.line,
                    skipped.custom_id.as_deref().unwrap_or("id unknown"),
                    skipped.reason
                );
                outcome.skipped.push(skipped);
            }
        }
    }

    Ok(outcome)
}

/// Loads the ordered request list, degrading to empty on any failure.
fn load_request_list(path: &Path) -> Vec<BatchInputItem> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("failed to read request list {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("failed to decode request list {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Processes one raw record line into a canonical result.
///
/// Pure with respect to its inputs; the batch driver owns iteration and
/// diagnostics collection. `index` is the zero-based line position, used for
/// the synthetic correlation id when the envelope carries none.
pub fn parse_record(
    raw: &str,
    index: usize,
    inputs: &[BatchInputItem],
) -> Result<CanonicalResult, SkippedRecord> {
    let envelope: Value = serde_json::from_str(raw).map_err(|e| SkippedRecord {
        line: index,
        custom_id: None,
        reason: RecordSkip::MalformedEnvelope(e),
    })?;

    let custom_id = envelope
        .get("custom_id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("unknown-{index}"));

    // Failed generations carry an error field; no partial result is emitted.
    if envelope.get("error").is_some() {
        return Err(SkippedRecord {
            line: index,
            custom_id: Some(custom_id),
            reason: RecordSkip::UpstreamError,
        });
    }

    let text = match embedded_text(&envelope) {
        Some(text) => text,
        None => {
            return Err(SkippedRecord {
                line: index,
                custom_id: Some(custom_id),
                reason: RecordSkip::IncompletePayload,
            })
        }
    };

    let cleaned = strip_code_fence(text);
    let payload: Value = match serde_json::from_str(&cleaned) {
        Ok(payload) => payload,
        Err(e) => {
            return Err(SkippedRecord {
                line: index,
                custom_id: Some(custom_id),
                reason: RecordSkip::MalformedPayload(e),
            })
        }
    };

    let normalized = normalize_keys(&payload);
    Ok(assemble_result(normalized, custom_id, inputs))
}

/// Walks the fixed envelope path to the generated text.
fn embedded_text(envelope: &Value) -> Option<&str> {
    envelope
        .get("response")?
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

/// Strips a markdown code fence wrapped around generated JSON.
///
/// With at least three lines the first and last are assumed to be the fence
/// pair and dropped. Shorter texts fall back to blunt substring removal of
/// the fence markers, since there is no closing line to pair with the
/// opening one. Already-clean text passes through trimmed.
fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_owned();
    }

    let lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() >= 3 {
        lines[1..lines.len() - 1].join("\n")
    } else {
        trimmed.replace("```json", "").replace("```", "")
    }
}

/// Builds the final result: correlation linking plus topic fallback.
fn assemble_result(
    normalized: NormalizedMnemonic,
    custom_id: String,
    inputs: &[BatchInputItem],
) -> CanonicalResult {
    let (input_title, input_topic) = match link_request(&custom_id, inputs) {
        Some(request) => (Some(request.title.clone()), Some(request.topic.clone())),
        None => (None, None),
    };

    let topic = resolve_topic(&normalized, &custom_id);

    CanonicalResult {
        custom_id,
        topic,
        story: normalized.story,
        associations: normalized.associations,
        visual_prompt: normalized.visual_prompt,
        quiz: normalized.quiz,
        facts: normalized.facts,
        input_title,
        input_topic,
    }
}

/// Resolves a correlation id of the form `req-<index>-<suffix>` against the
/// request list. Every failure mode is non-fatal and leaves the record
/// unlinked; near-misses are logged so an upstream id-scheme change is
/// observable.
fn link_request<'a>(custom_id: &str, inputs: &'a [BatchInputItem]) -> Option<&'a BatchInputItem> {
    let rest = custom_id.strip_prefix(CORRELATION_PREFIX)?;
    let index_digits = rest.split('-').next()?;

    let index: usize = match index_digits.parse() {
        Ok(index) => index,
        Err(_) => {
            tracing::debug!("correlation id {} has a non-numeric index", custom_id);
            return None;
        }
    };

    if inputs.is_empty() {
        return None;
    }

    match inputs.get(index) {
        Some(request) => Some(request),
        None => {
            tracing::debug!(
                "correlation id {} points outside the request list (len {})",
                custom_id,
                inputs.len()
            );
            None
        }
    }
}

/// Guarantees a non-empty topic for every emitted result.
///
/// Normalization output wins when usable; otherwise inference runs in order:
/// first association's medical term, then the story opening, then the
/// correlation id itself. A matched-but-empty topic string counts as absent
/// so the invariant holds unconditionally.
fn resolve_topic(normalized: &NormalizedMnemonic, custom_id: &str) -> NonEmptyText {
    if let Some(topic) = &normalized.topic {
        if let Ok(topic) = NonEmptyText::new(topic) {
            return topic;
        }
    }

    if let Some(term) = normalized
        .associations
        .as_ref()
        .and_then(|list| list.first())
        .and_then(|assoc| assoc.medical_term.as_deref())
    {
        if let Ok(topic) = NonEmptyText::new(format!("{term} (Inferred)")) {
            return topic;
        }
    }

    if let Some(story) = &normalized.story {
        let lead: String = story.chars().take(30).collect();
        if let Ok(topic) = NonEmptyText::new(format!("Story: {}...", lead.trim())) {
            return topic;
        }
    }

    NonEmptyText::new(format!("Result {custom_id}"))
        .expect("literal prefix keeps the fallback topic non-empty")
}
