//! # Mnemo Core
//!
//! Batch-result normalization and linking for generated medical mnemonics.
//!
//! A bulk generation job returns one line-delimited file of JSON envelopes
//! whose embedded payloads vary in key naming by response language and model
//! run. This crate turns that stream into a stable, typed result list:
//! - [`normalize`] maps variant key names onto the canonical schema;
//! - [`batch`] drives per-record extraction, cleanup, linking, and topic
//!   fallback;
//! - [`breakdown`] parses topic-breakdown markdown into the batch request
//!   list;
//! - [`store`] declares the external persistence seam.
//!
//! **No service concerns**: HTTP surfaces, model invocation, and UI state
//! belong to the surrounding application, not here.

pub mod batch;
pub mod breakdown;
pub mod error;
pub mod model;
pub mod normalize;
pub mod store;

pub use batch::{parse_batch_results, parse_record, BatchOutcome, RecordSkip, SkippedRecord};
pub use error::{BatchError, BatchResult};
pub use model::{Association, BatchInputItem, CanonicalResult, Language, QuizAnswer, QuizItem};
pub use normalize::{normalize_keys, NormalizedMnemonic};
pub use store::{slugify, ArtifactStore, ArtifactSummary, StoreError, StoredGeneration};
