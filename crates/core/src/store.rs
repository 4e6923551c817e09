//! Persistence boundary for generated artifacts.
//!
//! Finished generations are kept in an external store — a directory tree, an
//! object bucket, whatever the deployment provides. The core only depends on
//! the [`ArtifactStore`] seam: save an artifact and get an identifier back,
//! list what exists, load one by identifier. Concrete backends live outside
//! this crate; the test module carries an in-memory double that pins the
//! contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::CanonicalResult;

/// Errors surfaced through the storage boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("storage backend failure: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

/// One persisted generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGeneration {
    pub result: CanonicalResult,
    /// Medical specialty the generation is filed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    /// Stable identity of this generation, independent of the backend key.
    pub generation_id: Uuid,
    /// Generation this one was derived from, for drill-down chains.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub saved_at: DateTime<Utc>,
}

impl StoredGeneration {
    /// Wraps a canonical result for persistence, minting a fresh identity.
    pub fn new(result: CanonicalResult, specialty: Option<String>) -> Self {
        Self {
            result,
            specialty,
            generation_id: Uuid::new_v4(),
            parent_id: None,
            saved_at: Utc::now(),
        }
    }

    /// Marks this generation as derived from an existing one.
    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Listing entry returned by [`ArtifactStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    /// Human-readable name, suitable for a picker.
    pub name: String,
    /// Opaque key to pass back to [`ArtifactStore::load`].
    pub identifier: String,
}

/// External persistence seam for generated artifacts.
///
/// Identifiers are backend-defined and opaque to callers; the only contract
/// is that `load` accepts what `save` and `list` hand out. `list` returns
/// newest first.
pub trait ArtifactStore {
    /// Persists one generation, returning its identifier.
    fn save(&mut self, generation: &StoredGeneration) -> Result<String, StoreError>;

    /// Lists stored artifacts, optionally restricted to one specialty.
    fn list(&self, specialty_filter: Option<&str>) -> Result<Vec<ArtifactSummary>, StoreError>;

    /// Loads a generation by the identifier `save` or `list` produced.
    fn load(&self, identifier: &str) -> Result<StoredGeneration, StoreError>;
}

/// Reduces free text to a short, filesystem- and key-safe slug.
///
/// Lowercases, drops anything that is not alphanumeric or a separator,
/// collapses separator runs to a single underscore, and caps the result at
/// 30 characters. `"Heart Failure (Acute)"` becomes `"heart_failure_acute"`.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::new();
    let mut separator_pending = false;

    for c in lowered.chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            separator_pending = true;
        } else if c.is_alphanumeric() {
            if separator_pending {
                slug.push('_');
                separator_pending = false;
            }
            slug.push(c);
        }
        // any other character is dropped without ending the separator run
    }

    if separator_pending {
        slug.push('_');
    }

    slug.chars().take(30).collect()
}
