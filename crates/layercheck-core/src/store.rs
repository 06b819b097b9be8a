//! Version storage seam and in-memory implementations
//!
//! Durable persistence is out of scope for the core; [`VersionStore`] is the
//! seam a database-backed store implements. [`InMemoryVersionStore`] is a
//! single-threaded `HashMap` store used by tests and the CLI.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ComparisonConfig;
use crate::diff::{compare_versions, ComparisonResult};
use crate::errors::{LayerCheckError, Result};
use crate::snapshot::{compute_snapshot_digest, LayerSnapshot};
use crate::{log_op_end, log_op_error, log_op_start};
use layercheck_core_types::VersionId;

/// One stored drawing version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version_id: VersionId,
    pub project: String,
    /// SHA-256 of the snapshot set's canonical JSON
    pub digest: String,
    pub created_at: DateTime<Utc>,
    pub snapshots: Vec<LayerSnapshot>,
}

impl VersionRecord {
    /// # Errors
    ///
    /// `Serialization` if the snapshots cannot be digested.
    pub fn new(project: impl Into<String>, snapshots: Vec<LayerSnapshot>) -> Result<Self> {
        Ok(Self {
            version_id: VersionId::new(),
            project: project.into(),
            digest: compute_snapshot_digest(&snapshots)?,
            created_at: Utc::now(),
            snapshots,
        })
    }
}

/// Supplies and accepts snapshot sets keyed by version id
pub trait VersionStore {
    /// Insert or replace a version.
    ///
    /// # Errors
    ///
    /// Implementation-specific storage failures.
    fn put(&mut self, record: VersionRecord) -> Result<()>;

    /// # Errors
    ///
    /// `VersionNotFound` if the id is unknown.
    fn get(&self, id: &VersionId) -> Result<&VersionRecord>;

    /// All versions, oldest first
    fn list(&self) -> Vec<&VersionRecord>;

    /// # Errors
    ///
    /// `VersionNotFound` if the id is unknown.
    fn remove(&mut self, id: &VersionId) -> Result<VersionRecord>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryVersionStore {
    versions: HashMap<VersionId, VersionRecord>,
}

impl InMemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot set, reusing the existing version when one with the
    /// same content digest is already stored.
    ///
    /// # Errors
    ///
    /// `Serialization` if the snapshots cannot be digested.
    pub fn record_version(&mut self, project: &str, snapshots: Vec<LayerSnapshot>) -> Result<VersionId> {
        let digest = compute_snapshot_digest(&snapshots)?;
        if let Some(existing) = self.versions.values().find(|r| r.digest == digest) {
            tracing::debug!(version_id = %existing.version_id, "identical snapshot set already stored");
            return Ok(existing.version_id.clone());
        }

        let record = VersionRecord {
            version_id: VersionId::new(),
            project: project.to_string(),
            digest,
            created_at: Utc::now(),
            snapshots,
        };
        let id = record.version_id.clone();
        tracing::debug!(version_id = %id, project, layer_count = record.snapshots.len(), "version recorded");
        self.versions.insert(id.clone(), record);
        Ok(id)
    }

    /// Compare two stored versions, reusing `cache` when it holds a current
    /// result for the pair.
    ///
    /// # Errors
    ///
    /// `VersionNotFound` if either id is unknown.
    pub fn compare_stored(
        &self,
        cache: &mut ComparisonCache,
        base: &VersionId,
        new: &VersionId,
        config: &ComparisonConfig,
    ) -> Result<ComparisonResult> {
        let start = Instant::now();
        log_op_start!("compare_stored", base = %base, new = %new);

        let records = self.get(base).and_then(|b| Ok((b, self.get(new)?)));
        let (base_record, new_record) = records.map_err(|e| {
            log_op_error!(
                "compare_stored",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        let result = cache.get_or_compute(base_record, new_record, config);
        log_op_end!(
            "compare_stored",
            duration_ms = start.elapsed().as_millis() as u64,
            modified_count = result.summary.modified_count
        );
        Ok(result)
    }

    /// Versions of one project, oldest first
    pub fn list_project(&self, project: &str) -> Vec<&VersionRecord> {
        self.list().into_iter().filter(|r| r.project == project).collect()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl VersionStore for InMemoryVersionStore {
    fn put(&mut self, record: VersionRecord) -> Result<()> {
        self.versions.insert(record.version_id.clone(), record);
        Ok(())
    }

    fn get(&self, id: &VersionId) -> Result<&VersionRecord> {
        self.versions.get(id).ok_or_else(|| LayerCheckError::VersionNotFound {
            version_id: id.to_string(),
        })
    }

    fn list(&self) -> Vec<&VersionRecord> {
        let mut records: Vec<&VersionRecord> = self.versions.values().collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.version_id.cmp(&b.version_id)));
        records
    }

    fn remove(&mut self, id: &VersionId) -> Result<VersionRecord> {
        self.versions.remove(id).ok_or_else(|| LayerCheckError::VersionNotFound {
            version_id: id.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
struct CachedComparison {
    base_id: VersionId,
    base_digest: String,
    new_digest: String,
    result: ComparisonResult,
}

/// Caller-side cache of comparison results.
///
/// Entries are keyed by the unordered version pair. A lookup hits only when
/// the stored orientation and both content digests match, so replacing a
/// version's snapshots makes its old entries unreachable.
#[derive(Debug, Clone, Default)]
pub struct ComparisonCache {
    entries: HashMap<(VersionId, VersionId), CachedComparison>,
}

fn pair_key(a: &VersionId, b: &VersionId) -> (VersionId, VersionId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl ComparisonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, base: &VersionRecord, new: &VersionRecord) -> Option<&ComparisonResult> {
        self.entries
            .get(&pair_key(&base.version_id, &new.version_id))
            .filter(|c| c.base_id == base.version_id && c.base_digest == base.digest && c.new_digest == new.digest)
            .map(|c| &c.result)
    }

    pub fn insert(&mut self, base: &VersionRecord, new: &VersionRecord, result: ComparisonResult) {
        self.entries.insert(
            pair_key(&base.version_id, &new.version_id),
            CachedComparison {
                base_id: base.version_id.clone(),
                base_digest: base.digest.clone(),
                new_digest: new.digest.clone(),
                result,
            },
        );
    }

    /// Cached result, or a fresh comparison stored for next time
    pub fn get_or_compute(&mut self, base: &VersionRecord, new: &VersionRecord, config: &ComparisonConfig) -> ComparisonResult {
        if let Some(hit) = self.get(base, new) {
            tracing::debug!(base = %base.version_id, new = %new.version_id, "comparison cache hit");
            return hit.clone();
        }
        let result = compare_versions(base, new, config);
        self.insert(base, new, result.clone());
        result
    }

    /// Drop every entry involving `version`
    pub fn invalidate(&mut self, version: &VersionId) {
        self.entries.retain(|(a, b), _| a != version && b != version);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
