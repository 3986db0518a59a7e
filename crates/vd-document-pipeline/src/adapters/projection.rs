//! In-memory projection store.

use crate::ports::{ProjectionError, ProjectionStore};
use async_trait::async_trait;
use chrono::Utc;
use shared_types::{Address, DocumentId, ProjectionPatch, ProjectionRow};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory projection keyed by document id.
///
/// Writes are idempotent and convergent: replaying an upsert or a patch,
/// in any order, settles on the same final row, and a terminal lifecycle
/// status is never overwritten by a late-arriving pre-transition write.
#[derive(Default)]
pub struct InMemoryProjectionStore {
    rows: RwLock<HashMap<DocumentId, ProjectionRow>>,
}

impl InMemoryProjectionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    /// Whether the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProjectionStore for InMemoryProjectionStore {
    async fn upsert(&self, row: ProjectionRow) -> Result<(), ProjectionError> {
        let mut rows = self.rows.write().unwrap();
        match rows.entry(row.document_id) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                if existing.status.is_terminal() && !row.status.is_terminal() {
                    // Late pre-transition row: take its enrichment but keep
                    // the finalized lifecycle fields.
                    if row.metadata.is_some() {
                        existing.analysis = row
                            .metadata
                            .as_ref()
                            .and_then(|m| m.analysis.clone())
                            .or(existing.analysis.take());
                        existing.metadata = row.metadata;
                    }
                    if row.analysis.is_some() {
                        existing.analysis = row.analysis;
                    }
                    existing.updated_at = Utc::now();
                } else {
                    *existing = row;
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(row);
            }
        }
        Ok(())
    }

    async fn apply(
        &self,
        id: DocumentId,
        patch: ProjectionPatch,
    ) -> Result<(), ProjectionError> {
        let mut rows = self.rows.write().unwrap();
        match rows.get_mut(&id) {
            Some(row) => row.apply(patch),
            None => {
                // The ingestion-time upsert never landed; the next read
                // repairs the row from the ledger.
                debug!(document_id = %id, "No projection row to patch");
            }
        }
        Ok(())
    }

    async fn find(&self, id: DocumentId) -> Result<Option<ProjectionRow>, ProjectionError> {
        Ok(self.rows.read().unwrap().get(&id).cloned())
    }

    async fn list_by_owner(&self, owner: Address) -> Result<Vec<ProjectionRow>, ProjectionError> {
        let mut rows: Vec<ProjectionRow> = self
            .rows
            .read()
            .unwrap()
            .values()
            .filter(|row| row.owner == owner)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.document_id);
        Ok(rows)
    }
}
