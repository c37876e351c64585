// Per-identifier resource snapshots

use crate::record::{Record, RecordData};
use crate::resources::{ResourceState, ResourceUpdate};
use std::collections::HashMap;
use tracing::{debug, trace};

/// What [`ResourceStore::apply_update`] did with a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// First sighting; a snapshot was created
    Created,
    /// Flagged groups were merged into an existing snapshot
    Merged,
    /// Unseen identifier without a URL; nothing to anchor the snapshot on
    Dropped,
}

/// Live resource snapshots keyed by identifier
#[derive(Debug, Default)]
pub struct ResourceStore {
    resources: HashMap<String, ResourceState>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one update fragment into the snapshot for its identifier
    pub fn apply_update(&mut self, update: &ResourceUpdate) -> UpdateOutcome {
        if let Some(state) = self.resources.get_mut(&update.identifier) {
            state.merge(update);
            return UpdateOutcome::Merged;
        }

        match update.url.as_deref() {
            Some(url) => {
                trace!(identifier = %update.identifier, url, "New resource snapshot");
                self.resources.insert(
                    update.identifier.clone(),
                    ResourceState::from_update(url, update),
                );
                UpdateOutcome::Created
            }
            None => {
                debug!(
                    identifier = %update.identifier,
                    "Dropping update for unknown resource without a URL"
                );
                UpdateOutcome::Dropped
            }
        }
    }

    /// Forget the resource if this fragment completes it
    ///
    /// Returns whether a snapshot was removed.
    pub fn maybe_evict(&mut self, update: &ResourceUpdate) -> bool {
        if !update.is_completion() {
            return false;
        }
        let removed = self.resources.remove(&update.identifier).is_some();
        if removed {
            trace!(identifier = %update.identifier, "Resource completed");
        }
        removed
    }

    /// Drop the snapshot for a resource whose lifecycle has ended
    ///
    /// Returns whether a snapshot was removed; unknown identifiers are a no-op.
    pub fn forget(&mut self, identifier: &str) -> bool {
        let removed = self.resources.remove(identifier).is_some();
        if removed {
            trace!(identifier, "Resource finished");
        }
        removed
    }

    pub fn get(&self, identifier: &str) -> Option<&ResourceState> {
        self.resources.get(identifier)
    }

    /// Feed a resource-send-request record
    ///
    /// Creates the snapshot, or replaces it when a redirect reuses the
    /// identifier. Other records are ignored.
    pub fn on_request_start(&mut self, record: &Record) {
        if let RecordData::ResourceStart(start) = &record.data {
            self.resources.insert(
                start.identifier.clone(),
                ResourceState::from_start(start, record.time),
            );
        }
    }

    /// Feed a resource-receive-response record
    pub fn on_response(&mut self, record: &Record) {
        if let RecordData::ResourceResponse(response) = &record.data {
            if let Some(state) = self.resources.get_mut(&response.identifier) {
                state.apply_response(response, record.time);
            }
        }
    }

    /// Feed a resource-finish record
    pub fn on_finish(&mut self, record: &Record) {
        if let RecordData::ResourceFinish(finish) = &record.data {
            if let Some(state) = self.resources.get_mut(&finish.identifier) {
                state.apply_finish(finish, record.time);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn clear(&mut self) {
        self.resources.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceState> {
        self.resources.values()
    }
}
