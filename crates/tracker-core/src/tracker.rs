//! Modified-date tracking with echo suppression.
//!
//! Persisting a frontmatter update makes the host's watcher report the file
//! as modified again. The tracker marks a path before mutating it and
//! consumes that mark on the next event for the same path, so its own write
//! never triggers a second update cycle.

use crate::date_field::{merge_today, FieldValue};
use crate::fs::FileSystem;
use crate::store::{Mutation, NoteStore, StoreError};
use serde_yaml::Value;
use std::collections::HashSet;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a change event turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Today's date was appended and the note written back.
    Updated,
    /// The field already recorded today; nothing was written.
    AlreadyRecorded,
    /// The event was the echo of this tracker's own write.
    SkippedEcho,
}

/// Registry of paths whose own write has not echoed back yet.
///
/// A path is marked right before its mutation is requested and consumed by
/// the next event for that path. The flag carries no expiry: a second
/// genuine edit arriving before the echo is consumed as if it were the
/// echo. That keeps each genuine edit to exactly one write cycle at the
/// cost of occasionally swallowing a rapid-fire save, which the next save
/// picks up again.
#[derive(Debug, Default)]
pub struct InFlightSet {
    paths: Mutex<HashSet<String>>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a path as mid-update (call before requesting the mutation).
    pub fn mark(&self, path: &str) {
        self.paths.lock().unwrap().insert(path.to_string());
    }

    /// Consume the mark for a path. Returns true at most once per mark.
    pub fn consume(&self, path: &str) -> bool {
        self.paths.lock().unwrap().remove(path)
    }

    /// Drop the mark without consuming semantics (failure and delete paths).
    pub fn clear(&self, path: &str) {
        self.paths.lock().unwrap().remove(path);
    }

    /// Check whether a path is marked (without consuming).
    pub fn is_marked(&self, path: &str) -> bool {
        self.paths.lock().unwrap().contains(path)
    }
}

/// Appends the current date to a note's frontmatter whenever it changes.
#[derive(Debug, Default)]
pub struct ModifiedDateTracker {
    in_flight: InFlightSet,
}

impl ModifiedDateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a change event for a markdown note.
    ///
    /// `today` is the current calendar day as `YYYY-MM-DD`, supplied by the
    /// caller so the logic stays testable against arbitrary dates.
    ///
    /// On a failed mutation the in-flight mark is dropped before the error
    /// propagates, so the next genuine edit of the file is processed
    /// normally instead of being mistaken for the echo of a write that
    /// never happened.
    pub async fn handle_modify<F: FileSystem>(
        &self,
        store: &NoteStore<F>,
        path: &str,
        field_name: &str,
        today: &str,
    ) -> Result<TrackOutcome, TrackerError> {
        if self.in_flight.consume(path) {
            debug!("Consuming self-triggered event for {}", path);
            return Ok(TrackOutcome::SkippedEcho);
        }

        self.in_flight.mark(path);

        let key = Value::String(field_name.to_string());
        let result = store
            .update_frontmatter(path, |fm| {
                let current = FieldValue::read(fm.get(&key));
                if let Some(dates) = merge_today(current, today) {
                    let dates = dates.into_iter().map(Value::String).collect();
                    fm.insert(key.clone(), Value::Sequence(dates));
                }
            })
            .await;

        match result {
            Ok(Mutation::Changed) => {
                debug!("Appended {} to '{}' in {}", today, field_name, path);
                Ok(TrackOutcome::Updated)
            }
            // No write happened, so no echo will arrive. The mark stays set
            // and is consumed by the next event for this path instead.
            Ok(Mutation::Unchanged) => Ok(TrackOutcome::AlreadyRecorded),
            Err(e) => {
                self.in_flight.clear(path);
                Err(e.into())
            }
        }
    }

    /// Forget any in-flight state for a path (e.g. when the file is
    /// deleted), so a stale mark cannot swallow an event for a recreated
    /// file.
    pub fn forget(&self, path: &str) {
        self.in_flight.clear(path);
    }

    #[cfg(test)]
    fn is_in_flight(&self, path: &str) -> bool {
        self.in_flight.is_marked(path)
    }
}
