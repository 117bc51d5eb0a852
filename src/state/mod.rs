// State management module
//
// Provides the ProgressTracker, which wraps ExportState with thread-safe
// access through Arc<RwLock<T>> and emits change events so the host UI
// (or any non-interactive caller) can follow a build without polling.

use crate::models::{ExportPhase, ExportState};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when the export state is modified.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// The build moved to a new phase
    PhaseChanged { phase: ExportPhase },

    /// Item-processing progress advanced
    ProgressUpdated {
        current: usize,
        total: usize,
        current_file: Option<String>,
    },

    /// The compressor reported a stream-serialization percentage.
    /// Distinct from item progress; the two are never summed.
    CompressionProgress { percent: u8 },

    /// The build finished and the archive was handed to delivery
    ExportFinished { files_written: usize },

    /// The build failed; no archive was delivered
    ExportFailed { message: String },

    /// State has been reset for a new build
    StateReset,
}

/// Thread-safe progress tracker with event emission.
///
/// The tracker owns the phase machine: every mutation goes through one
/// transition check, so an illegal phase order is rejected (logged,
/// state unchanged) rather than silently applied. Consumers subscribe
/// via a tokio broadcast channel; rendering is fully decoupled, so the
/// same tracker serves the interactive export view and batch callers.
pub struct ProgressTracker {
    /// Export state protected by RwLock for thread-safe access
    state: Arc<RwLock<ExportState>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,
}

impl ProgressTracker {
    /// Create a new tracker with a fresh pre-build state.
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(ExportState::default())),
            state_tx,
        }
    }

    /// Get a read-only snapshot of the current state.
    pub fn snapshot(&self) -> ExportState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ExportState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Subscribe to state change events.
    ///
    /// Returns a receiver that will get notified of all future state
    /// changes. Multiple subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    /// Apply a mutation, detect what changed, and emit events.
    fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut ExportState),
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = Self::detect_changes(&old_state, &state);

        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    /// Detect what changed between two states and generate events.
    fn detect_changes(old: &ExportState, new: &ExportState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.phase != new.phase {
            changes.push(StateChange::PhaseChanged { phase: new.phase });

            match new.phase {
                ExportPhase::Complete => changes.push(StateChange::ExportFinished {
                    files_written: new.files_written,
                }),
                ExportPhase::Error => changes.push(StateChange::ExportFailed {
                    message: new.error.clone().unwrap_or_default(),
                }),
                _ => {}
            }
        }

        if old.current != new.current
            || old.total != new.total
            || old.current_file != new.current_file
        {
            changes.push(StateChange::ProgressUpdated {
                current: new.current,
                total: new.total,
                current_file: new.current_file.clone(),
            });
        }

        if old.compression_percent != new.compression_percent {
            changes.push(StateChange::CompressionProgress {
                percent: new.compression_percent,
            });
        }

        changes
    }

    /// Validated phase transition. Returns false and leaves the state
    /// untouched when the requested order is illegal.
    fn transition(&self, next: ExportPhase) -> bool {
        let current = self.read(|s| s.phase);
        if !current.can_transition_to(next) {
            tracing::warn!(
                "Rejected illegal phase transition {:?} -> {:?}",
                current,
                next
            );
            return false;
        }
        true
    }

    // Build lifecycle

    /// Claim the tracker for a new build.
    ///
    /// Returns false when a build is already running; the state is then
    /// left untouched. On success the state is reset and enters
    /// `Preparing` immediately, before enumeration.
    pub fn try_begin(&self) -> bool {
        let mut state = self.state.write().unwrap();
        if state.in_progress {
            tracing::warn!("Export already in progress, refusing to start another");
            return false;
        }
        state.reset();
        state.in_progress = true;

        // A fresh build always re-enters Preparing; announce it even when
        // the previous state already sat there.
        let _ = self.state_tx.send(StateChange::PhaseChanged {
            phase: ExportPhase::Preparing,
        });
        true
    }

    /// Enter `Processing` once the total item count is known.
    pub fn begin_processing(&self, total: usize) -> bool {
        if !self.transition(ExportPhase::Processing) {
            return false;
        }
        self.update(|state| {
            state.phase = ExportPhase::Processing;
            state.total = total;
        });
        true
    }

    /// Record one produced item; advances `current` by one.
    pub fn record_item(&self, file_name: &str) -> Vec<StateChange> {
        self.update(|state| {
            state.record_item(file_name.to_string());
        })
    }

    /// Enter `Compressing` once every item is registered in the tree.
    pub fn begin_compressing(&self) -> bool {
        if !self.transition(ExportPhase::Compressing) {
            return false;
        }
        self.update(|state| {
            state.phase = ExportPhase::Compressing;
        });
        true
    }

    /// Record the compressor's percentage callback.
    ///
    /// Clamped so the stored value never decreases within one build.
    pub fn set_compression_progress(&self, percent: u8) -> Vec<StateChange> {
        self.update(|state| {
            state.compression_percent = state.compression_percent.max(percent.min(100));
        })
    }

    /// Terminal success: the archive was handed to delivery.
    pub fn complete(&self, files_written: usize) -> bool {
        if !self.transition(ExportPhase::Complete) {
            return false;
        }
        self.update(|state| {
            state.phase = ExportPhase::Complete;
            state.files_written = files_written;
            state.in_progress = false;
        });
        true
    }

    /// Terminal failure from any active phase.
    pub fn fail(&self, message: &str) -> bool {
        if !self.transition(ExportPhase::Error) {
            return false;
        }
        self.update(|state| {
            state.phase = ExportPhase::Error;
            state.error = Some(message.to_string());
            state.in_progress = false;
        });
        true
    }

    /// Reset to a fresh pre-build state.
    ///
    /// The host calls this on its delayed reset after a terminal phase;
    /// it is also the retry path after `Error`.
    pub fn reset(&self) -> Vec<StateChange> {
        let mut changes = self.update(|state| {
            state.reset();
        });

        let reset_event = StateChange::StateReset;
        let _ = self.state_tx.send(reset_event.clone());
        changes.push(reset_event);

        changes
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

// Make ProgressTracker cloneable for sharing across threads
impl Clone for ProgressTracker {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}
