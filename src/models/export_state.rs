/// Displayed progress floor while the archive is being compressed.
///
/// The host shows item-processing progress during `Processing`, then
/// holds the bar at this mark through `Compressing` until the stream
/// callback reports completion and the bar snaps to 100. The two signals
/// are distinct and are never summed.
pub const COMPRESSING_FLOOR_PERCENT: u8 = 90;

/// Phase of a single export build.
///
/// Legal order is `Preparing → Processing → Compressing → Complete`;
/// any non-terminal phase may drop to `Error`. `Complete` and `Error`
/// are terminal; a new build starts from a reset state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportPhase {
    Preparing,
    Processing,
    Compressing,
    Complete,
    Error,
}

impl ExportPhase {
    /// Whether the build has ended, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExportPhase::Complete | ExportPhase::Error)
    }

    /// Whether a build in this phase is still running.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Validates a phase transition.
    pub fn can_transition_to(&self, next: ExportPhase) -> bool {
        use ExportPhase::*;
        match (self, next) {
            (Preparing, Processing) => true,
            (Processing, Compressing) => true,
            (Compressing, Complete) => true,
            (Preparing | Processing | Compressing, Error) => true,
            _ => false,
        }
    }
}

/// Single source of truth for one export build's progress.
///
/// Created at build start, mutated in place by each processed item and by
/// the compression callback, and ends in `Complete` or `Error`. Always
/// access it through [`crate::state::ProgressTracker`], which wraps it in
/// `Arc<RwLock<_>>` and emits change events.
#[derive(Clone, Debug)]
pub struct ExportState {
    /// Whether a build is currently running. Exactly one build may be
    /// active per tracker; the flag drops on either terminal phase.
    pub in_progress: bool,

    /// Current build phase.
    pub phase: ExportPhase,

    /// Items processed so far. Advances by one per produced item.
    pub current: usize,

    /// Items expected, fixed once enumeration has counted them.
    pub total: usize,

    /// Display name of the file most recently registered.
    pub current_file: Option<String>,

    /// Stream-serialization percentage reported by the compressor.
    /// Monotonically non-decreasing within one build.
    pub compression_percent: u8,

    /// Files actually written into the finished archive.
    pub files_written: usize,

    /// Failure message when `phase` is `Error`.
    pub error: Option<String>,
}

impl Default for ExportState {
    fn default() -> Self {
        Self {
            in_progress: false,
            phase: ExportPhase::Preparing,
            current: 0,
            total: 0,
            current_file: None,
            compression_percent: 0,
            files_written: 0,
            error: None,
        }
    }
}

impl ExportState {
    /// Record one produced item.
    pub fn record_item(&mut self, file_name: String) {
        self.current += 1;
        self.current_file = Some(file_name);
    }

    /// Reset to a fresh pre-build state.
    pub fn reset(&mut self) {
        *self = ExportState::default();
    }

    /// The percentage the host should display for the current phase.
    ///
    /// Item progress drives the bar while processing; during compression
    /// the bar is floored at [`COMPRESSING_FLOOR_PERCENT`] and snaps to
    /// 100 on completion. Never a sum of the two signals.
    pub fn display_percent(&self) -> u8 {
        match self.phase {
            ExportPhase::Preparing => 0,
            ExportPhase::Processing => {
                if self.total == 0 {
                    0
                } else {
                    let scaled =
                        (self.current * COMPRESSING_FLOOR_PERCENT as usize) / self.total;
                    scaled.min(COMPRESSING_FLOOR_PERCENT as usize) as u8
                }
            }
            ExportPhase::Compressing => COMPRESSING_FLOOR_PERCENT,
            ExportPhase::Complete => 100,
            ExportPhase::Error => 0,
        }
    }
}
