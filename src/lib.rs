// storypack - Project export and archive builder for storyboard projects
//
// This is the library crate containing the full export pipeline: asset
// enumeration, naming, archive assembly, compression, progress tracking,
// and delivery. The host application provides the UI and hands in its
// in-memory project collections.

pub mod config;
pub mod delivery;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod notify;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::PrefsManager;
pub use delivery::{DeliveryError, DialogSaveTarget, DirectorySaveTarget, SaveTarget};
pub use models::{ExportConfiguration, ExportPhase, ExportState, ProjectCollections};
pub use notify::{LogNotifier, NotificationSink};
pub use services::{ExportError, ExportReport, ExportService};
pub use state::{ProgressTracker, StateChange};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
