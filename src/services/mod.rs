//! Services module - Pure business logic for export builds.
//!
//! Everything under this module is **framework-agnostic**: no dialog,
//! window, or rendering code, only explicit inputs and outputs, so the
//! same pipeline serves the interactive export view and batch callers.
//!
//! # Components
//!
//! The build pipeline, in execution order:
//!
//! - [`enumerate`]: counts exportable items and produces the ordered
//!   item list. A fixed sequence of pure category handlers threads an
//!   explicit [`Counters`](enumerate::Counters) accumulator, which keeps
//!   the production-order guarantees auditable in one place.
//! - [`naming`]: pure naming policy — sanitization, zero-padded
//!   counters, shot suffixes, the shared panel/linked counter namespace.
//! - [`assemble`]: builds the folder/file tree for the selected
//!   organization mode and places `script.json` at the archive root.
//! - [`package`]: decodes payloads and serializes the tree into one
//!   in-memory zip stream, reporting a monotone percentage.
//! - [`export`]: the orchestrator. Drives the phase machine, catches
//!   every fatal error once, fires the single success/failure
//!   notification, and hands the finished bytes to delivery.
//!
//! # Design Philosophy
//!
//! - **Deterministic**: the same collections and configuration always
//!   produce the same ordered file list and names.
//! - **Stateless**: services take explicit parameters; the only shared
//!   state is the progress tracker the caller passes in.
//! - **Isolated failure**: a malformed payload skips one file; zip and
//!   delivery errors abort the build without delivering anything.

pub mod assemble;
pub mod enumerate;
pub mod export;
pub mod naming;
pub mod package;

pub use assemble::{ArchiveFile, ArchiveFolder, AssembleError, archive_file_name, build_tree};
pub use enumerate::{
    Counters, ExportableItem, ItemCategory, ItemPayload, count_exportable, produce_ordered_items,
};
pub use export::{ExportError, ExportReport, ExportService};
pub use package::{PackageError, PackageOutput, compress_tree};
