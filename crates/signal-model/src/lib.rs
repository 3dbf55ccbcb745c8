//! Poise Signal Model
//!
//! Defines the data contracts that flow through the scoring pipeline:
//! - **Landmarks:** Normalized facial landmark points and face topologies
//! - **Frames:** Decoded pixel buffers with an explicit channel order
//! - **Signals:** Per-frame measurements and their whole-video averages
//! - **Reports:** The final score and feedback
//! - **Tracks:** Recorded per-frame landmarks in JSONL form
//!
//! All landmark coordinates are normalized to `[0.0, 1.0]` relative to the
//! frame dimensions, origin top-left.

pub mod frame;
pub mod landmark;
pub mod report;
pub mod signal;
pub mod track;

pub use frame::*;
pub use landmark::*;
pub use report::*;
pub use signal::*;
pub use track::*;
