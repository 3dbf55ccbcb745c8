//! Poise Analysis Core
//!
//! Turns a stream of video frames into a scored report:
//! - **Eye contact:** Geometric heuristic over the eye landmarks
//! - **Frame signals:** Confidence, nervousness, and eye contact per frame
//! - **Aggregation:** Drives a frame source and averages the signals
//! - **Scoring and feedback:** Maps the averages to a 0-10 score and sentences
//!
//! Frame decoding and landmark detection sit behind the [`FrameSource`] and
//! [`LandmarkProvider`] traits; this crate does no I/O of its own.

pub mod aggregator;
pub mod extractor;
pub mod eye_contact;
pub mod feedback;
pub mod scorer;
pub mod source;

pub use aggregator::VideoAggregator;
pub use extractor::SignalExtractor;
pub use eye_contact::estimate_eye_contact;
pub use feedback::feedback;
pub use scorer::score;
pub use source::{FrameSource, LandmarkProvider};
