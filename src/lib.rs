//! Finger counting and emotion recognition from hand and face landmarks.
//!
//! Perception runs elsewhere; this library takes the per-frame keypoints a
//! hand pose model and a face mesh model produce and turns them into stable,
//! displayable results:
//! 1. Each hand is classified digit by digit and counted
//! 2. Per-side counts are smoothed with hysteresis
//! 3. The face is scored against a few expression rules
//! 4. Emotion labels are smoothed with a majority vote over recent frames
//!
//! # Examples
//!
//! ## Counting Fingers
//!
//! ```no_run
//! use finger_emotion::{finger_counter::FingerCounter, provider::{JsonLinesSource, LandmarkSource}};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut source = JsonLinesSource::open("session.jsonl")?;
//! let mut counter = FingerCounter::new(5, 2);
//!
//! while let Some(frame) = source.next_frame()? {
//!     let result = counter.update(&frame.hands);
//!     println!("Total: {}", result.total);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Full Pipeline
//!
//! ```
//! use finger_emotion::{pipeline::FramePipeline, provider::decode_frame};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pipeline = FramePipeline::default();
//! let frame = decode_frame(r#"{"width": 640, "height": 480}"#)?;
//! let report = pipeline.process(&frame);
//!
//! assert_eq!(report.fingers.total, 0);
//! assert_eq!(report.emotion.emotion.as_str(), "normal");
//! # Ok(())
//! # }
//! ```

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Keypoint and detection types
pub mod landmarks;

/// Bounded sliding windows
pub mod history;

/// Per-digit hand classification
pub mod finger_state;

/// Finger count stabilization
pub mod finger_counter;

/// Face expression scoring and smoothing
pub mod emotion;

/// Thumb-and-index hand shapes
pub mod gesture;

/// Landmark providers
pub mod provider;

/// Per-frame processing pipeline
pub mod pipeline;

/// Report sinks
pub mod render;

/// Configuration management
pub mod config;

/// Main application module
pub mod app;

pub use error::{Error, Result};
