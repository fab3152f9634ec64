//! Majority-vote smoothing of per-frame emotion labels.
//!
//! Only one face is tracked. The stable label and face box stick through
//! frames without a face; before any face has been seen the label is
//! neutral and there is no box.

use super::{scorer::score_face, Emotion};
use crate::constants::{DEFAULT_EMOTION_HISTORY, DEFAULT_FACE_BBOX_PADDING, DEFAULT_MAJORITY_FRACTION};
use crate::history::History;
use crate::landmarks::{BoundingBox, FaceDetection};
use log::{debug, warn};
use serde::Serialize;

/// Stable emotion for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmotionResult {
    pub emotion: Emotion,
    /// Last known face box, absent until a face has been seen
    pub bbox: Option<BoundingBox>,
}

/// Smooths raw emotion labels over a short window
#[derive(Debug, Clone)]
pub struct EmotionStabilizer {
    history: History<Emotion>,
    last: EmotionResult,
    bbox_padding: i32,
    majority_fraction: f64,
    hold_on_weak_majority: bool,
    enabled: bool,
}

impl Default for EmotionStabilizer {
    fn default() -> Self {
        Self::new(DEFAULT_EMOTION_HISTORY)
    }
}

impl EmotionStabilizer {
    /// Create a stabilizer voting over the last `history_size` labels
    ///
    /// # Panics
    ///
    /// Panics if `history_size` is 0
    #[must_use]
    pub fn new(history_size: usize) -> Self {
        Self {
            history: History::new(history_size),
            last: EmotionResult::default(),
            bbox_padding: DEFAULT_FACE_BBOX_PADDING,
            majority_fraction: DEFAULT_MAJORITY_FRACTION,
            hold_on_weak_majority: false,
            enabled: true,
        }
    }

    /// Padding added around the face keypoints for the reported box
    #[must_use]
    pub fn with_bbox_padding(mut self, padding: i32) -> Self {
        self.bbox_padding = padding;
        self
    }

    /// Share of the window the majority label is checked against
    ///
    /// With `hold` false a weak majority is still adopted; with `hold` true
    /// the previous stable label is kept instead.
    #[must_use]
    pub fn with_weak_majority_policy(mut self, fraction: f64, hold: bool) -> Self {
        self.majority_fraction = fraction;
        self.hold_on_weak_majority = hold;
        self
    }

    /// Stop analysing faces; the cached result is returned from now on
    pub fn disable(&mut self) {
        if self.enabled {
            warn!("Face analysis disabled, emotion detection will report the last known state");
        }
        self.enabled = false;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last stable result
    #[must_use]
    pub fn current(&self) -> EmotionResult {
        self.last
    }

    /// Raw labels in the window, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<Emotion> {
        self.history.iter().copied().collect()
    }

    /// Process the face of one frame, if any
    pub fn update(&mut self, face: Option<&FaceDetection>, frame_width: u32, frame_height: u32) -> EmotionResult {
        if !self.enabled {
            return self.last;
        }
        let Some(face) = face else {
            return self.last;
        };

        let bbox = face.keypoints.padded_bbox(self.bbox_padding, frame_width, frame_height);
        let assessment = score_face(&face.keypoints);
        debug!(
            "Raw emotion {} (score {:.1}, {:?})",
            assessment.emotion,
            assessment.confidence(),
            assessment.scores
        );

        self.observe(assessment.emotion, bbox)
    }

    /// Feed a raw label together with the face box it was measured on
    ///
    /// Ignored once the stabilizer is disabled.
    pub fn observe(&mut self, raw: Emotion, bbox: BoundingBox) -> EmotionResult {
        if !self.enabled {
            return self.last;
        }
        self.history.push(raw);

        if let Some(stable) = self.vote() {
            if stable != self.last.emotion {
                debug!("Stable emotion {} -> {}", self.last.emotion, stable);
            }
            self.last.emotion = stable;
        }
        self.last.bbox = Some(bbox);
        self.last
    }

    /// Most frequent label in the window, ties going to the higher priority label
    #[must_use]
    pub fn majority(&self) -> Option<(Emotion, usize)> {
        let mut counts = [0usize; 4];
        for emotion in self.history.iter() {
            counts[emotion.index()] += 1;
        }

        Emotion::PRIORITY
            .into_iter()
            .map(|emotion| (emotion, counts[emotion.index()]))
            .filter(|(_, count)| *count > 0)
            .fold(None, |best: Option<(Emotion, usize)>, candidate| match best {
                Some(b) if b.1 >= candidate.1 => Some(b),
                _ => Some(candidate),
            })
    }

    /// Label to adopt after the latest observation
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn vote(&self) -> Option<Emotion> {
        let (leader, count) = self.majority()?;
        let threshold = ((self.history.len() as f64 * self.majority_fraction) as usize).max(1);

        if count >= threshold {
            return Some(leader);
        }

        debug!(
            "Weak emotion majority: {leader} has {count}/{} (needs {threshold})",
            self.history.len()
        );
        if self.hold_on_weak_majority {
            None
        } else {
            Some(leader)
        }
    }
}
