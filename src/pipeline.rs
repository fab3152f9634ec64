//! Per-frame processing: detections in, stabilized results out.

use crate::config::Config;
use crate::emotion::{EmotionResult, EmotionStabilizer};
use crate::finger_counter::{FingerCountResult, FingerCounter};
use crate::finger_state::{classify_hand, FingerStates};
use crate::gesture::{detect_gestures, Gesture};
use crate::landmarks::{FrameLandmarks, Handedness};
use log::warn;
use serde::Serialize;

/// Everything the overlay needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    /// Zero-based index of the frame in the stream
    pub frame: u64,
    pub fingers: FingerCountResult,
    pub emotion: EmotionResult,
    /// Recognized hand shape, when gesture recognition is on
    pub gesture: Option<Gesture>,
    /// Raw digit flags per detected hand, in detection order
    pub finger_states: Vec<(Handedness, FingerStates)>,
}

/// Owns the stabilizers and runs one frame at a time through them
#[derive(Debug, Clone)]
pub struct FramePipeline {
    fingers: FingerCounter,
    emotion: EmotionStabilizer,
    gestures_enabled: bool,
    frames: u64,
}

impl Default for FramePipeline {
    fn default() -> Self {
        Self::new(FingerCounter::default(), EmotionStabilizer::default(), false)
    }
}

impl FramePipeline {
    #[must_use]
    pub fn new(fingers: FingerCounter, emotion: EmotionStabilizer, gestures_enabled: bool) -> Self {
        Self {
            fingers,
            emotion,
            gestures_enabled,
            frames: 0,
        }
    }

    /// Build the pipeline described by a configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let fingers = FingerCounter::new(config.finger.history_size, config.finger.hysteresis_frames);
        let mut emotion = EmotionStabilizer::new(config.emotion.history_size)
            .with_bbox_padding(config.emotion.bbox_padding)
            .with_weak_majority_policy(config.emotion.majority_fraction, config.emotion.hold_on_weak_majority);
        if !config.emotion.enabled {
            emotion.disable();
        }
        Self::new(fingers, emotion, config.gesture.enabled)
    }

    /// Turn face analysis off for the rest of the session
    pub fn disable_face_analysis(&mut self) {
        self.emotion.disable();
    }

    #[must_use]
    pub fn finger_counter(&self) -> &FingerCounter {
        &self.fingers
    }

    #[must_use]
    pub fn emotion_stabilizer(&self) -> &EmotionStabilizer {
        &self.emotion
    }

    /// Number of frames processed so far
    #[must_use]
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    /// Process one frame of detections
    pub fn process(&mut self, frame: &FrameLandmarks) -> FrameReport {
        let states: Vec<FingerStates> = frame.hands.iter().map(|hand| classify_hand(&hand.keypoints)).collect();
        let fingers = self.fingers.update_classified(&frame.hands, &states);

        let emotion = match &frame.face_error {
            Some(error) => {
                warn!("Face analysis failed for frame {}: {error}", self.frames);
                self.emotion.current()
            }
            None => self.emotion.update(frame.face.as_ref(), frame.width, frame.height),
        };

        let gesture = if self.gestures_enabled {
            detect_gestures(&frame.hands, &states).active()
        } else {
            None
        };

        let finger_states = frame.hands.iter().map(|hand| hand.handedness).zip(states).collect();

        self.finish(FrameReport {
            frame: self.frames,
            fingers,
            emotion,
            gesture,
            finger_states,
        })
    }

    /// Report for a frame the provider could not deliver
    ///
    /// No hands are reported and the emotion carries forward.
    pub fn process_missing(&mut self) -> FrameReport {
        self.finish(FrameReport {
            frame: self.frames,
            fingers: FingerCountResult::default(),
            emotion: self.emotion.current(),
            gesture: None,
            finger_states: Vec::new(),
        })
    }

    fn finish(&mut self, report: FrameReport) -> FrameReport {
        self.frames += 1;
        report
    }
}
