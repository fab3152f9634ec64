//! Per-hand finger count stabilization with hysteresis.
//!
//! Raw per-frame counts jitter when a finger hovers around its threshold.
//! Each hand side keeps a stable count that only changes after the raw count
//! has disagreed with it for `hysteresis_frames` consecutive frames.

use crate::constants::{DEFAULT_FINGER_HISTORY, DEFAULT_HYSTERESIS_FRAMES};
use crate::finger_state::{classify_hand, FingerStates};
use crate::history::History;
use crate::landmarks::{HandDetection, Handedness};
use log::debug;
use serde::Serialize;

/// Stable per-hand counts for one frame
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FingerCountResult {
    /// (side, stable count) for every hand present this frame, sorted by side
    pub per_hand: Vec<(Handedness, u8)>,
    /// Sum of the emitted stable counts
    pub total: u32,
}

/// Stabilizer state for one hand side
#[derive(Debug, Clone)]
struct SideState {
    history: History<u8>,
    stable: u8,
    pending: usize,
}

impl SideState {
    fn new(history_size: usize) -> Self {
        Self {
            history: History::new(history_size),
            stable: 0,
            pending: 0,
        }
    }

    /// Feed one raw count; returns true when the stable count changed
    fn observe(&mut self, raw: u8, hysteresis_frames: usize) -> bool {
        self.history.push(raw);

        if raw == self.stable {
            self.pending = 0;
            return false;
        }

        self.pending += 1;
        if self.pending >= hysteresis_frames {
            self.stable = raw;
            self.pending = 0;
            return true;
        }
        false
    }
}

/// Debounces raw finger counts per hand side
#[derive(Debug, Clone)]
pub struct FingerCounter {
    hysteresis_frames: usize,
    sides: [SideState; 2],
}

impl Default for FingerCounter {
    fn default() -> Self {
        Self::new(DEFAULT_FINGER_HISTORY, DEFAULT_HYSTERESIS_FRAMES)
    }
}

impl FingerCounter {
    /// Create a stabilizer
    ///
    /// # Panics
    ///
    /// Panics if `history_size` or `hysteresis_frames` is 0
    #[must_use]
    pub fn new(history_size: usize, hysteresis_frames: usize) -> Self {
        assert!(hysteresis_frames > 0, "Hysteresis frames must be greater than 0");
        Self {
            hysteresis_frames,
            sides: [SideState::new(history_size), SideState::new(history_size)],
        }
    }

    #[must_use]
    pub fn hysteresis_frames(&self) -> usize {
        self.hysteresis_frames
    }

    /// Current stable count of a side, whether or not it is in view
    #[must_use]
    pub fn stable_count(&self, side: Handedness) -> u8 {
        self.sides[side.index()].stable
    }

    /// Recent raw counts of a side, oldest first
    #[must_use]
    pub fn raw_history(&self, side: Handedness) -> Vec<u8> {
        self.sides[side.index()].history.iter().copied().collect()
    }

    /// Feed a raw count for one side and return its stable count
    pub fn observe(&mut self, side: Handedness, raw: u8) -> u8 {
        let state = &mut self.sides[side.index()];
        if state.observe(raw, self.hysteresis_frames) {
            debug!("{side} hand stable count -> {raw}");
        }
        state.stable
    }

    /// Process the hands of one frame
    ///
    /// Sides missing from `hands` are left untouched and not reported.
    pub fn update(&mut self, hands: &[HandDetection]) -> FingerCountResult {
        let states: Vec<FingerStates> = hands.iter().map(|hand| classify_hand(&hand.keypoints)).collect();
        self.update_classified(hands, &states)
    }

    /// Process hands whose digits were already classified
    ///
    /// `states[i]` holds the flags of `hands[i]`.
    pub fn update_classified(&mut self, hands: &[HandDetection], states: &[FingerStates]) -> FingerCountResult {
        debug_assert_eq!(hands.len(), states.len());
        for (hand, digits) in hands.iter().zip(states) {
            let raw = digits.count();
            debug!("{} hand raw count {raw} ({digits:?})", hand.handedness);
            self.observe(hand.handedness, raw);
        }

        let mut per_hand: Vec<(Handedness, u8)> = hands
            .iter()
            .map(|hand| (hand.handedness, self.stable_count(hand.handedness)))
            .collect();
        per_hand.sort_by_key(|(side, _)| *side);

        let total = per_hand.iter().map(|(_, count)| u32::from(*count)).sum();

        FingerCountResult { per_hand, total }
    }

    /// Forget all per-side state
    pub fn reset(&mut self) {
        for side in &mut self.sides {
            side.history.clear();
            side.stable = 0;
            side.pending = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame_jitter_suppressed() {
        let mut counter = FingerCounter::new(5, 2);
        assert_eq!(counter.observe(Handedness::Right, 3), 0);
        assert_eq!(counter.observe(Handedness::Right, 0), 0);
        assert_eq!(counter.observe(Handedness::Right, 3), 0);
        assert_eq!(counter.observe(Handedness::Right, 3), 3);
    }

    #[test]
    fn test_agreeing_frame_resets_pending() {
        let mut counter = FingerCounter::new(5, 3);
        counter.observe(Handedness::Left, 2);
        counter.observe(Handedness::Left, 2);
        counter.observe(Handedness::Left, 0);
        counter.observe(Handedness::Left, 2);
        assert_eq!(counter.stable_count(Handedness::Left), 0);
    }

    #[test]
    fn test_sides_are_independent() {
        let mut counter = FingerCounter::default();
        counter.observe(Handedness::Left, 4);
        counter.observe(Handedness::Left, 4);
        assert_eq!(counter.stable_count(Handedness::Left), 4);
        assert_eq!(counter.stable_count(Handedness::Right), 0);
    }

    #[test]
    fn test_history_bounded() {
        let mut counter = FingerCounter::new(3, 2);
        for raw in [1, 2, 3, 4, 5] {
            counter.observe(Handedness::Right, raw);
        }
        assert_eq!(counter.raw_history(Handedness::Right), vec![3, 4, 5]);
    }

    #[test]
    fn test_empty_frame_reports_nothing() {
        let mut counter = FingerCounter::default();
        counter.observe(Handedness::Left, 2);
        counter.observe(Handedness::Left, 2);

        let result = counter.update(&[]);
        assert!(result.per_hand.is_empty());
        assert_eq!(result.total, 0);
        assert_eq!(counter.stable_count(Handedness::Left), 2);
    }

    #[test]
    fn test_update_classified_counts_given_flags() {
        use crate::constants::NUM_HAND_LANDMARKS;
        use crate::landmarks::{HandKeypoints, Point};

        // collapsed geometry would classify as a fist
        let hand = HandDetection {
            handedness: Handedness::Right,
            keypoints: HandKeypoints::new([Point::new(5.0, 5.0); NUM_HAND_LANDMARKS]),
        };
        let open = FingerStates {
            thumb: true,
            index: true,
            middle: true,
            ring: true,
            pinky: true,
        };

        let mut counter = FingerCounter::new(5, 1);
        let result = counter.update_classified(std::slice::from_ref(&hand), &[open]);
        assert_eq!(result.per_hand, vec![(Handedness::Right, 5)]);
        assert_eq!(counter.update(&[hand]).total, 0);
    }

    #[test]
    fn test_reset() {
        let mut counter = FingerCounter::new(5, 1);
        counter.observe(Handedness::Left, 5);
        counter.reset();
        assert_eq!(counter.stable_count(Handedness::Left), 0);
        assert!(counter.raw_history(Handedness::Left).is_empty());
    }

    #[test]
    #[should_panic(expected = "Hysteresis frames must be greater than 0")]
    fn test_zero_hysteresis() {
        let _ = FingerCounter::new(5, 0);
    }
}
