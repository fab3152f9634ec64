//! Per-hand finger extension classifier.
//!
//! Works on pixel keypoints of a single hand. Fingers count as extended when
//! the tip sits clearly above its PIP joint; both the vertical gap and the
//! tip-to-PIP length thresholds scale with the hand's bounding-box height so
//! the result does not depend on distance to the camera. The thumb is judged
//! horizontally, with the direction chosen from the knuckle row layout.

use crate::constants::{
    hand::{FINGER_JOINTS, INDEX_MCP, PINKY_MCP, THUMB_IP, THUMB_TIP},
    FINGER_MIN_GAP_PX, FINGER_MIN_GAP_RATIO, FINGER_MIN_LENGTH_PX, FINGER_MIN_LENGTH_RATIO,
};
use crate::landmarks::HandKeypoints;
use serde::Serialize;

/// Extension flags for the five digits of one hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    /// Number of extended digits, 0 to 5
    #[must_use]
    pub fn count(&self) -> u8 {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
            .iter()
            .map(|&up| u8::from(up))
            .sum()
    }

    /// Only thumb and index are extended
    #[must_use]
    pub fn is_thumb_and_index_only(&self) -> bool {
        self.thumb && self.index && !self.middle && !self.ring && !self.pinky
    }
}

/// Whether the knuckle row runs index-to-pinky from left to right in the image
#[must_use]
pub fn is_right_in_image(hand: &HandKeypoints) -> bool {
    hand.point(INDEX_MCP).x < hand.point(PINKY_MCP).x
}

/// Thumb tip points away from the palm past the IP joint
#[must_use]
pub fn is_thumb_up(hand: &HandKeypoints) -> bool {
    let tip_x = hand.point(THUMB_TIP).x;
    let ip_x = hand.point(THUMB_IP).x;

    if is_right_in_image(hand) {
        tip_x < ip_x
    } else {
        tip_x > ip_x
    }
}

/// Tip is above its PIP joint by a scale-aware margin
#[must_use]
pub fn is_finger_up(hand: &HandKeypoints, tip_index: usize, pip_index: usize) -> bool {
    let tip = hand.point(tip_index);
    let pip = hand.point(pip_index);

    let bbox_height = hand.bbox_height();
    let min_gap = FINGER_MIN_GAP_PX.max(FINGER_MIN_GAP_RATIO * bbox_height);
    let min_len = FINGER_MIN_LENGTH_PX.max(FINGER_MIN_LENGTH_RATIO * bbox_height);

    (pip.y - tip.y) > min_gap && tip.distance(&pip) > min_len
}

/// Classify all five digits of a hand
#[must_use]
pub fn classify_hand(hand: &HandKeypoints) -> FingerStates {
    let [index, middle, ring, pinky] = FINGER_JOINTS.map(|(tip, pip)| is_finger_up(hand, tip, pip));

    FingerStates {
        thumb: is_thumb_up(hand),
        index,
        middle,
        ring,
        pinky,
    }
}

/// Count extended digits and return the per-digit flags
#[must_use]
pub fn count_fingers(hand: &HandKeypoints) -> (u8, FingerStates) {
    let states = classify_hand(hand);
    (states.count(), states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_HAND_LANDMARKS;
    use crate::landmarks::Point;

    /// Upright hand, knuckles running left to right, every digit extended
    fn open_hand() -> [Point; NUM_HAND_LANDMARKS] {
        let mut points = [Point::new(100.0, 300.0); NUM_HAND_LANDMARKS];
        points[1] = Point::new(70.0, 280.0);
        points[2] = Point::new(60.0, 260.0);
        points[3] = Point::new(50.0, 245.0);
        points[4] = Point::new(35.0, 235.0);
        for (finger, x) in [80.0, 95.0, 110.0, 125.0].into_iter().enumerate() {
            let base = 5 + finger * 4;
            points[base] = Point::new(x, 220.0);
            points[base + 1] = Point::new(x, 180.0);
            points[base + 2] = Point::new(x, 150.0);
            points[base + 3] = Point::new(x, 120.0);
        }
        points
    }

    #[test]
    fn test_open_hand_counts_five() {
        let hand = HandKeypoints::new(open_hand());
        let (count, states) = count_fingers(&hand);
        assert_eq!(count, 5);
        assert!(states.thumb && states.index && states.pinky);
    }

    #[test]
    fn test_folded_finger_not_counted() {
        let mut points = open_hand();
        points[12] = Point::new(95.0, 200.0);
        let hand = HandKeypoints::new(points);

        let states = classify_hand(&hand);
        assert!(!states.middle);
        assert_eq!(states.count(), 4);
    }

    #[test]
    fn test_short_segment_rejected() {
        // Tip barely above the PIP: clears neither the gap nor the length threshold
        let mut points = open_hand();
        points[8] = Point::new(80.0, 170.0);
        let hand = HandKeypoints::new(points);
        assert!(!is_finger_up(&hand, 8, 6));
    }

    #[test]
    fn test_thumb_direction_flips_with_layout() {
        let mirrored = open_hand().map(|p| Point::new(200.0 - p.x, p.y));
        let hand = HandKeypoints::new(mirrored);
        assert!(!is_right_in_image(&hand));
        assert!(is_thumb_up(&hand));

        let mut folded = mirrored;
        folded[4] = Point::new(140.0, 240.0);
        assert!(!is_thumb_up(&HandKeypoints::new(folded)));
    }

    #[test]
    fn test_collapsed_hand_counts_zero() {
        let hand = HandKeypoints::new([Point::new(5.0, 5.0); NUM_HAND_LANDMARKS]);
        assert_eq!(count_fingers(&hand).0, 0);
    }
}
