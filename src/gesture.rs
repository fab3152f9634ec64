//! Thumb-and-index hand shapes.
//!
//! Both shapes need the thumb and index extended with the other three
//! fingers folded, and are told apart by the angle between the thumb
//! (MCP to tip) and the index finger (MCP to tip).

use crate::constants::{
    hand::{INDEX_MCP, INDEX_TIP, THUMB_MCP, THUMB_TIP},
    GUN_GESTURE_MAX_ANGLE, GUN_GESTURE_MIN_ANGLE, L_GESTURE_AXIS_RATIO, L_GESTURE_MAX_ANGLE,
    L_GESTURE_MIN_ANGLE,
};
use crate::finger_state::FingerStates;
use crate::landmarks::{HandDetection, HandKeypoints, Handedness, Point};
use serde::Serialize;
use std::fmt;

/// Recognized hand shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gesture {
    /// Thumb roughly horizontal, index roughly vertical
    LShape,
    /// Thumb and index closer to parallel
    Gun,
}

impl Gesture {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Gesture::LShape => "L",
            Gesture::Gun => "arminha",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gestures found in one frame, one slot per hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FrameGestures {
    /// L shape on a hand labeled Left
    pub left: Option<Gesture>,
    /// Gun shape on a hand labeled Right
    pub right: Option<Gesture>,
}

impl FrameGestures {
    /// Gesture to show, the left-hand L taking precedence
    #[must_use]
    pub fn active(&self) -> Option<Gesture> {
        self.left.or(self.right)
    }
}

/// Angle between two vectors in degrees, 0 when either is degenerate
#[must_use]
pub fn angle_between(v1: Point, v2: Point) -> f64 {
    let n1 = v1.x.hypot(v1.y);
    let n2 = v2.x.hypot(v2.y);
    if n1 == 0.0 || n2 == 0.0 {
        return 0.0;
    }
    let cos = ((v1.x * v2.x + v1.y * v2.y) / (n1 * n2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

fn thumb_and_index(hand: &HandKeypoints, digits: FingerStates) -> Option<(Point, Point)> {
    if !digits.is_thumb_and_index_only() {
        return None;
    }
    let thumb = hand.point(THUMB_TIP) - hand.point(THUMB_MCP);
    let index = hand.point(INDEX_TIP) - hand.point(INDEX_MCP);
    Some((thumb, index))
}

/// Thumb and index at roughly a right angle, thumb horizontal, index vertical
///
/// `digits` are the extension flags of `hand`.
#[must_use]
pub fn is_l_shape(hand: &HandKeypoints, digits: FingerStates) -> bool {
    let Some((thumb, index)) = thumb_and_index(hand, digits) else {
        return false;
    };

    let angle = angle_between(thumb, index);
    let thumb_horizontal = thumb.x.abs() > thumb.y.abs() * L_GESTURE_AXIS_RATIO;
    let index_vertical = index.y.abs() > index.x.abs() * L_GESTURE_AXIS_RATIO;

    (L_GESTURE_MIN_ANGLE..=L_GESTURE_MAX_ANGLE).contains(&angle) && thumb_horizontal && index_vertical
}

/// Thumb and index extended and closer to parallel than an L
#[must_use]
pub fn is_gun_shape(hand: &HandKeypoints, digits: FingerStates) -> bool {
    let Some((thumb, index)) = thumb_and_index(hand, digits) else {
        return false;
    };
    (GUN_GESTURE_MIN_ANGLE..GUN_GESTURE_MAX_ANGLE).contains(&angle_between(thumb, index))
}

/// L shapes are only looked for on Left hands, gun shapes on Right hands
///
/// `states[i]` holds the extension flags of `hands[i]`.
#[must_use]
pub fn detect_gestures(hands: &[HandDetection], states: &[FingerStates]) -> FrameGestures {
    let left = hands
        .iter()
        .zip(states)
        .any(|(h, &digits)| h.handedness == Handedness::Left && is_l_shape(&h.keypoints, digits))
        .then_some(Gesture::LShape);
    let right = hands
        .iter()
        .zip(states)
        .any(|(h, &digits)| h.handedness == Handedness::Right && is_gun_shape(&h.keypoints, digits))
        .then_some(Gesture::Gun);

    FrameGestures { left, right }
}
