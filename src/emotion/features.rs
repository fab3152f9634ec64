//! Face mesh measurements normalized by face size.
//!
//! Every distance is divided by the larger side of the face keypoint box and
//! multiplied by 100, so values read as a percentage of face size.

use crate::constants::{face, MIN_FACE_SIZE_PX, MOUTH_WIDTH_EPSILON};
use crate::landmarks::FaceKeypoints;
use serde::Serialize;

/// Geometric ratios used by the emotion rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceMetrics {
    /// Larger side of the face keypoint box, pixels
    pub face_size: f64,
    /// Mouth top/bottom midpoint minus mouth corner midpoint (vertical)
    pub mouth_curve: f64,
    pub mouth_width: f64,
    pub mouth_height: f64,
    /// mouth_height / mouth_width
    pub mouth_aspect: f64,
    /// Mean inner-eyebrow to eye-top distance over both eyes
    pub avg_eyebrow_dist: f64,
    /// Eyebrow midpoint minus eye-top midpoint; negative when brows sit above
    pub eyebrow_drop: f64,
    /// Mean eye opening over both eyes
    pub avg_eye_open: f64,
}

impl FaceMetrics {
    /// Measure a face, or `None` when it is too small to be reliable
    #[must_use]
    pub fn measure(face_points: &FaceKeypoints) -> Option<Self> {
        let (width, height) = face_points.extent_size();
        let face_size = width.max(height);
        if face_size < MIN_FACE_SIZE_PX {
            return None;
        }

        let y = |index: usize| face_points.point(index).y;
        let x = |index: usize| face_points.point(index).x;
        let pct = |value: f64| value / face_size * 100.0;

        let mouth_center_y = (y(face::MOUTH_TOP) + y(face::MOUTH_BOTTOM)) / 2.0;
        let mouth_corners_y = (y(face::MOUTH_LEFT) + y(face::MOUTH_RIGHT)) / 2.0;
        let mouth_curve = pct(mouth_center_y - mouth_corners_y);

        let mouth_width = pct((x(face::MOUTH_RIGHT) - x(face::MOUTH_LEFT)).abs());
        let mouth_height = pct((y(face::MOUTH_BOTTOM) - y(face::MOUTH_TOP)).abs());
        let mouth_aspect = mouth_height / (mouth_width + MOUTH_WIDTH_EPSILON);

        let left_brow_dist = pct((y(face::LEFT_EYEBROW_INNER) - y(face::LEFT_EYE_TOP)).abs());
        let right_brow_dist = pct((y(face::RIGHT_EYEBROW_INNER) - y(face::RIGHT_EYE_TOP)).abs());
        let avg_eyebrow_dist = (left_brow_dist + right_brow_dist) / 2.0;

        let eyebrow_center_y = (y(face::LEFT_EYEBROW_INNER) + y(face::RIGHT_EYEBROW_INNER)) / 2.0;
        let eye_center_y = (y(face::LEFT_EYE_TOP) + y(face::RIGHT_EYE_TOP)) / 2.0;
        let eyebrow_drop = pct(eyebrow_center_y - eye_center_y);

        let left_eye_open = pct((y(face::LEFT_EYE_TOP) - y(face::LEFT_EYE_BOTTOM)).abs());
        let right_eye_open = pct((y(face::RIGHT_EYE_TOP) - y(face::RIGHT_EYE_BOTTOM)).abs());
        let avg_eye_open = (left_eye_open + right_eye_open) / 2.0;

        Some(Self {
            face_size,
            mouth_curve,
            mouth_width,
            mouth_height,
            mouth_aspect,
            avg_eyebrow_dist,
            eyebrow_drop,
            avg_eye_open,
        })
    }
}
