//! Constants used throughout the application

/// Number of keypoints in a hand detection
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Number of keypoints in a face mesh detection
pub const NUM_FACE_LANDMARKS: usize = 468;

/// Hand landmark indices (21-point hand topology)
pub mod hand {
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_PIP: usize = 14;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_TIP: usize = 20;

    /// (tip, pip) pairs for index, middle, ring and pinky
    pub const FINGER_JOINTS: [(usize, usize); 4] = [
        (INDEX_TIP, INDEX_PIP),
        (MIDDLE_TIP, MIDDLE_PIP),
        (RING_TIP, RING_PIP),
        (PINKY_TIP, PINKY_PIP),
    ];
}

/// Face mesh landmark indices (468-point topology)
pub mod face {
    pub const MOUTH_LEFT: usize = 61;
    pub const MOUTH_RIGHT: usize = 291;
    pub const MOUTH_TOP: usize = 13;
    pub const MOUTH_BOTTOM: usize = 14;
    pub const LEFT_EYEBROW_INNER: usize = 107;
    pub const RIGHT_EYEBROW_INNER: usize = 336;
    pub const LEFT_EYE_TOP: usize = 159;
    pub const RIGHT_EYE_TOP: usize = 386;
    pub const LEFT_EYE_BOTTOM: usize = 145;
    pub const RIGHT_EYE_BOTTOM: usize = 374;
}

/// Finger extension thresholds, as fractions of the hand bounding-box height
pub const FINGER_MIN_GAP_PX: f64 = 4.0;
pub const FINGER_MIN_GAP_RATIO: f64 = 0.10;
pub const FINGER_MIN_LENGTH_PX: f64 = 6.0;
pub const FINGER_MIN_LENGTH_RATIO: f64 = 0.15;

/// Faces smaller than this (largest bbox side, pixels) are scored as neutral
pub const MIN_FACE_SIZE_PX: f64 = 10.0;

/// Winning emotion scores below this are reported as neutral
pub const MIN_EMOTION_SCORE: f64 = 3.0;

/// Baseline score of the neutral label
pub const NEUTRAL_BASELINE_SCORE: f64 = 1.0;

/// Guards the mouth aspect division
pub const MOUTH_WIDTH_EPSILON: f64 = 1e-6;

/// Default stabilizer windows
pub const DEFAULT_FINGER_HISTORY: usize = 5;
pub const DEFAULT_HYSTERESIS_FRAMES: usize = 2;
pub const DEFAULT_EMOTION_HISTORY: usize = 7;

/// Majority share the emotion window is checked against
pub const DEFAULT_MAJORITY_FRACTION: f64 = 0.4;

/// Padding added around the face keypoints for the reported bbox
pub const DEFAULT_FACE_BBOX_PADDING: i32 = 20;

/// Gesture angle windows, degrees
pub const L_GESTURE_MIN_ANGLE: f64 = 75.0;
pub const L_GESTURE_MAX_ANGLE: f64 = 130.0;
pub const GUN_GESTURE_MIN_ANGLE: f64 = 15.0;
pub const GUN_GESTURE_MAX_ANGLE: f64 = 75.0;

/// Axis dominance factor for the L gesture
pub const L_GESTURE_AXIS_RATIO: f64 = 0.8;
