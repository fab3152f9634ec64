//! Landmark value types shared by the classifiers and stabilizers.
//!
//! The external perception model reports keypoints normalized to the image
//! size. Everything downstream works in pixel space, so detections are
//! converted once at the provider boundary and then carried as fixed-size
//! keypoint sets whose index positions follow the 21-point hand and
//! 468-point face mesh topologies.

use crate::constants::{NUM_FACE_LANDMARKS, NUM_HAND_LANDMARKS};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 2D point in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// A keypoint as reported by the perception model, normalized to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl NormalizedLandmark {
    /// Convert to pixel space, truncating toward zero
    #[must_use]
    pub fn to_pixel(&self, width: u32, height: u32) -> Point {
        Point::new(
            (self.x * f64::from(width)).trunc(),
            (self.y * f64::from(height)).trunc(),
        )
    }
}

/// Convert a slice of normalized landmarks to pixel points
#[must_use]
pub fn landmarks_to_pixels(landmarks: &[NormalizedLandmark], width: u32, height: u32) -> Vec<Point> {
    landmarks.iter().map(|lm| lm.to_pixel(width, height)).collect()
}

/// Anatomical side of a hand as labeled by the provider
///
/// Ordered `Left < Right`, which is the order per-hand results are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const ALL: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    /// Slot of this side in per-side state arrays
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Handedness::Left => 0,
            Handedness::Right => 1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handedness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Left" => Ok(Handedness::Left),
            "Right" => Ok(Handedness::Right),
            other => Err(Error::InvalidInput(format!("Unknown handedness label: {other}"))),
        }
    }
}

/// Axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

/// Extent of a point set: (min_x, min_y, max_x, max_y)
///
/// NaN coordinates are ignored; an all-NaN set yields infinities.
fn extent(points: &[Point]) -> (f64, f64, f64, f64) {
    points.iter().fold(
        (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(min_x, min_y, max_x, max_y), p| (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y)),
    )
}

/// The 21 keypoints of one hand, in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct HandKeypoints([Point; NUM_HAND_LANDMARKS]);

impl HandKeypoints {
    pub const fn new(points: [Point; NUM_HAND_LANDMARKS]) -> Self {
        Self(points)
    }

    /// Build from a slice, which must hold exactly 21 points
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the slice has the wrong length
    pub fn from_slice(points: &[Point]) -> Result<Self> {
        <[Point; NUM_HAND_LANDMARKS]>::try_from(points)
            .map(Self)
            .map_err(|_| {
                Error::InvalidInput(format!(
                    "Expected {NUM_HAND_LANDMARKS} hand landmarks, got {}",
                    points.len()
                ))
            })
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Point {
        self.0[index]
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Vertical extent of the hand (max y - min y)
    #[must_use]
    pub fn bbox_height(&self) -> f64 {
        let (_, min_y, _, max_y) = extent(&self.0);
        max_y - min_y
    }
}

/// The 468 face mesh keypoints of one face, in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct FaceKeypoints(Box<[Point; NUM_FACE_LANDMARKS]>);

impl FaceKeypoints {
    /// Build from a vector, which must hold exactly 468 points
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the vector has the wrong length
    pub fn from_vec(points: Vec<Point>) -> Result<Self> {
        let len = points.len();
        let boxed: Box<[Point; NUM_FACE_LANDMARKS]> = points.into_boxed_slice().try_into().map_err(|_| {
            Error::InvalidInput(format!("Expected {NUM_FACE_LANDMARKS} face landmarks, got {len}"))
        })?;
        Ok(Self(boxed))
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Point {
        self.0[index]
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0[..]
    }

    /// Width and height of the tight keypoint box
    #[must_use]
    pub fn extent_size(&self) -> (f64, f64) {
        let (min_x, min_y, max_x, max_y) = extent(&self.0[..]);
        ((max_x - min_x).abs(), (max_y - min_y).abs())
    }

    /// Keypoint box grown by `padding` pixels on each side and clamped to the frame
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // pixel coordinates fit in i32
    pub fn padded_bbox(&self, padding: i32, frame_width: u32, frame_height: u32) -> BoundingBox {
        let (min_x, min_y, max_x, max_y) = extent(&self.0[..]);
        let frame_w = i32::try_from(frame_width).unwrap_or(i32::MAX);
        let frame_h = i32::try_from(frame_height).unwrap_or(i32::MAX);

        let x_min = (min_x as i32).saturating_sub(padding).clamp(0, frame_w);
        let y_min = (min_y as i32).saturating_sub(padding).clamp(0, frame_h);
        let x_max = (max_x as i32).saturating_add(padding).clamp(0, frame_w);
        let y_max = (max_y as i32).saturating_add(padding).clamp(0, frame_h);

        // an all-NaN face has an inverted extent
        BoundingBox::new(x_min, y_min, (x_max - x_min).max(0), (y_max - y_min).max(0))
    }
}

/// One hand as reported for a frame
#[derive(Debug, Clone, PartialEq)]
pub struct HandDetection {
    pub handedness: Handedness,
    pub keypoints: HandKeypoints,
}

/// The face reported for a frame
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDetection {
    pub keypoints: FaceKeypoints,
}

/// Everything the perception model reported for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameLandmarks {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Zero or more hands; side labels are not guaranteed unique
    pub hands: Vec<HandDetection>,
    /// At most one face
    pub face: Option<FaceDetection>,
    /// Set when face analysis failed for this frame
    pub face_error: Option<String>,
}
