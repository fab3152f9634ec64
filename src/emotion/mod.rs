//! Rule-based facial expression classification and smoothing.
//!
//! A face is reduced to a handful of geometric ratios (see [`features`]),
//! scored against additive rules (see [`scorer`]) and the raw per-frame
//! label is smoothed by majority vote over a short window
//! (see [`stabilizer`]).

/// Geometric ratios measured on the face mesh
pub mod features;

/// Additive rule scoring of face metrics
pub mod scorer;

/// Majority-vote smoothing with sticky last-known state
pub mod stabilizer;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use features::FaceMetrics;
pub use scorer::{classify_face, score_face, EmotionAssessment, EmotionScores};
pub use stabilizer::{EmotionResult, EmotionStabilizer};

/// Coarse facial expression label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Happy
    Feliz,
    /// Sad
    Triste,
    /// Angry
    Brava,
    /// Neutral
    #[default]
    Normal,
}

impl Emotion {
    /// All labels in tie-break priority order
    pub const PRIORITY: [Emotion; 4] = [Emotion::Feliz, Emotion::Triste, Emotion::Brava, Emotion::Normal];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Emotion::Feliz => "feliz",
            Emotion::Triste => "triste",
            Emotion::Brava => "brava",
            Emotion::Normal => "normal",
        }
    }

    /// Position in [`Emotion::PRIORITY`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Emotion::Feliz => 0,
            Emotion::Triste => 1,
            Emotion::Brava => 2,
            Emotion::Normal => 3,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Emotion::PRIORITY
            .into_iter()
            .find(|emotion| emotion.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown emotion label: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for emotion in Emotion::PRIORITY {
            assert_eq!(emotion.as_str().parse::<Emotion>().unwrap(), emotion);
            assert_eq!(Emotion::PRIORITY[emotion.index()], emotion);
        }
        assert!("happy".parse::<Emotion>().is_err());
    }

    #[test]
    fn test_default_is_normal() {
        assert_eq!(Emotion::default(), Emotion::Normal);
    }
}
