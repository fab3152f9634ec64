//! Additive rule scoring of face metrics.
//!
//! Rules are independent and stack. The neutral label carries a fixed
//! baseline; a winner scoring below [`MIN_EMOTION_SCORE`] is reported as
//! neutral. Ties resolve in [`Emotion::PRIORITY`] order.

use super::{Emotion, FaceMetrics};
use crate::constants::{MIN_EMOTION_SCORE, NEUTRAL_BASELINE_SCORE};
use crate::landmarks::FaceKeypoints;
use serde::Serialize;

/// Accumulated rule points per label
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EmotionScores {
    pub feliz: f64,
    pub triste: f64,
    pub brava: f64,
    pub normal: f64,
}

impl EmotionScores {
    /// Scores of a face that could not be measured
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            normal: NEUTRAL_BASELINE_SCORE,
            ..Self::default()
        }
    }

    /// Apply every rule to a set of metrics
    #[must_use]
    pub fn from_metrics(m: &FaceMetrics) -> Self {
        let mut scores = Self::neutral();

        if m.mouth_curve > 2.5 {
            scores.feliz += 3.0;
        }
        if m.mouth_curve > 4.0 {
            scores.feliz += 2.0;
        }
        if m.avg_eye_open < 4.5 {
            scores.feliz += 2.5;
        }
        if m.mouth_aspect > 0.18 {
            scores.feliz += 1.5;
        }
        if m.mouth_curve > 3.0 && m.avg_eye_open < 5.0 {
            scores.feliz += 2.0;
        }

        if m.mouth_curve < -3.5 {
            scores.triste += 5.0;
        }
        if m.mouth_curve < -2.5 {
            scores.triste += 3.0;
        }
        if m.mouth_curve < -1.5 {
            scores.triste += 1.5;
        }
        if m.avg_eye_open > 6.0 && m.mouth_curve < -2.0 {
            scores.triste += 1.0;
        }

        // eyebrow distance tiers are exclusive
        if m.avg_eyebrow_dist < 4.5 {
            scores.brava += 6.0;
        } else if m.avg_eyebrow_dist < 5.5 {
            scores.brava += 4.0;
        } else if m.avg_eyebrow_dist < 6.5 {
            scores.brava += 2.0;
        }
        if m.eyebrow_drop < -1.0 {
            scores.brava += 2.0;
        }

        scores
    }

    #[must_use]
    pub fn get(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Feliz => self.feliz,
            Emotion::Triste => self.triste,
            Emotion::Brava => self.brava,
            Emotion::Normal => self.normal,
        }
    }

    /// Highest-scoring label and its score, first in priority order on ties
    #[must_use]
    pub fn leader(&self) -> (Emotion, f64) {
        Emotion::PRIORITY
            .into_iter()
            .map(|emotion| (emotion, self.get(emotion)))
            .fold((Emotion::Normal, f64::NEG_INFINITY), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            })
    }

    /// Final label: the leader, or neutral when the leader is too weak
    #[must_use]
    pub fn decide(&self) -> Emotion {
        let (leader, score) = self.leader();
        if score < MIN_EMOTION_SCORE {
            Emotion::Normal
        } else {
            leader
        }
    }
}

/// Outcome of scoring one face
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmotionAssessment {
    pub emotion: Emotion,
    pub scores: EmotionScores,
    /// `None` when the face was too small to measure
    pub metrics: Option<FaceMetrics>,
}

impl EmotionAssessment {
    /// Score of the reported label
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.scores.get(self.emotion)
    }
}

/// Score a face and pick its label
#[must_use]
pub fn score_face(face: &FaceKeypoints) -> EmotionAssessment {
    match FaceMetrics::measure(face) {
        Some(metrics) => {
            let scores = EmotionScores::from_metrics(&metrics);
            EmotionAssessment {
                emotion: scores.decide(),
                scores,
                metrics: Some(metrics),
            }
        }
        None => EmotionAssessment {
            emotion: Emotion::Normal,
            scores: EmotionScores::neutral(),
            metrics: None,
        },
    }
}

/// Raw per-frame label of a face
#[must_use]
pub fn classify_face(face: &FaceKeypoints) -> Emotion {
    score_face(face).emotion
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> FaceMetrics {
        FaceMetrics {
            face_size: 200.0,
            mouth_curve: 0.0,
            mouth_width: 30.0,
            mouth_height: 2.0,
            mouth_aspect: 2.0 / 30.0,
            avg_eyebrow_dist: 8.0,
            eyebrow_drop: -8.0,
            avg_eye_open: 5.5,
        }
    }

    #[test]
    fn test_neutral_metrics() {
        let scores = EmotionScores::from_metrics(&metrics());
        assert_eq!(scores.feliz, 0.0);
        assert_eq!(scores.triste, 0.0);
        assert_eq!(scores.brava, 2.0);
        assert_eq!(scores.normal, 1.0);
        assert_eq!(scores.decide(), Emotion::Normal);
    }

    #[test]
    fn test_feliz_rules_stack() {
        let m = FaceMetrics {
            mouth_curve: 4.5,
            avg_eye_open: 4.0,
            mouth_aspect: 0.2,
            ..metrics()
        };
        let scores = EmotionScores::from_metrics(&m);
        assert_eq!(scores.feliz, 3.0 + 2.0 + 2.5 + 1.5 + 2.0);
        assert_eq!(scores.decide(), Emotion::Feliz);
    }

    #[test]
    fn test_triste_rules_nest() {
        let m = FaceMetrics {
            mouth_curve: -4.0,
            avg_eye_open: 6.5,
            ..metrics()
        };
        let scores = EmotionScores::from_metrics(&m);
        assert_eq!(scores.triste, 5.0 + 3.0 + 1.5 + 1.0);
        assert_eq!(scores.decide(), Emotion::Triste);
    }

    #[test]
    fn test_brava_tiers_exclusive() {
        for (dist, expected) in [(4.0, 8.0), (5.0, 6.0), (6.0, 4.0), (7.0, 2.0)] {
            let m = FaceMetrics {
                avg_eyebrow_dist: dist,
                ..metrics()
            };
            assert_eq!(EmotionScores::from_metrics(&m).brava, expected, "eyebrow dist {dist}");
        }
    }

    #[test]
    fn test_weak_leader_forced_to_normal() {
        let scores = EmotionScores {
            brava: 2.5,
            ..EmotionScores::neutral()
        };
        assert_eq!(scores.leader().0, Emotion::Brava);
        assert_eq!(scores.decide(), Emotion::Normal);
    }

    #[test]
    fn test_tie_break_priority() {
        let scores = EmotionScores {
            feliz: 5.0,
            triste: 5.0,
            brava: 5.0,
            normal: 1.0,
        };
        assert_eq!(scores.decide(), Emotion::Feliz);

        let scores = EmotionScores {
            feliz: 1.0,
            triste: 4.0,
            brava: 4.0,
            normal: 1.0,
        };
        assert_eq!(scores.decide(), Emotion::Triste);
    }

    #[test]
    fn test_nan_metrics_are_neutral() {
        let m = FaceMetrics {
            mouth_curve: f64::NAN,
            avg_eyebrow_dist: f64::NAN,
            eyebrow_drop: f64::NAN,
            avg_eye_open: f64::NAN,
            mouth_aspect: f64::NAN,
            ..metrics()
        };
        assert_eq!(EmotionScores::from_metrics(&m).decide(), Emotion::Normal);
    }
}
