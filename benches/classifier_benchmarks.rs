//! Benchmarks for per-frame classification and stabilization

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use finger_emotion::constants::{NUM_FACE_LANDMARKS, NUM_HAND_LANDMARKS};
use finger_emotion::emotion::{score_face, Emotion, EmotionStabilizer};
use finger_emotion::finger_counter::FingerCounter;
use finger_emotion::finger_state::count_fingers;
use finger_emotion::landmarks::{BoundingBox, FaceKeypoints, HandDetection, HandKeypoints, Handedness, Point};

/// Hand keypoints scattered over a 200x300 px region
fn random_hand() -> HandKeypoints {
    let points: [Point; NUM_HAND_LANDMARKS] =
        std::array::from_fn(|_| Point::new(rand::random::<f64>() * 200.0, rand::random::<f64>() * 300.0));
    HandKeypoints::new(points)
}

/// Face mesh scattered over a 250x250 px region
fn random_face() -> FaceKeypoints {
    let points = (0..NUM_FACE_LANDMARKS)
        .map(|_| Point::new(rand::random::<f64>() * 250.0, rand::random::<f64>() * 250.0))
        .collect();
    FaceKeypoints::from_vec(points).expect("468 points")
}

fn benchmark_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    let hands: Vec<HandKeypoints> = (0..100).map(|_| random_hand()).collect();
    group.bench_function("count_fingers", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % hands.len();
            black_box(count_fingers(black_box(&hands[i])))
        });
    });

    let faces: Vec<FaceKeypoints> = (0..20).map(|_| random_face()).collect();
    group.bench_function("score_face", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % faces.len();
            black_box(score_face(black_box(&faces[i])))
        });
    });

    group.finish();
}

fn benchmark_stabilizers(c: &mut Criterion) {
    let mut group = c.benchmark_group("stabilizers");

    for hands_in_frame in [1usize, 2] {
        let frames: Vec<Vec<HandDetection>> = (0..100)
            .map(|_| {
                Handedness::ALL
                    .iter()
                    .take(hands_in_frame)
                    .map(|&handedness| HandDetection {
                        handedness,
                        keypoints: random_hand(),
                    })
                    .collect()
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("finger_counter_update", hands_in_frame),
            &frames,
            |b, frames| {
                let mut counter = FingerCounter::default();
                let mut i = 0;
                b.iter(|| {
                    i = (i + 1) % frames.len();
                    black_box(counter.update(black_box(&frames[i])))
                });
            },
        );
    }

    for window in [7usize, 30] {
        let labels: Vec<Emotion> = (0..256)
            .map(|_| Emotion::PRIORITY[rand::random::<usize>() % Emotion::PRIORITY.len()])
            .collect();
        let bbox = BoundingBox::new(10, 10, 200, 200);

        group.bench_with_input(BenchmarkId::new("emotion_observe", window), &labels, |b, labels| {
            let mut stabilizer = EmotionStabilizer::new(window);
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % labels.len();
                black_box(stabilizer.observe(black_box(labels[i]), bbox))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_classification, benchmark_stabilizers);
criterion_main!(benches);
