//! Landmark providers.
//!
//! Hand pose and face mesh extraction run outside this crate. Providers
//! deliver, per frame, the normalized keypoints the perception model found,
//! one JSON object per line:
//!
//! ```json
//! {"width": 640, "height": 480,
//!  "hands": [{"handedness": "Left", "landmarks": [{"x": 0.41, "y": 0.62}, ...]}],
//!  "face": {"landmarks": [{"x": 0.50, "y": 0.31}, ...]}}
//! ```
//!
//! `face_error` marks a frame whose face analysis failed; `error` marks a
//! frame the provider could not process at all. Keypoints are converted to
//! pixels here, so everything downstream works on [`FrameLandmarks`].

use crate::landmarks::{
    landmarks_to_pixels, FaceDetection, FaceKeypoints, FrameLandmarks, HandDetection, HandKeypoints, Handedness,
    NormalizedLandmark,
};
use crate::{Error, Result};
use log::{debug, info, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, StdinLock};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

/// Source of per-frame landmark detections
pub trait LandmarkSource {
    /// Next frame, or `None` once the stream has ended
    ///
    /// # Errors
    ///
    /// `Io` errors end the stream; other errors only affect the current frame.
    fn next_frame(&mut self) -> Result<Option<FrameLandmarks>>;

    /// Whether the provider can analyse faces at all
    fn face_available(&self) -> bool {
        true
    }

    /// Release provider resources; failures are swallowed
    fn close(&mut self) {}

    /// Human readable description
    fn name(&self) -> &str;
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    #[serde(default)]
    score: Option<f32>,
    landmarks: Vec<NormalizedLandmark>,
}

#[derive(Deserialize, Debug)]
struct FaceJson {
    landmarks: Vec<NormalizedLandmark>,
}

#[derive(Deserialize, Debug)]
struct FrameJson {
    width: u32,
    height: u32,
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    face: Option<FaceJson>,
    #[serde(default)]
    face_error: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode one JSON line into pixel-space detections
///
/// Hands with an unknown side label or the wrong number of keypoints are
/// dropped with a warning, as is a malformed face.
///
/// # Errors
///
/// Returns `Json` for undecodable input and `Provider` when the provider
/// flagged the frame as failed.
pub fn decode_frame(line: &str) -> Result<FrameLandmarks> {
    let frame: FrameJson = serde_json::from_str(line)?;
    if let Some(error) = frame.error {
        return Err(Error::Provider(error));
    }

    let (width, height) = (frame.width, frame.height);
    let hands = frame
        .hands
        .into_iter()
        .filter_map(|hand| {
            let handedness = match hand.handedness.parse::<Handedness>() {
                Ok(side) => side,
                Err(e) => {
                    warn!("Skipping hand: {e}");
                    return None;
                }
            };
            let points = landmarks_to_pixels(&hand.landmarks, width, height);
            match HandKeypoints::from_slice(&points) {
                Ok(keypoints) => {
                    debug!("{handedness} hand detected (score {:?})", hand.score);
                    Some(HandDetection { handedness, keypoints })
                }
                Err(e) => {
                    warn!("Skipping {handedness} hand: {e}");
                    None
                }
            }
        })
        .collect();

    let face = frame.face.and_then(|face| {
        let points = landmarks_to_pixels(&face.landmarks, width, height);
        match FaceKeypoints::from_vec(points) {
            Ok(keypoints) => Some(FaceDetection { keypoints }),
            Err(e) => {
                warn!("Skipping face: {e}");
                None
            }
        }
    });

    Ok(FrameLandmarks {
        width,
        height,
        hands,
        face,
        face_error: frame.face_error,
    })
}

/// Reads frames as JSON lines from any buffered reader
pub struct JsonLinesSource<R: BufRead> {
    reader: R,
    name: String,
    line: String,
    line_number: usize,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            line: String::new(),
            line_number: 0,
        }
    }

    /// Number of lines consumed so far
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read one raw line, `None` at end of stream
    fn read_line(&mut self) -> Result<Option<&str>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        Ok(Some(self.line.trim()))
    }
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a recorded landmark stream
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::IoError(format!("Cannot open landmark file {}: {e}", path.display())))?;
        info!("Reading landmarks from {}", path.display());
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl JsonLinesSource<StdinLock<'static>> {
    /// Read landmarks piped into standard input
    #[must_use]
    pub fn stdin() -> Self {
        info!("Reading landmarks from standard input");
        Self::new(std::io::stdin().lock(), "stdin")
    }
}

impl<R: BufRead> LandmarkSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<FrameLandmarks>> {
        loop {
            let line_number = self.line_number + 1;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if line.is_empty() {
                continue;
            }
            return decode_frame(line)
                .map(Some)
                .map_err(|e| match e {
                    Error::Json(err) => Error::Provider(format!("{} line {line_number}: {err}", self.name)),
                    other => other,
                });
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Runs an external perception helper and reads its landmark stream
///
/// The helper must print `READY` on its first line, optionally followed by
/// the capabilities it offers (`READY hands face`). Without a `face`
/// capability face analysis is reported unavailable.
pub struct SubprocessSource {
    process: Option<Child>,
    frames: JsonLinesSource<BufReader<ChildStdout>>,
    face_available: bool,
}

impl SubprocessSource {
    /// Start the helper and wait for its ready line
    ///
    /// # Errors
    ///
    /// Returns `Provider` if the helper cannot be started or does not signal ready
    pub fn spawn(command: &str, args: &[String]) -> Result<Self> {
        info!("Starting landmark helper: {command} {}", args.join(" "));

        let mut process = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Provider(format!("Failed to start {command}: {e}")))?;

        let Some(stdout) = process.stdout.take() else {
            let _ = process.kill();
            return Err(Error::Provider("Landmark helper has no stdout".to_string()));
        };
        let mut frames = JsonLinesSource::new(BufReader::new(stdout), command.to_string());

        let handshake = frames.read_line().map(|line| line.map(str::to_owned));
        let ready = match handshake {
            Ok(Some(line)) if line.split_whitespace().next() == Some("READY") => line,
            Ok(other) => {
                let _ = process.kill();
                let _ = process.wait();
                return Err(Error::Provider(format!("Landmark helper did not signal ready, got: {other:?}")));
            }
            Err(e) => {
                let _ = process.kill();
                let _ = process.wait();
                return Err(e);
            }
        };

        let capabilities: Vec<&str> = ready.split_whitespace().skip(1).collect();
        let face_available = capabilities.is_empty() || capabilities.contains(&"face");
        info!("Landmark helper ready (face analysis: {face_available})");

        Ok(Self {
            process: Some(process),
            frames,
            face_available,
        })
    }
}

impl LandmarkSource for SubprocessSource {
    fn next_frame(&mut self) -> Result<Option<FrameLandmarks>> {
        if self.process.is_none() {
            return Ok(None);
        }
        self.frames.next_frame()
    }

    fn face_available(&self) -> bool {
        self.face_available
    }

    fn close(&mut self) {
        if let Some(mut process) = self.process.take() {
            debug!("Stopping landmark helper");
            let _ = process.kill();
            let _ = process.wait();
        }
    }

    fn name(&self) -> &str {
        self.frames.name()
    }
}

impl Drop for SubprocessSource {
    fn drop(&mut self) {
        self.close();
    }
}
