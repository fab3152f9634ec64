//! Main application module for the finger counter and emotion demo.

use crate::{
    config::{Config, OutputFormat, SourceKind},
    pipeline::FramePipeline,
    provider::{JsonLinesSource, LandmarkSource, SubprocessSource},
    render::{JsonReport, ReportSink, TextOverlay},
    Error, Result,
};
use log::{debug, error, info, warn};
use std::io::{self, BufWriter};
use std::time::{Duration, Instant};

/// Outcome of a finished session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Frames reported, including ones the provider failed on
    pub frames: u64,
    /// Frames the provider could not deliver
    pub failed_frames: u64,
    /// Average frames per second over the session
    pub fps: f64,
}

/// Main application
pub struct FingerEmotionApp {
    config: Config,
    pipeline: FramePipeline,
}

impl FingerEmotionApp {
    /// Create the application from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        info!("Initializing finger counter and emotion application");
        if config.gesture.enabled {
            info!("Gesture recognition enabled");
        }

        let pipeline = FramePipeline::from_config(&config);
        Ok(Self { config, pipeline })
    }

    #[must_use]
    pub fn pipeline(&self) -> &FramePipeline {
        &self.pipeline
    }

    /// Open the configured landmark source
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the helper fails to start
    pub fn open_source(&self) -> Result<Box<dyn LandmarkSource>> {
        let source = &self.config.source;
        match source.kind {
            SourceKind::Stdin => Ok(Box::new(JsonLinesSource::stdin())),
            SourceKind::File => {
                let path = source
                    .path
                    .as_ref()
                    .ok_or_else(|| Error::ConfigError("File source needs a path".to_string()))?;
                Ok(Box::new(JsonLinesSource::open(path)?))
            }
            SourceKind::Command => {
                let command = source
                    .command
                    .as_deref()
                    .ok_or_else(|| Error::ConfigError("Command source needs a command".to_string()))?;
                Ok(Box::new(SubprocessSource::spawn(command, &source.args)?))
            }
        }
    }

    /// Report sink writing to standard output in the configured format
    #[must_use]
    pub fn stdout_sink(&self) -> Box<dyn ReportSink> {
        let writer = BufWriter::new(io::stdout());
        match self.config.output.format {
            OutputFormat::Text => Box::new(TextOverlay::new(writer, self.config.output.show_finger_states)),
            OutputFormat::Json => Box::new(JsonReport::new(writer)),
        }
    }

    /// Run against the configured source, reporting to standard output
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be opened, the stream fails or
    /// reports cannot be written
    pub fn run(&mut self) -> Result<RunSummary> {
        let mut source = self.open_source()?;
        let mut sink = self.stdout_sink();
        self.run_with(source.as_mut(), sink.as_mut())
    }

    /// Run the main loop until the source is exhausted
    ///
    /// The source is closed on every exit path.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error of the stream or the sink
    pub fn run_with(&mut self, source: &mut dyn LandmarkSource, sink: &mut dyn ReportSink) -> Result<RunSummary> {
        info!("Starting main loop on {}", source.name());
        if !source.face_available() {
            self.pipeline.disable_face_analysis();
        }

        let result = self.event_loop(source, sink);
        source.close();

        match &result {
            Ok(summary) => info!(
                "Application shutting down after {} frames ({} failed, {:.1} FPS)",
                summary.frames, summary.failed_frames, summary.fps
            ),
            Err(e) => error!("Main loop stopped: {e}"),
        }
        result
    }

    #[allow(clippy::cast_precision_loss)]
    fn event_loop(&mut self, source: &mut dyn LandmarkSource, sink: &mut dyn ReportSink) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut last_fps_update = Instant::now();
        let mut failed_frames = 0;
        let mut fps = 0.0;

        loop {
            let report = match source.next_frame() {
                Ok(Some(frame)) => self.pipeline.process(&frame),
                Ok(None) => {
                    info!("End of landmark stream reached");
                    break;
                }
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => {
                    warn!("Frame {} failed: {e}", self.pipeline.frames_processed());
                    failed_frames += 1;
                    self.pipeline.process_missing()
                }
            };
            debug!("Frame {}: {} fingers", report.frame, report.fingers.total);
            sink.write_report(&report)?;

            if last_fps_update.elapsed() >= Duration::from_secs(1) {
                fps = self.pipeline.frames_processed() as f64 / start_time.elapsed().as_secs_f64();
                last_fps_update = Instant::now();
                info!("FPS: {fps:.1}");
            }
        }
        sink.flush()?;

        let frames = self.pipeline.frames_processed();
        let elapsed = start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            fps = frames as f64 / elapsed;
        }
        Ok(RunSummary {
            frames,
            failed_frames,
            fps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::FrameLandmarks;
    use crate::pipeline::FrameReport;
    use std::collections::VecDeque;

    struct ScriptedSource {
        frames: VecDeque<Result<Option<FrameLandmarks>>>,
        face: bool,
        closed: bool,
    }

    impl LandmarkSource for ScriptedSource {
        fn next_frame(&mut self) -> Result<Option<FrameLandmarks>> {
            self.frames.pop_front().unwrap_or(Ok(None))
        }

        fn face_available(&self) -> bool {
            self.face
        }

        fn close(&mut self) {
            self.closed = true;
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[derive(Default)]
    struct CollectSink(Vec<FrameReport>);

    impl ReportSink for CollectSink {
        fn write_report(&mut self, report: &FrameReport) -> Result<()> {
            self.0.push(report.clone());
            Ok(())
        }
    }

    fn source(frames: Vec<Result<Option<FrameLandmarks>>>, face: bool) -> ScriptedSource {
        ScriptedSource {
            frames: frames.into(),
            face,
            closed: false,
        }
    }

    #[test]
    fn test_provider_errors_become_missing_frames() {
        let mut app = FingerEmotionApp::new(Config::default()).unwrap();
        let mut src = source(
            vec![
                Ok(Some(FrameLandmarks::default())),
                Err(Error::Provider("model crashed".to_string())),
                Ok(Some(FrameLandmarks::default())),
            ],
            true,
        );
        let mut sink = CollectSink::default();

        let summary = app.run_with(&mut src, &mut sink).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.failed_frames, 1);
        assert_eq!(sink.0.len(), 3);
        assert_eq!(sink.0[1].frame, 1);
        assert!(src.closed);
    }

    #[test]
    fn test_io_error_ends_loop_and_closes() {
        let mut app = FingerEmotionApp::new(Config::default()).unwrap();
        let mut src = source(
            vec![
                Ok(Some(FrameLandmarks::default())),
                Err(Error::Io(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))),
                Ok(Some(FrameLandmarks::default())),
            ],
            true,
        );
        let mut sink = CollectSink::default();

        assert!(matches!(app.run_with(&mut src, &mut sink), Err(Error::Io(_))));
        assert_eq!(sink.0.len(), 1);
        assert!(src.closed);
    }

    #[test]
    fn test_face_unavailable_disables_emotion() {
        let mut app = FingerEmotionApp::new(Config::default()).unwrap();
        let mut src = source(Vec::new(), false);
        let mut sink = CollectSink::default();

        app.run_with(&mut src, &mut sink).unwrap();
        assert!(!app.pipeline().emotion_stabilizer().is_enabled());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.finger.hysteresis_frames = 0;
        assert!(FingerEmotionApp::new(config).is_err());
    }
}
