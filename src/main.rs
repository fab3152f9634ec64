//! Finger counter and emotion demo driven by a landmark stream.

use anyhow::Result;
use clap::Parser;
use finger_emotion::app::FingerEmotionApp;
use finger_emotion::config::{Config, OutputFormat, SourceKind};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded landmark stream (JSON lines), `-` for standard input
    #[arg(short, long)]
    input: Option<String>,

    /// Landmark helper to run instead of reading a stream
    #[arg(long, conflicts_with = "input")]
    command: Option<String>,

    /// Arguments passed to the landmark helper
    #[arg(long = "arg", requires = "command", allow_hyphen_values = true)]
    command_args: Vec<String>,

    /// Report format (text, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Frames a new finger count must persist before it is shown
    #[arg(long)]
    hysteresis: Option<usize>,

    /// Emotion majority vote window
    #[arg(long)]
    emotion_window: Option<usize>,

    /// Disable face analysis
    #[arg(long)]
    no_emotion: bool,

    /// Recognize the L and gun hand shapes
    #[arg(long)]
    gestures: bool,

    /// Show per-digit flags in the text report
    #[arg(long)]
    finger_states: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Finger Counter & Emotion");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // command line flags override the file
    match args.input.as_deref() {
        Some("-") => config.source.kind = SourceKind::Stdin,
        Some(path) => {
            config.source.kind = SourceKind::File;
            config.source.path = Some(PathBuf::from(path));
        }
        None => {}
    }
    if let Some(command) = args.command {
        config.source.kind = SourceKind::Command;
        config.source.command = Some(command);
        config.source.args = args.command_args;
    }
    if let Some(format) = args.format {
        config.output.format = format.parse::<OutputFormat>()?;
    }
    if let Some(frames) = args.hysteresis {
        config.finger.hysteresis_frames = frames;
    }
    if let Some(window) = args.emotion_window {
        config.emotion.history_size = window;
    }
    if args.no_emotion {
        config.emotion.enabled = false;
    }
    if args.gestures {
        config.gesture.enabled = true;
    }
    if args.finger_states {
        config.output.show_finger_states = true;
    }

    let mut app = FingerEmotionApp::new(config)?;
    app.run()?;

    Ok(())
}
