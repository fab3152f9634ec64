//! Tests for command-line argument parsing
//!
//! Note: These tests verify the argument parser configuration by creating
//! a test parser with the same structure as the main application.

use clap::{Arg, ArgAction, Command as ClapCommand};

/// Create a command with the same argument structure as the main binary
fn create_test_command() -> ClapCommand {
    ClapCommand::new("finger-emotion")
        .version("0.1.0")
        .about("Finger counter and emotion demo")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("PATH")
                .help("Recorded landmark stream, - for stdin"),
        )
        .arg(
            Arg::new("command")
                .long("command")
                .value_name("PROGRAM")
                .conflicts_with("input")
                .help("Landmark helper to run"),
        )
        .arg(
            Arg::new("arg")
                .long("arg")
                .value_name("ARG")
                .action(ArgAction::Append)
                .allow_hyphen_values(true)
                .requires("command")
                .help("Argument passed to the landmark helper"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Report format"),
        )
        .arg(
            Arg::new("hysteresis")
                .long("hysteresis")
                .value_name("FRAMES")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("emotion-window")
                .long("emotion-window")
                .value_name("FRAMES")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(Arg::new("no-emotion").long("no-emotion").action(ArgAction::SetTrue))
        .arg(Arg::new("gestures").long("gestures").action(ArgAction::SetTrue))
        .arg(Arg::new("finger-states").long("finger-states").action(ArgAction::SetTrue))
        .arg(Arg::new("debug").short('d').long("debug").action(ArgAction::SetTrue))
        .arg(
            Arg::new("config")
                .short('C')
                .long("config")
                .value_name("PATH")
                .help("Configuration file"),
        )
}

#[test]
fn test_help_argument() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["finger-emotion", "--help"]);

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn test_no_arguments() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["finger-emotion"]);

    assert!(result.is_ok());
    let matches = result.unwrap();
    assert!(matches.get_one::<String>("input").is_none());
    assert!(!matches.get_flag("gestures"));
    assert!(!matches.get_flag("debug"));
}

#[test]
fn test_input_argument() {
    let cmd = create_test_command();
    let matches = cmd
        .try_get_matches_from(vec!["finger-emotion", "-i", "session.jsonl", "-f", "json"])
        .unwrap();

    assert_eq!(matches.get_one::<String>("input").map(String::as_str), Some("session.jsonl"));
    assert_eq!(matches.get_one::<String>("format").map(String::as_str), Some("json"));
}

#[test]
fn test_command_with_args() {
    let cmd = create_test_command();
    let matches = cmd
        .try_get_matches_from(vec![
            "finger-emotion",
            "--command",
            "python3",
            "--arg",
            "helper.py",
            "--arg",
            "--camera=0",
        ])
        .unwrap();

    let args: Vec<&String> = matches.get_many::<String>("arg").unwrap().collect();
    assert_eq!(args, vec!["helper.py", "--camera=0"]);
}

#[test]
fn test_input_command_conflict() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["finger-emotion", "-i", "-", "--command", "helper"]);

    assert!(result.is_err());
    assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn test_arg_requires_command() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["finger-emotion", "--arg", "x"]);
    assert!(result.is_err());
}

#[test]
fn test_numeric_overrides() {
    let cmd = create_test_command();
    let matches = cmd
        .try_get_matches_from(vec!["finger-emotion", "--hysteresis", "3", "--emotion-window", "9", "--gestures"])
        .unwrap();

    assert_eq!(matches.get_one::<usize>("hysteresis"), Some(&3));
    assert_eq!(matches.get_one::<usize>("emotion-window"), Some(&9));
    assert!(matches.get_flag("gestures"));
}

#[test]
fn test_invalid_numeric_value() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["finger-emotion", "--hysteresis", "two"]);
    assert!(result.is_err());
}
