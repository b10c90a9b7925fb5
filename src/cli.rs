//! Command-line interface for longscribe
//!
//! Provides argument parsing using clap derive macros.

use crate::analysis::SummaryMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Transcribe long recordings through a large-context model
#[derive(Parser, Debug)]
#[command(
    name = "longscribe",
    version,
    about = "Transcribe long recordings through a large-context model"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Audio file to transcribe (WAV). Used when no subcommand is given
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// API key for the model service (overrides config and environment)
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Model identifier (default: gemini-3-flash-preview)
    #[arg(long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Chunk duration (default: 9m). Examples: 540, 9m, 5m30s
    #[arg(long, value_name = "DURATION", value_parser = parse_duration_secs)]
    pub chunk: Option<f64>,

    /// Overlap replayed between chunks (default: 20s). Examples: 20, 30s
    #[arg(long, value_name = "DURATION", value_parser = parse_duration_secs)]
    pub overlap: Option<f64>,

    /// Write the transcript to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Parse a duration string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `9m`, `2h`), and compound (`1h30m`).
fn parse_duration_secs(s: &str) -> Result<f64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<f64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs_f64())
        .map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a transcript file
    Summarize {
        /// Transcript file to summarize
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Summary mode
        #[arg(long, value_enum, default_value_t = SummaryMode::Auto)]
        mode: SummaryMode,

        /// Write the summary to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Translate a transcript or summary file
    Translate {
        /// Text file to translate
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target language, e.g. "English", "Japanese"
        #[arg(long, value_name = "LANG")]
        lang: String,

        /// Write the translation to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Inspect configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration inspection actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the active configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_file_as_transcription_input() {
        let cli = Cli::parse_from(["longscribe", "meeting.wav"]);

        assert!(cli.command.is_none());
        assert_eq!(cli.input.unwrap(), PathBuf::from("meeting.wav"));
    }

    #[test]
    fn parses_chunk_and_overlap_durations() {
        let cli = Cli::parse_from([
            "longscribe",
            "meeting.wav",
            "--chunk",
            "9m",
            "--overlap",
            "30s",
        ]);

        assert_eq!(cli.chunk, Some(540.0));
        assert_eq!(cli.overlap, Some(30.0));
    }

    #[test]
    fn parses_bare_numbers_as_seconds() {
        assert_eq!(parse_duration_secs("540"), Ok(540.0));
        assert_eq!(parse_duration_secs("2.5"), Ok(2.5));
    }

    #[test]
    fn parses_compound_durations() {
        assert_eq!(parse_duration_secs("1h30m"), Ok(5400.0));
        assert_eq!(parse_duration_secs("5m30s"), Ok(330.0));
    }

    #[test]
    fn rejects_garbage_durations() {
        assert!(parse_duration_secs("soon").is_err());
    }

    #[test]
    fn parses_summarize_subcommand() {
        let cli = Cli::parse_from([
            "longscribe",
            "summarize",
            "transcript.txt",
            "--mode",
            "meeting",
        ]);

        match cli.command {
            Some(Commands::Summarize { file, mode, .. }) => {
                assert_eq!(file, PathBuf::from("transcript.txt"));
                assert_eq!(mode, SummaryMode::Meeting);
            }
            other => panic!("expected summarize, got {:?}", other),
        }
    }

    #[test]
    fn parses_translate_subcommand() {
        let cli = Cli::parse_from([
            "longscribe",
            "translate",
            "transcript.txt",
            "--lang",
            "Japanese",
        ]);

        match cli.command {
            Some(Commands::Translate { lang, .. }) => assert_eq!(lang, "Japanese"),
            other => panic!("expected translate, got {:?}", other),
        }
    }

    #[test]
    fn verbosity_flag_counts() {
        let cli = Cli::parse_from(["longscribe", "-vv", "meeting.wav"]);
        assert_eq!(cli.verbose, 2);
    }
}
