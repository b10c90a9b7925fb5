use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use longscribe::cli::{Cli, Commands, ConfigAction};
use longscribe::config::Config;
use longscribe::pipeline::{JobStatus, NoopProgress, ProgressSink, TranscriptionJob};
use longscribe::{GeminiClient, analysis};
use owo_colors::OwoColorize;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match &cli.command {
        None => {
            let Some(input) = cli.input.clone() else {
                bail!("No input file given. Run `longscribe --help` for usage.");
            };
            let config = load_config(&cli)?;
            run_transcribe(&cli, config, &input).await?;
        }
        Some(Commands::Summarize { file, mode, output }) => {
            let config = load_config(&cli)?;
            let client = make_client(&cli, &config)?;
            let transcript = fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let summary = analysis::summarize(&client, &transcript, *mode).await?;
            write_output(&summary, output.as_deref())?;
        }
        Some(Commands::Translate { file, lang, output }) => {
            let config = load_config(&cli)?;
            let client = make_client(&cli, &config)?;
            let text = fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let translated = analysis::translate(&client, &text, lang).await?;
            write_output(&translated, output.as_deref())?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => {
                let config = load_config(&cli)?;
                print!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigAction::Path => {
                println!("{}", config_path(&cli).display());
            }
        },
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(Config::default_path)
}

/// Config file < environment < command line.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_or_default(&config_path(cli))?.with_env_overrides();

    if let Some(key) = &cli.api_key {
        config.model.api_key = Some(key.clone());
    }
    if let Some(model) = &cli.model {
        config.model.name = model.clone();
    }
    if let Some(chunk) = cli.chunk {
        config.chunking.chunk_secs = chunk;
    }
    if let Some(overlap) = cli.overlap {
        config.chunking.overlap_secs = overlap;
    }

    config.validate()?;
    Ok(config)
}

fn make_client(cli: &Cli, config: &Config) -> Result<GeminiClient> {
    let Some(api_key) = config.model.api_key.clone() else {
        bail!(
            "No API key configured. Pass --api-key, set LONGSCRIBE_API_KEY, \
             or add model.api_key to {}",
            config_path(cli).display()
        );
    };
    Ok(
        GeminiClient::new(api_key, config.model.name.clone()).with_temperatures(
            config.model.transcribe_temperature,
            config.model.analysis_temperature,
        ),
    )
}

async fn run_transcribe(cli: &Cli, config: Config, input: &Path) -> Result<()> {
    let client = make_client(cli, &config)?;
    let file =
        fs::File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;

    let job = TranscriptionJob::with_config(client, config.job_config());

    // Ctrl-C finishes the current part, keeps what is already reconciled
    let token = job.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nStopping after the current part...");
            token.cancel();
        }
    });

    let outcome = if cli.quiet {
        job.run(BufReader::new(file), &NoopProgress).await?
    } else {
        let progress = BarProgress::new();
        let outcome = job.run(BufReader::new(file), &progress).await;
        progress.finish();
        outcome?
    };

    write_output(&outcome.transcript, cli.output.as_deref())?;

    match outcome.status {
        JobStatus::Completed => {
            if !cli.quiet {
                eprintln!(
                    "{}",
                    format!(
                        "Transcribed {} part(s)",
                        outcome.chunks_processed
                    )
                    .green()
                );
            }
            Ok(())
        }
        JobStatus::Cancelled => {
            eprintln!(
                "{}",
                format!(
                    "Cancelled after {}/{} part(s); partial transcript kept",
                    outcome.chunks_processed, outcome.total_chunks
                )
                .yellow()
            );
            Ok(())
        }
        JobStatus::Failed(e) => {
            eprintln!(
                "{}",
                format!(
                    "Failed on part {}/{}: {} (transcript up to that part kept)",
                    outcome.chunks_processed + 1,
                    outcome.total_chunks,
                    e
                )
                .red()
            );
            bail!("transcription incomplete");
        }
    }
}

fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", text),
    }
    Ok(())
}

/// Progress bar rendering for interactive runs.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            // SAFETY: hardcoded template string, always valid
            #[allow(clippy::expect_used)]
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}% {msg}")
                .expect("hardcoded progress bar template")
                .progress_chars("#>-"),
        );
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for BarProgress {
    fn report(&self, status: &str, percent: u8) {
        self.bar.set_position(percent as u64);
        self.bar.set_message(status.to_string());
    }
}
