//! FinQA data-point form in the terminal
//!
//! Annotators fill in a prompt, an answer, supporting facts and the SEC
//! filings they came from. Fields are validated as they are entered and
//! the form is only handed off once the submission gate lets it through.
//!
//! - `finqa` / `finqa fill`: interactive form
//! - `finqa check draft.json`: validate a saved draft
//! - `finqa instructions`: print the annotator instructions

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use finqa_core::{FormConfig, FormSession, SubmissionPayload, INSTRUCTIONS};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod attachment;
mod commands;
mod draft;
mod render;
mod repl;
mod terminal;

use draft::Draft;
use render::{describe_verdict, render_errors};
use repl::Repl;

/// Command-line arguments for the FinQA form
#[derive(Parser, Debug)]
#[command(name = "finqa")]
#[command(about = "Finance Q/A data-point entry form")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// JSON form configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Delay between hand-off and form reset, in milliseconds
    #[arg(long, global = true)]
    submit_delay_ms: Option<u64>,

    /// Refuse to submit while any field is empty
    #[arg(long, global = true)]
    require_complete: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill in the form interactively
    Fill {
        /// Start from a saved draft
        #[arg(long)]
        draft: Option<PathBuf>,

        /// Wrap width for `show`
        #[arg(long, default_value = "80")]
        columns: usize,
    },
    /// Validate a saved draft and report what submitting it would do
    Check {
        draft: PathBuf,

        /// Print the submission payload when the draft would go through
        #[arg(long)]
        json: bool,
    },
    /// Print the annotator instructions
    Instructions {
        #[arg(long)]
        json: bool,
    },
}

fn load_config(args: &Args) -> anyhow::Result<FormConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            FormConfig::from_json(&json)?
        }
        None => FormConfig::default(),
    };
    if let Some(ms) = args.submit_delay_ms {
        config.submit_delay_ms = ms;
    }
    if args.require_complete {
        config.require_complete = true;
    }
    Ok(config)
}

fn check_draft(config: FormConfig, path: &Path, json: bool) -> anyhow::Result<ExitCode> {
    let mut session = FormSession::new(config);
    Draft::load(path)?.apply(session.form_mut())?;

    print!("{}", render_errors(session.form().errors()));
    let verdict = session.assess();
    println!("{}", describe_verdict(&verdict));

    if verdict.is_blocking() {
        return Ok(ExitCode::FAILURE);
    }
    if json {
        let payload = SubmissionPayload::from(session.form().data());
        println!("{}", payload.to_json_pretty()?);
    }
    Ok(ExitCode::SUCCESS)
}

async fn fill(config: FormConfig, draft: Option<&Path>, columns: usize) -> anyhow::Result<()> {
    let mut session = FormSession::new(config);
    if let Some(path) = draft {
        Draft::load(path)?.apply(session.form_mut())?;
        info!("Loaded draft {}", path.display());
    }

    let stdin = io::stdin();
    let mut repl = Repl::new(session, stdin.lock(), io::stdout(), columns);
    repl.run().await
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Logs go to stderr so they stay out of the form
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = load_config(&args)?;
    info!(
        submit_delay_ms = config.submit_delay_ms,
        require_complete = config.require_complete,
        "configuration loaded"
    );

    match &args.command {
        None => fill(config, None, 80).await?,
        Some(Command::Fill { draft, columns }) => fill(config, draft.as_deref(), *columns).await?,
        Some(Command::Check { draft, json }) => return check_draft(config, draft, *json),
        Some(Command::Instructions { json }) => {
            if *json {
                println!("{}", serde_json::to_string_pretty(&INSTRUCTIONS)?);
            } else {
                print!("{}", INSTRUCTIONS.render_text());
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finqa.json");
        fs::write(&path, r#"{ "submitDelayMs": 5000, "rules": { "minTextLength": 20 } }"#).unwrap();

        let args = Args::parse_from([
            "finqa",
            "--config",
            path.to_str().unwrap(),
            "--submit-delay-ms",
            "0",
            "--require-complete",
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.submit_delay_ms, 0);
        assert_eq!(config.rules.min_text_length, 20);
        assert!(config.require_complete);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finqa.json");
        fs::write(&path, r#"{ "rules": { "secLinkPrefix": "" } }"#).unwrap();

        let args = Args::parse_from(["finqa", "--config", path.to_str().unwrap()]);
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_subcommands_parse() {
        let args = Args::parse_from(["finqa", "check", "draft.json", "--json", "-v"]);
        assert!(args.verbose);
        assert!(matches!(
            args.command,
            Some(Command::Check { json: true, .. })
        ));
    }
}
