mod interactive;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use a11y_lens_core::{
    client_for, render_report, Auditor, DefaultAuditor, LlmSettings, OutputFormat,
    SourceRepository, WalkdirSourceRepository, WcagLevel, WcagVersion,
};
use settings::FileConfig;

/// Environment variable acknowledging that file contents will be sent
/// to a remote model endpoint, skipping the interactive confirmation.
const ACK_ENV: &str = "A11Y_LENS_ACK";

#[derive(Parser, Debug)]
#[command(
    name = "a11y-lens",
    author,
    version,
    about = "AI-assisted WCAG accessibility scanner"
)]
struct Cli {
    /// JSON config file (extensions, excluded dirs, patterns, model)
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a directory for WCAG accessibility issues
    Scan {
        /// Directory to scan (prompted for when omitted)
        directory: Option<PathBuf>,

        /// WCAG conformance level: A, AA, or AAA
        #[arg(long)]
        level: Option<WcagLevel>,

        /// WCAG version: 2.0, 2.1, or 2.2
        #[arg(long = "wcag-version")]
        wcag_version: Option<WcagVersion>,

        /// Output format: table, list, or json
        #[arg(long)]
        format: Option<String>,

        /// Skip the confirmation before sending file contents to the
        /// model endpoint
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// List the files a scan would cover, without any network calls
    ListFiles {
        /// Directory to inspect (defaults to the current directory)
        directory: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = FileConfig::load(cli.config.as_deref())?;
    match cli.command.unwrap_or(Commands::Scan {
        directory: None,
        level: None,
        wcag_version: None,
        format: None,
        yes: false,
    }) {
        Commands::Scan {
            directory,
            level,
            wcag_version,
            format,
            yes,
        } => scan(&config, directory, level, wcag_version, format, yes).await?,
        Commands::ListFiles { directory } => list_files(&config, directory).await?,
    }
    Ok(())
}

async fn scan(
    config: &FileConfig,
    directory: Option<PathBuf>,
    level: Option<WcagLevel>,
    version: Option<WcagVersion>,
    format: Option<String>,
    yes: bool,
) -> Result<()> {
    let level = match level {
        Some(level) => level,
        None => interactive::prompt_level()?,
    };
    let version = match version {
        Some(version) => version,
        None => interactive::prompt_version()?,
    };
    let format = resolve_format(format)?;
    let directory = match directory {
        Some(dir) => dir,
        None => interactive::prompt_directory()?,
    };

    let mut llm = LlmSettings::from_env()?;
    if llm.model.is_none() {
        llm.model = config.model.clone();
    }
    let client = client_for(&llm)?;

    let repo = Arc::new(WalkdirSourceRepository::with_filter(
        &directory,
        config.scan_filter(),
    ));
    let files = repo.discover().await.with_context(|| {
        format!("failed to discover files under {}", directory.display())
    })?;
    if files.is_empty() {
        println!("No supported files found in {}.", directory.display());
        return Ok(());
    }

    if llm.provider.to_lowercase() != "noop" && !yes && !network_acknowledged() {
        let confirmed = interactive::confirm_send(files.len(), &llm.provider)?;
        if !confirmed {
            bail!("scan aborted; no file contents were sent");
        }
    }

    println!(
        "Scanning {} file(s) for WCAG {} ({}) issues...\n",
        files.len(),
        version,
        level
    );

    let auditor = DefaultAuditor::new(repo, client, level, version);
    for path in files {
        println!("{} {}", "Scanning:".cyan().bold(), path.display());
        let report = match auditor.audit_file(&path).await {
            Ok(report) => report,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read file; skipping");
                continue;
            }
        };
        println!("{}", render_report(&report, format)?);
    }
    Ok(())
}

async fn list_files(config: &FileConfig, directory: Option<PathBuf>) -> Result<()> {
    let directory = directory.unwrap_or_else(|| PathBuf::from("."));
    let repo = WalkdirSourceRepository::with_filter(&directory, config.scan_filter());
    let files = repo.discover().await.with_context(|| {
        format!("failed to discover files under {}", directory.display())
    })?;
    println!(
        "{} file(s) would be scanned under {}",
        files.len(),
        directory.display()
    );
    for path in files {
        println!("- {}", path.display());
    }
    Ok(())
}

fn resolve_format(format: Option<String>) -> Result<OutputFormat> {
    let raw = match format {
        Some(raw) => raw,
        None => interactive::prompt_format()?,
    };
    Ok(raw.parse().unwrap_or_else(|err: String| {
        warn!("{err}; defaulting to table");
        OutputFormat::Table
    }))
}

fn network_acknowledged() -> bool {
    std::env::var(ACK_ENV)
        .map(|v| {
            let v = v.trim().to_ascii_lowercase();
            v == "1" || v == "true" || v == "yes"
        })
        .unwrap_or(false)
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tokio=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
