//! Finsight main entry point
//!
//! Command-line interface over the Finsight dispatcher.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use finsight::config::{load_config_with_hash, Config};
use finsight::output::{render_error, render_response, render_role_table};
use finsight::{Collaborators, Dispatcher, Outcome, Request, Response, Role};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Finsight: company research plumbing with a polite content extractor
///
/// Finsight checks robots.txt before fetching any page, reduces pages to
/// their main body text, and composes company reports from pluggable
/// market data and encyclopedia background.
#[derive(Parser, Debug)]
#[command(name = "finsight")]
#[command(version)]
#[command(about = "Polite web content extraction for company research", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Role whose capabilities apply to the request
    #[arg(short, long, value_enum, default_value_t = Role::All, global = true)]
    role: Role,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether robots.txt permits fetching a URL
    Policy { url: String },

    /// Reduce a page to its main body text
    Extract { url: String },

    /// Fetch a page's unprocessed markup (robots.txt still applies)
    Raw { url: String },

    /// Reduce several pages, reporting each one in input order
    Batch {
        /// URLs to reduce
        urls: Vec<String>,

        /// File with one URL per line ('#' starts a comment)
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Compose a company report for a ticker symbol
    Company { symbol: String },

    /// Look up encyclopedia background for a company name
    Background {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Show the role table in effect
    Roles,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load(cli.config.as_deref())?;
    let dispatcher = Dispatcher::new(&config, Collaborators::new())
        .context("Failed to initialize components")?;

    let request = match cli.command {
        Command::Roles => {
            return Ok(handle_roles(&dispatcher, cli.json));
        }
        Command::Policy { url } => Request::CheckPolicy { url },
        Command::Extract { url } => Request::ReduceContent { url },
        Command::Raw { url } => Request::FetchRaw { url },
        Command::Batch { urls, file } => Request::ReduceBatch {
            urls: collect_urls(urls, file.as_deref())?,
        },
        Command::Company { symbol } => Request::CompanyReport { symbol },
        Command::Background { name } => Request::CompanyBackground {
            company_name: name.join(" "),
        },
    };

    let outcome = dispatcher.dispatch(cli.role, request).await;
    print_outcome(&outcome, cli.json)?;
    Ok(exit_code(&outcome))
}

/// Loads configuration from `path`, or the defaults when no path is given
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e).with_context(|| format!("Invalid configuration {}", path.display()))
        }
    }
}

/// Merges URLs from the command line and from `file`, keeping their order
fn collect_urls(mut urls: Vec<String>, file: Option<&Path>) -> anyhow::Result<Vec<String>> {
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read URL list {}", path.display()))?;
        urls.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }

    if urls.is_empty() {
        bail!("No URLs given; pass them as arguments or with --file");
    }
    Ok(urls)
}

fn handle_roles(dispatcher: &Dispatcher, json: bool) -> ExitCode {
    let table = dispatcher.role_table();
    if json {
        let map: std::collections::BTreeMap<String, Vec<String>> = table
            .iter()
            .map(|(role, caps)| {
                (
                    role.to_string(),
                    caps.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect();
        match serde_json::to_string_pretty(&map) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", render_role_table(table));
    }
    ExitCode::SUCCESS
}

fn print_outcome(outcome: &Outcome<Response>, json: bool) -> anyhow::Result<()> {
    if json {
        let text =
            serde_json::to_string_pretty(outcome).context("Failed to serialize result as JSON")?;
        println!("{}", text);
        return Ok(());
    }

    match outcome {
        Outcome::Success { data } => println!("{}", render_response(data)),
        Outcome::Error { error } => eprintln!("{}", render_error(error)),
    }
    Ok(())
}

/// 0 on success, 1 on error, 2 when a batch or report only partly succeeded
fn exit_code(outcome: &Outcome<Response>) -> ExitCode {
    match outcome {
        Outcome::Error { .. } => ExitCode::from(1),
        Outcome::Success {
            data: Response::Batch(batch),
        } if batch.failed() > 0 => ExitCode::from(2),
        Outcome::Success {
            data: Response::Report(report),
        } if report.status != finsight::market::ReportStatus::Complete => ExitCode::from(2),
        Outcome::Success { .. } => ExitCode::SUCCESS,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("finsight=info,warn"),
            1 => EnvFilter::new("finsight=debug,info"),
            2 => EnvFilter::new("finsight=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
