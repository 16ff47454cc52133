// SPDX-License-Identifier: PMPL-1.0-or-later
//! wcagbot CLI - heuristic WCAG violation detection for HTML documents
//!
//! Part of the gitbot-fleet ecosystem.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wcagbot::audit::CommandAuditEngine;
use wcagbot::config::{default_config_path, load_config, Config};
use wcagbot::report::{export_lines, generate_report, OutputFormat, Summary};
use wcagbot::violation::has_critical;
use wcagbot::Engine;

/// Heuristic WCAG violation detection for HTML documents
#[derive(Parser)]
#[command(name = "wcagbot")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a document and report violations
    Analyze {
        /// HTML file to analyze, or `-` for stdin
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Print one line per affected node
    Export {
        /// HTML file to analyze, or `-` for stdin
        input: PathBuf,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Print violation and node counts per rule and severity
    Summary {
        /// HTML file to analyze, or `-` for stdin
        input: PathBuf,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Run the rules plus an external audit engine, printing both as JSON
    Audit {
        /// HTML file to analyze, or `-` for stdin
        input: PathBuf,

        /// Audit command and its arguments (defaults to `audit.command`)
        #[arg(long, num_args = 1.., allow_hyphen_values = true)]
        command: Vec<String>,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// List the rules in execution order
    Rules,
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

fn init_logging(verbose: bool, config: &Config) {
    let filter = if verbose {
        EnvFilter::new("wcagbot=debug")
    } else {
        EnvFilter::new(format!("wcagbot={}", config.log.level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configuration and set up logging for a subcommand
fn setup(config: Option<&Path>, verbose: bool) -> anyhow::Result<Config> {
    let path = config.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let config = load_config(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    init_logging(verbose, &config);
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { input, format, output, config, verbose } => {
            let config = setup(config.as_deref(), verbose)?;
            let source = read_input(&input)?;
            let violations = Engine::new(&config).analyze(&source);
            let report = generate_report(&violations, format.into(), &artifact_name(&input));
            write_output(&report, output.as_deref())?;

            if has_critical(&violations) {
                std::process::exit(1);
            }
        }

        Commands::Export { input, config, verbose } => {
            let config = setup(config.as_deref(), verbose)?;
            let source = read_input(&input)?;
            let violations = Engine::new(&config).analyze(&source);
            for line in export_lines(&violations) {
                println!("{}", line);
            }
        }

        Commands::Summary { input, json, config, verbose } => {
            let config = setup(config.as_deref(), verbose)?;
            let source = read_input(&input)?;
            let summary = Summary::from_violations(&Engine::new(&config).analyze(&source));
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary.to_text());
            }
        }

        Commands::Audit { input, command, config, verbose } => {
            let config = setup(config.as_deref(), verbose)?;
            let command = if command.is_empty() {
                config.audit.command.clone()
            } else {
                command
            };
            let auditor = CommandAuditEngine::from_command_line(&command)
                .context("No audit command given; pass --command or set audit.command")?;
            let source = read_input(&input)?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let analysis =
                runtime.block_on(Engine::new(&config).analyze_with_audit(&source, &auditor));
            println!("{}", serde_json::to_string_pretty(&analysis)?);

            if has_critical(&analysis.violations) {
                std::process::exit(1);
            }
        }

        Commands::Rules => {
            for rule in Engine::default().rules() {
                println!("{:<26} {:<9} {}", rule.id(), rule.severity(), rule.description());
            }
        }
    }

    Ok(())
}

/// Read the document from a file, or stdin for `-`
fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn artifact_name(input: &Path) -> String {
    if input == Path::new("-") {
        "<stdin>".to_string()
    } else {
        input.display().to_string()
    }
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
