//! metalint CLI - structural linter for plugin-extension artifacts

mod json;
mod text;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use metalint_core::config::DEFAULT_CONFIG_FILE;
use metalint_core::{resolve_paths, validate_paths, ArtifactKind, LintConfig};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "metalint")]
#[command(author, version)]
#[command(
    about = "Lint skills, agents, commands, hooks and plugins",
    long_about = "Structural checks for plugin-extension artifacts.\n\n\
                  Each subcommand takes a file, a directory or a quoted glob pattern.\n\
                  Exits 1 when any artifact has an error; warnings never fail a run."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (defaults to ./.metalint.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Show rule IDs, suggestions and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output (also honours NO_COLOR)
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate skills (SKILL.md)
    Skill {
        /// SKILL.md file, skill directory, skills directory or glob
        path: String,
    },

    /// Validate agent definitions
    Agent {
        /// Agent .md file, agents directory or glob
        path: String,
    },

    /// Validate slash commands
    Command {
        /// Command .md file, commands directory (recursive) or glob
        path: String,
    },

    /// Validate hook settings (settings*.json)
    Hook {
        /// Settings file, directory holding settings*.json or glob
        path: String,
    },

    /// Validate plugins
    Plugin {
        /// Plugin directory, directory of plugins or glob
        path: String,
    },

    /// Write the default config file
    Init {
        /// Output path for config
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

/// Logs go to stderr so `--format json` output stays parseable
fn init_logging(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns whether every validated artifact passed
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let (kind, arg) = match &cli.command {
        Commands::Init { output } => {
            init_command(output)?;
            return Ok(true);
        }
        Commands::Skill { path } => (ArtifactKind::Skill, path),
        Commands::Agent { path } => (ArtifactKind::Agent, path),
        Commands::Command { path } => (ArtifactKind::Command, path),
        Commands::Hook { path } => (ArtifactKind::Hook, path),
        Commands::Plugin { path } => (ArtifactKind::Plugin, path),
    };

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let config = LintConfig::discover(cli.config.as_deref(), &cwd)?;

    let paths = resolve_paths(kind, arg, &config)?;
    let report = validate_paths(kind, &paths, &config);

    match cli.format {
        OutputFormat::Text => print!("{}", text::TextReport::new(&report, cli.verbose)),
        OutputFormat::Json => {
            let output = json::report_to_json(&report, &cwd);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(report.passed())
}

fn init_command(output: &Path) -> anyhow::Result<()> {
    let default_config = LintConfig::default();
    let toml_content = toml::to_string_pretty(&default_config)?;

    std::fs::write(output, toml_content)
        .with_context(|| format!("cannot write {}", output.display()))?;

    println!(
        "{} Created config file: {}",
        "✓".green().bold(),
        output.display()
    );

    Ok(())
}
