//! hookgate - commit-quality gate for git hooks
//!
//! Entry point for the `pre-commit` and `commit-msg` hooks plus the
//! supporting `install-hooks`, `docs` and `config` commands.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hookgate::docgen::DocGenerator;
use hookgate::hooks::{install_hooks, InstallStatus};
use hookgate::operations::{GitCli, ProcessRunner, RealFileSystem};
use hookgate::quality::commit_msg::{read_message_file, suggestion_block};
use hookgate::quality::gates::DOC_REMINDER;
use hookgate::{
    check_commit_message, CheckResult, CheckStatus, CommitMessageValidator, ConfigOverrides,
    FileClassifier, GateConfig, GateError, MessageVerdict, PreCommitGate, StagedFileSet,
};

/// Tool output lines shown under a failed check.
const MAX_OUTPUT_LINES: usize = 40;

#[derive(Parser)]
#[command(name = "hookgate")]
#[command(version)]
#[command(about = "Commit-quality gate: lint, coverage, pattern and commit message checks", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Configuration file (defaults to <project>/.hookgate.toml)
    #[arg(short, long, global = true, env = "HOOKGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Minimum aggregate coverage percentage
    #[arg(long, global = true, env = "HOOKGATE_MIN_COVERAGE", value_name = "PCT")]
    min_coverage: Option<u32>,

    /// Per-file coverage percentage below which a file is flagged
    #[arg(long, global = true, env = "HOOKGATE_MIN_FILE_COVERAGE", value_name = "PCT")]
    min_file_coverage: Option<u32>,

    /// Minimum commit message length in characters
    #[arg(long, global = true, env = "HOOKGATE_MIN_MESSAGE_LENGTH", value_name = "CHARS")]
    min_message_length: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pre-commit checks against the staged files
    PreCommit {
        /// Output the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a commit message file (as passed by git to commit-msg)
    CommitMsg {
        /// Path of the commit message file
        file: PathBuf,
    },

    /// Install the pre-commit and commit-msg hooks into .git/hooks
    InstallHooks {
        /// Replace existing hooks
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a Markdown API reference from JSDoc comments
    Docs {
        /// Output file (defaults to docs.output from the configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only document staged source files
        #[arg(long)]
        staged: bool,
    },

    /// Show or validate the effective configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Show the paths hookgate reads and writes
    Paths,
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "hookgate=debug"
        } else {
            "hookgate=warn"
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            e.downcast_ref::<GateError>()
                .map_or(1, GateError::exit_code)
        }
    };

    std::process::exit(code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let project_path = cli.project.canonicalize().unwrap_or(cli.project.clone());

    if !project_path.is_dir() {
        anyhow::bail!(
            "Project directory does not exist: {}",
            project_path.display()
        );
    }

    let overrides = ConfigOverrides {
        min_overall: cli.min_coverage,
        min_per_file: cli.min_file_coverage,
        min_length: cli.min_message_length,
    };
    let load_config = || -> hookgate::Result<GateConfig> {
        GateConfig::load(&project_path, cli.config.as_deref())?.with_overrides(&overrides)
    };

    match cli.command {
        Commands::PreCommit { json } => {
            let config = load_config()?;
            let git = GitCli::new(project_path.clone());
            let runner = ProcessRunner::new(project_path.clone());
            let fs = RealFileSystem::new(project_path.clone());
            let gate = PreCommitGate::new(&config, &git, &runner, &fs);

            if json {
                let outcome = gate.run()?;
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(outcome.exit_code());
            }

            println!("\n{} Running pre-commit checks", "hookgate:".cyan().bold());
            println!("{}", "─".repeat(40));
            let outcome = gate.run_with(print_result)?;
            println!("{}", "─".repeat(40));

            let banner = outcome.format();
            if outcome.blocked {
                print!("{}", banner.red().bold());
            } else {
                print!("{}", banner.green().bold());
            }
            Ok(outcome.exit_code())
        }

        Commands::CommitMsg { file } => {
            let config = load_config()?;
            let message = read_message_file(&file)?;
            let validator = CommitMessageValidator::new(config.commit_msg.clone());
            let classifier = FileClassifier::from_config(&config)?;
            let git = GitCli::new(project_path.clone());

            let report = check_commit_message(&message, &validator, &git, &classifier);
            match &report.verdict {
                MessageVerdict::Skipped { prefix } => {
                    debug!(%prefix, "Commit message checks skipped");
                }
                MessageVerdict::Rejected { length, min_length } => {
                    eprintln!(
                        "{} Commit message too short ({} characters, minimum {})",
                        "✗".red().bold(),
                        length,
                        min_length
                    );
                }
                MessageVerdict::Accepted { generic: true } => {
                    println!(
                        "{} Generic commit message: '{}'",
                        "⚠".yellow().bold(),
                        message.trim()
                    );
                    println!("{}", suggestion_block());
                }
                MessageVerdict::Accepted { generic: false } => {}
            }

            if report.doc_reminder == Some(true) {
                println!("{} {}", "⚠".yellow().bold(), DOC_REMINDER);
            }
            Ok(report.exit_code())
        }

        Commands::InstallHooks { force } => {
            let installed = install_hooks(&project_path, force)?;
            println!("\n{} Git hooks", "hookgate:".cyan().bold());
            for hook in &installed {
                match hook.status {
                    InstallStatus::Created => {
                        println!("   {} .git/hooks/{}", "Created:".green(), hook.name);
                    }
                    InstallStatus::Replaced => {
                        println!("   {} .git/hooks/{}", "Replaced:".yellow(), hook.name);
                    }
                    InstallStatus::SkippedExisting => println!(
                        "   {} .git/hooks/{} already exists (use --force to replace)",
                        "Skipped:".yellow(),
                        hook.name
                    ),
                }
            }
            Ok(0)
        }

        Commands::Docs { output, staged } => {
            let config = load_config()?;
            let classifier = FileClassifier::from_config(&config)?;
            let generator = DocGenerator::new(project_path.clone(), config.docs.clone());

            let files = if staged {
                let staged = StagedFileSet::from_vcs(&GitCli::new(project_path.clone()))?;
                staged
                    .source_files(&classifier)
                    .into_iter()
                    .filter(|p| !classifier.is_test(p))
                    .map(String::from)
                    .collect()
            } else {
                generator.discover(&classifier)?
            };

            let docs = generator.collect(&files, &RealFileSystem::new(project_path.clone()));
            let documented: usize = docs.iter().map(|d| d.entries.len()).sum();
            let path = generator.write(&docs, output.as_deref())?;

            println!(
                "{} {} documented function(s) from {} file(s) written to {}",
                "Docs:".cyan().bold(),
                documented,
                files.len(),
                path.display()
            );
            Ok(0)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                let config = load_config()?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    println!("{}", toml::to_string_pretty(&config)?);
                }
                Ok(0)
            }

            ConfigAction::Validate => {
                let path = config_file(&project_path, cli.config.as_deref());
                load_config()?;
                if path.exists() {
                    println!("{} {} is valid", "OK".green(), path.display());
                } else {
                    println!(
                        "{} {} not found (using defaults)",
                        "Info:".blue(),
                        path.display()
                    );
                }
                Ok(0)
            }

            ConfigAction::Paths => {
                let path = config_file(&project_path, cli.config.as_deref());
                let config = load_config().unwrap_or_default();
                println!("\n{} Configuration Paths", "Config:".cyan().bold());
                println!("{}", "─".repeat(40));
                println!(
                    "   Config file: {}{}",
                    path.display(),
                    if path.exists() { "" } else { " (not found)" }
                );
                println!(
                    "   Git hooks: {}",
                    project_path.join(".git").join("hooks").display()
                );
                println!(
                    "   Doc sources: {}",
                    project_path.join(&config.docs.source_dir).display()
                );
                println!(
                    "   Doc output: {}",
                    project_path.join(&config.docs.output).display()
                );
                Ok(0)
            }
        },
    }
}

fn config_file(project_path: &Path, explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(|| GateConfig::config_path(project_path), Path::to_path_buf)
}

/// Print one check result as it arrives.
fn print_result(result: &CheckResult) {
    let line = result.summary();
    match result.status {
        CheckStatus::Pass => println!("{}", line.green()),
        CheckStatus::Warn => println!("{}", line.yellow()),
        CheckStatus::Fail => println!("{}", line.red().bold()),
    }

    for finding in &result.findings {
        println!("    {}", finding.format());
    }

    if result.is_fail() && !result.output.is_empty() {
        let lines: Vec<&str> = result.output.lines().collect();
        for line in lines.iter().take(MAX_OUTPUT_LINES) {
            println!("    {}", line.dimmed());
        }
        if lines.len() > MAX_OUTPUT_LINES {
            println!(
                "    {}",
                format!("... {} more line(s)", lines.len() - MAX_OUTPUT_LINES).dimmed()
            );
        }
    }
}
