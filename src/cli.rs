use crate::config::types::{OutputFormat, ReporterConfig};
use crate::engine::{SubprocessEngine, DEFAULT_TOOL_NAME};
use crate::harness::Harness;
use crate::report::{is_running_under_teamcity, Console, NullReporter, TeamcityReporter};
use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// Most options mirror the engine's own and are passed through untouched;
/// only --verbose, --exclude, --output-format, and --engine are interpreted
/// here.
#[derive(Parser)]
#[command(
    name = "modernize-reporter",
    version,
    about = "Walks a file tree, runs a code-modernization engine on each Python source file, \
             and reports a per-file verdict: unchanged, needs fix, or unknown error."
)]
struct Cli {
    /// Show more verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Each FIX specifies a transformation; '-f default' includes default fixers
    #[arg(short = 'f', long = "fix", value_name = "FIX")]
    fix: Vec<String>,

    /// Prevent a fixer from being run
    #[arg(short = 'x', long = "nofix", value_name = "FIX")]
    nofix: Vec<String>,

    /// Modify the grammar so that print() is a function
    #[arg(short = 'p', long)]
    print_function: bool,

    /// Wrap unicode literals in six.u()
    #[arg(long)]
    six_unicode: bool,

    /// Use 'from __future__ import unicode_literals'
    #[arg(long)]
    future_unicode: bool,

    /// Exclude fixes that depend on the six package
    #[arg(long)]
    no_six: bool,

    /// Pass --enforce to the engine (non-zero engine exit when fixers applied)
    #[arg(long)]
    enforce: bool,

    /// Exclude a file or directory
    #[arg(short = 'e', long = "exclude", value_name = "PATH")]
    exclude: Vec<String>,

    /// Rendering of per-file results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output_format: OutputFormat,

    /// Engine command to invoke instead of the default python-modernize
    #[arg(long, value_name = "CMD")]
    engine: Option<String>,

    /// Files or directories to check
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

impl Cli {
    /// Long-form pass-through arguments for every engine invocation.
    fn passthrough_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for fix in &self.fix {
            args.push(format!("--fix={}", fix));
        }
        for nofix in &self.nofix {
            args.push(format!("--nofix={}", nofix));
        }
        if self.print_function {
            args.push("--print-function".to_string());
        }
        if self.six_unicode {
            args.push("--six-unicode".to_string());
        }
        if self.future_unicode {
            args.push("--future-unicode".to_string());
        }
        if self.no_six {
            args.push("--no-six".to_string());
        }
        if self.enforce {
            args.push("--enforce".to_string());
        }
        args
    }

    fn to_config(&self) -> ReporterConfig {
        ReporterConfig {
            tool_name: self
                .engine
                .clone()
                .unwrap_or_else(|| DEFAULT_TOOL_NAME.to_string()),
            passthrough: self.passthrough_args(),
            excludes: self.exclude.clone(),
            verbose: self.verbose,
            output_format: self.output_format,
        }
    }
}

pub fn run() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.paths.is_empty() {
        Cli::command().print_help()?;
        anyhow::bail!("no files or directories given");
    }

    let config = cli.to_config();
    let under_teamcity = is_running_under_teamcity();

    let mut console = Console::stdio(config.verbose, config.output_format);
    console.banner(&config.tool_name, under_teamcity)?;

    let engine = SubprocessEngine::new(config.tool_name.clone());
    let mut harness = Harness::new(config, engine);

    // Per-file engine failures are classified and reported, never fatal;
    // the overall process exit code stays 0 for a completed walk.
    if under_teamcity {
        let mut reporter = TeamcityReporter::stdout();
        harness.run(&cli.paths, &mut console, &mut reporter)?;
    } else {
        let mut reporter = NullReporter;
        harness.run(&cli.paths, &mut console, &mut reporter)?;
    }

    Ok(())
}
