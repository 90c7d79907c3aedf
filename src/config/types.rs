/// Core types and structures for the modernize-reporter harness
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result code the engine returns when a file needed no edits
pub const EXIT_UNCHANGED: i32 = 0;
/// Result code the engine returns when it proposed changes
pub const EXIT_CHANGES: i32 = 2;
/// Sentinel assigned when the engine terminated abnormally instead of
/// returning a result code. Distinct from every code the engine can return.
pub const EXIT_UNKNOWN: i32 = -1;

/// One unit of work: a single file plus the immutable pass-through option
/// list to apply to it. Created by the walker per discovered file and
/// consumed exactly once.
#[derive(Clone, Debug)]
pub struct Task {
    /// File to hand to the engine
    pub path: PathBuf,
    /// Options forwarded verbatim to the engine, without the file path
    pub options: Vec<String>,
}

impl Task {
    pub fn new(path: impl Into<PathBuf>, options: Vec<String>) -> Self {
        Task {
            path: path.into(),
            options,
        }
    }

    /// Full argument list for one engine invocation: options, then the file.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = self.options.clone();
        argv.push(self.path.to_string_lossy().into_owned());
        argv
    }

    /// Display name used in classification lines and CI test events.
    pub fn display_name(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Raw signals captured from one engine invocation: the result code and the
/// three text channels. Owned by the verdict resolver for the duration of
/// one classification, then discarded.
#[derive(Clone, Debug, Default)]
pub struct CapturedOutput {
    /// Raw result code, or [`EXIT_UNKNOWN`] on abnormal termination
    pub code: i32,
    /// Text the engine wrote to its standard output channel
    pub stdout: String,
    /// Text the engine wrote to its standard error channel
    pub stderr: String,
    /// Text drained from the engine's named log channel
    pub log: String,
}

/// Final per-file classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The engine made no edits
    Unchanged,
    /// The engine proposed changes; recoverable, not a fault
    NeedsFix,
    /// Unrecognized result code with no diff to back it up
    Error,
}

impl Verdict {
    /// Prefix of the per-file classification line.
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Unchanged => "no change:",
            Verdict::NeedsFix => "needs fix:",
            Verdict::Error => "UNK_ERROR:",
        }
    }
}

/// Verdict plus supporting detail, the terminal output of the core for one
/// Task. Immutable once produced.
#[derive(Clone, Debug, Serialize)]
pub struct Classification {
    /// Final verdict after all tie-break rules
    pub verdict: Verdict,
    /// Effective result code (post log-override), returned to the caller
    pub code: i32,
    /// Accumulated modifications block, line by line
    pub modifications: Vec<String>,
    /// Human-readable detail block; `None` only for [`Verdict::Unchanged`]
    pub detail: Option<String>,
}

/// Report format for per-file results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable classification lines
    #[default]
    Text,
    /// One JSON object per classified file
    Json,
}

/// Harness configuration assembled by the CLI layer
#[derive(Clone, Debug)]
pub struct ReporterConfig {
    /// Display name of the engine, used when reconstructing command lines
    pub tool_name: String,
    /// Options forwarded verbatim to every engine invocation
    pub passthrough: Vec<String>,
    /// Files or directories the walker must skip entirely
    pub excludes: Vec<String>,
    /// Dump captured channels per file and print walk separators
    pub verbose: bool,
    /// Rendering of per-file results
    pub output_format: OutputFormat,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        ReporterConfig {
            tool_name: crate::engine::DEFAULT_TOOL_NAME.to_string(),
            passthrough: Vec::new(),
            excludes: Vec::new(),
            verbose: false,
            output_format: OutputFormat::Text,
        }
    }
}

impl ReporterConfig {
    /// Build the Task for one discovered file.
    pub fn task_for(&self, path: &Path) -> Task {
        Task::new(path, self.passthrough.clone())
    }
}

/// Errors surfaced by the harness glue. The verdict resolver itself never
/// fails; ambiguity is absorbed by the tie-break ordering instead.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Walk error: {0}")]
    Walk(String),

    #[error("Report error: {0}")]
    Report(String),
}

pub type Result<T> = std::result::Result<T, ReporterError>;

impl From<walkdir::Error> for ReporterError {
    fn from(err: walkdir::Error) -> Self {
        ReporterError::Walk(err.to_string())
    }
}
