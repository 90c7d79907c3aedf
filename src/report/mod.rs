//! Reporting
//!
//! Console rendering of per-file classifications, plus the CI test-event
//! surface. When a TeamCity environment is detected, every classified file
//! becomes a properly nested testStarted / optional testFailed /
//! testFinished triple written as service messages.

use crate::config::types::{
    CapturedOutput, Classification, OutputFormat, Result, Task, Verdict,
};
use serde::Serialize;
use std::io::Write;

/// Environment variable TeamCity agents set for every build step.
const TEAMCITY_ENV_VAR: &str = "TEAMCITY_VERSION";

/// True when this process runs inside a TeamCity build.
pub fn is_running_under_teamcity() -> bool {
    std::env::var_os(TEAMCITY_ENV_VAR).is_some()
}

/// CI test-event consumer, one triple of calls per classified file.
///
/// Contract: `test_started` always precedes `test_finished`, and at most one
/// `test_failed` sits between them. Once started, a test is never left
/// unfinished.
pub trait TestReporter {
    fn test_started(&mut self, name: &str) -> Result<()>;
    fn test_failed(&mut self, name: &str, message: &str, details: &str) -> Result<()>;
    fn test_finished(&mut self, name: &str) -> Result<()>;
}

/// Reporter for runs outside any CI consumer.
#[derive(Debug, Default)]
pub struct NullReporter;

impl TestReporter for NullReporter {
    fn test_started(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn test_failed(&mut self, _name: &str, _message: &str, _details: &str) -> Result<()> {
        Ok(())
    }

    fn test_finished(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }
}

/// Writes `##teamcity[...]` service messages to the given sink.
pub struct TeamcityReporter<W: Write> {
    out: W,
}

impl TeamcityReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        TeamcityReporter {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> TeamcityReporter<W> {
    pub fn new(out: W) -> Self {
        TeamcityReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Escape a value for a TeamCity service-message attribute.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '|' => escaped.push_str("||"),
            '\'' => escaped.push_str("|'"),
            '[' => escaped.push_str("|["),
            ']' => escaped.push_str("|]"),
            '\n' => escaped.push_str("|n"),
            '\r' => escaped.push_str("|r"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl<W: Write> TestReporter for TeamcityReporter<W> {
    fn test_started(&mut self, name: &str) -> Result<()> {
        writeln!(
            self.out,
            "##teamcity[testStarted name='{}']",
            escape(name)
        )?;
        Ok(())
    }

    fn test_failed(&mut self, name: &str, message: &str, details: &str) -> Result<()> {
        writeln!(
            self.out,
            "##teamcity[testFailed name='{}' message='{}' details='{}']",
            escape(name),
            escape(message),
            escape(details)
        )?;
        Ok(())
    }

    fn test_finished(&mut self, name: &str) -> Result<()> {
        writeln!(
            self.out,
            "##teamcity[testFinished name='{}']",
            escape(name)
        )?;
        Ok(())
    }
}

/// One JSON line per classified file in `--output-format json` mode.
#[derive(Debug, Serialize)]
struct FileReport<'a> {
    file: &'a str,
    verdict: Verdict,
    code: i32,
    detail: Option<&'a str>,
}

/// Console rendering of the walk: banner, per-file classification lines,
/// verbose channel dumps, and the stderr echo of suggested changes.
pub struct Console {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    verbose: bool,
    format: OutputFormat,
}

impl Console {
    pub fn new(
        out: Box<dyn Write>,
        err: Box<dyn Write>,
        verbose: bool,
        format: OutputFormat,
    ) -> Self {
        Console {
            out,
            err,
            verbose,
            format,
        }
    }

    pub fn stdio(verbose: bool, format: OutputFormat) -> Self {
        Console::new(
            Box::new(std::io::stdout()),
            Box::new(std::io::stderr()),
            verbose,
            format,
        )
    }

    /// Version banner plus the CI-detection note, printed once per run.
    pub fn banner(&mut self, tool_name: &str, under_teamcity: bool) -> Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        writeln!(
            self.out,
            "modernize-reporter {} (engine: {})",
            env!("CARGO_PKG_VERSION"),
            tool_name
        )?;
        writeln!(self.out)?;
        if under_teamcity {
            writeln!(self.out, "Note: Running under TeamCity")?;
        } else {
            writeln!(self.out, "Note: NOT running under TeamCity")?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// Verbose-mode separator between files (and at end of run).
    pub fn separator(&mut self) -> Result<()> {
        if self.verbose && self.format == OutputFormat::Text {
            writeln!(self.out, "{}", "=".repeat(78))?;
        }
        Ok(())
    }

    /// Verbose-mode header for one file: name plus the full argument list.
    pub fn checking(&mut self, task: &Task) -> Result<()> {
        if self.verbose && self.format == OutputFormat::Text {
            writeln!(self.out, "checking:  {}", task.display_name())?;
            writeln!(self.out, "{:?}", task.argv())?;
        }
        Ok(())
    }

    /// Dump all three captured channels, one prefixed line each.
    /// Fires in verbose mode and unconditionally for unknown results.
    pub fn dump_capture(&mut self, capture: &CapturedOutput) -> Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        for line in capture.stderr.split('\n') {
            writeln!(self.out, "STDERR: {}", line)?;
        }
        for line in capture.stdout.split('\n') {
            writeln!(self.out, "STDOUT: {}", line)?;
        }
        for line in capture.log.split('\n') {
            writeln!(self.out, "STDlog: {}", line)?;
        }
        Ok(())
    }

    /// Render one classification: the per-file line, the detail block when
    /// non-trivial, and the per-line stderr echo of the modifications block.
    pub fn classification(&mut self, task: &Task, result: &Classification) -> Result<()> {
        let name = task.display_name();

        if self.format == OutputFormat::Json {
            let report = FileReport {
                file: &name,
                verdict: result.verdict,
                code: result.code,
                detail: result.detail.as_deref(),
            };
            let line = serde_json::to_string(&report)
                .map_err(|e| crate::config::types::ReporterError::Report(e.to_string()))?;
            writeln!(self.out, "{}", line)?;
            return Ok(());
        }

        writeln!(self.out, "{} {}", result.verdict.label(), name)?;
        if let Some(detail) = &result.detail {
            writeln!(self.out, "{}", detail)?;
        }

        let tag = match result.verdict {
            Verdict::NeedsFix => "modernize",
            _ => "INT_ERROR",
        };
        for line in &result.modifications {
            if !line.is_empty() {
                writeln!(self.err, "{}: {}", tag, line)?;
            }
        }
        writeln!(self.out)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        self.err.flush()?;
        Ok(())
    }
}
