//! Harness orchestration
//!
//! Strictly sequential: one file is fully processed (captured, classified,
//! reported) before the next begins. The capture context and its log sink
//! are one per harness, so per-file parallelism would corrupt captured
//! text; that is a structural property of this design, not a tuning knob.

use crate::capture::CaptureContext;
use crate::config::types::{
    Classification, ReporterConfig, Result, Task, Verdict, EXIT_UNKNOWN,
};
use crate::engine::RefactorEngine;
use crate::report::{Console, TestReporter};
use crate::verdict::VerdictResolver;
use std::path::Path;

/// Drives the walk: runs the engine once per task and turns the captured
/// signals into exactly one verdict per file. Engine failures are absorbed
/// per file; the walk always continues.
pub struct Harness<E> {
    config: ReporterConfig,
    engine: E,
    capture: CaptureContext,
}

impl<E: RefactorEngine> Harness<E> {
    pub fn new(config: ReporterConfig, engine: E) -> Self {
        Harness {
            config,
            engine,
            capture: CaptureContext::new(),
        }
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Walk every root in order, classifying each discovered file.
    pub fn run(
        &mut self,
        roots: &[impl AsRef<Path>],
        console: &mut Console,
        reporter: &mut dyn TestReporter,
    ) -> Result<()> {
        for root in roots {
            self.run_root(root.as_ref(), console, reporter)?;
        }
        console.separator()?;
        console.flush()
    }

    /// Walk one root and classify each file it contributes.
    pub fn run_root(
        &mut self,
        root: &Path,
        console: &mut Console,
        reporter: &mut dyn TestReporter,
    ) -> Result<()> {
        for path in crate::walk::discover(root, &self.config.excludes)? {
            let task = self.config.task_for(&path);
            self.classify(&task, console, reporter)?;
        }
        Ok(())
    }

    /// Classify one task. Returns the captured stdout and stderr text plus
    /// the effective result code, exactly once per task.
    pub fn classify(
        &mut self,
        task: &Task,
        console: &mut Console,
        reporter: &mut dyn TestReporter,
    ) -> Result<(String, String, i32)> {
        let name = task.display_name();

        console.separator()?;
        reporter.test_started(&name)?;

        // testFinished must follow testStarted on every path, including a
        // failed console write in between.
        let body = self.classify_body(task, console, reporter);
        let finished = reporter.test_finished(&name);
        let out = body?;
        finished?;
        Ok(out)
    }

    fn classify_body(
        &mut self,
        task: &Task,
        console: &mut Console,
        reporter: &mut dyn TestReporter,
    ) -> Result<(String, String, i32)> {
        let name = task.display_name();
        console.checking(task)?;

        let argv = task.argv();
        let capture = self.capture.run(&mut self.engine, &argv);

        if self.config.verbose || capture.code == EXIT_UNKNOWN {
            console.dump_capture(&capture)?;
        }

        let command_line = VerdictResolver::command_line(&self.config.tool_name, &argv);
        let result = VerdictResolver::resolve(&capture, &command_line);
        log::debug!(
            "classified {}: {:?} (raw code {}, effective {})",
            name,
            result.verdict,
            capture.code,
            result.code
        );

        console.classification(task, &result)?;

        if result.verdict != Verdict::Unchanged {
            reporter.test_failed(&name, &failure_message(&name, &result), detail_text(&result))?;
        }

        Ok((capture.stdout, capture.stderr, result.code))
    }
}

fn failure_message(name: &str, result: &Classification) -> String {
    format!("{} {}", result.verdict.label(), name)
}

fn detail_text(result: &Classification) -> &str {
    result.detail.as_deref().unwrap_or("")
}
