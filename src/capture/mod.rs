//! Output interception
//!
//! Runs exactly one engine invocation with its stdout and stderr channels
//! redirected into private in-memory sinks and the engine's named log
//! channel captured into a shared sink. The sinks are an explicit capture
//! context owned by the harness, not process-wide globals, so release is
//! a guarantee on every exit path, including a panic inside the engine.

use crate::config::types::{CapturedOutput, EXIT_UNKNOWN};
use crate::engine::{EngineExit, RefactorEngine};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

/// Shared sink for the engine's named log channel.
///
/// One sink exists per capture context and is reused across tasks, so it is
/// drained and reset before and after every invocation; cross-file
/// contamination here would silently corrupt the verdict downgrade rule.
#[derive(Clone, Debug, Default)]
pub struct LogSink {
    buffer: Arc<Mutex<String>>,
}

impl LogSink {
    pub fn new() -> Self {
        LogSink::default()
    }

    /// Append one formatted log line, `channel: message` plus a newline.
    pub fn append(&self, channel: &str, message: &str) {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        buffer.push_str(channel);
        buffer.push_str(": ");
        buffer.push_str(message);
        buffer.push('\n');
    }

    /// Take the accumulated text, leaving the sink empty.
    pub fn drain(&self) -> String {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *buffer)
    }

    /// Discard any accumulated text.
    pub fn reset(&self) {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        buffer.clear();
    }

    pub fn is_empty(&self) -> bool {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        buffer.is_empty()
    }
}

/// Sinks handed to the engine for the duration of one invocation.
pub struct EngineIo<'a> {
    stdout: &'a mut String,
    stderr: &'a mut String,
    log: &'a LogSink,
}

impl<'a> EngineIo<'a> {
    pub fn new(stdout: &'a mut String, stderr: &'a mut String, log: &'a LogSink) -> Self {
        EngineIo {
            stdout,
            stderr,
            log,
        }
    }

    pub fn write_stdout(&mut self, text: &str) {
        self.stdout.push_str(text);
    }

    pub fn write_stderr(&mut self, text: &str) {
        self.stderr.push_str(text);
    }

    /// Emit one line on a named log channel.
    pub fn log(&self, channel: &str, message: &str) {
        self.log.append(channel, message);
    }
}

/// Output interceptor: owns the shared log sink and produces one
/// [`CapturedOutput`] per invocation.
#[derive(Debug, Default)]
pub struct CaptureContext {
    log_sink: LogSink,
}

impl CaptureContext {
    pub fn new() -> Self {
        CaptureContext {
            log_sink: LogSink::new(),
        }
    }

    /// Handle to the shared log sink, for wiring an engine's logger.
    pub fn log_sink(&self) -> LogSink {
        self.log_sink.clone()
    }

    /// Run one engine invocation with all channels captured.
    ///
    /// Abnormal termination (an [`EngineExit::Aborted`] or a panic inside
    /// the entry point) is downgraded locally: a diagnostic line lands in
    /// the stdout sink and the result code becomes the [`EXIT_UNKNOWN`]
    /// sentinel. The log sink is empty both when the engine starts and
    /// when this returns, on every path.
    pub fn run(&mut self, engine: &mut dyn RefactorEngine, argv: &[String]) -> CapturedOutput {
        self.log_sink.reset();

        let mut stdout = String::new();
        let mut stderr = String::new();

        let exit = {
            let mut io = EngineIo::new(&mut stdout, &mut stderr, &self.log_sink);
            panic::catch_unwind(AssertUnwindSafe(|| engine.run(argv, &mut io)))
        };

        let code = match exit {
            Ok(EngineExit::Code(code)) => code,
            Ok(EngineExit::Aborted(reason)) => {
                stdout.push_str(&format!("'Modernize' exited abnormally: {}\n", reason));
                EXIT_UNKNOWN
            }
            Err(payload) => {
                stdout.push_str(&format!(
                    "'Modernize' exited abnormally: {}\n",
                    panic_message(payload.as_ref())
                ));
                EXIT_UNKNOWN
            }
        };

        let log = self.log_sink.drain();

        CapturedOutput {
            code,
            stdout,
            stderr,
            log,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
