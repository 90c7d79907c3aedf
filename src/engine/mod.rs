//! External engine boundary
//!
//! The modernization engine is an opaque dependency with an unreliable
//! contract: a callable entry point that returns an integer result code
//! (0 = no-op, 2 = changes proposed, anything else = unknown), or terminates
//! abnormally instead of returning. It also emits lines on a named log
//! channel (`RefactoringTool`) that the harness captures separately, because
//! the result code alone cannot be trusted.

use crate::capture::EngineIo;
use std::process::Command;

/// Display name of the default engine command.
pub const DEFAULT_TOOL_NAME: &str = "python-modernize";

/// Name of the log channel the engine writes diagnostics to.
pub const REFACTOR_LOG_CHANNEL: &str = "RefactoringTool";

/// How one engine invocation ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineExit {
    /// Normal return with a result code
    Code(i32),
    /// Abnormal termination; carries a description of the abort for the
    /// diagnostic line the interceptor emits
    Aborted(String),
}

/// One synchronous invocation of the modernization engine.
///
/// Implementations must write all engine output through `io` and nowhere
/// else, so the interceptor can guarantee isolation between files.
pub trait RefactorEngine {
    fn run(&mut self, argv: &[String], io: &mut EngineIo<'_>) -> EngineExit;
}

/// Engine backed by a real subprocess (`python-modernize` by default).
///
/// Stderr lines carrying the `RefactoringTool:` prefix are routed to the
/// named log channel; everything else stays on the stderr sink. This keeps
/// the log-marker contract intact even though the subprocess interleaves
/// its logger output with ordinary stderr.
pub struct SubprocessEngine {
    program: String,
}

impl SubprocessEngine {
    pub fn new(program: impl Into<String>) -> Self {
        SubprocessEngine {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for SubprocessEngine {
    fn default() -> Self {
        SubprocessEngine::new(DEFAULT_TOOL_NAME)
    }
}

impl RefactorEngine for SubprocessEngine {
    fn run(&mut self, argv: &[String], io: &mut EngineIo<'_>) -> EngineExit {
        let output = match Command::new(&self.program).args(argv).output() {
            Ok(output) => output,
            Err(err) => {
                return EngineExit::Aborted(format!(
                    "failed to launch '{}': {}",
                    self.program, err
                ));
            }
        };

        io.write_stdout(&String::from_utf8_lossy(&output.stdout));

        let channel_prefix = format!("{}: ", REFACTOR_LOG_CHANNEL);
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            match line.strip_prefix(channel_prefix.as_str()) {
                Some(message) => io.log(REFACTOR_LOG_CHANNEL, message),
                None => {
                    io.write_stderr(line);
                    io.write_stderr("\n");
                }
            }
        }

        match output.status.code() {
            Some(code) => EngineExit::Code(code),
            None => EngineExit::Aborted(terminated_without_code(&output.status)),
        }
    }
}

#[cfg(unix)]
fn terminated_without_code(status: &std::process::ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => format!("terminated by signal {}", signal),
        None => "terminated without exit code".to_string(),
    }
}

#[cfg(not(unix))]
fn terminated_without_code(_status: &std::process::ExitStatus) -> String {
    "terminated without exit code".to_string()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::capture::LogSink;

    fn run_sh(script: &str) -> (EngineExit, String, String, String) {
        let sink = LogSink::new();
        let mut stdout = String::new();
        let mut stderr = String::new();
        let exit = {
            let mut io = EngineIo::new(&mut stdout, &mut stderr, &sink);
            let mut engine = SubprocessEngine::new("sh");
            engine.run(&["-c".to_string(), script.to_string()], &mut io)
        };
        (exit, stdout, stderr, sink.drain())
    }

    #[test]
    fn captures_stdout_and_result_code() {
        let (exit, stdout, stderr, log) = run_sh("printf 'hello'; exit 2");
        assert_eq!(exit, EngineExit::Code(2));
        assert_eq!(stdout, "hello");
        assert!(stderr.is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn routes_refactoring_tool_lines_to_log_channel() {
        let (exit, _, stderr, log) = run_sh(
            "echo 'RefactoringTool: No changes to foo.py.' >&2; echo 'plain noise' >&2",
        );
        assert_eq!(exit, EngineExit::Code(0));
        assert_eq!(log, "RefactoringTool: No changes to foo.py.\n");
        assert_eq!(stderr, "plain noise\n");
    }

    #[test]
    fn signal_termination_is_an_abort() {
        let (exit, _, _, _) = run_sh("kill -9 $$");
        match exit {
            EngineExit::Aborted(reason) => assert!(reason.contains("signal 9"), "{}", reason),
            other => panic!("expected abort, got {:?}", other),
        }
    }

    #[test]
    fn missing_program_is_an_abort() {
        let sink = LogSink::new();
        let mut stdout = String::new();
        let mut stderr = String::new();
        let mut io = EngineIo::new(&mut stdout, &mut stderr, &sink);
        let mut engine = SubprocessEngine::new("definitely-not-a-real-binary-9f2c");
        match engine.run(&[], &mut io) {
            EngineExit::Aborted(reason) => assert!(reason.contains("failed to launch")),
            other => panic!("expected abort, got {:?}", other),
        }
    }
}
