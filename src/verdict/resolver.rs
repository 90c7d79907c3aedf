/// Verdict derivation as a pure function over one captured invocation
use crate::config::types::{
    CapturedOutput, Classification, Verdict, EXIT_CHANGES, EXIT_UNCHANGED,
};
use crate::verdict::markers;

/// Verdict resolver - pure function over the captured signals.
///
/// Priority-ordered rules, later rules override earlier ones:
///
/// 1. Baseline from the raw result code (0 unchanged, 2 needs fix,
///    anything else error).
/// 2. Code 2 with the no-changes log marker downgrades to unchanged; the
///    engine reports 2 defensively even when no edit occurred.
/// 3. A modifications block is extracted from captured stdout, starting at
///    the first diff-header line.
/// 4. A non-empty modifications block forces needs-fix over both the code
///    and rule 2. Codes and log lines have been observed to lie; a diff is
///    proof a change was proposed.
/// 5. Everything else stays error.
///
/// The resolver never fails and never prints; rendering belongs to the
/// report layer.
pub struct VerdictResolver;

impl VerdictResolver {
    /// Classify one capture. `command_line` is the reconstructed invocation,
    /// used in detail blocks for human readability only.
    pub fn resolve(capture: &CapturedOutput, command_line: &str) -> Classification {
        let mut code = capture.code;

        // Rule 2: log-text override of a defensive code 2.
        if code == EXIT_CHANGES && markers::log_declares_no_changes(&capture.log) {
            code = EXIT_UNCHANGED;
        }

        // Rule 3: diff extraction.
        let modifications = Self::extract_modifications(&capture.stdout);

        // Rule 4 dominates rules 1 and 2; rule 5 is the fallthrough.
        let verdict = if !modifications.is_empty() {
            Verdict::NeedsFix
        } else {
            match code {
                EXIT_UNCHANGED => Verdict::Unchanged,
                EXIT_CHANGES => Verdict::NeedsFix,
                _ => Verdict::Error,
            }
        };

        let detail = match verdict {
            Verdict::Unchanged => None,
            Verdict::NeedsFix => Some(format!(
                "Suggested changes from `{}`:\n\n{}",
                command_line,
                modifications.join("\n")
            )),
            Verdict::Error => Some(format!(
                "Unexpected output from `{}`:\n\n{}",
                command_line,
                modifications.join("\n")
            )),
        };

        Classification {
            verdict,
            code,
            modifications,
            detail,
        }
    }

    /// Accumulate the modifications block: nothing until the first line that
    /// ends with the diff-header suffix, then every line unconditionally.
    /// Diff bodies can contain blank or unrelated-looking lines, so there is
    /// deliberately no stop condition.
    fn extract_modifications(stdout: &str) -> Vec<String> {
        let mut modifications = Vec::new();
        let mut started = false;
        for line in stdout.lines() {
            if started || markers::is_diff_header(line) {
                started = true;
                modifications.push(line.to_string());
            }
        }
        modifications
    }

    /// Reconstruct the command line shown in detail blocks.
    pub fn command_line(tool_name: &str, argv: &[String]) -> String {
        if argv.is_empty() {
            tool_name.to_string()
        } else {
            format!("{} {}", tool_name, argv.join(" "))
        }
    }
}
