//! Textual contracts with the engine
//!
//! String-based signal detection is brittle but load-bearing: these literals
//! must match the engine's output exactly or the tie-break rules silently
//! stop firing. They live here, behind named predicates, and nowhere else.

/// Log line the engine emits when a file needed no edits. Must keep the
/// trailing space; the file name follows directly.
pub const NO_CHANGES_MARKER: &str = "RefactoringTool: No changes to ";

/// Suffix of the first line of an engine diff header: a tab, then the
/// literal `(original)`.
pub const DIFF_HEADER_SUFFIX: &str = "\t(original)";

/// True when the captured log text declares that no change occurred.
pub fn log_declares_no_changes(log: &str) -> bool {
    log.contains(NO_CHANGES_MARKER)
}

/// True for the line that opens a suggested-changes block.
pub fn is_diff_header(line: &str) -> bool {
    line.ends_with(DIFF_HEADER_SUFFIX)
}
