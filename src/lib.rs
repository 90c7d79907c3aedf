//! modernize-reporter: a reporting harness for an external code-modernization engine
//!
//! Walks a file tree, invokes the engine once per Python source file, and
//! classifies each result as unchanged, needs-fix, or unknown error by
//! reconciling three independent and sometimes-contradictory signals: the
//! raw result code, the captured log text, and diff markers in captured
//! stdout.
//!
//! # Architecture
//!
//! ## Output Interception ([`capture`])
//! - [`capture::CaptureContext`]: per-invocation stdout/stderr sinks plus the
//!   shared named-log-channel sink, with release guaranteed on every exit
//!   path including panics inside the engine
//!
//! ## Verdict Resolution ([`verdict`])
//! - [`verdict::resolver`]: priority-ordered tie-break rules turning one
//!   captured invocation into exactly one verdict
//! - [`verdict::markers`]: the brittle textual contracts with the engine,
//!   isolated behind named predicates
//!
//! ## Engine Boundary ([`engine`])
//! - [`engine::RefactorEngine`]: the opaque entry-point contract
//! - [`engine::SubprocessEngine`]: the real `python-modernize` subprocess
//!
//! ## Glue
//! - [`walk`]: deterministic sorted traversal, dotfiles skipped, exclusions
//!   owned by the walker
//! - [`harness`]: strictly sequential per-file orchestration
//! - [`report`]: console rendering and TeamCity service messages
//! - [`config`]: shared types, result codes, errors
//! - [`cli`]: option parsing and pass-through assembly
//!
//! # Design Principles
//!
//! 1. **One verdict per task** - never zero, never more than one
//! 2. **Evidence over exit codes** - a non-empty diff outranks any code the
//!    engine returns, because codes and log lines have been observed to lie
//! 3. **Isolation is a release guarantee** - captured text never bleeds
//!    between files, even when the engine aborts
//! 4. **The harness survives the engine** - a per-file failure is a verdict,
//!    not a crash

pub mod capture;
pub mod cli;
pub mod config;
pub mod engine;
pub mod harness;
pub mod report;
pub mod verdict;
pub mod walk;

// Re-export commonly used types for convenience
pub use config::types::*;
