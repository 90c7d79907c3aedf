//! Verdict resolution
//!
//! Reconciles the three raw signals from one engine invocation (result code,
//! captured log text, captured stdout diff markers) into exactly one verdict
//! per task, using priority-ordered tie-break rules. The engine's own exit
//! convention conflates states and has been observed to lie; the resolver
//! absorbs that ambiguity instead of propagating it.

pub mod markers;
pub mod resolver;

pub use resolver::VerdictResolver;
