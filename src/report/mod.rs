//! Run summaries echoed after the artifact is written.
//!
//! - [`terminal`]: colored summary box plus top/bottom tables; respects `--verbose` / `--quiet`.
//! - [`json`]: the `_meta` block as pretty JSON on stdout.

pub mod json;
pub mod terminal;
