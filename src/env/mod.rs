//! Env file codec and diff engine.
//!
//! - [`codec`] parses and serializes the `.env` text format
//! - [`diff`] compares two snapshots and renders the result
//!
//! Both are pure: the only I/O here is the small file helpers in
//! [`codec`], which commands use to read and write local files.

pub mod codec;
pub mod diff;

pub use codec::{load_file, parse, read_file, serialize, write_file, EnvSnapshot};
pub use diff::{
    compare, render, render_lines, truncate_value, Change, DiffLine, DiffResult, DiffSummary,
    LineKind, MAX_DISPLAY_CHARS, NO_DIFFERENCES,
};
