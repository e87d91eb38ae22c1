//! Output shapes handed to callers
//!
//! Every operation crossing the library boundary is reported as a tagged
//! [`Outcome`], so callers branch on an explicit status instead of catching
//! faults. The `plain` submodule renders outcomes for terminal display.

mod outcome;
mod plain;

pub use outcome::{ErrorRecord, Outcome};
pub use plain::{render_error, render_report, render_response, render_role_table};
