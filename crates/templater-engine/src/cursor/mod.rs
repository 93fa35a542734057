//! Cursor placement after a template run.
//!
//! Rendered output may contain `<% tp.file.cursor(N) %>` placeholders. The
//! [`planner`] strips the next round of them and works out line/column
//! positions, the [`applier`] turns those into a single multi-caret
//! transaction, and the [`jumper`] ties both to storage and the active editor.

pub mod applier;
pub mod jumper;
pub mod markers;
pub mod planner;
pub mod position;

pub use applier::{CursorApplication, apply_cursor_positions};
pub use jumper::{CursorJump, JumpError, jump_to_next_cursor_location};
pub use markers::{CursorMarker, scan_markers};
pub use planner::{CursorPlan, plan_cursors};
pub use position::{CursorPosition, resolve_position};
