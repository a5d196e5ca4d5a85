//! Editor-side plumbing for toggling markup.
//!
//! [`EditorAccess`] is the contract a host editor offers to the toggle
//! commands; [`EditorBuffer`] is a rope-backed implementation used by the
//! command-line host and the tests.

mod buffer;

pub use buffer::{Cursor, EditorBuffer};

/// Read/write access to a host text buffer.
///
/// Every toggle performs one read (selection or current line) and at most
/// one write through this trait. Columns are byte offsets within a line.
pub trait EditorAccess {
    /// The current cursor position.
    fn cursor(&self) -> Cursor;

    /// Content of a line without its trailing newline.
    fn line(&self, line_idx: usize) -> Option<String>;

    /// The selected text, or an empty string when nothing is selected.
    fn selection(&self) -> String;

    /// Replace the selection, or insert at the cursor when nothing is selected.
    fn replace_selection(&mut self, text: &str);

    /// Replace the content of a whole line.
    fn set_line(&mut self, line_idx: usize, text: &str);

    fn set_cursor(&mut self, line: usize, col: usize);
}
