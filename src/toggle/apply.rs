//! Applying a toggle to a selection or to the cursor line.

use super::{MarkerPair, ToggleError, toggle, validate_markers};
use crate::editor::EditorAccess;

/// What a single toggle operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    /// A selection containing non-whitespace text.
    Selection { text: String },
    /// The line under the cursor, used when there is no usable selection.
    CursorLine { line: usize, col: usize, text: String },
}

/// The edit produced by a toggle, ready to be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    /// Replace the selection; the host leaves the cursor after the new text.
    ReplaceSelection { text: String },
    /// Insert at the cursor (blank line shortcut).
    InsertAtCursor { text: String },
    /// Replace a whole line and move the cursor to `cursor_col`.
    ReplaceLine {
        line: usize,
        text: String,
        cursor_col: usize,
    },
}

impl EditResult {
    /// Write the edit into the editor.
    pub fn write_to(&self, editor: &mut dyn EditorAccess) {
        match self {
            Self::ReplaceSelection { text } | Self::InsertAtCursor { text } => {
                editor.replace_selection(text);
            }
            Self::ReplaceLine {
                line,
                text,
                cursor_col,
            } => {
                editor.set_line(*line, text);
                editor.set_cursor(*line, *cursor_col);
            }
        }
    }
}

/// Read the edit target from the editor.
///
/// A selection counts only if it has non-whitespace content; otherwise the
/// cursor line is used.
pub fn read_edit_target(editor: &dyn EditorAccess) -> EditTarget {
    let selection = editor.selection();
    if !selection.trim().is_empty() {
        return EditTarget::Selection { text: selection };
    }
    let cursor = editor.cursor();
    EditTarget::CursorLine {
        line: cursor.line,
        col: cursor.col,
        text: editor.line(cursor.line).unwrap_or_default(),
    }
}

/// Compute the edit for `target` without touching any buffer.
///
/// On a blank cursor line only the prefix is inserted, leaving the cursor
/// right after the opening marker. On a non-blank line the whole line is
/// toggled and the cursor shifts by the prefix length: forward when the
/// line grew, backward otherwise.
///
/// # Errors
///
/// Returns a [`ToggleError`] if the markers are invalid; no edit is
/// produced in that case.
pub fn apply_to_edit_target(
    target: &EditTarget,
    prefix: &str,
    postfix: &str,
) -> Result<EditResult, ToggleError> {
    validate_markers(prefix, postfix, None)?;

    match target {
        EditTarget::Selection { text } => Ok(EditResult::ReplaceSelection {
            text: toggle(text, prefix, postfix, None)?,
        }),
        EditTarget::CursorLine { text, .. } if text.trim().is_empty() => {
            Ok(EditResult::InsertAtCursor {
                text: prefix.to_string(),
            })
        }
        EditTarget::CursorLine { line, col, text } => {
            let toggled = toggle(text, prefix, postfix, None)?;
            let cursor_col = if toggled.len() > text.len() {
                col + prefix.len()
            } else {
                col.saturating_sub(prefix.len())
            };
            Ok(EditResult::ReplaceLine {
                line: *line,
                text: toggled,
                cursor_col,
            })
        }
    }
}

/// Toggle `marker` at the editor's selection or cursor line.
///
/// The editor is only written to once the edit has been computed, so a
/// failure leaves it untouched.
///
/// # Errors
///
/// Propagates any [`ToggleError`] from computing the edit.
pub fn toggle_in_editor(
    editor: &mut dyn EditorAccess,
    marker: &MarkerPair,
) -> Result<EditResult, ToggleError> {
    let target = read_edit_target(editor);
    let result = apply_to_edit_target(&target, &marker.prefix, &marker.postfix)?;
    result.write_to(editor);
    Ok(result)
}
