use ropey::Rope;

use super::EditorAccess;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self { line: 0, col: 0 }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// A text buffer backed by a rope data structure.
///
/// Tracks a cursor and an optional selection anchor. The selection spans
/// from the anchor to the cursor in either direction.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    anchor: Option<Cursor>,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            anchor: None,
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the buffer has been modified since creation.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(strip_line_break(&line).to_string())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Move cursor to a specific line and column, dropping any selection.
    ///
    /// Out-of-range positions are clamped to the buffer; a column inside a
    /// multi-byte character snaps back to the character's start.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor = self.clamp(Cursor::at(line, col));
        self.anchor = None;
    }

    /// Select from `anchor` to `head`, leaving the cursor at `head`.
    pub fn select(&mut self, anchor: Cursor, head: Cursor) {
        let anchor = self.clamp(anchor);
        self.cursor = self.clamp(head);
        self.anchor = (anchor != self.cursor).then_some(anchor);
    }

    /// The selected range in document order, if any.
    pub fn selection_range(&self) -> Option<(Cursor, Cursor)> {
        let anchor = self.anchor?;
        Some((anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    /// The selected text, empty when nothing is selected.
    pub fn selected_text(&self) -> String {
        self.selection_range().map_or_else(String::new, |(start, end)| {
            self.rope
                .slice(self.char_idx(start)..self.char_idx(end))
                .to_string()
        })
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let char_idx = self.char_idx(self.cursor);
        self.rope.insert(char_idx, s);

        // Move cursor to end of inserted text
        let lines: Vec<&str> = s.split('\n').collect();
        if lines.len() > 1 {
            self.cursor.line += lines.len() - 1;
            self.cursor.col = lines.last().map_or(0, |l| l.len());
        } else {
            self.cursor.col += s.len();
        }
        self.dirty = true;
    }

    /// Replace the selection with `text`, or insert it at the cursor.
    ///
    /// The cursor ends up after the inserted text.
    pub fn replace_selected(&mut self, text: &str) {
        if let Some((start, end)) = self.selection_range() {
            let range = self.char_idx(start)..self.char_idx(end);
            self.rope.remove(range);
            self.cursor = start;
            self.anchor = None;
            self.dirty = true;
        }
        self.insert_str(text);
    }

    /// Replace the content of a line, keeping its line ending.
    ///
    /// Does nothing if the line does not exist.
    pub fn replace_line(&mut self, line_idx: usize, text: &str) {
        let Some(old) = self.line_at(line_idx) else {
            return;
        };
        let start = self.rope.line_to_char(line_idx);
        self.rope.remove(start..start + old.chars().count());
        self.rope.insert(start, text);
        self.anchor = None;
        self.cursor = self.clamp(self.cursor);
        self.dirty = true;
    }

    // --- Private helpers ---

    fn clamp(&self, pos: Cursor) -> Cursor {
        let max_line = self.line_count().saturating_sub(1);
        let line = pos.line.min(max_line);
        let text = self.line_at(line).unwrap_or_default();
        let mut col = pos.col.min(text.len());
        while !text.is_char_boundary(col) {
            col -= 1;
        }
        Cursor::at(line, col)
    }

    /// Convert a position to a ropey char index.
    fn char_idx(&self, pos: Cursor) -> usize {
        let pos = self.clamp(pos);
        let line_start = self.rope.line_to_char(pos.line);
        let line = self.line_at(pos.line).unwrap_or_default();
        // Convert byte offset to char offset within the line
        line_start + line[..pos.col].chars().count()
    }
}

/// Strip one trailing line break, using the same set of breaks as ropey.
fn strip_line_break(line: &str) -> &str {
    if let Some(stripped) = line.strip_suffix("\r\n") {
        return stripped;
    }
    line.strip_suffix([
        '\n', '\r', '\u{0B}', '\u{0C}', '\u{85}', '\u{2028}', '\u{2029}',
    ])
    .unwrap_or(line)
}

impl EditorAccess for EditorBuffer {
    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn line(&self, line_idx: usize) -> Option<String> {
        self.line_at(line_idx)
    }

    fn selection(&self) -> String {
        self.selected_text()
    }

    fn replace_selection(&mut self, text: &str) {
        self.replace_selected(text);
    }

    fn set_line(&mut self, line_idx: usize, text: &str) {
        self.replace_line(line_idx, text);
    }

    fn set_cursor(&mut self, line: usize, col: usize) {
        self.move_to(line, col);
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .field("dirty", &self.dirty)
            .finish()
    }
}
