//! Command Interface Layer
//!
//! Every mutation of the editor goes through a [`Command`]:
//!
//! - **Text Editing**: insert and delete at offsets or at the cursor
//! - **Cursor Operations**: move the cursor by character, line or document
//! - **File Operations**: new, open, save, save-as
//! - **Highlighting**: toggle or set the syntax highlighting flag
//!
//! # Example
//!
//! ```rust
//! use skratchpad_core::{Command, EditCommand, EditorShell};
//! use skratchpad_lang::LanguageConfig;
//!
//! let mut shell = EditorShell::new(LanguageConfig::python());
//! shell.execute(Command::Edit(EditCommand::Insert {
//!     offset: 0,
//!     text: "print('hi')\n".to_string(),
//! })).unwrap();
//! assert_eq!(shell.text(), "print('hi')\n");
//! ```

use crate::line_ending::LineEnding;
use crate::storage::DocumentError;
use ropey::Rope;
use std::cmp::Ordering;
use std::path::PathBuf;
use thiserror::Error;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Text editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Insert text at the specified position
    Insert {
        /// Character offset to insert at.
        offset: usize,
        /// Text to insert.
        text: String,
    },
    /// Delete text in specified range
    Delete {
        /// Character offset of the deletion start.
        start: usize,
        /// Length of the deletion in characters.
        length: usize,
    },
    /// Insert text at the cursor (typing/paste).
    InsertText {
        /// Text to insert.
        text: String,
    },
    /// Insert a line break at the cursor.
    InsertNewline,
    /// Insert spaces up to the next tab stop at the cursor.
    InsertTab,
    /// Delete the character before the cursor.
    Backspace,
    /// Delete the character under the cursor.
    DeleteForward,
}

/// Cursor commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCommand {
    /// One character left (wraps to the end of the previous line).
    Left,
    /// One character right (wraps to the start of the next line).
    Right,
    /// One line up, keeping the preferred column.
    Up,
    /// One line down, keeping the preferred column.
    Down,
    /// Several lines up.
    PageUp {
        /// Number of lines to move.
        lines: usize,
    },
    /// Several lines down.
    PageDown {
        /// Number of lines to move.
        lines: usize,
    },
    /// Start of the current line.
    LineStart,
    /// End of the current line.
    LineEnd,
    /// Start of the document.
    DocumentStart,
    /// End of the document.
    DocumentEnd,
    /// Move to a logical position (clamped to the document).
    MoveTo {
        /// Target line.
        line: usize,
        /// Target column.
        column: usize,
    },
}

/// File commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCommand {
    /// Discard the buffer and the file association.
    New,
    /// Replace the buffer with a file's contents and associate the file.
    Open {
        /// File to read.
        path: PathBuf,
    },
    /// Write to the associated file, or report [`CommandResult::PathRequired`].
    Save,
    /// Write to `path` and associate it.
    SaveAs {
        /// Destination; the language's default extension is added when missing.
        path: PathBuf,
    },
}

/// Syntax highlighting commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightCommand {
    /// Flip the highlighting flag.
    Toggle,
    /// Set the highlighting flag.
    SetEnabled(bool),
}

/// Unified command enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text editing commands
    Edit(EditCommand),
    /// Cursor command
    Cursor(CursorCommand),
    /// File command
    File(FileCommand),
    /// Highlighting command
    Highlight(HighlightCommand),
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, no return value
    Success,
    /// Success, returns the new cursor position
    Position(Position),
    /// A file was opened and is now associated.
    Opened(PathBuf),
    /// The buffer was written to this path.
    Saved(PathBuf),
    /// Save was requested without a file association; nothing was written.
    PathRequired,
    /// The highlighting flag after the command.
    HighlightingEnabled(bool),
}

/// Command error type
#[derive(Debug, Error)]
pub enum CommandError {
    /// Invalid offset
    #[error("invalid offset: {0}")]
    InvalidOffset(usize),
    /// Invalid range
    #[error("invalid range: {start}..{end}")]
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// A file operation failed.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Buffer and cursor.
///
/// Text is held in a rope with LF newlines. The cursor is a character offset; `preferred_column`
/// remembers the column across vertical moves through shorter lines.
#[derive(Debug, Clone)]
pub struct EditorCore {
    rope: Rope,
    cursor: usize,
    preferred_column: Option<usize>,
    tab_width: usize,
}

impl EditorCore {
    /// Create a buffer from text (normalized to LF).
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&LineEnding::normalize(text)),
            cursor: 0,
            preferred_column: None,
            tab_width: 4,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// The underlying rope.
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Full text.
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of logical lines. A trailing newline starts a new, empty line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of a logical line without its newline.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.line_count() {
            return None;
        }
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }

    /// Character offset of the first character of `line`.
    pub fn line_start_offset(&self, line: usize) -> usize {
        self.rope.line_to_char(line.min(self.line_count().saturating_sub(1)))
    }

    /// Length of `line` in characters, excluding the newline.
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return 0;
        }
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Tab stop width used by [`EditCommand::InsertTab`] and by renderers.
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Cursor as a character offset.
    pub fn cursor_offset(&self) -> usize {
        self.cursor
    }

    /// Cursor as a logical position.
    pub fn cursor_position(&self) -> Position {
        self.offset_to_position(self.cursor)
    }

    /// Convert a character offset (clamped) to a logical position.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.char_count());
        let line = self.rope.char_to_line(offset);
        Position::new(line, offset - self.rope.line_to_char(line))
    }

    /// Convert a logical position to a character offset, clamping line and column.
    pub fn position_to_offset(&self, position: Position) -> usize {
        let line = position.line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_char(line) + position.column.min(self.line_len(line))
    }

    pub(crate) fn reset(&mut self, text: &str) {
        self.rope = Rope::from_str(&LineEnding::normalize(text));
        self.cursor = 0;
        self.preferred_column = None;
    }

    fn insert(&mut self, offset: usize, text: &str) -> Result<usize, CommandError> {
        if offset > self.char_count() {
            return Err(CommandError::InvalidOffset(offset));
        }
        let text = LineEnding::normalize(text);
        let inserted = text.chars().count();
        self.rope.insert(offset, &text);
        if offset <= self.cursor {
            self.cursor += inserted;
        }
        Ok(inserted)
    }

    fn delete(&mut self, start: usize, length: usize) -> Result<(), CommandError> {
        let end = start.saturating_add(length);
        if end > self.char_count() {
            return Err(CommandError::InvalidRange { start, end });
        }
        self.rope.remove(start..end);
        if self.cursor > start {
            self.cursor = start.max(self.cursor.saturating_sub(length));
        }
        Ok(())
    }

    /// Apply an edit. Returns `true` when the text changed.
    pub(crate) fn apply_edit(&mut self, command: EditCommand) -> Result<bool, CommandError> {
        self.preferred_column = None;
        match command {
            EditCommand::Insert { offset, text } => Ok(self.insert(offset, &text)? > 0),
            EditCommand::Delete { start, length } => {
                self.delete(start, length)?;
                Ok(length > 0)
            }
            EditCommand::InsertText { text } => Ok(self.insert(self.cursor, &text)? > 0),
            EditCommand::InsertNewline => self.insert(self.cursor, "\n").map(|_| true),
            EditCommand::InsertTab => {
                let column = self.cursor_position().column;
                let spaces = self.tab_width - column % self.tab_width;
                self.insert(self.cursor, &" ".repeat(spaces)).map(|_| true)
            }
            EditCommand::Backspace => {
                if self.cursor == 0 {
                    return Ok(false);
                }
                self.delete(self.cursor - 1, 1).map(|_| true)
            }
            EditCommand::DeleteForward => {
                if self.cursor >= self.char_count() {
                    return Ok(false);
                }
                self.delete(self.cursor, 1).map(|_| true)
            }
        }
    }

    /// Apply a cursor movement and return the new position.
    pub(crate) fn apply_cursor(&mut self, command: CursorCommand) -> Position {
        let current = self.cursor_position();
        match command {
            CursorCommand::Left => {
                self.preferred_column = None;
                self.cursor = self.cursor.saturating_sub(1);
            }
            CursorCommand::Right => {
                self.preferred_column = None;
                self.cursor = (self.cursor + 1).min(self.char_count());
            }
            CursorCommand::Up => self.move_vertically(current, -1),
            CursorCommand::Down => self.move_vertically(current, 1),
            CursorCommand::PageUp { lines } => {
                self.move_vertically(current, -(lines.max(1) as isize))
            }
            CursorCommand::PageDown { lines } => {
                self.move_vertically(current, lines.max(1) as isize)
            }
            CursorCommand::LineStart => {
                self.preferred_column = None;
                self.cursor = self.line_start_offset(current.line);
            }
            CursorCommand::LineEnd => {
                self.preferred_column = None;
                self.cursor = self.line_start_offset(current.line) + self.line_len(current.line);
            }
            CursorCommand::DocumentStart => {
                self.preferred_column = None;
                self.cursor = 0;
            }
            CursorCommand::DocumentEnd => {
                self.preferred_column = None;
                self.cursor = self.char_count();
            }
            CursorCommand::MoveTo { line, column } => {
                self.preferred_column = None;
                self.cursor = self.position_to_offset(Position::new(line, column));
            }
        }
        self.cursor_position()
    }

    fn move_vertically(&mut self, current: Position, delta: isize) {
        let column = *self.preferred_column.get_or_insert(current.column);
        let last_line = self.line_count().saturating_sub(1);
        let line = current.line.saturating_add_signed(delta).min(last_line);
        self.cursor = self.position_to_offset(Position::new(line, column));
    }
}

impl Default for EditorCore {
    fn default() -> Self {
        Self::empty()
    }
}
