//! Editor shell state.
//!
//! [`EditorShell`] owns the document buffer, the file association and the highlighting flag,
//! and dispatches [`Command`]s to them. Derived styles live in per-producer style layers that
//! processors replace wholesale.
//!
//! # Example
//!
//! ```rust
//! use skratchpad_core::{Command, CommandResult, EditorShell, FileCommand};
//! use skratchpad_lang::LanguageConfig;
//!
//! let mut shell = EditorShell::with_text(LanguageConfig::python(), "x = 1\n");
//! assert_eq!(shell.window_title(), "SkratchPad - New File");
//!
//! // Without a file association, saving asks the frontend for a path.
//! let result = shell.execute(Command::File(FileCommand::Save)).unwrap();
//! assert_eq!(result, CommandResult::PathRequired);
//! ```

use crate::commands::{
    Command, CommandError, CommandResult, EditCommand, EditorCore, FileCommand, HighlightCommand,
    Position,
};
use crate::intervals::{Interval, IntervalTree, StyleId, StyleLayerId};
use crate::line_ending::LineEnding;
use crate::processing::{DocumentProcessor, ProcessingEdit};
use crate::storage::{self, DocumentError};
use skratchpad_lang::LanguageConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Application name used in window titles.
pub const APP_NAME: &str = "SkratchPad";

/// Document state snapshot for status lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    /// Total line count
    pub line_count: usize,
    /// Total character count
    pub char_count: usize,
    /// Whether the document changed since it was created, opened or saved
    pub is_modified: bool,
    /// Version number, incremented on every content change
    pub version: u64,
    /// Associated file, if any
    pub file_path: Option<PathBuf>,
    /// Line ending used on save
    pub line_ending: LineEnding,
    /// Whether syntax highlighting is on
    pub highlighting_enabled: bool,
}

/// The editor shell.
#[derive(Debug, Clone)]
pub struct EditorShell {
    core: EditorCore,
    language: LanguageConfig,
    file_path: Option<PathBuf>,
    line_ending: LineEnding,
    highlighting_enabled: bool,
    style_layers: BTreeMap<StyleLayerId, IntervalTree>,
    version: u64,
    is_modified: bool,
}

impl EditorShell {
    /// Create an empty, unassociated document with highlighting on.
    pub fn new(language: LanguageConfig) -> Self {
        Self::with_text(language, "")
    }

    /// Create an unassociated document holding `text`.
    pub fn with_text(language: LanguageConfig, text: &str) -> Self {
        Self {
            core: EditorCore::new(text),
            language,
            file_path: None,
            line_ending: LineEnding::detect_in_text(text),
            highlighting_enabled: true,
            style_layers: BTreeMap::new(),
            version: 0,
            is_modified: false,
        }
    }

    /// Execute a command.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        match command {
            Command::Edit(edit) => self.execute_edit(edit),
            Command::Cursor(cursor) => Ok(CommandResult::Position(self.core.apply_cursor(cursor))),
            Command::File(file) => self.execute_file(file),
            Command::Highlight(highlight) => Ok(self.execute_highlight(highlight)),
        }
    }

    fn execute_edit(&mut self, edit: EditCommand) -> Result<CommandResult, CommandError> {
        if self.core.apply_edit(edit)? {
            self.bump_version();
            self.is_modified = true;
        }
        Ok(CommandResult::Success)
    }

    fn execute_file(&mut self, command: FileCommand) -> Result<CommandResult, CommandError> {
        match command {
            FileCommand::New => {
                self.replace_document("", LineEnding::Lf, None);
                info!("started a new document");
                Ok(CommandResult::Success)
            }
            FileCommand::Open { path } => {
                let loaded = storage::read_document(&path).inspect_err(|err| {
                    warn!(path = %path.display(), error = %err, "open failed");
                })?;
                info!(
                    path = %path.display(),
                    chars = loaded.text.chars().count(),
                    "opened document"
                );
                self.replace_document(&loaded.text, loaded.line_ending, Some(path.clone()));
                Ok(CommandResult::Opened(path))
            }
            FileCommand::Save => match self.file_path.clone() {
                Some(path) => self.write_to(path),
                None => {
                    debug!("save requested without file association");
                    Ok(CommandResult::PathRequired)
                }
            },
            FileCommand::SaveAs { path } => {
                let path = self.language.with_default_extension(path);
                self.write_to(path)
            }
        }
    }

    fn write_to(&mut self, path: PathBuf) -> Result<CommandResult, CommandError> {
        storage::write_document(&path, &self.core.get_text(), self.line_ending).inspect_err(
            |err: &DocumentError| {
                warn!(path = %path.display(), error = %err, "save failed");
            },
        )?;
        info!(path = %path.display(), "saved document");
        self.file_path = Some(path.clone());
        self.is_modified = false;
        Ok(CommandResult::Saved(path))
    }

    fn execute_highlight(&mut self, command: HighlightCommand) -> CommandResult {
        let enabled = match command {
            HighlightCommand::Toggle => !self.highlighting_enabled,
            HighlightCommand::SetEnabled(enabled) => enabled,
        };
        self.highlighting_enabled = enabled;
        if !enabled {
            self.clear_style_layer(StyleLayerId::SYNTAX);
        }
        debug!(enabled, "syntax highlighting switched");
        CommandResult::HighlightingEnabled(enabled)
    }

    fn replace_document(&mut self, text: &str, line_ending: LineEnding, path: Option<PathBuf>) {
        self.core.reset(text);
        self.line_ending = line_ending;
        self.file_path = path;
        self.style_layers.clear();
        self.is_modified = false;
        self.bump_version();
    }

    fn bump_version(&mut self) {
        self.version += 1;
    }

    /// The buffer and cursor.
    pub fn editor(&self) -> &EditorCore {
        &self.core
    }

    /// Language configuration.
    pub fn language(&self) -> &LanguageConfig {
        &self.language
    }

    /// Full buffer text (LF newlines).
    pub fn text(&self) -> String {
        self.core.get_text()
    }

    /// Buffer text with the preferred line ending applied.
    pub fn text_for_saving(&self) -> String {
        self.line_ending.apply_to_text(&self.core.get_text()).into_owned()
    }

    /// Number of characters in the buffer.
    pub fn char_count(&self) -> usize {
        self.core.char_count()
    }

    /// Number of logical lines.
    pub fn line_count(&self) -> usize {
        self.core.line_count()
    }

    /// Text of logical line `line` without its newline.
    pub fn line_text(&self, line: usize) -> Option<String> {
        self.core.line_text(line)
    }

    /// Cursor position.
    pub fn cursor_position(&self) -> Position {
        self.core.cursor_position()
    }

    /// Cursor character offset.
    pub fn cursor_offset(&self) -> usize {
        self.core.cursor_offset()
    }

    /// Associated file, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Preferred line ending for saving.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Whether syntax highlighting is on.
    pub fn highlighting_enabled(&self) -> bool {
        self.highlighting_enabled
    }

    /// Whether the buffer changed since it was created, opened or saved.
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Content version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// `SkratchPad - New File` or `SkratchPad - <file name>`, with ` [+]` when modified.
    pub fn window_title(&self) -> String {
        let name = self
            .file_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "New File".to_string());
        let marker = if self.is_modified { " [+]" } else { "" };
        format!("{APP_NAME} - {name}{marker}")
    }

    /// Snapshot for status display.
    pub fn get_document_state(&self) -> DocumentState {
        DocumentState {
            line_count: self.core.line_count(),
            char_count: self.core.char_count(),
            is_modified: self.is_modified,
            version: self.version,
            file_path: self.file_path.clone(),
            line_ending: self.line_ending,
            highlighting_enabled: self.highlighting_enabled,
        }
    }

    /// Intervals of one style layer, in start order.
    pub fn style_layer(&self, layer: StyleLayerId) -> Vec<Interval> {
        self.style_layers
            .get(&layer)
            .map(|tree| tree.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Style ids at a character offset, across all layers.
    pub fn styles_at(&self, offset: usize) -> Vec<StyleId> {
        let mut styles: Vec<StyleId> = self
            .style_layers
            .values()
            .flat_map(|tree| tree.query_point(offset))
            .map(|interval| interval.style_id)
            .collect();
        styles.sort_unstable();
        styles.dedup();
        styles
    }

    /// All `(start, end, style)` triples overlapping `[start, end)`, across all layers.
    pub fn styles_in_range(&self, start: usize, end: usize) -> Vec<(usize, usize, StyleId)> {
        let mut result: Vec<(usize, usize, StyleId)> = self
            .style_layers
            .values()
            .flat_map(|tree| tree.query_range(start, end))
            .map(|interval| (interval.start, interval.end, interval.style_id))
            .collect();
        result.sort_unstable();
        result
    }

    /// Replace all intervals of a style layer.
    ///
    /// Intervals reaching past the end of the buffer are clamped; empty ones are dropped.
    pub fn replace_style_layer(&mut self, layer: StyleLayerId, intervals: Vec<Interval>) {
        let len = self.core.char_count();
        let tree = IntervalTree::from_intervals(intervals.into_iter().map(|mut interval| {
            interval.end = interval.end.min(len);
            interval
        }));
        if tree.is_empty() {
            self.style_layers.remove(&layer);
        } else {
            self.style_layers.insert(layer, tree);
        }
    }

    /// Clear a style layer.
    pub fn clear_style_layer(&mut self, layer: StyleLayerId) {
        self.style_layers.remove(&layer);
    }

    /// Apply derived-state edits produced by a processor.
    pub fn apply_processing_edits<I>(&mut self, edits: I)
    where
        I: IntoIterator<Item = ProcessingEdit>,
    {
        for edit in edits {
            match edit {
                ProcessingEdit::ReplaceStyleLayer { layer, intervals } => {
                    self.replace_style_layer(layer, intervals);
                }
                ProcessingEdit::ClearStyleLayer { layer } => {
                    self.clear_style_layer(layer);
                }
            }
        }
    }

    /// Run a processor against this shell and apply its edits.
    pub fn apply_processor<P>(&mut self, processor: &mut P) -> Result<(), P::Error>
    where
        P: DocumentProcessor,
    {
        let edits = processor.process(self)?;
        self.apply_processing_edits(edits);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_state() {
        let shell = EditorShell::with_text(LanguageConfig::python(), "Hello World\nLine 2");
        let state = shell.get_document_state();

        assert_eq!(state.line_count, 2);
        assert_eq!(state.char_count, 18);
        assert!(!state.is_modified);
        assert_eq!(state.version, 0);
        assert!(state.highlighting_enabled);
        assert_eq!(state.file_path, None);
    }

    #[test]
    fn test_edit_marks_modified_and_title() {
        let mut shell = EditorShell::new(LanguageConfig::python());
        shell
            .execute(Command::Edit(EditCommand::InsertText {
                text: "x".to_string(),
            }))
            .unwrap();
        assert!(shell.is_modified());
        assert_eq!(shell.version(), 1);
        assert_eq!(shell.window_title(), "SkratchPad - New File [+]");
    }

    #[test]
    fn test_noop_edit_keeps_version() {
        let mut shell = EditorShell::new(LanguageConfig::python());
        shell
            .execute(Command::Edit(EditCommand::Backspace))
            .unwrap();
        assert_eq!(shell.version(), 0);
        assert!(!shell.is_modified());
    }

    #[test]
    fn test_replace_style_layer_clamps_to_buffer() {
        let mut shell = EditorShell::with_text(LanguageConfig::python(), "abc");
        shell.replace_style_layer(
            StyleLayerId::SYNTAX,
            vec![Interval::new(1, 10, 7), Interval::new(5, 9, 8)],
        );
        assert_eq!(
            shell.style_layer(StyleLayerId::SYNTAX),
            vec![Interval::new(1, 3, 7)]
        );
        assert_eq!(shell.styles_at(2), vec![7]);
        assert!(shell.styles_at(3).is_empty());
    }

    #[test]
    fn test_toggle_off_clears_syntax_layer() {
        let mut shell = EditorShell::with_text(LanguageConfig::python(), "abc");
        shell.replace_style_layer(StyleLayerId::SYNTAX, vec![Interval::new(0, 3, 1)]);

        let result = shell
            .execute(Command::Highlight(HighlightCommand::Toggle))
            .unwrap();
        assert_eq!(result, CommandResult::HighlightingEnabled(false));
        assert!(shell.style_layer(StyleLayerId::SYNTAX).is_empty());

        let result = shell
            .execute(Command::Highlight(HighlightCommand::Toggle))
            .unwrap();
        assert_eq!(result, CommandResult::HighlightingEnabled(true));
    }
}
