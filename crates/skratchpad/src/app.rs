//! Application state and input handling.

use crate::dialog::{ConfirmAction, Dialog, DialogOutcome, PathPrompt, PathPurpose};
use crate::theme::Theme;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position as ScreenPosition, Rect};
use skratchpad_core::{
    Command, CommandError, CommandResult, CursorCommand, EditCommand, EditorShell, FileCommand,
    HighlightCommand, Position,
};
use skratchpad_highlight::{HighlightProcessor, LexerError};
use skratchpad_lang::LanguageConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthChar;

/// Buttons in the bar above the text area, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarAction {
    New,
    Open,
    Save,
    ToggleHighlighting,
}

impl BarAction {
    pub const ALL: [Self; 4] = [
        Self::New,
        Self::Open,
        Self::Save,
        Self::ToggleHighlighting,
    ];

    pub fn label(self, highlighting_enabled: bool) -> String {
        match self {
            Self::New => "F1 New".to_string(),
            Self::Open => "F2 Open".to_string(),
            Self::Save => "F3 Save".to_string(),
            Self::ToggleHighlighting => format!(
                "F4 Syntax Highlighting: {}",
                if highlighting_enabled { "On" } else { "Off" }
            ),
        }
    }
}

pub struct App {
    pub(crate) shell: EditorShell,
    highlighter: HighlightProcessor,
    pub(crate) theme: Theme,
    pub(crate) dialog: Option<Dialog>,
    pub(crate) status_message: String,
    pub(crate) should_quit: bool,
    /// First visible line.
    pub(crate) scroll_top: usize,
    /// First visible display column.
    pub(crate) scroll_left: usize,
    pub(crate) viewport_height: usize,
    pub(crate) viewport_width: usize,
    /// Screen rectangles of the bar buttons from the last frame.
    pub(crate) buttons: Vec<(BarAction, Rect)>,
    /// Inner text area from the last frame.
    pub(crate) text_area: Rect,
    /// Suggested answer for the next save prompt.
    pending_save_path: Option<PathBuf>,
}

impl App {
    pub fn new(theme: Theme, highlighting: bool) -> Result<Self, LexerError> {
        let mut app = Self {
            shell: EditorShell::new(LanguageConfig::python()),
            highlighter: HighlightProcessor::python()?,
            theme,
            dialog: None,
            status_message: String::new(),
            should_quit: false,
            scroll_top: 0,
            scroll_left: 0,
            viewport_height: 0,
            viewport_width: 0,
            buttons: Vec::new(),
            text_area: Rect::default(),
            pending_save_path: None,
        };
        if !highlighting {
            app.execute(Command::Highlight(HighlightCommand::SetEnabled(false)));
        }
        app.refresh_highlighting();
        Ok(app)
    }

    pub fn shell(&self) -> &EditorShell {
        &self.shell
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    /// Open `path` given on the command line. A path that does not exist yet becomes the
    /// pre-filled answer of the save prompt the first time the user saves.
    pub fn open_startup_file(&mut self, path: &Path) {
        if path.exists() {
            self.open_path(path.to_path_buf());
        } else {
            info!(path = %path.display(), "startup file does not exist; starting empty");
            self.status_message = format!("New file: {}", path.display());
            self.pending_save_path = Some(path.to_path_buf());
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if let Some(dialog) = self.dialog.as_mut() {
            let outcome = dialog.handle_key(key);
            self.handle_dialog_outcome(outcome);
        } else {
            self.handle_editor_key(key);
        }

        self.refresh_highlighting();
        self.adjust_scroll();
    }

    pub fn handle_paste(&mut self, text: String) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.handle_paste(&text);
            return;
        }
        self.execute(Command::Edit(EditCommand::InsertText { text }));
        self.refresh_highlighting();
        self.adjust_scroll();
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || self.dialog.is_some() {
            return;
        }
        let at = ScreenPosition::new(mouse.column, mouse.row);

        if let Some(action) = self
            .buttons
            .iter()
            .find(|(_, rect)| rect.contains(at))
            .map(|(action, _)| *action)
        {
            self.trigger(action);
        } else if self.text_area.contains(at) {
            let line = self.scroll_top + usize::from(at.y - self.text_area.y);
            let x = self.scroll_left + usize::from(at.x - self.text_area.x);
            let column = self.column_for_display_x(line, x);
            self.execute(Command::Cursor(CursorCommand::MoveTo { line, column }));
        }

        self.refresh_highlighting();
        self.adjust_scroll();
    }

    /// Run a bar button.
    pub fn trigger(&mut self, action: BarAction) {
        match action {
            BarAction::New => self.dialog = Some(Dialog::Confirm(ConfirmAction::NewFile)),
            BarAction::Open => {
                self.dialog = Some(Dialog::Path(PathPrompt::new(PathPurpose::Open, "")));
            }
            BarAction::Save => self.save(),
            BarAction::ToggleHighlighting => {
                if let Some(CommandResult::HighlightingEnabled(enabled)) =
                    self.execute(Command::Highlight(HighlightCommand::Toggle))
                {
                    self.status_message = format!(
                        "Syntax highlighting {}",
                        if enabled { "enabled" } else { "disabled" }
                    );
                }
            }
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        self.status_message.clear();

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let page = self.viewport_height.max(1);

        let command = match (key.code, ctrl) {
            (KeyCode::F(1), _) | (KeyCode::Char('n'), true) => return self.trigger(BarAction::New),
            (KeyCode::F(2), _) | (KeyCode::Char('o'), true) => {
                return self.trigger(BarAction::Open);
            }
            (KeyCode::F(3), _) | (KeyCode::Char('s'), true) => {
                return self.trigger(BarAction::Save);
            }
            (KeyCode::F(4), _) | (KeyCode::Char('t'), true) => {
                return self.trigger(BarAction::ToggleHighlighting);
            }
            (KeyCode::Char('q'), true) => return self.request_quit(),

            (KeyCode::Left, _) => Command::Cursor(CursorCommand::Left),
            (KeyCode::Right, _) => Command::Cursor(CursorCommand::Right),
            (KeyCode::Up, _) => Command::Cursor(CursorCommand::Up),
            (KeyCode::Down, _) => Command::Cursor(CursorCommand::Down),
            (KeyCode::PageUp, _) => Command::Cursor(CursorCommand::PageUp { lines: page }),
            (KeyCode::PageDown, _) => Command::Cursor(CursorCommand::PageDown { lines: page }),
            (KeyCode::Home, true) => Command::Cursor(CursorCommand::DocumentStart),
            (KeyCode::End, true) => Command::Cursor(CursorCommand::DocumentEnd),
            (KeyCode::Home, false) => Command::Cursor(CursorCommand::LineStart),
            (KeyCode::End, false) => Command::Cursor(CursorCommand::LineEnd),

            (KeyCode::Enter, _) => Command::Edit(EditCommand::InsertNewline),
            (KeyCode::Tab, _) => Command::Edit(EditCommand::InsertTab),
            (KeyCode::Backspace, _) => Command::Edit(EditCommand::Backspace),
            (KeyCode::Delete, _) => Command::Edit(EditCommand::DeleteForward),
            (KeyCode::Char(c), false) if !key.modifiers.contains(KeyModifiers::ALT) => {
                Command::Edit(EditCommand::InsertText {
                    text: c.to_string(),
                })
            }
            _ => return,
        };

        self.execute(command);
    }

    fn handle_dialog_outcome(&mut self, outcome: DialogOutcome) {
        match outcome {
            DialogOutcome::Pending => {}
            DialogOutcome::Cancelled | DialogOutcome::Dismissed => self.dialog = None,
            DialogOutcome::Confirmed(ConfirmAction::NewFile) => {
                self.dialog = None;
                self.pending_save_path = None;
                if self.execute(Command::File(FileCommand::New)).is_some() {
                    self.scroll_top = 0;
                    self.scroll_left = 0;
                    self.status_message = "New file".to_string();
                }
            }
            DialogOutcome::Confirmed(ConfirmAction::Quit) => {
                self.dialog = None;
                self.should_quit = true;
            }
            DialogOutcome::PathChosen(PathPurpose::Open, path) => {
                self.dialog = None;
                self.open_path(path);
            }
            DialogOutcome::PathChosen(PathPurpose::SaveAs, path) => {
                self.dialog = None;
                self.save_as(path);
            }
        }
    }

    fn request_quit(&mut self) {
        if self.shell.is_modified() {
            self.dialog = Some(Dialog::Confirm(ConfirmAction::Quit));
        } else {
            self.should_quit = true;
        }
    }

    fn open_path(&mut self, path: PathBuf) {
        match self.shell.execute(Command::File(FileCommand::Open { path })) {
            Ok(CommandResult::Opened(path)) => {
                self.scroll_top = 0;
                self.scroll_left = 0;
                self.pending_save_path = None;
                let language = self.shell.language();
                self.status_message = if language.is_source_file(&path) {
                    format!("Opened {}", path.display())
                } else {
                    format!("Opened {} (not a {} file)", path.display(), language.name)
                };
            }
            Ok(_) => {}
            Err(err) => self.show_error(format!("Could not open file: {err}")),
        }
    }

    fn save(&mut self) {
        match self.shell.execute(Command::File(FileCommand::Save)) {
            Ok(CommandResult::PathRequired) => {
                let suggestion = self
                    .pending_save_path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| {
                        format!("untitled.{}", self.shell.language().default_extension)
                    });
                self.dialog = Some(Dialog::Path(PathPrompt::new(
                    PathPurpose::SaveAs,
                    suggestion,
                )));
            }
            Ok(CommandResult::Saved(path)) => {
                self.status_message = format!("Saved {}", path.display());
            }
            Ok(_) => {}
            Err(err) => self.show_error(format!("Could not save file: {err}")),
        }
    }

    fn save_as(&mut self, path: PathBuf) {
        match self.shell.execute(Command::File(FileCommand::SaveAs { path })) {
            Ok(CommandResult::Saved(path)) => {
                self.pending_save_path = None;
                self.status_message = format!("Saved {}", path.display());
            }
            Ok(_) => {}
            Err(err) => self.show_error(format!("Could not save file: {err}")),
        }
    }

    fn show_error(&mut self, message: String) {
        warn!(%message, "file operation failed");
        self.dialog = Some(Dialog::error("Error", message));
    }

    /// Run a command whose failure is reported in the status line.
    fn execute(&mut self, command: Command) -> Option<CommandResult> {
        match self.shell.execute(command) {
            Ok(result) => Some(result),
            Err(err) => {
                self.report(err);
                None
            }
        }
    }

    fn report(&mut self, err: CommandError) {
        debug!(error = %err, "command rejected");
        self.status_message = err.to_string();
    }

    /// Re-run the highlighter over the whole buffer.
    pub fn refresh_highlighting(&mut self) {
        self.shell
            .apply_processor(&mut self.highlighter)
            .unwrap_or_else(|never| match never {});
    }

    fn column_for_display_x(&self, line: usize, x: usize) -> usize {
        let editor = self.shell.editor();
        let Some(text) = editor.line_text(line.min(editor.line_count().saturating_sub(1))) else {
            return 0;
        };
        let tab_width = editor.tab_width();
        let mut width = 0;
        for (column, ch) in text.chars().enumerate() {
            let w = char_display_width(ch, width, tab_width);
            if width + w > x {
                return column;
            }
            width += w;
        }
        text.chars().count()
    }

    /// Display column of the cursor within its line.
    pub(crate) fn cursor_display_x(&self) -> usize {
        let editor = self.shell.editor();
        let Position { line, column } = editor.cursor_position();
        let text = editor.line_text(line).unwrap_or_default();
        let tab_width = editor.tab_width();
        text.chars().take(column).fold(0, |width, ch| {
            width + char_display_width(ch, width, tab_width)
        })
    }

    /// Keep the cursor inside the viewport.
    pub(crate) fn adjust_scroll(&mut self) {
        if self.viewport_height == 0 || self.viewport_width == 0 {
            return;
        }
        let cursor = self.shell.cursor_position();
        if cursor.line < self.scroll_top {
            self.scroll_top = cursor.line;
        }
        if cursor.line >= self.scroll_top + self.viewport_height {
            self.scroll_top = cursor.line + 1 - self.viewport_height;
        }
        self.scroll_top = self
            .scroll_top
            .min(self.shell.line_count().saturating_sub(self.viewport_height));

        let x = self.cursor_display_x();
        if x < self.scroll_left {
            self.scroll_left = x;
        }
        if x >= self.scroll_left + self.viewport_width {
            self.scroll_left = x + 1 - self.viewport_width;
        }
    }
}

/// Width of `ch` drawn at display column `x`; tabs reach the next tab stop.
pub(crate) fn char_display_width(ch: char, x: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab_width = tab_width.max(1);
        tab_width - x % tab_width
    } else {
        ch.width().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use skratchpad_core::StyleLayerId;
    use skratchpad_highlight::{HighlightCategory, STYLE_KEYWORD};
    use std::fs;

    fn app() -> App {
        App::new(Theme::dark(), true).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            let code = if ch == '\n' {
                KeyCode::Enter
            } else {
                KeyCode::Char(ch)
            };
            app.handle_key_event(press(code));
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "skratchpad-app-{}-{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_typing_rehighlights_on_every_key() {
        let mut app = app();
        type_text(&mut app, "def");
        assert_eq!(app.shell().styles_at(0), vec![STYLE_KEYWORD]);

        app.handle_key_event(press(KeyCode::Char('x')));
        assert_eq!(
            app.shell().styles_at(0),
            vec![HighlightCategory::Identifier.style_id()]
        );
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut app = app();
        let mut key = press(KeyCode::Char('a'));
        key.kind = KeyEventKind::Release;
        app.handle_key_event(key);
        assert_eq!(app.shell().text(), "");
    }

    #[test]
    fn test_toggle_clears_and_restores_tags() {
        let mut app = app();
        type_text(&mut app, "x = 1 # c");
        let before = app.shell().style_layer(StyleLayerId::SYNTAX);
        assert!(!before.is_empty());

        app.handle_key_event(press(KeyCode::F(4)));
        assert!(!app.shell().highlighting_enabled());
        assert!(app.shell().style_layer(StyleLayerId::SYNTAX).is_empty());

        app.handle_key_event(ctrl('t'));
        assert_eq!(app.shell().style_layer(StyleLayerId::SYNTAX), before);
    }

    #[test]
    fn test_start_without_highlighting() {
        let mut app = App::new(Theme::dark(), false).unwrap();
        type_text(&mut app, "import os");
        assert!(app.shell().styles_in_range(0, 9).is_empty());
    }

    #[test]
    fn test_new_always_confirms() {
        let mut app = app();
        app.handle_key_event(ctrl('n'));
        assert_eq!(
            app.dialog(),
            Some(&Dialog::Confirm(ConfirmAction::NewFile))
        );
        app.handle_key_event(press(KeyCode::Esc));
        assert!(app.dialog().is_none());

        type_text(&mut app, "x = 1");
        app.handle_key_event(press(KeyCode::F(1)));
        app.handle_key_event(press(KeyCode::Char('n')));
        assert_eq!(app.shell().text(), "x = 1");

        app.handle_key_event(press(KeyCode::F(1)));
        app.handle_key_event(press(KeyCode::Char('y')));
        assert_eq!(app.shell().text(), "");
        assert!(app.shell().style_layer(StyleLayerId::SYNTAX).is_empty());
        assert_eq!(app.shell().window_title(), "SkratchPad - New File");
    }

    #[test]
    fn test_save_without_path_prompts_and_cancel_writes_nothing() {
        let mut app = app();
        type_text(&mut app, "pass");
        app.handle_key_event(ctrl('s'));
        assert_eq!(
            app.dialog(),
            Some(&Dialog::Path(PathPrompt::new(PathPurpose::SaveAs, "untitled.py")))
        );

        app.handle_key_event(press(KeyCode::Esc));
        assert!(app.dialog().is_none());
        assert!(app.shell().file_path().is_none());
        assert!(app.shell().is_modified());
    }

    #[test]
    fn test_save_as_through_prompt() {
        let dir = scratch_dir("save-as");
        let target = dir.join("script");
        let mut app = app();
        type_text(&mut app, "print(1)\n");

        app.handle_key_event(press(KeyCode::F(3)));
        app.handle_key_event(ctrl('u'));
        app.handle_paste(target.display().to_string());
        app.handle_key_event(press(KeyCode::Enter));

        let saved = dir.join("script.py");
        assert_eq!(app.shell().file_path(), Some(saved.as_path()));
        assert_eq!(fs::read_to_string(&saved).unwrap(), "print(1)\n");
        assert_eq!(app.shell().window_title(), "SkratchPad - script.py");
        assert!(app.dialog().is_none());
    }

    #[test]
    fn test_open_through_prompt() {
        let dir = scratch_dir("open");
        let path = dir.join("f.py");
        fs::write(&path, "def f():\n    return 1\n").unwrap();

        let mut app = app();
        app.handle_key_event(ctrl('o'));
        app.handle_paste(path.display().to_string());
        app.handle_key_event(press(KeyCode::Enter));

        assert_eq!(app.shell().text(), "def f():\n    return 1\n");
        assert_eq!(app.shell().styles_at(0), vec![STYLE_KEYWORD]);
        assert_eq!(app.shell().window_title(), "SkratchPad - f.py");
        assert_eq!(app.status_message, format!("Opened {}", path.display()));
    }

    #[test]
    fn test_open_non_python_file_is_flagged_in_status() {
        let dir = scratch_dir("open-txt");
        let path = dir.join("notes.txt");
        fs::write(&path, "plain words\n").unwrap();

        let mut app = app();
        app.open_startup_file(&path);

        assert_eq!(app.shell().text(), "plain words\n");
        assert_eq!(
            app.status_message,
            format!("Opened {} (not a Python file)", path.display())
        );
    }

    #[test]
    fn test_open_failure_shows_error_and_keeps_state() {
        let dir = scratch_dir("open-missing");
        let mut app = app();
        type_text(&mut app, "keep");

        app.handle_key_event(press(KeyCode::F(2)));
        app.handle_paste(dir.join("missing.py").display().to_string());
        app.handle_key_event(press(KeyCode::Enter));

        match app.dialog() {
            Some(Dialog::Error { message, .. }) => {
                assert!(message.starts_with("Could not open file: "), "{message}");
            }
            other => panic!("expected error dialog, got {other:?}"),
        }
        assert_eq!(app.shell().text(), "keep");
        assert!(app.shell().file_path().is_none());

        app.handle_key_event(press(KeyCode::Enter));
        assert!(app.dialog().is_none());
    }

    #[test]
    fn test_startup_file_missing_prefills_save_prompt() {
        let dir = scratch_dir("startup");
        let path = dir.join("later.py");
        let mut app = app();
        app.open_startup_file(&path);
        assert_eq!(app.shell().text(), "");

        app.handle_key_event(ctrl('s'));
        assert_eq!(
            app.dialog(),
            Some(&Dialog::Path(PathPrompt::new(
                PathPurpose::SaveAs,
                path.display().to_string()
            )))
        );
    }

    #[test]
    fn test_quit_confirms_only_when_modified() {
        let mut app = app();
        app.handle_key_event(ctrl('q'));
        assert!(app.should_quit());

        let mut app = self::app();
        type_text(&mut app, "x");
        app.handle_key_event(ctrl('q'));
        assert!(!app.should_quit());
        app.handle_key_event(press(KeyCode::Char('y')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_bar_click_triggers_button() {
        let mut app = app();
        app.buttons = vec![
            (BarAction::New, Rect::new(0, 0, 8, 1)),
            (BarAction::ToggleHighlighting, Rect::new(10, 0, 20, 1)),
        ];
        app.handle_mouse_event(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 12,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert!(!app.shell().highlighting_enabled());
    }

    #[test]
    fn test_click_in_text_moves_cursor_over_tabs() {
        let mut app = app();
        type_text(&mut app, "\tab\nxyz");
        app.text_area = Rect::new(1, 2, 40, 10);
        app.viewport_height = 10;
        app.viewport_width = 40;
        app.handle_mouse_event(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 1 + 5,
            row: 2,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.shell().cursor_position(), Position::new(0, 2));
        assert_eq!(app.cursor_display_x(), 5);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut app = app();
        app.viewport_height = 3;
        app.viewport_width = 10;
        type_text(&mut app, "a\nb\nc\nd\ne");
        assert_eq!(app.scroll_top, 2);

        app.handle_key_event(KeyEvent::new(KeyCode::Home, KeyModifiers::CONTROL));
        assert_eq!(app.scroll_top, 0);

        type_text(&mut app, "0123456789ab");
        assert_eq!(app.scroll_left, 3);
    }

    #[test]
    fn test_char_display_width() {
        assert_eq!(char_display_width('\t', 0, 4), 4);
        assert_eq!(char_display_width('\t', 5, 4), 3);
        assert_eq!(char_display_width('a', 0, 4), 1);
        assert_eq!(char_display_width('中', 0, 4), 2);
    }
}
