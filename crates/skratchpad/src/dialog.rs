//! Modal dialogs: confirmation, path prompt (the file picker) and error message.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    NewFile,
    Quit,
}

impl ConfirmAction {
    pub fn title(self) -> &'static str {
        match self {
            Self::NewFile => "New File",
            Self::Quit => "Quit",
        }
    }

    pub fn message(self) -> &'static str {
        "Are you sure? Unsaved changes will be lost."
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPurpose {
    Open,
    SaveAs,
}

impl PathPurpose {
    pub fn title(self) -> &'static str {
        match self {
            Self::Open => "Open File",
            Self::SaveAs => "Save File",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrompt {
    pub purpose: PathPurpose,
    pub input: String,
}

impl PathPrompt {
    pub fn new(purpose: PathPurpose, input: impl Into<String>) -> Self {
        Self {
            purpose,
            input: input.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Confirm(ConfirmAction),
    Path(PathPrompt),
    Error { title: String, message: String },
}

/// What a key press did to the open dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Dialog stays open.
    Pending,
    /// Dialog closed without effect.
    Cancelled,
    Confirmed(ConfirmAction),
    PathChosen(PathPurpose, PathBuf),
    /// Error dialog acknowledged.
    Dismissed,
}

impl Dialog {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome {
        match self {
            Dialog::Confirm(action) => match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => DialogOutcome::Confirmed(*action),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => DialogOutcome::Cancelled,
                _ => DialogOutcome::Pending,
            },
            Dialog::Path(prompt) => match key.code {
                KeyCode::Esc => DialogOutcome::Cancelled,
                KeyCode::Enter => {
                    let input = prompt.input.trim();
                    if input.is_empty() {
                        DialogOutcome::Cancelled
                    } else {
                        DialogOutcome::PathChosen(prompt.purpose, PathBuf::from(input))
                    }
                }
                KeyCode::Backspace => {
                    prompt.input.pop();
                    DialogOutcome::Pending
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    prompt.input.clear();
                    DialogOutcome::Pending
                }
                KeyCode::Char(c)
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    prompt.input.push(c);
                    DialogOutcome::Pending
                }
                _ => DialogOutcome::Pending,
            },
            Dialog::Error { .. } => match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => DialogOutcome::Dismissed,
                _ => DialogOutcome::Pending,
            },
        }
    }

    /// Append pasted text to a path prompt; other dialogs ignore it.
    pub fn handle_paste(&mut self, text: &str) {
        if let Dialog::Path(prompt) = self {
            prompt
                .input
                .extend(text.chars().filter(|c| *c != '\r' && *c != '\n'));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_confirm_yes_and_no() {
        let mut dialog = Dialog::Confirm(ConfirmAction::NewFile);
        assert_eq!(dialog.handle_key(press(KeyCode::Char('x'))), DialogOutcome::Pending);
        assert_eq!(
            dialog.handle_key(press(KeyCode::Char('y'))),
            DialogOutcome::Confirmed(ConfirmAction::NewFile)
        );
        assert_eq!(dialog.handle_key(press(KeyCode::Esc)), DialogOutcome::Cancelled);
    }

    #[test]
    fn test_path_prompt_editing() {
        let mut dialog = Dialog::Path(PathPrompt::new(PathPurpose::SaveAs, "a.p"));
        dialog.handle_key(press(KeyCode::Char('x')));
        dialog.handle_key(press(KeyCode::Backspace));
        dialog.handle_key(press(KeyCode::Char('y')));
        dialog.handle_paste("\r\n");
        assert_eq!(
            dialog.handle_key(press(KeyCode::Enter)),
            DialogOutcome::PathChosen(PathPurpose::SaveAs, PathBuf::from("a.py"))
        );
    }

    #[test]
    fn test_empty_path_cancels() {
        let mut dialog = Dialog::Path(PathPrompt::new(PathPurpose::Open, "   "));
        assert_eq!(dialog.handle_key(press(KeyCode::Enter)), DialogOutcome::Cancelled);

        let mut dialog = Dialog::Path(PathPrompt::new(PathPurpose::Open, "x.py"));
        dialog.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(dialog.handle_key(press(KeyCode::Enter)), DialogOutcome::Cancelled);
    }

    #[test]
    fn test_error_dismissed() {
        let mut dialog = Dialog::error("Error", "Could not open file: boom");
        assert_eq!(dialog.handle_key(press(KeyCode::Char('q'))), DialogOutcome::Pending);
        assert_eq!(dialog.handle_key(press(KeyCode::Enter)), DialogOutcome::Dismissed);
    }
}
