use skratchpad_core::{
    Command, CommandError, CommandResult, CursorCommand, EditCommand, EditorShell, Position,
};
use skratchpad_lang::LanguageConfig;

fn shell_with(text: &str) -> EditorShell {
    EditorShell::with_text(LanguageConfig::python(), text)
}

#[test]
fn test_typing_at_cursor() {
    let mut shell = shell_with("");
    for text in ["def", " ", "f():"] {
        shell
            .execute(Command::Edit(EditCommand::InsertText {
                text: text.to_string(),
            }))
            .unwrap();
    }
    shell.execute(Command::Edit(EditCommand::InsertNewline)).unwrap();
    shell.execute(Command::Edit(EditCommand::InsertTab)).unwrap();
    shell
        .execute(Command::Edit(EditCommand::InsertText {
            text: "return 1".to_string(),
        }))
        .unwrap();

    assert_eq!(shell.text(), "def f():\n    return 1");
    assert_eq!(shell.cursor_position(), Position::new(1, 12));
    assert_eq!(shell.line_text(1).as_deref(), Some("    return 1"));
    assert_eq!(shell.line_text(2), None);
}

#[test]
fn test_inserted_crlf_is_normalized() {
    let mut shell = shell_with("");
    shell
        .execute(Command::Edit(EditCommand::InsertText {
            text: "a\r\nb\rc".to_string(),
        }))
        .unwrap();
    assert_eq!(shell.text(), "a\nb\nc");
    assert_eq!(shell.line_count(), 3);
}

#[test]
fn test_invalid_offsets_are_rejected_without_mutation() {
    let mut shell = shell_with("abc");

    let err = shell
        .execute(Command::Edit(EditCommand::Insert {
            offset: 4,
            text: "x".to_string(),
        }))
        .unwrap_err();
    assert!(matches!(err, CommandError::InvalidOffset(4)));

    let err = shell
        .execute(Command::Edit(EditCommand::Delete {
            start: 2,
            length: 5,
        }))
        .unwrap_err();
    assert!(matches!(err, CommandError::InvalidRange { start: 2, end: 7 }));

    assert_eq!(shell.text(), "abc");
    assert!(!shell.is_modified());
}

#[test]
fn test_backspace_joins_lines() {
    let mut shell = shell_with("ab\ncd");
    shell
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 1, column: 0 }))
        .unwrap();
    shell.execute(Command::Edit(EditCommand::Backspace)).unwrap();
    assert_eq!(shell.text(), "abcd");
    assert_eq!(shell.cursor_position(), Position::new(0, 2));

    shell
        .execute(Command::Edit(EditCommand::DeleteForward))
        .unwrap();
    assert_eq!(shell.text(), "abd");
}

#[test]
fn test_cursor_commands_report_position() {
    let mut shell = shell_with("one\ntwo\nthree");

    let result = shell
        .execute(Command::Cursor(CursorCommand::DocumentEnd))
        .unwrap();
    assert_eq!(result, CommandResult::Position(Position::new(2, 5)));

    let result = shell
        .execute(Command::Cursor(CursorCommand::PageUp { lines: 10 }))
        .unwrap();
    assert_eq!(result, CommandResult::Position(Position::new(0, 3)));

    let result = shell
        .execute(Command::Cursor(CursorCommand::Left))
        .unwrap();
    assert_eq!(result, CommandResult::Position(Position::new(0, 2)));

    shell
        .execute(Command::Cursor(CursorCommand::LineEnd))
        .unwrap();
    let result = shell
        .execute(Command::Cursor(CursorCommand::Right))
        .unwrap();
    assert_eq!(result, CommandResult::Position(Position::new(1, 0)));
}

#[test]
fn test_form_feed_and_unicode_separators_do_not_split_lines() {
    let text = "a = 1\x0cb = 2\u{2028}c\u{85}d\n";
    let mut shell = shell_with(text);

    assert_eq!(shell.line_count(), 2);
    assert_eq!(shell.line_text(0).as_deref(), Some("a = 1\x0cb = 2\u{2028}c\u{85}d"));

    let result = shell
        .execute(Command::Cursor(CursorCommand::LineEnd))
        .unwrap();
    assert_eq!(result, CommandResult::Position(Position::new(0, 15)));
    assert_eq!(shell.cursor_offset(), 15);
}
