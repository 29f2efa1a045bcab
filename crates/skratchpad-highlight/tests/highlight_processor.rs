use skratchpad_core::{
    Command, EditCommand, EditorShell, FileCommand, HighlightCommand, StyleLayerId,
};
use skratchpad_highlight::{
    HighlightCategory, HighlightProcessor, STYLE_IDENTIFIER, STYLE_KEYWORD, STYLE_NUMBER,
};
use skratchpad_lang::LanguageConfig;
use std::fs;

fn refresh(shell: &mut EditorShell, processor: &mut HighlightProcessor) {
    shell
        .apply_processor(processor)
        .unwrap_or_else(|never| match never {});
}

#[test]
fn test_processor_fills_syntax_layer() {
    let mut shell = EditorShell::with_text(LanguageConfig::python(), "def f():\n    return 1\n");
    let mut processor = HighlightProcessor::python().unwrap();
    refresh(&mut shell, &mut processor);

    assert_eq!(shell.styles_at(0), vec![STYLE_KEYWORD]);
    assert_eq!(shell.styles_at(4), vec![STYLE_IDENTIFIER]);
    assert_eq!(shell.styles_at(20), vec![STYLE_NUMBER]);
    assert!(shell.styles_at(3).is_empty());
    assert!(shell.styles_at(5).is_empty());
    assert_eq!(shell.style_layer(StyleLayerId::SYNTAX).len(), 4);
}

#[test]
fn test_toggle_off_removes_every_category_tag() {
    let text = "import os\n# c\nx = 'a' + 2\n";
    let mut shell = EditorShell::with_text(LanguageConfig::python(), text);
    let mut processor = HighlightProcessor::python().unwrap();
    refresh(&mut shell, &mut processor);

    let categories: Vec<HighlightCategory> = shell
        .style_layer(StyleLayerId::SYNTAX)
        .iter()
        .filter_map(|i| HighlightCategory::from_style_id(i.style_id))
        .collect();
    for category in HighlightCategory::ALL {
        assert!(categories.contains(&category), "missing {category:?}");
    }

    shell
        .execute(Command::Highlight(HighlightCommand::Toggle))
        .unwrap();
    refresh(&mut shell, &mut processor);

    assert!(shell.styles_in_range(0, shell.char_count()).is_empty());
}

#[test]
fn test_reenabling_restores_identical_layer() {
    let mut shell = EditorShell::with_text(LanguageConfig::python(), "for i in range(3): pass");
    let mut processor = HighlightProcessor::python().unwrap();
    refresh(&mut shell, &mut processor);
    let before = shell.style_layer(StyleLayerId::SYNTAX);

    for _ in 0..2 {
        shell
            .execute(Command::Highlight(HighlightCommand::Toggle))
            .unwrap();
        refresh(&mut shell, &mut processor);
    }

    assert_eq!(shell.style_layer(StyleLayerId::SYNTAX), before);
}

#[test]
fn test_edits_followed_by_refresh_track_text() {
    let mut shell = EditorShell::new(LanguageConfig::python());
    let mut processor = HighlightProcessor::python().unwrap();

    for ch in "x = 10".chars() {
        shell
            .execute(Command::Edit(EditCommand::InsertText {
                text: ch.to_string(),
            }))
            .unwrap();
        refresh(&mut shell, &mut processor);
    }

    assert_eq!(shell.styles_at(0), vec![STYLE_IDENTIFIER]);
    assert_eq!(shell.styles_at(4), vec![STYLE_NUMBER]);
    assert_eq!(shell.styles_at(5), vec![STYLE_NUMBER]);
}

#[test]
fn test_open_file_then_highlight() {
    let dir = std::env::temp_dir().join(format!("skratchpad-hl-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("f.py");
    fs::write(&path, "def f():\n    return 1\n").unwrap();

    let mut shell = EditorShell::new(LanguageConfig::python());
    let mut processor = HighlightProcessor::python().unwrap();
    shell
        .execute(Command::File(FileCommand::Open { path }))
        .unwrap();
    refresh(&mut shell, &mut processor);

    let tagged: Vec<(usize, usize)> = shell
        .style_layer(StyleLayerId::SYNTAX)
        .iter()
        .map(|i| (i.start, i.end))
        .collect();
    assert_eq!(tagged, vec![(0, 3), (4, 5), (13, 19), (20, 21)]);
}
