//! Rendering.

use crate::app::{App, BarAction, char_display_width};
use crate::dialog::{Dialog, PathPurpose};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::path::Path;

const BUTTON_GAP: u16 = 1;

pub fn render(app: &mut App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // button bar
            Constraint::Min(1),    // text
            Constraint::Length(1), // status line
            Constraint::Length(1), // key hints
        ])
        .split(frame.area());

    render_bar(app, frame, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.shell.window_title())
        .style(app.theme.text_style());
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    app.text_area = inner;
    app.viewport_height = usize::from(inner.height);
    app.viewport_width = usize::from(inner.width);
    app.adjust_scroll();

    render_text(app, frame, inner);
    render_status_line(app, frame, chunks[2]);
    render_hints(app, frame, chunks[3]);

    if let Some(dialog) = app.dialog() {
        render_dialog(app, dialog, frame);
    }
}

fn render_bar(app: &mut App, frame: &mut Frame, area: Rect) {
    let bar_style = Style::default()
        .bg(app.theme.bar_background)
        .fg(app.theme.bar_foreground);
    let button_style = bar_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    let enabled = app.shell.highlighting_enabled();

    let mut spans = Vec::new();
    let mut buttons = Vec::new();
    let mut x = area.x;
    for action in BarAction::ALL {
        let label = format!(" {} ", action.label(enabled));
        let width = (label.chars().count() as u16).min(area.right().saturating_sub(x));
        if width == 0 {
            break;
        }
        buttons.push((action, Rect::new(x, area.y, width, 1)));
        spans.push(Span::styled(label, button_style));
        spans.push(Span::styled(" ".repeat(usize::from(BUTTON_GAP)), bar_style));
        x = x.saturating_add(width + BUTTON_GAP);
    }
    app.buttons = buttons;

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar_style), area);
}

fn render_text(app: &App, frame: &mut Frame, area: Rect) {
    let editor = app.shell.editor();
    let tab_width = editor.tab_width();
    let height = usize::from(area.height);
    let width = usize::from(area.width);

    let mut lines = Vec::with_capacity(height);
    for line in app.scroll_top..(app.scroll_top + height).min(editor.line_count()) {
        let text = editor.line_text(line).unwrap_or_default();
        let start = editor.line_start_offset(line);
        let chars: Vec<char> = text.chars().collect();

        let mut styles = vec![app.theme.text_style(); chars.len()];
        for (s, e, style_id) in app.shell.styles_in_range(start, start + chars.len()) {
            let style = app.theme.style_for_style_ids(&[style_id]);
            let from = s.saturating_sub(start);
            let to = e.saturating_sub(start).min(chars.len());
            for slot in styles.iter_mut().take(to).skip(from) {
                *slot = style;
            }
        }

        // Expand to display cells, then cut the horizontal window.
        let mut spans: Vec<Span> = Vec::new();
        let mut x = 0;
        for (ch, style) in chars.iter().zip(styles) {
            let w = char_display_width(*ch, x, tab_width);
            let cell_start = x;
            x += w;
            if x <= app.scroll_left || w == 0 {
                continue;
            }
            if cell_start >= app.scroll_left + width {
                break;
            }
            let glyph = if *ch == '\t' || cell_start < app.scroll_left {
                " ".repeat(x.min(app.scroll_left + width) - cell_start.max(app.scroll_left))
            } else {
                ch.to_string()
            };
            match spans.last_mut() {
                Some(last) if last.style == style => last.content.to_mut().push_str(&glyph),
                _ => spans.push(Span::styled(glyph, style)),
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(app.theme.text_style()), area);

    if app.dialog.is_none() {
        let cursor = app.shell.cursor_position();
        let x = app.cursor_display_x();
        if cursor.line >= app.scroll_top
            && cursor.line < app.scroll_top + height
            && x >= app.scroll_left
            && x < app.scroll_left + width
        {
            frame.set_cursor_position((
                area.x + (x - app.scroll_left) as u16,
                area.y + (cursor.line - app.scroll_top) as u16,
            ));
        }
    }
}

fn render_status_line(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.shell.get_document_state();
    let cursor = app.shell.cursor_position();
    let text = if app.status_message.is_empty() {
        format!(
            "Ln {}, Col {} | {} lines | {} | {} | Highlighting {}",
            cursor.line + 1,
            cursor.column + 1,
            state.line_count,
            app.shell.language().name,
            state.line_ending,
            if state.highlighting_enabled { "on" } else { "off" },
        )
    } else {
        app.status_message.clone()
    };

    let style = Style::default()
        .bg(app.theme.status_background)
        .fg(app.theme.status_foreground);
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_hints(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match app.dialog() {
        Some(Dialog::Confirm(_)) => "Y/Enter: Yes  N/Esc: No",
        Some(Dialog::Path(_)) => "Enter: OK  Esc: Cancel  Ctrl-U: Clear",
        Some(Dialog::Error { .. }) => "Enter/Esc: Close",
        None => "^N New  ^O Open  ^S Save  ^T Highlighting  ^Q Quit",
    };
    let style = Style::default()
        .bg(app.theme.bar_background)
        .fg(app.theme.bar_foreground);
    frame.render_widget(Paragraph::new(hints).style(style), area);
}

fn render_dialog(app: &App, dialog: &Dialog, frame: &mut Frame) {
    let popup = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, popup);

    let (title, body) = match dialog {
        Dialog::Confirm(action) => (action.title().to_string(), vec![Line::from(action.message())]),
        Dialog::Path(prompt) => {
            let mut body = vec![Line::from(vec![
                Span::raw("> "),
                Span::styled(
                    prompt.input.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ])];
            if prompt.purpose == PathPurpose::Open {
                body.push(Line::from(""));
                body.push(Line::from(filter_labels(app, &prompt.input)));
            }
            (prompt.purpose.title().to_string(), body)
        }
        Dialog::Error { title, message } => (title.clone(), vec![Line::from(message.as_str())]),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(app.theme.text_style());
    let inner = block.inner(popup);
    frame.render_widget(
        Paragraph::new(body)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup,
    );

    if let Dialog::Path(prompt) = dialog {
        let x = inner.x + 2 + prompt.input.chars().count() as u16;
        frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

/// Filter labels for the Open prompt; the filter matching `input` is bracketed.
fn filter_labels(app: &App, input: &str) -> String {
    let language = app.shell.language();
    let input = input.trim();
    let matching = (!input.is_empty())
        .then(|| language.matching_filter(Path::new(input)))
        .flatten();
    language
        .filters
        .iter()
        .map(|filter| {
            if matching == Some(filter) {
                format!("[{}]", filter.label())
            } else {
                filter.label()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(app: &mut App, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(app, f)).unwrap();
        terminal
    }

    fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_bar_buttons_are_laid_out() {
        let mut app = App::new(Theme::dark(), true).unwrap();
        let terminal = draw(&mut app, 80, 10);
        assert!(row(&terminal, 0).starts_with(" F1 New   F2 Open   F3 Save "));
        let actions: Vec<BarAction> = app.buttons.iter().map(|(a, _)| *a).collect();
        assert_eq!(actions, BarAction::ALL.to_vec());
        assert_eq!(app.buttons[0].1, Rect::new(0, 0, 8, 1));
    }

    #[test]
    fn test_text_is_colored_by_category() {
        let mut app = App::new(Theme::dark(), true).unwrap();
        for ch in "def f".chars() {
            app.handle_key_event(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        let terminal = draw(&mut app, 40, 8);
        let buffer = terminal.backend().buffer();
        // Text starts inside the border at (1, 2).
        assert_eq!(buffer[(1, 2)].symbol(), "d");
        assert_eq!(buffer[(1, 2)].fg, app.theme.keyword);
        assert_eq!(buffer[(4, 2)].fg, app.theme.foreground);
        assert_eq!(buffer[(5, 2)].fg, app.theme.identifier);
        assert_eq!(app.text_area, Rect::new(1, 2, 38, 3));
    }

    #[test]
    fn test_tabs_expand_to_spaces() {
        let mut app = App::new(Theme::dark(), true).unwrap();
        app.handle_paste("\tx".to_string());
        let terminal = draw(&mut app, 40, 8);
        assert!(row(&terminal, 2).starts_with("│    x"));
    }

    #[test]
    fn test_error_dialog_is_drawn() {
        let mut app = App::new(Theme::dark(), true).unwrap();
        app.dialog = Some(Dialog::error("Error", "Could not open file: nope"));
        let terminal = draw(&mut app, 80, 20);
        let screen: String = (0..20).map(|y| row(&terminal, y)).collect();
        assert!(screen.contains("Could not open file: nope"));
        assert!(screen.contains("Enter/Esc: Close"));
    }

    #[test]
    fn test_open_prompt_marks_matching_filter() {
        let app = App::new(Theme::dark(), true).unwrap();
        assert_eq!(
            filter_labels(&app, ""),
            "Python Files (*.py)  Text Files (*.txt)  All Files (*.*)"
        );
        assert_eq!(
            filter_labels(&app, "notes.txt"),
            "Python Files (*.py)  [Text Files (*.txt)]  All Files (*.*)"
        );
        assert_eq!(
            filter_labels(&app, "main.py"),
            "[Python Files (*.py)]  Text Files (*.txt)  All Files (*.*)"
        );
    }

    #[test]
    fn test_centered_rect() {
        let rect = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(rect, Rect::new(25, 10, 50, 20));
    }
}
