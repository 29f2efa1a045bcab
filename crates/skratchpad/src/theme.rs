//! Colors for the editor surface and the five highlight categories.

use crate::config::ThemeName;
use ratatui::style::{Color, Modifier, Style};
use skratchpad_core::StyleId;
use skratchpad_highlight::HighlightCategory;

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub bar_background: Color,
    pub bar_foreground: Color,
    pub status_background: Color,
    pub status_foreground: Color,
    pub keyword: Color,
    pub string: Color,
    pub comment: Color,
    pub number: Color,
    pub identifier: Color,
}

impl Theme {
    pub const fn dark() -> Self {
        Self {
            background: rgb(0x2E2E2E),
            foreground: Color::White,
            bar_background: rgb(0x3C3C3C),
            bar_foreground: Color::White,
            status_background: rgb(0x1E1E1E),
            status_foreground: rgb(0xCCCCCC),
            keyword: rgb(0x3AF8BC),
            string: rgb(0xBB86FC),
            comment: rgb(0x888888),
            number: rgb(0x00CCFF),
            identifier: rgb(0x66CCFF),
        }
    }

    pub const fn light() -> Self {
        Self {
            background: rgb(0xFAFAFA),
            foreground: rgb(0x202020),
            bar_background: rgb(0xE0E0E0),
            bar_foreground: rgb(0x202020),
            status_background: rgb(0xD0D0D0),
            status_foreground: rgb(0x303030),
            keyword: rgb(0x0B7A5A),
            string: rgb(0x7B3FC4),
            comment: rgb(0x808080),
            number: rgb(0x006DA8),
            identifier: rgb(0x1F5F99),
        }
    }

    pub const fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    pub fn category_color(&self, category: HighlightCategory) -> Color {
        match category {
            HighlightCategory::Keyword => self.keyword,
            HighlightCategory::String => self.string,
            HighlightCategory::Comment => self.comment,
            HighlightCategory::Number => self.number,
            HighlightCategory::Identifier => self.identifier,
        }
    }

    /// Base text style.
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    /// Style for a character carrying `style_ids`. Unknown ids are ignored; the last known id
    /// wins, which never matters for the syntax layer since its intervals are disjoint.
    pub fn style_for_style_ids(&self, style_ids: &[StyleId]) -> Style {
        let mut style = self.text_style();
        for &style_id in style_ids {
            if let Some(category) = HighlightCategory::from_style_id(style_id) {
                style = style.fg(self.category_color(category));
                if category == HighlightCategory::Comment {
                    style = style.add_modifier(Modifier::ITALIC);
                }
            }
        }
        style
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
