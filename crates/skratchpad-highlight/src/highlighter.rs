//! Token-to-category highlighting.

use crate::python::{LexerError, PythonLexer};
use crate::token::{NameKind, TokenKind, Tokenizer};
use skratchpad_core::intervals::{Interval, StyleId};

/// Display category of a highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HighlightCategory {
    /// Keywords, including `True`/`False`/`None` and import keywords.
    Keyword,
    /// String literals and docstrings.
    String,
    /// Comments.
    Comment,
    /// Numeric literals.
    Number,
    /// Identifiers other than builtins.
    Identifier,
}

impl HighlightCategory {
    /// All categories in classification priority order.
    pub const ALL: [Self; 5] = [
        Self::Keyword,
        Self::String,
        Self::Comment,
        Self::Number,
        Self::Identifier,
    ];

    /// Returns `true` if a token of `kind` belongs to this category.
    pub fn matches(self, kind: TokenKind) -> bool {
        match self {
            Self::Keyword => matches!(kind, TokenKind::Keyword(_)),
            Self::String => matches!(kind, TokenKind::String(_)),
            Self::Comment => matches!(kind, TokenKind::Comment),
            Self::Number => matches!(kind, TokenKind::Number(_)),
            Self::Identifier => matches!(
                kind,
                TokenKind::Name(
                    NameKind::Plain
                        | NameKind::Function
                        | NameKind::Class
                        | NameKind::Decorator
                        | NameKind::Exception
                )
            ),
        }
    }

    /// The first category in [`HighlightCategory::ALL`] matching `kind`, if any.
    pub fn classify(kind: TokenKind) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.matches(kind))
    }

    /// Stable style id; the UI theme maps it to a color.
    pub fn style_id(self) -> StyleId {
        match self {
            Self::Keyword => STYLE_KEYWORD,
            Self::String => STYLE_STRING,
            Self::Comment => STYLE_COMMENT,
            Self::Number => STYLE_NUMBER,
            Self::Identifier => STYLE_IDENTIFIER,
        }
    }

    /// Inverse of [`HighlightCategory::style_id`].
    pub fn from_style_id(style_id: StyleId) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.style_id() == style_id)
    }
}

/// Style ids for highlight categories.
pub const STYLE_KEYWORD: StyleId = 0x0100_0001;
/// See [`STYLE_KEYWORD`].
pub const STYLE_STRING: StyleId = 0x0100_0002;
/// See [`STYLE_KEYWORD`].
pub const STYLE_COMMENT: StyleId = 0x0100_0003;
/// See [`STYLE_KEYWORD`].
pub const STYLE_NUMBER: StyleId = 0x0100_0004;
/// See [`STYLE_KEYWORD`].
pub const STYLE_IDENTIFIER: StyleId = 0x0100_0005;

/// A categorized character range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Category.
    pub category: HighlightCategory,
    /// Start character offset.
    pub start: usize,
    /// End character offset (exclusive).
    pub end: usize,
}

impl HighlightSpan {
    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for an empty span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The span as a style interval.
    pub fn to_interval(&self) -> Interval {
        Interval::new(self.start, self.end, self.category.style_id())
    }
}

/// What a walked token turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Whitespace-only token; no span.
    Whitespace,
    /// Token matching no category; no span.
    Uncategorized,
    /// Token emitted as a span.
    Span(HighlightCategory),
}

/// One walked token with its character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Classification.
    pub kind: SegmentKind,
    /// Start character offset.
    pub start: usize,
    /// End character offset (exclusive).
    pub end: usize,
}

impl Segment {
    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for an empty segment.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Stateless highlighter over a [`Tokenizer`].
#[derive(Debug, Clone)]
pub struct Highlighter<T = PythonLexer> {
    tokenizer: T,
}

impl Highlighter<PythonLexer> {
    /// Highlighter for Python source.
    pub fn python() -> Result<Self, LexerError> {
        Ok(Self::new(PythonLexer::new()?))
    }
}

impl<T: Tokenizer> Highlighter<T> {
    /// Wrap a tokenizer.
    pub fn new(tokenizer: T) -> Self {
        Self { tokenizer }
    }

    /// The wrapped tokenizer.
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Walk every token of `text` and report what it became.
    ///
    /// A newline is appended before lexing so a token pending at the end of the buffer is
    /// flushed; ranges are clamped to `text`, so segment lengths sum to its character count.
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        let buffer_len = text.chars().count();
        let mut source = String::with_capacity(text.len() + 1);
        source.push_str(text);
        source.push('\n');

        let mut segments = Vec::new();
        let mut cursor = 0;
        for token in self.tokenizer.tokenize(&source) {
            let start = cursor;
            cursor += token.char_len();
            let end = cursor.min(buffer_len);
            if start >= end {
                continue;
            }
            let kind = if token.is_blank() {
                SegmentKind::Whitespace
            } else {
                HighlightCategory::classify(token.kind)
                    .map_or(SegmentKind::Uncategorized, SegmentKind::Span)
            };
            segments.push(Segment { kind, start, end });
        }
        segments
    }

    /// Category spans for `text`; empty when `enabled` is false.
    pub fn highlight(&self, text: &str, enabled: bool) -> Vec<HighlightSpan> {
        if !enabled {
            return Vec::new();
        }
        self.segments(text)
            .into_iter()
            .filter_map(|segment| match segment.kind {
                SegmentKind::Span(category) => Some(HighlightSpan {
                    category,
                    start: segment.start,
                    end: segment.end,
                }),
                SegmentKind::Whitespace | SegmentKind::Uncategorized => None,
            })
            .collect()
    }

    /// [`Highlighter::highlight`] as style intervals.
    pub fn intervals(&self, text: &str, enabled: bool) -> Vec<Interval> {
        self.highlight(text, enabled)
            .iter()
            .map(HighlightSpan::to_interval)
            .collect()
    }
}
