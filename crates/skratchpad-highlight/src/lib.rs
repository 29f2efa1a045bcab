#![warn(missing_docs)]
//! `skratchpad-highlight` - category highlighting for SkratchPad.
//!
//! A [`Tokenizer`] splits text into [`Token`]s with explicit [`TokenKind`]s. The
//! [`Highlighter`] walks those tokens with a character cursor and maps each one to at most one
//! [`HighlightCategory`], checked in the fixed order keyword, string, comment, number,
//! identifier. [`HighlightProcessor`] feeds the result into `skratchpad-core`'s syntax style
//! layer.
//!
//! ```rust
//! use skratchpad_highlight::{HighlightCategory, Highlighter};
//!
//! let highlighter = Highlighter::python().unwrap();
//! let spans = highlighter.highlight("return x", true);
//! assert_eq!(spans[0].category, HighlightCategory::Keyword);
//! assert_eq!((spans[1].start, spans[1].end), (7, 8));
//! ```

mod highlighter;
mod processor;
mod python;
mod token;

pub use highlighter::{
    HighlightCategory, HighlightSpan, Highlighter, STYLE_COMMENT, STYLE_IDENTIFIER, STYLE_KEYWORD,
    STYLE_NUMBER, STYLE_STRING, Segment, SegmentKind,
};
pub use processor::HighlightProcessor;
pub use python::{LexerError, PythonLexer};
pub use token::{KeywordKind, NameKind, NumberKind, StringKind, Token, TokenKind, Tokenizer};
