//! Line ending helpers.
//!
//! The buffer stores text with LF (`'\n'`) newlines only. Files using CRLF (`"\r\n"`) are
//! normalized on load and the detected line ending is re-applied on save. Files mixing CRLF
//! with lone LF or CR come back with CRLF everywhere.

use std::borrow::Cow;
use std::fmt;

/// The newline sequence used when writing a document to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    #[default]
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineEnding {
    /// Detect the line ending of a source text.
    ///
    /// Policy: any CRLF in the input selects [`LineEnding::Crlf`], otherwise [`LineEnding::Lf`].
    /// One line ending is kept per document, so mixed input is written back uniform.
    pub fn detect_in_text(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    /// Convert an LF-normalized text to this line ending.
    pub fn apply_to_text(self, text: &str) -> Cow<'_, str> {
        match self {
            Self::Lf => Cow::Borrowed(text),
            Self::Crlf => Cow::Owned(text.replace('\n', "\r\n")),
        }
    }

    /// Normalize CRLF and lone CR to LF.
    pub fn normalize(text: &str) -> Cow<'_, str> {
        if !text.contains('\r') {
            return Cow::Borrowed(text);
        }
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lf => "LF",
            Self::Crlf => "CRLF",
        })
    }
}
