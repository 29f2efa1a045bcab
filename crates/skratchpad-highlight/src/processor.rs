use crate::highlighter::Highlighter;
use crate::python::{LexerError, PythonLexer};
use crate::token::Tokenizer;
use skratchpad_core::intervals::StyleLayerId;
use skratchpad_core::processing::{DocumentProcessor, ProcessingEdit};
use skratchpad_core::EditorShell;
use std::convert::Infallible;
use tracing::debug;

/// Applies a [`Highlighter`] to an [`EditorShell`]'s syntax style layer.
///
/// With highlighting enabled the whole layer is replaced by fresh spans; with highlighting
/// disabled the layer is cleared.
#[derive(Debug, Clone)]
pub struct HighlightProcessor<T = PythonLexer> {
    layer: StyleLayerId,
    highlighter: Highlighter<T>,
}

impl HighlightProcessor<PythonLexer> {
    /// Python highlighting into [`StyleLayerId::SYNTAX`].
    pub fn python() -> Result<Self, LexerError> {
        Ok(Self::new(StyleLayerId::SYNTAX, Highlighter::python()?))
    }
}

impl<T: Tokenizer> HighlightProcessor<T> {
    /// Create a processor writing into `layer`.
    pub fn new(layer: StyleLayerId, highlighter: Highlighter<T>) -> Self {
        Self { layer, highlighter }
    }
}

impl<T: Tokenizer> DocumentProcessor for HighlightProcessor<T> {
    type Error = Infallible;

    fn process(&mut self, shell: &EditorShell) -> Result<Vec<ProcessingEdit>, Self::Error> {
        if !shell.highlighting_enabled() {
            return Ok(vec![ProcessingEdit::ClearStyleLayer { layer: self.layer }]);
        }
        let intervals = self.highlighter.intervals(&shell.text(), true);
        debug!(
            spans = intervals.len(),
            version = shell.version(),
            "refreshed syntax highlighting"
        );
        Ok(vec![ProcessingEdit::ReplaceStyleLayer {
            layer: self.layer,
            intervals,
        }])
    }
}
