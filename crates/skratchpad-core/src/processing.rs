//! Generic document processing interface.
//!
//! Derived state such as syntax highlighting is computed outside the shell and expressed as
//! [`ProcessingEdit`] values, which are applied with
//! [`EditorShell::apply_processing_edits`](crate::EditorShell::apply_processing_edits).

use crate::EditorShell;
use crate::intervals::{Interval, StyleLayerId};

/// A change to derived editor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingEdit {
    /// Replace an entire style layer with the given intervals (char offsets).
    ReplaceStyleLayer {
        /// The style layer being replaced.
        layer: StyleLayerId,
        /// The full set of style intervals for the layer (char offsets, half-open).
        intervals: Vec<Interval>,
    },
    /// Clear a style layer.
    ClearStyleLayer {
        /// The style layer being cleared.
        layer: StyleLayerId,
    },
}

/// A processor that produces [`ProcessingEdit`]s for the current document.
pub trait DocumentProcessor {
    /// The error type returned by [`DocumentProcessor::process`].
    type Error;

    /// Compute derived state updates.
    ///
    /// Implementations read `shell` and return edits; the caller applies them
    /// (e.g. via [`EditorShell::apply_processor`](crate::EditorShell::apply_processor)).
    fn process(&mut self, shell: &EditorShell) -> Result<Vec<ProcessingEdit>, Self::Error>;
}
