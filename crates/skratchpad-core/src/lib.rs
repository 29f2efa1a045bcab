#![warn(missing_docs)]
//! SkratchPad Core - headless editor shell
//!
//! # Overview
//!
//! `skratchpad-core` holds everything the editor knows that is not drawing: the text buffer,
//! the cursor, the associated file, the syntax highlighting flag, and the style layers that a
//! highlighter fills in. Frontends translate user input into [`Command`]s and render the
//! buffer plus [`EditorShell::styles_in_range`].
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditorShell (commands, file association)   │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Style layers (processing edits)            │  ← Derived state
//! ├─────────────────────────────────────────────┤
//! │  EditorCore (rope buffer + cursor)          │  ← Text
//! ├─────────────────────────────────────────────┤
//! │  Storage (whole-file UTF-8 I/O)             │  ← Disk
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Module Description
//!
//! - [`commands`] - command enums and the rope-backed buffer
//! - [`state`] - the editor shell
//! - [`intervals`] - style intervals and layers
//! - [`processing`] - interface for derived-state producers
//! - [`storage`] - file reading and writing
//! - [`line_ending`] - LF/CRLF handling

pub mod commands;
pub mod intervals;
pub mod line_ending;
pub mod processing;
pub mod state;
pub mod storage;

pub use commands::{
    Command, CommandError, CommandResult, CursorCommand, EditCommand, EditorCore, FileCommand,
    HighlightCommand, Position,
};
pub use intervals::{Interval, IntervalTree, StyleId, StyleLayerId};
pub use line_ending::LineEnding;
pub use processing::{DocumentProcessor, ProcessingEdit};
pub use state::{APP_NAME, DocumentState, EditorShell};
pub use storage::{DocumentError, LoadedDocument, read_document, write_document};
