//! Cue scripts: note references, steps, and the text parser that builds them.

pub mod cache;
pub mod error;
pub mod parser;

pub use cache::ScriptCache;
pub use error::{Diagnostic, DiagnosticKind, NoteField};
pub use parser::{parse, parse_with, Parsed};

use std::fmt;
use std::ops::Index;

/// Highest valid MIDI channel (0-based).
pub const MAX_CHANNEL: u8 = 15;
/// Highest valid MIDI note number.
pub const MAX_NOTE: u8 = 127;

/// A `(channel, note)` pair. Both fields are always within MIDI range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteRef {
    channel: u8,
    note: u8,
}

impl NoteRef {
    /// Build a note reference, or `None` if either value is out of range.
    pub fn new(channel: u8, note: u8) -> Option<Self> {
        if channel <= MAX_CHANNEL && note <= MAX_NOTE {
            Some(Self { channel, note })
        } else {
            None
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn note(&self) -> u8 {
        self.note
    }
}

impl fmt::Display for NoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.channel, self.note)
    }
}

/// One entry of a cue script: the notes to sound plus the comment block above them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueStep {
    notes: Vec<NoteRef>,
    comments: Vec<String>,
    raw_line: String,
    line: usize,
}

impl CueStep {
    /// Create a step. Returns `None` when `notes` is empty; a step always sounds something.
    pub fn new(notes: Vec<NoteRef>, comments: Vec<String>, raw_line: impl Into<String>) -> Option<Self> {
        if notes.is_empty() {
            return None;
        }
        Some(Self {
            notes,
            comments,
            raw_line: raw_line.into(),
            line: 0,
        })
    }

    /// Record the 1-based source line the step came from.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Notes in the order they were written, duplicates included.
    pub fn notes(&self) -> &[NoteRef] {
        &self.notes
    }

    /// Comment and blank lines that preceded the note line, verbatim.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// The trimmed source line this step was parsed from.
    pub fn raw_line(&self) -> &str {
        &self.raw_line
    }

    /// 1-based source line of the note line, or 0 if the step was built by hand.
    pub fn line(&self) -> usize {
        self.line
    }
}

/// The ordered steps produced by one parse of a script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueScript {
    steps: Vec<CueStep>,
}

impl CueScript {
    pub fn new(steps: Vec<CueStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[CueStep] {
        &self.steps
    }

    pub fn get(&self, idx: usize) -> Option<&CueStep> {
        self.steps.get(idx)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CueStep> {
        self.steps.iter()
    }
}

impl Index<usize> for CueScript {
    type Output = CueStep;

    fn index(&self, idx: usize) -> &CueStep {
        &self.steps[idx]
    }
}

impl From<Vec<CueStep>> for CueScript {
    fn from(steps: Vec<CueStep>) -> Self {
        Self::new(steps)
    }
}
