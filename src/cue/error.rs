//! Parse diagnostics for cue scripts. None of these are fatal.

use std::fmt;

/// A problem found while parsing one line or note group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based source line.
    pub line: usize,
    /// The offending text: the trimmed group, or the whole line for `EmptyStep`.
    pub text: String,
    pub kind: DiagnosticKind,
}

/// Which half of a `channel,note` group failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Channel,
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Group did not split into exactly two comma-separated components.
    MalformedGroup { components: usize },
    /// A component was not an integer.
    NonNumeric,
    /// An integer outside its MIDI range, as written (it may not fit any machine integer).
    OutOfRange { field: NoteField, value: String },
    /// A note line where every group was dropped.
    EmptyStep,
}

impl Diagnostic {
    pub fn malformed(line: usize, text: impl Into<String>, components: usize) -> Self {
        Self {
            line,
            text: text.into(),
            kind: DiagnosticKind::MalformedGroup { components },
        }
    }

    pub fn non_numeric(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
            kind: DiagnosticKind::NonNumeric,
        }
    }

    pub fn out_of_range(
        line: usize,
        text: impl Into<String>,
        field: NoteField,
        value: impl Into<String>,
    ) -> Self {
        Self {
            line,
            text: text.into(),
            kind: DiagnosticKind::OutOfRange {
                field,
                value: value.into(),
            },
        }
    }

    pub fn empty_step(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
            kind: DiagnosticKind::EmptyStep,
        }
    }
}

impl fmt::Display for NoteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteField::Channel => write!(f, "channel"),
            NoteField::Note => write!(f, "note"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::MalformedGroup { components } => write!(
                f,
                "[line {}] malformed group '{}': expected 2 fields, found {}",
                self.line, self.text, components
            ),
            DiagnosticKind::NonNumeric => {
                write!(f, "[line {}] invalid numbers in '{}'", self.line, self.text)
            }
            DiagnosticKind::OutOfRange { field, value } => write!(
                f,
                "[line {}] invalid {} number '{}' in '{}'",
                self.line, field, value, self.text
            ),
            DiagnosticKind::EmptyStep => write!(
                f,
                "[line {}] no valid notes in '{}', line skipped",
                self.line, self.text
            ),
        }
    }
}

impl std::error::Error for Diagnostic {}
