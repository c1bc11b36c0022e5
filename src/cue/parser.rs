//! Cue script parser: line-oriented text to [`CueScript`].
//!
//! Never fails. Bad groups are dropped with a [`Diagnostic`], lines with no
//! surviving groups produce no step, and their comment block moves on to the
//! next step that does parse.

use std::num::{IntErrorKind, ParseIntError};

use super::error::{Diagnostic, NoteField};
use super::{CueScript, CueStep, NoteRef, MAX_CHANNEL, MAX_NOTE};

const GROUP_SEPARATOR: char = ';';
const FIELD_SEPARATOR: char = ',';
const COMMENT_PREFIX: char = '#';

/// Result of a parse: the script plus every diagnostic raised, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub script: CueScript,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse script text, collecting diagnostics.
pub fn parse(text: &str) -> Parsed {
    let mut diagnostics = Vec::new();
    let script = parse_with(text, |d| diagnostics.push(d.clone()));
    Parsed {
        script,
        diagnostics,
    }
}

/// Parse script text, reporting each diagnostic through `on_diagnostic` as it is found.
pub fn parse_with<F>(text: &str, mut on_diagnostic: F) -> CueScript
where
    F: FnMut(&Diagnostic),
{
    let mut report = |d: Diagnostic| {
        log::warn!("{d}");
        on_diagnostic(&d);
    };

    let mut steps = Vec::new();
    let mut pending_comments: Vec<String> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if is_comment(line) {
            pending_comments.push(raw.to_string());
            continue;
        }

        let notes: Vec<NoteRef> = line
            .split(GROUP_SEPARATOR)
            .filter_map(|group| parse_group(group, line_no, &mut report))
            .collect();

        if notes.is_empty() {
            report(Diagnostic::empty_step(line_no, line));
            continue;
        }

        let comments = std::mem::take(&mut pending_comments);
        steps.extend(CueStep::new(notes, comments, line).map(|s| s.at_line(line_no)));
    }

    if !pending_comments.is_empty() {
        log::debug!(
            "{} trailing comment line(s) have no following step",
            pending_comments.len()
        );
    }

    CueScript::new(steps)
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX)
}

/// Parse one `channel,note` group. Reports and returns `None` on any failure.
fn parse_group<R>(group: &str, line_no: usize, report: &mut R) -> Option<NoteRef>
where
    R: FnMut(Diagnostic),
{
    let group = group.trim();
    let parts: Vec<&str> = group.split(FIELD_SEPARATOR).collect();
    if parts.len() != 2 {
        report(Diagnostic::malformed(line_no, group, parts.len()));
        return None;
    }

    let (channel_text, note_text) = (parts[0].trim(), parts[1].trim());
    let (Ok(channel), Ok(note)) = (parse_int(channel_text), parse_int(note_text)) else {
        report(Diagnostic::non_numeric(line_no, group));
        return None;
    };

    let Some(channel) = in_range(channel, MAX_CHANNEL) else {
        report(Diagnostic::out_of_range(line_no, group, NoteField::Channel, channel_text));
        return None;
    };
    let Some(note) = in_range(note, MAX_NOTE) else {
        report(Diagnostic::out_of_range(line_no, group, NoteField::Note, note_text));
        return None;
    };

    NoteRef::new(channel, note)
}

/// Parse an integer of any size. `Ok(None)` means it is a valid integer that
/// does not fit in an `i64`, which is out of range rather than non-numeric.
fn parse_int(text: &str) -> Result<Option<i64>, ParseIntError> {
    match text.parse::<i64>() {
        Ok(value) => Ok(Some(value)),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn in_range(value: Option<i64>, max: u8) -> Option<u8> {
    value
        .filter(|v| (0..=i64::from(max)).contains(v))
        .and_then(|v| u8::try_from(v).ok())
}
