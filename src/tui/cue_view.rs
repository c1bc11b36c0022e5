//! Cue view: text for the previous / current / next panels.

use crate::cue::CueStep;
use crate::sequencer::CueSequencer;

const NOTHING_SELECTED: &str = "No note selected.";
const NO_PREVIOUS: &str = "-";
const NO_NEXT: &str = "None";

/// Panel text, derived from the sequencer on every draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueView {
    pub previous: String,
    pub current: String,
    pub next: String,
    /// 1-based index of the current step.
    pub position: Option<usize>,
}

/// A step's comment block followed by its note line.
pub fn step_text(step: &CueStep) -> String {
    let mut lines: Vec<&str> = step.comments().iter().map(String::as_str).collect();
    lines.push(step.raw_line());
    lines.join("\n")
}

impl CueView {
    pub fn from_sequencer(seq: &CueSequencer) -> Self {
        let Some(current) = seq.current_step() else {
            return Self {
                previous: String::new(),
                current: NOTHING_SELECTED.to_string(),
                next: String::new(),
                position: None,
            };
        };
        Self {
            previous: seq
                .previous_step()
                .map_or_else(|| NO_PREVIOUS.to_string(), step_text),
            current: step_text(current),
            next: seq.next_step().map_or_else(|| NO_NEXT.to_string(), step_text),
            position: seq.current_index().map(|i| i + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::parse;

    fn seq(text: &str) -> CueSequencer {
        CueSequencer::new(parse(text).script)
    }

    #[test]
    fn nothing_selected() {
        let view = CueView::from_sequencer(&seq("0,60"));
        assert_eq!(view.current, "No note selected.");
        assert!(view.previous.is_empty());
        assert!(view.next.is_empty());
        assert_eq!(view.position, None);
    }

    #[test]
    fn first_step_has_dash_before() {
        let mut s = seq("# house lights\n0,60\n0,61");
        s.reset();
        let view = CueView::from_sequencer(&s);
        assert_eq!(view.previous, "-");
        assert_eq!(view.current, "# house lights\n0,60");
        assert_eq!(view.next, "0,61");
        assert_eq!(view.position, Some(1));
    }

    #[test]
    fn last_step_has_none_after() {
        let mut s = seq("0,60\n\n# blackout\n0,61");
        s.reset();
        s.advance();
        let view = CueView::from_sequencer(&s);
        assert_eq!(view.previous, "0,60");
        assert_eq!(view.current, "\n# blackout\n0,61");
        assert_eq!(view.next, "None");
    }
}
