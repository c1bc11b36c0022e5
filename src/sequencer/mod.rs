//! Cue sequencer: navigation over a [`CueScript`] and the note lifecycle.
//!
//! Each move releases everything currently sounding before starting the new
//! step's notes. The sequencer only computes events; sending them is the
//! transport's job.

pub mod event;

pub use event::{Emission, NavStatus, NoteEvent};

use std::fmt;

use crate::cue::{CueScript, CueStep, NoteRef};

/// Navigation position and the notes left sounding by the last move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencerState {
    current_index: Option<usize>,
    sounding_notes: Vec<NoteRef>,
}

impl SequencerState {
    /// `None` until the first step has been played.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn sounding_notes(&self) -> &[NoteRef] {
        &self.sounding_notes
    }
}

/// A rebind that would leave the current position past the end of the new script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebindError {
    /// Minimum number of steps the new script needed.
    pub required: usize,
    /// Steps the rejected script actually had.
    pub available: usize,
}

impl fmt::Display for RebindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rebind rejected: position needs {} step(s), new script has {}",
            self.required, self.available
        )
    }
}

impl std::error::Error for RebindError {}

/// Steps through a cue script, one operator action at a time.
#[derive(Debug, Clone, Default)]
pub struct CueSequencer {
    script: CueScript,
    state: SequencerState,
}

impl CueSequencer {
    pub fn new(script: CueScript) -> Self {
        Self {
            script,
            state: SequencerState::default(),
        }
    }

    pub fn script(&self) -> &CueScript {
        &self.script
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index
    }

    pub fn sounding_notes(&self) -> &[NoteRef] {
        &self.state.sounding_notes
    }

    /// The selected step, if any. Never emits.
    pub fn current_step(&self) -> Option<&CueStep> {
        self.state.current_index.and_then(|i| self.script.get(i))
    }

    /// The step before the current one.
    pub fn previous_step(&self) -> Option<&CueStep> {
        let idx = self.state.current_index?.checked_sub(1)?;
        self.script.get(idx)
    }

    /// The step after the current one. With nothing selected there is no "next".
    pub fn next_step(&self) -> Option<&CueStep> {
        self.script.get(self.state.current_index? + 1)
    }

    /// Jump to the first step, or release everything if the script is empty.
    pub fn reset(&mut self) -> Emission {
        if self.script.is_empty() {
            let released = std::mem::take(&mut self.state.sounding_notes);
            self.state.current_index = None;
            log::debug!("reset on empty script, released {} note(s)", released.len());
            return Emission::swap(NavStatus::NoStep, &released, &[]);
        }
        self.move_to(0)
    }

    /// Move to the next step. At the last step (or on an empty script) nothing changes.
    pub fn advance(&mut self) -> Emission {
        let target = self.state.current_index.map_or(0, |i| i + 1);
        if target >= self.script.len() {
            log::debug!("advance: already at the end");
            return Emission::unmoved(NavStatus::AtEnd);
        }
        self.move_to(target)
    }

    /// Move to the previous step. Index 0 is the floor; this never deselects.
    pub fn retreat(&mut self) -> Emission {
        match self.state.current_index {
            Some(i) if i > 0 => self.move_to(i - 1),
            _ => {
                log::debug!("retreat: already at the beginning");
                Emission::unmoved(NavStatus::AtStart)
            }
        }
    }

    /// Swap in a freshly parsed script, keeping position and sounding notes.
    pub fn rebind(&mut self, script: CueScript) -> Result<(), RebindError> {
        let required = self.state.current_index.map_or(0, |i| i + 1);
        if script.len() < required {
            return Err(RebindError {
                required,
                available: script.len(),
            });
        }
        self.script = script;
        Ok(())
    }

    /// Release everything, install `script` and deselect. Unlike `rebind` this
    /// accepts any script; the next `reset` or `advance` starts from its first step.
    pub fn load(&mut self, script: CueScript) -> Emission {
        let released = std::mem::take(&mut self.state.sounding_notes);
        self.state.current_index = None;
        self.script = script;
        Emission::swap(NavStatus::NoStep, &released, &[])
    }

    fn move_to(&mut self, idx: usize) -> Emission {
        let notes = self.script[idx].notes().to_vec();
        let released = std::mem::replace(&mut self.state.sounding_notes, notes);
        self.state.current_index = Some(idx);
        log::debug!(
            "step {} of {}: off {} / on {}",
            idx + 1,
            self.script.len(),
            released.len(),
            self.state.sounding_notes.len()
        );
        Emission::swap(NavStatus::Moved(idx), &released, &self.state.sounding_notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::parse;

    fn n(channel: u8, note: u8) -> NoteRef {
        NoteRef::new(channel, note).unwrap()
    }

    fn seq(text: &str) -> CueSequencer {
        CueSequencer::new(parse(text).script)
    }

    #[test]
    fn starts_with_nothing_selected() {
        let s = seq("0,60");
        assert_eq!(s.current_index(), None);
        assert!(s.current_step().is_none());
        assert!(s.sounding_notes().is_empty());
    }

    #[test]
    fn reset_then_advance_phases() {
        let mut s = seq("0,60\n1,64;1,67");
        let e = s.reset();
        assert_eq!(e.status, NavStatus::Moved(0));
        assert_eq!(e.events, vec![NoteEvent::On(n(0, 60))]);

        let e = s.advance();
        assert_eq!(e.status, NavStatus::Moved(1));
        assert_eq!(
            e.events,
            vec![
                NoteEvent::Off(n(0, 60)),
                NoteEvent::On(n(1, 64)),
                NoteEvent::On(n(1, 67)),
            ]
        );
        assert_eq!(s.sounding_notes(), &[n(1, 64), n(1, 67)]);
    }

    #[test]
    fn advance_from_unselected_plays_first_step() {
        let mut s = seq("0,60\n0,61");
        assert_eq!(s.advance().status, NavStatus::Moved(0));
    }

    #[test]
    fn advance_at_end_is_noop() {
        let mut s = seq("0,60\n0,61");
        s.reset();
        s.advance();
        let before = s.state().clone();
        let e = s.advance();
        assert_eq!(e.status, NavStatus::AtEnd);
        assert!(e.events.is_empty());
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn retreat_at_zero_is_noop() {
        let mut s = seq("0,60\n0,61");
        s.reset();
        let e = s.retreat();
        assert_eq!(e.status, NavStatus::AtStart);
        assert!(e.events.is_empty());
        assert_eq!(s.current_index(), Some(0));
        assert_eq!(s.sounding_notes(), &[n(0, 60)]);
    }

    #[test]
    fn retreat_before_first_play() {
        let mut s = seq("0,60");
        assert_eq!(s.retreat().status, NavStatus::AtStart);
        assert_eq!(s.current_index(), None);
    }

    #[test]
    fn round_trip_restores_notes() {
        let mut s = seq("0,60\n1,61;1,62\n2,63");
        s.reset();
        s.advance();
        let before = s.sounding_notes().to_vec();
        s.advance();
        let e = s.retreat();
        assert_eq!(e.note_offs().collect::<Vec<_>>(), vec![n(2, 63)]);
        assert_eq!(s.sounding_notes(), before.as_slice());
    }

    #[test]
    fn reset_from_anywhere_returns_to_zero() {
        let mut s = seq("0,1\n0,2\n0,3");
        s.reset();
        s.advance();
        s.advance();
        let e = s.reset();
        assert_eq!(e.status, NavStatus::Moved(0));
        assert_eq!(
            e.events,
            vec![NoteEvent::Off(n(0, 3)), NoteEvent::On(n(0, 1))]
        );
    }

    #[test]
    fn reset_replays_current_step() {
        let mut s = seq("0,1");
        s.reset();
        let e = s.reset();
        assert_eq!(
            e.events,
            vec![NoteEvent::Off(n(0, 1)), NoteEvent::On(n(0, 1))]
        );
    }

    #[test]
    fn empty_script_boundaries() {
        let mut s = seq("# nothing");
        assert_eq!(s.reset().status, NavStatus::NoStep);
        assert_eq!(s.advance().status, NavStatus::AtEnd);
        assert_eq!(s.retreat().status, NavStatus::AtStart);
        assert_eq!(s.current_index(), None);
    }

    #[test]
    fn reset_on_emptied_script_releases_notes() {
        let mut s = seq("0,60;0,64");
        s.reset();
        s.force_script(CueScript::default());
        let e = s.reset();
        assert_eq!(e.status, NavStatus::NoStep);
        assert_eq!(
            e.events,
            vec![NoteEvent::Off(n(0, 60)), NoteEvent::Off(n(0, 64))]
        );
        assert!(s.sounding_notes().is_empty());
        assert_eq!(s.current_index(), None);
    }

    #[test]
    fn current_step_query_does_not_emit() {
        let mut s = seq("0,60\n0,61");
        s.reset();
        let before = s.state().clone();
        assert_eq!(s.current_step().unwrap().raw_line(), "0,60");
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn neighbours() {
        let mut s = seq("0,1\n0,2\n0,3");
        assert!(s.next_step().is_none());
        s.reset();
        assert!(s.previous_step().is_none());
        assert_eq!(s.next_step().unwrap().raw_line(), "0,2");
        s.advance();
        s.advance();
        assert_eq!(s.previous_step().unwrap().raw_line(), "0,2");
        assert!(s.next_step().is_none());
    }

    #[test]
    fn rebind_keeps_position_and_sounding() {
        let mut s = seq("0,1\n0,2");
        s.reset();
        s.advance();
        s.rebind(parse("0,10\n0,20\n0,30").script).unwrap();
        assert_eq!(s.current_index(), Some(1));
        assert_eq!(s.sounding_notes(), &[n(0, 2)]);
        let e = s.advance();
        assert_eq!(
            e.events,
            vec![NoteEvent::Off(n(0, 2)), NoteEvent::On(n(0, 30))]
        );
    }

    #[test]
    fn rebind_shorter_than_position_rejected() {
        let mut s = seq("0,1\n0,2\n0,3");
        s.reset();
        s.advance();
        s.advance();
        let err = s.rebind(parse("0,9").script).unwrap_err();
        assert_eq!(
            err,
            RebindError {
                required: 3,
                available: 1
            }
        );
        assert_eq!(s.script().len(), 3);
        assert_eq!(s.current_index(), Some(2));
    }

    #[test]
    fn rebind_exactly_long_enough_accepted() {
        let mut s = seq("0,1\n0,2\n0,3");
        s.reset();
        s.advance();
        s.advance();
        s.rebind(parse("1,1\n1,2\n1,3").script).unwrap();
        assert_eq!(s.current_index(), Some(2));
        assert_eq!(s.sounding_notes(), &[n(0, 3)]);
        assert_eq!(s.current_step().map(|st| st.raw_line()), Some("1,3"));
        let e = s.advance();
        assert_eq!(e.status, NavStatus::AtEnd);
        assert!(e.events.is_empty());
        let e = s.retreat();
        assert_eq!(
            e.events,
            vec![NoteEvent::Off(n(0, 3)), NoteEvent::On(n(1, 2))]
        );
    }

    #[test]
    fn rebind_to_empty_allowed_when_unselected() {
        let mut s = seq("0,1");
        assert!(s.rebind(CueScript::default()).is_ok());
        assert!(s.script().is_empty());
    }

    #[test]
    fn load_releases_and_deselects() {
        let mut s = seq("0,1\n0,2\n0,3");
        s.reset();
        s.advance();
        let e = s.load(parse("0,9").script);
        assert_eq!(e.status, NavStatus::NoStep);
        assert_eq!(e.events, vec![NoteEvent::Off(n(0, 2))]);
        assert_eq!(s.current_index(), None);
        assert!(s.sounding_notes().is_empty());
        let e = s.reset();
        assert_eq!(e.events, vec![NoteEvent::On(n(0, 9))]);
    }

    impl CueSequencer {
        fn force_script(&mut self, script: CueScript) {
            self.script = script;
        }
    }
}
