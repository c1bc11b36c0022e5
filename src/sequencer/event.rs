//! Note events and navigation results handed to the transport.

use crate::cue::NoteRef;

/// A single note message to transmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    Off(NoteRef),
    On(NoteRef),
}

impl NoteEvent {
    pub fn note_ref(&self) -> NoteRef {
        match *self {
            NoteEvent::Off(n) | NoteEvent::On(n) => n,
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, NoteEvent::On(_))
    }
}

/// What a navigation call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStatus {
    /// The sequencer moved to this step index.
    Moved(usize),
    /// `retreat` with nothing before the current step.
    AtStart,
    /// `advance` with nothing after the current step.
    AtEnd,
    /// `reset` on an empty script: everything released, nothing selected.
    NoStep,
}

/// Status plus the ordered events to emit: every off first, then every on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub status: NavStatus,
    pub events: Vec<NoteEvent>,
}

impl Emission {
    pub(crate) fn unmoved(status: NavStatus) -> Self {
        Self {
            status,
            events: Vec::new(),
        }
    }

    pub(crate) fn swap(status: NavStatus, released: &[NoteRef], sounded: &[NoteRef]) -> Self {
        let events = released
            .iter()
            .copied()
            .map(NoteEvent::Off)
            .chain(sounded.iter().copied().map(NoteEvent::On))
            .collect();
        Self { status, events }
    }

    pub fn moved(&self) -> bool {
        matches!(self.status, NavStatus::Moved(_))
    }

    pub fn note_offs(&self) -> impl Iterator<Item = NoteRef> + '_ {
        self.events
            .iter()
            .filter(|e| !e.is_on())
            .map(NoteEvent::note_ref)
    }

    pub fn note_ons(&self) -> impl Iterator<Item = NoteRef> + '_ {
        self.events
            .iter()
            .filter(|e| e.is_on())
            .map(NoteEvent::note_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(channel: u8, note: u8) -> NoteRef {
        NoteRef::new(channel, note).unwrap()
    }

    #[test]
    fn swap_orders_offs_before_ons() {
        let e = Emission::swap(NavStatus::Moved(1), &[n(0, 60), n(0, 64)], &[n(1, 67)]);
        assert_eq!(
            e.events,
            vec![
                NoteEvent::Off(n(0, 60)),
                NoteEvent::Off(n(0, 64)),
                NoteEvent::On(n(1, 67)),
            ]
        );
        assert!(e.moved());
    }

    #[test]
    fn phase_iterators() {
        let e = Emission::swap(NavStatus::Moved(0), &[n(2, 2)], &[n(3, 3), n(4, 4)]);
        assert_eq!(e.note_offs().collect::<Vec<_>>(), vec![n(2, 2)]);
        assert_eq!(e.note_ons().collect::<Vec<_>>(), vec![n(3, 3), n(4, 4)]);
    }

    #[test]
    fn unmoved_has_no_events() {
        let e = Emission::unmoved(NavStatus::AtEnd);
        assert!(!e.moved());
        assert!(e.events.is_empty());
    }
}
