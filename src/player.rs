//! Player: the host-side loop around the sequencer.
//!
//! Re-parses the script text before every move (cached, so unchanged text is
//! not parsed twice), rebinds the sequencer, navigates, and hands the
//! resulting events to the note sink.

use std::io;

use crate::cue::{CueScript, ScriptCache};
use crate::midi::NoteSink;
use crate::sequencer::{CueSequencer, Emission, NavStatus, NoteEvent};

/// Operator navigation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Advance,
    Retreat,
    Reset,
}

pub struct Player {
    sequencer: CueSequencer,
    cache: ScriptCache,
    /// Latest parsed script that the sequencer has not accepted yet.
    pending: Option<CueScript>,
    sink: Option<Box<dyn NoteSink>>,
    diagnostics: usize,
    last_send_error: Option<String>,
}

impl Player {
    pub fn new(sink: Option<Box<dyn NoteSink>>) -> Self {
        Self {
            sequencer: CueSequencer::default(),
            cache: ScriptCache::new(),
            pending: None,
            sink,
            diagnostics: 0,
            last_send_error: None,
        }
    }

    pub fn sequencer(&self) -> &CueSequencer {
        &self.sequencer
    }

    /// Name of the output, or `None` when running without MIDI.
    pub fn sink_name(&self) -> Option<&str> {
        self.sink.as_deref().map(|s| s.name())
    }

    /// Diagnostics raised by the most recent parse.
    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics
    }

    /// Whether the sequencer is still on an older version of the script.
    pub fn has_pending_script(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_send_error(&self) -> Option<&str> {
        self.last_send_error.as_deref()
    }

    /// Bring the sequencer's script up to date with `text` where possible.
    pub fn sync(&mut self, text: &str) {
        if self.cache.is_stale(text) {
            let parsed = self.cache.get(text);
            self.diagnostics = parsed.diagnostics.len();
            self.pending = Some(parsed.script.clone());
        }
        if let Some(script) = self.pending.take() {
            match self.sequencer.rebind(script.clone()) {
                Ok(()) => {}
                Err(e) => {
                    log::warn!("{e}; still on the previous script until reset");
                    self.pending = Some(script);
                }
            }
        }
    }

    /// Re-parse `text`, move, and transmit the result.
    pub fn navigate(&mut self, nav: Navigation, text: &str) -> Emission {
        self.sync(text);

        let emission = match nav {
            Navigation::Advance => self.sequencer.advance(),
            Navigation::Retreat => self.sequencer.retreat(),
            Navigation::Reset => match self.pending.take() {
                // The edited script is too short for the old position: start over on it.
                Some(script) => {
                    let released = self.sequencer.load(script);
                    let mut emission = self.sequencer.reset();
                    let mut events = released.events;
                    events.append(&mut emission.events);
                    emission.events = events;
                    emission
                }
                None => self.sequencer.reset(),
            },
        };

        match emission.status {
            NavStatus::Moved(_) => {
                let notes = self.sequencer.sounding_notes();
                log::info!(
                    "Played notes: {:?} on channels: {:?}",
                    notes.iter().map(|n| n.note()).collect::<Vec<_>>(),
                    notes.iter().map(|n| n.channel()).collect::<Vec<_>>()
                );
            }
            NavStatus::AtEnd => log::info!("Reached the end of the notes."),
            NavStatus::AtStart => log::info!("Already at the beginning of the notes."),
            NavStatus::NoStep => log::info!("No notes to play."),
        }

        self.transmit(&emission.events);
        emission
    }

    /// Send note-offs for whatever is still sounding. Used on shutdown; the
    /// sequencer's own state is left alone.
    pub fn release(&mut self) -> io::Result<()> {
        let offs: Vec<NoteEvent> = self
            .sequencer
            .sounding_notes()
            .iter()
            .copied()
            .map(NoteEvent::Off)
            .collect();
        match self.sink {
            Some(ref mut sink) if !offs.is_empty() => sink.send(&offs),
            _ => Ok(()),
        }
    }

    fn transmit(&mut self, events: &[NoteEvent]) {
        if events.is_empty() {
            return;
        }
        let Some(ref mut sink) = self.sink else {
            return;
        };
        match sink.send(events) {
            Ok(()) => self.last_send_error = None,
            Err(e) => {
                log::error!("MIDI output failed: {e}");
                self.last_send_error = Some(e.to_string());
            }
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(None)
    }
}
