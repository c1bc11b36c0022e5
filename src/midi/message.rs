//! Raw MIDI encoding for note events.
//!
//! - Note On:  [0x90 | channel, note, velocity]
//! - Note Off: [0x80 | channel, note, velocity]

use crate::sequencer::NoteEvent;

const NOTE_ON: u8 = 0x90;
const NOTE_OFF: u8 = 0x80;

/// Encode one event. Velocities are masked to 7 bits.
pub fn encode(event: &NoteEvent, velocity: u8, release_velocity: u8) -> [u8; 3] {
    let (status, vel) = match event {
        NoteEvent::On(_) => (NOTE_ON, velocity),
        NoteEvent::Off(_) => (NOTE_OFF, release_velocity),
    };
    let n = event.note_ref();
    [status | n.channel(), n.note(), vel & 0x7F]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::NoteRef;

    #[test]
    fn note_on_bytes() {
        let e = NoteEvent::On(NoteRef::new(2, 60).unwrap());
        assert_eq!(encode(&e, 127, 64), [0x92, 60, 127]);
    }

    #[test]
    fn note_off_bytes() {
        let e = NoteEvent::Off(NoteRef::new(15, 127).unwrap());
        assert_eq!(encode(&e, 127, 64), [0x8F, 127, 64]);
    }

    #[test]
    fn velocity_masked() {
        let e = NoteEvent::On(NoteRef::new(0, 1).unwrap());
        assert_eq!(encode(&e, 200, 0)[2], 200 & 0x7F);
    }
}
