//! MIDI output: sends sequencer emissions to a port via midir.

use std::io;
use std::thread;
use std::time::Duration;

use midir::{MidiOutput as MidirOutput, MidiOutputConnection};

use super::config::MidiOutputConfig;
use super::message::encode;
use crate::sequencer::NoteEvent;

/// Anything that can transmit an ordered batch of note events.
pub trait NoteSink {
    /// Send `events` in order. Offs precede ons; the sink must not reorder them.
    fn send(&mut self, events: &[NoteEvent]) -> io::Result<()>;

    /// Human-readable destination, for the status bar.
    fn name(&self) -> &str;
}

/// Active MIDI output connection.
pub struct MidiOutput {
    connection: MidiOutputConnection,
    port_name: String,
    velocity: u8,
    release_velocity: u8,
    hold: Duration,
}

impl MidiOutput {
    /// Open the output described by `config`.
    ///
    /// With `device_name` set, connects to the first port whose name contains it.
    /// Otherwise creates a virtual port on unix, or falls back to the first port.
    pub fn open(config: &MidiOutputConfig) -> io::Result<Self> {
        let midi_out = MidirOutput::new(&config.port_name)
            .map_err(|e| io::Error::other(format!("MIDI init: {e}")))?;

        let (connection, port_name) = match config.device_name {
            Some(ref filter) => connect_matching(midi_out, filter)?,
            None if config.virtual_port => create_virtual(midi_out, &config.port_name)?,
            None => connect_first(midi_out)?,
        };

        log::info!("MIDI output open: {port_name}");
        Ok(Self {
            connection,
            port_name,
            velocity: config.velocity,
            release_velocity: config.release_velocity,
            hold: Duration::from_millis(config.hold_ms),
        })
    }

    /// List all available MIDI output port names.
    pub fn list_ports() -> Vec<String> {
        let Ok(midi_out) = MidirOutput::new("cuelab-list") else {
            return Vec::new();
        };
        midi_out
            .ports()
            .iter()
            .filter_map(|p| midi_out.port_name(p).ok())
            .collect()
    }
}

impl NoteSink for MidiOutput {
    fn send(&mut self, events: &[NoteEvent]) -> io::Result<()> {
        for event in events {
            let bytes = encode(event, self.velocity, self.release_velocity);
            self.connection
                .send(&bytes)
                .map_err(|e| io::Error::other(format!("MIDI send: {e}")))?;
        }
        if !self.hold.is_zero() && events.iter().any(NoteEvent::is_on) {
            thread::sleep(self.hold);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.port_name
    }
}

fn connect_matching(
    midi_out: MidirOutput,
    filter: &str,
) -> io::Result<(MidiOutputConnection, String)> {
    let (port, name) = midi_out
        .ports()
        .into_iter()
        .find_map(|p| {
            let name = midi_out.port_name(&p).unwrap_or_default();
            name.contains(filter).then_some((p, name))
        })
        .ok_or_else(|| io::Error::other(format!("MIDI device matching '{filter}' not found")))?;
    let conn = midi_out
        .connect(&port, "cuelab-output")
        .map_err(|e| io::Error::other(format!("MIDI connect: {e}")))?;
    Ok((conn, name))
}

fn connect_first(midi_out: MidirOutput) -> io::Result<(MidiOutputConnection, String)> {
    let ports = midi_out.ports();
    let port = ports
        .first()
        .ok_or_else(|| io::Error::other("no MIDI output ports available"))?;
    let name = midi_out
        .port_name(port)
        .unwrap_or_else(|_| "unknown".to_string());
    let conn = midi_out
        .connect(port, "cuelab-output")
        .map_err(|e| io::Error::other(format!("MIDI connect: {e}")))?;
    Ok((conn, name))
}

#[cfg(unix)]
fn create_virtual(
    midi_out: MidirOutput,
    port_name: &str,
) -> io::Result<(MidiOutputConnection, String)> {
    use midir::os::unix::VirtualOutput;

    let conn = midi_out
        .create_virtual(port_name)
        .map_err(|e| io::Error::other(format!("MIDI virtual port: {e}")))?;
    Ok((conn, port_name.to_string()))
}

#[cfg(not(unix))]
fn create_virtual(
    midi_out: MidirOutput,
    _port_name: &str,
) -> io::Result<(MidiOutputConnection, String)> {
    log::warn!("virtual MIDI ports are not supported here, using the first output port");
    connect_first(midi_out)
}

/// A sink that only logs what it would send. Used for `--dry-run`.
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteSink for LogSink {
    fn send(&mut self, events: &[NoteEvent]) -> io::Result<()> {
        for event in events {
            let n = event.note_ref();
            let kind = if event.is_on() { "on " } else { "off" };
            log::info!("note {kind} ch {:>2} note {:>3}", n.channel(), n.note());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::NoteRef;

    #[test]
    fn list_ports_does_not_panic() {
        // May be empty in CI/test environments
        let _ = MidiOutput::list_ports();
    }

    #[test]
    fn log_sink_accepts_events() {
        let mut sink = LogSink::new();
        let n = NoteRef::new(0, 60).unwrap();
        assert!(sink.send(&[NoteEvent::Off(n), NoteEvent::On(n)]).is_ok());
        assert_eq!(sink.name(), "dry-run");
    }
}
