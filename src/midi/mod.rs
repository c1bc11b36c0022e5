//! MIDI transport: turns note events into bytes on an output port.

pub mod config;
pub mod message;
pub mod output;

pub use config::MidiOutputConfig;
pub use output::{LogSink, MidiOutput, NoteSink};
