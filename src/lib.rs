//! CueLab: a terminal cue player that steps through a text script of MIDI notes.

pub mod config;
pub mod control;
pub mod cue;
pub mod logging;
pub mod midi;
pub mod player;
pub mod sequencer;
pub mod storage;
pub mod tui;
