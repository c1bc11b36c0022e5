//! MIDI output configuration: port selection, velocities, and note hold time.

use serde::{Deserialize, Serialize};

/// Name used for the virtual port and as the client name.
pub const DEFAULT_PORT_NAME: &str = "CueLab Free";

/// How notes leave the program. Lives under `midi:` in ~/.cuelab/config.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiOutputConfig {
    /// Name of the port we create (virtual) or announce as.
    #[serde(default = "default_port_name")]
    pub port_name: String,
    /// Create a virtual output port other software can connect to (unix only).
    #[serde(default = "default_true")]
    pub virtual_port: bool,
    /// Connect to an existing output whose name contains this. Overrides `virtual_port`.
    #[serde(default)]
    pub device_name: Option<String>,
    /// Note-on velocity.
    #[serde(default = "default_velocity")]
    pub velocity: u8,
    /// Note-off (release) velocity.
    #[serde(default = "default_release_velocity")]
    pub release_velocity: u8,
    /// How long to hold after the on-phase before returning, in milliseconds.
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
}

fn default_port_name() -> String {
    DEFAULT_PORT_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_velocity() -> u8 {
    127
}

fn default_release_velocity() -> u8 {
    64
}

fn default_hold_ms() -> u64 {
    100
}

impl Default for MidiOutputConfig {
    fn default() -> Self {
        Self {
            port_name: default_port_name(),
            virtual_port: true,
            device_name: None,
            velocity: default_velocity(),
            release_velocity: default_release_velocity(),
            hold_ms: default_hold_ms(),
        }
    }
}
