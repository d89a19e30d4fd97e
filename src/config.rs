//! Playback configuration and crate-wide constants
//!
//! [`PlaybackOptions`] is the one user-tunable knob set: it feeds the
//! [`InstructionGenerator`](crate::animation::InstructionGenerator) timing defaults
//! and the [`Timeline`](crate::animation::timeline::Timeline) speed/loop state.
//! Every field has a default, so a partial JSON document is enough:
//!
//! ```json
//! { "speed": 2.0, "looping": true }
//! ```

use crate::animation::Easing;
use serde::{Deserialize, Serialize};

/// Default duration of one animation instruction, in milliseconds
pub const DEFAULT_DURATION_MS: u64 = 300;

/// Default bucket count for a new hash table
pub const DEFAULT_HASH_CAPACITY: usize = 16;

/// Load factor above which the hash table doubles and rehashes
pub const MAX_LOAD_FACTOR: f64 = 0.75;

/// Default capacity for bounded stacks and queues
pub const DEFAULT_MAX_SIZE: usize = 1000;

/// Playback speed limits (multiplier on instruction duration)
pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 4.0;

/// Default number of snapshots a trace will hold
pub const DEFAULT_TRACE_LIMIT: usize = 10_000;

/// Playback settings shared by the instruction generator and the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaybackOptions {
    pub speed: f64,
    pub looping: bool,
    pub duration_ms: u64,
    pub delay_ms: u64,
    pub easing: Easing,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        PlaybackOptions {
            speed: 1.0,
            looping: false,
            duration_ms: DEFAULT_DURATION_MS,
            delay_ms: 0,
            easing: Easing::default(),
        }
    }
}

impl PlaybackOptions {
    /// Parse options from a JSON document; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
