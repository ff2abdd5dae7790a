//! Analog thresholds loaded from TOML.
//!
//! Every field is optional in the file; missing fields take the XInput
//! defaults. Example:
//!
//! ```toml
//! left_thumb_deadzone = 7849
//! right_thumb_deadzone = 8689
//! trigger_threshold = 30
//! hysteresis = 0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::edge::AnalogGate;
use crate::error::Result;

pub const DEFAULT_LEFT_THUMB_DEADZONE: i16 = 7849;
pub const DEFAULT_RIGHT_THUMB_DEADZONE: i16 = 8689;
pub const DEFAULT_TRIGGER_THRESHOLD: u8 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub left_thumb_deadzone: i16,
    pub right_thumb_deadzone: i16,
    pub trigger_threshold: u8,
    /// Width of the band below each threshold that an already-outside value
    /// must drop through before its flag clears. `0` disables it.
    pub hysteresis: u16,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            left_thumb_deadzone: DEFAULT_LEFT_THUMB_DEADZONE,
            right_thumb_deadzone: DEFAULT_RIGHT_THUMB_DEADZONE,
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
            hysteresis: 0,
        }
    }
}

impl InputConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub(crate) fn left_stick_gate(&self) -> AnalogGate {
        self.gate(self.left_thumb_deadzone as i32)
    }

    pub(crate) fn right_stick_gate(&self) -> AnalogGate {
        self.gate(self.right_thumb_deadzone as i32)
    }

    pub(crate) fn trigger_gate(&self) -> AnalogGate {
        self.gate(self.trigger_threshold as i32)
    }

    fn gate(&self, threshold: i32) -> AnalogGate {
        AnalogGate::with_hysteresis(threshold, self.hysteresis as i32)
    }
}
