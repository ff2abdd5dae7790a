//! Crate error type.
//!
//! Every fallible operation returns [`Result`]. Failures are surfaced to the
//! immediate caller; the only swallowed failure is the best-effort
//! zero-vibration command issued by [`XInputPad::reset`](crate::xinput::XInputPad::reset).

use thiserror::Error;

/// Errors reported by devices, the device directory and config loading.
#[derive(Debug, Error)]
pub enum InputError {
    /// The device could not be opened (absent, access denied, driver refused).
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The device opened but its capabilities do not describe a gamepad or joystick.
    #[error("device {0} is not a game controller")]
    NotGameController(String),

    /// The device was not present (or could not be reacquired) during `prepare()`.
    ///
    /// Recoverable: the next `prepare()` polls again.
    #[error("device disconnected")]
    Disconnected,

    /// The platform enumeration service failed; no partial list is produced.
    #[error("device enumeration failed: {0}")]
    Enumeration(String),

    /// A vibration command was rejected by the device.
    #[error("actuation command failed")]
    Actuation,

    /// A config file could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InputError>;
