//! GameInput controller list.
//!
//! The newer platform input stack reports controllers through a blocking
//! enumeration filtered by device kind. [`GameInputDevices`] keeps the list of
//! connected controllers, gamepads and arcade sticks, replaced wholesale on
//! every [`refresh`](GameInputDevices::refresh).
//!
//! The same physical pad is usually visible here and to the legacy stack.
//! When both lists are shown, prefer this one and drop legacy entries for
//! which [`GameInputDevices::covers`] is true.

use bitflags::bitflags;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};
use crate::metadata::DeviceMeta;

bitflags! {
    /// Device kinds, numbered as the platform numbers them.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct GameInputKind: u32 {
        const CONTROLLER = 0x0000_000E;
        const KEYBOARD = 0x0000_0010;
        const MOUSE = 0x0000_0020;
        const ARCADE_STICK = 0x0001_0000;
        const FLIGHT_STICK = 0x0002_0000;
        const GAMEPAD = 0x0004_0000;
        const RACING_WHEEL = 0x0008_0000;
    }
}

/// Kinds collected by [`GameInputDevices::refresh`].
pub const CONTROLLER_KINDS: GameInputKind = GameInputKind::CONTROLLER
    .union(GameInputKind::GAMEPAD)
    .union(GameInputKind::ARCADE_STICK);

/// One enumerated GameInput device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInputDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub display_name: String,
    /// Free-form identification strings supplied by the driver.
    pub device_strings: String,
    pub kinds: GameInputKind,
    pub connected: bool,
}

/// Platform GameInput enumeration.
pub trait GameInputService {
    /// Blocking enumeration of connected devices matching any of `kinds`.
    fn enumerate(&mut self, kinds: GameInputKind) -> Result<Vec<GameInputDeviceInfo>>;
}

pub struct GameInputDevices {
    service: Box<dyn GameInputService>,
    devices: Vec<GameInputDeviceInfo>,
}

impl GameInputDevices {
    pub fn new(service: Box<dyn GameInputService>) -> Self {
        Self {
            service,
            devices: Vec::new(),
        }
    }

    /// Create and enumerate once.
    pub fn discover(service: Box<dyn GameInputService>) -> Result<Self> {
        let mut list = Self::new(service);
        list.refresh()?;
        Ok(list)
    }

    /// Re-enumerate and replace the list.
    ///
    /// On failure the previous list is kept and the error is returned.
    pub fn refresh(&mut self) -> Result<()> {
        let found = self.service.enumerate(CONTROLLER_KINDS).map_err(|e| {
            warn!("gameinput enumeration failed: {e}");
            match e {
                InputError::Enumeration(_) => e,
                other => InputError::Enumeration(other.to_string()),
            }
        })?;

        self.devices = found
            .into_iter()
            .filter(|d| d.connected && d.kinds.intersects(CONTROLLER_KINDS))
            .collect();
        debug!("enumerated {} gameinput controller(s)", self.devices.len());
        Ok(())
    }

    pub fn devices(&self) -> &[GameInputDeviceInfo] {
        &self.devices
    }

    /// Is the legacy record `meta` the same model as a listed device?
    pub fn covers(&self, meta: &DeviceMeta) -> bool {
        let (vid, pid) = meta.product.vid_pid();
        self.devices
            .iter()
            .any(|d| d.vendor_id == vid && d.product_id == pid)
    }

    pub fn report_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.devices)?)
    }
}
