//! Device identity and display metadata.
//!
//! [`DeviceMeta`] is a lightweight, cloneable record produced by the
//! controller enumeration service. A fresh list is collected on every
//! [`DeviceDirectory::refresh`](crate::directory::DeviceDirectory::refresh);
//! instance GUIDs may be reassigned by the platform across plug/unplug cycles,
//! so callers re-resolve identity after each refresh.
//!
//! ## Product GUID encoding
//! Legacy game controller stacks encode the USB vendor/product pair in the
//! first 32-bit field of the product GUID: `data1 = vid | pid << 16`.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }

    /// Product GUID for a vendor/product pair, as the legacy stack builds it.
    pub const fn from_vid_pid(vid: u16, pid: u16) -> Self {
        Self::new(pack_vid_pid(vid, pid), 0, 0, [0; 8])
    }

    /// `(vid, pid)` as encoded in `data1`.
    pub const fn vid_pid(&self) -> (u16, u16) {
        ((self.data1 & 0xFFFF) as u16, (self.data1 >> 16) as u16)
    }
}

/// `vid` in the low word, `pid` in the high word.
#[inline]
pub const fn pack_vid_pid(vid: u16, pid: u16) -> u32 {
    (vid as u32) | ((pid as u32) << 16)
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}}}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

/// Device category reported by the enumeration service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
    Gamepad,
    Joystick,
    Driving,
    Flight,
    Keyboard,
    Mouse,
    Other,
}

impl DeviceClass {
    /// Only gamepads and joysticks are surfaced by the directory.
    pub fn is_game_controller(self) -> bool {
        matches!(self, DeviceClass::Gamepad | DeviceClass::Joystick)
    }
}

/// One enumerated game controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// Per-connection identity. Not stable across reconnects.
    pub instance: Guid,
    /// Identifies the device model; encodes vid/pid (see module docs).
    pub product: Guid,
    /// User-facing name of this particular device.
    pub instance_name: String,
    /// User-facing name of the device model.
    pub product_name: String,
    pub class: DeviceClass,
}

impl fmt::Display for DeviceMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.instance_name, self.instance)
    }
}
