//! Game controller directory and cross-protocol identity matching.
//!
//! [`DeviceDirectory`] holds the list of legacy game controllers reported by a
//! [`ControllerService`]. The list is replaced wholesale on every
//! [`refresh`](DeviceDirectory::refresh); nothing is diffed or carried over.
//!
//! # Duplicate identities
//! An XInput controller is also visible to the legacy stack, so the same
//! physical pad shows up twice. The legacy record cannot tell on its own, but
//! the system's device instance ids can: XInput endpoints carry an `IG_`
//! interface-group tag next to their `VID_xxxx`/`PID_xxxx` pair.
//! [`is_duplicate_of_other_protocol`] matches that pair against the product
//! GUID.
//!
//! This is substring matching on an opaque string and can miss unusual
//! drivers. Anything that does not parse is treated as "not a duplicate", so
//! a miss shows a device twice rather than hiding one.
//!
//! ```
//! use edgeinput::backends::virtual_input::VirtualProperties;
//! use edgeinput::directory::is_duplicate_of_other_protocol;
//! use edgeinput::metadata::Guid;
//!
//! let mut props = VirtualProperties::new(["USB\\VID_045E&PID_028E&IG_00\\6&1"]);
//! assert!(is_duplicate_of_other_protocol(&Guid::from_vid_pid(0x045E, 0x028E), &mut props));
//! assert!(!is_duplicate_of_other_protocol(&Guid::from_vid_pid(0x044F, 0xB10A), &mut props));
//! ```

use log::{debug, trace, warn};

use crate::error::{InputError, Result};
use crate::joystick::{JoystickDevice, JoystickPad};
use crate::metadata::{pack_vid_pid, DeviceMeta, Guid};

/// Platform enumeration service for legacy game controllers.
pub trait ControllerService {
    /// Every attached device, of any class.
    fn enumerate(&mut self) -> Result<Vec<DeviceMeta>>;

    /// Open a device previously returned by `enumerate`.
    fn open(&mut self, meta: &DeviceMeta) -> Result<Box<dyn JoystickDevice>>;
}

/// Secondary device-property source used for duplicate detection.
pub trait PropertySource {
    /// Device instance ids, e.g. `USB\VID_045E&PID_028E&IG_00\6&1A2B&0&00`.
    fn device_ids(&mut self) -> Result<Vec<String>>;
}

const IG_TAG: &str = "IG_";

/// Parse `VID_xxxx` and `PID_xxxx` out of an `IG_`-tagged instance id.
///
/// Returns the pair packed as in a product GUID (`vid | pid << 16`), or
/// `None` if the id is untagged or either field is missing or not hex.
pub fn tagged_vid_pid(id: &str) -> Option<u32> {
    if !id.contains(IG_TAG) {
        return None;
    }
    let vid = hex_field(id, "VID_")?;
    let pid = hex_field(id, "PID_")?;
    Some(pack_vid_pid(vid, pid))
}

fn hex_field(id: &str, marker: &str) -> Option<u16> {
    let start = id.find(marker)? + marker.len();
    let digits: &str = &id[start..];
    let len = digits
        .bytes()
        .take(4)
        .take_while(u8::is_ascii_hexdigit)
        .count();
    if len == 0 {
        return None;
    }
    u16::from_str_radix(&digits[..len], 16).ok()
}

/// Does the secondary source report an XInput endpoint for the same
/// vendor/product as `product`?
///
/// Best effort. Queries the source on every call; caching is up to the caller.
pub fn is_duplicate_of_other_protocol(product: &Guid, props: &mut dyn PropertySource) -> bool {
    match props.device_ids() {
        Ok(ids) => matches_any(product, &ids),
        Err(e) => {
            debug!("device property query failed, assuming no duplicate: {e}");
            false
        }
    }
}

fn matches_any(product: &Guid, ids: &[String]) -> bool {
    ids.iter().any(|id| match tagged_vid_pid(id) {
        Some(packed) => packed == product.data1,
        None => {
            if id.contains(IG_TAG) {
                trace!("unparseable tagged device id {id:?}");
            }
            false
        }
    })
}

pub struct DeviceDirectory {
    service: Box<dyn ControllerService>,
    available: Vec<DeviceMeta>,
}

impl DeviceDirectory {
    /// Empty directory. Call [`refresh`](Self::refresh) to populate it.
    pub fn new(service: Box<dyn ControllerService>) -> Self {
        Self {
            service,
            available: Vec::new(),
        }
    }

    /// Create and enumerate once.
    pub fn discover(service: Box<dyn ControllerService>) -> Result<Self> {
        let mut dir = Self::new(service);
        dir.refresh()?;
        Ok(dir)
    }

    /// Re-enumerate and replace the list with every gamepad/joystick found.
    ///
    /// On failure the previous list is kept (it may be stale) and the error
    /// is returned; callers should retry later.
    pub fn refresh(&mut self) -> Result<()> {
        let found = self.service.enumerate().map_err(|e| {
            warn!("controller enumeration failed: {e}");
            match e {
                InputError::Enumeration(_) => e,
                other => InputError::Enumeration(other.to_string()),
            }
        })?;

        let total = found.len();
        self.available = found
            .into_iter()
            .filter(|m| m.class.is_game_controller())
            .collect();
        debug!(
            "enumerated {} game controller(s) ({} skipped)",
            self.available.len(),
            total - self.available.len()
        );
        Ok(())
    }

    pub fn available(&self) -> &[DeviceMeta] {
        &self.available
    }

    pub fn find(&self, instance: &Guid) -> Option<&DeviceMeta> {
        self.available.iter().find(|m| m.instance == *instance)
    }

    /// Open a listed device.
    pub fn open(&mut self, meta: &DeviceMeta) -> Result<JoystickPad> {
        let device = self.service.open(meta)?;
        JoystickPad::open(meta.clone(), device)
    }

    /// Listed devices that are not also reachable through XInput.
    ///
    /// Queries `props` once for the whole list.
    pub fn legacy_only(&self, props: &mut dyn PropertySource) -> Vec<&DeviceMeta> {
        let ids = match props.device_ids() {
            Ok(ids) => ids,
            Err(e) => {
                debug!("device property query failed, keeping every device: {e}");
                return self.available.iter().collect();
            }
        };
        self.available
            .iter()
            .filter(|m| !matches_any(&m.product, &ids))
            .collect()
    }

    /// Pretty JSON dump of the current list, for diagnostics.
    pub fn report_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.available)?)
    }
}
