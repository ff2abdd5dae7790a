//! `hidapi`-backed device property source.
//!
//! HID interface paths embed the same `VID_xxxx&PID_xxxx&IG_xx` fragment as
//! the system's device instance ids, just lower-cased
//! (`\\?\hid#vid_045e&pid_028e&ig_00#...`). Upper-casing them is enough for
//! [`is_duplicate_of_other_protocol`](crate::directory::is_duplicate_of_other_protocol).

use hidapi::HidApi;

use crate::directory::PropertySource;
use crate::error::{InputError, Result};

pub struct HidProperties {
    api: HidApi,
}

impl HidProperties {
    pub fn new() -> Result<Self> {
        let api = HidApi::new().map_err(|e| InputError::Enumeration(e.to_string()))?;
        Ok(Self { api })
    }
}

impl PropertySource for HidProperties {
    fn device_ids(&mut self) -> Result<Vec<String>> {
        self.api
            .refresh_devices()
            .map_err(|e| InputError::Enumeration(e.to_string()))?;
        Ok(self
            .api
            .device_list()
            .map(|info| info.path().to_string_lossy().to_uppercase())
            .collect())
    }
}
