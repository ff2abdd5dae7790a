//! Scripted in-process backends.
//!
//! Every type here is a cheap handle over shared state: clone it, give one
//! clone to the crate (as a boxed port/device/service) and keep the other to
//! drive it. Used by the test-suite and the `message_pump` demo; also handy
//! for headless runs where no controller API is present.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::directory::{ControllerService, PropertySource};
use crate::error::{InputError, Result};
use crate::event::PointerHost;
use crate::gameinput::{GameInputDeviceInfo, GameInputKind, GameInputService};
use crate::joystick::{JoystickCaps, JoystickDevice, JoystickState, PollError};
use crate::metadata::{DeviceClass, DeviceMeta};
use crate::xinput::{XInputPort, XInputState};

#[derive(Debug, Default)]
struct PadSlot {
    connected: bool,
    state: XInputState,
    vibration: (u16, u16),
}

/// Scripted XInput slot.
#[derive(Clone, Debug, Default)]
pub struct VirtualXInput {
    inner: Rc<RefCell<PadSlot>>,
}

impl VirtualXInput {
    /// Empty slot (nothing plugged in).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected() -> Self {
        let port = Self::new();
        port.set_connected(true);
        port
    }

    pub fn set_connected(&self, connected: bool) {
        self.inner.borrow_mut().connected = connected;
    }

    pub fn set_buttons(&self, buttons: u16) {
        self.update(|s| s.buttons = buttons);
    }

    /// Mutate the raw state; bumps the packet number.
    pub fn update(&self, f: impl FnOnce(&mut XInputState)) {
        let mut slot = self.inner.borrow_mut();
        f(&mut slot.state);
        slot.state.packet = slot.state.packet.wrapping_add(1);
    }

    /// Motor levels last accepted by the slot.
    pub fn vibration(&self) -> (u16, u16) {
        self.inner.borrow().vibration
    }
}

impl XInputPort for VirtualXInput {
    fn read(&mut self) -> Result<XInputState> {
        let slot = self.inner.borrow();
        if slot.connected {
            Ok(slot.state)
        } else {
            Err(InputError::Disconnected)
        }
    }

    fn set_vibration(&mut self, left: u16, right: u16) -> Result<()> {
        let mut slot = self.inner.borrow_mut();
        if !slot.connected {
            return Err(InputError::Actuation);
        }
        slot.vibration = (left, right);
        Ok(())
    }
}

#[derive(Debug)]
struct JoystickScript {
    caps: JoystickCaps,
    state: JoystickState,
    poll_results: VecDeque<std::result::Result<(), PollError>>,
    acquire_result: std::result::Result<(), PollError>,
    acquire_calls: u32,
}

/// Scripted legacy controller.
///
/// Polls succeed unless a result was queued with
/// [`push_poll_result`](Self::push_poll_result).
#[derive(Clone, Debug)]
pub struct VirtualJoystick {
    inner: Rc<RefCell<JoystickScript>>,
}

impl VirtualJoystick {
    pub fn new(class: DeviceClass, buttons: u32, axes: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(JoystickScript {
                caps: JoystickCaps {
                    class,
                    buttons,
                    axes,
                    attached: true,
                },
                state: JoystickState::default(),
                poll_results: VecDeque::new(),
                acquire_result: Ok(()),
                acquire_calls: 0,
            })),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut JoystickState)) {
        f(&mut self.inner.borrow_mut().state);
    }

    /// Queue the outcome of one upcoming `poll()`.
    pub fn push_poll_result(&self, result: std::result::Result<(), PollError>) {
        self.inner.borrow_mut().poll_results.push_back(result);
    }

    pub fn set_acquire_result(&self, result: std::result::Result<(), PollError>) {
        self.inner.borrow_mut().acquire_result = result;
    }

    pub fn acquire_calls(&self) -> u32 {
        self.inner.borrow().acquire_calls
    }
}

impl JoystickDevice for VirtualJoystick {
    fn caps(&mut self) -> Result<JoystickCaps> {
        Ok(self.inner.borrow().caps)
    }

    fn poll(&mut self) -> std::result::Result<(), PollError> {
        self.inner.borrow_mut().poll_results.pop_front().unwrap_or(Ok(()))
    }

    fn acquire(&mut self) -> std::result::Result<(), PollError> {
        let mut script = self.inner.borrow_mut();
        script.acquire_calls += 1;
        script.acquire_result
    }

    fn state(&mut self) -> std::result::Result<JoystickState, PollError> {
        Ok(self.inner.borrow().state)
    }
}

#[derive(Debug, Default)]
struct ServiceScript {
    devices: Vec<(DeviceMeta, Option<VirtualJoystick>)>,
    fail_next: bool,
}

/// Scripted controller enumeration service.
#[derive(Clone, Debug, Default)]
pub struct VirtualControllerService {
    inner: Rc<RefCell<ServiceScript>>,
}

impl VirtualControllerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plug in a device. `device: None` lists it but makes `open` fail.
    pub fn plug(&self, meta: DeviceMeta, device: Option<VirtualJoystick>) {
        self.inner.borrow_mut().devices.push((meta, device));
    }

    pub fn unplug_all(&self) {
        self.inner.borrow_mut().devices.clear();
    }

    /// Make the next `enumerate()` fail.
    pub fn fail_next_enumeration(&self) {
        self.inner.borrow_mut().fail_next = true;
    }
}

impl ControllerService for VirtualControllerService {
    fn enumerate(&mut self) -> Result<Vec<DeviceMeta>> {
        let mut script = self.inner.borrow_mut();
        if std::mem::take(&mut script.fail_next) {
            return Err(InputError::Enumeration("scripted failure".into()));
        }
        Ok(script.devices.iter().map(|(m, _)| m.clone()).collect())
    }

    fn open(&mut self, meta: &DeviceMeta) -> Result<Box<dyn JoystickDevice>> {
        let script = self.inner.borrow();
        match script.devices.iter().find(|(m, _)| m.instance == meta.instance) {
            Some((_, Some(dev))) => Ok(Box::new(dev.clone())),
            _ => Err(InputError::DeviceUnavailable(meta.instance_name.clone())),
        }
    }
}

#[derive(Debug, Default)]
struct GameInputScript {
    devices: Vec<GameInputDeviceInfo>,
    fail_next: bool,
    last_kinds: Option<GameInputKind>,
}

/// Scripted GameInput enumeration.
///
/// Returns every plugged record regardless of the requested kinds, so
/// filtering on the caller's side is exercised.
#[derive(Clone, Debug, Default)]
pub struct VirtualGameInput {
    inner: Rc<RefCell<GameInputScript>>,
}

impl VirtualGameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plug(&self, info: GameInputDeviceInfo) {
        self.inner.borrow_mut().devices.push(info);
    }

    pub fn unplug_all(&self) {
        self.inner.borrow_mut().devices.clear();
    }

    pub fn fail_next_enumeration(&self) {
        self.inner.borrow_mut().fail_next = true;
    }

    /// Kind filter passed to the most recent `enumerate()`.
    pub fn last_kinds(&self) -> Option<GameInputKind> {
        self.inner.borrow().last_kinds
    }
}

impl GameInputService for VirtualGameInput {
    fn enumerate(&mut self, kinds: GameInputKind) -> Result<Vec<GameInputDeviceInfo>> {
        let mut script = self.inner.borrow_mut();
        script.last_kinds = Some(kinds);
        if std::mem::take(&mut script.fail_next) {
            return Err(InputError::Enumeration("scripted failure".into()));
        }
        Ok(script.devices.clone())
    }
}

/// Fixed list of device instance ids.
#[derive(Clone, Debug, Default)]
pub struct VirtualProperties {
    ids: Vec<String>,
    fail: bool,
}

impl VirtualProperties {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            fail: false,
        }
    }

    /// A source whose every query fails.
    pub fn failing() -> Self {
        Self {
            ids: Vec::new(),
            fail: true,
        }
    }
}

impl PropertySource for VirtualProperties {
    fn device_ids(&mut self) -> Result<Vec<String>> {
        if self.fail {
            return Err(InputError::Enumeration("property source unavailable".into()));
        }
        Ok(self.ids.clone())
    }
}

/// [`PointerHost`] that counts requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordingHost {
    pub track_leave_calls: u32,
    pub begin_capture_calls: u32,
    pub end_capture_calls: u32,
}

impl PointerHost for RecordingHost {
    fn track_leave(&mut self) {
        self.track_leave_calls += 1;
    }

    fn begin_capture(&mut self) {
        self.begin_capture_calls += 1;
    }

    fn end_capture(&mut self) {
        self.end_capture_calls += 1;
    }
}
