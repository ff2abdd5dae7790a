//! Legacy polled game controllers (DirectInput-style joysticks and gamepads).
//!
//! A [`JoystickPad`] wraps an opened [`JoystickDevice`]. The device handle is
//! owned: dropping the pad releases it.
//!
//! ## Poll protocol
//! `prepare()` polls the device. If the device reports that input was lost or
//! is not acquired, the pad reacquires once and polls once more. Any other
//! failure, or a second failure, is reported as
//! [`InputError::Disconnected`] for this frame and the pad is reset. There is
//! no retry loop; the next `prepare()` starts over.
//!
//! ## Layout
//! - Up to [`MAX_BUTTONS`] buttons (the device's count is clamped). A button
//!   is down when bit `0x80` of its raw byte is set.
//! - Six axis slots ([`JoyAxis`]), raw device units. Which slots are live is
//!   device-specific; [`JoystickPad::axes_count`] reports how many the device
//!   claims to have.

use log::{debug, trace};

use crate::device::Gamepad;
use crate::edge::{ButtonState, RawSamples};
use crate::error::{InputError, Result};
use crate::metadata::{DeviceClass, DeviceMeta};

pub const MAX_BUTTONS: usize = 32;
pub const AXIS_SLOTS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JoyAxis {
    X,
    Y,
    Z,
    Rx,
    Ry,
    Rz,
}

/// Failure reported by a single device call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollError {
    /// The device is gone.
    NotPresent,
    /// Another application took the device or the window lost foreground.
    InputLost,
    /// The device must be acquired before it can be read.
    NotAcquired,
}

/// Capabilities read once when the device is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoystickCaps {
    pub class: DeviceClass,
    pub buttons: u32,
    pub axes: u32,
    pub attached: bool,
}

/// Raw state block returned by one read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoystickState {
    pub axes: [i32; AXIS_SLOTS],
    pub buttons: [u8; MAX_BUTTONS],
}

impl Default for JoystickState {
    fn default() -> Self {
        Self {
            axes: [0; AXIS_SLOTS],
            buttons: [0; MAX_BUTTONS],
        }
    }
}

/// Platform handle to one opened legacy controller.
pub trait JoystickDevice {
    fn caps(&mut self) -> Result<JoystickCaps>;
    fn poll(&mut self) -> std::result::Result<(), PollError>;
    fn acquire(&mut self) -> std::result::Result<(), PollError>;
    fn state(&mut self) -> std::result::Result<JoystickState, PollError>;
}

pub struct JoystickPad {
    meta: DeviceMeta,
    device: Box<dyn JoystickDevice>,
    connected: bool,
    button_count: usize,
    axes_count: u32,
    raw: RawSamples<MAX_BUTTONS>,
    buttons: [ButtonState; MAX_BUTTONS],
    axes: [i32; AXIS_SLOTS],
}

impl JoystickPad {
    /// Wrap an opened device.
    ///
    /// Fails if the capabilities cannot be read or do not describe a gamepad
    /// or joystick.
    pub fn open(meta: DeviceMeta, mut device: Box<dyn JoystickDevice>) -> Result<Self> {
        let caps = device
            .caps()
            .map_err(|e| InputError::DeviceUnavailable(format!("{meta}: {e}")))?;
        if !caps.class.is_game_controller() {
            return Err(InputError::NotGameController(meta.instance_name.clone()));
        }
        debug!(
            "opened {} ({} buttons, {} axes, attached={})",
            meta, caps.buttons, caps.axes, caps.attached
        );

        Ok(Self {
            meta,
            device,
            connected: caps.attached,
            button_count: (caps.buttons as usize).min(MAX_BUTTONS),
            axes_count: caps.axes,
            raw: RawSamples::default(),
            buttons: [ButtonState::default(); MAX_BUTTONS],
            axes: [0; AXIS_SLOTS],
        })
    }

    pub fn meta(&self) -> &DeviceMeta {
        &self.meta
    }

    pub fn axes_count(&self) -> u32 {
        self.axes_count
    }

    pub fn axis(&self, axis: JoyAxis) -> i32 {
        self.axes[axis as usize]
    }

    fn read(&mut self) -> std::result::Result<JoystickState, PollError> {
        match self.device.poll() {
            Ok(()) => {}
            Err(PollError::InputLost | PollError::NotAcquired) => {
                trace!("reacquiring {}", self.meta);
                self.device.acquire()?;
                self.device.poll()?;
            }
            Err(e) => return Err(e),
        }
        self.device.state()
    }
}

impl Gamepad for JoystickPad {
    fn prepare(&mut self) -> Result<()> {
        let state = match self.read() {
            Ok(state) => state,
            Err(e) => {
                debug!("{} unavailable this frame: {e:?}", self.meta);
                self.reset();
                return Err(InputError::Disconnected);
            }
        };

        for (i, &byte) in state.buttons.iter().enumerate().take(self.button_count) {
            self.raw.set(i, byte & 0x80 != 0);
        }
        self.raw.commit(&mut self.buttons[..self.button_count]);
        self.axes = state.axes;
        self.connected = true;
        Ok(())
    }

    fn reset(&mut self) {
        self.connected = false;
        self.raw.clear();
        self.buttons = [ButtonState::default(); MAX_BUTTONS];
        self.axes = [0; AXIS_SLOTS];
    }

    fn connected(&self) -> bool {
        self.connected
    }

    fn buttons(&self) -> &[ButtonState] {
        &self.buttons[..self.button_count]
    }

    fn axes(&self) -> &[i32] {
        &self.axes
    }

    fn name(&self) -> &str {
        &self.meta.instance_name
    }
}
