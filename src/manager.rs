//! Application-owned input context.
//!
//! [`InputContext`] bundles the keyboard, pointer, the four XInput slots and
//! any opened legacy pads. The application root constructs it once and passes
//! it by reference to the message handler and the tick loop:
//!
//! ```no_run
//! # use edgeinput::{InputConfig, InputContext, event::{HostMessage, NullHost}};
//! # use edgeinput::backends::virtual_input::VirtualXInput;
//! # use edgeinput::xinput::XInputPort;
//! # fn next_message() -> Option<HostMessage> { None }
//! let ports = std::array::from_fn(|_| Box::new(VirtualXInput::new()) as Box<dyn XInputPort>);
//! let mut input = InputContext::new(ports, &InputConfig::default());
//! let mut host = NullHost;
//! loop {
//!     while let Some(msg) = next_message() {
//!         let handled = input.update(&mut host, &msg);
//!         // forward unhandled messages to the host's default handler
//!         # let _ = handled;
//!     }
//!     let report = input.prepare();
//!     // skip pads that failed this frame
//!     # let _ = report;
//!     if input.keyboard()[0x1B].pressed {
//!         break;
//!     }
//! }
//! ```
//!
//! Devices owned by the context are only reachable through shared
//! references, so the only way to tick them is [`InputContext::prepare`].
//! A pad cannot be prepared both individually and in aggregate in one frame.

use log::debug;

use crate::config::InputConfig;
use crate::device::Gamepad;
use crate::event::{HostMessage, PointerHost};
use crate::joystick::JoystickPad;
use crate::keyboard::Keyboard;
use crate::pointer::Pointer;
use crate::xinput::{XInputPort, XInputSlots, SLOT_COUNT};

/// Handle to a legacy pad attached to an [`InputContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PadId(u32);

/// Which polled devices produced trustworthy state in one
/// [`InputContext::prepare`].
///
/// A device that failed has been reset; none of its fields should be trusted
/// until a later frame succeeds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrepareReport {
    /// Connected XInput slots.
    pub xinput: [bool; SLOT_COUNT],
    /// Attached legacy pads whose prepare failed.
    pub failed_pads: Vec<PadId>,
}

impl PrepareReport {
    pub fn pad_ok(&self, id: PadId) -> bool {
        !self.failed_pads.contains(&id)
    }
}

pub struct InputContext {
    keyboard: Keyboard,
    pointer: Pointer,
    xinput: XInputSlots,
    pads: Vec<(PadId, JoystickPad)>,
    next_pad: u32,
}

impl InputContext {
    pub fn new(ports: [Box<dyn XInputPort>; SLOT_COUNT], config: &InputConfig) -> Self {
        Self {
            keyboard: Keyboard::new(),
            pointer: Pointer::new(),
            xinput: XInputSlots::new(ports, config),
            pads: Vec::new(),
            next_pad: 0,
        }
    }

    /// Route one host message to every component.
    ///
    /// Returns `true` if any component consumed it; otherwise the caller must
    /// hand the message to the host's default processing.
    pub fn update(&mut self, host: &mut dyn PointerHost, msg: &HostMessage) -> bool {
        let key = self.keyboard.update(msg);
        let pointer = self.pointer.update(host, msg);
        let pad = self.xinput.update(msg);
        if msg.kind == crate::event::kind::KILLFOCUS {
            for (_, p) in &mut self.pads {
                p.reset();
            }
        }
        key || pointer || pad
    }

    /// Publish this frame's state for every device.
    ///
    /// Keyboard and pointer never fail. Polled devices that did are listed in
    /// the returned report.
    pub fn prepare(&mut self) -> PrepareReport {
        self.keyboard.prepare();
        self.pointer.prepare();
        let xinput = self.xinput.prepare();

        let mut failed_pads = Vec::new();
        for (id, pad) in &mut self.pads {
            if let Err(e) = pad.prepare() {
                debug!("pad {:?} ({}) failed prepare: {e}", id, pad.name());
                failed_pads.push(*id);
            }
        }
        PrepareReport {
            xinput,
            failed_pads,
        }
    }

    /// Force every device to "nothing held". Pointer capture is released
    /// through `host`.
    pub fn reset(&mut self, host: &mut dyn PointerHost) {
        self.keyboard.reset();
        self.pointer.reset(host);
        self.xinput.reset();
        for (_, pad) in &mut self.pads {
            pad.reset();
        }
    }

    pub fn attach(&mut self, pad: JoystickPad) -> PadId {
        let id = PadId(self.next_pad);
        self.next_pad += 1;
        self.pads.push((id, pad));
        id
    }

    /// Remove a pad from the context and hand it back.
    pub fn detach(&mut self, id: PadId) -> Option<JoystickPad> {
        let at = self.pads.iter().position(|(pid, _)| *pid == id)?;
        Some(self.pads.remove(at).1)
    }

    pub fn pad(&self, id: PadId) -> Option<&JoystickPad> {
        self.pads.iter().find(|(pid, _)| *pid == id).map(|(_, p)| p)
    }

    pub fn pads(&self) -> impl Iterator<Item = (PadId, &JoystickPad)> {
        self.pads.iter().map(|(id, p)| (*id, p))
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn xinput(&self) -> &XInputSlots {
        &self.xinput
    }

    pub fn start_text_recording(&mut self) {
        self.keyboard.start_text_recording();
    }

    pub fn end_text_recording(&mut self) {
        self.keyboard.end_text_recording();
    }

    pub fn clear_recorded_text(&mut self) {
        self.keyboard.clear_recorded_text();
    }

    /// Vibrate an XInput pad. See [`XInputPad::set_vibration`](crate::xinput::XInputPad::set_vibration).
    pub fn set_vibration(&mut self, slot: usize, left: u16, right: u16) -> crate::Result<()> {
        self.xinput.set_vibration(slot, left, right)
    }
}
