//! XInput-style gamepads.
//!
//! Four fixed slots, each with 14 digital buttons (12 face/dpad/shoulder/menu
//! buttons plus the two thumb-stick clicks), two thumb-sticks and two
//! triggers. Each pad owns an [`XInputPort`] for its slot; the Windows port
//! lives in [`backends::windows`](crate::backends).
//!
//! # Analog conventions
//! Sticks and triggers are exposed raw (`i16` / `u8`) alongside a boolean
//! "outside deadzone/threshold" flag computed from [`InputConfig`]:
//! sticks compare `|value| > deadzone` per axis, triggers `value > threshold`.
//!
//! [`Gamepad::axes`] reports `[LX, LY, RX, RY, LT, RT]` (see [`XAxis`]).

use log::debug;

use crate::config::InputConfig;
use crate::device::Gamepad;
use crate::edge::{AnalogGate, ButtonState};
use crate::error::{InputError, Result};
use crate::event::{kind, HostMessage};

/// Number of XInput slots.
pub const SLOT_COUNT: usize = 4;

/// Button bits in [`XInputState::buttons`].
pub mod mask {
    pub const DPAD_UP: u16 = 0x0001;
    pub const DPAD_DOWN: u16 = 0x0002;
    pub const DPAD_LEFT: u16 = 0x0004;
    pub const DPAD_RIGHT: u16 = 0x0008;
    pub const START: u16 = 0x0010;
    pub const BACK: u16 = 0x0020;
    pub const LEFT_THUMB: u16 = 0x0040;
    pub const RIGHT_THUMB: u16 = 0x0080;
    pub const LEFT_SHOULDER: u16 = 0x0100;
    pub const RIGHT_SHOULDER: u16 = 0x0200;
    pub const A: u16 = 0x1000;
    pub const B: u16 = 0x2000;
    pub const X: u16 = 0x4000;
    pub const Y: u16 = 0x8000;
}

/// Raw state block returned by one poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct XInputState {
    /// Increments whenever the controller state changes.
    pub packet: u32,
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

/// Platform access to one XInput slot.
pub trait XInputPort {
    /// Current state, or `Err` if nothing is connected to the slot.
    fn read(&mut self) -> Result<XInputState>;

    /// Command both motors (`0..=65535`).
    fn set_vibration(&mut self, left: u16, right: u16) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum XButton {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Start,
    Back,
    LeftShoulder,
    RightShoulder,
    A,
    B,
    X,
    Y,
    LeftThumb,
    RightThumb,
}

impl XButton {
    pub const ALL: [XButton; 14] = [
        Self::DpadUp,
        Self::DpadDown,
        Self::DpadLeft,
        Self::DpadRight,
        Self::Start,
        Self::Back,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::A,
        Self::B,
        Self::X,
        Self::Y,
        Self::LeftThumb,
        Self::RightThumb,
    ];

    pub const fn mask(self) -> u16 {
        match self {
            Self::DpadUp => mask::DPAD_UP,
            Self::DpadDown => mask::DPAD_DOWN,
            Self::DpadLeft => mask::DPAD_LEFT,
            Self::DpadRight => mask::DPAD_RIGHT,
            Self::Start => mask::START,
            Self::Back => mask::BACK,
            Self::LeftShoulder => mask::LEFT_SHOULDER,
            Self::RightShoulder => mask::RIGHT_SHOULDER,
            Self::A => mask::A,
            Self::B => mask::B,
            Self::X => mask::X,
            Self::Y => mask::Y,
            Self::LeftThumb => mask::LEFT_THUMB,
            Self::RightThumb => mask::RIGHT_THUMB,
        }
    }
}

/// Index into [`Gamepad::axes`] for an XInput pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum XAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThumbStick {
    pub button: ButtonState,
    pub x: i16,
    pub y: i16,
    pub x_outside_deadzone: bool,
    pub y_outside_deadzone: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriggerState {
    pub value: u8,
    pub outside_threshold: bool,
}

/// One XInput slot.
pub struct XInputPad {
    slot: u32,
    name: String,
    port: Box<dyn XInputPort>,
    stick_gates: [AnalogGate; 2],
    trigger_gate: AnalogGate,

    connected: bool,
    old: XInputState,
    packet: u32,

    buttons: [ButtonState; 14],
    sticks: [ThumbStick; 2],
    triggers: [TriggerState; 2],
    axes: [i32; 6],

    vibration: (u16, u16),
}

impl XInputPad {
    pub fn new(slot: u32, port: Box<dyn XInputPort>, config: &InputConfig) -> Self {
        Self {
            slot,
            name: format!("XInput Controller {slot}"),
            port,
            stick_gates: [config.left_stick_gate(), config.right_stick_gate()],
            trigger_gate: config.trigger_gate(),
            connected: false,
            old: XInputState::default(),
            packet: 0,
            buttons: [ButtonState::default(); 14],
            sticks: [ThumbStick::default(); 2],
            triggers: [TriggerState::default(); 2],
            axes: [0; 6],
            vibration: (0, 0),
        }
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn button(&self, button: XButton) -> &ButtonState {
        &self.buttons[button as usize]
    }

    pub fn thumb_stick(&self, side: Side) -> &ThumbStick {
        &self.sticks[side as usize]
    }

    pub fn trigger(&self, side: Side) -> &TriggerState {
        &self.triggers[side as usize]
    }

    pub fn axis(&self, axis: XAxis) -> i32 {
        self.axes[axis as usize]
    }

    /// Packet number of the last successful poll.
    pub fn packet(&self) -> u32 {
        self.packet
    }

    /// Command the motors. Local levels only change if the device accepted it.
    pub fn set_vibration(&mut self, left: u16, right: u16) -> Result<()> {
        self.port.set_vibration(left, right).map_err(|_| InputError::Actuation)?;
        self.vibration = (left, right);
        Ok(())
    }

    /// Last accepted low-frequency (left) motor speed.
    pub fn left_vibration(&self) -> u16 {
        self.vibration.0
    }

    /// Last accepted high-frequency (right) motor speed.
    pub fn right_vibration(&self) -> u16 {
        self.vibration.1
    }

    fn publish(&mut self, new: XInputState) {
        let old = self.old;
        for (state, button) in self.buttons.iter_mut().zip(XButton::ALL) {
            let m = button.mask();
            *state = ButtonState::derive(old.buttons & m != 0, new.buttons & m != 0);
        }

        let sticks = [
            (new.thumb_lx, new.thumb_ly, XButton::LeftThumb),
            (new.thumb_rx, new.thumb_ry, XButton::RightThumb),
        ];
        for (i, (x, y, click)) in sticks.into_iter().enumerate() {
            let gate = self.stick_gates[i];
            let prev = self.sticks[i];
            self.sticks[i] = ThumbStick {
                button: self.buttons[click as usize],
                x,
                y,
                x_outside_deadzone: gate.outside((x as i32).abs(), prev.x_outside_deadzone),
                y_outside_deadzone: gate.outside((y as i32).abs(), prev.y_outside_deadzone),
            };
        }

        for (i, value) in [new.left_trigger, new.right_trigger].into_iter().enumerate() {
            let prev = self.triggers[i].outside_threshold;
            self.triggers[i] = TriggerState {
                value,
                outside_threshold: self.trigger_gate.outside(value as i32, prev),
            };
        }

        self.axes = [
            new.thumb_lx as i32,
            new.thumb_ly as i32,
            new.thumb_rx as i32,
            new.thumb_ry as i32,
            new.left_trigger as i32,
            new.right_trigger as i32,
        ];

        self.packet = new.packet;
        self.old = new;
    }
}

impl Gamepad for XInputPad {
    fn prepare(&mut self) -> Result<()> {
        let state = match self.port.read() {
            Ok(state) => state,
            Err(_) => {
                if self.connected {
                    debug!("xinput slot {} disconnected", self.slot);
                }
                self.reset();
                return Err(InputError::Disconnected);
            }
        };
        if !self.connected {
            debug!("xinput slot {} connected (packet {})", self.slot, state.packet);
        }
        self.connected = true;
        self.publish(state);
        Ok(())
    }

    fn reset(&mut self) {
        self.connected = false;
        self.old = XInputState::default();
        self.buttons = [ButtonState::default(); 14];
        self.sticks = [ThumbStick::default(); 2];
        self.triggers = [TriggerState::default(); 2];
        self.axes = [0; 6];

        if self.set_vibration(0, 0).is_err() {
            // the motors may still be running; the cached level must not say so
            self.vibration = (0, 0);
        }
    }

    fn connected(&self) -> bool {
        self.connected
    }

    fn buttons(&self) -> &[ButtonState] {
        &self.buttons
    }

    fn axes(&self) -> &[i32] {
        &self.axes
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The four XInput slots, ticked and reset together.
pub struct XInputSlots {
    pads: [XInputPad; SLOT_COUNT],
}

impl XInputSlots {
    pub fn new(ports: [Box<dyn XInputPort>; SLOT_COUNT], config: &InputConfig) -> Self {
        let mut slot = 0;
        let pads = ports.map(|port| {
            let pad = XInputPad::new(slot, port, config);
            slot += 1;
            pad
        });
        Self { pads }
    }

    /// Prepare every slot. Returns which slots were connected.
    pub fn prepare(&mut self) -> [bool; SLOT_COUNT] {
        let mut out = [false; SLOT_COUNT];
        for (present, pad) in out.iter_mut().zip(self.pads.iter_mut()) {
            *present = pad.prepare().is_ok();
        }
        out
    }

    /// Focus loss resets every pad. No message is consumed.
    pub fn update(&mut self, msg: &HostMessage) -> bool {
        if msg.kind == kind::KILLFOCUS {
            self.reset();
        }
        false
    }

    pub fn reset(&mut self) {
        for pad in &mut self.pads {
            pad.reset();
        }
    }

    pub fn set_vibration(&mut self, slot: usize, left: u16, right: u16) -> Result<()> {
        self.pads
            .get_mut(slot)
            .ok_or_else(|| InputError::DeviceUnavailable(format!("xinput slot {slot}")))?
            .set_vibration(left, right)
    }

    pub fn pad(&self, slot: usize) -> Option<&XInputPad> {
        self.pads.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &XInputPad> {
        self.pads.iter()
    }
}
