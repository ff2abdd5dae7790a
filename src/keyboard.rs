//! Keyboard state.
//!
//! [`Keyboard`] tracks 256 keys indexed by virtual key code. Key messages only
//! write the pending raw buffer; [`Keyboard::prepare`] publishes the per-frame
//! [`ButtonState`] for every key.
//!
//! ```
//! use edgeinput::event::HostMessage;
//! use edgeinput::keyboard::{vk, Keyboard};
//!
//! let mut kb = Keyboard::new();
//! kb.update(&HostMessage::key_down(vk::SPACE));
//! assert!(!kb[vk::SPACE].held); // not published yet
//!
//! kb.prepare();
//! assert!(kb[vk::SPACE].pressed);
//! ```

use std::ops::Index;

use bitflags::bitflags;

use crate::edge::{ButtonState, RawSamples};
use crate::event::{kind, HostMessage};
use crate::text::TextRecorder;

const KEY_COUNT: usize = 256;

/// Common virtual key codes.
pub mod vk {
    pub const BACK: u8 = 0x08;
    pub const TAB: u8 = 0x09;
    pub const RETURN: u8 = 0x0D;
    pub const SHIFT: u8 = 0x10;
    pub const CONTROL: u8 = 0x11;
    pub const MENU: u8 = 0x12;
    pub const ESCAPE: u8 = 0x1B;
    pub const SPACE: u8 = 0x20;
    pub const LEFT: u8 = 0x25;
    pub const UP: u8 = 0x26;
    pub const RIGHT: u8 = 0x27;
    pub const DOWN: u8 = 0x28;
    pub const F4: u8 = 0x73;
}

bitflags! {
    /// Modifier keys currently held.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModKeys: u8 {
        const ALT = 1 << 0;
        const CONTROL = 1 << 1;
        const SHIFT = 1 << 2;
    }
}

/// Keyboard snapshot plus the text recorder fed by character messages.
#[derive(Clone, Debug)]
pub struct Keyboard {
    raw: RawSamples<KEY_COUNT>,
    keys: [ButtonState; KEY_COUNT],
    text: TextRecorder,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self {
            raw: RawSamples::default(),
            keys: [ButtonState::default(); KEY_COUNT],
            text: TextRecorder::default(),
        }
    }
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish key states for this frame.
    pub fn prepare(&mut self) {
        self.raw.commit(&mut self.keys);
    }

    /// Route one host message.
    ///
    /// Returns `true` if the message was consumed. System key messages and
    /// character messages are recorded but still reported as unhandled, so
    /// the host keeps its default behaviour for them.
    pub fn update(&mut self, msg: &HostMessage) -> bool {
        match msg.kind {
            kind::KEYDOWN | kind::KEYUP => self.set_key(msg),
            kind::SYSKEYDOWN | kind::SYSKEYUP => {
                self.set_key(msg);
                false
            }
            kind::KILLFOCUS => {
                // key-ups for held keys will never arrive
                self.reset();
                false
            }
            kind::CHAR => {
                self.text.push((msg.wparam & 0xFFFF) as u16);
                false
            }
            kind::IME_STARTCOMPOSITION => {
                self.text.begin_composition();
                false
            }
            _ => false,
        }
    }

    fn set_key(&mut self, msg: &HostMessage) -> bool {
        if msg.wparam >= KEY_COUNT {
            return false;
        }
        let down = matches!(msg.kind, kind::KEYDOWN | kind::SYSKEYDOWN);
        self.raw.set(msg.wparam, down);
        true
    }

    /// Force "no key down" immediately, without producing release edges.
    ///
    /// The recorded text is left alone; clear it with [`clear_recorded_text`](Self::clear_recorded_text).
    pub fn reset(&mut self) {
        self.raw.clear();
        self.keys = [ButtonState::default(); KEY_COUNT];
    }

    pub fn key(&self, vk: u8) -> &ButtonState {
        &self.keys[vk as usize]
    }

    /// Key codes pressed this frame, ascending.
    pub fn pressed_keys(&self) -> Vec<u8> {
        (0..=u8::MAX).filter(|&k| self.keys[k as usize].pressed).collect()
    }

    /// Modifier mask derived from the held state of Alt, Control and Shift.
    pub fn modifier_keys(&self) -> ModKeys {
        let mut mods = ModKeys::empty();
        mods.set(ModKeys::ALT, self.key(vk::MENU).held);
        mods.set(ModKeys::CONTROL, self.key(vk::CONTROL).held);
        mods.set(ModKeys::SHIFT, self.key(vk::SHIFT).held);
        mods
    }

    pub fn start_text_recording(&mut self) {
        self.text.start();
    }

    pub fn end_text_recording(&mut self) {
        self.text.end();
    }

    pub fn recording_text(&self) -> bool {
        self.text.is_recording()
    }

    pub fn recorded_text(&self) -> String {
        self.text.text()
    }

    pub fn clear_recorded_text(&mut self) {
        self.text.clear();
    }

    pub fn text_recorder(&self) -> &TextRecorder {
        &self.text
    }
}

impl Index<u8> for Keyboard {
    type Output = ButtonState;

    fn index(&self, vk: u8) -> &ButtonState {
        self.key(vk)
    }
}
