//! XInput slot access via `windows-sys`.

use windows_sys::Win32::UI::Input::XboxController::{
    XInputGetState, XInputSetState, XINPUT_STATE, XINPUT_VIBRATION,
};

use crate::error::{InputError, Result};
use crate::xinput::{XInputPort, XInputState, SLOT_COUNT};

/// XInput user index `0..4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XInputSlotPort(pub u32);

/// Ports for all four system slots, in order.
pub fn system_ports() -> [Box<dyn XInputPort>; SLOT_COUNT] {
    std::array::from_fn(|i| Box::new(XInputSlotPort(i as u32)) as Box<dyn XInputPort>)
}

impl XInputPort for XInputSlotPort {
    fn read(&mut self) -> Result<XInputState> {
        // FFI struct: must be manually zeroed
        let mut state: XINPUT_STATE = unsafe { std::mem::zeroed() };
        // 0 on success, ERROR_DEVICE_NOT_CONNECTED otherwise
        let res = unsafe { XInputGetState(self.0, &mut state) };
        if res != 0 {
            return Err(InputError::Disconnected);
        }
        let pad = state.Gamepad;
        Ok(XInputState {
            packet: state.dwPacketNumber,
            buttons: pad.wButtons,
            left_trigger: pad.bLeftTrigger,
            right_trigger: pad.bRightTrigger,
            thumb_lx: pad.sThumbLX,
            thumb_ly: pad.sThumbLY,
            thumb_rx: pad.sThumbRX,
            thumb_ry: pad.sThumbRY,
        })
    }

    fn set_vibration(&mut self, left: u16, right: u16) -> Result<()> {
        let vibration = XINPUT_VIBRATION {
            wLeftMotorSpeed: left,
            wRightMotorSpeed: right,
        };
        let res = unsafe { XInputSetState(self.0, &vibration) };
        if res != 0 {
            return Err(InputError::Actuation);
        }
        Ok(())
    }
}
