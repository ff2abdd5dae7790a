use crate::edge::ButtonState;
use crate::error::Result;

/// Capability interface shared by every polled game controller backend.
///
/// Implemented by [`XInputPad`](crate::xinput::XInputPad) and
/// [`JoystickPad`](crate::joystick::JoystickPad).
pub trait Gamepad {
    /// Poll the device and publish this frame's state.
    ///
    /// On `Err` the device has been reset; no field should be trusted this
    /// frame. The next call polls again.
    fn prepare(&mut self) -> Result<()>;

    /// Force "nothing held", disconnected, and clear both raw buffers.
    fn reset(&mut self);

    /// Was the device present at the last `prepare()`?
    fn connected(&self) -> bool;

    fn buttons(&self) -> &[ButtonState];

    /// Latest raw axis values, not edge-detected or smoothed.
    fn axes(&self) -> &[i32];

    fn name(&self) -> &str;
}
