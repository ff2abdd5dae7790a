#![cfg(target_os = "windows")]

//! Windows backends.
//!
//! - [`XInputSlotPort`]: one XInput slot polled through `XInputGetState`
//! - [`Win32Host`]: pointer leave tracking and capture for one window
//!
//! The host application owns the message loop and forwards each window
//! message to [`InputContext::update`](crate::manager::InputContext::update)
//! as a [`HostMessage`](crate::event::HostMessage).

pub mod host;
pub mod xinput_port;

pub use host::Win32Host;
pub use xinput_port::{system_ports, XInputSlotPort};
