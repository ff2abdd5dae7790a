//! edgeinput: per-frame input state for keyboard, pointer and game controllers.
//!
//! The host application forwards window messages to [`InputContext::update`]
//! and calls [`InputContext::prepare`] once per frame. Every button then
//! reports `pressed` (went down since the last frame), `held` and `released`
//! (went up since the last frame) for exactly one frame.
//!
//! Controllers come in two flavours sharing the [`Gamepad`] trait:
//! XInput slots ([`xinput`]) and legacy joysticks ([`joystick`]) discovered
//! through a [`DeviceDirectory`](directory::DeviceDirectory). Controllers
//! known to the newer GameInput stack are listed by
//! [`GameInputDevices`](gameinput::GameInputDevices).
//!
//! Platform code lives behind small traits in [`backends`]; a scripted
//! [`virtual_input`](backends::virtual_input) backend is always available.

pub mod backends;
pub mod config;
pub mod device;
pub mod directory;
pub mod edge;
pub mod error;
pub mod event;
pub mod gameinput;
pub mod joystick;
pub mod keyboard;
pub mod manager;
pub mod metadata;
pub mod pointer;
pub mod text;
pub mod xinput;

pub use config::InputConfig;
pub use device::Gamepad;
pub use edge::ButtonState;
pub use error::{InputError, Result};
pub use event::{HostMessage, PointerHost};
pub use keyboard::Keyboard;
pub use manager::{InputContext, PadId, PrepareReport};
pub use pointer::{MouseButton, Pointer};
