//! Platform backends for `edgeinput`.
//!
//! Implementations of the crate's seams ([`XInputPort`](crate::xinput::XInputPort),
//! [`PointerHost`](crate::event::PointerHost),
//! [`PropertySource`](crate::directory::PropertySource), ...).
//!
//! # Feature flags
//! - **`hid`**: `hidapi`-backed [`PropertySource`](crate::directory::PropertySource)
//!   for duplicate detection (default).
//!
//! The Windows backend is compiled on Windows targets only. The virtual
//! backend is always available.

pub mod virtual_input;

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;

#[cfg(target_os = "windows")]
#[cfg_attr(docsrs, doc(cfg(target_os = "windows")))]
pub mod windows;
