//! Win32 window services for the pointer.

use windows_sys::Win32::Foundation::HWND;
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
    ReleaseCapture, SetCapture, TrackMouseEvent, TME_LEAVE, TRACKMOUSEEVENT,
};

use crate::event::PointerHost;

/// [`PointerHost`] bound to one window.
pub struct Win32Host {
    hwnd: HWND,
}

impl Win32Host {
    /// `hwnd` must stay valid for as long as the host is used.
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

impl PointerHost for Win32Host {
    fn track_leave(&mut self) {
        let mut tme = TRACKMOUSEEVENT {
            cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
            dwFlags: TME_LEAVE,
            hwndTrack: self.hwnd,
            dwHoverTime: 0,
        };
        if unsafe { TrackMouseEvent(&mut tme) } == 0 {
            log::debug!("TrackMouseEvent failed; no leave notification will arrive");
        }
    }

    fn begin_capture(&mut self) {
        unsafe { SetCapture(self.hwnd) };
    }

    fn end_capture(&mut self) {
        unsafe { ReleaseCapture() };
    }
}
