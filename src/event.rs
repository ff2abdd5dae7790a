//! Host messages and the host-side collaborator for pointer tracking.
//!
//! The host windowing system delivers opaque `(kind, wparam, lparam)` triples.
//! Kinds use Win32 numbering so a Windows message loop can forward its
//! messages untouched; other hosts translate into the same numbering.
//!
//! ## Payload conventions
//! - **Keys:** `wparam` = virtual key code (`0..=255`).
//! - **Pointer move / buttons:** `lparam` packs client x (low 16 bits) and
//!   y (high 16 bits), both signed.
//! - **Wheel:** signed delta in the high 16 bits of `wparam`
//!   (typically ±120 per notch).
//! - **Characters:** one UTF-16 code unit in the low 16 bits of `wparam`.

/// Message kinds understood by the router.
pub mod kind {
    pub const KILLFOCUS: u32 = 0x0008;
    pub const KEYDOWN: u32 = 0x0100;
    pub const KEYUP: u32 = 0x0101;
    pub const CHAR: u32 = 0x0102;
    pub const SYSKEYDOWN: u32 = 0x0104;
    pub const SYSKEYUP: u32 = 0x0105;
    pub const IME_STARTCOMPOSITION: u32 = 0x010D;
    pub const MOUSEMOVE: u32 = 0x0200;
    pub const LBUTTONDOWN: u32 = 0x0201;
    pub const LBUTTONUP: u32 = 0x0202;
    pub const LBUTTONDBLCLK: u32 = 0x0203;
    pub const RBUTTONDOWN: u32 = 0x0204;
    pub const RBUTTONUP: u32 = 0x0205;
    pub const RBUTTONDBLCLK: u32 = 0x0206;
    pub const MBUTTONDOWN: u32 = 0x0207;
    pub const MBUTTONUP: u32 = 0x0208;
    pub const MBUTTONDBLCLK: u32 = 0x0209;
    pub const MOUSEWHEEL: u32 = 0x020A;
    pub const MOUSELEAVE: u32 = 0x02A3;
}

/// One message from the host's dispatch loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostMessage {
    pub kind: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl HostMessage {
    pub const fn new(kind: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            kind,
            wparam,
            lparam,
        }
    }

    pub const fn key_down(vk: u8) -> Self {
        Self::new(kind::KEYDOWN, vk as usize, 0)
    }

    pub const fn key_up(vk: u8) -> Self {
        Self::new(kind::KEYUP, vk as usize, 0)
    }

    pub const fn char_unit(unit: u16) -> Self {
        Self::new(kind::CHAR, unit as usize, 0)
    }

    pub const fn pointer_move(x: i16, y: i16) -> Self {
        Self::new(kind::MOUSEMOVE, 0, pack_xy(x, y))
    }

    pub const fn wheel(delta: i16) -> Self {
        Self::new(kind::MOUSEWHEEL, (delta as u16 as usize) << 16, 0)
    }

    pub const fn focus_lost() -> Self {
        Self::new(kind::KILLFOCUS, 0, 0)
    }

    /// Signed client x from the low word of `lparam`.
    #[inline]
    pub fn x(&self) -> i32 {
        (self.lparam as u32 & 0xFFFF) as u16 as i16 as i32
    }

    /// Signed client y from the high word of `lparam`.
    #[inline]
    pub fn y(&self) -> i32 {
        ((self.lparam as u32 >> 16) & 0xFFFF) as u16 as i16 as i32
    }

    /// Signed wheel delta from the high word of `wparam`.
    #[inline]
    pub fn wheel_delta(&self) -> i32 {
        ((self.wparam >> 16) & 0xFFFF) as u16 as i16 as i32
    }
}

const fn pack_xy(x: i16, y: i16) -> isize {
    ((x as u16 as u32) | ((y as u16 as u32) << 16)) as i32 as isize
}

/// Host-side operations the pointer router needs.
///
/// On Windows these map to `TrackMouseEvent(TME_LEAVE)`, `SetCapture` and
/// `ReleaseCapture` (see [`Win32Host`](crate::backends::windows::Win32Host)).
pub trait PointerHost {
    /// Arm a one-shot "pointer left the surface" notification.
    fn track_leave(&mut self);
    /// Route all pointer messages to this surface.
    fn begin_capture(&mut self);
    /// Stop exclusive routing.
    fn end_capture(&mut self);
}

/// Host that ignores every request. Useful for headless routing.
#[derive(Debug, Default)]
pub struct NullHost;

impl PointerHost for NullHost {
    fn track_leave(&mut self) {}
    fn begin_capture(&mut self) {}
    fn end_capture(&mut self) {}
}
