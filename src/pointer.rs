//! Pointer (mouse) state.
//!
//! Buttons, double-clicks, position, on-surface and wheel are all routed into
//! pending state and published by [`Pointer::prepare`].
//!
//! ## Capture and leave tracking
//! A button going down begins exclusive capture (first button only); the last
//! button going up ends it. The host only delivers a leave notification once
//! per arm, so the router re-arms it on the first move after every re-entry.
//! While captured, a leave notification does not clear the on-surface flag;
//! when capture ends, leave tracking is re-armed so a pointer that was
//! released outside the surface gets its leave notification.

use std::ops::Index;

use crate::edge::{ButtonState, RawSamples};
use crate::event::{kind, HostMessage, PointerHost};

/// The three tracked pointer buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub const ALL: [MouseButton; 3] = [Self::Left, Self::Right, Self::Middle];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Per-frame state of one pointer button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerButton {
    pub state: ButtonState,
    /// A double-click message arrived since the previous `prepare()`.
    pub double_clicked: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct PointerSample {
    x: i32,
    y: i32,
    on_surface: bool,
    wheel: i32,
}

#[derive(Debug, Default)]
pub struct Pointer {
    raw: RawSamples<3>,
    double_clicked: [bool; 3],
    pending: PointerSample,

    buttons: [ButtonState; 3],
    published_double: [bool; 3],
    published: PointerSample,

    tracking: bool,
    capture_count: u32,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish pointer state for this frame. Consumes double-click flags and
    /// the accumulated wheel delta.
    pub fn prepare(&mut self) {
        self.raw.commit(&mut self.buttons);
        self.published_double = std::mem::take(&mut self.double_clicked);
        self.published = self.pending;
        self.pending.wheel = 0;
    }

    /// Route one host message. Returns `true` if it was pointer input.
    pub fn update(&mut self, host: &mut dyn PointerHost, msg: &HostMessage) -> bool {
        match msg.kind {
            kind::MOUSEMOVE => {
                self.pending.on_surface = true;
                self.pending.x = msg.x();
                self.pending.y = msg.y();
                if !self.tracking {
                    host.track_leave();
                    self.tracking = true;
                }
                true
            }
            kind::MOUSELEAVE => {
                self.tracking = false;
                if self.capture_count == 0 {
                    self.pending.on_surface = false;
                }
                true
            }

            kind::LBUTTONDOWN => self.button_down(host, MouseButton::Left),
            kind::RBUTTONDOWN => self.button_down(host, MouseButton::Right),
            kind::MBUTTONDOWN => self.button_down(host, MouseButton::Middle),

            kind::LBUTTONUP => self.button_up(host, MouseButton::Left),
            kind::RBUTTONUP => self.button_up(host, MouseButton::Right),
            kind::MBUTTONUP => self.button_up(host, MouseButton::Middle),

            kind::LBUTTONDBLCLK => self.double_click(MouseButton::Left),
            kind::RBUTTONDBLCLK => self.double_click(MouseButton::Right),
            kind::MBUTTONDBLCLK => self.double_click(MouseButton::Middle),

            kind::MOUSEWHEEL => {
                self.pending.wheel = self.pending.wheel.saturating_add(msg.wheel_delta());
                true
            }
            kind::KILLFOCUS => {
                self.reset(host);
                false
            }
            _ => false,
        }
    }

    fn button_down(&mut self, host: &mut dyn PointerHost, button: MouseButton) -> bool {
        self.raw.set(button.index(), true);
        self.capture_count += 1;
        if self.capture_count == 1 {
            host.begin_capture();
        }
        true
    }

    fn button_up(&mut self, host: &mut dyn PointerHost, button: MouseButton) -> bool {
        self.raw.set(button.index(), false);
        if self.capture_count == 0 {
            return true;
        }
        self.capture_count -= 1;
        if self.capture_count == 0 {
            host.end_capture();
            if !self.tracking {
                host.track_leave();
                self.tracking = true;
            }
        }
        true
    }

    fn double_click(&mut self, button: MouseButton) -> bool {
        self.double_clicked[button.index()] = true;
        true
    }

    /// Force "no button down" immediately. Position is left alone.
    ///
    /// Capture held by a pressed button is released through `host`, since
    /// the matching button-ups will no longer end it.
    pub fn reset(&mut self, host: &mut dyn PointerHost) {
        self.raw.clear();
        if self.capture_count > 0 {
            self.capture_count = 0;
            host.end_capture();
        }
        self.buttons = [ButtonState::default(); 3];
        self.double_clicked = [false; 3];
        self.published_double = [false; 3];
    }

    pub fn button(&self, button: MouseButton) -> PointerButton {
        PointerButton {
            state: self.buttons[button.index()],
            double_clicked: self.published_double[button.index()],
        }
    }

    /// Client x as of the last `prepare()`. Only meaningful while [`on_surface`](Self::on_surface).
    pub fn x(&self) -> i32 {
        self.published.x
    }

    pub fn y(&self) -> i32 {
        self.published.y
    }

    /// Was the pointer on the surface at the last `prepare()`?
    ///
    /// Stays `true` while a button that started on the surface is held,
    /// even if the pointer has visually left.
    pub fn on_surface(&self) -> bool {
        self.published.on_surface
    }

    /// Wheel delta accumulated during the previous frame, in platform wheel
    /// units (typically 120 per notch).
    pub fn wheel_delta(&self) -> i32 {
        self.published.wheel
    }

    /// Number of buttons currently holding capture.
    pub fn capture_count(&self) -> u32 {
        self.capture_count
    }
}

impl Index<MouseButton> for Pointer {
    type Output = ButtonState;

    fn index(&self, button: MouseButton) -> &ButtonState {
        &self.buttons[button.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::RecordingHost;

    fn msg(kind: u32) -> HostMessage {
        HostMessage::new(kind, 0, 0)
    }

    #[test]
    fn unmatched_button_ups_never_go_negative() {
        let mut host = RecordingHost::default();
        let mut p = Pointer::new();
        p.update(&mut host, &msg(kind::LBUTTONDOWN));
        for _ in 0..3 {
            p.update(&mut host, &msg(kind::LBUTTONUP));
        }
        assert_eq!(p.capture_count(), 0);
        assert_eq!(host.begin_capture_calls, 1);
        assert_eq!(host.end_capture_calls, 1);
    }

    #[test]
    fn capture_spans_overlapping_buttons() {
        let mut host = RecordingHost::default();
        let mut p = Pointer::new();
        p.update(&mut host, &msg(kind::LBUTTONDOWN));
        p.update(&mut host, &msg(kind::RBUTTONDOWN));
        p.update(&mut host, &msg(kind::LBUTTONUP));
        assert_eq!(host.end_capture_calls, 0);
        p.update(&mut host, &msg(kind::RBUTTONUP));
        assert_eq!(host.begin_capture_calls, 1);
        assert_eq!(host.end_capture_calls, 1);
    }

    #[test]
    fn leave_tracking_is_rearmed_after_each_leave() {
        let mut host = RecordingHost::default();
        let mut p = Pointer::new();
        p.update(&mut host, &HostMessage::pointer_move(1, 1));
        p.update(&mut host, &HostMessage::pointer_move(2, 2));
        assert_eq!(host.track_leave_calls, 1);

        p.update(&mut host, &msg(kind::MOUSELEAVE));
        p.prepare();
        assert!(!p.on_surface());

        p.update(&mut host, &HostMessage::pointer_move(3, 4));
        assert_eq!(host.track_leave_calls, 2);
        p.prepare();
        assert!(p.on_surface());
        assert_eq!((p.x(), p.y()), (3, 4));
    }

    #[test]
    fn leave_while_captured_keeps_on_surface() {
        let mut host = RecordingHost::default();
        let mut p = Pointer::new();
        p.update(&mut host, &HostMessage::pointer_move(5, 5));
        p.update(&mut host, &msg(kind::LBUTTONDOWN));
        p.update(&mut host, &msg(kind::MOUSELEAVE));
        p.prepare();
        assert!(p.on_surface());

        p.update(&mut host, &msg(kind::LBUTTONUP));
        // tracking resumes once capture ends
        assert_eq!(host.track_leave_calls, 2);
        p.update(&mut host, &msg(kind::MOUSELEAVE));
        p.prepare();
        assert!(!p.on_surface());
    }

    #[test]
    fn double_click_is_one_shot() {
        let mut host = RecordingHost::default();
        let mut p = Pointer::new();
        p.update(&mut host, &msg(kind::RBUTTONDBLCLK));
        p.prepare();
        assert!(p.button(MouseButton::Right).double_clicked);
        assert!(!p.button(MouseButton::Right).state.held);
        p.prepare();
        assert!(!p.button(MouseButton::Right).double_clicked);
    }

    #[test]
    fn wheel_accumulates_and_resets_each_frame() {
        let mut host = RecordingHost::default();
        let mut p = Pointer::new();
        p.update(&mut host, &HostMessage::wheel(120));
        p.update(&mut host, &HostMessage::wheel(120));
        p.update(&mut host, &HostMessage::wheel(-120));
        p.prepare();
        assert_eq!(p.wheel_delta(), 120);
        p.prepare();
        assert_eq!(p.wheel_delta(), 0);
    }

    #[test]
    fn button_edges() {
        let mut host = RecordingHost::default();
        let mut p = Pointer::new();
        p.update(&mut host, &msg(kind::MBUTTONDOWN));
        p.prepare();
        assert!(p[MouseButton::Middle].pressed);
        p.update(&mut host, &msg(kind::MBUTTONUP));
        p.prepare();
        assert!(p[MouseButton::Middle].released);
    }

    #[test]
    fn focus_loss_clears_held_buttons() {
        let mut host = RecordingHost::default();
        let mut p = Pointer::new();
        p.update(&mut host, &msg(kind::LBUTTONDOWN));
        p.prepare();
        assert!(!p.update(&mut host, &HostMessage::focus_lost()));
        assert!(!p[MouseButton::Left].held);
        assert_eq!(p.capture_count(), 0);
        assert_eq!(host.end_capture_calls, 1);
        p.prepare();
        assert!(!p[MouseButton::Left].released);
    }

    #[test]
    fn reset_during_drag_releases_capture_once() {
        let mut host = RecordingHost::default();
        let mut p = Pointer::new();
        p.update(&mut host, &msg(kind::LBUTTONDOWN));
        p.update(&mut host, &msg(kind::RBUTTONDOWN));
        p.reset(&mut host);
        assert_eq!(p.capture_count(), 0);
        assert_eq!(host.end_capture_calls, 1);

        // stale ups after the reset change nothing
        p.update(&mut host, &msg(kind::LBUTTONUP));
        p.update(&mut host, &msg(kind::RBUTTONUP));
        assert_eq!(host.begin_capture_calls, host.end_capture_calls);

        // idle reset has nothing to release
        p.reset(&mut host);
        assert_eq!(host.end_capture_calls, 1);
    }

    #[test]
    fn wheel_flood_saturates() {
        let mut host = RecordingHost::default();
        let mut p = Pointer::new();
        let msg = HostMessage::wheel(i16::MAX);
        for _ in 0..70_000 {
            p.update(&mut host, &msg);
        }
        p.prepare();
        assert_eq!(p.wheel_delta(), i32::MAX);
    }

    #[test]
    fn unrelated_messages_fall_through() {
        let mut host = RecordingHost::default();
        let mut p = Pointer::new();
        assert!(!p.update(&mut host, &HostMessage::key_down(0x41)));
    }
}
