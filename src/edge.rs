//! Edge detection primitives shared by every device class.
//!
//! Each device keeps two raw sample buffers: `new` (written by message routing
//! or a poll) and `old` (the state as of the last `prepare()`). `prepare()`
//! derives a [`ButtonState`] per slot from the pair and then copies
//! `new → old`.
//!
//! Sampling, not event logging: any number of down/up transitions between two
//! `prepare()` calls collapse into the net transition.
//!
//! ```
//! use edgeinput::edge::ButtonState;
//!
//! let s = ButtonState::derive(false, true);
//! assert!(s.pressed && s.held && !s.released);
//!
//! let s = ButtonState::derive(true, true);
//! assert!(!s.pressed && s.held && !s.released);
//! ```

/// Per-frame state of one digital input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Went down since the previous `prepare()`.
    pub pressed: bool,
    /// Currently down.
    pub held: bool,
    /// Went up since the previous `prepare()`.
    pub released: bool,
}

impl ButtonState {
    /// Derive the state from the previous and current raw samples.
    #[inline]
    pub fn derive(old: bool, new: bool) -> Self {
        Self {
            pressed: new && !old,
            held: new,
            released: !new && old,
        }
    }
}

/// Double-buffered raw samples for `N` digital inputs.
///
/// `old` is private on purpose: it always reflects the state as of the most
/// recent [`commit`](Self::commit) and only the owning device reads it.
#[derive(Clone, Debug)]
pub struct RawSamples<const N: usize> {
    old: [bool; N],
    new: [bool; N],
}

impl<const N: usize> Default for RawSamples<N> {
    fn default() -> Self {
        Self {
            old: [false; N],
            new: [false; N],
        }
    }
}

impl<const N: usize> RawSamples<N> {
    /// Write one pending sample. Out-of-range indices are ignored.
    #[inline]
    pub fn set(&mut self, index: usize, down: bool) {
        if let Some(slot) = self.new.get_mut(index) {
            *slot = down;
        }
    }

    /// Diff `new` against `old` into `out`, then copy `new → old`.
    ///
    /// Only the first `out.len()` slots are derived and committed.
    pub fn commit(&mut self, out: &mut [ButtonState]) {
        let n = out.len().min(N);
        for (i, state) in out.iter_mut().enumerate().take(n) {
            *state = ButtonState::derive(self.old[i], self.new[i]);
        }
        self.old[..n].copy_from_slice(&self.new[..n]);
    }

    /// Clear both buffers.
    pub fn clear(&mut self) {
        self.old = [false; N];
        self.new = [false; N];
    }
}

/// Fixed analog threshold with an optional hysteresis band.
///
/// Without hysteresis a single crossing flips the flag immediately, which can
/// chatter when the value sits right at the threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalogGate {
    pub threshold: i32,
    pub hysteresis: i32,
}

impl AnalogGate {
    pub const fn new(threshold: i32) -> Self {
        Self {
            threshold,
            hysteresis: 0,
        }
    }

    pub const fn with_hysteresis(threshold: i32, hysteresis: i32) -> Self {
        Self {
            threshold,
            hysteresis,
        }
    }

    /// Is `magnitude` outside the gate, given whether it was outside last frame?
    ///
    /// Entering requires `magnitude > threshold`. Leaving requires
    /// `magnitude <= threshold - hysteresis`.
    #[inline]
    pub fn outside(&self, magnitude: i32, was_outside: bool) -> bool {
        if was_outside && self.hysteresis > 0 {
            magnitude > self.threshold - self.hysteresis
        } else {
            magnitude > self.threshold
        }
    }
}
