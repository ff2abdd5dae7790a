//! Text recording from character messages.
//!
//! Character messages carry one UTF-16 code unit each, so characters outside
//! the BMP arrive as two messages (high surrogate, then low surrogate). The
//! recorder keeps raw units and only pairs them up when the text is read.

#[inline]
fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

#[inline]
fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Append-only recording of finalized character input.
///
/// States:
/// - **recording**: every unit is appended (subject to the surrogate rules).
/// - **finishing**: recording was just ended; one more unit may complete a
///   pending surrogate pair, then the recorder latches stopped.
/// - **stopped**: units are ignored until [`start`](Self::start).
///
/// Composition start (IME pre-edit) also latches stopped.
#[derive(Clone, Debug)]
pub struct TextRecorder {
    units: Vec<u16>,
    recording: bool,
    stopped: bool,
}

impl Default for TextRecorder {
    fn default() -> Self {
        Self {
            units: Vec::new(),
            recording: false,
            stopped: true,
        }
    }
}

impl TextRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) recording. Always clears the stopped latch.
    pub fn start(&mut self) {
        self.recording = true;
        self.stopped = false;
    }

    /// End recording. A pending high surrogate may still be completed by the
    /// next unit.
    pub fn end(&mut self) {
        self.recording = false;
        self.stopped = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Candidate text is being composed; suppress character input until
    /// recording is restarted.
    pub fn begin_composition(&mut self) {
        self.stopped = true;
    }

    /// Feed one UTF-16 unit from a character message.
    ///
    /// Returns `true` if the buffer changed.
    pub fn push(&mut self, unit: u16) -> bool {
        if self.stopped {
            return false;
        }

        let pending_high = self.units.last().copied().is_some_and(is_high_surrogate);

        if !self.recording {
            // finishing: resolve a split pair, then stop
            let mut changed = false;
            if pending_high {
                if is_low_surrogate(unit) {
                    self.units.push(unit);
                } else {
                    self.units.pop();
                }
                changed = true;
            }
            self.stopped = true;
            return changed;
        }

        if pending_high {
            if is_low_surrogate(unit) {
                self.units.push(unit);
                return true;
            }
            if let Some(orphan) = self.units.pop() {
                log::trace!("dropping orphaned high surrogate {orphan:#06x}");
            }
        } else if is_low_surrogate(unit) {
            // lone low surrogate: nothing to pair with
            return false;
        }

        self.units.push(unit);
        true
    }

    /// Recorded UTF-16 units, including a trailing unpaired high surrogate
    /// if the pair is still in flight.
    pub fn units(&self) -> &[u16] {
        &self.units
    }

    /// Recorded text. An in-flight high surrogate is rendered as U+FFFD.
    pub fn text(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }

    pub fn clear(&mut self) {
        self.units.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIGH: u16 = 0xD83D;
    const LOW: u16 = 0xDE00; // with HIGH: U+1F600

    fn recording() -> TextRecorder {
        let mut r = TextRecorder::new();
        r.start();
        r
    }

    #[test]
    fn ignores_input_until_started() {
        let mut r = TextRecorder::new();
        assert!(!r.push(b'a' as u16));
        assert!(r.units().is_empty());
    }

    #[test]
    fn records_bmp_text() {
        let mut r = recording();
        for c in "héllo".encode_utf16() {
            r.push(c);
        }
        assert_eq!(r.text(), "héllo");
    }

    #[test]
    fn completes_surrogate_pair() {
        let mut r = recording();
        r.push(HIGH);
        r.push(LOW);
        assert_eq!(r.text(), "\u{1F600}");
    }

    #[test]
    fn orphaned_high_surrogate_is_dropped() {
        let mut r = recording();
        r.push(b'x' as u16);
        r.push(HIGH);
        assert_eq!(r.units().len(), 2);

        r.push(b'y' as u16);
        assert_eq!(r.units(), &[b'x' as u16, b'y' as u16]);
    }

    #[test]
    fn high_followed_by_high_keeps_only_newest() {
        let mut r = recording();
        r.push(HIGH);
        r.push(HIGH);
        r.push(LOW);
        assert_eq!(r.text(), "\u{1F600}");
    }

    #[test]
    fn lone_low_surrogate_is_not_recorded() {
        let mut r = recording();
        assert!(!r.push(LOW));
        assert!(r.units().is_empty());
    }

    #[test]
    fn end_lets_pending_pair_complete_then_stops() {
        let mut r = recording();
        r.push(HIGH);
        r.end();
        assert!(r.push(LOW));
        assert_eq!(r.text(), "\u{1F600}");
        assert!(!r.push(b'z' as u16));
        assert_eq!(r.text(), "\u{1F600}");
    }

    #[test]
    fn end_discards_unfinished_pair() {
        let mut r = recording();
        r.push(b'a' as u16);
        r.push(HIGH);
        r.end();
        r.push(b'b' as u16);
        assert_eq!(r.text(), "a");
    }

    #[test]
    fn composition_suppresses_until_restart() {
        let mut r = recording();
        r.push(b'a' as u16);
        r.begin_composition();
        assert!(!r.push(b'b' as u16));
        assert!(r.is_recording());

        r.start();
        r.push(b'c' as u16);
        assert_eq!(r.text(), "ac");
    }

    #[test]
    fn clear_is_explicit() {
        let mut r = recording();
        r.push(b'a' as u16);
        r.end();
        assert_eq!(r.text(), "a");
        r.clear();
        assert_eq!(r.text(), "");
    }
}
