//! Render-window state machine.

/// The two-boundary debounce of render-to-log windows.
///
/// An interval crossing arms the gate; the episode boundary after arming
/// starts recording; the boundary after that stops it and leaves one flush
/// pending, consumed by [`RenderGate::take_flush`]. The episodic worker
/// drives the gate directly through [`RenderGate::start`] and
/// [`RenderGate::stop`], flushing at the boundary where it stops.
#[derive(Debug, Default)]
pub(crate) struct RenderGate {
    armed: bool,
    recording: bool,
    flush_pending: bool,
}

impl RenderGate {
    /// Arms the gate; recording starts at the next episode boundary.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Starts recording immediately.
    pub fn start(&mut self) {
        self.recording = true;
    }

    /// Stops recording.
    pub fn stop(&mut self) {
        self.recording = false;
    }

    /// Advances the gate at an episode boundary.
    pub fn on_boundary(&mut self) {
        if self.armed {
            self.armed = false;
            self.recording = true;
        } else if self.recording {
            self.recording = false;
            self.flush_pending = true;
        }
    }

    /// Returns `true` while frames are being recorded.
    pub fn recording(&self) -> bool {
        self.recording
    }

    /// Consumes the pending flush, if any.
    pub fn take_flush(&mut self) -> bool {
        std::mem::replace(&mut self.flush_pending, false)
    }
}

#[cfg(test)]
mod tests {
    use super::RenderGate;

    #[test]
    fn test_two_boundary_debounce() {
        let mut gate = RenderGate::default();
        assert!(!gate.recording());

        gate.arm();
        assert!(!gate.recording());

        // First boundary after arming: recording starts.
        gate.on_boundary();
        assert!(gate.recording());
        assert!(!gate.take_flush());

        // Second boundary: recording stops and one flush becomes pending.
        gate.on_boundary();
        assert!(!gate.recording());
        assert!(gate.take_flush());
        assert!(!gate.take_flush());

        // Further boundaries without arming do nothing.
        gate.on_boundary();
        assert!(!gate.recording());
        assert!(!gate.take_flush());
    }

    #[test]
    fn test_arming_twice_before_boundary_is_one_window() {
        let mut gate = RenderGate::default();
        gate.arm();
        gate.arm();
        gate.on_boundary();
        assert!(gate.recording());
        gate.on_boundary();
        assert!(gate.take_flush());
    }
}
