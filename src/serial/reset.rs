//! In-band host-triggered reset protocol.
//!
//! The host arms a reset by selecting 1200 baud and toggling DTR low
//! after it has been high, then confirms by sending the 4-byte magic
//! token `"1EAF"` on the data stream. Arming and confirmation are both
//! required before the platform reset primitive fires.
//!
//! State is written from the control-transfer hook and read from the
//! receive hook. On targets where those hooks run serialized relative
//! to each other no locking is needed; platforms with nested
//! interrupts or multiple cores must wrap the detector in a critical
//! section.

use crate::config::{RESET_BAUD, RESET_MAGIC};

/// DTR edge-detection progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DtrState {
    /// No control-line notification observed yet.
    Unset,
    High,
    /// DTR just went low after being high.
    NegEdge,
    Low,
}

/// Platform collaborator performing the irrecoverable reset, typically
/// into the bootloader.
pub trait SystemReset {
    fn reset_to_bootloader(&mut self) -> !;
}

/// Watches control-line notifications and inbound bytes for the reset
/// handshake.
pub struct ResetDetector {
    state: DtrState,
    armed: bool,
    tail: [u8; 4],
    seen: usize,
}

impl ResetDetector {
    pub const fn new() -> Self {
        Self {
            state: DtrState::Unset,
            armed: false,
            tail: [0; 4],
            seen: 0,
        }
    }

    pub fn state(&self) -> DtrState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Control-line-state notification: sample DTR and advance the
    /// state machine. Arms the detector when the transition lands on
    /// the negative edge while the line runs at 1200 baud.
    pub fn on_control_line_state(&mut self, dtr: bool, baud: u32) {
        self.state = match self.state {
            DtrState::Unset => {
                if dtr {
                    DtrState::High
                } else {
                    DtrState::Low
                }
            }
            DtrState::High => {
                if dtr {
                    DtrState::High
                } else {
                    DtrState::NegEdge
                }
            }
            DtrState::NegEdge | DtrState::Low => {
                if dtr {
                    DtrState::High
                } else {
                    DtrState::Low
                }
            }
        };
        self.armed = baud == RESET_BAUD && self.state == DtrState::NegEdge;
    }

    /// Inbound byte delivery. Returns `true` when the most recent four
    /// bytes equal the magic token while the detector sits armed on
    /// the negative edge; the caller must then invoke
    /// [`SystemReset::reset_to_bootloader`].
    pub fn on_rx(&mut self, data: &[u8]) -> bool {
        for &b in data {
            self.tail.rotate_left(1);
            self.tail[3] = b;
        }
        self.seen = (self.seen + data.len()).min(4);

        if self.state != DtrState::NegEdge {
            return false;
        }
        self.state = DtrState::Low;

        let fired = self.armed && self.seen == 4 && self.tail == RESET_MAGIC;
        self.armed = false;
        fired
    }
}

impl Default for ResetDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtr_transition_table() {
        let mut d = ResetDetector::new();
        assert_eq!(d.state(), DtrState::Unset);

        d.on_control_line_state(true, 9600);
        assert_eq!(d.state(), DtrState::High);
        d.on_control_line_state(true, 9600);
        assert_eq!(d.state(), DtrState::High);
        d.on_control_line_state(false, 9600);
        assert_eq!(d.state(), DtrState::NegEdge);
        d.on_control_line_state(false, 9600);
        assert_eq!(d.state(), DtrState::Low);
        d.on_control_line_state(false, 9600);
        assert_eq!(d.state(), DtrState::Low);
        d.on_control_line_state(true, 9600);
        assert_eq!(d.state(), DtrState::High);

        let mut d = ResetDetector::new();
        d.on_control_line_state(false, 9600);
        assert_eq!(d.state(), DtrState::Low);
    }

    #[test]
    fn arms_only_at_reset_baud() {
        let mut d = ResetDetector::new();
        d.on_control_line_state(true, 9600);
        d.on_control_line_state(false, 9600);
        assert_eq!(d.state(), DtrState::NegEdge);
        assert!(!d.is_armed());

        let mut d = ResetDetector::new();
        d.on_control_line_state(true, 1200);
        d.on_control_line_state(false, 1200);
        assert!(d.is_armed());
    }

    #[test]
    fn magic_token_fires_when_armed() {
        let mut d = ResetDetector::new();
        d.on_control_line_state(true, 1200);
        d.on_control_line_state(false, 1200);

        assert!(d.on_rx(b"1EAF"));
        assert_eq!(d.state(), DtrState::Low);
    }

    #[test]
    fn wrong_token_does_not_fire() {
        let mut d = ResetDetector::new();
        d.on_control_line_state(true, 1200);
        d.on_control_line_state(false, 1200);

        assert!(!d.on_rx(b"1EAG"));
        assert_eq!(d.state(), DtrState::Low);
    }

    #[test]
    fn token_is_matched_against_the_stream_tail() {
        let mut d = ResetDetector::new();
        d.on_control_line_state(true, 1200);
        d.on_control_line_state(false, 1200);

        // Leading noise before the token is fine.
        assert!(d.on_rx(b"noise...1EAF"));
    }

    #[test]
    fn token_without_arming_does_not_fire() {
        let mut d = ResetDetector::new();
        assert!(!d.on_rx(b"1EAF"));

        // Edge seen at the wrong baud: still must not fire.
        let mut d = ResetDetector::new();
        d.on_control_line_state(true, 115_200);
        d.on_control_line_state(false, 115_200);
        assert!(!d.on_rx(b"1EAF"));
    }

    #[test]
    fn token_split_across_deliveries() {
        let mut d = ResetDetector::new();
        d.on_control_line_state(true, 1200);
        d.on_rx(b"1E");
        d.on_control_line_state(false, 1200);
        assert!(d.on_rx(b"AF"));
    }
}
