//! Consumer Control encoder - media keys, volume, brightness.
//!
//! Consumer Control is a separate HID usage page (0x0C). The report is
//! a single little-endian 16-bit usage code after the report-ID slot;
//! one control is active at a time.

use crate::config::CONSUMER_REPORT_ID;
use crate::error::Error;
use crate::hid::reporter::HidReporter;
use crate::hid::HidTransport;

// Common usage codes (Usage Page 0x0C), see HUT chapter 15.
pub const BRIGHTNESS_UP: u16 = 0x006F;
pub const BRIGHTNESS_DOWN: u16 = 0x0070;
pub const PLAY_OR_PAUSE: u16 = 0x00CD;
pub const MUTE: u16 = 0x00E2;
pub const VOLUME_UP: u16 = 0x00E9;
pub const VOLUME_DOWN: u16 = 0x00EA;

/// Single-control consumer encoder.
pub struct HidConsumer {
    reporter: HidReporter<3>,
}

impl HidConsumer {
    pub fn new(report_id: u8) -> Self {
        Self {
            reporter: HidReporter::with_report_id(report_id),
        }
    }

    /// Make `code` the active control and transmit.
    pub fn press(&mut self, transport: &mut dyn HidTransport, code: u16) -> Result<(), Error> {
        self.reporter
            .payload_mut()
            .copy_from_slice(&code.to_le_bytes());
        self.reporter.send_report(transport)
    }

    /// Clear the active control and transmit.
    pub fn release(&mut self, transport: &mut dyn HidTransport) -> Result<(), Error> {
        self.press(transport, 0)
    }
}

impl Default for HidConsumer {
    fn default() -> Self {
        Self::new(CONSUMER_REPORT_ID)
    }
}
