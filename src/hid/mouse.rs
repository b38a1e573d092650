//! USB HID mouse encoders, relative and absolute.
//!
//! Relative layout (4 payload bytes after the report-ID slot):
//! ```text
//! Byte 0: Button bitfield
//!         Bit 0 = Left, Bit 1 = Right, Bit 2 = Middle
//! Byte 1: X displacement (signed, -127..127)
//! Byte 2: Y displacement (signed, -127..127)
//! Byte 3: Scroll wheel  (signed, -127..127)
//! ```
//!
//! Absolute layout (6 payload bytes):
//! ```text
//! Byte 0:   Button bitfield
//! Byte 1-2: X position (signed 16-bit, little-endian)
//! Byte 3-4: Y position (signed 16-bit, little-endian)
//! Byte 5:   Scroll wheel (signed)
//! ```

use crate::config::MOUSE_REPORT_ID;
use crate::error::Error;
use crate::hid::reporter::HidReporter;
use crate::hid::HidTransport;

pub const MOUSE_LEFT: u8 = 1;
pub const MOUSE_RIGHT: u8 = 2;
pub const MOUSE_MIDDLE: u8 = 4;
pub const MOUSE_ALL: u8 = MOUSE_LEFT | MOUSE_RIGHT | MOUSE_MIDDLE;

/// Relative mouse: every mutator rewrites the report and transmits it.
///
/// The button mask is cached locally so [`HidMouse::is_pressed`] never
/// touches the transport.
pub struct HidMouse {
    reporter: HidReporter<5>,
    buttons: u8,
}

impl HidMouse {
    pub fn new(report_id: u8) -> Self {
        Self {
            reporter: HidReporter::with_report_id(report_id),
            buttons: 0,
        }
    }

    /// Write signed deltas and transmit. Movement reports carry the
    /// current button mask so a drag stays a drag.
    pub fn move_by(
        &mut self,
        transport: &mut dyn HidTransport,
        dx: i8,
        dy: i8,
        wheel: i8,
    ) -> Result<(), Error> {
        let payload = self.reporter.payload_mut();
        payload[0] = self.buttons;
        payload[1] = dx as u8;
        payload[2] = dy as u8;
        payload[3] = wheel as u8;
        self.reporter.send_report(transport)
    }

    pub fn press(&mut self, transport: &mut dyn HidTransport, buttons: u8) -> Result<(), Error> {
        self.set_buttons(transport, self.buttons | buttons)
    }

    pub fn release(&mut self, transport: &mut dyn HidTransport, buttons: u8) -> Result<(), Error> {
        self.set_buttons(transport, self.buttons & !buttons)
    }

    /// Press-then-release pulse.
    pub fn click(&mut self, transport: &mut dyn HidTransport, buttons: u8) -> Result<(), Error> {
        self.press(transport, buttons)?;
        self.release(transport, buttons)
    }

    /// Pure read against the locally cached mask.
    pub fn is_pressed(&self, mask: u8) -> bool {
        self.buttons & mask != 0
    }

    fn set_buttons(&mut self, transport: &mut dyn HidTransport, buttons: u8) -> Result<(), Error> {
        self.buttons = buttons;
        self.move_by(transport, 0, 0, 0)
    }
}

impl Default for HidMouse {
    fn default() -> Self {
        Self::new(MOUSE_REPORT_ID)
    }
}

/// Absolute mouse: same button semantics, absolute 16-bit coordinates.
pub struct HidAbsMouse {
    reporter: HidReporter<7>,
    buttons: u8,
    x: i16,
    y: i16,
}

impl HidAbsMouse {
    pub fn new(report_id: u8) -> Self {
        Self {
            reporter: HidReporter::with_report_id(report_id),
            buttons: 0,
            x: 0,
            y: 0,
        }
    }

    /// Write an absolute position and transmit.
    pub fn move_to(
        &mut self,
        transport: &mut dyn HidTransport,
        x: i16,
        y: i16,
        wheel: i8,
    ) -> Result<(), Error> {
        self.x = x;
        self.y = y;
        let payload = self.reporter.payload_mut();
        payload[0] = self.buttons;
        payload[1..3].copy_from_slice(&x.to_le_bytes());
        payload[3..5].copy_from_slice(&y.to_le_bytes());
        payload[5] = wheel as u8;
        self.reporter.send_report(transport)
    }

    pub fn press(&mut self, transport: &mut dyn HidTransport, buttons: u8) -> Result<(), Error> {
        self.buttons |= buttons;
        self.move_to(transport, self.x, self.y, 0)
    }

    pub fn release(&mut self, transport: &mut dyn HidTransport, buttons: u8) -> Result<(), Error> {
        self.buttons &= !buttons;
        self.move_to(transport, self.x, self.y, 0)
    }

    pub fn click(&mut self, transport: &mut dyn HidTransport, buttons: u8) -> Result<(), Error> {
        self.press(transport, buttons)?;
        self.release(transport, buttons)
    }

    pub fn is_pressed(&self, mask: u8) -> bool {
        self.buttons & mask != 0
    }
}

impl Default for HidAbsMouse {
    fn default() -> Self {
        Self::new(MOUSE_REPORT_ID)
    }
}
