//! USB HID joystick encoder.
//!
//! Payload layout (12 bytes after the report-ID slot), all fields
//! little-endian, bit fields packed LSB-first:
//! ```text
//! Byte 0-3: Button bitmask (32 buttons)
//! Byte 4-11: Packed fields, starting at bit 0:
//!         hat:4  x:10  y:10  rx:10  ry:10  sliderLeft:10  sliderRight:10
//! ```
//!
//! Hat values: 15 = centered, 0..=7 = one of eight directions clockwise
//! from "up". The bit fields are packed with explicit helpers so the
//! wire layout holds on any host byte order.

use crate::config::JOYSTICK_REPORT_ID;
use crate::error::Error;
use crate::hid::reporter::HidReporter;
use crate::hid::HidTransport;

const BUTTONS_OFFSET: usize = 0;
const PACKED_OFFSET: usize = 4;

// Bit offsets within the packed region.
const HAT_BIT: usize = 0;
const X_BIT: usize = 4;
const Y_BIT: usize = 14;
const RX_BIT: usize = 24;
const RY_BIT: usize = 34;
const SLIDER_LEFT_BIT: usize = 44;
const SLIDER_RIGHT_BIT: usize = 54;

const AXIS_BITS: usize = 10;
const HAT_BITS: usize = 4;

/// Hat value meaning "no direction".
pub const HAT_CENTERED: u8 = 15;

/// Write `width` bits of `value` at `bit_offset`, LSB-first.
pub fn set_bits(buf: &mut [u8], bit_offset: usize, width: usize, value: u32) {
    for i in 0..width {
        let pos = bit_offset + i;
        let mask = 1u8 << (pos % 8);
        if value >> i & 1 != 0 {
            buf[pos / 8] |= mask;
        } else {
            buf[pos / 8] &= !mask;
        }
    }
}

/// Read `width` bits at `bit_offset`, LSB-first.
pub fn get_bits(buf: &[u8], bit_offset: usize, width: usize) -> u32 {
    let mut value = 0u32;
    for i in 0..width {
        let pos = bit_offset + i;
        if buf[pos / 8] >> (pos % 8) & 1 != 0 {
            value |= 1 << i;
        }
    }
    value
}

/// Joystick with 32 buttons, a hat switch, four 10-bit axes and two
/// 10-bit sliders.
///
/// Every mutator transmits immediately unless manual report mode is
/// enabled, in which case field changes accumulate until [`send`].
///
/// [`send`]: HidJoystick::send
pub struct HidJoystick {
    reporter: HidReporter<13>,
    manual_report: bool,
}

impl HidJoystick {
    pub fn new(report_id: u8) -> Self {
        let mut reporter = HidReporter::with_report_id(report_id);
        let payload = reporter.payload_mut();
        set_bits(&mut payload[PACKED_OFFSET..], HAT_BIT, HAT_BITS, HAT_CENTERED as u32);
        set_bits(&mut payload[PACKED_OFFSET..], X_BIT, AXIS_BITS, 512);
        set_bits(&mut payload[PACKED_OFFSET..], Y_BIT, AXIS_BITS, 512);
        set_bits(&mut payload[PACKED_OFFSET..], RX_BIT, AXIS_BITS, 512);
        set_bits(&mut payload[PACKED_OFFSET..], RY_BIT, AXIS_BITS, 512);
        Self {
            reporter,
            manual_report: false,
        }
    }

    /// In manual report mode, reports are only sent when [`send`] is
    /// called.
    ///
    /// [`send`]: HidJoystick::send
    pub fn set_manual_report_mode(&mut self, manual: bool) {
        self.manual_report = manual;
    }

    pub fn manual_report_mode(&self) -> bool {
        self.manual_report
    }

    /// Flush the accumulated report.
    pub fn send(&mut self, transport: &mut dyn HidTransport) -> Result<(), Error> {
        self.reporter.send_report(transport)
    }

    /// Set or clear one button bit (0..=31).
    pub fn button(
        &mut self,
        transport: &mut dyn HidTransport,
        button: u8,
        pressed: bool,
    ) -> Result<(), Error> {
        let payload = self.reporter.payload_mut();
        let mut buttons = u32::from_le_bytes([
            payload[BUTTONS_OFFSET],
            payload[BUTTONS_OFFSET + 1],
            payload[BUTTONS_OFFSET + 2],
            payload[BUTTONS_OFFSET + 3],
        ]);
        if pressed {
            buttons |= 1 << (button & 31);
        } else {
            buttons &= !(1 << (button & 31));
        }
        payload[BUTTONS_OFFSET..BUTTONS_OFFSET + 4].copy_from_slice(&buttons.to_le_bytes());
        self.maybe_send(transport)
    }

    pub fn x(&mut self, transport: &mut dyn HidTransport, val: u16) -> Result<(), Error> {
        self.set_axis(transport, X_BIT, val)
    }

    pub fn y(&mut self, transport: &mut dyn HidTransport, val: u16) -> Result<(), Error> {
        self.set_axis(transport, Y_BIT, val)
    }

    /// Set both primary axes in one report.
    pub fn position(
        &mut self,
        transport: &mut dyn HidTransport,
        x: u16,
        y: u16,
    ) -> Result<(), Error> {
        let packed = &mut self.reporter.payload_mut()[PACKED_OFFSET..];
        set_bits(packed, X_BIT, AXIS_BITS, (x & 0x3FF) as u32);
        set_bits(packed, Y_BIT, AXIS_BITS, (y & 0x3FF) as u32);
        self.maybe_send(transport)
    }

    pub fn x_rotate(&mut self, transport: &mut dyn HidTransport, val: u16) -> Result<(), Error> {
        self.set_axis(transport, RX_BIT, val)
    }

    pub fn y_rotate(&mut self, transport: &mut dyn HidTransport, val: u16) -> Result<(), Error> {
        self.set_axis(transport, RY_BIT, val)
    }

    pub fn slider_left(&mut self, transport: &mut dyn HidTransport, val: u16) -> Result<(), Error> {
        self.set_axis(transport, SLIDER_LEFT_BIT, val)
    }

    pub fn slider_right(&mut self, transport: &mut dyn HidTransport, val: u16) -> Result<(), Error> {
        self.set_axis(transport, SLIDER_RIGHT_BIT, val)
    }

    /// Set both sliders to the same value.
    pub fn slider(&mut self, transport: &mut dyn HidTransport, val: u16) -> Result<(), Error> {
        let packed = &mut self.reporter.payload_mut()[PACKED_OFFSET..];
        set_bits(packed, SLIDER_LEFT_BIT, AXIS_BITS, (val & 0x3FF) as u32);
        set_bits(packed, SLIDER_RIGHT_BIT, AXIS_BITS, (val & 0x3FF) as u32);
        self.maybe_send(transport)
    }

    /// Point the hat at `dir` degrees (rounded to the nearest 45);
    /// negative centers it.
    pub fn hat(&mut self, transport: &mut dyn HidTransport, dir: i16) -> Result<(), Error> {
        let value = if dir < 0 {
            HAT_CENTERED
        } else {
            (((dir as u32 + 22) / 45) % 8) as u8
        };
        let packed = &mut self.reporter.payload_mut()[PACKED_OFFSET..];
        set_bits(packed, HAT_BIT, HAT_BITS, value as u32);
        self.maybe_send(transport)
    }

    fn set_axis(
        &mut self,
        transport: &mut dyn HidTransport,
        bit_offset: usize,
        val: u16,
    ) -> Result<(), Error> {
        let packed = &mut self.reporter.payload_mut()[PACKED_OFFSET..];
        set_bits(packed, bit_offset, AXIS_BITS, (val & 0x3FF) as u32);
        self.maybe_send(transport)
    }

    fn maybe_send(&mut self, transport: &mut dyn HidTransport) -> Result<(), Error> {
        if self.manual_report {
            Ok(())
        } else {
            self.reporter.send_report(transport)
        }
    }

    #[cfg(test)]
    pub(crate) fn payload(&self) -> &[u8] {
        self.reporter.payload()
    }
}

impl Default for HidJoystick {
    fn default() -> Self {
        Self::new(JOYSTICK_REPORT_ID)
    }
}
