//! USB HID keyboard encoder.
//!
//! Payload layout (8 bytes after the report-ID slot):
//! ```text
//! Byte 0: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: Reserved (0x00)
//! Byte 2-7: Up to 6 simultaneous key usage codes
//! ```

use crate::config::KEYBOARD_REPORT_ID;
use crate::error::Error;
use crate::hid::keymap::{self, KEY_LEFT_CTRL, KEY_LEFT_SHIFT, KEY_RIGHT_GUI, SHIFT};
use crate::hid::reporter::HidReporter;
use crate::hid::HidTransport;

const MODIFIER_OFFSET: usize = 0;
const KEYS_OFFSET: usize = 2;
const KEY_SLOTS: usize = 6;

/// 6-key-rollover keyboard with a host-LED latch.
///
/// The host's most recent output report (LED state) is delivered via
/// [`HidKeyboard::push_output`] by the driver glue and read back with
/// [`HidKeyboard::leds`]; it never travels through the codec get-path.
pub struct HidKeyboard {
    reporter: HidReporter<9>,
    leds: u8,
}

impl HidKeyboard {
    pub fn new(report_id: u8) -> Self {
        Self {
            reporter: HidReporter::with_report_id(report_id),
            leds: 0,
        }
    }

    /// Press a key. Modifier usages (0xE0..=0xE7) are OR'd into the
    /// modifier mask; anything else takes the first free key slot. A
    /// seventh concurrent key is silently dropped, leaving the report
    /// untouched. Transmits the updated report either way.
    pub fn press(&mut self, transport: &mut dyn HidTransport, keycode: u8) -> Result<(), Error> {
        let payload = self.reporter.payload_mut();
        if (KEY_LEFT_CTRL..=KEY_RIGHT_GUI).contains(&keycode) {
            payload[MODIFIER_OFFSET] |= 1 << (keycode - KEY_LEFT_CTRL);
        } else {
            let slots = &mut payload[KEYS_OFFSET..KEYS_OFFSET + KEY_SLOTS];
            if !slots.contains(&keycode) {
                if let Some(free) = slots.iter_mut().find(|s| **s == 0) {
                    *free = keycode;
                }
            }
        }
        self.reporter.send_report(transport)
    }

    /// Release a key or clear a modifier bit, then transmit.
    pub fn release(&mut self, transport: &mut dyn HidTransport, keycode: u8) -> Result<(), Error> {
        let payload = self.reporter.payload_mut();
        if (KEY_LEFT_CTRL..=KEY_RIGHT_GUI).contains(&keycode) {
            payload[MODIFIER_OFFSET] &= !(1 << (keycode - KEY_LEFT_CTRL));
        } else {
            for slot in &mut payload[KEYS_OFFSET..KEYS_OFFSET + KEY_SLOTS] {
                if *slot == keycode {
                    *slot = 0;
                }
            }
        }
        self.reporter.send_report(transport)
    }

    /// Zero all modifiers and key slots, then transmit.
    pub fn release_all(&mut self, transport: &mut dyn HidTransport) -> Result<(), Error> {
        self.reporter.payload_mut().fill(0);
        self.reporter.send_report(transport)
    }

    /// Type one printable ASCII character: map it through the
    /// translation table, transmit a press report (with Shift when the
    /// mapping demands it) and a release report. Exactly two reports.
    ///
    /// Returns 1 on success, 0 when the character has no mapping.
    pub fn write(&mut self, transport: &mut dyn HidTransport, c: u8) -> usize {
        let Some(entry) = keymap::lookup(c) else {
            return 0;
        };
        let usage = entry & !SHIFT;
        let shifted = entry & SHIFT != 0;

        {
            let payload = self.reporter.payload_mut();
            if shifted {
                payload[MODIFIER_OFFSET] |= 1 << (KEY_LEFT_SHIFT - KEY_LEFT_CTRL);
            }
            payload[KEYS_OFFSET] = usage;
        }
        if self.reporter.send_report(transport).is_err() {
            return 0;
        }

        {
            let payload = self.reporter.payload_mut();
            if shifted {
                payload[MODIFIER_OFFSET] &= !(1 << (KEY_LEFT_SHIFT - KEY_LEFT_CTRL));
            }
            payload[KEYS_OFFSET] = 0;
        }
        if self.reporter.send_report(transport).is_err() {
            return 0;
        }
        1
    }

    /// Type a whole string; returns the number of characters sent.
    pub fn write_str(&mut self, transport: &mut dyn HidTransport, s: &str) -> usize {
        s.bytes().map(|c| self.write(transport, c)).sum()
    }

    /// Driver glue entry point: the host delivered an output report.
    /// The first payload byte is the LED bitmask.
    pub fn push_output(&mut self, report: &[u8]) {
        if let Some(&leds) = report.first() {
            self.leds = leds;
        }
    }

    /// Most recent host LED state (Num/Caps/Scroll lock bits).
    pub fn leds(&self) -> u8 {
        self.leds
    }

    /// Current modifier bitfield.
    pub fn modifiers(&self) -> u8 {
        self.reporter.payload()[MODIFIER_OFFSET]
    }
}

impl Default for HidKeyboard {
    fn default() -> Self {
        Self::new(KEYBOARD_REPORT_ID)
    }
}
