//! usb-composite: present a microcontroller as a composite USB device
//! built from HID functions (mouse, keyboard, joystick, consumer
//! control, raw) and an optional CDC-ACM serial channel.
//!
//! The low-level USB peripheral driver stays outside this crate; it is
//! consumed through the [`usb::CompositeDriver`], [`hid::HidTransport`]
//! and [`serial::SerialTransport`] traits. Everything here is
//! allocation-free and runs on the host for testing.
//!
//! Typical setup: configure identity and register parts on a
//! [`usb::device::CompositeDevice`], call `begin` with the platform
//! driver, then drive the typed encoders:
//!
//! ```ignore
//! let mut dev = CompositeDevice::new();
//! dev.set_vendor_id(0x1EAF);
//! dev.set_product_string("Composite HID");
//! dev.add_part(hid_part(descriptors::KEYBOARD_MOUSE_REPORT_DESCRIPTOR));
//! dev.add_part(CompositeSerial::part());
//! dev.begin(&mut driver)?;
//!
//! let mut keyboard = HidKeyboard::default();
//! keyboard.write_str(&mut transport, "hello");
//! ```

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod hid;
pub mod serial;
pub mod usb;

pub use error::Error;
pub use hid::consumer::HidConsumer;
pub use hid::joystick::HidJoystick;
pub use hid::keyboard::HidKeyboard;
pub use hid::mouse::{HidAbsMouse, HidMouse};
pub use hid::raw::HidRaw;
pub use hid::reporter::HidReporter;
pub use hid::{HidTransport, Poll, ReportType};
pub use serial::reset::{DtrState, ResetDetector, SystemReset};
pub use serial::{CompositeSerial, SerialTransport};
pub use usb::device::CompositeDevice;
pub use usb::{CompositeDriver, DeviceConfig, PartTable, UsbPart, UsbPlugin};

/// Convenience constructor for an HID part carrying the given report
/// descriptor over one interface with one IN endpoint.
pub fn hid_part(report_descriptor: &'static [u8]) -> UsbPart {
    UsbPart {
        name: "hid",
        descriptor: report_descriptor,
        num_interfaces: 1,
        num_endpoints: 1,
    }
}
