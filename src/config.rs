//! Crate-wide constants and compile-time configuration.
//!
//! Capacity limits, protocol constants, and default report IDs live
//! here so they can be tuned in one place.

// Composite device

/// Maximum number of parts one composite device can carry.
pub const MAX_PARTS: usize = 6;

/// Maximum number of plugins one composite device can carry.
pub const MAX_PLUGINS: usize = 6;

/// Manufacturer string cap (characters, not bytes).
pub const MAX_MANUFACTURER_LENGTH: usize = 32;

/// Product string cap (characters).
pub const MAX_PRODUCT_LENGTH: usize = 32;

/// Serial-number string cap (characters).
pub const MAX_SERIAL_LENGTH: usize = 20;

/// Serial number reported when neither a custom string nor the
/// device-unique hardware ID is used.
pub const DEFAULT_SERIAL: &str = "00000000000000000001";

// Report IDs
//
// Defaults used when several report types share one HID interface.
// Zero is the "no report ID byte on the wire" sentinel.

pub const MOUSE_REPORT_ID: u8 = 1;
pub const KEYBOARD_REPORT_ID: u8 = 2;
pub const CONSUMER_REPORT_ID: u8 = 3;
pub const JOYSTICK_REPORT_ID: u8 = 4;
pub const RAW_REPORT_ID: u8 = 0;

// Transport

/// Consecutive zero-progress `tx` attempts tolerated by
/// [`HidReporter::send_report`](crate::hid::reporter::HidReporter::send_report)
/// before it gives up with
/// [`Error::TransportBusy`](crate::error::Error::TransportBusy).
pub const SEND_RETRY_LIMIT: u32 = 50_000;

// In-band reset protocol

/// Baud rate the host selects before toggling DTR to arm a reset.
pub const RESET_BAUD: u32 = 1200;

/// Magic token the host sends on the data stream to confirm the reset.
pub const RESET_MAGIC: [u8; 4] = *b"1EAF";
