//! HID report framing and the typed report encoders.
//!
//! [`reporter::HidReporter`] owns one report buffer and knows how to
//! frame it (with or without a leading report-ID byte) and push it to
//! the transport. The typed encoders (mouse, keyboard, consumer,
//! joystick, raw) each compose one reporter over a usage-specific
//! layout and expose semantic mutators.

pub mod consumer;
pub mod descriptors;
pub mod joystick;
pub mod keyboard;
pub mod keymap;
pub mod mouse;
pub mod raw;
pub mod reporter;


/// Report retrieval blocking behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Poll {
    /// Spin until a report is available.
    Wait,
    /// Return immediately; zero bytes means nothing pending.
    NoWait,
}

/// Host-to-device report classes retrievable through the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportType {
    Feature,
    Output,
}

/// HID endpoint access provided by the external peripheral driver.
///
/// Implementations are expected to be called from a single owning
/// context; none of these methods are reentrancy-safe.
pub trait HidTransport {
    /// Queue up to `data.len()` bytes on the HID IN endpoint.
    ///
    /// Returns the number of bytes accepted, which may be less than
    /// offered when the endpoint FIFO is full. An empty `data` slice
    /// requests a zero-length packet (flush).
    fn tx(&mut self, data: &[u8]) -> usize;

    /// Retrieve a pending feature or output report for `report_id`.
    ///
    /// With [`Poll::Wait`] the call blocks until a report arrives; with
    /// [`Poll::NoWait`] it copies whatever is pending and returns the
    /// byte count, zero if nothing is queued.
    fn get_data(&mut self, kind: ReportType, report_id: u8, out: &mut [u8], poll: Poll) -> usize;

    /// Push a feature report (e.g. LED state echo) tagged with `report_id`.
    fn set_feature(&mut self, report_id: u8, data: &[u8]);
}
