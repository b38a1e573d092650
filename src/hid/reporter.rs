//! Report codec: frames one fixed-size HID report and moves it across
//! the transport.
//!
//! The buffer layout depends on how the reporter is constructed:
//!
//! ```text
//! with_report_id(id != 0):  [id | payload ...]   frame = whole buffer
//! with_report_id(0):        [ 0 | payload ...]   frame skips byte 0
//! without_report_id():      [payload ........]   frame = whole buffer
//! ```
//!
//! With the zero sentinel no ID byte ever reaches the wire and the
//! effective report size is one less than the allocated buffer.

use crate::config::SEND_RETRY_LIMIT;
use crate::error::Error;
use crate::hid::{HidTransport, Poll, ReportType};

/// One HID report buffer plus its framing rules.
///
/// `N` is the allocated buffer size including the report-ID slot when
/// one exists. The buffer is embedded, zeroed at construction, and
/// mutated in place for the reporter's lifetime.
pub struct HidReporter<const N: usize> {
    buf: [u8; N],
    report_id: u8,
    has_id_slot: bool,
}

impl<const N: usize> HidReporter<N> {
    /// Construction contract A: byte 0 of the buffer is the report-ID
    /// slot. A non-zero `report_id` is written there once and stays
    /// stable across sends; the zero sentinel shifts the frame window
    /// past it instead.
    pub fn with_report_id(report_id: u8) -> Self {
        let mut buf = [0u8; N];
        if N > 0 && report_id != 0 {
            buf[0] = report_id;
        }
        Self {
            buf,
            report_id,
            has_id_slot: true,
        }
    }

    /// Construction contract B: the whole buffer is payload and no
    /// report-ID concept exists on this channel.
    pub fn without_report_id() -> Self {
        Self {
            buf: [0u8; N],
            report_id: 0,
            has_id_slot: false,
        }
    }

    /// The report ID this channel is tagged with (0 = none).
    pub fn report_id(&self) -> u8 {
        self.report_id
    }

    /// Effective number of bytes that reach the wire per report.
    pub fn size(&self) -> usize {
        self.frame().len()
    }

    /// The bytes actually transmitted: skips the unused ID slot when
    /// the report ID is the zero sentinel.
    pub fn frame(&self) -> &[u8] {
        if self.has_id_slot && self.report_id == 0 {
            &self.buf[1..]
        } else {
            &self.buf
        }
    }

    /// Payload bytes after the report-ID slot, at stable offsets
    /// regardless of the ID value. Encoders write their fields here.
    pub fn payload_mut(&mut self) -> &mut [u8] {
        if self.has_id_slot {
            &mut self.buf[1..]
        } else {
            &mut self.buf
        }
    }

    /// Read-only view of the payload.
    pub fn payload(&self) -> &[u8] {
        if self.has_id_slot {
            &self.buf[1..]
        } else {
            &self.buf
        }
    }

    /// Transmit the full effective frame, looping while the transport
    /// accepts partial chunks, then push a zero-length packet so the
    /// host does not wait for a short packet.
    ///
    /// At most one report is in flight per call. A transport that stops
    /// making progress for [`SEND_RETRY_LIMIT`] consecutive attempts
    /// fails the call with [`Error::TransportBusy`] instead of hanging.
    pub fn send_report(&self, transport: &mut dyn HidTransport) -> Result<(), Error> {
        let mut rest = self.frame();
        let mut stalled: u32 = 0;
        while !rest.is_empty() {
            let accepted = transport.tx(rest);
            if accepted == 0 {
                stalled += 1;
                if stalled >= SEND_RETRY_LIMIT {
                    return Err(Error::TransportBusy);
                }
                continue;
            }
            stalled = 0;
            rest = &rest[accepted..];
        }
        // Flush out to avoid having the host wait for more data.
        transport.tx(&[]);
        Ok(())
    }

    /// Pull a feature or output report of this channel's report ID.
    /// Returns the byte count; zero means nothing pending under
    /// [`Poll::NoWait`].
    pub fn get_data(
        &self,
        transport: &mut dyn HidTransport,
        kind: ReportType,
        out: &mut [u8],
        poll: Poll,
    ) -> usize {
        transport.get_data(kind, self.report_id, out, poll)
    }

    /// Pull a feature report of this channel's report ID.
    pub fn get_feature(&self, transport: &mut dyn HidTransport, out: &mut [u8], poll: Poll) -> usize {
        self.get_data(transport, ReportType::Feature, out, poll)
    }

    /// Pull an output report of this channel's report ID.
    pub fn get_output(&self, transport: &mut dyn HidTransport, out: &mut [u8], poll: Poll) -> usize {
        self.get_data(transport, ReportType::Output, out, poll)
    }

    /// Push a feature report tagged with this channel's report ID.
    pub fn set_feature(&self, transport: &mut dyn HidTransport, data: &[u8]) {
        transport.set_feature(self.report_id, data);
    }
}
