//! Raw HID channel - fixed-size opaque reports in both directions.
//!
//! Outbound data is zero-padded or truncated to the `TX`-byte transmit
//! buffer. Inbound reports land in a non-blocking receive latch fed by
//! the driver glue ([`HidRaw::push_output`]); they do not travel
//! through the codec get-path.

use crate::error::Error;
use crate::hid::reporter::HidReporter;
use crate::hid::HidTransport;

pub struct HidRaw<const TX: usize, const RX: usize> {
    reporter: HidReporter<TX>,
    rx_buf: [u8; RX],
    rx_len: usize,
}

impl<const TX: usize, const RX: usize> HidRaw<TX, RX> {
    pub fn new() -> Self {
        Self {
            // No report-ID concept on a raw channel.
            reporter: HidReporter::without_report_id(),
            rx_buf: [0u8; RX],
            rx_len: 0,
        }
    }

    /// Transmit `data`, zero-padded or truncated to `TX` bytes.
    pub fn send(&mut self, transport: &mut dyn HidTransport, data: &[u8]) -> Result<(), Error> {
        let payload = self.reporter.payload_mut();
        payload.fill(0);
        let n = data.len().min(TX);
        payload[..n].copy_from_slice(&data[..n]);
        self.reporter.send_report(transport)
    }

    /// Driver glue entry point: an output report arrived from the host.
    /// Oversized reports are truncated to `RX` bytes.
    pub fn push_output(&mut self, report: &[u8]) {
        let n = report.len().min(RX);
        self.rx_buf[..n].copy_from_slice(&report[..n]);
        self.rx_len = n;
    }

    /// Take the most recent inbound report, non-blocking. Returns the
    /// byte count copied into `out`; zero when nothing is pending.
    pub fn recv(&mut self, out: &mut [u8]) -> usize {
        let n = self.rx_len.min(out.len());
        out[..n].copy_from_slice(&self.rx_buf[..n]);
        self.rx_len = 0;
        n
    }
}

impl<const TX: usize, const RX: usize> Default for HidRaw<TX, RX> {
    fn default() -> Self {
        Self::new()
    }
}
