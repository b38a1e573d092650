//! CDC-ACM serial part: a byte stream that doubles as the carrier for
//! the in-band reset protocol.
//!
//! [`CompositeSerial`] wraps the driver's endpoint FIFOs in a
//! stream-shaped API and feeds every control-line notification and
//! inbound chunk to the [`reset::ResetDetector`].

pub mod reset;

use crate::config::SEND_RETRY_LIMIT;
use crate::error::Error;
use crate::usb::UsbPart;

use reset::{DtrState, ResetDetector, SystemReset};

/// CDC-ACM class-functional descriptor block (header, call management,
/// ACM, union), supplied pre-built as this part's contribution.
pub const CDC_ACM_FUNCTIONAL_DESCRIPTORS: &[u8] = &[
    0x05, 0x24, 0x00, 0x10, 0x01, // Header, CDC 1.10
    0x05, 0x24, 0x01, 0x00, 0x01, // Call Management, data iface 1
    0x04, 0x24, 0x02, 0x02, //       ACM, line coding + serial state
    0x05, 0x24, 0x06, 0x00, 0x01, // Union, comm iface 0 / data iface 1
];

/// CDC endpoint access provided by the external peripheral driver.
pub trait SerialTransport {
    /// Queue bytes on the data IN endpoint; returns the count accepted.
    fn tx(&mut self, data: &[u8]) -> usize;

    /// Drain pending bytes into `out`; returns the count copied.
    fn rx(&mut self, out: &mut [u8]) -> usize;

    /// Bytes waiting in the receive FIFO.
    fn available(&self) -> usize;

    /// Next pending byte without consuming it.
    fn peek(&self) -> Option<u8>;

    /// Block until queued TX bytes have left the device.
    fn flush_tx(&mut self);
}

/// Virtual serial channel plus reset-protocol observer.
pub struct CompositeSerial {
    detector: ResetDetector,
    dtr: bool,
    rts: bool,
    baud: u32,
}

impl CompositeSerial {
    pub const fn new() -> Self {
        Self {
            detector: ResetDetector::new(),
            dtr: false,
            rts: false,
            baud: 0,
        }
    }

    /// This function's part-table contribution: one communications
    /// interface and one data interface, three endpoints (notification
    /// IN, data IN, data OUT).
    pub const fn part() -> UsbPart {
        UsbPart {
            name: "cdc-acm",
            descriptor: CDC_ACM_FUNCTIONAL_DESCRIPTORS,
            num_interfaces: 2,
            num_endpoints: 3,
        }
    }

    // Stream API

    /// Write the whole buffer, looping while the transport accepts
    /// partial chunks. Gives up with [`Error::TransportBusy`] when the
    /// transport stops making progress.
    pub fn write(&mut self, transport: &mut dyn SerialTransport, data: &[u8]) -> Result<usize, Error> {
        let mut rest = data;
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
        transport.flush_tx();
        Ok(data.len())
    }

    pub fn read(&mut self, transport: &mut dyn SerialTransport, out: &mut [u8]) -> usize {
        transport.rx(out)
    }

    pub fn read_byte(&mut self, transport: &mut dyn SerialTransport) -> Option<u8> {
        let mut b = [0u8; 1];
        if transport.rx(&mut b) == 1 {
            Some(b[0])
        } else {
            None
        }
    }

    pub fn available(&self, transport: &dyn SerialTransport) -> usize {
        transport.available()
    }

    pub fn peek(&self, transport: &dyn SerialTransport) -> Option<u8> {
        transport.peek()
    }

    // Line state

    pub fn dtr(&self) -> bool {
        self.dtr
    }

    pub fn rts(&self) -> bool {
        self.rts
    }

    pub fn baud(&self) -> u32 {
        self.baud
    }

    /// A host terminal is attached (DTR asserted).
    pub fn is_connected(&self) -> bool {
        self.dtr
    }

    pub fn dtr_state(&self) -> DtrState {
        self.detector.state()
    }

    // Driver hook entry points
    //
    // Called by the driver glue from its control-transfer and receive
    // hooks. `on_rx` must not block: it runs in interrupt context on
    // most targets.

    /// SET_LINE_CODING arrived: record the selected baud rate.
    pub fn on_line_coding(&mut self, baud: u32) {
        self.baud = baud;
    }

    /// SET_CONTROL_LINE_STATE arrived: record the lines and advance
    /// the reset detector.
    pub fn on_control_line_state(&mut self, dtr: bool, rts: bool) {
        self.dtr = dtr;
        self.rts = rts;
        self.detector.on_control_line_state(dtr, self.baud);
    }

    /// Data arrived on the OUT endpoint. When the bytes complete the
    /// reset handshake, the platform reset primitive fires and this
    /// call never returns.
    pub fn on_rx(&mut self, data: &[u8], platform: &mut dyn SystemReset) {
        if self.detector.on_rx(data) {
            platform.reset_to_bootloader();
        }
    }
}

impl Default for CompositeSerial {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct LoopbackTransport {
        sent: std::vec::Vec<u8>,
        pending: std::vec::Vec<u8>,
        accept_limit: Option<usize>,
        flushes: usize,
    }

    impl SerialTransport for LoopbackTransport {
        fn tx(&mut self, data: &[u8]) -> usize {
            let n = self.accept_limit.map_or(data.len(), |l| data.len().min(l));
            self.sent.extend_from_slice(&data[..n]);
            n
        }

        fn rx(&mut self, out: &mut [u8]) -> usize {
            let n = self.pending.len().min(out.len());
            out[..n].copy_from_slice(&self.pending[..n]);
            self.pending.drain(..n);
            n
        }

        fn available(&self) -> usize {
            self.pending.len()
        }

        fn peek(&self) -> Option<u8> {
            self.pending.first().copied()
        }

        fn flush_tx(&mut self) {
            self.flushes += 1;
        }
    }

    struct PanicReset;
    impl SystemReset for PanicReset {
        fn reset_to_bootloader(&mut self) -> ! {
            panic!("reset fired");
        }
    }

    #[test]
    fn write_loops_over_partial_accepts() {
        let mut serial = CompositeSerial::new();
        let mut t = LoopbackTransport {
            accept_limit: Some(3),
            ..Default::default()
        };
        assert_eq!(serial.write(&mut t, b"hello world"), Ok(11));
        assert_eq!(t.sent, b"hello world");
        assert_eq!(t.flushes, 1);
    }

    #[test]
    fn read_and_peek_pass_through() {
        let mut serial = CompositeSerial::new();
        let mut t = LoopbackTransport::default();
        t.pending.extend_from_slice(b"ab");

        assert_eq!(serial.available(&t), 2);
        assert_eq!(serial.peek(&t), Some(b'a'));
        assert_eq!(serial.read_byte(&mut t), Some(b'a'));
        let mut out = [0u8; 8];
        assert_eq!(serial.read(&mut t, &mut out), 1);
        assert_eq!(out[0], b'b');
        assert_eq!(serial.read_byte(&mut t), None);
    }

    #[test]
    fn control_line_hooks_track_state() {
        let mut serial = CompositeSerial::new();
        serial.on_line_coding(115_200);
        serial.on_control_line_state(true, true);
        assert!(serial.dtr());
        assert!(serial.rts());
        assert!(serial.is_connected());
        assert_eq!(serial.baud(), 115_200);
        assert_eq!(serial.dtr_state(), DtrState::High);
    }

    #[test]
    #[should_panic(expected = "reset fired")]
    fn reset_handshake_fires_platform_primitive() {
        let mut serial = CompositeSerial::new();
        serial.on_line_coding(1200);
        serial.on_control_line_state(true, false);
        serial.on_control_line_state(false, false);
        serial.on_rx(b"1EAF", &mut PanicReset);
    }

    #[test]
    fn ordinary_traffic_does_not_reset() {
        let mut serial = CompositeSerial::new();
        serial.on_line_coding(115_200);
        serial.on_control_line_state(true, false);
        serial.on_rx(b"1EAF", &mut PanicReset);
        serial.on_control_line_state(false, false);
        serial.on_rx(b"1EAG", &mut PanicReset);
    }
}
