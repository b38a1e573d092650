//! End-to-end scenario: assemble a composite device, activate it
//! against a mock peripheral driver, drive the encoders, and walk the
//! host reset handshake.

use usb_composite::hid::descriptors::KEYBOARD_MOUSE_REPORT_DESCRIPTOR;
use usb_composite::{
    hid_part, CompositeDevice, CompositeDriver, CompositeSerial, DeviceConfig, Error, HidKeyboard,
    HidMouse, HidTransport, Poll, ReportType, SystemReset,
};

#[derive(Default)]
struct MockDriver {
    enabled: bool,
    part_names: Vec<String>,
    manufacturer: Vec<u8>,
}

impl CompositeDriver for MockDriver {
    fn enable(&mut self, config: &DeviceConfig<'_>) -> Result<(), Error> {
        self.part_names = config
            .parts
            .iter()
            .map(|p| p.name.to_string())
            .collect();
        self.manufacturer = config.manufacturer.to_vec();
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn unique_id(&self) -> [u32; 3] {
        [0, 0, 0]
    }
}

#[derive(Default)]
struct MockHidTransport {
    frames: Vec<Vec<u8>>,
    current: Vec<u8>,
}

impl HidTransport for MockHidTransport {
    fn tx(&mut self, data: &[u8]) -> usize {
        if data.is_empty() {
            self.frames.push(std::mem::take(&mut self.current));
            return 0;
        }
        self.current.extend_from_slice(data);
        data.len()
    }

    fn get_data(&mut self, _: ReportType, _: u8, _: &mut [u8], _: Poll) -> usize {
        0
    }

    fn set_feature(&mut self, _: u8, _: &[u8]) {}
}

struct PanicReset;

impl SystemReset for PanicReset {
    fn reset_to_bootloader(&mut self) -> ! {
        panic!("rebooting into bootloader");
    }
}

#[test]
fn composite_device_with_hid_and_serial() {
    let mut dev = CompositeDevice::new();
    dev.set_vendor_id(0x1EAF);
    dev.set_product_id(0x0024);
    dev.set_manufacturer_string("LeafLabs");
    dev.set_product_string("Composite HID");

    assert!(dev.add_part(hid_part(KEYBOARD_MOUSE_REPORT_DESCRIPTOR)));
    assert!(dev.add_part(CompositeSerial::part()));

    let mut driver = MockDriver::default();
    dev.begin(&mut driver).expect("driver accepted the config");
    assert!(driver.enabled);
    assert_eq!(driver.part_names, ["hid", "cdc-acm"]);
    // "LeafLabs" -> 2 + 2*8 descriptor bytes.
    assert_eq!(driver.manufacturer.len(), 18);

    // Type and click over the shared HID interface.
    let mut transport = MockHidTransport::default();
    let mut keyboard = HidKeyboard::default();
    let mut mouse = HidMouse::default();

    assert_eq!(keyboard.write_str(&mut transport, "Hi"), 2);
    mouse.click(&mut transport, 1).unwrap();

    // Two pulses of two reports each, then press + release.
    assert_eq!(transport.frames.len(), 6);
    // Keyboard reports carry report ID 2, mouse reports ID 1.
    assert_eq!(transport.frames[0][0], 2);
    assert_eq!(transport.frames[4][0], 1);

    dev.end(&mut driver);
    assert!(!driver.enabled);

    // Inactive again: clear drops identity and parts.
    dev.clear();
    assert_eq!(dev.num_parts(), 0);
}

#[test]
#[should_panic(expected = "rebooting into bootloader")]
fn host_reset_handshake_reboots_device() {
    let mut serial = CompositeSerial::new();

    // Host opens the port at 1200 baud, raises then drops DTR, and
    // sends the magic token.
    serial.on_line_coding(1200);
    serial.on_control_line_state(true, false);
    serial.on_control_line_state(false, false);
    serial.on_rx(b"1EAF", &mut PanicReset);
}

#[test]
fn reset_handshake_requires_the_arming_edge() {
    let mut serial = CompositeSerial::new();

    // Token alone, no DTR edge at 1200 baud: device keeps running.
    serial.on_line_coding(1200);
    serial.on_rx(b"1EAF", &mut PanicReset);

    // Edge at the wrong baud rate: still no reset.
    serial.on_line_coding(115_200);
    serial.on_control_line_state(true, false);
    serial.on_control_line_state(false, false);
    serial.on_rx(b"1EAF", &mut PanicReset);
}
