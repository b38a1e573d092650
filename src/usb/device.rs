//! The composite device registry.
//!
//! Holds the device identity (vendor/product IDs plus the three
//! descriptor strings) and the ordered part/plugin tables, and drives
//! the activation lifecycle against the external peripheral driver.

use crate::config::{
    DEFAULT_SERIAL, MAX_MANUFACTURER_LENGTH, MAX_PLUGINS, MAX_PRODUCT_LENGTH, MAX_SERIAL_LENGTH,
};
use crate::error::Error;
use crate::usb::strings::{descriptor_len, StringDescriptor};
use crate::usb::{CompositeDriver, DeviceConfig, PartTable, UsbPart, UsbPlugin};

type ManufacturerString = StringDescriptor<{ descriptor_len(MAX_MANUFACTURER_LENGTH) }>;
type ProductString = StringDescriptor<{ descriptor_len(MAX_PRODUCT_LENGTH) }>;
type SerialString = StringDescriptor<{ descriptor_len(MAX_SERIAL_LENGTH) }>;

/// Composite USB device: identity + parts + plugins.
///
/// Identity is set before activation and immutable while active.
/// `begin`/`end` are idempotent; `clear` is a no-op while active.
pub struct CompositeDevice<'a> {
    vendor_id: u16,
    product_id: u16,
    manufacturer: ManufacturerString,
    product: ProductString,
    serial: SerialString,
    parts: PartTable,
    plugins: heapless::Vec<&'a mut dyn UsbPlugin, MAX_PLUGINS>,
    enabled: bool,
}

impl<'a> CompositeDevice<'a> {
    pub fn new() -> Self {
        Self {
            vendor_id: 0,
            product_id: 0,
            manufacturer: ManufacturerString::empty(),
            product: ProductString::empty(),
            serial: SerialString::encode(DEFAULT_SERIAL),
            parts: PartTable::new(),
            plugins: heapless::Vec::new(),
            enabled: false,
        }
    }

    pub fn set_vendor_id(&mut self, vendor_id: u16) {
        self.vendor_id = vendor_id;
    }

    pub fn set_product_id(&mut self, product_id: u16) {
        self.product_id = product_id;
    }

    /// Encode the manufacturer string (capped at 32 characters).
    pub fn set_manufacturer_string(&mut self, manufacturer: &str) {
        self.manufacturer = ManufacturerString::encode(manufacturer);
    }

    /// Encode the product string (capped at 32 characters).
    pub fn set_product_string(&mut self, product: &str) {
        self.product = ProductString::encode(product);
    }

    /// Encode the serial string (capped at 20 characters).
    pub fn set_serial_string(&mut self, serial: &str) {
        self.serial = SerialString::encode(serial);
    }

    /// Use the hardware unique ID as the serial string.
    pub fn set_unique_serial(&mut self, driver: &dyn CompositeDriver) {
        let serial = crate::usb::strings::unique_serial(driver.unique_id());
        self.serial = SerialString::encode(&serial);
    }

    /// Append a part. Order determines interface ordering on the wire.
    /// Returns `false` once the part table is full.
    pub fn add_part(&mut self, part: UsbPart) -> bool {
        self.parts.add(part)
    }

    /// Append a plugin; nothing is invoked until [`begin`].
    /// Returns `false` once the plugin table is full.
    ///
    /// [`begin`]: CompositeDevice::begin
    pub fn add_plugin(&mut self, plugin: &'a mut dyn UsbPlugin) -> bool {
        self.plugins.push(plugin).is_ok()
    }

    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Reset identity to construction defaults and empty both tables.
    /// No-op while the device is active.
    pub fn clear(&mut self) {
        if self.enabled {
            return;
        }
        self.vendor_id = 0;
        self.product_id = 0;
        self.manufacturer = ManufacturerString::empty();
        self.product = ProductString::empty();
        self.serial = SerialString::encode(DEFAULT_SERIAL);
        self.parts.clear();
        self.plugins.clear();
    }

    /// Activate: run plugin `init`/`register_parts`, hand the assembled
    /// configuration to the driver and mark active.
    ///
    /// Idempotent - returns `Ok` immediately while already active. If
    /// the driver rejects the configuration the device stays inactive
    /// and plugin-registered parts are rolled back.
    pub fn begin(&mut self, driver: &mut dyn CompositeDriver) -> Result<(), Error> {
        if self.enabled {
            return Ok(());
        }

        let app_parts = self.parts.len();
        let Self { plugins, parts, .. } = self;
        for plugin in plugins.iter_mut() {
            plugin.init();
            plugin.register_parts(parts);
        }

        let config = DeviceConfig {
            vendor_id: self.vendor_id,
            product_id: self.product_id,
            manufacturer: self.manufacturer.as_bytes(),
            product: self.product.as_bytes(),
            serial: self.serial.as_bytes(),
            parts: self.parts.as_slice(),
        };
        match driver.enable(&config) {
            Ok(()) => {
                self.enabled = true;
                #[cfg(feature = "defmt")]
                defmt::info!("usb composite enabled: {} parts", self.parts.len());
                Ok(())
            }
            Err(e) => {
                self.parts.truncate(app_parts);
                Err(e)
            }
        }
    }

    /// Deactivate: run plugin `stop`, disable the driver, mark
    /// inactive. No-op while already inactive.
    pub fn end(&mut self, driver: &mut dyn CompositeDriver) {
        if !self.enabled {
            return;
        }
        for plugin in self.plugins.iter_mut() {
            plugin.stop();
        }
        driver.disable();
        self.enabled = false;
        #[cfg(feature = "defmt")]
        defmt::info!("usb composite disabled");
    }
}

impl Default for CompositeDevice<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_PARTS;
    use crate::hid::descriptors::MOUSE_REPORT_DESCRIPTOR;

    struct FakeDriver {
        enabled: bool,
        reject: bool,
        enable_calls: usize,
        seen_parts: usize,
        seen_serial_len: usize,
    }

    impl FakeDriver {
        fn new() -> Self {
            Self {
                enabled: false,
                reject: false,
                enable_calls: 0,
                seen_parts: 0,
                seen_serial_len: 0,
            }
        }
    }

    impl CompositeDriver for FakeDriver {
        fn enable(&mut self, config: &DeviceConfig<'_>) -> Result<(), Error> {
            self.enable_calls += 1;
            self.seen_parts = config.parts.len();
            self.seen_serial_len = config.serial.len();
            if self.reject {
                return Err(Error::DescriptorTooLarge);
            }
            self.enabled = true;
            Ok(())
        }

        fn disable(&mut self) {
            self.enabled = false;
        }

        fn unique_id(&self) -> [u32; 3] {
            [0x0000_5678, 0x1111_2222, 0x3333_4444]
        }
    }

    fn part() -> UsbPart {
        UsbPart {
            name: "hid",
            descriptor: MOUSE_REPORT_DESCRIPTOR,
            num_interfaces: 1,
            num_endpoints: 1,
        }
    }

    #[test]
    fn parts_beyond_capacity_are_rejected() {
        let mut dev = CompositeDevice::new();
        for _ in 0..MAX_PARTS {
            assert!(dev.add_part(part()));
        }
        assert!(!dev.add_part(part()));
        assert_eq!(dev.num_parts(), MAX_PARTS);

        // The device still activates with the parts registered so far.
        let mut driver = FakeDriver::new();
        assert!(dev.begin(&mut driver).is_ok());
        assert_eq!(driver.seen_parts, MAX_PARTS);
    }

    #[test]
    fn begin_is_idempotent() {
        let mut dev = CompositeDevice::new();
        dev.add_part(part());
        let mut driver = FakeDriver::new();
        assert!(dev.begin(&mut driver).is_ok());
        assert!(dev.begin(&mut driver).is_ok());
        assert_eq!(driver.enable_calls, 1);
        assert!(dev.is_enabled());
    }

    #[test]
    fn end_while_inactive_is_noop() {
        let mut dev = CompositeDevice::new();
        let mut driver = FakeDriver::new();
        dev.end(&mut driver);
        assert!(!dev.is_enabled());
    }

    #[test]
    fn failed_begin_leaves_device_inactive() {
        let mut dev = CompositeDevice::new();
        dev.add_part(part());
        let mut driver = FakeDriver::new();
        driver.reject = true;
        assert_eq!(dev.begin(&mut driver), Err(Error::DescriptorTooLarge));
        assert!(!dev.is_enabled());

        // A later attempt against a working driver succeeds.
        driver.reject = false;
        assert!(dev.begin(&mut driver).is_ok());
        assert!(dev.is_enabled());
    }

    #[test]
    fn clear_is_noop_while_active() {
        let mut dev = CompositeDevice::new();
        dev.set_vendor_id(0x1209);
        dev.add_part(part());
        let mut driver = FakeDriver::new();
        dev.begin(&mut driver).unwrap();

        dev.clear();
        assert_eq!(dev.num_parts(), 1);

        dev.end(&mut driver);
        dev.clear();
        assert_eq!(dev.num_parts(), 0);
        assert!(!dev.is_enabled());
    }

    #[test]
    fn plugin_lifecycle_and_part_registration() {
        struct Plugin {
            inits: usize,
            stops: usize,
        }
        impl UsbPlugin for Plugin {
            fn init(&mut self) -> bool {
                self.inits += 1;
                true
            }
            fn stop(&mut self) -> bool {
                self.stops += 1;
                true
            }
            fn register_parts(&mut self, parts: &mut PartTable) -> bool {
                parts.add(UsbPart {
                    name: "plugin-part",
                    descriptor: &[],
                    num_interfaces: 1,
                    num_endpoints: 1,
                })
            }
        }

        let mut plugin = Plugin { inits: 0, stops: 0 };
        let mut dev = CompositeDevice::new();
        dev.add_part(part());
        assert!(dev.add_plugin(&mut plugin));

        let mut driver = FakeDriver::new();
        dev.begin(&mut driver).unwrap();
        assert_eq!(driver.seen_parts, 2);
        dev.end(&mut driver);
        drop(dev);

        assert_eq!(plugin.inits, 1);
        assert_eq!(plugin.stops, 1);
    }

    #[test]
    fn unique_serial_from_driver() {
        let mut dev = CompositeDevice::new();
        let mut driver = FakeDriver::new();
        dev.set_unique_serial(&driver);
        dev.add_part(part());
        dev.begin(&mut driver).unwrap();
        // 20 hex characters -> 2 + 2*20 descriptor bytes.
        assert_eq!(driver.seen_serial_len, 42);
    }
}
