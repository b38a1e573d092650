//! Composite device assembly: parts, plugins, and the peripheral
//! driver boundary.
//!
//! A *part* is one self-contained USB function (an HID interface, a
//! CDC-ACM function) contributing a pre-built descriptor fragment and
//! endpoint requirements. A *plugin* is a lifecycle extension that
//! registers parts on the device's behalf. The registry in
//! [`device::CompositeDevice`] assembles both into one
//! [`DeviceConfig`] handed to the external peripheral driver.

pub mod device;
pub mod strings;

use crate::config::MAX_PARTS;
use crate::error::Error;

/// One USB function's contribution to the composite device.
///
/// Registration order is significant: it fixes interface ordering on
/// the wire.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsbPart {
    /// Short label, for logs only.
    pub name: &'static str,
    /// Pre-built descriptor fragment (an HID report descriptor or a
    /// class-functional descriptor block). Never parsed here.
    pub descriptor: &'static [u8],
    pub num_interfaces: u8,
    pub num_endpoints: u8,
}

/// Ordered, fixed-capacity part registry.
///
/// Handed to plugins during [`UsbPlugin::register_parts`] so they can
/// contribute parts without owning the whole device.
#[derive(Default)]
pub struct PartTable {
    parts: heapless::Vec<UsbPart, MAX_PARTS>,
}

impl PartTable {
    pub const fn new() -> Self {
        Self {
            parts: heapless::Vec::new(),
        }
    }

    /// Append a part. Fails (and leaves the table untouched) once the
    /// fixed capacity is reached.
    pub fn add(&mut self, part: UsbPart) -> bool {
        self.parts.push(part).is_ok()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn as_slice(&self) -> &[UsbPart] {
        &self.parts
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.parts.truncate(len);
    }

    pub(crate) fn clear(&mut self) {
        self.parts.clear();
    }
}

/// Lifecycle extension point. Implementations register their parts in
/// [`register_parts`] and are told exactly once about `begin`/`end`
/// transitions via [`init`]/[`stop`].
///
/// [`register_parts`]: UsbPlugin::register_parts
/// [`init`]: UsbPlugin::init
/// [`stop`]: UsbPlugin::stop
pub trait UsbPlugin {
    fn init(&mut self) -> bool;
    fn stop(&mut self) -> bool;
    fn register_parts(&mut self, parts: &mut PartTable) -> bool;
}

/// The assembled identity and part set handed to the peripheral driver
/// at activation.
pub struct DeviceConfig<'a> {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Encoded USB string descriptors (length-prefixed, type 0x03).
    pub manufacturer: &'a [u8],
    pub product: &'a [u8],
    pub serial: &'a [u8],
    pub parts: &'a [UsbPart],
}

/// External USB peripheral driver boundary.
///
/// The driver owns enumeration, endpoint FIFOs and control transfers;
/// this crate only shapes the data it consumes.
pub trait CompositeDriver {
    /// Take the assembled configuration and enable the device. An
    /// `Err` (e.g. [`Error::DescriptorTooLarge`]) leaves the device
    /// inactive.
    fn enable(&mut self, config: &DeviceConfig<'_>) -> Result<(), Error>;

    /// Disable the device.
    fn disable(&mut self);

    /// Three word-sized reads of the hardware's unique-ID region, used
    /// for the optional device-unique serial string.
    fn unique_id(&self) -> [u32; 3];
}
