//! Unified error type for usb-composite.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the crate.
///
/// Most recoverable conditions (table capacity, empty non-blocking
/// reads) are reported through `bool`/byte-count return values instead;
/// `Error` covers the paths where a plain flag would lose information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The peripheral driver stopped accepting bytes and the bounded
    /// retry budget ran out.
    TransportBusy,

    /// The peripheral driver rejected the assembled configuration
    /// (e.g. the combined descriptor set does not fit).
    DescriptorTooLarge,

    /// The driver refused to enable the device for another reason.
    DriverRejected,

    /// A fixed-capacity table is full.
    CapacityExceeded,
}
