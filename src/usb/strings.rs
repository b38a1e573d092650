//! USB string descriptor generation.
//!
//! Descriptor layout: byte 0 = total length, byte 1 = type tag (0x03),
//! then 2 bytes per character (character, 0). Input beyond the cap is
//! dropped silently; the result is a valid descriptor even for an
//! empty source string.

use crate::config::MAX_SERIAL_LENGTH;

/// String-descriptor type tag (bDescriptorType).
pub const STRING_DESCRIPTOR_TYPE: u8 = 0x03;

/// Buffer size needed for a descriptor of `chars` characters.
pub const fn descriptor_len(chars: usize) -> usize {
    2 + 2 * chars
}

/// One pre-encoded USB string descriptor. `N` is the allocated byte
/// size; the character cap is `(N - 2) / 2`.
#[derive(Clone, Copy)]
pub struct StringDescriptor<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> StringDescriptor<N> {
    /// A valid descriptor encoding the empty string.
    pub const fn empty() -> Self {
        let mut bytes = [0u8; N];
        bytes[0] = 2;
        bytes[1] = STRING_DESCRIPTOR_TYPE;
        Self { bytes }
    }

    /// Encode `text`, truncating past the character cap.
    pub fn encode(text: &str) -> Self {
        let cap = (N - 2) / 2;
        let mut desc = Self::empty();
        let mut len = 0;
        for (i, c) in text.bytes().take(cap).enumerate() {
            desc.bytes[2 + 2 * i] = c;
            desc.bytes[3 + 2 * i] = 0;
            len = i + 1;
        }
        desc.bytes[0] = descriptor_len(len) as u8;
        desc
    }

    /// The encoded descriptor, trimmed to its length byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes[0] as usize]
    }

    /// Number of characters encoded.
    pub fn char_count(&self) -> usize {
        (self.bytes[0] as usize - 2) / 2
    }
}

/// Render the hardware unique-ID words as a 20-character hex serial,
/// low nibble first: 4 nibbles of the first word's low half, then 8
/// nibbles of each remaining word.
///
/// Using this reveals the device ID to the host, which burns it for
/// cryptographic purposes.
pub fn unique_serial(words: [u32; 3]) -> heapless::String<MAX_SERIAL_LENGTH> {
    let mut out = heapless::String::new();
    push_nibbles(&mut out, words[0] & 0xFFFF, 4);
    push_nibbles(&mut out, words[1], 8);
    push_nibbles(&mut out, words[2], 8);
    out
}

fn push_nibbles(out: &mut heapless::String<MAX_SERIAL_LENGTH>, mut id: u32, nibbles: usize) {
    for _ in 0..nibbles {
        let nibble = (id & 0xF) as u8;
        let c = if nibble <= 9 {
            nibble + b'0'
        } else {
            nibble - 10 + b'a'
        };
        // Capacity is exactly 20 = 4 + 8 + 8 nibbles.
        let _ = out.push(c as char);
        id >>= 4;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_descriptor_is_valid() {
        let desc = StringDescriptor::<66>::empty();
        assert_eq!(desc.as_bytes(), &[2, STRING_DESCRIPTOR_TYPE]);
        assert_eq!(desc.char_count(), 0);
    }

    #[test]
    fn encode_short_string() {
        let desc = StringDescriptor::<66>::encode("Ab");
        assert_eq!(
            desc.as_bytes(),
            &[6, STRING_DESCRIPTOR_TYPE, b'A', 0, b'b', 0]
        );
    }

    #[test]
    fn encode_truncates_at_cap() {
        // 40 input characters against a 32-character cap.
        let long = "0123456789012345678901234567890123456789";
        assert_eq!(long.len(), 40);
        let desc = StringDescriptor::<{ descriptor_len(32) }>::encode(long);
        assert_eq!(desc.char_count(), 32);
        assert_eq!(desc.as_bytes()[0], (2 + 2 * 32) as u8);
        assert_eq!(desc.as_bytes().len(), 66);
        // Last encoded character is input index 31.
        assert_eq!(desc.as_bytes()[2 + 2 * 31], b'1');
    }

    #[test]
    fn encode_empty_string_yields_valid_descriptor() {
        let desc = StringDescriptor::<42>::encode("");
        assert_eq!(desc.as_bytes(), &[2, STRING_DESCRIPTOR_TYPE]);
    }

    #[test]
    fn unique_serial_formats_twenty_nibbles() {
        let s = unique_serial([0xFFFF_1234, 0x89AB_CDEF, 0x0000_00FF]);
        assert_eq!(s.len(), 20);
        // Low nibble first: 0x1234 -> "4321".
        assert!(s.starts_with("4321"));
        assert!(s[4..12].starts_with("fedcba98"));
        assert_eq!(&s[12..], "ff000000");
    }
}
