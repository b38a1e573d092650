//! Printable-ASCII to HID usage translation for the keyboard encoder.
//!
//! Each entry is a Keyboard/Keypad usage code (page 0x07), with bit 7
//! ([`SHIFT`]) set when the character needs the Shift modifier held.
//! Zero means the character has no mapping.

/// Flag bit: the mapped usage requires Left Shift.
pub const SHIFT: u8 = 0x80;

// Modifier usages (Keyboard/Keypad page 0xE0..=0xE7). Passing one of
// these to `HidKeyboard::press` toggles the corresponding modifier bit
// instead of occupying a key slot.
pub const KEY_LEFT_CTRL: u8 = 0xE0;
pub const KEY_LEFT_SHIFT: u8 = 0xE1;
pub const KEY_LEFT_ALT: u8 = 0xE2;
pub const KEY_LEFT_GUI: u8 = 0xE3;
pub const KEY_RIGHT_CTRL: u8 = 0xE4;
pub const KEY_RIGHT_SHIFT: u8 = 0xE5;
pub const KEY_RIGHT_ALT: u8 = 0xE6;
pub const KEY_RIGHT_GUI: u8 = 0xE7;

// Common non-printable usages.
pub const KEY_RETURN: u8 = 0x28;
pub const KEY_ESC: u8 = 0x29;
pub const KEY_BACKSPACE: u8 = 0x2A;
pub const KEY_TAB: u8 = 0x2B;
pub const KEY_CAPS_LOCK: u8 = 0x39;
pub const KEY_F1: u8 = 0x3A;
pub const KEY_F2: u8 = 0x3B;
pub const KEY_F3: u8 = 0x3C;
pub const KEY_F4: u8 = 0x3D;
pub const KEY_F5: u8 = 0x3E;
pub const KEY_F6: u8 = 0x3F;
pub const KEY_F7: u8 = 0x40;
pub const KEY_F8: u8 = 0x41;
pub const KEY_F9: u8 = 0x42;
pub const KEY_F10: u8 = 0x43;
pub const KEY_F11: u8 = 0x44;
pub const KEY_F12: u8 = 0x45;
pub const KEY_INSERT: u8 = 0x49;
pub const KEY_HOME: u8 = 0x4A;
pub const KEY_PAGE_UP: u8 = 0x4B;
pub const KEY_DELETE: u8 = 0x4C;
pub const KEY_END: u8 = 0x4D;
pub const KEY_PAGE_DOWN: u8 = 0x4E;
pub const KEY_RIGHT_ARROW: u8 = 0x4F;
pub const KEY_LEFT_ARROW: u8 = 0x50;
pub const KEY_DOWN_ARROW: u8 = 0x51;
pub const KEY_UP_ARROW: u8 = 0x52;

/// 128-entry ASCII translation table.
#[rustfmt::skip]
pub const ASCII_MAP: [u8; 128] = [
    0x00,          // NUL
    0x00,          // SOH
    0x00,          // STX
    0x00,          // ETX
    0x00,          // EOT
    0x00,          // ENQ
    0x00,          // ACK
    0x00,          // BEL
    0x2A,          // BS   Backspace
    0x2B,          // TAB  Tab
    0x28,          // LF   Enter
    0x00,          // VT
    0x00,          // FF
    0x00,          // CR
    0x00,          // SO
    0x00,          // SI
    0x00,          // DLE
    0x00,          // DC1
    0x00,          // DC2
    0x00,          // DC3
    0x00,          // DC4
    0x00,          // NAK
    0x00,          // SYN
    0x00,          // ETB
    0x00,          // CAN
    0x00,          // EM
    0x00,          // SUB
    0x00,          // ESC
    0x00,          // FS
    0x00,          // GS
    0x00,          // RS
    0x00,          // US
    0x2C,          // ' '
    0x1E | SHIFT,  // !
    0x34 | SHIFT,  // "
    0x20 | SHIFT,  // #
    0x21 | SHIFT,  // $
    0x22 | SHIFT,  // %
    0x24 | SHIFT,  // &
    0x34,          // '
    0x26 | SHIFT,  // (
    0x27 | SHIFT,  // )
    0x25 | SHIFT,  // *
    0x2E | SHIFT,  // +
    0x36,          // ,
    0x2D,          // -
    0x37,          // .
    0x38,          // /
    0x27,          // 0
    0x1E,          // 1
    0x1F,          // 2
    0x20,          // 3
    0x21,          // 4
    0x22,          // 5
    0x23,          // 6
    0x24,          // 7
    0x25,          // 8
    0x26,          // 9
    0x33 | SHIFT,  // :
    0x33,          // ;
    0x36 | SHIFT,  // <
    0x2E,          // =
    0x37 | SHIFT,  // >
    0x38 | SHIFT,  // ?
    0x1F | SHIFT,  // @
    0x04 | SHIFT,  // A
    0x05 | SHIFT,  // B
    0x06 | SHIFT,  // C
    0x07 | SHIFT,  // D
    0x08 | SHIFT,  // E
    0x09 | SHIFT,  // F
    0x0A | SHIFT,  // G
    0x0B | SHIFT,  // H
    0x0C | SHIFT,  // I
    0x0D | SHIFT,  // J
    0x0E | SHIFT,  // K
    0x0F | SHIFT,  // L
    0x10 | SHIFT,  // M
    0x11 | SHIFT,  // N
    0x12 | SHIFT,  // O
    0x13 | SHIFT,  // P
    0x14 | SHIFT,  // Q
    0x15 | SHIFT,  // R
    0x16 | SHIFT,  // S
    0x17 | SHIFT,  // T
    0x18 | SHIFT,  // U
    0x19 | SHIFT,  // V
    0x1A | SHIFT,  // W
    0x1B | SHIFT,  // X
    0x1C | SHIFT,  // Y
    0x1D | SHIFT,  // Z
    0x2F,          // [
    0x31,          // backslash
    0x30,          // ]
    0x23 | SHIFT,  // ^
    0x2D | SHIFT,  // _
    0x35,          // `
    0x04,          // a
    0x05,          // b
    0x06,          // c
    0x07,          // d
    0x08,          // e
    0x09,          // f
    0x0A,          // g
    0x0B,          // h
    0x0C,          // i
    0x0D,          // j
    0x0E,          // k
    0x0F,          // l
    0x10,          // m
    0x11,          // n
    0x12,          // o
    0x13,          // p
    0x14,          // q
    0x15,          // r
    0x16,          // s
    0x17,          // t
    0x18,          // u
    0x19,          // v
    0x1A,          // w
    0x1B,          // x
    0x1C,          // y
    0x1D,          // z
    0x2F | SHIFT,  // {
    0x31 | SHIFT,  // |
    0x30 | SHIFT,  // }
    0x35 | SHIFT,  // ~
    0x00,          // DEL
];

/// Look up the (possibly shifted) usage for a printable ASCII byte.
/// `None` for characters outside the mapped range.
pub fn lookup(c: u8) -> Option<u8> {
    let entry = *ASCII_MAP.get(c as usize)?;
    if entry == 0 {
        None
    } else {
        Some(entry)
    }
}
