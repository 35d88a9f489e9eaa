//! Number formatting for text records, written straight into byte buffers.

/// Lower-case hex digits.
const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Write a u16 as exactly 4 lower-case hex digits.
///
/// Returns the number of bytes written (always 4).
///
/// # Panics
///
/// Panics if `buf.len() < 4`.
#[inline]
pub fn write_hex_u16(buf: &mut [u8], value: u16) -> usize {
    debug_assert!(buf.len() >= 4, "buffer too small for hex u16");
    buf[0] = HEX_DIGITS[((value >> 12) & 0xF) as usize];
    buf[1] = HEX_DIGITS[((value >> 8) & 0xF) as usize];
    buf[2] = HEX_DIGITS[((value >> 4) & 0xF) as usize];
    buf[3] = HEX_DIGITS[(value & 0xF) as usize];
    4
}

/// Write a u8 as lower-case hex without leading zeros (`0`, `7f`, `ff`).
///
/// Returns the number of bytes written (1-2 bytes).
///
/// # Panics
///
/// Panics if `buf.len() < 2`.
#[inline]
pub fn write_hex_u8(buf: &mut [u8], value: u8) -> usize {
    debug_assert!(buf.len() >= 2, "buffer too small for hex u8");
    if value < 0x10 {
        buf[0] = HEX_DIGITS[value as usize];
        return 1;
    }
    buf[0] = HEX_DIGITS[(value >> 4) as usize];
    buf[1] = HEX_DIGITS[(value & 0xF) as usize];
    2
}

/// Write a u8 as an unsigned decimal string.
///
/// Returns the number of bytes written (1-3 bytes).
///
/// # Panics
///
/// Panics if `buf.len() < 3` (max size: "255").
#[inline]
pub fn write_u8(buf: &mut [u8], value: u8) -> usize {
    debug_assert!(buf.len() >= 3, "buffer too small for u8");

    if value == 0 {
        buf[0] = b'0';
        return 1;
    }

    // Write digits in reverse order to temporary buffer
    let mut temp = [0u8; 3];
    let mut n = value;
    let mut len = 0;
    while n > 0 {
        temp[len] = b'0' + (n % 10);
        n /= 10;
        len += 1;
    }

    for i in 0..len {
        buf[i] = temp[len - 1 - i];
    }

    len
}
