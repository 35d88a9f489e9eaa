//! Wire encoders for [`ControllerState`].
//!
//! Three record layouts are produced from the same state:
//!
//! ## Text (`DeviceFormat::Text`)
//!
//! ```text
//! 0x<bits> <hat>[ <lx> <ly>][ <rx> <ry>]
//! ```
//!
//! - `bits` - button bitmask shifted left by 2, bit 1 = left stick group
//!   present, bit 0 = right stick group present; 4 lower-case hex digits
//! - `hat` - hat code in decimal
//! - stick groups - lower-case hex without padding, only for sticks that
//!   changed since the previous record
//!
//! ## Qingpi (`DeviceFormat::Qingpi`), 11 bytes
//!
//! ```text
//! AB  btn_lo btn_hi  hat  lx ly  80 80  tx_lo tx_hi ty
//! ```
//!
//! The right stick is not carried; its slot is a fixed `(128, 128)`.
//!
//! ## 3DS controller (`DeviceFormat::ThreeDs`), 6 bytes
//!
//! ```text
//! A1  (btn[0..4] << 4 | hat4)  btn[4..10]  A2  lx' ly'
//! ```
//!
//! `hat4` is the compact compass code. Stick bytes below 128 are mirrored
//! (`127 - v`). No right stick, no touch.
//!
//! Every encoder reads and clears the stick changed flags.
//!
//! # Example
//!
//! ```
//! use pokecon_proto::{Button, ConversionTable, ControllerState};
//!
//! let mut state = ControllerState::new();
//! state.set_buttons([Button::A], &ConversionTable::DEFAULT);
//!
//! let mut buf = [0u8; 32];
//! let len = state.serialize_text(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"0x0010 8");
//! ```

use core::fmt;

use crate::fmt::{write_hex_u16, write_hex_u8, write_u8};
use crate::geometry::CENTER;
use crate::state::ControllerState;
use crate::table::{ConversionTable, DeviceFormat};

/// Maximum size of a text record.
///
/// Breakdown: 0x(2) + bits(4) + space(1) + hat(3) + 2 * (space + hex + space + hex)(12) = 22
pub const MAX_TEXT_RECORD_SIZE: usize = 24;

/// Size of a Qingpi frame.
pub const QINGPI_RECORD_SIZE: usize = 11;

/// Size of a 3DS controller frame.
pub const COMPACT_RECORD_SIZE: usize = 6;

/// First byte of a Qingpi frame.
pub const QINGPI_HEADER: u8 = 0xAB;

/// First byte of a 3DS controller frame.
pub const COMPACT_HEADER: u8 = 0xA1;

/// Byte preceding the stick pair in a 3DS controller frame.
pub const COMPACT_STICK_HEADER: u8 = 0xA2;

/// Terminator line sent at the end of a text-format session.
pub const END_RECORD: &str = "end";

/// Error type for serialization operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    /// The output buffer is too small to hold the record.
    #[error("buffer too small")]
    BufferTooSmall,
    /// A write to the output failed.
    #[error("write error")]
    WriteError,
}

/// Cursor over an output buffer.
struct RecordBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> RecordBuf<'a> {
    #[inline]
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn write(&mut self, byte: u8) {
        self.buf[self.pos] = byte;
        self.pos += 1;
    }

    #[inline]
    fn write_slice(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    #[inline]
    fn write_hex_u16(&mut self, value: u16) {
        self.pos += write_hex_u16(&mut self.buf[self.pos..], value);
    }

    #[inline]
    fn write_hex_u8(&mut self, value: u8) {
        self.pos += write_hex_u8(&mut self.buf[self.pos..], value);
    }

    #[inline]
    fn write_u8(&mut self, value: u8) {
        self.pos += write_u8(&mut self.buf[self.pos..], value);
    }

    /// Write ` <x> <y>` in hex.
    #[inline]
    fn write_stick(&mut self, x: u8, y: u8) {
        self.write(b' ');
        self.write_hex_u8(x);
        self.write(b' ');
        self.write_hex_u8(y);
    }

    #[inline]
    fn finish(self) -> usize {
        self.pos
    }
}

/// One encoded record, ready for the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    Text(heapless::String<MAX_TEXT_RECORD_SIZE>),
    Qingpi([u8; QINGPI_RECORD_SIZE]),
    Compact([u8; COMPACT_RECORD_SIZE]),
}

impl Record {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(line) => line.as_bytes(),
            Self::Qingpi(frame) => frame,
            Self::Compact(frame) => frame,
        }
    }

    #[must_use]
    pub const fn format(&self) -> DeviceFormat {
        match self {
            Self::Text(_) => DeviceFormat::Text,
            Self::Qingpi(_) => DeviceFormat::Qingpi,
            Self::Compact(_) => DeviceFormat::ThreeDs,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(line) => f.write_str(line),
            Self::Qingpi(_) | Self::Compact(_) => {
                f.write_str("[")?;
                for (i, byte) in self.as_bytes().iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{byte:02x}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Mirror the lower half of the axis for the 3DS frame.
#[inline]
fn mirror_axis(value: u8) -> u8 {
    if value >= CENTER {
        value
    } else {
        127 - value
    }
}

impl ControllerState {
    /// Write the text record into `buf`, returning its length.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if `buf` is shorter than
    /// [`MAX_TEXT_RECORD_SIZE`]. The changed flags are left untouched then.
    pub fn serialize_text(&mut self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        if buf.len() < MAX_TEXT_RECORD_SIZE {
            return Err(SerializeError::BufferTooSmall);
        }

        let (left_changed, right_changed) = self.take_changed();

        let mut bits = self.buttons << 2;
        if left_changed {
            bits |= 0x2;
        }
        if right_changed {
            bits |= 0x1;
        }

        let mut rb = RecordBuf::new(buf);
        rb.write_slice(b"0x");
        rb.write_hex_u16(bits);
        rb.write(b' ');
        rb.write_u8(self.hat);
        if left_changed {
            rb.write_stick(self.lx, self.ly);
        }
        if right_changed {
            rb.write_stick(self.rx, self.ry);
        }

        Ok(rb.finish())
    }

    /// Write the text record to a `core::fmt::Write` implementation.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::WriteError`] if the write fails.
    pub fn serialize_text_fmt<W: fmt::Write>(&mut self, writer: &mut W) -> Result<(), SerializeError> {
        let mut buf = [0u8; MAX_TEXT_RECORD_SIZE];
        let len = self.serialize_text(&mut buf)?;

        let s = core::str::from_utf8(&buf[..len]).map_err(|_| SerializeError::WriteError)?;
        writer.write_str(s).map_err(|_| SerializeError::WriteError)
    }

    /// Encode the 11-byte Qingpi frame.
    pub fn serialize_qingpi(&mut self) -> [u8; QINGPI_RECORD_SIZE] {
        self.take_changed();

        let [btn_lo, btn_hi] = self.buttons.to_le_bytes();
        let [touch_lo, touch_hi] = self.touch.x.to_le_bytes();
        [
            QINGPI_HEADER,
            btn_lo,
            btn_hi,
            self.hat,
            self.lx,
            self.ly,
            CENTER,
            CENTER,
            touch_lo,
            touch_hi,
            self.touch.y,
        ]
    }

    /// Encode the 6-byte 3DS controller frame.
    ///
    /// `buttons` is expected in the [`ConversionTable::COMPACT`] layout.
    pub fn serialize_compact(&mut self) -> [u8; COMPACT_RECORD_SIZE] {
        self.take_changed();

        let hat = ConversionTable::COMPACT.hat_code(self.hat);
        [
            COMPACT_HEADER,
            (((self.buttons & 0xF) as u8) << 4) | hat,
            ((self.buttons >> 4) & 0x3F) as u8,
            COMPACT_STICK_HEADER,
            mirror_axis(self.lx),
            mirror_axis(self.ly),
        ]
    }

    /// Encode in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if the text record does
    /// not fit [`MAX_TEXT_RECORD_SIZE`] (cannot happen for valid state).
    pub fn encode(&mut self, format: DeviceFormat) -> Result<Record, SerializeError> {
        Ok(match format {
            DeviceFormat::Text => {
                let mut line = heapless::String::new();
                self.serialize_text_fmt(&mut line)?;
                Record::Text(line)
            }
            DeviceFormat::Qingpi => Record::Qingpi(self.serialize_qingpi()),
            DeviceFormat::ThreeDs => Record::Compact(self.serialize_compact()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;
    use crate::state::AxisReverse;
    use crate::types::{Button, Hat, Stick, Tilts, Touch};

    const DEFAULT: &ConversionTable = &ConversionTable::DEFAULT;
    const COMPACT: &ConversionTable = &ConversionTable::COMPACT;

    fn text(state: &mut ControllerState) -> std::string::String {
        let mut s = std::string::String::new();
        state.serialize_text_fmt(&mut s).unwrap();
        s
    }

    #[test]
    fn test_text_neutral() {
        let mut state = ControllerState::new();
        assert_eq!(text(&mut state), "0x0000 8");
    }

    #[test]
    fn test_text_button_a_without_stick_groups() {
        let mut state = ControllerState::new();
        state.set_buttons([Button::A], DEFAULT);
        // A is bit 2, shifted left 2 for the stick flags
        assert_eq!(text(&mut state), format!("0x{:04x} 8", (1 << 2) << 2));
    }

    #[test]
    fn test_text_left_stick_group() {
        let mut state = ControllerState::new();
        state.set_direction(&[Direction::UP], AxisReverse::default());
        assert_eq!(text(&mut state), "0x0002 8 80 0");

        // Flags were cleared: the next record has no group
        assert_eq!(text(&mut state), "0x0000 8");
    }

    #[test]
    fn test_text_both_stick_groups() {
        let mut state = ControllerState::new();
        state.set_buttons([Button::B, Button::Home], DEFAULT);
        state.set_hat([Hat::TopLeft], DEFAULT);
        state.set_direction(&[Direction::LEFT, Direction::R_DOWN_RIGHT], AxisReverse::default());
        // (0x1002 << 2) | 0b11 = 0x400b; left (0, 128), right (218, 218)
        assert_eq!(text(&mut state), "0x400b 7 0 80 da da");
    }

    #[test]
    fn test_text_after_release_sends_center() {
        let mut state = ControllerState::new();
        state.set_direction(&[Direction::R_UP], AxisReverse::default());
        text(&mut state);

        state.unset_direction(Tilts::R_UP);
        assert_eq!(text(&mut state), "0x0001 8 80 80");
    }

    #[test]
    fn test_text_buffer_too_small_keeps_flags() {
        let mut state = ControllerState::new();
        state.set_direction(&[Direction::UP], AxisReverse::default());
        let mut buf = [0u8; 8];
        assert_eq!(state.serialize_text(&mut buf), Err(SerializeError::BufferTooSmall));
        assert!(state.stick_changed(Stick::Left));
    }

    #[test]
    fn test_qingpi_layout() {
        let mut state = ControllerState::new();
        state.set_buttons([Button::A, Button::Capture], DEFAULT);
        state.set_hat([Hat::Btm], DEFAULT);
        state.set_direction(&[Direction::UP_RIGHT, Direction::R_LEFT], AxisReverse::default());
        state.set_touch([Touch::new(0x0123, 200)]);

        assert_eq!(
            state.serialize_qingpi(),
            [0xAB, 0x04, 0x20, 4, 218, 38, 128, 128, 0x23, 0x01, 200]
        );
        assert!(!state.stick_changed(Stick::Left));
    }

    #[test]
    fn test_qingpi_ignores_right_stick() {
        let mut a = ControllerState::new();
        let mut b = ControllerState::new();
        b.set_direction(&[Direction::R_UP], AxisReverse::default());
        assert_eq!(a.serialize_qingpi(), b.serialize_qingpi());
    }

    #[test]
    fn test_compact_headers_at_fixed_offsets() {
        let mut state = ControllerState::new();
        state.buttons = 1;
        let frame = state.serialize_compact();
        assert_eq!(frame[0], COMPACT_HEADER);
        assert_eq!(frame[3], COMPACT_STICK_HEADER);

        state.set_buttons(Button::ALL, COMPACT);
        state.set_direction(&[Direction::DOWN_LEFT], AxisReverse::default());
        let frame = state.serialize_compact();
        assert_eq!(frame[0], 0xA1);
        assert_eq!(frame[3], 0xA2);
    }

    #[test]
    fn test_compact_packs_buttons_and_hat() {
        let mut state = ControllerState::new();
        // A = 1, L = 16, SELECT = 256
        state.set_buttons([Button::A, Button::L, Button::SELECT], COMPACT);
        state.set_hat([Hat::Right], DEFAULT);
        let frame = state.serialize_compact();
        assert_eq!(frame[1], (1 << 4) | 4);
        assert_eq!(frame[2], (16 >> 4) | (256 >> 4));
    }

    #[test]
    fn test_compact_diagonal_hat_degrades_to_zero() {
        let mut state = ControllerState::new();
        state.set_hat([Hat::TopRight], DEFAULT);
        assert_eq!(state.serialize_compact()[1], 0);
    }

    #[test]
    fn test_compact_mirrors_lower_half() {
        let mut state = ControllerState::new();
        // stored (0, 128) for LEFT, (128, 255) for DOWN
        state.set_direction(&[Direction::LEFT], AxisReverse::default());
        let frame = state.serialize_compact();
        assert_eq!(&frame[4..], &[127, 128]);

        state.set_direction(&[Direction::from_coordinates(Stick::Left, 100, 255)], AxisReverse::default());
        let frame = state.serialize_compact();
        assert_eq!(&frame[4..], &[27, 127]);
    }

    #[test]
    fn test_encode_dispatches_on_format() {
        let mut state = ControllerState::new();
        let record = state.encode(DeviceFormat::Text).unwrap();
        assert_eq!(record.as_bytes(), b"0x0000 8");
        assert_eq!(record.format(), DeviceFormat::Text);

        let record = state.encode(DeviceFormat::Qingpi).unwrap();
        assert_eq!(record.as_bytes().len(), QINGPI_RECORD_SIZE);

        let record = state.encode(DeviceFormat::ThreeDs).unwrap();
        assert_eq!(record.to_string(), "[a1 00 00 a2 80 80]");
    }
}
