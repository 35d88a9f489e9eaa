//! Decoders for the three record layouts.
//!
//! These are the inverse of [`crate::serialize`]: they are used by tests,
//! by replay tooling and by anything that sniffs the serial line.

use crate::serialize::{
    COMPACT_HEADER, COMPACT_RECORD_SIZE, COMPACT_STICK_HEADER, END_RECORD, QINGPI_HEADER,
    QINGPI_RECORD_SIZE,
};
use crate::types::Touch;

/// Error type for decoding records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The record does not follow the expected grammar.
    #[error("malformed record")]
    Malformed,
    /// A binary frame carries the wrong header byte.
    #[error("bad frame header")]
    BadHeader,
    /// A binary frame has the wrong length.
    #[error("bad frame length")]
    Length,
}

/// One decoded text line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum TextCommand {
    /// The `end` terminator.
    End,
    /// A controller state record.
    State(TextState),
}

/// Fields of a text state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextState {
    /// Raw first field: buttons shifted left by 2 plus the stick group flags.
    pub bits: u16,
    pub buttons: u16,
    pub hat: u8,
    /// Left stick group, present when bit 1 of `bits` is set.
    pub left: Option<(u8, u8)>,
    /// Right stick group, present when bit 0 of `bits` is set.
    pub right: Option<(u8, u8)>,
}

/// Decoded Qingpi frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QingpiFrame {
    pub buttons: u16,
    pub hat: u8,
    pub left: (u8, u8),
    /// Always `(128, 128)` for frames this crate produces.
    pub right: (u8, u8),
    pub touch: Touch,
}

/// Decoded 3DS controller frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactFrame {
    /// Buttons in the compact table layout (bits 0..10).
    pub buttons: u16,
    /// Compact compass hat code (`8`, `4`, `2`, `1` or `0`).
    pub hat: u8,
    /// Left stick with the lower-half mirroring undone.
    pub left: (u8, u8),
}

/// Parse one text line.
///
/// A trailing CR and/or LF is ignored.
///
/// # Example
///
/// ```
/// use pokecon_proto::{parse_text, TextCommand};
///
/// let Ok(TextCommand::State(state)) = parse_text(b"0x0012 8 80 0\r\n") else {
///     panic!("not a state record");
/// };
/// assert_eq!(state.buttons, 0x0004);
/// assert_eq!(state.left, Some((0x80, 0x00)));
/// assert_eq!(state.right, None);
/// ```
pub fn parse_text(line: &[u8]) -> Result<TextCommand, ParseError> {
    let line = strip_line_ending(line);
    if line == END_RECORD.as_bytes() {
        return Ok(TextCommand::End);
    }

    let mut fields = line.split(|&b| b == b' ');

    let bits = fields
        .next()
        .and_then(|f| f.strip_prefix(b"0x"))
        .ok_or(ParseError::Malformed)?;
    let bits = parse_hex_u16(bits)?;
    let hat = parse_u8(fields.next().ok_or(ParseError::Malformed)?)?;

    let left = if bits & 0x2 != 0 {
        Some(parse_pair(&mut fields)?)
    } else {
        None
    };
    let right = if bits & 0x1 != 0 {
        Some(parse_pair(&mut fields)?)
    } else {
        None
    };

    // Group count must agree with the flag bits
    if fields.next().is_some() {
        return Err(ParseError::Malformed);
    }

    Ok(TextCommand::State(TextState {
        bits,
        buttons: bits >> 2,
        hat,
        left,
        right,
    }))
}

/// Parse an 11-byte Qingpi frame.
pub fn parse_qingpi(frame: &[u8]) -> Result<QingpiFrame, ParseError> {
    if frame.len() != QINGPI_RECORD_SIZE {
        return Err(ParseError::Length);
    }
    if frame[0] != QINGPI_HEADER {
        return Err(ParseError::BadHeader);
    }

    Ok(QingpiFrame {
        buttons: u16::from_le_bytes([frame[1], frame[2]]),
        hat: frame[3],
        left: (frame[4], frame[5]),
        right: (frame[6], frame[7]),
        touch: Touch::new(u16::from_le_bytes([frame[8], frame[9]]), frame[10]),
    })
}

/// Parse a 6-byte 3DS controller frame.
pub fn parse_compact(frame: &[u8]) -> Result<CompactFrame, ParseError> {
    if frame.len() != COMPACT_RECORD_SIZE {
        return Err(ParseError::Length);
    }
    if frame[0] != COMPACT_HEADER || frame[3] != COMPACT_STICK_HEADER {
        return Err(ParseError::BadHeader);
    }
    if frame[2] & 0xC0 != 0 {
        return Err(ParseError::Malformed);
    }

    Ok(CompactFrame {
        buttons: u16::from(frame[1] >> 4) | (u16::from(frame[2]) << 4),
        hat: frame[1] & 0x0F,
        left: (unmirror_axis(frame[4]), unmirror_axis(frame[5])),
    })
}

#[inline]
fn unmirror_axis(value: u8) -> u8 {
    if value >= 128 {
        value
    } else {
        127 - value
    }
}

/// Strip trailing CR and/or LF from a line.
#[inline]
fn strip_line_ending(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    if end > 0 && line[end - 1] == b'\n' {
        end -= 1;
    }
    if end > 0 && line[end - 1] == b'\r' {
        end -= 1;
    }
    &line[..end]
}

fn parse_pair<'a, I>(fields: &mut I) -> Result<(u8, u8), ParseError>
where
    I: Iterator<Item = &'a [u8]>,
{
    let x = parse_hex_u8(fields.next().ok_or(ParseError::Malformed)?)?;
    let y = parse_hex_u8(fields.next().ok_or(ParseError::Malformed)?)?;
    Ok((x, y))
}

/// Parse 1-4 hex digits as u16.
#[inline]
fn parse_hex_u16(s: &[u8]) -> Result<u16, ParseError> {
    if s.is_empty() || s.len() > 4 {
        return Err(ParseError::Malformed);
    }
    let mut value: u16 = 0;
    for &b in s {
        value = (value << 4) | u16::from(hex_digit(b)?);
    }
    Ok(value)
}

/// Parse 1-2 hex digits as u8.
#[inline]
fn parse_hex_u8(s: &[u8]) -> Result<u8, ParseError> {
    match *s {
        [low] => hex_digit(low),
        [high, low] => Ok((hex_digit(high)? << 4) | hex_digit(low)?),
        _ => Err(ParseError::Malformed),
    }
}

/// Convert a hex character to its value.
#[inline]
fn hex_digit(b: u8) -> Result<u8, ParseError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        _ => Err(ParseError::Malformed),
    }
}

/// Parse a decimal string as u8.
#[inline]
fn parse_u8(s: &[u8]) -> Result<u8, ParseError> {
    if s.is_empty() || s.len() > 3 {
        return Err(ParseError::Malformed);
    }

    let mut value: u16 = 0;
    for &b in s {
        if !b.is_ascii_digit() {
            return Err(ParseError::Malformed);
        }
        value = value * 10 + u16::from(b - b'0');
    }

    u8::try_from(value).map_err(|_| ParseError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;
    use crate::state::{AxisReverse, ControllerState};
    use crate::table::ConversionTable;
    use crate::types::{Button, Hat, Stick};

    fn state_of(line: &[u8]) -> TextState {
        match parse_text(line) {
            Ok(TextCommand::State(state)) => state,
            other => panic!("expected state, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_text_end() {
        assert_eq!(parse_text(b"end"), Ok(TextCommand::End));
        assert_eq!(parse_text(b"end\r\n"), Ok(TextCommand::End));
    }

    #[test]
    fn test_parse_text_buttons_only() {
        let state = state_of(b"0x0010 8");
        assert_eq!(state.bits, 0x0010);
        assert_eq!(state.buttons, 0x0004);
        assert_eq!(state.hat, 8);
        assert_eq!(state.left, None);
        assert_eq!(state.right, None);
    }

    #[test]
    fn test_parse_text_right_group_only() {
        let state = state_of(b"0x0001 2 ff 80\n");
        assert_eq!(state.left, None);
        assert_eq!(state.right, Some((0xff, 0x80)));
        assert_eq!(state.hat, 2);
    }

    #[test]
    fn test_parse_text_group_count_must_match_flags() {
        assert_eq!(parse_text(b"0x0003 8 80 80"), Err(ParseError::Malformed));
        assert_eq!(parse_text(b"0x0000 8 80 80"), Err(ParseError::Malformed));
        assert_eq!(parse_text(b"0x0002 8 80"), Err(ParseError::Malformed));
    }

    #[test]
    fn test_parse_text_rejects_garbage() {
        assert_eq!(parse_text(b""), Err(ParseError::Malformed));
        assert_eq!(parse_text(b"0010 8"), Err(ParseError::Malformed));
        assert_eq!(parse_text(b"0x 8"), Err(ParseError::Malformed));
        assert_eq!(parse_text(b"0x0000 256"), Err(ParseError::Malformed));
        assert_eq!(parse_text(b"0x0002 8 80 100"), Err(ParseError::Malformed));
        assert_eq!(parse_text(b"0x0000  8"), Err(ParseError::Malformed));
    }

    #[test]
    fn test_text_round_trip_with_state() {
        let mut state = ControllerState::new();
        state.set_buttons([Button::X, Button::Zr], &ConversionTable::DEFAULT);
        state.set_hat([Hat::BtmRight], &ConversionTable::DEFAULT);
        state.set_direction(&[Direction::R_UP_LEFT], AxisReverse::default());
        let expected = state;

        let mut buf = [0u8; 32];
        let len = state.serialize_text(&mut buf).unwrap();
        let parsed = state_of(&buf[..len]);

        assert_eq!(parsed.buttons, expected.buttons);
        assert_eq!(parsed.hat, expected.hat);
        assert_eq!(parsed.left, None);
        assert_eq!(parsed.right, Some(expected.stick(Stick::Right)));
    }

    #[test]
    fn test_parse_qingpi() {
        let frame = [0xAB, 0x04, 0x20, 4, 218, 38, 128, 128, 0x23, 0x01, 200];
        let parsed = parse_qingpi(&frame).unwrap();
        assert_eq!(parsed.buttons, 0x2004);
        assert_eq!(parsed.hat, 4);
        assert_eq!(parsed.left, (218, 38));
        assert_eq!(parsed.right, (128, 128));
        assert_eq!(parsed.touch, Touch::new(0x0123, 200));
    }

    #[test]
    fn test_parse_qingpi_errors() {
        assert_eq!(parse_qingpi(&[0xAB; 10]), Err(ParseError::Length));
        let mut frame = [0u8; QINGPI_RECORD_SIZE];
        assert_eq!(parse_qingpi(&frame), Err(ParseError::BadHeader));
        frame[0] = QINGPI_HEADER;
        assert!(parse_qingpi(&frame).is_ok());
    }

    #[test]
    fn test_compact_round_trip_with_state() {
        let table = &ConversionTable::COMPACT;
        let mut state = ControllerState::new();
        state.set_buttons([Button::Y, Button::R, Button::POWER], table);
        // Hat is kept as the canonical code; the compass mapping happens on encode
        state.set_hat([Hat::Left], &ConversionTable::DEFAULT);
        state.set_direction(&[Direction::DOWN_LEFT], AxisReverse::default());
        let expected = state;

        let parsed = parse_compact(&state.serialize_compact()).unwrap();
        assert_eq!(parsed.buttons, expected.buttons);
        assert_eq!(parsed.hat, table.hat(Hat::Left));
        assert_eq!(parsed.left, expected.stick(Stick::Left));
    }

    #[test]
    fn test_parse_compact_errors() {
        assert_eq!(parse_compact(&[0xA1, 0, 0, 0xA2, 0]), Err(ParseError::Length));
        assert_eq!(parse_compact(&[0xA1, 0, 0, 0xA3, 0, 0]), Err(ParseError::BadHeader));
        assert_eq!(parse_compact(&[0xAB, 0, 0, 0xA2, 0, 0]), Err(ParseError::BadHeader));
        assert_eq!(parse_compact(&[0xA1, 0, 0x40, 0xA2, 0, 0]), Err(ParseError::Malformed));
    }
}
