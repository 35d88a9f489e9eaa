//! Per-device conversion tables and wire format selection.
//!
//! A table maps every canonical [`Button`] to the bit it occupies on the
//! target device and every [`Hat`] to the device's hat code. Both maps are
//! total: an input the device cannot represent maps to `0` and has no
//! effect.

use core::fmt;
use core::str::FromStr;

use crate::types::{Button, Hat};

/// Button-bit and hat-code lookup for one target device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConversionTable {
    buttons: [u16; Button::COUNT],
    hats: [u8; 9],
}

impl ConversionTable {
    /// Identity layout: button slot `n` is bit `n`, hats use their canonical code.
    pub const DEFAULT: Self = Self {
        buttons: [
            1 << 0,  // Y
            1 << 1,  // B
            1 << 2,  // A
            1 << 3,  // X
            1 << 4,  // L
            1 << 5,  // R
            1 << 6,  // ZL
            1 << 7,  // ZR
            1 << 8,  // MINUS
            1 << 9,  // PLUS
            1 << 10, // LCLICK
            1 << 11, // RCLICK
            1 << 12, // HOME
            1 << 13, // CAPTURE
        ],
        hats: [0, 1, 2, 3, 4, 5, 6, 7, 8],
    };

    /// 3DS controller layout.
    ///
    /// ZL, ZR, RCLICK (WIRELESS) and CAPTURE do not exist on the device.
    /// The hat is a four-way compass code; diagonals and center send 0.
    pub const COMPACT: Self = Self {
        buttons: [
            8,   // Y
            2,   // B
            1,   // A
            4,   // X
            16,  // L
            32,  // R
            0,   // ZL
            0,   // ZR
            256, // MINUS / SELECT
            128, // PLUS / START
            512, // LCLICK / POWER
            0,   // RCLICK / WIRELESS
            64,  // HOME
            0,   // CAPTURE
        ],
        hats: [8, 0, 4, 0, 2, 0, 1, 0, 0],
    };

    /// Bit(s) the button sets on this device; `0` if unsupported.
    #[inline]
    #[must_use]
    pub const fn button(&self, button: Button) -> u16 {
        self.buttons[button.index()]
    }

    /// Device hat code for a canonical hat.
    #[inline]
    #[must_use]
    pub const fn hat(&self, hat: Hat) -> u8 {
        self.hats[hat as usize]
    }

    /// Device hat code for a raw canonical code; out-of-range codes map to `0`.
    #[inline]
    #[must_use]
    pub fn hat_code(&self, code: u8) -> u8 {
        self.hats.get(code as usize).copied().unwrap_or(0)
    }
}

/// Which record layout the peripheral expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceFormat {
    /// One ASCII line per record: `0x%04x %d[ %x %x][ %x %x]`.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "Default"))]
    Text,
    /// 11-byte frame with touch support, header `0xAB`.
    #[cfg_attr(feature = "serde", serde(rename = "Qingpi"))]
    Qingpi,
    /// 6-byte 3DS controller frame, headers `0xA1`/`0xA2`.
    #[cfg_attr(feature = "serde", serde(rename = "3DS Controller"))]
    ThreeDs,
}

impl DeviceFormat {
    pub const ALL: [Self; 3] = [Self::Text, Self::Qingpi, Self::ThreeDs];

    /// Display name, as used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "Default",
            Self::Qingpi => "Qingpi",
            Self::ThreeDs => "3DS Controller",
        }
    }

    /// Table used for button bits on this format.
    #[must_use]
    pub const fn button_table(self) -> &'static ConversionTable {
        match self {
            Self::Text | Self::Qingpi => &ConversionTable::DEFAULT,
            Self::ThreeDs => &ConversionTable::COMPACT,
        }
    }

    /// Whether records are text lines (and the session ends with `"end"`).
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }

    #[must_use]
    pub const fn carries_touch(self) -> bool {
        matches!(self, Self::Qingpi)
    }

    #[must_use]
    pub const fn carries_right_stick(self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for DeviceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a format name is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown device format")]
pub struct UnknownFormat;

impl FromStr for DeviceFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownFormat)
    }
}
