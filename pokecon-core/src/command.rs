//! Extension commands understood by the RP2040 text-format firmware.

use core::fmt;

/// One firmware command line.
///
/// # Example
///
/// ```
/// use pokecon_core::DeviceCommand;
///
/// assert_eq!(DeviceCommand::Key(0x35).to_string(), "Key 35");
/// assert_eq!(DeviceCommand::Text("abc").to_string(), "\"abc");
/// assert_eq!(DeviceCommand::Date { years: -1, months: 0, days: 3 }.to_string(), "Date -1/0/3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceCommand<'a> {
    /// Tap one keyboard HID usage.
    Key(u8),
    /// Type an ASCII string on the emulated keyboard.
    Text(&'a str),
    /// Move the console date by signed deltas.
    Date { years: i16, months: i16, days: i16 },
    /// Move the console year by a signed delta.
    Year(i16),
}

impl DeviceCommand<'_> {
    /// HID usage of the half-width/full-width toggle key.
    pub const HALF_FULL_WIDTH: u8 = 0x35;

    /// Whether the firmware would ignore this command.
    ///
    /// A zero year delta is refused; a line break would split the command.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        match self {
            Self::Year(0) => true,
            Self::Text(text) => text.contains(['\r', '\n']),
            _ => false,
        }
    }
}

impl fmt::Display for DeviceCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(usage) => write!(f, "Key {usage:02x}"),
            Self::Text(text) => write!(f, "\"{text}"),
            Self::Date { years, months, days } => write!(f, "Date {years}/{months}/{days}"),
            Self::Year(years) => write!(f, "Year {years}"),
        }
    }
}
