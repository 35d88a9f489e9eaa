//! Controller state model and serial record encoding for game-controller
//! emulation peripherals.
//!
//! This crate holds everything that does not touch a transport:
//!
//! - **Inputs**: canonical controller vocabulary
//!   - [`Button`], [`Hat`], [`Stick`], [`Touch`]
//!   - [`Direction`] - a stick deflection from an angle or raw coordinates
//!   - [`Tilts`] - which stick/axis sides a direction engages
//!
//! - **Tables**: per-device button bits and hat codes
//!   - [`ConversionTable::DEFAULT`], [`ConversionTable::COMPACT`]
//!   - [`DeviceFormat`] - which record layout the peripheral speaks
//!
//! - **State**: [`ControllerState`] and its set/unset operations
//!
//! - **Encoding**: [`ControllerState::encode`] and friends, producing a
//!   [`Record`]
//!
//! - **Decoding**: [`parse_text`], [`parse_qingpi`], [`parse_compact`]
//!
//! # Formats
//!
//! | Format | Layout |
//! |--------|--------|
//! | `Default` | `0x%04x %d[ %x %x][ %x %x]` text line |
//! | `Qingpi` | 11 bytes, header `0xAB`, carries touch |
//! | `3DS Controller` | 6 bytes, headers `0xA1` / `0xA2`, left stick only |
//!
//! # Example
//!
//! ```
//! use pokecon_proto::{Button, ControllerState, DeviceFormat, Direction, AxisReverse};
//!
//! let format = DeviceFormat::Text;
//! let mut state = ControllerState::new();
//! state.set_buttons([Button::A], format.button_table());
//! state.set_direction(&[Direction::UP], AxisReverse::default());
//!
//! let record = state.encode(format).unwrap();
//! assert_eq!(record.as_bytes(), b"0x0012 8 80 0");
//! ```
//!
//! # Features
//!
//! - **`serde`**: derive `Serialize`/`Deserialize` on [`DeviceFormat`],
//!   [`AxisReverse`] and the input types

mod fmt;
pub mod geometry;
pub mod parser;
pub mod serialize;
pub mod state;
pub mod table;
pub mod types;

// Re-export types at crate root for convenience
pub use geometry::{classify_tilt, coordinate_from_polar, Angle, Direction, Source};
pub use parser::{
    parse_compact, parse_qingpi, parse_text, CompactFrame, ParseError, QingpiFrame, TextCommand,
    TextState,
};
pub use serialize::{
    Record, SerializeError, COMPACT_RECORD_SIZE, END_RECORD, MAX_TEXT_RECORD_SIZE,
    QINGPI_RECORD_SIZE,
};
pub use state::{AxisReverse, ControllerState};
pub use table::{ConversionTable, DeviceFormat, UnknownFormat};
pub use types::{Button, Hat, Stick, Tilts, Touch};
