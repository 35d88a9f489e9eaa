//! Hold tracking, pacing and transport session for game-controller
//! emulation peripherals.
//!
//! This crate sits between a script (or any caller issuing button presses)
//! and the serial link to the peripheral. It owns the
//! [`ControllerState`](pokecon_proto::ControllerState) and the set of held
//! inputs, and turns every operation into exactly one record on the wire.
//!
//! # Overview
//!
//! - [`input`]: the tagged [`Input`] variant (button, hat, stick, touch)
//! - [`hold`]: [`HoldSet`], the inputs re-asserted on every record
//! - [`transport`]: the synchronous [`Transport`] trait
//! - [`session`]: [`Session`] with press, hold, release, neutral, replay
//! - [`command`]: [`DeviceCommand`] firmware extension lines
//!
//! # Pacing
//!
//! Sessions block through [`embedded_hal::delay::DelayNs`]; hosts pass a
//! `std::thread::sleep` based provider, tests pass a recording mock.
//!
//! # Logging
//!
//! Everything goes through the [`log`] facade: duplicate holds at `warn`,
//! every record sent at `debug`, state snapshots at `trace`.
//!
//! # Features
//!
//! - **`serde`**: derive `Serialize`/`Deserialize` on [`SessionConfig`]

pub mod command;
pub mod hold;
pub mod input;
pub mod session;
pub mod transport;

// Re-export main types at crate root
pub use command::DeviceCommand;
pub use hold::{HoldSet, MAX_HELD};
pub use input::Input;
pub use session::{HoldOutcome, ReleaseOptions, Session, SessionConfig, SessionError, TYPE_TEXT_SETTLE};
pub use transport::{Transport, TransportError};
