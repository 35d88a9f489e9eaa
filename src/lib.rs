//! Host side of the controller link: a serial [`Transport`](pokecon_core::Transport)
//! over any `std::io::Write`, a sleeping delay provider and TOML link
//! configuration.
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//!
//! use pokecon::{open_session, LinkConfig};
//! use pokecon_proto::{Button, Direction};
//!
//! let config = LinkConfig::load(Path::new("link.toml"))?;
//! let port = serialport::new("/dev/ttyACM0", 9600)
//!     .timeout(Duration::from_millis(100))
//!     .open()?;
//! let mut session = open_session(port, &config);
//!
//! session.hold(&[Direction::UP.into()])?;
//! session.tap(&[Button::A.into()], Duration::from_millis(100), Duration::from_millis(500))?;
//! session.neutral()?;
//! session.end()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod delay;
pub mod output;

pub use config::{open_session, ConfigError, LinkConfig};
pub use delay::StdDelay;
pub use output::{LineEnding, SerialTransport};
