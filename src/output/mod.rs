mod serial;

pub use serial::{LineEnding, SerialTransport};
