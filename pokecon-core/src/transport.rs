//! Transport trait and error types.

use std::io;

/// Error type for transport operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Serial/communication I/O error.
    #[error("i/o error: {0:?}")]
    Io(io::ErrorKind),
    /// Port not opened yet.
    #[error("transport not ready")]
    NotReady,
    /// Port closed by the peer or by the application.
    #[error("transport closed")]
    Closed,
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::BrokenPipe | io::ErrorKind::NotConnected => Self::Closed,
            kind => Self::Io(kind),
        }
    }
}

/// Synchronous byte pipe to the peripheral.
///
/// A session owns one transport and sends every record through it in call
/// order. Implementations decide framing (line terminator for text).
pub trait Transport {
    /// Send one text record. The implementation appends the line terminator.
    fn send_line(&mut self, line: &str) -> Result<(), TransportError>;

    /// Send one binary frame verbatim.
    fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Send one text line without any instrumentation (logging, counters).
    ///
    /// Used for replay and firmware commands.
    fn send_line_raw(&mut self, line: &str) -> Result<(), TransportError> {
        self.send_line(line)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        (**self).send_line(line)
    }

    fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).send_bytes(bytes)
    }

    fn send_line_raw(&mut self, line: &str) -> Result<(), TransportError> {
        (**self).send_line_raw(line)
    }
}
