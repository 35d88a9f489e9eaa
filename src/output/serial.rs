use std::io::{self, Write};

use log::debug;
use pokecon_core::{Transport, TransportError};
use serde::{Deserialize, Serialize};

/// Terminator appended to every text line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Crlf,
    Lf,
}

impl LineEnding {
    #[must_use]
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Crlf => b"\r\n",
            Self::Lf => b"\n",
        }
    }
}

/// Transport over any byte sink: a serial port handle, a file, a `Vec<u8>`.
///
/// Every send is flushed before returning so records are not coalesced.
///
/// # Example
///
/// ```
/// use pokecon::{LineEnding, SerialTransport};
/// use pokecon_core::Transport;
///
/// let mut port = SerialTransport::new(Vec::new(), LineEnding::Lf);
/// port.send_line("0x0010 8").unwrap();
/// port.send_bytes(&[0xA1, 0x00, 0x00, 0xA2, 0x80, 0x80]).unwrap();
///
/// assert_eq!(port.sent_records(), 2);
/// assert_eq!(&port.get_ref()[..9], b"0x0010 8\n");
/// ```
pub struct SerialTransport<W> {
    writer: W,
    line_ending: LineEnding,
    sent: u64,
}

impl<W: Write> SerialTransport<W> {
    pub fn new(writer: W, line_ending: LineEnding) -> Self {
        Self {
            writer,
            line_ending,
            sent: 0,
        }
    }

    /// Number of instrumented sends (raw lines are not counted).
    #[inline]
    #[must_use]
    pub fn sent_records(&self) -> u64 {
        self.sent
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(self.line_ending.as_bytes())?;
        self.writer.flush()
    }
}

impl<W: Write> Transport for SerialTransport<W> {
    fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.write_line(line)?;
        self.sent += 1;
        debug!("serial #{} line {line}", self.sent);
        Ok(())
    }

    fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        self.sent += 1;
        debug!("serial #{} {} bytes", self.sent, bytes.len());
        Ok(())
    }

    fn send_line_raw(&mut self, line: &str) -> Result<(), TransportError> {
        self.write_line(line)?;
        Ok(())
    }
}
