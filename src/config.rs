//! Link configuration loaded from TOML.

use std::io::Write;
use std::path::Path;

use pokecon_core::{Session, SessionConfig};
use pokecon_proto::{AxisReverse, DeviceFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::delay::StdDelay;
use crate::output::{LineEnding, SerialTransport};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything needed to talk to one peripheral.
///
/// ```toml
/// format = "3DS Controller"   # "Default" | "Qingpi" | "3DS Controller"
/// line_ending = "lf"          # "crlf" | "lf"
///
/// [reverse]
/// x = false
/// y = true
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub format: DeviceFormat,
    pub line_ending: LineEnding,
    pub reverse: AxisReverse,
}

impl LinkConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        log::debug!("link config: {} format, {:?} line ending", config.format, config.line_ending);
        Ok(config)
    }

    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            format: self.format,
            reverse: self.reverse,
        }
    }
}

/// Build a session writing to `writer` and pacing with `std::thread::sleep`.
///
/// # Example
///
/// ```
/// use pokecon::{open_session, LinkConfig};
/// use pokecon_proto::Button;
///
/// let config = LinkConfig::from_toml_str("line_ending = \"lf\"").unwrap();
/// let mut session = open_session(Vec::new(), &config);
/// session.press(&[Button::A.into()]).unwrap();
///
/// let (port, _) = session.into_parts();
/// assert_eq!(port.into_inner(), b"0x0010 8\n");
/// ```
pub fn open_session<W: Write>(writer: W, config: &LinkConfig) -> Session<SerialTransport<W>, StdDelay> {
    Session::new(
        SerialTransport::new(writer, config.line_ending),
        StdDelay,
        config.session_config(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokecon_proto::Direction;

    #[test]
    fn test_empty_config_is_default() {
        let config = LinkConfig::from_toml_str("").unwrap();
        assert_eq!(config, LinkConfig::default());
        assert_eq!(config.format, DeviceFormat::Text);
        assert_eq!(config.line_ending, LineEnding::Crlf);
        assert_eq!(config.reverse, AxisReverse::default());
    }

    #[test]
    fn test_format_names() {
        for (name, format) in [
            ("Default", DeviceFormat::Text),
            ("Qingpi", DeviceFormat::Qingpi),
            ("3DS Controller", DeviceFormat::ThreeDs),
        ] {
            let config = LinkConfig::from_toml_str(&format!("format = \"{name}\"")).unwrap();
            assert_eq!(config.format, format);
        }
    }

    #[test]
    fn test_partial_reverse_table() {
        let config = LinkConfig::from_toml_str("[reverse]\ny = true\n").unwrap();
        assert_eq!(config.reverse, AxisReverse { x: false, y: true });
    }

    #[test]
    fn test_rejects_unknown_format() {
        let err = LinkConfig::from_toml_str("format = \"Serial\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format = \"Qingpi\"").unwrap();
        writeln!(file, "line_ending = \"lf\"").unwrap();

        let config = LinkConfig::load(file.path()).unwrap();
        assert_eq!(config.format, DeviceFormat::Qingpi);
        assert_eq!(config.line_ending, LineEnding::Lf);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LinkConfig::load(&dir.path().join("link.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_open_session_applies_reverse() {
        let config = LinkConfig::from_toml_str("line_ending = \"lf\"\n[reverse]\ny = true").unwrap();
        let mut session = open_session(Vec::new(), &config);
        session.press(&[Direction::UP.into()]).unwrap();
        session.end().unwrap();

        let (port, _) = session.into_parts();
        assert_eq!(port.sent_records(), 2);
        assert_eq!(port.into_inner(), b"0x0002 8 80 ff\nend\n");
    }

    #[test]
    fn test_open_session_binary_format() {
        let config = LinkConfig::from_toml_str("format = \"3DS Controller\"").unwrap();
        let mut session = open_session(Vec::new(), &config);
        session.neutral().unwrap();
        session.end().unwrap();

        let (port, _) = session.into_parts();
        assert_eq!(port.into_inner(), [0xA1u8, 0x00, 0x00, 0xA2, 0x80, 0x80]);
    }
}
