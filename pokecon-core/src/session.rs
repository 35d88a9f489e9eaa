//! Session: owns the controller state, the hold set and the transport.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{debug, trace, warn};
use pokecon_proto::{
    AxisReverse, ControllerState, ConversionTable, DeviceFormat, Record, SerializeError, Tilts,
    END_RECORD,
};

use crate::command::DeviceCommand;
use crate::hold::{HoldSet, MAX_HELD};
use crate::input::Input;
use crate::transport::{Transport, TransportError};

/// Pause between the width toggle key and the typed text.
pub const TYPE_TEXT_SETTLE: Duration = Duration::from_millis(500);

/// Run-time settings of one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    pub format: DeviceFormat,
    pub reverse: AxisReverse,
}

/// Error type for session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The transport rejected a record.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Encoding a record failed.
    #[error("encode failed: {0}")]
    Encode(#[from] SerializeError),
    /// Holding the batch would exceed [`MAX_HELD`].
    #[error("hold set full")]
    HoldSetFull,
}

/// Result of a [`Session::hold`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The batch was added and sent.
    Held,
    /// Some input was already held; nothing was added or sent.
    AlreadyHeld,
}

/// What [`Session::release_with`] resets besides the named inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseOptions {
    pub unset_hat: bool,
    pub unset_touch: bool,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            unset_hat: true,
            unset_touch: true,
        }
    }
}

/// A connection to one peripheral.
///
/// Inputs that are held stay asserted in every record sent afterwards,
/// until they are released or [`neutral`](Self::neutral) is called.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use embedded_hal::delay::DelayNs;
/// use pokecon_core::{Session, SessionConfig, Transport, TransportError};
/// use pokecon_proto::Button;
///
/// struct Lines(Vec<String>);
///
/// impl Transport for Lines {
///     fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
///         self.0.push(line.to_owned());
///         Ok(())
///     }
///     fn send_bytes(&mut self, _: &[u8]) -> Result<(), TransportError> {
///         Ok(())
///     }
/// }
///
/// struct NoDelay;
///
/// impl DelayNs for NoDelay {
///     fn delay_ns(&mut self, _: u32) {}
/// }
///
/// let mut session = Session::new(Lines(Vec::new()), NoDelay, SessionConfig::default());
/// session.tap(&[Button::A.into()], Duration::from_millis(100), Duration::ZERO).unwrap();
/// session.end().unwrap();
///
/// let (lines, _) = session.into_parts();
/// assert_eq!(lines.0, ["0x0010 8", "0x0000 8", "end"]);
/// ```
pub struct Session<T, D> {
    transport: T,
    delay: D,
    config: SessionConfig,
    state: ControllerState,
    held: HoldSet,
}

impl<T: Transport, D: DelayNs> Session<T, D> {
    pub fn new(transport: T, delay: D, config: SessionConfig) -> Self {
        Self {
            transport,
            delay,
            config,
            state: ControllerState::new(),
            held: HoldSet::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    #[must_use]
    pub fn held(&self) -> &HoldSet {
        &self.held
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Decompose the session into its transport and delay provider.
    pub fn into_parts(self) -> (T, D) {
        (self.transport, self.delay)
    }

    /// Apply `inputs` plus everything held, then send one record.
    ///
    /// The hold set is not changed.
    pub fn press(&mut self, inputs: &[Input]) -> Result<(), SessionError> {
        let merged = inputs
            .iter()
            .chain(self.held.iter().filter(|held| !inputs.contains(held)));
        apply(&mut self.state, &self.config, merged);
        self.send_state()
    }

    /// Add `inputs` to the hold set and send.
    ///
    /// If any input is already held (or repeated within the batch) nothing
    /// is added or sent and [`HoldOutcome::AlreadyHeld`] is returned. A touch
    /// input replaces the held touch; only the first touch of the batch is
    /// held. An empty batch sends nothing.
    pub fn hold(&mut self, inputs: &[Input]) -> Result<HoldOutcome, SessionError> {
        if inputs.is_empty() {
            debug!("hold with no inputs, nothing sent");
            return Ok(HoldOutcome::Held);
        }

        for (i, input) in inputs.iter().enumerate() {
            let held = !input.is_touch() && self.held.contains(input);
            if held || inputs[..i].contains(input) {
                warn!("{input} is already in holding state");
                return Ok(HoldOutcome::AlreadyHeld);
            }
        }

        let first_touch = inputs.iter().position(Input::is_touch);
        let batch = || {
            inputs
                .iter()
                .enumerate()
                .filter(move |&(i, input)| !input.is_touch() || Some(i) == first_touch)
                .map(|(_, input)| input)
        };

        let replaced = first_touch.is_some() && self.held.has_touch();
        let adding = batch().count();
        let after = self.held.len() - usize::from(replaced) + adding;
        if after > MAX_HELD {
            warn!("cannot hold {adding} more inputs, {} already held", self.held.len());
            return Err(SessionError::HoldSetFull);
        }

        for input in batch() {
            self.held
                .push(*input)
                .map_err(|_| SessionError::HoldSetFull)?;
        }
        debug!("hold {adding} input(s), {} held", self.held.len());

        self.press(inputs)?;
        Ok(HoldOutcome::Held)
    }

    /// Release `inputs` with the hat and touch reset, then send.
    pub fn release(&mut self, inputs: &[Input]) -> Result<(), SessionError> {
        self.release_with(inputs, ReleaseOptions::default())
    }

    /// Drop `inputs` from the hold set, unset them in the state, then send.
    ///
    /// Directions release the axes they tilt. Inputs that are not held are
    /// still unset.
    pub fn release_with(&mut self, inputs: &[Input], options: ReleaseOptions) -> Result<(), SessionError> {
        for input in inputs {
            self.held.remove(input);
        }
        unapply(&mut self.state, &self.config, inputs, options);
        self.send_state()
    }

    /// End a hold started with [`hold`](Self::hold).
    pub fn hold_release(&mut self, inputs: &[Input]) -> Result<(), SessionError> {
        for input in inputs {
            if !self.held.remove(input) {
                debug!("{input} was not held");
            }
        }
        self.release(inputs)
    }

    /// Release everything held and return the hat and touch to rest.
    pub fn neutral(&mut self) -> Result<(), SessionError> {
        let held = self.held.take();
        debug!("neutral, releasing {} held input(s)", held.len());
        self.release_with(held.as_slice(), ReleaseOptions::default())
    }

    /// Send the session terminator. Binary formats have none.
    pub fn end(&mut self) -> Result<(), SessionError> {
        if self.config.format.is_text() {
            debug!("{} <- {}", self.config.format, END_RECORD);
            self.transport.send_line(END_RECORD)?;
        }
        Ok(())
    }

    /// Wait, then send each raw line unmodified. The state is not touched.
    pub fn replay<I, S>(&mut self, commands: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = (Duration, S)>,
        S: AsRef<str>,
    {
        for (delay, line) in commands {
            self.wait(delay);
            let line = line.as_ref();
            trace!("replay {line}");
            self.transport.send_line_raw(line)?;
        }
        Ok(())
    }

    /// Press, wait `hold_for`, release, wait `then_wait`.
    pub fn tap(&mut self, inputs: &[Input], hold_for: Duration, then_wait: Duration) -> Result<(), SessionError> {
        self.press(inputs)?;
        self.wait(hold_for);
        self.release(inputs)?;
        self.wait(then_wait);
        Ok(())
    }

    /// Block for `duration` (microsecond resolution).
    pub fn wait(&mut self, duration: Duration) {
        let mut remaining = duration.as_micros();
        while remaining > 0 {
            let chunk = u32::try_from(remaining).unwrap_or(u32::MAX);
            self.delay.delay_us(chunk);
            remaining -= u128::from(chunk);
        }
    }

    /// Send a firmware extension command.
    ///
    /// Skipped with a warning on binary formats and for inert commands.
    pub fn send_command(&mut self, command: &DeviceCommand<'_>) -> Result<(), SessionError> {
        if !self.config.format.is_text() {
            warn!("{} does not accept firmware commands, dropped: {command}", self.config.format);
            return Ok(());
        }
        if command.is_inert() {
            warn!("inert firmware command dropped: {command:?}");
            return Ok(());
        }
        debug!("command {command}");
        self.transport.send_line_raw(&command.to_string())?;
        Ok(())
    }

    /// Type `text` on the emulated keyboard.
    ///
    /// Toggles half/full width first and gives the console time to settle.
    pub fn type_text(&mut self, text: &str) -> Result<(), SessionError> {
        self.send_command(&DeviceCommand::Key(DeviceCommand::HALF_FULL_WIDTH))?;
        self.wait(TYPE_TEXT_SETTLE);
        self.send_command(&DeviceCommand::Text(text))
    }

    fn send_state(&mut self) -> Result<(), SessionError> {
        trace!("state {:?}", self.state);
        let record = self.state.encode(self.config.format)?;
        debug!("{} <- {}", self.config.format, record);
        match &record {
            Record::Text(line) => self.transport.send_line(line)?,
            Record::Qingpi(_) | Record::Compact(_) => self.transport.send_bytes(record.as_bytes())?,
        }
        Ok(())
    }
}

/// Set every input on the state. First hat wins; later directions win.
fn apply<'a, I>(state: &mut ControllerState, config: &SessionConfig, inputs: I)
where
    I: Iterator<Item = &'a Input> + Clone,
{
    state.set_buttons(inputs.clone().filter_map(Input::as_button), config.format.button_table());
    state.set_hat(inputs.clone().filter_map(Input::as_hat), &ConversionTable::DEFAULT);
    state.set_direction(inputs.clone().filter_map(Input::as_direction), config.reverse);
    state.set_touch(inputs.filter_map(Input::as_touch));
}

fn unapply(state: &mut ControllerState, config: &SessionConfig, inputs: &[Input], options: ReleaseOptions) {
    let tilts = inputs
        .iter()
        .filter_map(Input::as_direction)
        .fold(Tilts::NONE, |acc, dir| acc | dir.tilts());

    state.unset_buttons(inputs.iter().filter_map(Input::as_button), config.format.button_table());
    if options.unset_hat {
        state.unset_hat(&ConversionTable::DEFAULT);
    }
    state.unset_direction(tilts);
    if options.unset_touch || inputs.iter().any(Input::is_touch) {
        state.unset_touch();
    }
}
