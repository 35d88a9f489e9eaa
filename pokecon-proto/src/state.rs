//! The emulated controller's current state and its mutation API.

use crate::geometry::{Direction, AXIS_MAX, AXIS_MIN, CENTER};
use crate::table::ConversionTable;
use crate::types::{Button, Hat, Stick, Tilts, Touch};

/// Optional axis inversion applied when storing stick coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AxisReverse {
    pub x: bool,
    pub y: bool,
}

/// Everything the peripheral needs to know about the controller right now.
///
/// - `buttons`: bitmask in the layout of the active [`ConversionTable`]
/// - `hat`: hat code
/// - `lx`, `ly`, `rx`, `ry`: raw axis bytes, `y` grows downward
/// - `touch`: touch point, `(0, 0)` when untouched
///
/// Each stick also carries a "changed since last send" flag. Any stick
/// mutation sets it; the next serialization reads and clears it.
///
/// # Example
///
/// ```
/// use pokecon_proto::{Button, ConversionTable, ControllerState};
///
/// let mut state = ControllerState::new();
/// state.set_buttons([Button::A], &ConversionTable::DEFAULT);
/// assert_eq!(state.buttons, 0b100);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerState {
    pub buttons: u16,
    pub hat: u8,
    pub lx: u8,
    pub ly: u8,
    pub rx: u8,
    pub ry: u8,
    pub touch: Touch,
    left_changed: bool,
    right_changed: bool,
    last_hat: u8,
}

impl ControllerState {
    /// Resting state: no buttons, hat centered, sticks at 128, no touch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buttons: 0,
            hat: Hat::Center.code(),
            lx: CENTER,
            ly: CENTER,
            rx: CENTER,
            ry: CENTER,
            touch: Touch::NONE,
            left_changed: false,
            right_changed: false,
            last_hat: Hat::Center.code(),
        }
    }

    /// Whether the stick changed since the last serialization.
    #[inline]
    #[must_use]
    pub const fn stick_changed(&self, stick: Stick) -> bool {
        match stick {
            Stick::Left => self.left_changed,
            Stick::Right => self.right_changed,
        }
    }

    /// Axis pair of one stick as stored.
    #[inline]
    #[must_use]
    pub const fn stick(&self, stick: Stick) -> (u8, u8) {
        match stick {
            Stick::Left => (self.lx, self.ly),
            Stick::Right => (self.rx, self.ry),
        }
    }

    /// Read and clear both changed flags.
    #[inline]
    pub(crate) fn take_changed(&mut self) -> (bool, bool) {
        let flags = (self.left_changed, self.right_changed);
        self.left_changed = false;
        self.right_changed = false;
        flags
    }

    pub fn set_buttons<I>(&mut self, buttons: I, table: &ConversionTable)
    where
        I: IntoIterator<Item = Button>,
    {
        for button in buttons {
            self.buttons |= table.button(button);
        }
    }

    pub fn unset_buttons<I>(&mut self, buttons: I, table: &ConversionTable)
    where
        I: IntoIterator<Item = Button>,
    {
        for button in buttons {
            self.buttons &= !table.button(button);
        }
    }

    pub fn reset_all_buttons(&mut self) {
        self.buttons = 0;
    }

    /// Set the hat from the first element of `hats`.
    ///
    /// With no hats, the last hat set is re-applied.
    pub fn set_hat<I>(&mut self, hats: I, table: &ConversionTable)
    where
        I: IntoIterator<Item = Hat>,
    {
        if let Some(hat) = hats.into_iter().next() {
            self.last_hat = table.hat(hat);
        }
        self.hat = self.last_hat;
    }

    pub fn unset_hat(&mut self, table: &ConversionTable) {
        self.last_hat = table.hat(Hat::Center);
        self.hat = self.last_hat;
    }

    /// Store each direction on its stick, later entries winning.
    ///
    /// `y` is flipped (`255 - y`) unless `reverse.y` is set; `x` is stored
    /// as-is unless `reverse.x` is set.
    pub fn set_direction<'a, I>(&mut self, directions: I, reverse: AxisReverse)
    where
        I: IntoIterator<Item = &'a Direction>,
    {
        for dir in directions {
            let x = if reverse.x { AXIS_MAX - dir.x() } else { dir.x() };
            let y = if reverse.y { dir.y() } else { AXIS_MAX - dir.y() };

            let (sx, sy, changed) = match dir.stick() {
                Stick::Left => (&mut self.lx, &mut self.ly, &mut self.left_changed),
                Stick::Right => (&mut self.rx, &mut self.ry, &mut self.right_changed),
            };
            if (*sx, *sy) != (x, y) {
                *changed = true;
            }
            *sx = x;
            *sy = y;
        }
    }

    /// Return the axes named by `tilts` to center.
    ///
    /// The stick's other axis is snapped to its nearest extreme (or kept at
    /// center) so a half-released diagonal never leaves an in-between value.
    pub fn unset_direction(&mut self, tilts: Tilts) {
        if tilts.intersects(Tilts::UP | Tilts::DOWN) {
            self.ly = CENTER;
            self.lx = fix_other_axis(self.lx);
            self.left_changed = true;
        }
        if tilts.intersects(Tilts::RIGHT | Tilts::LEFT) {
            self.lx = CENTER;
            self.ly = fix_other_axis(self.ly);
            self.left_changed = true;
        }
        if tilts.intersects(Tilts::R_UP | Tilts::R_DOWN) {
            self.ry = CENTER;
            self.rx = fix_other_axis(self.rx);
            self.right_changed = true;
        }
        if tilts.intersects(Tilts::R_RIGHT | Tilts::R_LEFT) {
            self.rx = CENTER;
            self.ry = fix_other_axis(self.ry);
            self.right_changed = true;
        }
    }

    /// Center both sticks and mark them changed.
    ///
    /// Also forgets the last hat, so an empty `set_hat` afterwards centers it.
    pub fn reset_all_directions(&mut self) {
        self.lx = CENTER;
        self.ly = CENTER;
        self.rx = CENTER;
        self.ry = CENTER;
        self.left_changed = true;
        self.right_changed = true;
        self.last_hat = Hat::Center.code();
    }

    /// Store the first touch point; no-op for an empty input.
    pub fn set_touch<I>(&mut self, touches: I)
    where
        I: IntoIterator<Item = Touch>,
    {
        if let Some(touch) = touches.into_iter().next() {
            self.touch = touch;
        }
    }

    pub fn unset_touch(&mut self) {
        self.touch = Touch::NONE;
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn fix_other_axis(value: u8) -> u8 {
    if value == CENTER {
        CENTER
    } else if value < CENTER {
        AXIS_MIN
    } else {
        AXIS_MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Angle;

    const DEFAULT: &ConversionTable = &ConversionTable::DEFAULT;

    #[test]
    fn test_new_state_is_at_rest() {
        let state = ControllerState::new();
        assert_eq!(state.buttons, 0);
        assert_eq!(state.hat, 8);
        assert_eq!(state.stick(Stick::Left), (128, 128));
        assert_eq!(state.stick(Stick::Right), (128, 128));
        assert!(!state.stick_changed(Stick::Left));
        assert!(!state.stick_changed(Stick::Right));
        assert_eq!(state, ControllerState::default());
    }

    #[test]
    fn test_set_and_unset_buttons() {
        let mut state = ControllerState::new();
        state.set_buttons([Button::A, Button::B, Button::START], DEFAULT);
        assert_eq!(state.buttons, 0b10_0000_0110);

        state.unset_buttons([Button::Plus], DEFAULT);
        assert_eq!(state.buttons, 0b0110);

        state.reset_all_buttons();
        assert_eq!(state.buttons, 0);
    }

    #[test]
    fn test_unsupported_button_is_inert() {
        let mut state = ControllerState::new();
        state.set_buttons([Button::Zl, Button::Capture], &ConversionTable::COMPACT);
        assert_eq!(state.buttons, 0);
    }

    #[test]
    fn test_set_hat_takes_first_and_remembers() {
        let mut state = ControllerState::new();
        state.set_hat([Hat::Right, Hat::Left], DEFAULT);
        assert_eq!(state.hat, Hat::Right.code());

        state.hat = 0;
        state.set_hat(None::<Hat>, DEFAULT);
        assert_eq!(state.hat, Hat::Right.code());

        state.unset_hat(DEFAULT);
        assert_eq!(state.hat, Hat::Center.code());
        state.set_hat(None::<Hat>, DEFAULT);
        assert_eq!(state.hat, Hat::Center.code());
    }

    #[test]
    fn test_set_direction_flips_y_and_marks_changed() {
        let mut state = ControllerState::new();
        state.set_direction(&[Direction::UP], AxisReverse::default());
        assert_eq!(state.stick(Stick::Left), (128, 0));
        assert!(state.stick_changed(Stick::Left));
        assert!(!state.stick_changed(Stick::Right));

        state.set_direction(&[Direction::R_RIGHT], AxisReverse::default());
        assert_eq!(state.stick(Stick::Right), (255, 128));
        assert!(state.stick_changed(Stick::Right));
    }

    #[test]
    fn test_set_direction_same_value_is_not_a_change() {
        let mut state = ControllerState::new();
        state.set_direction(&[Direction::LEFT], AxisReverse::default());
        state.take_changed();

        state.set_direction(&[Direction::LEFT], AxisReverse::default());
        assert!(!state.stick_changed(Stick::Left));
    }

    #[test]
    fn test_set_direction_reverse() {
        let mut state = ControllerState::new();
        let reverse = AxisReverse { x: true, y: true };
        state.set_direction(&[Direction::from_coordinates(Stick::Left, 10, 20)], reverse);
        assert_eq!(state.stick(Stick::Left), (245, 20));
    }

    #[test]
    fn test_unset_direction_fixes_other_axis() {
        let mut state = ControllerState::new();
        let dir = Direction::with_magnitude(Stick::Left, Angle::Degrees(60.0), 1.0);
        state.set_direction(&[dir], AxisReverse::default());
        let (lx, _) = state.stick(Stick::Left);
        assert!(lx > 128);

        // Releasing only the vertical axis pushes x to its extreme
        state.unset_direction(Tilts::UP);
        assert_eq!(state.stick(Stick::Left), (255, 128));

        state.unset_direction(Tilts::RIGHT);
        assert_eq!(state.stick(Stick::Left), (128, 128));
    }

    #[test]
    fn test_unset_direction_diagonal_returns_to_center() {
        let mut state = ControllerState::new();
        state.set_direction(&[Direction::R_DOWN_LEFT], AxisReverse::default());
        state.unset_direction(Direction::R_DOWN_LEFT.tilts());
        assert_eq!(state.stick(Stick::Right), (128, 128));
        assert!(state.stick_changed(Stick::Right));
        assert!(!state.stick_changed(Stick::Left));
    }

    #[test]
    fn test_unset_direction_is_idempotent() {
        let mut once = ControllerState::new();
        let dir = Direction::from_coordinates(Stick::Left, 60, 250);
        once.set_direction(&[dir], AxisReverse::default());
        let mut twice = once;

        once.unset_direction(Tilts::UP);
        twice.unset_direction(Tilts::UP);
        twice.unset_direction(Tilts::UP);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reset_all_directions() {
        let mut state = ControllerState::new();
        state.set_direction(&[Direction::UP, Direction::R_LEFT], AxisReverse::default());
        state.set_hat([Hat::Btm], DEFAULT);
        state.take_changed();

        state.reset_all_directions();
        assert_eq!(state.stick(Stick::Left), (128, 128));
        assert_eq!(state.stick(Stick::Right), (128, 128));
        assert!(state.stick_changed(Stick::Left));
        assert!(state.stick_changed(Stick::Right));

        // Only the remembered hat is reset
        assert_eq!(state.hat, Hat::Btm.code());
        state.set_hat(None::<Hat>, DEFAULT);
        assert_eq!(state.hat, Hat::Center.code());
    }

    #[test]
    fn test_touch() {
        let mut state = ControllerState::new();
        state.set_touch(None::<Touch>);
        assert_eq!(state.touch, Touch::NONE);

        state.set_touch([Touch::new(300, 200), Touch::new(1, 1)]);
        assert_eq!(state.touch, Touch::new(300, 200));

        state.unset_touch();
        assert_eq!(state.touch, Touch::NONE);
    }
}
