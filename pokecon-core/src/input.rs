//! The tagged input type sessions operate on.

use core::fmt;

use pokecon_proto::{Button, Direction, Hat, Touch};

/// One logical controller input.
///
/// Every session operation takes a slice of these; each operation matches
/// on the variant to decide which part of the controller state it touches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    Button(Button),
    Hat(Hat),
    Stick(Direction),
    Touch(Touch),
}

impl Input {
    #[inline]
    #[must_use]
    pub fn as_button(&self) -> Option<Button> {
        match self {
            Self::Button(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_hat(&self) -> Option<Hat> {
        match self {
            Self::Hat(h) => Some(*h),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_direction(&self) -> Option<&Direction> {
        match self {
            Self::Stick(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_touch(&self) -> Option<Touch> {
        match self {
            Self::Touch(t) => Some(*t),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_touch(&self) -> bool {
        matches!(self, Self::Touch(_))
    }
}

impl From<Button> for Input {
    fn from(button: Button) -> Self {
        Self::Button(button)
    }
}

impl From<Hat> for Input {
    fn from(hat: Hat) -> Self {
        Self::Hat(hat)
    }
}

impl From<Direction> for Input {
    fn from(direction: Direction) -> Self {
        Self::Stick(direction)
    }
}

impl From<Touch> for Input {
    fn from(touch: Touch) -> Self {
        Self::Touch(touch)
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Button(b) => b.fmt(f),
            Self::Hat(h) => h.fmt(f),
            Self::Stick(d) => d.fmt(f),
            Self::Touch(t) => t.fmt(f),
        }
    }
}
