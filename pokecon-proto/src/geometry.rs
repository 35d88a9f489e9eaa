//! Stick geometry: polar input to 8-bit axis coordinates, and tilt classification.
//!
//! Axis bytes run from 0 to 255. The x axis rounds up and the y axis rounds
//! down, so a stick at rest resolves to [`NEUTRAL`] = `(128, 127)` rather
//! than a symmetric pair.

use core::fmt;

use crate::types::{Stick, Tilts};

/// Axis center value.
pub const CENTER: u8 = 128;

/// Axis minimum value.
pub const AXIS_MIN: u8 = 0;

/// Axis maximum value.
pub const AXIS_MAX: u8 = 255;

/// Coordinate produced for any angle at zero magnitude.
pub const NEUTRAL: (u8, u8) = (128, 127);

/// Half of the axis span; the radius of the stick circle.
const RADIUS: f64 = 127.5;

/// A stick angle, counter-clockwise from "right".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Angle {
    Degrees(f64),
    Radians(f64),
}

impl Angle {
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> f64 {
        match self {
            Self::Degrees(deg) => deg.to_radians(),
            Self::Radians(rad) => rad,
        }
    }
}

/// Convert a polar stick position to an `(x, y)` axis pair.
///
/// The magnitude is clamped to `[0, 1]` (NaN counts as 0).
///
/// ```
/// use pokecon_proto::geometry::{coordinate_from_polar, Angle, NEUTRAL};
///
/// assert_eq!(coordinate_from_polar(Angle::Degrees(90.0), 1.0), (128, 255));
/// assert_eq!(coordinate_from_polar(Angle::Degrees(33.0), 0.0), NEUTRAL);
/// ```
#[must_use]
pub fn coordinate_from_polar(angle: Angle, magnitude: f64) -> (u8, u8) {
    let magnitude = clamp_magnitude(magnitude);
    let rad = angle.to_radians();

    // `as u8` saturates, so the result stays in [0, 255] even for NaN angles.
    let x = (RADIUS * rad.cos() * magnitude + RADIUS).ceil() as u8;
    let y = (RADIUS * rad.sin() * magnitude + RADIUS).floor() as u8;
    (x, y)
}

#[inline]
fn clamp_magnitude(magnitude: f64) -> f64 {
    if magnitude > 1.0 {
        1.0
    } else if magnitude > 0.0 {
        magnitude
    } else {
        0.0
    }
}

/// Classify a stick coordinate into tilt directions.
///
/// Strict comparisons against `x == 128` and `y == 127`: a coordinate on
/// the center line contributes nothing for that axis.
#[must_use]
pub fn classify_tilt(stick: Stick, x: u8, y: u8) -> Tilts {
    let (up, right, down, left) = match stick {
        Stick::Left => (Tilts::UP, Tilts::RIGHT, Tilts::DOWN, Tilts::LEFT),
        Stick::Right => (Tilts::R_UP, Tilts::R_RIGHT, Tilts::R_DOWN, Tilts::R_LEFT),
    };

    let mut tilts = Tilts::NONE;
    if x < CENTER {
        tilts |= left;
    } else if x > CENTER {
        tilts |= right;
    }
    if y < CENTER - 1 {
        tilts |= down;
    } else if y > CENTER - 1 {
        tilts |= up;
    }
    tilts
}

/// Where a [`Direction`]'s coordinate came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Source {
    /// Angle plus magnitude (already clamped).
    Polar { angle: Angle, magnitude: f64 },
    /// Raw axis pair given by the caller.
    Coordinates(u8, u8),
}

/// An immutable stick position for one stick.
///
/// The `(x, y)` pair is resolved once at construction. `x` grows to the
/// right and `y` grows upward; the controller state flips `y` when it
/// stores the value.
///
/// Two directions are equal when they target the same stick with the same
/// angle (or the same raw pair). Magnitude and the display name of the
/// preset constants do not take part.
///
/// # Example
///
/// ```
/// use pokecon_proto::{Direction, Stick, Tilts};
///
/// let up_right = Direction::new(Stick::Left, 45.0);
/// assert_eq!(up_right, Direction::UP_RIGHT);
/// assert_eq!(up_right.tilts(), Tilts::UP | Tilts::RIGHT);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Direction {
    stick: Stick,
    x: u8,
    y: u8,
    source: Source,
    name: Option<&'static str>,
}

impl Direction {
    pub const UP: Self = Self::preset(Stick::Left, 90.0, 128, 255, "UP");
    pub const RIGHT: Self = Self::preset(Stick::Left, 0.0, 255, 127, "RIGHT");
    pub const DOWN: Self = Self::preset(Stick::Left, -90.0, 128, 0, "DOWN");
    pub const LEFT: Self = Self::preset(Stick::Left, -180.0, 0, 127, "LEFT");
    pub const UP_RIGHT: Self = Self::preset(Stick::Left, 45.0, 218, 217, "UP_RIGHT");
    pub const DOWN_RIGHT: Self = Self::preset(Stick::Left, -45.0, 218, 37, "DOWN_RIGHT");
    pub const DOWN_LEFT: Self = Self::preset(Stick::Left, -135.0, 38, 37, "DOWN_LEFT");
    pub const UP_LEFT: Self = Self::preset(Stick::Left, 135.0, 38, 217, "UP_LEFT");

    pub const R_UP: Self = Self::preset(Stick::Right, 90.0, 128, 255, "UP");
    pub const R_RIGHT: Self = Self::preset(Stick::Right, 0.0, 255, 127, "RIGHT");
    pub const R_DOWN: Self = Self::preset(Stick::Right, -90.0, 128, 0, "DOWN");
    pub const R_LEFT: Self = Self::preset(Stick::Right, -180.0, 0, 127, "LEFT");
    pub const R_UP_RIGHT: Self = Self::preset(Stick::Right, 45.0, 218, 217, "UP_RIGHT");
    pub const R_DOWN_RIGHT: Self = Self::preset(Stick::Right, -45.0, 218, 37, "DOWN_RIGHT");
    pub const R_DOWN_LEFT: Self = Self::preset(Stick::Right, -135.0, 38, 37, "DOWN_LEFT");
    pub const R_UP_LEFT: Self = Self::preset(Stick::Right, 135.0, 38, 217, "UP_LEFT");

    // Coordinates are the full-magnitude values of `coordinate_from_polar`.
    const fn preset(stick: Stick, degrees: f64, x: u8, y: u8, name: &'static str) -> Self {
        Self {
            stick,
            x,
            y,
            source: Source::Polar {
                angle: Angle::Degrees(degrees),
                magnitude: 1.0,
            },
            name: Some(name),
        }
    }

    /// Full tilt at the given angle in degrees.
    #[must_use]
    pub fn new(stick: Stick, degrees: f64) -> Self {
        Self::with_magnitude(stick, Angle::Degrees(degrees), 1.0)
    }

    /// Partial tilt; `magnitude` is clamped to `[0, 1]`.
    #[must_use]
    pub fn with_magnitude(stick: Stick, angle: Angle, magnitude: f64) -> Self {
        let magnitude = clamp_magnitude(magnitude);
        let (x, y) = coordinate_from_polar(angle, magnitude);
        Self {
            stick,
            x,
            y,
            source: Source::Polar { angle, magnitude },
            name: None,
        }
    }

    /// A raw axis pair, used as-is.
    #[must_use]
    pub const fn from_coordinates(stick: Stick, x: u8, y: u8) -> Self {
        Self {
            stick,
            x,
            y,
            source: Source::Coordinates(x, y),
            name: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn stick(&self) -> Stick {
        self.stick
    }

    #[inline]
    #[must_use]
    pub const fn x(&self) -> u8 {
        self.x
    }

    #[inline]
    #[must_use]
    pub const fn y(&self) -> u8 {
        self.y
    }

    #[inline]
    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    /// Display name of a preset constant.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Tilt directions this position implies.
    #[must_use]
    pub fn tilts(&self) -> Tilts {
        classify_tilt(self.stick, self.x, self.y)
    }
}

// Magnitude does not take part in identity.
impl PartialEq for Direction {
    fn eq(&self, other: &Self) -> bool {
        let same_source = match (self.source, other.source) {
            (Source::Polar { angle: a, .. }, Source::Polar { angle: b, .. }) => a == b,
            (Source::Coordinates(ax, ay), Source::Coordinates(bx, by)) => (ax, ay) == (bx, by),
            _ => false,
        };
        self.stick == other.stick && same_source
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name, self.source) {
            (Some(name), _) => write!(f, "<{}, {}>", self.stick, name),
            (None, Source::Polar { angle: Angle::Degrees(deg), .. }) => {
                write!(f, "<{}, {}[deg]>", self.stick, deg)
            }
            (None, Source::Polar { angle: Angle::Radians(rad), .. }) => {
                write!(f, "<{}, {}[rad]>", self.stick, rad)
            }
            (None, Source::Coordinates(x, y)) => write!(f, "<{}, ({}, {})>", self.stick, x, y),
        }
    }
}
