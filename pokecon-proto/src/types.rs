//! Canonical controller inputs: Button, Hat, Stick, Tilts, Touch.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

/// One of the 14 physical buttons of the emulated controller.
///
/// The discriminant is the button's slot in the default bit layout
/// (`Y` is bit 0, `CAPTURE` is bit 13). Device-specific layouts are
/// resolved through a [`ConversionTable`](crate::ConversionTable).
///
/// The 3DS-style names `SELECT`, `START`, `POWER` and `WIRELESS` are
/// associated constants, not variants: they are the same button as
/// `Minus`, `Plus`, `LClick` and `RClick`.
///
/// # Example
///
/// ```
/// use pokecon_proto::Button;
///
/// assert_eq!(Button::SELECT, Button::Minus);
/// assert_eq!(Button::from_name("start"), Some(Button::Plus));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Button {
    Y = 0,
    B = 1,
    A = 2,
    X = 3,
    L = 4,
    R = 5,
    Zl = 6,
    Zr = 7,
    Minus = 8,
    Plus = 9,
    LClick = 10,
    RClick = 11,
    Home = 12,
    Capture = 13,
}

impl Button {
    pub const SELECT: Self = Self::Minus;
    pub const START: Self = Self::Plus;
    pub const POWER: Self = Self::LClick;
    pub const WIRELESS: Self = Self::RClick;

    /// Number of canonical buttons.
    pub const COUNT: usize = 14;

    /// All canonical buttons in slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Y,
        Self::B,
        Self::A,
        Self::X,
        Self::L,
        Self::R,
        Self::Zl,
        Self::Zr,
        Self::Minus,
        Self::Plus,
        Self::LClick,
        Self::RClick,
        Self::Home,
        Self::Capture,
    ];

    /// Slot index in the default layout.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical upper-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Y => "Y",
            Self::B => "B",
            Self::A => "A",
            Self::X => "X",
            Self::L => "L",
            Self::R => "R",
            Self::Zl => "ZL",
            Self::Zr => "ZR",
            Self::Minus => "MINUS",
            Self::Plus => "PLUS",
            Self::LClick => "LCLICK",
            Self::RClick => "RCLICK",
            Self::Home => "HOME",
            Self::Capture => "CAPTURE",
        }
    }

    /// Resolve a button name, including the alias names, to its canonical button.
    ///
    /// Matching is ASCII case-insensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        const ALIASES: [(&str, Button); 4] = [
            ("SELECT", Button::SELECT),
            ("START", Button::START),
            ("POWER", Button::POWER),
            ("WIRELESS", Button::WIRELESS),
        ];

        Self::ALL
            .iter()
            .map(|&b| (b.name(), b))
            .chain(ALIASES)
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, b)| b)
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Directional hat position. Exactly one value is active at a time.
///
/// The discriminant is the canonical hat code sent by the default and
/// 11-byte formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Hat {
    Top = 0,
    TopRight = 1,
    Right = 2,
    BtmRight = 3,
    Btm = 4,
    BtmLeft = 5,
    Left = 6,
    TopLeft = 7,
    #[default]
    Center = 8,
}

impl Hat {
    /// Canonical hat code (0-8).
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a hat by its canonical code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Top,
            1 => Self::TopRight,
            2 => Self::Right,
            3 => Self::BtmRight,
            4 => Self::Btm,
            5 => Self::BtmLeft,
            6 => Self::Left,
            7 => Self::TopLeft,
            8 => Self::Center,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "TOP",
            Self::TopRight => "TOP_RIGHT",
            Self::Right => "RIGHT",
            Self::BtmRight => "BTM_RIGHT",
            Self::Btm => "BTM",
            Self::BtmLeft => "BTM_LEFT",
            Self::Left => "LEFT",
            Self::TopLeft => "TOP_LEFT",
            Self::Center => "CENTER",
        }
    }
}

impl fmt::Display for Hat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which analog stick an operation applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stick {
    Left,
    Right,
}

impl fmt::Display for Stick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        })
    }
}

/// Set of discrete tilt directions derived from stick coordinates.
///
/// Used only when releasing a stick: each direction names the axis that
/// has to return to center.
///
/// # Example
///
/// ```
/// use pokecon_proto::Tilts;
///
/// let tilts = Tilts::UP | Tilts::RIGHT;
/// assert!(tilts.contains(Tilts::UP));
/// assert!(!tilts.contains(Tilts::R_UP));
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Tilts(pub u8);

impl Tilts {
    pub const UP: Self = Self(1 << 0);
    pub const RIGHT: Self = Self(1 << 1);
    pub const DOWN: Self = Self(1 << 2);
    pub const LEFT: Self = Self(1 << 3);
    pub const R_UP: Self = Self(1 << 4);
    pub const R_RIGHT: Self = Self(1 << 5);
    pub const R_DOWN: Self = Self(1 << 6);
    pub const R_LEFT: Self = Self(1 << 7);

    pub const NONE: Self = Self(0);

    /// Check if every direction in `other` is present.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Tilts) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any direction in `other` is present.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Tilts) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of directions in the set.
    #[inline]
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for Tilts {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Tilts {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A point on the touch surface.
///
/// `x` travels as two bytes, `y` as one.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct Touch {
    pub x: u16,
    pub y: u8,
}

impl Touch {
    #[must_use]
    pub const fn new(x: u16, y: u8) -> Self {
        Self { x, y }
    }

    /// No touch.
    pub const NONE: Self = Self { x: 0, y: 0 };
}

impl fmt::Display for Touch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TOUCH({}, {})", self.x, self.y)
    }
}
