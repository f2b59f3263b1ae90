/// An LED color from the palette the Launch Control XL 3 understands in a custom mode.
///
/// Each variant maps to exactly one palette code, which is the byte stored in the template. The
/// hues are ordered the same way the device palette is, which is also the order the editor cycles
/// through them:
///
/// ```rust
/// use lcxl3::LedColor;
///
/// assert_eq!(LedColor::Red.next(), LedColor::Orange);
/// assert_eq!(LedColor::Pink.next(), LedColor::Off);
/// assert_eq!(LedColor::Off.next(), LedColor::Disabled);
/// assert_eq!(LedColor::Disabled.next(), LedColor::Red);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LedColor {
    Red,
    Orange,
    Yellow,
    Lime,
    Green,
    Turquoise,
    Cyan,
    LightBlue,
    Blue,
    DarkBlue,
    Purple,
    Fuchsia,
    Pink,
    /// LED dark, control still active
    Off,
    /// LED disabled entirely
    Disabled,
}

impl LedColor {
    /// The editor cycle: all hues, then `Off` and `Disabled`
    pub const CYCLE: [LedColor; 15] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Lime,
        Self::Green,
        Self::Turquoise,
        Self::Cyan,
        Self::LightBlue,
        Self::Blue,
        Self::DarkBlue,
        Self::Purple,
        Self::Fuchsia,
        Self::Pink,
        Self::Off,
        Self::Disabled,
    ];

    /// Every color that may legally appear at a color offset
    pub const PALETTE: [LedColor; 15] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Lime,
        Self::Green,
        Self::Turquoise,
        Self::Cyan,
        Self::LightBlue,
        Self::Blue,
        Self::DarkBlue,
        Self::Purple,
        Self::Fuchsia,
        Self::Pink,
        Self::Off,
        Self::Disabled,
    ];

    /// The palette byte stored in the template
    pub fn code(self) -> u8 {
        match self {
            Self::Red => 0x05,
            Self::Orange => 0x09,
            Self::Yellow => 0x0D,
            Self::Lime => 0x11,
            Self::Green => 0x19,
            Self::Turquoise => 0x1D,
            Self::Cyan => 0x21,
            Self::LightBlue => 0x25,
            Self::Blue => 0x29,
            Self::DarkBlue => 0x2D,
            Self::Purple => 0x31,
            Self::Fuchsia => 0x35,
            Self::Pink => 0x39,
            Self::Off => 0x03,
            Self::Disabled => 0x00,
        }
    }

    /// Look up a palette byte. Returns `None` for bytes the device tool never writes
    pub fn from_code(code: u8) -> Option<Self> {
        Self::PALETTE.into_iter().find(|color| color.code() == code)
    }

    fn cycle_position(self) -> usize {
        Self::CYCLE
            .iter()
            .position(|&color| color == self)
            .unwrap_or_default()
    }

    /// The following entry in [`Self::CYCLE`], wrapping from `Disabled` back to red
    pub fn next(self) -> Self {
        Self::CYCLE[(self.cycle_position() + 1) % Self::CYCLE.len()]
    }

    /// The preceding entry in [`Self::CYCLE`], wrapping from red to `Disabled`
    pub fn previous(self) -> Self {
        let len = Self::CYCLE.len();
        Self::CYCLE[(self.cycle_position() + len - 1) % len]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Lime => "lime",
            Self::Green => "green",
            Self::Turquoise => "turquoise",
            Self::Cyan => "cyan",
            Self::LightBlue => "light blue",
            Self::Blue => "blue",
            Self::DarkBlue => "dark blue",
            Self::Purple => "purple",
            Self::Fuchsia => "fuchsia",
            Self::Pink => "pink",
            Self::Off => "off",
            Self::Disabled => "disabled",
        }
    }

    /// Two-letter label used in the grid editor
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Red => "RD",
            Self::Orange => "OR",
            Self::Yellow => "YL",
            Self::Lime => "LM",
            Self::Green => "GR",
            Self::Turquoise => "TQ",
            Self::Cyan => "CY",
            Self::LightBlue => "LB",
            Self::Blue => "BL",
            Self::DarkBlue => "DB",
            Self::Purple => "PU",
            Self::Fuchsia => "FU",
            Self::Pink => "PK",
            Self::Off => "--",
            Self::Disabled => "XX",
        }
    }

    /// Rough on-screen approximation of the LED, as 8-bit RGB
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Red => (255, 0, 0),
            Self::Orange => (255, 128, 0),
            Self::Yellow => (255, 230, 0),
            Self::Lime => (160, 255, 0),
            Self::Green => (0, 200, 0),
            Self::Turquoise => (0, 210, 150),
            Self::Cyan => (0, 230, 230),
            Self::LightBlue => (90, 170, 255),
            Self::Blue => (0, 70, 255),
            Self::DarkBlue => (20, 20, 150),
            Self::Purple => (140, 40, 230),
            Self::Fuchsia => (230, 0, 200),
            Self::Pink => (255, 105, 180),
            Self::Off => (90, 90, 90),
            Self::Disabled => (40, 40, 40),
        }
    }
}

impl Default for LedColor {
    fn default() -> Self {
        Self::Off
    }
}

impl std::fmt::Display for LedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
