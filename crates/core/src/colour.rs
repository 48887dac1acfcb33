// SPDX-License-Identifier: MIT

//!
//! Era colours, the palette they're drawn from, and the policy used to pick
//! them
//!

use log::trace;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The number of draws made before a repeat of the previous colour is
/// accepted
pub const MAX_COLOUR_DRAWS: usize = 5;

/// The palette era colours are drawn from (bright, but dark text stays
/// readable on all of them)
pub const PALETTE: [Colour; 15] = [
    Colour::from_rgb(0xff, 0x6b, 0x6b), // red
    Colour::from_rgb(0xfe, 0xca, 0x57), // orange
    Colour::from_rgb(0x48, 0xdb, 0xfb), // blue
    Colour::from_rgb(0xff, 0x9f, 0xf3), // pink
    Colour::from_rgb(0x54, 0xa0, 0xff), // electric blue
    Colour::from_rgb(0x1d, 0xd1, 0xa1), // caribbean green
    Colour::from_rgb(0xf3, 0x68, 0xe0), // magenta
    Colour::from_rgb(0x00, 0xd2, 0xd3), // teal
    Colour::from_rgb(0x9c, 0x88, 0xff), // purple
    Colour::from_rgb(0xff, 0x9f, 0x43), // deep orange
    Colour::from_rgb(0x83, 0x95, 0xa7), // blue grey
    Colour::from_rgb(0x22, 0xa6, 0xb3), // dark teal
    Colour::from_rgb(0xee, 0x52, 0x53), // armor red
    Colour::from_rgb(0x0a, 0xbd, 0xe3), // cyan
    Colour::from_rgb(0x10, 0xac, 0x84), // mountain meadow
];

/// Errors that can arise in relation to a [`Colour`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColourError {
    #[error("`{0}` is not a hex colour")]
    InvalidHex(String),
}

/// The `Colour` type.  Serialised as a `#rrggbb` hex string.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Colour {
    r: u8,
    g: u8,
    b: u8,
}

impl Colour {
    /// Create a colour from RGB values
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Colour { r, g, b }
    }

    /// Create a colour from a hex colour (e.g. `#ab66ef`, `ab66ef`, `#ab66efff`).
    /// If the hex value has an alpha component, it is removed.
    pub fn from_hex(hex_colour: &str) -> Result<Self, ColourError> {
        let invalid = || ColourError::InvalidHex(hex_colour.to_string());
        let digits = hex_colour.strip_prefix('#').unwrap_or(hex_colour);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let digits = match digits.len() {
            6 => digits,
            8 => &digits[0..6],
            _ => return Err(invalid()),
        };
        let component = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Colour::from_rgb(component(0)?, component(2)?, component(4)?))
    }

    /// To get RGB as, say, #0affc3 (for CSS and CSV)
    pub fn to_hex(&self) -> String {
        // {:02x} prints as hex, padded to 2 chars with "0"
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Get a colour as RGB values
    pub fn as_rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Get a lighter shade of the specified colour
    pub fn lightened_colour(colour: Colour) -> Colour {
        let lighten = |c: u8| {
            let c = f64::from(c);
            (c + (0.5 * (255.0 - c))).round() as u8
        };
        Colour::from_rgb(lighten(colour.r), lighten(colour.g), lighten(colour.b))
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Colour> for String {
    fn from(value: Colour) -> Self {
        value.to_hex()
    }
}

impl TryFrom<String> for Colour {
    type Error = ColourError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Colour::from_hex(&value)
    }
}

impl From<Colour> for [u8; 3] {
    fn from(value: Colour) -> Self {
        [value.r, value.g, value.b]
    }
}

/// Implementing types decide which colour a newly created era gets
pub trait ColourPolicy {
    /// The colour for the next new era
    fn next_colour(&mut self) -> Colour;
}

/// Picks uniformly at random from the [`PALETTE`], redrawing (up to
/// [`MAX_COLOUR_DRAWS`] draws in total) while the draw repeats the previously
/// assigned colour.  Adjacent eras are therefore very likely, but not
/// guaranteed, to differ.
pub struct PaletteColours {
    rng: Box<dyn RngCore>,
    last_assigned: Option<Colour>,
}

impl PaletteColours {
    /// Draw using the thread-local RNG
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }

    /// Draw using the given RNG (e.g. a seeded one in tests)
    pub fn with_rng<R: RngCore + 'static>(rng: R) -> Self {
        Self {
            rng: Box::new(rng),
            last_assigned: None,
        }
    }

    /// The colour assigned most recently (if any)
    pub fn last_assigned(&self) -> Option<Colour> {
        self.last_assigned
    }
}

impl Default for PaletteColours {
    fn default() -> Self {
        Self::new()
    }
}

impl ColourPolicy for PaletteColours {
    fn next_colour(&mut self) -> Colour {
        let mut draws = 0;
        let colour = loop {
            let colour = PALETTE[self.rng.gen_range(0..PALETTE.len())];
            draws += 1;
            if Some(colour) != self.last_assigned || draws >= MAX_COLOUR_DRAWS {
                break colour;
            }
        };
        trace!("assigned colour {colour} after {draws} draw(s)");
        self.last_assigned = Some(colour);
        colour
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Always "draws" the same palette index
    struct StuckRng(u64);

    impl RngCore for StuckRng {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }
        fn next_u64(&mut self) -> u64 {
            self.0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    #[test]
    fn from_hex() {
        assert_eq!(
            Colour::from_hex("#ff6b6b").unwrap(),
            Colour::from_rgb(255, 107, 107)
        );
        assert_eq!(
            Colour::from_hex("FF6B6B").unwrap(),
            Colour::from_rgb(255, 107, 107)
        );
        assert_eq!(
            Colour::from_hex("#ff6b6b80").unwrap(),
            Colour::from_rgb(255, 107, 107)
        );
        assert!(Colour::from_hex("#fff").is_err());
        assert!(Colour::from_hex("#gg6b6b").is_err());
        assert!(Colour::from_hex("#ff6b6é").is_err());
    }

    #[test]
    fn to_hex() {
        assert_eq!(Colour::from_rgb(10, 255, 195).to_hex(), "#0affc3");
        for colour in PALETTE {
            assert_eq!(Colour::from_hex(&colour.to_hex()).unwrap(), colour);
        }
    }

    #[test]
    fn palette_is_distinct() {
        for (i, a) in PALETTE.iter().enumerate() {
            for b in &PALETTE[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn palette_colours_come_from_palette() {
        let mut colours = PaletteColours::with_rng(StdRng::seed_from_u64(7));
        for _ in 0..100 {
            let colour = colours.next_colour();
            assert!(PALETTE.contains(&colour));
            assert_eq!(colours.last_assigned(), Some(colour));
        }
    }

    #[test]
    fn avoids_repeating_previous_colour_when_possible() {
        let mut colours = PaletteColours::with_rng(StdRng::seed_from_u64(42));
        let mut previous = colours.next_colour();
        for _ in 0..100 {
            let colour = colours.next_colour();
            // With 15 colours, 5 draws all repeating is possible but very
            // unlikely; the seeded RNG makes this deterministic
            assert_ne!(colour, previous);
            previous = colour;
        }
    }

    #[test]
    fn accepts_repeat_after_max_draws() {
        let mut colours = PaletteColours::with_rng(StuckRng(0));
        let first = colours.next_colour();
        let second = colours.next_colour();
        assert_eq!(first, second);
    }
}
