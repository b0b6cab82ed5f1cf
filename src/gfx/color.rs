//! Banded palette interpolation.
//!
//! A palette has four entries. The track is split at 0.25, 0.5 and 0.75;
//! around each split there is a 0.07 wide window where the two neighbouring
//! entries are blended with a smoothstep, everywhere else the colour is flat.

use super::anim::{lerp, smoothstep};
use super::math::Color;
use anyhow::{bail, Result};

pub const BAND_BOUNDARIES: [f32; 3] = [0.25, 0.5, 0.75];
pub const BAND_HALF_WIDTH: f32 = 0.035;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            bail!("Invalid color {:?}: expected #rrggbb", hex);
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| anyhow::anyhow!("Invalid color {:?}: {}", hex, e))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Component-wise linear blend, rounded to whole channel values.
    pub fn mix(self, other: Rgb, w: f32) -> Rgb {
        let w = w.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| lerp(a as f32, b as f32, w).round().clamp(0.0, 255.0) as u8;
        Rgb::new(ch(self.r, other.r), ch(self.g, other.g), ch(self.b, other.b))
    }

    pub fn to_color(self) -> Color {
        Color::rgba(self.r, self.g, self.b, 255)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        rgb.to_color()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(pub [Rgb; 4]);

impl Palette {
    pub const TRACK: Palette = Palette([
        Rgb::new(0x5b, 0x8d, 0xef),
        Rgb::new(0x2f, 0xbf, 0xa0),
        Rgb::new(0xf2, 0xb1, 0x34),
        Rgb::new(0xef, 0x5b, 0x6e),
    ]);

    pub const MARKER: Palette = Palette([
        Rgb::new(0xdc, 0xe8, 0xff),
        Rgb::new(0xd4, 0xf5, 0xec),
        Rgb::new(0xfd, 0xef, 0xcf),
        Rgb::new(0xfd, 0xdb, 0xe0),
    ]);

    pub fn from_hex<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        if entries.len() != 4 {
            bail!("A palette needs exactly 4 colors, got {}", entries.len());
        }
        let mut out = [Rgb::default(); 4];
        for (slot, hex) in out.iter_mut().zip(entries) {
            *slot = Rgb::from_hex(hex.as_ref())?;
        }
        Ok(Palette(out))
    }

    pub fn color_at(&self, t: f32) -> Rgb {
        color_at(self, t)
    }
}

/// Colour of `palette` at path position `t`.
pub fn color_at(palette: &Palette, t: f32) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let entries = &palette.0;

    for (band, boundary) in BAND_BOUNDARIES.iter().enumerate() {
        let start = boundary - BAND_HALF_WIDTH;
        if t < start {
            return entries[band];
        }
        if t <= boundary + BAND_HALF_WIDTH {
            let f = (t - start) / (BAND_HALF_WIDTH * 2.0);
            return entries[band].mix(entries[band + 1], smoothstep(f));
        }
    }
    entries[3]
}
