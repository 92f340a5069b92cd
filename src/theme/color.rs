//! Minimal RGB color handling for fills: parsing, interpolation, shading.

use std::fmt;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// CSS level 1 keywords plus orange.
const NAMED: [(&str, Rgb); 17] = [
    ("black", Rgb::new(0x00, 0x00, 0x00)),
    ("silver", Rgb::new(0xc0, 0xc0, 0xc0)),
    ("gray", Rgb::new(0x80, 0x80, 0x80)),
    ("white", Rgb::new(0xff, 0xff, 0xff)),
    ("maroon", Rgb::new(0x80, 0x00, 0x00)),
    ("red", Rgb::new(0xff, 0x00, 0x00)),
    ("purple", Rgb::new(0x80, 0x00, 0x80)),
    ("fuchsia", Rgb::new(0xff, 0x00, 0xff)),
    ("green", Rgb::new(0x00, 0x80, 0x00)),
    ("lime", Rgb::new(0x00, 0xff, 0x00)),
    ("olive", Rgb::new(0x80, 0x80, 0x00)),
    ("yellow", Rgb::new(0xff, 0xff, 0x00)),
    ("navy", Rgb::new(0x00, 0x00, 0x80)),
    ("blue", Rgb::new(0x00, 0x00, 0xff)),
    ("teal", Rgb::new(0x00, 0x80, 0x80)),
    ("aqua", Rgb::new(0x00, 0xff, 0xff)),
    ("orange", Rgb::new(0xff, 0xa5, 0x00)),
];

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a basic color keyword.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();

        if let Some(hex) = s.strip_prefix('#') {
            return match hex.len() {
                3 => {
                    let mut channels = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                    Some(Self::new(channels.next()??, channels.next()??, channels.next()??))
                }
                6 => {
                    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
                    Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
                }
                _ => None,
            };
        }

        if let Some(body) = s.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
            let mut parts = body.split(',').map(|p| p.trim().parse::<f64>().ok());
            let mut next = || parts.next().flatten().map(|v| v.round().clamp(0.0, 255.0) as u8);
            let color = Self::new(next()?, next()?, next()?);
            return parts.next().is_none().then_some(color);
        }

        NAMED
            .iter()
            .find(|(name, _)| *name == s)
            .map(|&(_, color)| color)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channel-wise interpolation. Overshooting `t` saturates.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Scale every channel by `0.7^k`.
    pub fn darker(self, k: f64) -> Rgb {
        let factor = 0.7_f64.powf(k);
        let scale = |c: u8| (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
        Rgb::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
