//! Coloring: palette resolution and color arithmetic.

mod color;
mod palette;

pub use color::Rgb;
pub use palette::{
    ColorModifier, ColorScale, DepthShade, Identity, ModifierKind, Palette, Theme, color_key,
};
