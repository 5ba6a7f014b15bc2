//! Color palettes and the builtin palette catalog
//!
//! A palette is an ordered, non-empty list of colors addressed by an 8-bit
//! index. Effects receive palettes as `Arc<Palette>` and only ever sample
//! them.

use crate::color::Rgb;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Name of the palette used when an effect does not ask for one
pub const DEFAULT_PALETTE_NAME: &str = "Default";

/// Palette construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette '{name}' has no colors")]
    Empty { name: String },
}

/// Named, ordered, non-empty color sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    name: String,
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette; fails if `colors` is empty
    pub fn new(name: impl Into<String>, colors: Vec<Rgb>) -> Result<Self, PaletteError> {
        let name = name.into();
        if colors.is_empty() {
            return Err(PaletteError::Empty { name });
        }
        Ok(Self { name, colors })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Slot selected by an 8-bit index, rounded and clamped to the last entry
    pub fn slot(&self, index: u8) -> usize {
        let len = self.colors.len();
        ((index as usize * len + 128) / 256).min(len - 1)
    }

    /// Sample the entry nearest to `index` on the 0-255 ramp
    pub fn sample(&self, index: u8) -> Rgb {
        self.colors[self.slot(index)]
    }

    /// Sample with linear interpolation between neighboring entries
    pub fn sample_blended(&self, index: u8) -> Rgb {
        let last = self.colors.len() - 1;
        if last == 0 {
            return self.colors[0];
        }
        let scaled = index as usize * last;
        let lo = scaled / 255;
        let hi = (lo + 1).min(last);
        let amount = ((scaled % 255) * 256 / 255) as u8;
        self.colors[lo].blend(self.colors[hi], amount)
    }

    /// Sample and scale by an 8-bit brightness
    pub fn sample_scaled(&self, index: u8, brightness: u8) -> Rgb {
        self.sample(index).nscale8(brightness)
    }

    /// Entry at `index`, wrapping in both directions
    pub fn get_wrapped(&self, index: i64) -> Rgb {
        let len = self.colors.len() as i64;
        self.colors[index.rem_euclid(len) as usize]
    }
}

/// Sample `palette`, or a full-saturation rainbow when none is set
pub fn sample_or_rainbow(palette: Option<&Palette>, index: u8) -> Rgb {
    match palette {
        Some(p) => p.sample(index),
        None => Rgb::from_hsv8(index as i32, 255, 255),
    }
}

/// Sample `palette`, or the heat ramp when none is set
pub fn sample_or_heat(palette: Option<&Palette>, index: u8) -> Rgb {
    match palette {
        Some(p) => p.sample(index),
        None => Rgb::heat(index),
    }
}

fn builtin_palette(name: &str, colors: &[(u8, u8, u8)]) -> Arc<Palette> {
    Arc::new(Palette {
        name: name.to_string(),
        colors: colors.iter().copied().map(Rgb::from).collect(),
    })
}

/// All builtin palettes, in catalog order
pub fn builtin() -> &'static [Arc<Palette>] {
    static CATALOG: OnceLock<Vec<Arc<Palette>>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        vec![
            builtin_palette(
                DEFAULT_PALETTE_NAME,
                &[
                    (255, 0, 0),
                    (255, 127, 0),
                    (255, 255, 0),
                    (0, 255, 0),
                    (0, 255, 255),
                    (0, 0, 255),
                    (127, 0, 255),
                    (255, 0, 255),
                ],
            ),
            builtin_palette(
                "Rainbow",
                &[
                    (255, 0, 0),
                    (255, 127, 0),
                    (255, 255, 0),
                    (127, 255, 0),
                    (0, 255, 0),
                    (0, 255, 127),
                    (0, 255, 255),
                    (0, 127, 255),
                    (0, 0, 255),
                    (127, 0, 255),
                    (255, 0, 255),
                    (255, 0, 127),
                ],
            ),
            builtin_palette(
                "Party",
                &[
                    (255, 0, 0),
                    (255, 0, 255),
                    (0, 0, 255),
                    (0, 255, 255),
                    (0, 255, 0),
                    (255, 255, 0),
                    (255, 127, 0),
                    (255, 0, 0),
                ],
            ),
            builtin_palette(
                "Ocean",
                &[
                    (0, 0, 128),
                    (0, 0, 255),
                    (0, 127, 255),
                    (0, 255, 255),
                    (64, 224, 208),
                    (0, 255, 255),
                    (0, 127, 255),
                    (0, 0, 255),
                ],
            ),
            builtin_palette(
                "Forest",
                &[
                    (0, 64, 0),
                    (0, 128, 0),
                    (0, 255, 0),
                    (127, 255, 0),
                    (255, 255, 0),
                    (127, 255, 0),
                    (0, 255, 0),
                    (0, 128, 0),
                ],
            ),
            builtin_palette(
                "Lava",
                &[
                    (0, 0, 0),
                    (64, 0, 0),
                    (128, 0, 0),
                    (255, 0, 0),
                    (255, 64, 0),
                    (255, 127, 0),
                    (255, 64, 0),
                    (255, 0, 0),
                ],
            ),
            builtin_palette(
                "Cloud",
                &[
                    (64, 64, 64),
                    (128, 128, 128),
                    (192, 192, 192),
                    (255, 255, 255),
                    (192, 192, 192),
                    (128, 128, 128),
                    (64, 64, 64),
                    (32, 32, 32),
                ],
            ),
            builtin_palette(
                "Sunset",
                &[
                    (0, 0, 0),
                    (64, 0, 64),
                    (128, 0, 128),
                    (255, 0, 255),
                    (255, 64, 0),
                    (255, 127, 0),
                    (255, 191, 0),
                    (255, 255, 0),
                ],
            ),
            builtin_palette(
                "Heat",
                &[
                    (0, 0, 0),
                    (64, 0, 0),
                    (128, 0, 0),
                    (255, 0, 0),
                    (255, 64, 0),
                    (255, 127, 0),
                    (255, 191, 0),
                    (255, 255, 255),
                ],
            ),
            builtin_palette(
                "Ice",
                &[
                    (0, 0, 0),
                    (0, 0, 64),
                    (0, 0, 128),
                    (0, 0, 255),
                    (0, 64, 255),
                    (0, 127, 255),
                    (0, 255, 255),
                    (255, 255, 255),
                ],
            ),
        ]
    })
}

/// Look up a builtin palette by exact name
pub fn by_name(name: &str) -> Option<Arc<Palette>> {
    builtin().iter().find(|p| p.name() == name).cloned()
}

/// Builtin palette names, sorted
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = builtin().iter().map(|p| p.name()).collect();
    names.sort_unstable();
    names
}

/// The palette used when an effect does not name one
pub fn default_palette() -> Arc<Palette> {
    // Catalog always starts with the default entry
    builtin()[0].clone()
}
