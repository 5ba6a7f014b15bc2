//! Grid coordinate to strip index mapping

/// Addressing mode used when a grid is treated as one logical LED strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelMapper {
    /// Even rows left-to-right, odd rows right-to-left
    #[default]
    Serpentine,
    /// Every row left-to-right
    RowMajor,
}

impl PixelMapper {
    pub const ALL: [PixelMapper; 2] = [PixelMapper::Serpentine, PixelMapper::RowMajor];

    /// Strip index of `(x, y)` on a grid `width` pixels wide
    pub fn index(self, x: usize, y: usize, width: usize) -> usize {
        match self {
            PixelMapper::RowMajor => y * width + x,
            PixelMapper::Serpentine if y % 2 == 0 => y * width + x,
            PixelMapper::Serpentine => y * width + (width - 1 - x),
        }
    }

    /// Inverse of [`PixelMapper::index`]
    pub fn position(self, index: usize, width: usize) -> (usize, usize) {
        let y = index / width;
        let col = index % width;
        let x = match self {
            PixelMapper::Serpentine if y % 2 == 1 => width - 1 - col,
            _ => col,
        };
        (x, y)
    }

    pub fn name(self) -> &'static str {
        match self {
            PixelMapper::Serpentine => "serpentine",
            PixelMapper::RowMajor => "row-major",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "serpentine" | "zigzag" => Some(PixelMapper::Serpentine),
            "row-major" | "rowmajor" | "linear" => Some(PixelMapper::RowMajor),
            _ => None,
        }
    }

    /// The other mode
    pub fn next(self) -> Self {
        match self {
            PixelMapper::Serpentine => PixelMapper::RowMajor,
            PixelMapper::RowMajor => PixelMapper::Serpentine,
        }
    }
}
