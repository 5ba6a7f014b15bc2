//! Per-pixel color storage owned by effects that keep frame history

use crate::color::Rgb;

/// Row-major `width x height` color buffer
///
/// Reads outside the buffer return black; writes outside it are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Rgb>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![Rgb::BLACK; width * height],
            width,
            height,
        }
    }

    /// Reallocate for a new size, clearing every pixel
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, Rgb::BLACK);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, x: i32, y: i32) -> Rgb {
        self.offset(x, y).map_or(Rgb::BLACK, |i| self.pixels[i])
    }

    pub fn set(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Saturating add onto the current pixel
    pub fn add(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = self.pixels[i] + color;
        }
    }

    /// Pixel by linear storage index (black when out of range)
    pub fn get_index(&self, index: usize) -> Rgb {
        self.pixels.get(index).copied().unwrap_or(Rgb::BLACK)
    }

    pub fn set_index(&mut self, index: usize, color: Rgb) {
        if let Some(p) = self.pixels.get_mut(index) {
            *p = color;
        }
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// Proportional fade of every pixel, see [`Rgb::fade`]
    pub fn fade_all(&mut self, amount: u8) {
        for p in &mut self.pixels {
            *p = p.fade(amount);
        }
    }

    /// 8-bit brightness scale of every pixel
    pub fn scale_all(&mut self, scale: u8) {
        for p in &mut self.pixels {
            *p = p.nscale8(scale);
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(Rgb::BLACK);
    }

    /// Shift every row one pixel left; the rightmost column becomes black
    pub fn shift_left_rows(&mut self) {
        if self.width == 0 {
            return;
        }
        for row in self.pixels.chunks_exact_mut(self.width) {
            row.rotate_left(1);
            row[row.len() - 1] = Rgb::BLACK;
        }
    }
}
