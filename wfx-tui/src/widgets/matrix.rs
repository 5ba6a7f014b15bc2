//! LED matrix preview - two grid rows per terminal cell

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    text::Span,
    widgets::{Block, Borders, Widget},
};
use wfx_core::Rgb;

/// Upper half block; fg paints the top pixel, bg the bottom one
const HALF_BLOCK: &str = "▀";

/// Top and bottom pixel shown by terminal cell (`col`, `row`)
///
/// Pixels past the grid read as black, so odd heights get a dark lower half.
pub fn cell_colors(pixels: &[Rgb], width: usize, col: usize, row: usize) -> (Rgb, Rgb) {
    let at = |y: usize| {
        if col >= width {
            return Rgb::BLACK;
        }
        pixels.get(y * width + col).copied().unwrap_or(Rgb::BLACK)
    };
    (at(row * 2), at(row * 2 + 1))
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Widget drawing a row-major frame with true-color half blocks
pub struct MatrixWidget<'a> {
    pixels: &'a [Rgb],
    width: usize,
    height: usize,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> MatrixWidget<'a> {
    pub fn new(pixels: &'a [Rgb], width: usize, height: usize, theme: &'a Theme) -> Self {
        Self {
            pixels,
            width,
            height,
            title: "",
            theme,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Terminal cells needed for the grid, borders excluded
    pub fn cell_size(width: usize, height: usize) -> (u16, u16) {
        let cols = width.min(u16::MAX as usize) as u16;
        let rows = height.div_ceil(2).min(u16::MAX as usize) as u16;
        (cols, rows)
    }
}

impl Widget for MatrixWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border());
        if !self.title.is_empty() {
            block = block.title(Span::styled(format!(" {} ", self.title), self.theme.title()));
        }

        let inner = block.inner(area);
        block.render(area, buf);

        let (cols, rows) = Self::cell_size(self.width, self.height);
        let cols = cols.min(inner.width);
        let rows = rows.min(inner.height);
        if cols == 0 || rows == 0 {
            return;
        }

        // Center the grid inside the block
        let x0 = inner.x + (inner.width - cols) / 2;
        let y0 = inner.y + (inner.height - rows) / 2;

        for row in 0..rows {
            for col in 0..cols {
                let (top, bottom) =
                    cell_colors(self.pixels, self.width, col as usize, row as usize);
                buf[(x0 + col, y0 + row)]
                    .set_symbol(HALF_BLOCK)
                    .set_fg(to_color(top))
                    .set_bg(to_color(bottom));
            }
        }
    }
}
