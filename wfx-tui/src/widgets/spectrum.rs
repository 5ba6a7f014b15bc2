//! Audio band bars and loudness meter

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, Widget},
};
use wfx_core::{AudioSnapshot, AUDIO_BANDS, MAX_LOUDNESS};

/// Characters for vertical bar rendering (8 levels)
const BAR_CHARS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Bar column for a level in 0.0..=1.0, bottom row first
fn bar(level: f32, height: u16) -> Vec<char> {
    let total = (level.clamp(0.0, 1.0) * 8.0 * height as f32) as usize;
    let full = total / 8;
    let partial = total % 8;
    (0..height as usize)
        .map(|row| {
            if row < full {
                '█'
            } else if row == full && partial > 0 {
                BAR_CHARS[partial]
            } else {
                ' '
            }
        })
        .collect()
}

/// The 16 analysis bands plus a loudness column
pub struct SpectrumWidget<'a> {
    snapshot: &'a AudioSnapshot,
    theme: &'a Theme,
}

impl<'a> SpectrumWidget<'a> {
    pub fn new(snapshot: &'a AudioSnapshot, theme: &'a Theme) -> Self {
        Self { snapshot, theme }
    }
}

impl Widget for SpectrumWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.snapshot.peak_hz > 0.0 {
            format!(" AUDIO {:>5.0}Hz ", self.snapshot.peak_hz)
        } else {
            " AUDIO ".to_string()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border())
            .title(Span::styled(title, self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);

        // Bands, a gap, then loudness
        let needed = AUDIO_BANDS as u16 + 2;
        if inner.height < 1 || inner.width < needed {
            return;
        }
        let x0 = inner.x + (inner.width - needed) / 2;

        let mut columns: Vec<(u16, f32)> = self
            .snapshot
            .bands
            .iter()
            .enumerate()
            .map(|(i, b)| (x0 + i as u16, *b as f32 / 255.0))
            .collect();
        let loudness = self.snapshot.loudness as f32 / MAX_LOUDNESS as f32;
        columns.push((x0 + AUDIO_BANDS as u16 + 1, loudness));

        for (x, level) in columns {
            let style = self.theme.meter_style(level);
            for (row, ch) in bar(level, inner.height).into_iter().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let y = inner.y + inner.height - 1 - row as u16;
                buf[(x, y)].set_char(ch).set_style(style);
            }
        }
    }
}
