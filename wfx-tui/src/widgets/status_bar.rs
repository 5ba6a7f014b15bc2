//! Status bar and help overlay

use crate::app::{AppState, MessageType};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use wfx_core::Capabilities;
use wfx_input::Mode;

/// Short labels for each capability flag, in display order
pub fn capability_badges(caps: Capabilities) -> [(&'static str, bool); 7] {
    [
        ("SPD", caps.speed),
        ("INT", caps.intensity),
        ("COL", caps.color),
        ("PAL", caps.palette),
        ("1D", caps.one_d),
        ("2D", caps.two_d),
        ("AUD", caps.audio_reactive),
    ]
}

/// Widget for the bottom status line
pub struct StatusBarWidget<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn mode_span(&self) -> Span<'static> {
        let mode = if self.state.paused && self.state.mode == Mode::Normal {
            "PAUSED"
        } else {
            self.state.mode.display_name()
        };
        let style = match self.state.mode {
            Mode::Normal if self.state.paused => Style::default().fg(self.theme.warning),
            Mode::Normal => self.theme.highlight(),
            Mode::Help => Style::from(self.theme.accent),
        };
        Span::styled(mode, style)
    }

    fn params_line(&self) -> Line<'a> {
        let s = self.state;
        let mut spans = vec![
            Span::styled(s.effect_name, self.theme.title()),
            Span::raw(" "),
        ];
        for (label, on) in capability_badges(s.capabilities) {
            let style = if on {
                self.theme.badge_on()
            } else {
                self.theme.badge_off()
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        let palette = s.palette_name.as_deref().unwrap_or("-");
        spans.push(Span::styled(
            format!(
                " spd {:>3}  int {:>3}  #{:02x}{:02x}{:02x}  pal {}  {}",
                s.speed,
                s.intensity,
                s.color.r,
                s.color.g,
                s.color.b,
                palette,
                s.mapper.name()
            ),
            self.theme.normal(),
        ));
        Line::from(spans)
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let chunks = Layout::horizontal([
            Constraint::Length(9),  // Mode indicator
            Constraint::Min(20),    // Effect or message
            Constraint::Length(22), // fps and audio
        ])
        .split(area);

        let mode_line = Line::from(vec![Span::raw("["), self.mode_span(), Span::raw("]")]);
        Paragraph::new(mode_line).render(chunks[0], buf);

        let content = if let Some(msg) = self.state.message.as_deref() {
            let style = match self.state.message_type {
                MessageType::Info => self.theme.dim(),
                MessageType::Success => Style::from(self.theme.accent),
                MessageType::Warning => Style::default().fg(self.theme.warning),
                MessageType::Error => Style::default().fg(self.theme.danger),
            };
            Line::from(Span::styled(msg, style))
        } else {
            self.params_line()
        };
        Paragraph::new(content).render(chunks[1], buf);

        let right = format!(
            "{:>3.0}/{}fps {}",
            self.state.fps,
            self.state.target_fps,
            self.state.audio.label()
        );
        Paragraph::new(Line::from(Span::styled(right, self.theme.dim()))).render(chunks[2], buf);
    }
}

/// Key reference overlay
pub struct HelpWidget<'a> {
    theme: &'a Theme,
}

impl<'a> HelpWidget<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    pub fn help_lines() -> &'static [&'static str] {
        &[
            "╔══════════════════════════════════════╗",
            "║            WFX - KEYS                ║",
            "╠══════════════════════════════════════╣",
            "║  ← / →  p / n   previous / next fx   ║",
            "║  [ / ]          previous / next pal  ║",
            "║  0              clear palette        ║",
            "║  ↑ / ↓  + / -   speed ±8             ║",
            "║  . / ,          intensity ±8         ║",
            "║  c              cycle color          ║",
            "║  m              toggle pixel mapper  ║",
            "║  space          pause                ║",
            "║  r              restart effect       ║",
            "║  q  Ctrl-Q      quit                 ║",
            "╠══════════════════════════════════════╣",
            "║        Esc or ? to close help        ║",
            "╚══════════════════════════════════════╝",
        ]
    }

    /// Width of the overlay in cells
    pub fn width() -> u16 {
        Self::help_lines()
            .iter()
            .map(|l| l.chars().count() as u16)
            .max()
            .unwrap_or(0)
    }
}

impl Widget for HelpWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                buf[(x, y)].set_char(' ').set_style(self.theme.normal());
            }
        }

        for (i, line) in Self::help_lines()
            .iter()
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            for (j, ch) in line.chars().enumerate() {
                let x = area.x + j as u16;
                if x >= area.x + area.width {
                    break;
                }
                let style = if "║╔╗╚╝═╠╣".contains(ch) {
                    self.theme.border()
                } else {
                    self.theme.normal()
                };
                buf[(x, y)].set_char(ch).set_style(style);
            }
        }
    }
}
