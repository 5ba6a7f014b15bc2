//! Key handling state machine

use crate::commands::{Command, PARAM_STEP};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Help,
}

impl Mode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "PLAY",
            Mode::Help => "HELP",
        }
    }
}

/// Converts key events into commands
#[derive(Debug, Default)]
pub struct InputHandler {
    mode: Mode,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Handle a key event and return a command if applicable
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        // Quit works from every mode
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            return Some(Command::Quit);
        }
        match self.mode {
            Mode::Normal => self.handle_normal_mode(key),
            Mode::Help => self.handle_help_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Right | KeyCode::Char('n') => Some(Command::NextEffect),
            KeyCode::Left | KeyCode::Char('p') => Some(Command::PrevEffect),

            KeyCode::Char(']') => Some(Command::NextPalette),
            KeyCode::Char('[') => Some(Command::PrevPalette),
            KeyCode::Char('0') => Some(Command::ClearPalette),

            KeyCode::Up | KeyCode::Char('=') | KeyCode::Char('+') => {
                Some(Command::AdjustSpeed(PARAM_STEP))
            }
            KeyCode::Down | KeyCode::Char('-') => Some(Command::AdjustSpeed(-PARAM_STEP)),
            KeyCode::Char('.') | KeyCode::Char('>') => Some(Command::AdjustIntensity(PARAM_STEP)),
            KeyCode::Char(',') | KeyCode::Char('<') => {
                Some(Command::AdjustIntensity(-PARAM_STEP))
            }
            KeyCode::Char('c') => Some(Command::CycleColor),

            KeyCode::Char('m') => Some(Command::ToggleMapper),
            KeyCode::Char(' ') => Some(Command::TogglePause),
            KeyCode::Char('r') => Some(Command::Restart),

            KeyCode::Char('?') => {
                self.mode = Mode::Help;
                Some(Command::ToggleHelp)
            }
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.mode = Mode::Normal;
                Some(Command::ToggleHelp)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_effect_navigation() {
        let mut input = InputHandler::new();
        assert_eq!(input.handle_key(key(KeyCode::Right)), Some(Command::NextEffect));
        assert_eq!(input.handle_key(key(KeyCode::Char('p'))), Some(Command::PrevEffect));
    }

    #[test]
    fn test_parameter_steps() {
        let mut input = InputHandler::new();
        assert_eq!(input.handle_key(key(KeyCode::Up)), Some(Command::AdjustSpeed(8)));
        assert_eq!(input.handle_key(key(KeyCode::Char('-'))), Some(Command::AdjustSpeed(-8)));
        assert_eq!(input.handle_key(key(KeyCode::Char('.'))), Some(Command::AdjustIntensity(8)));
        assert_eq!(input.handle_key(key(KeyCode::Char(','))), Some(Command::AdjustIntensity(-8)));
    }

    #[test]
    fn test_help_mode_swallows_keys() {
        let mut input = InputHandler::new();
        assert_eq!(input.handle_key(key(KeyCode::Char('?'))), Some(Command::ToggleHelp));
        assert_eq!(input.mode(), Mode::Help);
        assert_eq!(input.handle_key(key(KeyCode::Right)), None);
        assert_eq!(input.handle_key(key(KeyCode::Esc)), Some(Command::ToggleHelp));
        assert_eq!(input.mode(), Mode::Normal);
    }

    #[test]
    fn test_quit_from_any_mode() {
        let mut input = InputHandler::new();
        assert_eq!(input.handle_key(key(KeyCode::Char('q'))), Some(Command::Quit));
        input.handle_key(key(KeyCode::Char('?')));
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(input.handle_key(ctrl_q), Some(Command::Quit));
    }

    #[test]
    fn test_release_ignored() {
        let mut input = InputHandler::new();
        let mut release = key(KeyCode::Char('n'));
        release.kind = KeyEventKind::Release;
        assert_eq!(input.handle_key(release), None);
    }

    #[test]
    fn test_unbound_key() {
        let mut input = InputHandler::new();
        assert_eq!(input.handle_key(key(KeyCode::F(5))), None);
    }
}
