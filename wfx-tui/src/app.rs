//! Application state shown by the preview

use crate::theme::Theme;
use std::time::{Duration, Instant};
use wfx_core::{Animation, AudioSnapshot, Capabilities, PixelMapper, Rgb};
use wfx_input::Mode;

/// How long a status message stays visible
const MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Message type for colored status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// State of the microphone collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioStatus {
    /// Disabled in config
    #[default]
    Off,
    /// Capture running at the given sample rate
    Live(u32),
    /// Capture failed; effects see silence
    Unavailable,
}

impl AudioStatus {
    pub fn label(self) -> String {
        match self {
            AudioStatus::Off => "mic off".to_string(),
            AudioStatus::Live(rate) => format!("mic {:.1}k", rate as f32 / 1000.0),
            AudioStatus::Unavailable => "mic n/a".to_string(),
        }
    }
}

/// Everything the widgets read for one frame
#[derive(Debug)]
pub struct AppState {
    pub effect_name: &'static str,
    pub capabilities: Capabilities,
    pub speed: u8,
    pub intensity: u8,
    pub color: Rgb,
    pub palette_name: Option<String>,
    pub mapper: PixelMapper,
    pub paused: bool,

    /// Last rendered frame, row-major
    pub frame: Vec<Rgb>,
    pub grid_width: usize,
    pub grid_height: usize,

    pub audio: AudioStatus,
    pub audio_snapshot: AudioSnapshot,

    /// Measured frames per second
    pub fps: f32,
    pub target_fps: u32,
    pub frame_count: u64,

    pub mode: Mode,
    pub show_help: bool,
    pub message: Option<String>,
    pub message_type: MessageType,
    message_at: Option<Instant>,

    pub theme: Theme,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            effect_name: "",
            capabilities: Capabilities::NONE,
            speed: 0,
            intensity: 0,
            color: Rgb::BLACK,
            palette_name: None,
            mapper: PixelMapper::default(),
            paused: false,
            frame: Vec::new(),
            grid_width: 0,
            grid_height: 0,
            audio: AudioStatus::default(),
            audio_snapshot: AudioSnapshot::SILENT,
            fps: 0.0,
            target_fps: 60,
            frame_count: 0,
            mode: Mode::default(),
            show_help: false,
            message: None,
            message_type: MessageType::Info,
            message_at: None,
            theme: Theme::default(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the effect's name, capabilities and parameters for display
    pub fn sync_effect(&mut self, fx: &dyn Animation) {
        self.effect_name = fx.name();
        self.capabilities = fx.capabilities();
        self.speed = fx.speed();
        self.intensity = fx.intensity();
        self.color = fx.color();
        self.palette_name = fx.palette().map(|p| p.name().to_string());
        self.mapper = fx.mapper();
    }

    /// Track measured frame rate with light smoothing
    pub fn record_frame(&mut self, frame_time: Duration) {
        self.frame_count += 1;
        let secs = frame_time.as_secs_f32();
        if secs > 0.0 {
            let instant = 1.0 / secs;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps * 0.9 + instant * 0.1
            };
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_type = MessageType::Info;
        self.message_at = None;
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.show(msg.into(), MessageType::Info);
    }

    pub fn set_success(&mut self, msg: impl Into<String>) {
        self.show(msg.into(), MessageType::Success);
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.show(msg.into(), MessageType::Warning);
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.show(msg.into(), MessageType::Error);
    }

    fn show(&mut self, msg: String, kind: MessageType) {
        self.message = Some(msg);
        self.message_type = kind;
        self.message_at = Some(Instant::now());
    }

    /// Drop messages older than their display time
    pub fn expire_message(&mut self, now: Instant) {
        if let Some(at) = self.message_at {
            if now.saturating_duration_since(at) >= MESSAGE_TTL {
                self.clear_message();
            }
        }
    }
}

/// Main application
#[derive(Debug, Default)]
pub struct App {
    pub state: AppState,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
