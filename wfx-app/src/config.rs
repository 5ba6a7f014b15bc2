//! Preview settings persisted as `key=value` lines
//!
//! Unknown keys are ignored, unparsable values keep their defaults and
//! numbers outside their range are clamped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use wfx_analysis::LoudnessMode;
use wfx_core::{PixelMapper, Rgb, DEFAULT_INTENSITY, DEFAULT_SPEED};
use wfx_effects::DEFAULT_SEED;

pub const DEFAULT_EFFECT: &str = "Rainbow";
pub const MAX_GRID_SIDE: usize = 256;
pub const MAX_FPS: u32 = 240;

/// Which palette effects start with
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaletteChoice {
    /// No palette; effects use their rainbow or heat fallback
    Off,
    /// Each effect's preferred builtin palette
    #[default]
    Auto,
    Named(String),
}

impl PaletteChoice {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "" | "off" | "none" => PaletteChoice::Off,
            "auto" => PaletteChoice::Auto,
            _ => PaletteChoice::Named(value.to_string()),
        }
    }

    fn serialize(&self) -> &str {
        match self {
            PaletteChoice::Off => "off",
            PaletteChoice::Auto => "auto",
            PaletteChoice::Named(name) => name,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub effect: String,
    pub palette: PaletteChoice,
    pub speed: u8,
    pub intensity: u8,
    pub color: Rgb,
    /// Grid size in pixels
    pub width: usize,
    pub height: usize,
    pub mapper: PixelMapper,
    pub fps: u32,
    /// Capture the default microphone for audio-reactive effects
    pub audio: bool,
    pub seed: u64,
    pub loudness: LoudnessMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            effect: DEFAULT_EFFECT.to_string(),
            palette: PaletteChoice::default(),
            speed: DEFAULT_SPEED,
            intensity: DEFAULT_INTENSITY,
            color: Rgb::WHITE,
            width: 32,
            height: 16,
            mapper: PixelMapper::default(),
            fps: 60,
            audio: true,
            seed: DEFAULT_SEED,
            loudness: LoudnessMode::default(),
        }
    }
}

impl Config {
    /// Load config from the default location
    ///
    /// Returns the default config if the file is missing or unreadable.
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), "failed to read config: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn save(&self) -> io::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.serialize())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wfx")
            .join("config.txt")
    }

    pub(crate) fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "effect" => {
                    if !value.is_empty() {
                        config.effect = value.to_string();
                    }
                }
                "palette" => config.palette = PaletteChoice::parse(value),
                "speed" => {
                    if let Some(v) = parse_clamped(value, 0, 255) {
                        config.speed = v as u8;
                    }
                }
                "intensity" => {
                    if let Some(v) = parse_clamped(value, 0, 255) {
                        config.intensity = v as u8;
                    }
                }
                "color" => {
                    if let Some(c) = parse_color(value) {
                        config.color = c;
                    }
                }
                "width" => {
                    if let Some(v) = parse_clamped(value, 1, MAX_GRID_SIDE as i64) {
                        config.width = v as usize;
                    }
                }
                "height" => {
                    if let Some(v) = parse_clamped(value, 1, MAX_GRID_SIDE as i64) {
                        config.height = v as usize;
                    }
                }
                "mapper" => {
                    if let Some(m) = PixelMapper::from_name(value) {
                        config.mapper = m;
                    }
                }
                "fps" => {
                    if let Some(v) = parse_clamped(value, 1, MAX_FPS as i64) {
                        config.fps = v as u32;
                    }
                }
                "audio" => match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" | "1" => config.audio = true,
                    "off" | "false" | "no" | "0" => config.audio = false,
                    _ => {}
                },
                "seed" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.seed = v;
                    }
                }
                "loudness" => {
                    if let Some(mode) = LoudnessMode::from_name(value) {
                        config.loudness = mode;
                    }
                }
                _ => {} // Ignore unknown keys
            }
        }

        config
    }

    pub(crate) fn serialize(&self) -> String {
        let lines = [
            "# WFX Configuration".to_string(),
            format!("effect={}", self.effect),
            format!("palette={}", self.palette.serialize()),
            format!("speed={}", self.speed),
            format!("intensity={}", self.intensity),
            format!("color={}", format_color(self.color)),
            format!("width={}", self.width),
            format!("height={}", self.height),
            format!("mapper={}", self.mapper.name()),
            format!("fps={}", self.fps),
            format!("audio={}", if self.audio { "on" } else { "off" }),
            format!("seed={}", self.seed),
            format!("loudness={}", self.loudness.name()),
        ];
        lines.join("\n")
    }
}

fn parse_clamped(value: &str, min: i64, max: i64) -> Option<i64> {
    value.parse::<i64>().ok().map(|v| v.clamp(min, max))
}

/// `#rrggbb` or `rrggbb`
pub fn parse_color(value: &str) -> Option<Rgb> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

pub fn format_color(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert_eq!(Config::parse(""), Config::default());
    }

    #[test]
    fn test_parse_values() {
        let content = "# Comment\neffect=Snow\npalette=Ocean\nspeed=200\ncolor=#ff8000\n\
                       mapper=row-major\naudio=off\nseed=9\nloudness=relative";
        let config = Config::parse(content);
        assert_eq!(config.effect, "Snow");
        assert_eq!(config.palette, PaletteChoice::Named("Ocean".into()));
        assert_eq!(config.speed, 200);
        assert_eq!(config.color, Rgb::new(255, 128, 0));
        assert_eq!(config.mapper, PixelMapper::RowMajor);
        assert!(!config.audio);
        assert_eq!(config.seed, 9);
        assert_eq!(config.loudness, LoudnessMode::Relative);
        assert_eq!(config.intensity, DEFAULT_INTENSITY);
    }

    #[test]
    fn test_out_of_range_clamped() {
        let config = Config::parse("speed=999\nintensity=-4\nwidth=0\nheight=100000\nfps=0");
        assert_eq!(config.speed, 255);
        assert_eq!(config.intensity, 0);
        assert_eq!(config.width, 1);
        assert_eq!(config.height, MAX_GRID_SIDE);
        assert_eq!(config.fps, 1);
    }

    #[test]
    fn test_malformed_values_keep_defaults() {
        let config = Config::parse("speed=fast\ncolor=#12\nmapper=spiral\naudio=maybe\nnot a pair\nx=1");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_palette_choices() {
        assert_eq!(Config::parse("palette=none").palette, PaletteChoice::Off);
        assert_eq!(Config::parse("palette=AUTO").palette, PaletteChoice::Auto);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config {
            effect: "Matripix".into(),
            palette: PaletteChoice::Off,
            color: Rgb::new(1, 2, 3),
            width: 8,
            audio: false,
            ..Config::default()
        };
        assert_eq!(Config::parse(&config.serialize()), config);
    }

    #[test]
    fn test_color_format() {
        assert_eq!(parse_color("00ff7f"), Some(Rgb::new(0, 255, 127)));
        assert_eq!(parse_color("#gg0000"), None);
        assert_eq!(format_color(Rgb::new(0, 255, 127)), "#00ff7f");
    }
}
