//! The lifecycle contract every effect implements
//!
//! A host calls [`Animation::init`] once per grid size, then per frame one
//! [`Animation::update`] followed by [`Animation::render`] for each cell.
//! `render` is a read-only query; all state changes happen in `update`.

use crate::audio::AudioSource;
use crate::color::Rgb;
use crate::mapper::PixelMapper;
use crate::palette::{Palette, DEFAULT_PALETTE_NAME};
use std::sync::Arc;

pub const DEFAULT_SPEED: u8 = 128;
pub const DEFAULT_INTENSITY: u8 = 128;

const NANOS_PER_MS: u64 = 1_000_000;

/// Fixed `width x height` pixel extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grid {
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
}

/// Which controls meaningfully change an effect's output
///
/// Static per effect type. Hosts use it to decide which controls to show;
/// it never gates the parameter setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub speed: bool,
    pub intensity: bool,
    pub color: bool,
    pub palette: bool,
    pub one_d: bool,
    pub two_d: bool,
    pub audio_reactive: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        speed: false,
        intensity: false,
        color: false,
        palette: false,
        one_d: false,
        two_d: false,
        audio_reactive: false,
    };
}

/// Per-instance user parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationParams {
    pub speed: u8,
    pub intensity: u8,
    pub color: Rgb,
    pub palette: Option<Arc<Palette>>,
    /// Addressing used by effects that treat the grid as one strip
    pub mapper: PixelMapper,
}

impl AnimationParams {
    /// Set speed, clamping to 0-255
    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed.clamp(0, 255) as u8;
    }

    /// Set intensity, clamping to 0-255
    pub fn set_intensity(&mut self, intensity: i32) {
        self.intensity = intensity.clamp(0, 255) as u8;
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_deref()
    }
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            intensity: DEFAULT_INTENSITY,
            color: Rgb::WHITE,
            palette: None,
            mapper: PixelMapper::default(),
        }
    }
}

/// Time of one frame, captured once in `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTime {
    /// Host timestamp of this frame
    pub now_ns: u64,
    /// Nanoseconds since the first frame
    pub elapsed_ns: u64,
    /// Milliseconds since the first frame
    pub elapsed_ms: u64,
    /// Milliseconds since the previous frame; 0 on the first frame
    pub delta_ms: u64,
}

impl FrameTime {
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_ms as f32 / 1000.0
    }
}

/// Turns the host's monotonic nanoseconds into per-frame times
///
/// The first tick defines t=0. A timestamp earlier than the previous one
/// yields a zero delta instead of wrapping.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    origin_ns: Option<u64>,
    last_ns: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, now_ns: u64) -> FrameTime {
        let origin = *self.origin_ns.get_or_insert(now_ns);
        let delta_ns = now_ns.saturating_sub(self.last_ns.max(origin));
        let elapsed_ns = now_ns.saturating_sub(origin);
        self.last_ns = self.last_ns.max(now_ns);
        FrameTime {
            now_ns,
            elapsed_ns,
            elapsed_ms: elapsed_ns / NANOS_PER_MS,
            delta_ms: delta_ns / NANOS_PER_MS,
        }
    }

    /// Timestamp of the first tick, 0 before it
    pub fn origin_ns(&self) -> u64 {
        self.origin_ns.unwrap_or(0)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A procedural effect
///
/// Implementors own their [`AnimationParams`]; the parameter accessors are
/// provided on top of [`Animation::params`] and [`Animation::params_mut`].
pub trait Animation: Send {
    /// Display name, unique within a catalog
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    /// Set up for a `width x height` grid, discarding all previous state
    fn init(&mut self, width: usize, height: usize);

    /// Advance one frame; `false` asks the host to stop
    fn update(&mut self, now_ns: u64) -> bool;

    /// Color at `(x, y)`; black outside the grid
    fn render(&self, x: i32, y: i32) -> Rgb;

    fn params(&self) -> &AnimationParams;

    fn params_mut(&mut self) -> &mut AnimationParams;

    /// Release anything acquired since `init`; safe to call repeatedly
    fn cleanup(&mut self) {}

    /// Hand an audio source to audio-reactive effects
    fn attach_audio(&mut self, _source: Arc<dyn AudioSource>) {}

    /// Builtin palette this effect looks best with
    fn default_palette_name(&self) -> &'static str {
        DEFAULT_PALETTE_NAME
    }

    fn set_speed(&mut self, speed: i32) {
        self.params_mut().set_speed(speed);
    }

    fn speed(&self) -> u8 {
        self.params().speed
    }

    fn set_intensity(&mut self, intensity: i32) {
        self.params_mut().set_intensity(intensity);
    }

    fn intensity(&self) -> u8 {
        self.params().intensity
    }

    fn set_color(&mut self, color: Rgb) {
        self.params_mut().color = color;
    }

    fn color(&self) -> Rgb {
        self.params().color
    }

    fn set_palette(&mut self, palette: Option<Arc<Palette>>) {
        self.params_mut().palette = palette;
    }

    fn palette(&self) -> Option<Arc<Palette>> {
        self.params().palette.clone()
    }

    fn set_mapper(&mut self, mapper: PixelMapper) {
        self.params_mut().mapper = mapper;
    }

    fn mapper(&self) -> PixelMapper {
        self.params().mapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_contains() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.pixel_count(), 12);
        assert!(grid.contains(0, 0));
        assert!(grid.contains(3, 2));
        assert!(!grid.contains(4, 0));
        assert!(!grid.contains(0, 3));
        assert!(!grid.contains(-1, 1));
        assert!(!Grid::default().contains(0, 0));
    }

    #[test]
    fn test_params_clamp() {
        let mut params = AnimationParams::default();
        assert_eq!(params.speed, 128);
        assert_eq!(params.intensity, 128);
        assert_eq!(params.color, Rgb::WHITE);
        assert!(params.palette().is_none());
        assert_eq!(params.mapper, PixelMapper::Serpentine);

        params.set_speed(300);
        params.set_intensity(-4);
        assert_eq!(params.speed, 255);
        assert_eq!(params.intensity, 0);
    }

    #[test]
    fn test_frame_clock_first_tick_is_origin() {
        let mut clock = FrameClock::new();
        let t0 = clock.tick(5_000_000_000);
        assert_eq!(t0.elapsed_ms, 0);
        assert_eq!(t0.delta_ms, 0);

        let t1 = clock.tick(5_016_666_667);
        assert_eq!(t1.elapsed_ms, 16);
        assert_eq!(t1.delta_ms, 16);
        assert_eq!(clock.origin_ns(), 5_000_000_000);
    }

    #[test]
    fn test_frame_clock_from_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(0).delta_ms, 0);
        let t = clock.tick(16_666_667);
        assert_eq!(t.delta_ms, 16);
        assert_eq!(t.elapsed_ms, 16);
    }

    #[test]
    fn test_frame_clock_backwards_is_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick(1_000_000_000);
        clock.tick(2_000_000_000);
        let back = clock.tick(1_500_000_000);
        assert_eq!(back.delta_ms, 0);
        assert_eq!(back.elapsed_ms, 500);

        clock.reset();
        assert_eq!(clock.tick(9_000_000).elapsed_ms, 0);
    }
}
