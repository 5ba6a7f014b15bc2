//! A dot sweeping the strip on a sine, leaving a fading trail

use wfx_core::math::beatsin16;
use wfx_core::palette::sample_or_rainbow;
use wfx_core::{Animation, AnimationParams, Capabilities, FrameClock, Grid, Rgb};

#[derive(Default)]
pub struct Sinelon {
    params: AnimationParams,
    grid: Grid,
    clock: FrameClock,
    leds: Vec<Rgb>,
    hue: u8,
}

impl Sinelon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strip position of the dot at `elapsed_ms`
    fn position(&self, elapsed_ms: u64) -> usize {
        let last = (self.leds.len().saturating_sub(1)).min(u16::MAX as usize) as u16;
        let bpm = self.params.speed as u16 / 2;
        beatsin16(bpm, 0, last, elapsed_ms, 0) as usize
    }
}

impl Animation for Sinelon {
    fn name(&self) -> &'static str {
        "Sinelon"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            speed: true,
            palette: true,
            one_d: true,
            ..Capabilities::NONE
        }
    }

    fn init(&mut self, width: usize, height: usize) {
        self.grid = Grid::new(width, height);
        self.leds = vec![Rgb::BLACK; self.grid.pixel_count()];
        self.clock.reset();
        self.hue = 0;
    }

    fn update(&mut self, now_ns: u64) -> bool {
        let frame = self.clock.tick(now_ns);
        if self.leds.is_empty() {
            return true;
        }

        let trail = self.params.speed / 10 + 5;
        for led in &mut self.leds {
            *led = led.fade_flat(trail);
        }

        let pos = self.position(frame.elapsed_ms);
        self.hue = self.hue.wrapping_add(1);
        self.leds[pos] = sample_or_rainbow(self.params.palette(), self.hue);
        true
    }

    fn render(&self, x: i32, y: i32) -> Rgb {
        if !self.grid.contains(x, y) {
            return Rgb::BLACK;
        }
        let index = self
            .params
            .mapper
            .index(x as usize, y as usize, self.grid.width());
        self.leds.get(index).copied().unwrap_or(Rgb::BLACK)
    }

    fn params(&self) -> &AnimationParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut AnimationParams {
        &mut self.params
    }
}
