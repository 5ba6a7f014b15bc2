//! Rows scroll left; each step feeds in a pixel lit by the current loudness

use std::sync::Arc;
use wfx_core::palette::sample_or_rainbow;
use wfx_core::{
    Animation, AnimationParams, AudioSnapshot, AudioSource, Capabilities, FrameClock, PixelBuffer,
    Rgb,
};

#[derive(Default)]
pub struct Matripix {
    params: AnimationParams,
    clock: FrameClock,
    pixels: PixelBuffer,
    last_step: Option<u64>,
    audio: Option<Arc<dyn AudioSource>>,
}

impl Matripix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps since the first update; each change shifts the rows once
    fn step_at(&self, elapsed_us: u64) -> u64 {
        let divisor = (256 - self.params.speed as u64).max(1);
        elapsed_us / divisor / 500
    }
}

impl Animation for Matripix {
    fn name(&self) -> &'static str {
        "Matripix"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            speed: true,
            intensity: true,
            palette: true,
            two_d: true,
            audio_reactive: true,
            ..Capabilities::NONE
        }
    }

    fn init(&mut self, width: usize, height: usize) {
        self.pixels.resize(width, height);
        self.clock.reset();
        self.last_step = None;
    }

    fn update(&mut self, now_ns: u64) -> bool {
        let frame = self.clock.tick(now_ns);
        let step = self.step_at(frame.elapsed_ns / 1_000);
        if self.last_step == Some(step) || self.pixels.is_empty() {
            return true;
        }
        self.last_step = Some(step);

        let audio = self
            .audio
            .as_ref()
            .map_or(AudioSnapshot::SILENT, |a| a.snapshot());
        let brightness = (audio.volume8() as u32 * self.params.intensity as u32 / 64).min(255) as u8;
        let fresh = sample_or_rainbow(self.params.palette(), (frame.elapsed_ms % 256) as u8);
        let pixel = Rgb::BLACK.blend(fresh, brightness);

        self.pixels.shift_left_rows();
        let right = self.pixels.width() as i32 - 1;
        for y in 0..self.pixels.height() as i32 {
            self.pixels.set(right, y, pixel);
        }
        true
    }

    fn render(&self, x: i32, y: i32) -> Rgb {
        self.pixels.get(x, y)
    }

    fn params(&self) -> &AnimationParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut AnimationParams {
        &mut self.params
    }

    fn attach_audio(&mut self, source: Arc<dyn AudioSource>) {
        self.audio = Some(source);
    }

    fn cleanup(&mut self) {
        self.audio = None;
    }
}
