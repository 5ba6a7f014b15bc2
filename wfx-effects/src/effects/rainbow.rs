//! Whole grid cycles through the color wheel

use wfx_core::palette::sample_or_rainbow;
use wfx_core::{Animation, AnimationParams, Capabilities, FrameClock, Grid, Rgb};

#[derive(Default)]
pub struct Rainbow {
    params: AnimationParams,
    grid: Grid,
    clock: FrameClock,
    fill: Rgb,
}

impl Rainbow {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Wheel position after `elapsed_ms` at `speed`
fn hue_at(elapsed_ms: u64, speed: u8) -> u8 {
    let rate = (speed as u64 >> 2) + 2;
    let counter = elapsed_ms.wrapping_mul(rate) & 0xFFFF;
    (counter >> 8) as u8
}

impl Animation for Rainbow {
    fn name(&self) -> &'static str {
        "Rainbow"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            speed: true,
            intensity: true,
            palette: true,
            two_d: true,
            ..Capabilities::NONE
        }
    }

    fn init(&mut self, width: usize, height: usize) {
        self.grid = Grid::new(width, height);
        self.clock.reset();
        self.fill = Rgb::BLACK;
    }

    fn update(&mut self, now_ns: u64) -> bool {
        let frame = self.clock.tick(now_ns);
        let hue = hue_at(frame.elapsed_ms, self.params.speed);
        let color = sample_or_rainbow(self.params.palette(), hue);

        // Low intensity washes the color out toward white
        self.fill = if self.params.intensity < 128 {
            color.blend(Rgb::WHITE, 128 - self.params.intensity)
        } else {
            color
        };
        true
    }

    fn render(&self, x: i32, y: i32) -> Rgb {
        if self.grid.contains(x, y) {
            self.fill
        } else {
            Rgb::BLACK
        }
    }

    fn params(&self) -> &AnimationParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut AnimationParams {
        &mut self.params
    }
}
