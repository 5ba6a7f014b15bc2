//! Whole grid blinks between the primary color and black

use wfx_core::{Animation, AnimationParams, Capabilities, FrameClock, Grid, Rgb};

/// Shortest on/off half period
const MIN_PERIOD_MS: u64 = 50;

#[derive(Default)]
pub struct Blink {
    params: AnimationParams,
    grid: Grid,
    clock: FrameClock,
    on: bool,
}

impl Blink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of one on (or off) phase at the current speed
    fn period_ms(&self) -> u64 {
        ((256 - self.params.speed as u64) * 5).max(MIN_PERIOD_MS)
    }
}

impl Animation for Blink {
    fn name(&self) -> &'static str {
        "Blink"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            speed: true,
            color: true,
            one_d: true,
            two_d: true,
            ..Capabilities::NONE
        }
    }

    fn init(&mut self, width: usize, height: usize) {
        self.grid = Grid::new(width, height);
        self.clock.reset();
        self.on = false;
    }

    fn update(&mut self, now_ns: u64) -> bool {
        let frame = self.clock.tick(now_ns);
        let period = self.period_ms();
        self.on = frame.elapsed_ms % (period * 2) < period;
        true
    }

    fn render(&self, x: i32, y: i32) -> Rgb {
        if self.on && self.grid.contains(x, y) {
            self.params.color
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

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[test]
    fn test_blink_period() {
        let mut fx = Blink::new();
        fx.init(2, 2);
        // speed 128: 640ms on, 640ms off
        assert_eq!(fx.period_ms(), 640);
        fx.update(0);
        assert_eq!(fx.render(0, 0), Rgb::WHITE);
        fx.update(639 * MS);
        assert_eq!(fx.render(1, 1), Rgb::WHITE);
        fx.update(640 * MS);
        assert_eq!(fx.render(1, 1), Rgb::BLACK);
        fx.update(1280 * MS);
        assert_eq!(fx.render(0, 1), Rgb::WHITE);
    }

    #[test]
    fn test_fastest_period_floor() {
        let mut fx = Blink::new();
        fx.set_speed(255);
        assert_eq!(fx.period_ms(), MIN_PERIOD_MS);
    }
}
