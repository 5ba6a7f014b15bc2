//! Slow "standby" breathing of the whole grid

use wfx_core::math::sin16;
use wfx_core::{Animation, AnimationParams, Capabilities, FrameClock, Grid, Rgb};

/// Luminance floor between breaths
const BASE_LUMA: i32 = 30;

#[derive(Default)]
pub struct Breathe {
    params: AnimationParams,
    grid: Grid,
    clock: FrameClock,
    /// Brightness for the current frame, computed in `update`
    luma: u8,
}

impl Breathe {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Breathing curve: a half sine pulse followed by a rest at the floor
fn breath_luma(elapsed_ms: u64, speed: u8) -> u8 {
    let rate = (speed as u64 >> 3) + 10;
    let mut counter = ((elapsed_ms.wrapping_mul(rate)) & 0xFFFF) as u32;
    counter = (counter >> 2) + (counter >> 4);

    let mut swell = 0;
    if counter < 16384 {
        if counter > 8192 {
            counter = 16384 - counter;
        }
        swell = sin16(counter as u16) as i32 / 103;
    }
    (BASE_LUMA + swell).clamp(0, 255) as u8
}

impl Animation for Breathe {
    fn name(&self) -> &'static str {
        "Breathe"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            speed: true,
            color: true,
            palette: true,
            one_d: true,
            two_d: true,
            ..Capabilities::NONE
        }
    }

    fn init(&mut self, width: usize, height: usize) {
        self.grid = Grid::new(width, height);
        self.clock.reset();
        self.luma = BASE_LUMA as u8;
    }

    fn update(&mut self, now_ns: u64) -> bool {
        let frame = self.clock.tick(now_ns);
        self.luma = breath_luma(frame.elapsed_ms, self.params.speed);
        true
    }

    fn render(&self, x: i32, y: i32) -> Rgb {
        if !self.grid.contains(x, y) {
            return Rgb::BLACK;
        }
        let base = match self.params.palette() {
            Some(palette) => {
                let index = self
                    .params
                    .mapper
                    .index(x as usize, y as usize, self.grid.width());
                palette.get_wrapped(index as i64)
            }
            None => self.params.color,
        };
        base.scale_brightness(self.luma as f32 / 255.0)
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

    #[test]
    fn test_breath_starts_at_floor_and_peaks() {
        assert_eq!(breath_luma(0, 128), BASE_LUMA as u8);
        let peak = (0..4000).map(|ms| breath_luma(ms, 128)).max().unwrap();
        assert!(peak >= 250, "peak luma {}", peak);
        let floor = (0..4000).map(|ms| breath_luma(ms, 128)).min().unwrap();
        assert_eq!(floor, BASE_LUMA as u8);
    }

    #[test]
    fn test_render_is_stable_between_updates() {
        let mut fx = Breathe::new();
        fx.init(4, 4);
        fx.update(0);
        fx.update(700_000_000);
        let first = fx.render(1, 2);
        assert_eq!(fx.render(1, 2), first);
        assert!(!first.is_black());
    }
}
