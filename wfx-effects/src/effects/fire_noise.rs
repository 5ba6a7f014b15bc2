//! Fire rising from the bottom edge, shaped by 2D noise

use wfx_core::noise::inoise8_2d;
use wfx_core::palette::sample_or_heat;
use wfx_core::{Animation, AnimationParams, Capabilities, FrameClock, PixelBuffer, Rgb};

#[derive(Default)]
pub struct FireNoise2D {
    params: AnimationParams,
    clock: FrameClock,
    pixels: PixelBuffer,
}

impl FireNoise2D {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Animation for FireNoise2D {
    fn name(&self) -> &'static str {
        "FireNoise2D"
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

    fn default_palette_name(&self) -> &'static str {
        "Heat"
    }

    fn init(&mut self, width: usize, height: usize) {
        self.pixels.resize(width, height);
        self.clock.reset();
    }

    fn update(&mut self, now_ns: u64) -> bool {
        let frame = self.clock.tick(now_ns);
        let (width, height) = (self.pixels.width(), self.pixels.height());
        if width == 0 || height == 0 {
            return true;
        }

        // Intensity stretches the flames vertically, speed horizontally
        let xscale = self.params.intensity as u64 * 4;
        let yscale = self.params.speed as u64 * 8;
        let drift = frame.elapsed_ms / 4;

        for y in 0..height {
            let brightness = (y * 255 / height) as u8;
            for x in 0..width {
                let nx = x as u64 * yscale * height as u64 / 255;
                let ny = y as u64 * xscale + drift;
                let noise = inoise8_2d(nx as u32, ny as u32);
                let index = (y * (noise >> 4) as usize).min(255) as u8;
                let color = sample_or_heat(self.params.palette(), index).nscale8(brightness);
                self.pixels.set(x as i32, y as i32, color);
            }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_row_dark_bottom_lit() {
        let mut fx = FireNoise2D::new();
        fx.init(16, 16);
        fx.update(0);
        assert!((0..16).all(|x| fx.render(x, 0).is_black()));
        assert!((0..16).any(|x| !fx.render(x, 15).is_black()));
    }

    #[test]
    fn test_flames_move() {
        let mut fx = FireNoise2D::new();
        fx.init(8, 8);
        fx.update(0);
        let before: Vec<Rgb> = (0..8).map(|x| fx.render(x, 7)).collect();
        fx.update(2_000_000_000);
        let after: Vec<Rgb> = (0..8).map(|x| fx.render(x, 7)).collect();
        assert_ne!(before, after);
    }
}
