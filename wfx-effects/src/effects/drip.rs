//! Drops fall from the top edge and splash on the floor

use super::{seeded_rng, DEFAULT_SEED};
use rand::rngs::SmallRng;
use rand::Rng;
use wfx_core::palette::sample_or_rainbow;
use wfx_core::{
    Animation, AnimationParams, Capabilities, FrameClock, Particle, ParticleSystem, PixelBuffer,
    Rgb,
};

const MAX_DRIPS: usize = 50;
const TRAIL_FADE: u8 = 32;

pub struct Drip {
    params: AnimationParams,
    clock: FrameClock,
    pixels: PixelBuffer,
    drips: ParticleSystem,
    next_drip_ms: u64,
    rng: SmallRng,
}

impl Drip {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            params: AnimationParams::default(),
            clock: FrameClock::new(),
            pixels: PixelBuffer::default(),
            drips: ParticleSystem::new(MAX_DRIPS),
            next_drip_ms: 0,
            rng: seeded_rng(seed),
        }
    }

    fn gravity(&self) -> f32 {
        0.05 + self.params.speed as f32 / 255.0 * 0.1
    }

    fn spawn_drip(&mut self) {
        let x = self.rng.random::<f32>() * self.pixels.width() as f32;
        let color = sample_or_rainbow(self.params.palette(), self.rng.random());
        let drip = Particle::at(x, 0.0)
            .with_acceleration(0.0, self.gravity())
            .with_color(color);
        self.drips.spawn(drip);
    }
}

impl Default for Drip {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation for Drip {
    fn name(&self) -> &'static str {
        "Drip"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            speed: true,
            palette: true,
            two_d: true,
            ..Capabilities::NONE
        }
    }

    fn init(&mut self, width: usize, height: usize) {
        self.pixels.resize(width, height);
        self.drips.clear();
        self.clock.reset();
        self.next_drip_ms = 0;
    }

    fn update(&mut self, now_ns: u64) -> bool {
        let frame = self.clock.tick(now_ns);
        let (width, height) = (self.pixels.width() as f32, self.pixels.height() as f32);
        if self.pixels.is_empty() {
            return true;
        }

        self.pixels.fade_all(TRAIL_FADE);

        if frame.elapsed_ms >= self.next_drip_ms {
            self.spawn_drip();
            // Faster speed shortens the wait between drops
            let slack = (255 - self.params.speed as u64) * 5;
            self.next_drip_ms = frame.elapsed_ms + self.rng.random_range(100..200 + slack);
        }

        self.drips.step();

        let floor = height - 1.0;
        let pixels = &mut self.pixels;
        self.drips.retain(|drip| {
            let (x, y) = (drip.x as i32, drip.y as i32);
            if drip.x >= 0.0 && drip.x < width && drip.y >= 0.0 && drip.y < height {
                pixels.add(x, y, drip.color);
            }
            if drip.y < floor {
                return true;
            }
            // Splash on the bottom row
            let splash = drip.color.scale_brightness(0.5);
            let row = floor as i32;
            pixels.add(x, row, drip.color);
            pixels.add(x - 1, row, splash);
            pixels.add(x + 1, row, splash);
            false
        });
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

    fn cleanup(&mut self) {
        self.drips.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_NS: u64 = 16_666_667;

    #[test]
    fn test_first_frame_spawns_visible_drop() {
        let mut fx = Drip::new();
        fx.init(16, 16);
        fx.update(0);
        assert_eq!(fx.drips.live_count(), 1);
        assert!((0..16).any(|x| !fx.render(x, 0).is_black()));
    }

    #[test]
    fn test_drops_reach_floor_and_are_absorbed() {
        let mut fx = Drip::with_seed(11);
        fx.init(8, 8);
        fx.update(0);
        // Gravity ~0.1 px/frame^2 lands a drop in roughly a dozen frames
        for frame in 1..40 {
            fx.update(frame);
        }
        assert_eq!(fx.drips.live_count(), 0);
        assert!((0..8).any(|x| !fx.render(x, 7).is_black()));
    }

    #[test]
    fn test_pool_never_exceeds_capacity() {
        let mut fx = Drip::with_seed(5);
        fx.set_speed(255);
        fx.init(16, 64);
        for frame in 0..2000u64 {
            fx.update(frame * FRAME_NS * 4);
            assert!(fx.drips.live_count() <= MAX_DRIPS);
        }
        fx.cleanup();
        assert!(fx.drips.is_empty());
    }
}
