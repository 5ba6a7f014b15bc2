//! Random pixels flash in the primary color and fade out

use super::{seeded_rng, DEFAULT_SEED};
use rand::rngs::SmallRng;
use rand::Rng;
use wfx_core::{Animation, AnimationParams, Capabilities, Grid, Rgb};

pub struct Twinkle {
    params: AnimationParams,
    grid: Grid,
    /// One entry per strip position
    leds: Vec<Rgb>,
    /// Set once the first frame after `init` has lit a pixel
    primed: bool,
    rng: SmallRng,
}

impl Twinkle {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            params: AnimationParams::default(),
            grid: Grid::default(),
            leds: Vec::new(),
            primed: false,
            rng: seeded_rng(seed),
        }
    }
}

impl Default for Twinkle {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation for Twinkle {
    fn name(&self) -> &'static str {
        "Twinkle"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            speed: true,
            intensity: true,
            color: true,
            one_d: true,
            ..Capabilities::NONE
        }
    }

    fn init(&mut self, width: usize, height: usize) {
        self.grid = Grid::new(width, height);
        self.leds = vec![Rgb::BLACK; self.grid.pixel_count()];
        self.primed = false;
    }

    fn update(&mut self, _now_ns: u64) -> bool {
        if self.leds.is_empty() {
            return true;
        }
        let speed = self.params.speed as u32;

        let chance = speed / 4 + 1;
        let roll = self.rng.random_range(0..255u32) < chance;
        if roll || !self.primed {
            self.primed = true;
            let index = self.rng.random_range(0..self.leds.len());
            self.leds[index] = self.params.color;
        }

        let fade = (10 + speed / 10) as u8;
        for led in &mut self.leds {
            *led = led.fade(fade);
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twinkles_appear() {
        let mut fx = Twinkle::with_seed(7);
        fx.init(8, 8);
        let mut lit = false;
        for frame in 0..200u64 {
            fx.update(frame * 16_666_667);
            lit |= (0..8).any(|y| (0..8).any(|x| !fx.render(x, y).is_black()));
        }
        assert!(lit);
    }

    #[test]
    fn test_fade_rate_follows_speed() {
        let mut fx = Twinkle::with_seed(3);
        fx.init(4, 1);
        fx.set_speed(0);
        fx.leds.fill(Rgb::WHITE);
        fx.rng = seeded_rng(0);
        fx.update(0);
        // Unspawned pixels lose 10/256 of their value at speed 0
        assert!(fx.leds.iter().any(|c| *c == Rgb::WHITE.fade(10)));
    }

    #[test]
    fn test_first_update_lights_a_pixel_for_any_seed() {
        for seed in 0..200u64 {
            let mut fx = Twinkle::with_seed(seed);
            fx.init(16, 16);
            fx.update(0);
            fx.update(16_666_667);
            assert!(fx.leds.iter().any(|c| !c.is_black()), "seed {}", seed);
        }
    }

    #[test]
    fn test_reinit_primes_again() {
        let mut fx = Twinkle::with_seed(1);
        fx.init(4, 4);
        fx.update(0);
        fx.init(4, 4);
        assert!(!fx.primed);
        fx.update(0);
        assert!(fx.leds.iter().any(|c| !c.is_black()));
    }

    #[test]
    fn test_same_seed_same_frames() {
        let mut a = Twinkle::with_seed(42);
        let mut b = Twinkle::with_seed(42);
        a.init(16, 16);
        b.init(16, 16);
        for frame in 0..50u64 {
            a.update(frame);
            b.update(frame);
        }
        assert_eq!(a.leds, b.leds);
    }
}
