//! Snowflakes drifting down with a gentle sideways sway

use super::{seeded_rng, DEFAULT_SEED};
use rand::rngs::SmallRng;
use rand::Rng;
use wfx_core::{
    Animation, AnimationParams, Capabilities, FrameClock, Particle, ParticleSystem, PixelBuffer,
    Rgb,
};

const MAX_FLAKES: usize = 100;
const SWAY: f64 = 0.2;
/// Sway phase gained per second at speed 0; each speed step adds `SWAY_PER_SPEED`
const SWAY_BASE: f64 = 0.6;
const SWAY_PER_SPEED: f64 = 60.0 / 2048.0;

pub struct Snow {
    params: AnimationParams,
    clock: FrameClock,
    pixels: PixelBuffer,
    flakes: ParticleSystem,
    /// Sway phase at the last update
    sway: f64,
    /// The sky is seeded on the first update after `init`
    seeded: bool,
    rng: SmallRng,
}

impl Snow {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            params: AnimationParams::default(),
            clock: FrameClock::new(),
            pixels: PixelBuffer::default(),
            flakes: ParticleSystem::new(MAX_FLAKES),
            sway: 0.0,
            seeded: false,
            rng: seeded_rng(seed),
        }
    }

    fn spawn_flake(&mut self, y: f32) {
        let x = self.rng.random::<f32>() * self.pixels.width() as f32;
        let fall = 0.05 + self.params.speed as f32 / 255.0 * 0.2;
        let color = match self.params.palette() {
            Some(palette) => palette.sample(self.rng.random()),
            None => Rgb::WHITE,
        };
        let phase = self.rng.random::<f32>() * 100.0;
        let flake = Particle::at(x, y)
            .with_velocity(0.0, fall)
            .with_color(color)
            .with_scratch(phase);
        self.flakes.spawn(flake);
    }
}

impl Default for Snow {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation for Snow {
    fn name(&self) -> &'static str {
        "Snow"
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
        "Ice"
    }

    fn init(&mut self, width: usize, height: usize) {
        self.pixels.resize(width, height);
        self.flakes.clear();
        self.clock.reset();
        self.sway = 0.0;
        self.seeded = false;
    }

    fn update(&mut self, now_ns: u64) -> bool {
        let frame = self.clock.tick(now_ns);
        if self.pixels.is_empty() {
            return true;
        }
        self.pixels.fade_all(128);
        self.sway = sway_phase(frame.elapsed_ms, self.params.speed);

        let (width, height) = (self.pixels.width() as f32, self.pixels.height() as f32);
        if !self.seeded {
            self.seeded = true;
            for _ in 0..initial_flakes(self.pixels.width(), self.params.intensity) {
                let y = self.rng.random::<f32>() * height;
                self.spawn_flake(y);
            }
        }

        // Intensity sets flake density
        let chance = self.params.intensity as f64 / 255.0 * 0.5;
        if self.rng.random_bool(chance) {
            self.spawn_flake(-1.0);
        }

        let time = self.sway;
        let pixels = &mut self.pixels;
        self.flakes.retain(|flake| {
            flake.x += ((time + flake.scratch as f64).sin() * SWAY) as f32;
            flake.integrate();
            if flake.x < 0.0 {
                flake.x += width;
            }
            if flake.x >= width {
                flake.x -= width;
            }
            if flake.y >= height {
                return false;
            }
            pixels.set(flake.x as i32, flake.y as i32, flake.color);
            true
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
        self.flakes.clear();
    }
}

/// Sway phase after `elapsed_ms` of effect time
fn sway_phase(elapsed_ms: u64, speed: u8) -> f64 {
    elapsed_ms as f64 / 1000.0 * (SWAY_BASE + speed as f64 * SWAY_PER_SPEED)
}

/// Flakes already in the sky when the effect starts; none at zero intensity
fn initial_flakes(width: usize, intensity: u8) -> usize {
    if intensity == 0 {
        return 0;
    }
    (width * intensity as usize / 255 / 2).clamp(1, MAX_FLAKES)
}
