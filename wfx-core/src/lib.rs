//! Procedural animation engine for WFX
//!
//! Shared pieces every effect is built from:
//! - math: 8/16-bit fixed-point trig, beat oscillators, remapping
//! - noise: deterministic coherent noise with 8 and 16-bit output
//! - color and palettes, with rainbow/heat fallbacks
//! - pixel mapping, particle pool and per-pixel buffers
//! - the `Animation` contract and the `Player` that drives it

mod animation;
pub mod audio;
mod buffer;
mod color;
mod mapper;
pub mod math;
pub mod noise;
pub mod palette;
mod particles;
mod player;

pub use animation::{
    Animation, AnimationParams, Capabilities, FrameClock, FrameTime, Grid, DEFAULT_INTENSITY,
    DEFAULT_SPEED,
};
pub use audio::{AudioFeed, AudioSnapshot, AudioSource, Silence, AUDIO_BANDS, MAX_LOUDNESS};
pub use buffer::PixelBuffer;
pub use color::{Hsv, Rgb};
pub use mapper::PixelMapper;
pub use noise::NoiseField;
pub use palette::{Palette, PaletteError};
pub use particles::{Lifetime, Particle, ParticleHandle, ParticleSystem};
pub use player::{FrameOrder, Lifecycle, Player};
