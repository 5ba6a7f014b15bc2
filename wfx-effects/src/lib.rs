//! Effect catalog for WFX
//!
//! Every effect implements `wfx_core::Animation` and only uses the core's
//! public primitives. `EffectRegistry` maps names to constructors.

mod effects;
mod registry;

pub use effects::{
    Blink, Breathe, Drip, FireNoise2D, GravFreq, Matripix, Rainbow, Sinelon, Snow, Twinkle,
    DEFAULT_SEED,
};
pub use registry::{EffectFactory, EffectRegistry, RegistryError};
