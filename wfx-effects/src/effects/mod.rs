//! Effect implementations

mod blink;
mod breathe;
mod drip;
mod fire_noise;
mod grav_freq;
mod matripix;
mod rainbow;
mod sinelon;
mod snow;
mod twinkle;

pub use blink::Blink;
pub use breathe::Breathe;
pub use drip::Drip;
pub use fire_noise::FireNoise2D;
pub use grav_freq::GravFreq;
pub use matripix::Matripix;
pub use rainbow::Rainbow;
pub use sinelon::Sinelon;
pub use snow::Snow;
pub use twinkle::Twinkle;

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Seed used when the caller does not pick one
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;

fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}
