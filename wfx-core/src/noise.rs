//! Coherent gradient noise (improved Perlin) with 8-bit and 16-bit outputs
//!
//! Integer coordinates are fixed point. The 8-bit family takes 8.8 values
//! (the high byte selects a lattice cell, the low byte interpolates inside
//! it); the 16-bit family takes 16.16 values. The lattice is 256 cells wide
//! and wraps, so higher coordinate bits are ignored.
//!
//! Every sample is a pure function of its coordinates. A [`NoiseField`] is
//! immutable after construction and can be shared freely between effects.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::OnceLock;

/// One lattice unit in 16.16 fixed point
const ONE: i64 = 1 << 16;

/// Ken Perlin's reference permutation
const CLASSIC_PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Gradient noise generator over a 256-cell wrapping lattice
#[derive(Clone)]
pub struct NoiseField {
    /// Permutation doubled so corner hashing never needs masking
    perm: [u8; 512],
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("perm_head", &&self.perm[..8])
            .finish()
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::classic()
    }
}

impl NoiseField {
    /// Noise field using the reference permutation
    pub fn classic() -> Self {
        Self::from_permutation(&CLASSIC_PERMUTATION)
    }

    /// Noise field with a permutation shuffled from `seed`
    pub fn seeded(seed: u64) -> Self {
        let mut permutation: [u8; 256] = std::array::from_fn(|i| i as u8);
        permutation.shuffle(&mut SmallRng::seed_from_u64(seed));
        Self::from_permutation(&permutation)
    }

    fn from_permutation(permutation: &[u8; 256]) -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = permutation[i & 0xFF];
        }
        Self { perm }
    }

    #[inline]
    fn p(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    /// Raw trilinear gradient noise for 16.16 coordinates, roughly within ±ONE
    fn raw(&self, x: u32, y: u32, z: u32) -> i64 {
        let xi = ((x >> 16) & 0xFF) as usize;
        let yi = ((y >> 16) & 0xFF) as usize;
        let zi = ((z >> 16) & 0xFF) as usize;

        let xf = (x & 0xFFFF) as i64;
        let yf = (y & 0xFFFF) as i64;
        let zf = (z & 0xFFFF) as i64;

        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        let a = self.p(xi) + yi;
        let aa = self.p(a) + zi;
        let ab = self.p(a + 1) + zi;
        let b = self.p(xi + 1) + yi;
        let ba = self.p(b) + zi;
        let bb = self.p(b + 1) + zi;

        let x1 = lerp(u, grad(self.p(aa), xf, yf, zf), grad(self.p(ba), xf - ONE, yf, zf));
        let x2 = lerp(
            u,
            grad(self.p(ab), xf, yf - ONE, zf),
            grad(self.p(bb), xf - ONE, yf - ONE, zf),
        );
        let y1 = lerp(v, x1, x2);

        let x3 = lerp(
            u,
            grad(self.p(aa + 1), xf, yf, zf - ONE),
            grad(self.p(ba + 1), xf - ONE, yf, zf - ONE),
        );
        let x4 = lerp(
            u,
            grad(self.p(ab + 1), xf, yf - ONE, zf - ONE),
            grad(self.p(bb + 1), xf - ONE, yf - ONE, zf - ONE),
        );
        let y2 = lerp(v, x3, x4);

        lerp(w, y1, y2)
    }

    /// 16-bit noise for 16.16 coordinates
    ///
    /// The raw field is scaled by 3/4 around mid-range so typical output
    /// spans most of 0..=65535; rare extremes saturate.
    pub fn noise16_3d(&self, x: u32, y: u32, z: u32) -> u16 {
        let raw = self.raw(x, y, z);
        (raw * 3 / 4 + 32768).clamp(0, 65535) as u16
    }

    pub fn noise16_2d(&self, x: u32, y: u32) -> u16 {
        self.noise16_3d(x, y, 0)
    }

    pub fn noise16_1d(&self, x: u32) -> u16 {
        self.noise16_3d(x, 0, 0)
    }

    /// 8-bit noise for 8.8 coordinates
    pub fn noise8_3d(&self, x: u32, y: u32, z: u32) -> u8 {
        (self.noise16_3d(x << 8, y << 8, z << 8) >> 8) as u8
    }

    pub fn noise8_2d(&self, x: u32, y: u32) -> u8 {
        self.noise8_3d(x, y, 0)
    }

    pub fn noise8_1d(&self, x: u32) -> u8 {
        self.noise8_3d(x, 0, 0)
    }

    /// Floating-point Perlin noise, roughly within [-1, 1]
    pub fn perlin(&self, x: f64, y: f64, z: f64) -> f64 {
        let (xf, yf, zf) = (x - x.floor(), y - y.floor(), z - z.floor());
        let xi = (x.floor() as i64 & 0xFF) as usize;
        let yi = (y.floor() as i64 & 0xFF) as usize;
        let zi = (z.floor() as i64 & 0xFF) as usize;

        let (u, v, w) = (fade_f64(xf), fade_f64(yf), fade_f64(zf));

        let a = self.p(xi) + yi;
        let aa = self.p(a) + zi;
        let ab = self.p(a + 1) + zi;
        let b = self.p(xi + 1) + yi;
        let ba = self.p(b) + zi;
        let bb = self.p(b + 1) + zi;

        let lerp = |t: f64, a: f64, b: f64| a + t * (b - a);

        let x1 = lerp(u, grad_f64(self.p(aa), xf, yf, zf), grad_f64(self.p(ba), xf - 1.0, yf, zf));
        let x2 = lerp(
            u,
            grad_f64(self.p(ab), xf, yf - 1.0, zf),
            grad_f64(self.p(bb), xf - 1.0, yf - 1.0, zf),
        );
        let x3 = lerp(
            u,
            grad_f64(self.p(aa + 1), xf, yf, zf - 1.0),
            grad_f64(self.p(ba + 1), xf - 1.0, yf, zf - 1.0),
        );
        let x4 = lerp(
            u,
            grad_f64(self.p(ab + 1), xf, yf - 1.0, zf - 1.0),
            grad_f64(self.p(bb + 1), xf - 1.0, yf - 1.0, zf - 1.0),
        );

        lerp(w, lerp(v, x1, x2), lerp(v, x3, x4))
    }
}

/// Quintic smootherstep 6t^5 - 15t^4 + 10t^3 in 16.16
#[inline]
fn fade(t: i64) -> i64 {
    let t3 = (((t * t) >> 16) * t) >> 16;
    let inner = (((t * 6 - 15 * ONE) * t) >> 16) + 10 * ONE;
    (t3 * inner) >> 16
}

#[inline]
fn lerp(t: i64, a: i64, b: i64) -> i64 {
    a + (((b - a) * t) >> 16)
}

#[inline]
fn grad(hash: usize, x: i64, y: i64, z: i64) -> i64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

#[inline]
fn fade_f64(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn grad_f64(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

fn classic_field() -> &'static NoiseField {
    static FIELD: OnceLock<NoiseField> = OnceLock::new();
    FIELD.get_or_init(NoiseField::classic)
}

/// 3-D 8-bit noise on the shared classic field (8.8 coordinates)
pub fn inoise8(x: u32, y: u32, z: u32) -> u8 {
    classic_field().noise8_3d(x, y, z)
}

pub fn inoise8_2d(x: u32, y: u32) -> u8 {
    classic_field().noise8_2d(x, y)
}

pub fn inoise8_1d(x: u32) -> u8 {
    classic_field().noise8_1d(x)
}

/// 3-D 16-bit noise on the shared classic field (16.16 coordinates)
pub fn inoise16(x: u32, y: u32, z: u32) -> u16 {
    classic_field().noise16_3d(x, y, z)
}

pub fn inoise16_2d(x: u32, y: u32) -> u16 {
    classic_field().noise16_2d(x, y)
}

pub fn inoise16_1d(x: u32) -> u16 {
    classic_field().noise16_1d(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// xorshift32 for sampling coordinates without pulling rand into assertions
    fn next(state: &mut u32) -> u32 {
        *state ^= *state << 13;
        *state ^= *state >> 17;
        *state ^= *state << 5;
        *state
    }

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade(0), 0);
        assert_eq!(fade(ONE / 2), ONE / 2);
        assert!((fade(ONE - 1) - ONE).abs() < 8);
    }

    #[test]
    fn test_deterministic() {
        let mut s = 0x1234_5678u32;
        for _ in 0..1000 {
            let (x, y, z) = (next(&mut s), next(&mut s), next(&mut s));
            assert_eq!(inoise8(x, y, z), inoise8(x, y, z));
            assert_eq!(inoise16(x, y, z), inoise16(x, y, z));
        }
    }

    #[test]
    fn test_lattice_points_are_mid_range() {
        for i in 0..64u32 {
            assert_eq!(inoise16_1d(i << 16), 32768);
        }
    }

    #[test]
    fn test_range_and_spread() {
        let mut s = 0xDEAD_BEEFu32;
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        for _ in 0..10_000 {
            let v = inoise8(next(&mut s), next(&mut s), next(&mut s));
            min = min.min(v);
            max = max.max(v);
        }
        // Coherent noise should use a wide slice of the byte range
        assert!(min < 64, "min = {}", min);
        assert!(max > 192, "max = {}", max);
    }

    #[test]
    fn test_smooth_small_steps() {
        for x in 0..5000u32 {
            let a = inoise8_2d(x, 1234) as i32;
            let b = inoise8_2d(x + 1, 1234) as i32;
            assert!((a - b).abs() <= 8, "jump at x={}: {} -> {}", x, a, b);
        }
    }

    #[test]
    fn test_lattice_wraps() {
        assert_eq!(inoise8(100, 200, 300), inoise8(100 + (256 << 8), 200, 300));
    }

    #[test]
    fn test_seeded_fields_differ_but_repeat() {
        let a = NoiseField::seeded(1);
        let b = NoiseField::seeded(1);
        let c = NoiseField::seeded(2);
        let mut differs = false;
        for x in 0..512u32 {
            let coord = x * 97 + 31;
            assert_eq!(a.noise8_2d(coord, 77), b.noise8_2d(coord, 77));
            differs |= a.noise8_2d(coord, 77) != c.noise8_2d(coord, 77);
        }
        assert!(differs);
    }

    #[test]
    fn test_perlin_float_bounds() {
        let field = NoiseField::classic();
        for i in 0..2000 {
            let t = i as f64 * 0.037;
            let n = field.perlin(t, t * 0.5, 1.3);
            assert!((-1.1..=1.1).contains(&n));
        }
        assert_eq!(field.perlin(3.0, 4.0, 5.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_fresh_field_matches_shared(x in any::<u32>(), y in any::<u32>(), z in any::<u32>()) {
            let field = NoiseField::classic();
            prop_assert_eq!(field.noise16_3d(x, y, z), inoise16(x, y, z));
            prop_assert_eq!(field.noise8_3d(x, y, z), inoise8(x, y, z));
        }

        #[test]
        fn prop_seeded_field_is_repeatable(seed in any::<u64>(), x in any::<u32>(), y in any::<u32>()) {
            prop_assert_eq!(NoiseField::seeded(seed).noise8_2d(x, y), NoiseField::seeded(seed).noise8_2d(x, y));
        }
    }
}
