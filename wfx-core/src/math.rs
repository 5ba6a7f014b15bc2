//! Fixed-point helpers emulating 8/16-bit LED firmware arithmetic
//!
//! Angles are fractions of a full turn: 0-255 for the 8-bit family,
//! 0-65535 for the 16-bit family. Beat oscillators are pure functions of
//! the frame time in milliseconds, so two calls with the same BPM at the
//! same instant always agree.

use std::f32::consts::PI;
use std::sync::OnceLock;

/// Milliseconds per minute, the BPM time base
const MS_PER_MINUTE: u128 = 60_000;

/// 256-entry sine table, one full turn, centered on 128
fn sine_table() -> &'static [u8; 256] {
    static TABLE: OnceLock<[u8; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            let s = (i as f32 * 2.0 * PI / 256.0).sin();
            *slot = (128.0 + s * 127.5).round().clamp(0.0, 255.0) as u8;
        }
        table
    })
}

/// 8-bit sine: 0 -> 128, 64 -> 255, 128 -> 128, 192 -> ~0
#[inline]
pub fn sin8(theta: u8) -> u8 {
    sine_table()[theta as usize]
}

/// 8-bit cosine (sine shifted by a quarter turn)
#[inline]
pub fn cos8(theta: u8) -> u8 {
    sin8(theta.wrapping_add(64))
}

/// 16-bit sine, output in -32767..=32767
pub fn sin16(theta: u16) -> i16 {
    let radians = theta as f32 * 2.0 * PI / 65536.0;
    (radians.sin() * 32767.0).round() as i16
}

/// 16-bit cosine
#[inline]
pub fn cos16(theta: u16) -> i16 {
    sin16(theta.wrapping_add(16384))
}

/// Triangle wave: rises 0..254 over the first half turn, falls 255..1 over the second
#[inline]
pub fn triwave8(input: u8) -> u8 {
    if input < 128 {
        input * 2
    } else {
        255 - (input - 128) * 2
    }
}

/// Cubic ease in/out on an 8-bit value
pub fn ease8_in_out_cubic(i: u8) -> u8 {
    let ii = scale8(i, i) as u16;
    let iii = scale8(ii as u8, i) as u16;
    let r = (3 * ii).saturating_sub(2 * iii);
    r.min(255) as u8
}

/// Triangle wave with cubic easing, a cheap sine lookalike
#[inline]
pub fn cubicwave8(input: u8) -> u8 {
    ease8_in_out_cubic(triwave8(input))
}

/// Scale `i` by `scale / 256`, with `scale8(x, 255) == x`
#[inline]
pub fn scale8(i: u8, scale: u8) -> u8 {
    ((i as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Scale that never drops a non-zero input to zero
#[inline]
pub fn scale8_video(i: u8, scale: u8) -> u8 {
    let bump = u8::from(i != 0 && scale != 0);
    (((i as u16 * scale as u16) >> 8) as u8).saturating_add(bump)
}

/// Scale `i` by `scale / 65536`, with `scale16(x, 65535) == x`
#[inline]
pub fn scale16(i: u16, scale: u16) -> u16 {
    ((i as u32 * (1 + scale as u32)) >> 16) as u16
}

/// Saturating 8-bit add
#[inline]
pub fn qadd8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Saturating 8-bit subtract
#[inline]
pub fn qsub8(a: u8, b: u8) -> u8 {
    a.saturating_sub(b)
}

/// 16-bit sawtooth that completes one cycle per beat
pub fn beat16(bpm: u16, time_ms: u64) -> u16 {
    ((time_ms as u128 * bpm as u128 * 65_536) / MS_PER_MINUTE) as u16
}

/// 8-bit sawtooth that completes one cycle per beat
#[inline]
pub fn beat8(bpm: u16, time_ms: u64) -> u8 {
    (beat16(bpm, time_ms) >> 8) as u8
}

/// 8-bit sine oscillating between `low` and `high` at `bpm`
///
/// `phase_offset` shifts the wave by a fraction of a beat (256 = one beat).
pub fn beatsin8(bpm: u16, low: u8, high: u8, time_ms: u64, phase_offset: u8) -> u8 {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let beat = beat8(bpm, time_ms).wrapping_add(phase_offset);
    low + scale8(sin8(beat), high - low)
}

/// 16-bit sine oscillating between `low` and `high` at `bpm`
pub fn beatsin16(bpm: u16, low: u16, high: u16, time_ms: u64, phase_offset: u16) -> u16 {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let beat = beat16(bpm, time_ms).wrapping_add(phase_offset);
    let wave = (sin16(beat) as i32 + 32768) as u16;
    low + scale16(wave, high - low)
}

/// Integer linear remap, rounded and saturated to the output range
///
/// A zero-width input range maps everything to `out_min`.
pub fn map_range(value: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return out_min;
    }
    let scaled = (value - in_min) as f64 / (in_max - in_min) as f64;
    let mapped = (out_min as f64 + scaled * (out_max - out_min) as f64).round() as i32;
    mapped.clamp(out_min.min(out_max), out_min.max(out_max))
}

/// Float linear remap (not clamped)
pub fn map_f32(value: f32, from_low: f32, from_high: f32, to_low: f32, to_high: f32) -> f32 {
    let from_range = from_high - from_low;
    if from_range == 0.0 {
        return to_low;
    }
    to_low + (value - from_low) / from_range * (to_high - to_low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sin8_landmarks() {
        assert_eq!(sin8(0), 128);
        assert_eq!(sin8(64), 255);
        assert_eq!(sin8(128), 128);
        assert!(sin8(192) <= 1);
    }

    #[test]
    fn test_cos8_is_quarter_turn_ahead() {
        for i in 0..=255u8 {
            assert_eq!(cos8(i), sin8(i.wrapping_add(64)));
        }
        assert_eq!(cos8(0), 255);
    }

    #[test]
    fn test_sin16_range() {
        assert_eq!(sin16(0), 0);
        assert_eq!(sin16(16384), 32767);
        assert_eq!(sin16(49152), -32767);
        assert_eq!(cos16(0), 32767);
    }

    #[test]
    fn test_triwave8() {
        assert_eq!(triwave8(0), 0);
        assert_eq!(triwave8(64), 128);
        assert_eq!(triwave8(127), 254);
        assert_eq!(triwave8(128), 255);
        assert_eq!(triwave8(255), 1);
    }

    #[test]
    fn test_cubicwave8_endpoints() {
        assert_eq!(cubicwave8(0), 0);
        assert!(cubicwave8(128) >= 250);
    }

    #[test]
    fn test_scale8_identity_and_zero() {
        for i in 0..=255u8 {
            assert_eq!(scale8(i, 255), i);
            assert_eq!(scale8(i, 0), 0);
        }
        assert_eq!(scale8(200, 128), 100);
    }

    #[test]
    fn test_scale8_video_keeps_nonzero() {
        assert_eq!(scale8_video(1, 1), 1);
        assert_eq!(scale8_video(0, 200), 0);
        assert_eq!(scale8_video(200, 0), 0);
    }

    #[test]
    fn test_saturating_ops() {
        assert_eq!(qadd8(200, 100), 255);
        assert_eq!(qsub8(10, 20), 0);
        assert_eq!(qsub8(30, 20), 10);
    }

    #[test]
    fn test_beat16_period() {
        // 60 BPM: one beat per second
        assert_eq!(beat16(60, 0), 0);
        assert_eq!(beat16(60, 500), 32768);
        assert_eq!(beat16(60, 1000), 0);
        assert_eq!(beat8(60, 250), 64);
    }

    #[test]
    fn test_beatsin8_stays_in_range() {
        for t in (0..10_000u64).step_by(7) {
            let v = beatsin8(90, 20, 200, t, 0);
            assert!((20..=200).contains(&v), "beatsin8 at {}ms = {}", t, v);
        }
    }

    #[test]
    fn test_beatsin8_same_bpm_in_sync() {
        for t in (0..5_000u64).step_by(13) {
            assert_eq!(beatsin8(30, 0, 255, t, 0), beatsin8(30, 0, 255, t, 0));
        }
        // At t=0 the wave sits mid-range
        assert_eq!(beatsin8(30, 0, 255, 0, 0), 128);
    }

    #[test]
    fn test_beatsin8_swapped_bounds() {
        let v = beatsin8(60, 200, 20, 250, 0);
        assert!((20..=200).contains(&v));
    }

    #[test]
    fn test_beatsin16_range() {
        for t in (0..20_000u64).step_by(31) {
            let v = beatsin16(13, 0, 15, t, 0);
            assert!(v <= 15);
        }
    }

    #[test]
    fn test_map_range_saturates() {
        assert_eq!(map_range(5, 0, 10, 0, 100), 50);
        assert_eq!(map_range(20, 0, 10, 0, 100), 100);
        assert_eq!(map_range(-5, 0, 10, 0, 100), 0);
        assert_eq!(map_range(5, 0, 10, 100, 0), 50);
        assert_eq!(map_range(3, 4, 4, 7, 9), 7);
    }

    #[test]
    fn test_map_f32() {
        assert_eq!(map_f32(16.0, 0.0, 32.0, 0.0, 8.0), 4.0);
        assert_eq!(map_f32(1.0, 2.0, 2.0, 5.0, 9.0), 5.0);
    }
}
