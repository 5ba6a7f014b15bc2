//! RGB/HSV colors and the per-channel arithmetic effects are built from
//!
//! Channels are `u8`, so every constructor and combination saturates
//! instead of wrapping.

use crate::math::{scale8, scale8_video};
use std::ops::Add;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from wide integers, clamping each channel to 0-255
    pub fn from_channels(r: i32, g: i32, b: i32) -> Self {
        Self::new(clamp_channel(r), clamp_channel(g), clamp_channel(b))
    }

    /// HSV with 8-bit hue/saturation/value; hue wraps modulo 256
    pub fn from_hsv8(hue: i32, saturation: i32, value: i32) -> Self {
        let hue = hue.rem_euclid(256) as f32;
        let s = saturation.clamp(0, 255) as f32 / 255.0;
        let v = value.clamp(0, 255) as f32 / 255.0;
        hsv_to_rgb(hue * 360.0 / 256.0, s, v)
    }

    /// HSV with hue in degrees (wraps modulo 360) and normalized saturation/value
    pub fn from_hsv(hue_degrees: f32, saturation: f32, value: f32) -> Self {
        hsv_to_rgb(
            hue_degrees.rem_euclid(360.0),
            saturation.clamp(0.0, 1.0),
            value.clamp(0.0, 1.0),
        )
    }

    pub fn to_hsv(self) -> Hsv {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };

        Hsv::new(h, s, max)
    }

    /// Multiply every channel by `factor` (clamped to 0.0-1.0), rounding toward zero
    pub fn scale_brightness(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * f) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// 8-bit brightness scale, `nscale8(255)` is identity
    pub fn nscale8(self, scale: u8) -> Self {
        Self::new(
            scale8(self.r, scale),
            scale8(self.g, scale),
            scale8(self.b, scale),
        )
    }

    /// Subtract `amount/256` of each channel; 255 fades to black
    pub fn fade(self, amount: u8) -> Self {
        Self::new(
            self.r - scale8(self.r, amount),
            self.g - scale8(self.g, amount),
            self.b - scale8(self.b, amount),
        )
    }

    /// Subtract a flat amount from each channel, flooring at zero
    pub fn fade_flat(self, amount: u8) -> Self {
        Self::new(
            self.r.saturating_sub(amount),
            self.g.saturating_sub(amount),
            self.b.saturating_sub(amount),
        )
    }

    /// Linear interpolation: 0 gives `self`, 255 gives `other`
    pub fn blend(self, other: Rgb, amount: u8) -> Self {
        let mix = |a: u8, b: u8| {
            let a = a as i32;
            (a + (b as i32 - a) * amount as i32 / 255) as u8
        };
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    /// Mean of the three channels
    pub fn average_light(self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8
    }

    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }

    /// Black -> red -> yellow -> white ramp for fire effects
    pub fn heat(temperature: u8) -> Self {
        // Scale into 0..191 so the ramp has three 64-step thirds
        let t192 = scale8_video(temperature, 191);
        let ramp = (t192 & 0x3F) << 2;

        if t192 & 0x80 != 0 {
            Self::new(255, 255, ramp)
        } else if t192 & 0x40 != 0 {
            Self::new(255, ramp, 0)
        } else {
            Self::new(ramp, 0, 0)
        }
    }
}

/// Saturating per-channel add
impl Add for Rgb {
    type Output = Rgb;

    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(
            self.r.saturating_add(rhs.r),
            self.g.saturating_add(rhs.g),
            self.b.saturating_add(rhs.b),
        )
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// HSV color: hue in degrees, saturation and value normalized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    /// Hue wraps into 0..360, saturation and value are clamped
    pub fn new(h: f32, s: f32, v: f32) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 1.0),
            v: v.clamp(0.0, 1.0),
        }
    }

    pub fn to_rgb(self) -> Rgb {
        hsv_to_rgb(self.h, self.s, self.v)
    }
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    if s <= 0.0 {
        let gray = (v * 255.0).round() as u8;
        return Rgb::new(gray, gray, gray);
    }

    let sector = h / 60.0;
    let i = sector.floor();
    let f = sector - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match i as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    let to_byte = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to_byte(r), to_byte(g), to_byte(b))
}

#[inline]
fn clamp_channel(c: i32) -> u8 {
    c.clamp(0, 255) as u8
}
