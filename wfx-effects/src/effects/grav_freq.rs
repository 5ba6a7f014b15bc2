//! Loudness-driven bars growing from the center, colored by pitch
//!
//! Each row keeps a falling peak marker that sinks back toward the center
//! at a rate set by speed.

use std::sync::Arc;
use tracing::debug;
use wfx_core::math::map_f32;
use wfx_core::palette::sample_or_rainbow;
use wfx_core::{
    Animation, AnimationParams, AudioSnapshot, AudioSource, Capabilities, PixelBuffer, Rgb,
    MAX_LOUDNESS,
};

/// log10 of the highest frequency mapped onto the palette
const MAX_FREQ_LOG10: f32 = 4.5;
const PEAK_MARKER: Rgb = Rgb::GRAY;

#[derive(Debug, Clone, Copy, Default)]
struct RowPeak {
    top: i32,
    counter: i32,
}

#[derive(Default)]
pub struct GravFreq {
    params: AnimationParams,
    pixels: PixelBuffer,
    rows: Vec<RowPeak>,
    audio: Option<Arc<dyn AudioSource>>,
}

impl GravFreq {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> AudioSnapshot {
        self.audio
            .as_ref()
            .map_or(AudioSnapshot::SILENT, |a| a.snapshot())
    }
}

/// Palette index for a dominant frequency
fn pitch_index(peak_hz: f32) -> u8 {
    let peak = peak_hz.max(1.0);
    ((peak.log10() - (MAX_FREQ_LOG10 - 1.78)) * 255.0).clamp(0.0, 255.0) as u8
}

impl Animation for GravFreq {
    fn name(&self) -> &'static str {
        "GravFreq"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            speed: true,
            intensity: true,
            palette: true,
            two_d: true,
            audio_reactive: true,
            ..Capabilities::NONE
        }
    }

    fn init(&mut self, width: usize, height: usize) {
        self.pixels.resize(width, height);
        self.rows = vec![RowPeak::default(); height];
    }

    fn update(&mut self, _now_ns: u64) -> bool {
        self.pixels.scale_all(250);
        let audio = self.snapshot();
        let width = self.pixels.width() as i32;
        let half = width as f32 / 2.0;

        let volume = audio.loudness as f32 / MAX_LOUDNESS as f32 * 255.0;
        let level = volume * self.params.intensity as f32 / 255.0 * 0.125;
        let bar = map_f32(level * 2.0, 0.0, 32.0, 0.0, half).clamp(0.0, half) as i32;

        let gravity = (8 - self.params.speed as i32 / 32).max(1);
        let color = sample_or_rainbow(self.params.palette(), pitch_index(audio.peak_hz));
        let center = width / 2;

        for (y, row) in self.rows.iter_mut().enumerate() {
            let y = y as i32;
            if bar >= row.top {
                row.top = bar - 1;
            } else if row.counter % gravity == 0 {
                row.top -= 1;
            }

            for i in 0..bar {
                self.pixels.set(center + i, y, color);
                self.pixels.set(center - i - 1, y, color);
            }
            if row.top >= 0 {
                self.pixels.set(center + row.top, y, PEAK_MARKER);
                self.pixels.set(center - 1 - row.top, y, PEAK_MARKER);
            }
            row.counter = (row.counter + 1) % gravity;
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

    fn attach_audio(&mut self, source: Arc<dyn AudioSource>) {
        debug!("gravfreq audio attached");
        self.audio = Some(source);
    }

    fn cleanup(&mut self) {
        self.audio = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfx_core::{AudioFeed, AUDIO_BANDS};

    fn loud_feed(loudness: u16, peak_hz: f32) -> Arc<AudioFeed> {
        let feed = Arc::new(AudioFeed::new());
        feed.publish(AudioSnapshot {
            loudness,
            bands: [0; AUDIO_BANDS],
            peak_hz,
        });
        feed
    }

    #[test]
    fn test_silence_is_dark() {
        let mut fx = GravFreq::new();
        fx.init(16, 16);
        for frame in 0..10 {
            fx.update(frame);
        }
        assert!((0..16).all(|y| (0..16).all(|x| fx.render(x, y).is_black())));
    }

    #[test]
    fn test_loud_input_draws_centered_bars() {
        let mut fx = GravFreq::new();
        fx.set_intensity(255);
        fx.attach_audio(loud_feed(1024, 440.0));
        fx.init(16, 4);
        fx.update(0);
        // Full scale fills half the width on each side of center
        for y in 0..4 {
            assert!(!fx.render(8, y).is_black());
            assert!(!fx.render(7, y).is_black());
        }
    }

    #[test]
    fn test_cleanup_detaches_audio() {
        let mut fx = GravFreq::new();
        fx.attach_audio(loud_feed(1024, 440.0));
        fx.cleanup();
        fx.cleanup();
        assert_eq!(fx.snapshot(), AudioSnapshot::SILENT);
    }

    #[test]
    fn test_pitch_index_range() {
        assert_eq!(pitch_index(0.0), 0);
        assert_eq!(pitch_index(f32::MAX), 255);
        assert!(pitch_index(2000.0) > pitch_index(600.0));
    }
}
