//! RMS loudness on the 0..=1024 scale effects expect

use std::collections::VecDeque;
use wfx_core::math::map_range;
use wfx_core::MAX_LOUDNESS;

/// Measurements kept for relative scaling
pub const HISTORY_SIZE: usize = 600;

/// Gain from RMS to the loudness scale
const RMS_GAIN: f32 = 70_000.0;

/// Root mean square of a block, 0 for an empty block
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// How loudness is reported to effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoudnessMode {
    /// Scaled RMS, clamped to `0..=1024`
    #[default]
    Absolute,
    /// Position within the recent min/max range, centered on 512
    Relative,
}

impl LoudnessMode {
    pub fn name(self) -> &'static str {
        match self {
            LoudnessMode::Absolute => "absolute",
            LoudnessMode::Relative => "relative",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "absolute" | "abs" => Some(LoudnessMode::Absolute),
            "relative" | "rel" | "auto" => Some(LoudnessMode::Relative),
            _ => None,
        }
    }
}

/// Tracks current loudness and a rolling history of readings
#[derive(Debug, Clone, Default)]
pub struct LoudnessMeter {
    current: u16,
    history: VecDeque<u16>,
}

impl LoudnessMeter {
    pub fn new() -> Self {
        Self {
            current: 0,
            history: VecDeque::with_capacity(HISTORY_SIZE),
        }
    }

    /// Measure a block and store it as the current reading
    pub fn measure(&mut self, samples: &[f32]) -> u16 {
        let scaled = rms(samples) * RMS_GAIN;
        self.current = scaled.clamp(0.0, MAX_LOUDNESS as f32) as u16;
        self.current
    }

    pub fn current(&self) -> u16 {
        self.current
    }

    /// Current reading relative to recent history, then recorded into it
    ///
    /// With fewer than two readings, or a flat history, the result is 512.
    pub fn relative(&mut self) -> u16 {
        let min = self.history.iter().copied().min();
        let max = self.history.iter().copied().max();
        let normalized = match (min, max) {
            (Some(min), Some(max)) if self.history.len() >= 2 && max > min => {
                let pos = (self.current.saturating_sub(min)) as f32 / (max - min) as f32;
                256 + (pos.clamp(0.0, 1.0) * 512.0) as i32
            }
            _ => 512,
        };

        if self.history.len() == HISTORY_SIZE {
            self.history.pop_front();
        }
        self.history.push_back(self.current);

        map_range(normalized, 256, 768, 0, MAX_LOUDNESS as i32) as u16
    }

    /// Reading for `mode`; relative mode records into history
    pub fn read(&mut self, mode: LoudnessMode) -> u16 {
        match mode {
            LoudnessMode::Absolute => self.current,
            LoudnessMode::Relative => self.relative(),
        }
    }

    pub fn history(&self) -> impl Iterator<Item = u16> + '_ {
        self.history.iter().copied()
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms() {
        assert_eq!(rms(&[]), 0.0);
        assert_eq!(rms(&[0.0; 32]), 0.0);
        assert!((rms(&[0.5, -0.5, 0.5, -0.5]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_measure_scales_and_clamps() {
        let mut meter = LoudnessMeter::new();
        assert_eq!(meter.measure(&[0.0; 64]), 0);
        // 2^-7 RMS maps to 546.875
        assert_eq!(meter.measure(&[0.0078125, -0.0078125, 0.0078125, -0.0078125]), 546);
        assert_eq!(meter.measure(&[1.0; 8]), MAX_LOUDNESS);
        assert_eq!(meter.current(), MAX_LOUDNESS);
    }

    #[test]
    fn test_relative_starts_centered() {
        let mut meter = LoudnessMeter::new();
        meter.measure(&[0.005; 4]);
        assert_eq!(meter.relative(), 512);
        assert_eq!(meter.relative(), 512);
        assert_eq!(meter.history().count(), 2);
    }

    #[test]
    fn test_relative_tracks_range() {
        let mut meter = LoudnessMeter::new();
        meter.measure(&[0.0; 4]);
        meter.relative();
        meter.measure(&[0.0078125; 4]);
        meter.relative();

        // History now spans 0..546
        meter.measure(&[0.0078125; 4]);
        assert_eq!(meter.relative(), MAX_LOUDNESS);
        meter.measure(&[0.0; 4]);
        assert_eq!(meter.relative(), 0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut meter = LoudnessMeter::new();
        for _ in 0..HISTORY_SIZE + 50 {
            meter.relative();
        }
        assert_eq!(meter.history().count(), HISTORY_SIZE);
        meter.reset();
        assert_eq!(meter.history().count(), 0);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(LoudnessMode::from_name("Relative"), Some(LoudnessMode::Relative));
        assert_eq!(LoudnessMode::from_name(LoudnessMode::Absolute.name()), Some(LoudnessMode::Absolute));
        assert_eq!(LoudnessMode::from_name("loud"), None);
    }
}
