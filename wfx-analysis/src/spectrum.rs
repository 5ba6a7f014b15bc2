//! FFT spectrum analyzer producing LED-friendly band levels

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;
use wfx_core::AUDIO_BANDS;

/// FFT length; shorter blocks are zero padded
pub const FFT_SIZE: usize = 2048;

/// Band magnitudes below this are treated as noise when normalizing
const NORMALIZE_FLOOR: f32 = 100.0;

/// Magnitude under which the dominant frequency reads as 0 Hz
const PEAK_FLOOR: f32 = 1.0e-3;

/// Smoothing applied when a band rises (lower = faster)
const ATTACK: f32 = 0.3;
/// Smoothing applied when a band falls
const RELEASE: f32 = 0.5;

/// One analyzed block
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpectrumFrame {
    /// Level per band, 0-255, low to high frequency
    pub bands: [u8; AUDIO_BANDS],
    /// Frequency of the strongest bin in Hz, 0 for silence
    pub peak_hz: f32,
}

/// Real-time FFT spectrum analyzer
pub struct SpectrumAnalyzer {
    sample_rate: u32,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    frequency_bands: [(f32, f32); AUDIO_BANDS],
    levels: [f32; AUDIO_BANDS],
    fft_buffer: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    pub fn new(sample_rate: u32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        let window = (0..FFT_SIZE)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / FFT_SIZE as f32).cos()))
            .collect();

        // Log-spaced bands, 20Hz up to 20kHz or Nyquist
        let mut bands = [(0.0f32, 0.0f32); AUDIO_BANDS];
        let log_min = 20.0f32.ln();
        let log_max = 20_000.0f32.min(sample_rate as f32 / 2.0).ln();
        for (i, band) in bands.iter_mut().enumerate() {
            let t0 = i as f32 / AUDIO_BANDS as f32;
            let t1 = (i + 1) as f32 / AUDIO_BANDS as f32;
            *band = (
                (log_min + t0 * (log_max - log_min)).exp(),
                (log_min + t1 * (log_max - log_min)).exp(),
            );
        }

        Self {
            sample_rate,
            fft,
            window,
            frequency_bands: bands,
            levels: [0.0; AUDIO_BANDS],
            fft_buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frequency range covered by band `index`
    pub fn band_range(&self, index: usize) -> Option<(f32, f32)> {
        self.frequency_bands.get(index).copied()
    }

    fn bin_width(&self) -> f32 {
        self.sample_rate as f32 / FFT_SIZE as f32
    }

    /// Analyze a block of mono samples
    pub fn analyze(&mut self, samples: &[f32]) -> SpectrumFrame {
        let count = samples.len().min(FFT_SIZE);
        for (i, slot) in self.fft_buffer.iter_mut().enumerate() {
            *slot = if i < count {
                Complex::new(samples[i] * self.window[i], 0.0)
            } else {
                Complex::new(0.0, 0.0)
            };
        }
        self.fft.process(&mut self.fft_buffer);

        let half = FFT_SIZE / 2;
        let bin_width = self.bin_width();

        let mut magnitudes = [0.0f32; AUDIO_BANDS];
        for (mag, &(low, high)) in magnitudes.iter_mut().zip(self.frequency_bands.iter()) {
            let start = (low / bin_width) as usize;
            let end = ((high / bin_width) as usize).min(half);
            if start < end {
                let sum: f32 = self.fft_buffer[start..end].iter().map(|c| c.norm()).sum();
                *mag = sum / (end - start) as f32;
            }
        }

        let loudest = magnitudes.iter().copied().fold(0.0f32, f32::max);
        let scale = loudest.max(NORMALIZE_FLOOR);
        let mut bands = [0u8; AUDIO_BANDS];
        for ((band, level), mag) in bands.iter_mut().zip(self.levels.iter_mut()).zip(magnitudes) {
            let target = (mag / scale).clamp(0.0, 1.0) * 255.0;
            let smoothing = if target > *level { ATTACK } else { RELEASE };
            *level = *level * smoothing + target * (1.0 - smoothing);
            *band = level.round().clamp(0.0, 255.0) as u8;
        }

        SpectrumFrame {
            bands,
            peak_hz: self.dominant_frequency(),
        }
    }

    /// Strongest bin of the last transform, DC excluded
    fn dominant_frequency(&self) -> f32 {
        let half = FFT_SIZE / 2;
        let (bin, magnitude) = self.fft_buffer[1..half]
            .iter()
            .enumerate()
            .map(|(i, c)| (i + 1, c.norm()))
            .fold((0, 0.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });
        if magnitude < PEAK_FLOOR {
            return 0.0;
        }
        bin as f32 * self.bin_width()
    }

    /// Drop smoothing history
    pub fn reset(&mut self) {
        self.levels = [0.0; AUDIO_BANDS];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, rate: u32, amplitude: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * freq * i as f32 / rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_silence() {
        let mut analyzer = SpectrumAnalyzer::new(44_100);
        let frame = analyzer.analyze(&vec![0.0; FFT_SIZE]);
        assert_eq!(frame.bands, [0; AUDIO_BANDS]);
        assert_eq!(frame.peak_hz, 0.0);
    }

    #[test]
    fn test_dominant_frequency() {
        let mut analyzer = SpectrumAnalyzer::new(44_100);
        let frame = analyzer.analyze(&sine(1000.0, 44_100, 0.5, FFT_SIZE));
        let bin = 44_100.0 / FFT_SIZE as f32;
        assert!((frame.peak_hz - 1000.0).abs() <= bin, "peak {}", frame.peak_hz);
    }

    #[test]
    fn test_tone_lands_in_its_band() {
        let mut analyzer = SpectrumAnalyzer::new(44_100);
        let frame = analyzer.analyze(&sine(1000.0, 44_100, 0.5, FFT_SIZE));
        let loudest = (0..AUDIO_BANDS).max_by_key(|i| frame.bands[*i]).unwrap();
        let (low, high) = analyzer.band_range(loudest).unwrap();
        assert!(low <= 1000.0 && 1000.0 < high, "band {} = {}..{}", loudest, low, high);
        assert!(frame.bands[loudest] > 0);
    }

    #[test]
    fn test_attack_faster_than_release() {
        let mut analyzer = SpectrumAnalyzer::new(44_100);
        let tone = sine(1000.0, 44_100, 1.0, FFT_SIZE);
        let first = analyzer.analyze(&tone);
        let band = (0..AUDIO_BANDS).max_by_key(|i| first.bands[*i]).unwrap();
        let rising = first.bands[band];
        for _ in 0..20 {
            analyzer.analyze(&tone);
        }
        let full = analyzer.analyze(&tone).bands[band];
        let fallen = analyzer.analyze(&vec![0.0; FFT_SIZE]).bands[band];
        // One step up covers 70% of the distance, one step down only 50%
        assert!(rising as f32 >= full as f32 * 0.65);
        assert!(fallen as f32 >= full as f32 * 0.45);
        assert!(fallen < full);

        analyzer.reset();
        assert_eq!(analyzer.analyze(&vec![0.0; 16]).bands, [0; AUDIO_BANDS]);
    }

    #[test]
    fn test_bands_cover_audible_range() {
        let analyzer = SpectrumAnalyzer::new(44_100);
        let (low, _) = analyzer.band_range(0).unwrap();
        let (_, high) = analyzer.band_range(AUDIO_BANDS - 1).unwrap();
        assert!((low - 20.0).abs() < 0.01);
        assert!((high - 20_000.0).abs() < 1.0);
        assert!(analyzer.band_range(AUDIO_BANDS).is_none());
    }
}
