//! Audio features consumed by audio-reactive effects
//!
//! The analysis thread writes an [`AudioSnapshot`] into an [`AudioFeed`];
//! effects read the last published value and never wait on the producer.

use parking_lot::RwLock;

/// Number of spectrum bands in a snapshot
pub const AUDIO_BANDS: usize = 16;

/// Upper bound of [`AudioSnapshot::loudness`]
pub const MAX_LOUDNESS: u16 = 1024;

/// One frame of audio features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioSnapshot {
    /// Instantaneous loudness, 0..=1024
    pub loudness: u16,
    /// Per-band intensity, low to high frequency
    pub bands: [u8; AUDIO_BANDS],
    /// Dominant frequency in Hz, 0 when silent
    pub peak_hz: f32,
}

impl AudioSnapshot {
    /// Baseline used when no audio collaborator is attached
    pub const SILENT: AudioSnapshot = AudioSnapshot {
        loudness: 0,
        bands: [0; AUDIO_BANDS],
        peak_hz: 0.0,
    };

    /// Loudness squeezed into 0-255
    pub fn volume8(&self) -> u8 {
        (self.loudness.min(MAX_LOUDNESS) as u32 * 255 / MAX_LOUDNESS as u32) as u8
    }

    pub fn is_silent(&self) -> bool {
        self.loudness == 0 && self.bands.iter().all(|b| *b == 0)
    }
}

impl Default for AudioSnapshot {
    fn default() -> Self {
        Self::SILENT
    }
}

/// Read-only source of audio features
pub trait AudioSource: Send + Sync {
    /// Last known features; must not block
    fn snapshot(&self) -> AudioSnapshot;
}

/// Shared latest-value cell written by the analysis thread
#[derive(Debug, Default)]
pub struct AudioFeed {
    latest: RwLock<AudioSnapshot>,
}

impl AudioFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot, clamping loudness
    pub fn publish(&self, mut snapshot: AudioSnapshot) {
        snapshot.loudness = snapshot.loudness.min(MAX_LOUDNESS);
        if !snapshot.peak_hz.is_finite() || snapshot.peak_hz < 0.0 {
            snapshot.peak_hz = 0.0;
        }
        *self.latest.write() = snapshot;
    }

    /// Return to silence, e.g. after the capture stream stops
    pub fn reset(&self) {
        *self.latest.write() = AudioSnapshot::SILENT;
    }
}

impl AudioSource for AudioFeed {
    fn snapshot(&self) -> AudioSnapshot {
        *self.latest.read()
    }
}

/// Source that is always silent
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl AudioSource for Silence {
    fn snapshot(&self) -> AudioSnapshot {
        AudioSnapshot::SILENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_feed_starts_silent() {
        let feed = AudioFeed::new();
        assert!(feed.snapshot().is_silent());
        assert!(Silence.snapshot().is_silent());
    }

    #[test]
    fn test_publish_clamps() {
        let feed = AudioFeed::new();
        feed.publish(AudioSnapshot {
            loudness: 5000,
            bands: [7; AUDIO_BANDS],
            peak_hz: f32::NAN,
        });
        let snap = feed.snapshot();
        assert_eq!(snap.loudness, MAX_LOUDNESS);
        assert_eq!(snap.peak_hz, 0.0);
        assert_eq!(snap.volume8(), 255);

        feed.reset();
        assert_eq!(feed.snapshot(), AudioSnapshot::SILENT);
    }

    #[test]
    fn test_feed_shared_across_threads() {
        let feed = Arc::new(AudioFeed::new());
        let writer = Arc::clone(&feed);
        std::thread::spawn(move || {
            writer.publish(AudioSnapshot {
                loudness: 512,
                ..AudioSnapshot::SILENT
            });
        })
        .join()
        .unwrap();
        assert_eq!(feed.snapshot().loudness, 512);
        assert_eq!(feed.snapshot().volume8(), 127);
    }
}
