//! Block accumulation and publishing of audio features

use crate::loudness::{LoudnessMeter, LoudnessMode};
use crate::spectrum::SpectrumAnalyzer;
use std::sync::Arc;
use wfx_core::{AudioFeed, AudioSnapshot};

/// Samples per analyzed block
pub const BLOCK_SIZE: usize = 1024;

/// Turns a stream of mono samples into published [`AudioSnapshot`]s
///
/// Samples arrive in arbitrary chunk sizes; every full block is analyzed
/// and the result replaces the feed's current snapshot.
pub struct AnalysisPipeline {
    spectrum: SpectrumAnalyzer,
    loudness: LoudnessMeter,
    mode: LoudnessMode,
    feed: Arc<AudioFeed>,
    block: Vec<f32>,
    block_size: usize,
    last: AudioSnapshot,
}

impl AnalysisPipeline {
    pub fn new(sample_rate: u32, feed: Arc<AudioFeed>) -> Self {
        Self::with_block_size(sample_rate, feed, BLOCK_SIZE)
    }

    pub fn with_block_size(sample_rate: u32, feed: Arc<AudioFeed>, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        Self {
            spectrum: SpectrumAnalyzer::new(sample_rate),
            loudness: LoudnessMeter::new(),
            mode: LoudnessMode::default(),
            feed,
            block: Vec::with_capacity(block_size),
            block_size,
            last: AudioSnapshot::SILENT,
        }
    }

    pub fn set_loudness_mode(&mut self, mode: LoudnessMode) {
        self.mode = mode;
    }

    pub fn loudness_mode(&self) -> LoudnessMode {
        self.mode
    }

    /// Feed samples; returns the number of blocks published
    pub fn push(&mut self, mut samples: &[f32]) -> usize {
        let mut published = 0;
        while !samples.is_empty() {
            let take = (self.block_size - self.block.len()).min(samples.len());
            self.block.extend_from_slice(&samples[..take]);
            samples = &samples[take..];
            if self.block.len() == self.block_size {
                self.process_block();
                published += 1;
            }
        }
        published
    }

    fn process_block(&mut self) {
        self.loudness.measure(&self.block);
        let loudness = self.loudness.read(self.mode);
        let frame = self.spectrum.analyze(&self.block);
        self.block.clear();

        self.last = AudioSnapshot {
            loudness,
            bands: frame.bands,
            peak_hz: frame.peak_hz,
        };
        self.feed.publish(self.last);
    }

    /// Most recently published snapshot
    pub fn last(&self) -> AudioSnapshot {
        self.last
    }

    pub fn feed(&self) -> &Arc<AudioFeed> {
        &self.feed
    }

    /// Drop partial blocks and history, and silence the feed
    pub fn reset(&mut self) {
        self.block.clear();
        self.spectrum.reset();
        self.loudness.reset();
        self.last = AudioSnapshot::SILENT;
        self.feed.reset();
    }
}
