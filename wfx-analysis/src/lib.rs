//! Audio analysis for WFX
//!
//! Captures microphone input, reduces it to loudness, spectrum bands and a
//! dominant frequency, and publishes the result to an [`wfx_core::AudioFeed`].

mod capture;
mod loudness;
mod pipeline;
mod spectrum;

pub use capture::{CaptureError, MicCapture, RING_CAPACITY};
pub use loudness::{rms, LoudnessMeter, LoudnessMode, HISTORY_SIZE};
pub use pipeline::{AnalysisPipeline, BLOCK_SIZE};
pub use spectrum::{SpectrumAnalyzer, SpectrumFrame, FFT_SIZE};
