//! Microphone capture into a lock-free sample ring

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Mono samples buffered between the device callback and the reader
pub const RING_CAPACITY: usize = 16_384;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("no audio input device found")]
    NoDevice,

    #[error("failed to query input config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(SampleFormat),

    #[error("failed to create input stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    #[error("failed to start input stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Running capture on the default input device
///
/// The stream stops when this value is dropped. Keep it on the thread that
/// opened it, since some hosts do not allow moving streams.
pub struct MicCapture {
    _stream: cpal::Stream,
    samples: HeapCons<f32>,
    sample_rate: u32,
    dropped: Arc<AtomicU64>,
}

impl MicCapture {
    /// Open and start the default input device
    pub fn open_default() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;
        let config = device.default_input_config()?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        let format = config.sample_format();
        info!(
            device = %device.name().unwrap_or_default(),
            sample_rate, channels, %format, "opening audio input"
        );

        let (producer, consumer) = HeapRb::<f32>::new(RING_CAPACITY).split();
        let dropped = Arc::new(AtomicU64::new(0));

        let stream_config: cpal::StreamConfig = config.into();
        let stream = match format {
            SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, channels, producer, &dropped)?
            }
            SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, channels, producer, &dropped)?
            }
            SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, channels, producer, &dropped)?
            }
            other => return Err(CaptureError::UnsupportedFormat(other)),
        };
        stream.play()?;

        Ok(Self {
            _stream: stream,
            samples: consumer,
            sample_rate,
            dropped,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Move buffered mono samples into `out`, returning how many were read
    pub fn read(&mut self, out: &mut [f32]) -> usize {
        self.samples.pop_slice(out)
    }

    /// Samples discarded because the reader fell behind
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mut producer: HeapProd<f32>,
    dropped: &Arc<AtomicU64>,
) -> Result<cpal::Stream, CaptureError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let dropped = Arc::clone(dropped);
    let channels = channels.max(1);
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            // Downmix to mono; no allocation on the device thread
            let mut lost = 0u64;
            for frame in data.chunks(channels) {
                let sum: f32 = frame.iter().map(|&s| s.to_sample::<f32>()).sum();
                if producer.try_push(sum / frame.len() as f32).is_err() {
                    lost += 1;
                }
            }
            if lost > 0 {
                dropped.fetch_add(lost, Ordering::Relaxed);
            }
        },
        |err| warn!("audio input stream error: {}", err),
        None,
    )?;
    Ok(stream)
}
