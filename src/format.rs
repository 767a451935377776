//! Shared sample format and engine configuration.

use crate::error::{Error, Result};

/// Number of frames rendered per block (fixed by `dasp_graph`).
pub const BLOCK_SIZE: usize = 64;

/// The process-wide sample format every connection is made at.
///
/// Established once when the [`Engine`](crate::Engine) is built and read-only
/// from then on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Format {
    /// Sample rate in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,
    /// Number of interleaved channels carried by each connection
    pub channels: usize,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
        }
    }
}

impl Format {
    pub fn new(sample_rate: u32, channels: usize) -> Self {
        Self { sample_rate, channels }
    }

    /// Nyquist frequency in Hz.
    #[inline]
    pub fn nyquist(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }
}

/// Information available during audio processing.
///
/// Passed to every [`AudioUnit::process`](crate::AudioUnit::process) call.
#[derive(Clone, Copy, Debug)]
pub struct ProcessContext {
    /// Sample rate of the graph in Hz
    pub sample_rate: u32,
    /// Number of frames per buffer (always [`BLOCK_SIZE`])
    pub buffer_size: usize,
}

/// Configuration for building an [`Engine`](crate::Engine).
///
/// ```
/// use knoten::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_sample_rate(48000)
///     .with_channels(2)
///     .with_message_queue_size(128);
/// assert_eq!(config.format.sample_rate, 48000);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub format: Format,
    /// Slots in each control-plane → unit message queue
    pub message_queue_size: usize,
    /// Slots in each unit → control-plane parameter event queue
    pub event_queue_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            format: Format::default(),
            message_queue_size: 64,
            event_queue_size: 64,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.format.sample_rate = sample_rate;
        self
    }

    pub fn with_channels(mut self, channels: usize) -> Self {
        self.format.channels = channels;
        self
    }

    pub fn with_message_queue_size(mut self, size: usize) -> Self {
        self.message_queue_size = size;
        self
    }

    pub fn with_event_queue_size(mut self, size: usize) -> Self {
        self.event_queue_size = size;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.format.sample_rate == 0 {
            return Err(Error::InvalidConfig("sample rate must be non-zero".into()));
        }
        if !(1..=8).contains(&self.format.channels) {
            return Err(Error::InvalidConfig(format!(
                "channel count {} outside 1..=8",
                self.format.channels
            )));
        }
        if self.message_queue_size == 0 || self.event_queue_size == 0 {
            return Err(Error::InvalidConfig("queue sizes must be non-zero".into()));
        }
        Ok(())
    }
}
