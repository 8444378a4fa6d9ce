//! Mono 16-bit PCM samples and WAV loading.

use std::path::Path;

use crate::error::BankError;

/// Original pitch assigned to a freshly loaded sample (middle C).
pub const DEFAULT_ORIGINAL_PITCH: u8 = 60;

/// Bytes per mono 16-bit frame.
pub const BYTES_PER_FRAME: usize = 2;

/// Decoded mono audio plus its playback metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Sample name (file stem for loaded samples).
    pub name: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// MIDI key at which the sample plays unshifted.
    pub original_pitch: u8,
    /// Little-endian i16 frames.
    data: Vec<u8>,
}

impl Sample {
    /// Create a sample from signed 16-bit frames.
    pub fn from_pcm(name: impl Into<String>, sample_rate: u32, frames: &[i16]) -> Self {
        let mut data = Vec::with_capacity(frames.len() * BYTES_PER_FRAME);
        for frame in frames {
            data.extend_from_slice(&frame.to_le_bytes());
        }
        Self {
            name: name.into(),
            sample_rate,
            original_pitch: DEFAULT_ORIGINAL_PITCH,
            data,
        }
    }

    /// Create a sample from raw little-endian 16-bit PCM bytes.
    pub fn from_le_bytes(
        name: impl Into<String>,
        sample_rate: u32,
        data: Vec<u8>,
    ) -> Result<Self, BankError> {
        let name = name.into();
        if data.len() % BYTES_PER_FRAME != 0 {
            return Err(BankError::MalformedPcm {
                name,
                len: data.len(),
            });
        }
        Ok(Self {
            name,
            sample_rate,
            original_pitch: DEFAULT_ORIGINAL_PITCH,
            data,
        })
    }

    /// Number of mono frames.
    pub fn frame_count(&self) -> u32 {
        (self.data.len() / BYTES_PER_FRAME) as u32
    }

    /// Raw PCM bytes.
    pub fn pcm(&self) -> &[u8] {
        &self.data
    }

    /// Duration in seconds, or zero when the rate is unknown.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }
}

/// Load a WAV file as a mono 16-bit [`Sample`].
///
/// Multi-channel input is rejected rather than downmixed, as is anything
/// other than 16-bit integer PCM.
///
/// # Errors
/// - [`BankError::Wav`] if the file cannot be opened or decoded
/// - [`BankError::UnsupportedSample`] for stereo, float or non-16-bit data
pub fn load_sample(path: &Path) -> Result<Sample, BankError> {
    let mut reader = hound::WavReader::open(path).map_err(|source| BankError::Wav {
        path: path.to_path_buf(),
        source,
    })?;

    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(BankError::UnsupportedSample {
            path: path.to_path_buf(),
            reason: format!("{} channels (only mono is supported)", spec.channels),
        });
    }
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(BankError::UnsupportedSample {
            path: path.to_path_buf(),
            reason: format!(
                "{}-bit {:?} PCM (only 16-bit integer is supported)",
                spec.bits_per_sample, spec.sample_format
            ),
        });
    }

    let frames: Vec<i16> = reader
        .samples::<i16>()
        .collect::<Result<_, _>>()
        .map_err(|source| BankError::Wav {
            path: path.to_path_buf(),
            source,
        })?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    log::info!(
        "loaded sample '{}': {} frames @ {} Hz",
        name,
        frames.len(),
        spec.sample_rate
    );

    Ok(Sample::from_pcm(name, spec.sample_rate, &frames))
}
