//! Data exchanged with the transcription and slicing collaborators.
//!
//! A transcription service yields [`WordTiming`]s; a slicer cuts the
//! recording at those timings and reports one mono file per word as a
//! [`WordSlice`]. Both arrive as JSON.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::bank::{Bank, BankInfo, ChromaticBank};
use crate::error::BankError;
use crate::sample::load_sample;

/// One recognised word and where it sits in the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    /// The word as transcribed.
    pub word: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

/// A word's audio, cut out of the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSlice {
    /// The word as transcribed.
    pub word: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Mono WAV file holding the word.
    pub file_path: PathBuf,
}

impl WordSlice {
    /// Length of the slice in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

impl Bank {
    /// Build a chromatic bank from word slices, earliest word on `start_key`.
    ///
    /// Slices are placed in time order; equal start times keep input order.
    pub fn from_word_slices(
        info: BankInfo,
        slices: &[WordSlice],
        start_key: u32,
    ) -> Result<ChromaticBank, BankError> {
        let mut ordered: Vec<&WordSlice> = slices.iter().collect();
        ordered.sort_by(|a, b| a.start.total_cmp(&b.start));

        let samples = ordered
            .into_iter()
            .map(|slice| load_sample(&slice.file_path))
            .collect::<Result<Vec<_>, _>>()?;

        Bank::chromatic(info, samples, start_key)
    }
}
