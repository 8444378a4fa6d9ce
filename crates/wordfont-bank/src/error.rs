//! Error and warning types for the bank model.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while building or loading a bank.
#[derive(Debug, Error)]
pub enum BankError {
    /// The sample file is not 16-bit signed mono PCM.
    #[error("unsupported sample '{}': {reason}", path.display())]
    UnsupportedSample {
        /// Path of the offending file.
        path: PathBuf,
        /// What made the file unusable.
        reason: String,
    },

    /// The WAV container could not be read.
    #[error("failed to read WAV file '{}': {source}", path.display())]
    Wav {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: hound::Error,
    },

    /// Raw PCM bytes do not form whole 16-bit frames.
    #[error("sample '{name}' has {len} PCM bytes, expected an even count")]
    MalformedPcm {
        /// Sample name.
        name: String,
        /// Byte count received.
        len: usize,
    },

    /// A zone was added before the default preset and instrument exist.
    #[error("bank is uninitialized: no preset/instrument to add zones to")]
    Uninitialized,

    /// The default preset and instrument were already created.
    #[error("default preset and instrument have already been created")]
    AlreadyInitialized,

    /// A preset past the first holds no instrument, so its INSTRUMENT
    /// generator would have nothing to select.
    #[error("preset {index} ('{name}') has no instrument")]
    EmptyPreset {
        /// Position of the preset in the bank.
        index: usize,
        /// Preset name.
        name: String,
    },

    /// A record index would not fit the container's 16-bit fields.
    #[error("{table} needs index {value}, more than the 16-bit limit of 65535")]
    IndexOverflow {
        /// Table whose index field overflows.
        table: &'static str,
        /// Largest index the bank would need.
        value: u64,
    },

    /// A MIDI key outside 0-127.
    #[error("invalid MIDI key {0} (expected 0-127)")]
    InvalidKey(u32),

    /// The sample directory does not exist or is not a directory.
    #[error("'{}' is not a valid directory", .0.display())]
    NotADirectory(PathBuf),

    /// No WAV files were found where samples were expected.
    #[error("no WAV files found in '{}'", .0.display())]
    NoSamples(PathBuf),

    /// I/O error while scanning for samples.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Warning codes reported by [`Bank::validate`](crate::Bank::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Two presets share a (preset, bank) pair
    DuplicatePresetNumber,
    /// W002: Zone root key lies outside its own key range
    RootKeyOutOfRange,
    /// W003: Two presets share a name
    DuplicatePresetName,
    /// W004: Two instruments share a name
    DuplicateInstrumentName,
    /// W005: Key range is inverted or exceeds 127
    InvalidKeyRange,
    /// W006: Preset does not hold exactly one instrument
    PresetInstrumentCount,
    /// W007: Sample has no frames or a zero sample rate
    EmptySample,
    /// W008: Name exceeds the 20-byte record field
    NameTruncated,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::DuplicatePresetNumber => "W001",
            WarningCode::RootKeyOutOfRange => "W002",
            WarningCode::DuplicatePresetName => "W003",
            WarningCode::DuplicateInstrumentName => "W004",
            WarningCode::InvalidKeyRange => "W005",
            WarningCode::PresetInstrumentCount => "W006",
            WarningCode::EmptySample => "W007",
            WarningCode::NameTruncated => "W008",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation warning with code, message, and optional location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// Location in the bank tree (e.g., "presets\[0\].instruments\[1\]").
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation warning with a location.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Outcome of an opt-in validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Collected warnings, in traversal order.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if nothing was flagged.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Returns true if any warning carries the given code.
    pub fn has(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_codes() {
        assert_eq!(WarningCode::DuplicatePresetNumber.code(), "W001");
        assert_eq!(WarningCode::NameTruncated.code(), "W008");
    }

    #[test]
    fn test_warning_display() {
        let w = ValidationWarning::with_path(
            WarningCode::RootKeyOutOfRange,
            "root key 70 outside 60-62",
            "presets[0].instruments[0].zones[2]",
        );
        assert_eq!(
            w.to_string(),
            "W002: root key 70 outside 60-62 (at presets[0].instruments[0].zones[2])"
        );
    }

    #[test]
    fn test_unsupported_sample_message_names_file() {
        let err = BankError::UnsupportedSample {
            path: PathBuf::from("words/hello.wav"),
            reason: "2 channels (only mono is supported)".to_string(),
        };
        assert!(err.to_string().contains("words/hello.wav"));
        assert!(err.to_string().contains("only mono"));
    }
}
