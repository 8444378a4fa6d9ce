//! wordfont Bank Model
//!
//! This crate holds the in-memory description of a sampled instrument bank
//! and everything needed to turn it into the intermediate representation
//! consumed by the `wordfont-sf2` encoder.
//!
//! # Overview
//!
//! A bank is a strict ownership tree:
//!
//! - **Bank**: metadata plus an ordered list of presets
//! - **Preset**: (preset number, bank number) patch holding instruments
//! - **Instrument**: named list of zones
//! - **Zone**: key range bound to one mono sample
//! - **Sample**: 16-bit mono PCM with rate and original pitch
//!
//! # Example
//!
//! ```
//! use wordfont_bank::{Bank, BankInfo, Sample, Zone};
//!
//! let mut bank = Bank::new(BankInfo::new("Words"));
//! bank.create_default_preset_and_instrument().unwrap();
//! bank.add_zone(Zone::single_key(Sample::from_pcm("hello", 8000, &[0; 800]), 60))
//!     .unwrap();
//!
//! let ir = bank.to_intermediate_representation();
//! assert_eq!(ir.contents.len(), 3);
//! assert!(bank.validate().is_clean());
//! ```
//!
//! # Modules
//!
//! - [`bank`]: the Bank/Preset/Instrument/Zone tree
//! - [`sample`]: mono PCM samples and WAV loading
//! - [`ir`]: chunk-descriptor tree mirroring the container layout
//! - [`tables`]: single-pass derivation of the nine record tables
//! - [`validation`]: opt-in checks for unenforced invariants
//! - [`discover`]: finding sample files on disk
//! - [`slices`]: word timing / word slice contracts

pub mod bank;
pub mod discover;
pub mod error;
pub mod ir;
pub mod sample;
pub mod slices;
pub mod tables;
pub mod validation;

pub use bank::{Bank, BankInfo, ChromaticBank, Instrument, Preset, Zone, MAX_KEY};
pub use discover::{discover_wav_files, SampleOrder};
pub use error::{BankError, ValidationReport, ValidationWarning, WarningCode};
pub use ir::{InfoField, InfoKind, InfoValue, SoundFontDocument};
pub use sample::{load_sample, Sample, DEFAULT_ORIGINAL_PITCH};
pub use slices::{WordSlice, WordTiming};
pub use validation::NAME_FIELD_LEN;
