//! wordfont Container Encoder - RIFF `sfbk` Instrument Bank Writer
//!
//! This crate packs a bank (or its intermediate representation) into the
//! RIFF `sfbk` container read by sample-based synthesizers.
//!
//! # Features
//!
//! - **Two entry points**: encode a [`wordfont_bank::Bank`] directly, or
//!   encode IR JSON produced earlier; both yield identical bytes
//! - **Lenient packing**: missing lists, tables and INFO fields are skipped
//!   or written empty, with a [`Diagnostic`] for each
//! - **Inspection**: read a container back as a chunk tree with record views
//! - **Hash**: BLAKE3 of the output for reproducibility checks
//!
//! # Determinism
//!
//! Output depends only on the input. No timestamps, no platform-dependent
//! layout.
//!
//! # Example
//!
//! ```
//! use wordfont_bank::{Bank, BankInfo, Sample, Zone};
//! use wordfont_sf2::{encode_bank, inspect};
//!
//! let mut bank = Bank::new(BankInfo::new("Words"));
//! bank.create_default_preset_and_instrument().unwrap();
//! bank.add_zone(Zone::single_key(Sample::from_pcm("hi", 8000, &[0; 16]), 60))
//!     .unwrap();
//!
//! let result = encode_bank(&bank).unwrap();
//! assert_eq!(&result.data[0..4], b"RIFF");
//!
//! let report = inspect(&result.data).unwrap();
//! assert_eq!(report.samples.len(), 2);
//! ```
//!
//! # Module Structure
//!
//! - [`chunk`]: RIFF chunk framing and padding
//! - [`info`]: INFO list packing
//! - [`sdta`]: sample data list packing
//! - [`records`]: fixed-width pdta records
//! - [`pdta`]: the nine pdta tables
//! - [`writer`]: encode entry points
//! - [`inspect`]: reading containers back

pub mod chunk;
pub mod diagnostic;
pub mod error;
pub mod info;
pub mod inspect;
pub mod pdta;
pub mod records;
pub mod sdta;
pub mod writer;

pub use diagnostic::{Diagnostic, DiagnosticCode};
pub use error::EncodeError;
pub use inspect::{inspect, ContainerReport, InspectError};
pub use writer::{encode_bank, encode_document, encode_json, EncodeResult};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
