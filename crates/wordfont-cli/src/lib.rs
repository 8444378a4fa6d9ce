//! wordfont CLI library.
//!
//! Command implementations behind the `wordfont` binary: building a bank
//! from word samples, encoding IR JSON, inspecting SF2 files.

pub mod commands;
