//! CLI command implementations

pub mod build;
pub mod encode;
pub mod inspect;

mod reporting;
