//! Fatal encoder errors.

use thiserror::Error;
use wordfont_bank::BankError;

/// Errors that abort an encode; no partial output is produced.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The bank cannot be encoded in its current state.
    #[error("bank error: {0}")]
    Bank(#[from] BankError),

    /// The IR text does not parse into the typed IR.
    #[error("invalid intermediate representation: {0}")]
    Json(#[from] serde_json::Error),

    /// The `smpl` payload in the IR is not valid hex.
    #[error("sample data is not valid hex: {0}")]
    InvalidSampleData(#[from] hex::FromHexError),

    /// Writing failed, or a chunk exceeded the 32-bit size field.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
