//! sdta list packing.

use wordfont_bank::ir::SampleDataContents;

use crate::chunk::write_chunk;
use crate::diagnostic::{DiagnosticCode, Diagnostics};
use crate::error::EncodeError;

/// Pack the `smpl` sub-chunk (without the LIST header).
///
/// A missing `smpl` leaves the list empty. Sample data that is not valid
/// hex is fatal.
pub fn pack_sample_data(
    contents: &SampleDataContents,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    match &contents.smpl {
        Some(chunk) => {
            let pcm = hex::decode(&chunk.data)?;
            log::debug!("smpl: {} bytes of PCM", pcm.len());
            write_chunk(&mut out, "smpl", &pcm)?;
        }
        None => diagnostics.warn(
            DiagnosticCode::MissingSampleData,
            "'smpl' not present, list left empty",
            "sdta.smpl",
        ),
    }
    Ok(out)
}
