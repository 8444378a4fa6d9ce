//! Container encoding entry points.

use std::io::Write;

use wordfont_bank::ir::{ListBody, ListChunk, LIST_ID, RIFF_ID, SFBK_FORM};
use wordfont_bank::{Bank, SoundFontDocument};

use crate::chunk::{write_chunk, write_form, LIST, RIFF, SFBK};
use crate::diagnostic::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::error::EncodeError;
use crate::info::pack_info;
use crate::pdta::pack_preset_data;
use crate::sdta::pack_sample_data;

/// Form types of the three top-level lists, in container order.
pub const LIST_FORMS: [&str; 3] = ["INFO", "sdta", "pdta"];

/// Result of an encode.
#[derive(Debug, Clone)]
pub struct EncodeResult {
    /// The complete RIFF `sfbk` container.
    pub data: Vec<u8>,
    /// BLAKE3 hash of `data`, hex encoded.
    pub hash: String,
    /// Recoverable problems met while encoding.
    pub diagnostics: Vec<Diagnostic>,
}

impl EncodeResult {
    fn new(data: Vec<u8>, diagnostics: Diagnostics) -> Self {
        let hash = blake3::hash(&data).to_hex().to_string();
        Self {
            data,
            hash,
            diagnostics: diagnostics.into_vec(),
        }
    }

    /// Write the container bytes.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)
    }
}

/// Encode a bank.
///
/// Fails without writing anything when the bank cannot produce consistent
/// tables: no preset, a preset with no instrument, or more records than
/// 16-bit indices can address. See [`Bank::ensure_encodable`].
pub fn encode_bank(bank: &Bank) -> Result<EncodeResult, EncodeError> {
    bank.ensure_encodable()?;

    log::info!(
        "Encoding bank '{}' ({} samples)",
        bank.info.name,
        bank.samples().count()
    );
    encode_document(&bank.to_intermediate_representation())
}

/// Encode IR JSON text.
pub fn encode_json(text: &str) -> Result<EncodeResult, EncodeError> {
    let document: SoundFontDocument = serde_json::from_str(text)?;
    encode_document(&document)
}

/// Encode an IR document.
///
/// Always writes the three lists in INFO, sdta, pdta order. A list absent
/// from the document is written empty; a list form given twice keeps its
/// first occurrence.
pub fn encode_document(document: &SoundFontDocument) -> Result<EncodeResult, EncodeError> {
    let mut diagnostics = Diagnostics::default();

    if document.id != RIFF_ID || document.form_type != SFBK_FORM {
        diagnostics.warn(
            DiagnosticCode::UnexpectedChunkId,
            format!(
                "container is '{}'/'{}', writing {}/{}",
                document.id, document.form_type, RIFF, SFBK
            ),
            "root",
        );
    }

    let mut lists = Vec::new();
    for form in LIST_FORMS {
        let children = match find_list(document, form, &mut diagnostics) {
            Some(ListBody::Info { contents }) => pack_info(contents, &mut diagnostics)?,
            Some(ListBody::SampleData { contents }) => {
                pack_sample_data(contents, &mut diagnostics)?
            }
            Some(ListBody::PresetData { contents }) => {
                pack_preset_data(contents, &mut diagnostics)?
            }
            None => {
                diagnostics.warn(
                    DiagnosticCode::MissingList,
                    format!("'{}' list not present, written empty", form),
                    form,
                );
                Vec::new()
            }
        };
        write_form(&mut lists, LIST, form, &children)?;
    }

    let mut data = Vec::with_capacity(lists.len() + 12);
    let mut payload = Vec::with_capacity(lists.len() + 4);
    payload.extend_from_slice(SFBK.as_bytes());
    payload.extend_from_slice(&lists);
    write_chunk(&mut data, RIFF, &payload)?;

    log::debug!("Encoded {} bytes", data.len());
    Ok(EncodeResult::new(data, diagnostics))
}

fn find_list<'a>(
    document: &'a SoundFontDocument,
    form: &str,
    diagnostics: &mut Diagnostics,
) -> Option<&'a ListBody> {
    let mut matching = document
        .contents
        .iter()
        .enumerate()
        .filter(|(_, chunk)| chunk.body.form_type() == form);

    let (index, first): (usize, &ListChunk) = matching.next()?;
    if first.id != LIST_ID {
        diagnostics.warn(
            DiagnosticCode::UnexpectedChunkId,
            format!("list tagged '{}', writing {}", first.id, LIST),
            format!("contents[{}]", index),
        );
    }
    for (index, _) in matching {
        diagnostics.warn(
            DiagnosticCode::DuplicateList,
            format!("second '{}' list ignored", form),
            format!("contents[{}]", index),
        );
    }
    Some(&first.body)
}
