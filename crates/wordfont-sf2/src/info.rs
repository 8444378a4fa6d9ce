//! INFO list packing.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io;

use wordfont_bank::ir::{InfoContents, InfoField, InfoKind, InfoValue, VersionTag};

use crate::chunk::write_chunk;
use crate::diagnostic::{DiagnosticCode, Diagnostics};
use crate::records::truncate_utf8;

/// Longest INFO string kept, in bytes, before the NUL terminator.
pub const MAX_INFO_TEXT: usize = 256;

/// Pack the INFO sub-chunks (without the LIST header) in field order.
///
/// Absent fields and values of the wrong kind are skipped with a
/// diagnostic. The version may be given as a pair or as `"2.01"` text.
pub fn pack_info(contents: &InfoContents, diagnostics: &mut Diagnostics) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();

    for field in InfoField::ALL {
        let tag = field.tag();
        let path = format!("INFO.{}", tag);

        let Some(value) = contents.get(&field) else {
            diagnostics.warn(
                DiagnosticCode::MissingInfoField,
                format!("'{}' not present, skipped", tag),
                path,
            );
            continue;
        };

        let payload = match (field.kind(), value) {
            (InfoKind::VersionPair, InfoValue::Version(version)) => pack_version(*version)?,
            (InfoKind::VersionPair, InfoValue::Text(text)) => match VersionTag::parse(text) {
                Some(version) => pack_version(version)?,
                None => {
                    diagnostics.warn(
                        DiagnosticCode::InfoKindMismatch,
                        format!("'{}' is not a version number, skipped", text),
                        path,
                    );
                    continue;
                }
            },
            (InfoKind::Text, InfoValue::Text(text)) => pack_text(text, &path, diagnostics),
            (InfoKind::Text, InfoValue::Version(_)) => {
                diagnostics.warn(
                    DiagnosticCode::InfoKindMismatch,
                    format!("'{}' expects text, got a version pair; skipped", tag),
                    path,
                );
                continue;
            }
        };

        write_chunk(&mut out, tag, &payload)?;
    }

    Ok(out)
}

fn pack_version(version: VersionTag) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(4);
    buf.write_u16::<LittleEndian>(version.major)?;
    buf.write_u16::<LittleEndian>(version.minor)?;
    Ok(buf)
}

/// UTF-8 bytes, cut to at most [`MAX_INFO_TEXT`] on a character boundary,
/// then one NUL.
fn pack_text(text: &str, path: &str, diagnostics: &mut Diagnostics) -> Vec<u8> {
    let kept = truncate_utf8(text, MAX_INFO_TEXT).as_bytes();
    if kept.len() < text.len() {
        diagnostics.warn(
            DiagnosticCode::StringTruncated,
            format!("{} bytes cut to {}", text.len(), kept.len()),
            path,
        );
    }

    let mut buf = Vec::with_capacity(kept.len() + 1);
    buf.extend_from_slice(kept);
    buf.push(0);
    buf
}
