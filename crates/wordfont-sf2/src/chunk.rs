//! RIFF chunk framing.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

/// Bytes taken by a chunk's tag and size fields.
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Tag of the outer container.
pub const RIFF: &str = "RIFF";

/// Tag of list chunks.
pub const LIST: &str = "LIST";

/// Form type of the outer container.
pub const SFBK: &str = "sfbk";

/// Turn a four-character tag into bytes.
pub fn fourcc(tag: &str) -> io::Result<[u8; 4]> {
    tag.as_bytes().try_into().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("chunk tag '{}' is not four bytes", tag),
        )
    })
}

/// Write a chunk: tag, little-endian u32 size, payload, one pad byte if odd.
///
/// The declared size includes the pad byte.
pub fn write_chunk<W: Write>(writer: &mut W, tag: &str, payload: &[u8]) -> io::Result<()> {
    let pad = payload.len() % 2;
    let size = u32::try_from(payload.len() + pad).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "chunk '{}' is {} bytes, exceeding the 32-bit size field",
                tag,
                payload.len()
            ),
        )
    })?;

    writer.write_all(&fourcc(tag)?)?;
    writer.write_u32::<LittleEndian>(size)?;
    writer.write_all(payload)?;
    if pad == 1 {
        writer.write_u8(0)?;
    }
    Ok(())
}

/// Write a form chunk (`RIFF` or `LIST`): the form type followed by already
/// framed child chunks.
pub fn write_form<W: Write>(
    writer: &mut W,
    tag: &str,
    form_type: &str,
    children: &[u8],
) -> io::Result<()> {
    let mut payload = Vec::with_capacity(4 + children.len());
    payload.extend_from_slice(&fourcc(form_type)?);
    payload.extend_from_slice(children);
    write_chunk(writer, tag, &payload)
}
