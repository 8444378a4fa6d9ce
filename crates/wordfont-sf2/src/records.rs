//! Fixed-width pdta records.
//!
//! Every record is little-endian. Name fields are 20 bytes: the UTF-8 name
//! cut to at most 20 bytes on a character boundary and zero-filled, with no
//! terminator when the name fills the field.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

use wordfont_bank::ir::{
    BagEntry, InstrumentEntry, ModulatorEntry, PresetHeaderEntry, SampleHeaderEntry,
};

/// Width of every name field.
pub const NAME_LEN: usize = 20;

/// `phdr` record width.
pub const PRESET_HEADER_SIZE: usize = 38;
/// `pbag` / `ibag` record width.
pub const BAG_SIZE: usize = 4;
/// `pmod` / `imod` record width.
pub const MODULATOR_SIZE: usize = 10;
/// `pgen` / `igen` record width.
pub const GENERATOR_SIZE: usize = 4;
/// `inst` record width.
pub const INSTRUMENT_SIZE: usize = 22;
/// `shdr` record width.
pub const SAMPLE_HEADER_SIZE: usize = 46;

/// The nine pdta tables in container order with their record widths.
pub const PDTA_TABLES: [(&str, usize); 9] = [
    ("phdr", PRESET_HEADER_SIZE),
    ("pbag", BAG_SIZE),
    ("pmod", MODULATOR_SIZE),
    ("pgen", GENERATOR_SIZE),
    ("inst", INSTRUMENT_SIZE),
    ("ibag", BAG_SIZE),
    ("imod", MODULATOR_SIZE),
    ("igen", GENERATOR_SIZE),
    ("shdr", SAMPLE_HEADER_SIZE),
];

/// Record width for a pdta table tag.
pub fn record_size(tag: &str) -> Option<usize> {
    PDTA_TABLES
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, size)| *size)
}

/// Longest prefix of `text` that fits in `max` bytes without splitting a
/// character.
pub fn truncate_utf8(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Write a name into a 20-byte field.
pub fn write_name<W: Write>(writer: &mut W, name: &str) -> io::Result<()> {
    let mut field = [0u8; NAME_LEN];
    let kept = truncate_utf8(name, NAME_LEN).as_bytes();
    field[..kept.len()].copy_from_slice(kept);
    writer.write_all(&field)
}

/// Write a 38-byte `phdr` record.
pub fn write_preset_header<W: Write>(writer: &mut W, entry: &PresetHeaderEntry) -> io::Result<()> {
    write_name(writer, &entry.name)?;
    writer.write_u16::<LittleEndian>(entry.preset)?;
    writer.write_u16::<LittleEndian>(entry.bank)?;
    writer.write_u16::<LittleEndian>(entry.bag_index)?;
    writer.write_u32::<LittleEndian>(entry.library)?;
    writer.write_u32::<LittleEndian>(entry.genre)?;
    writer.write_u32::<LittleEndian>(entry.morphology)?;
    Ok(())
}

/// Write a 4-byte `pbag`/`ibag` record.
pub fn write_bag<W: Write>(writer: &mut W, entry: &BagEntry) -> io::Result<()> {
    writer.write_u16::<LittleEndian>(entry.generator_index)?;
    writer.write_u16::<LittleEndian>(entry.modulator_index)?;
    Ok(())
}

/// Write a 10-byte `pmod`/`imod` record.
pub fn write_modulator<W: Write>(writer: &mut W, entry: &ModulatorEntry) -> io::Result<()> {
    writer.write_u16::<LittleEndian>(entry.source)?;
    writer.write_u16::<LittleEndian>(entry.destination)?;
    writer.write_i16::<LittleEndian>(entry.amount)?;
    writer.write_u16::<LittleEndian>(entry.amount_source)?;
    writer.write_u16::<LittleEndian>(entry.transform)?;
    Ok(())
}

/// Write a generator record with an already resolved amount.
pub fn write_generator<W: Write>(writer: &mut W, operator: u16, amount: u16) -> io::Result<()> {
    writer.write_u16::<LittleEndian>(operator)?;
    writer.write_u16::<LittleEndian>(amount)?;
    Ok(())
}

/// Write a 22-byte `inst` record.
pub fn write_instrument<W: Write>(writer: &mut W, entry: &InstrumentEntry) -> io::Result<()> {
    write_name(writer, &entry.name)?;
    writer.write_u16::<LittleEndian>(entry.bag_index)?;
    Ok(())
}

/// Write a 46-byte `shdr` record.
pub fn write_sample_header<W: Write>(writer: &mut W, entry: &SampleHeaderEntry) -> io::Result<()> {
    write_name(writer, &entry.name)?;
    writer.write_u32::<LittleEndian>(entry.start)?;
    writer.write_u32::<LittleEndian>(entry.end)?;
    writer.write_u32::<LittleEndian>(entry.loop_start)?;
    writer.write_u32::<LittleEndian>(entry.loop_end)?;
    writer.write_u32::<LittleEndian>(entry.sample_rate)?;
    writer.write_u8(entry.original_pitch)?;
    writer.write_i8(entry.pitch_correction)?;
    writer.write_u16::<LittleEndian>(entry.sample_link)?;
    writer.write_u16::<LittleEndian>(entry.sample_type)?;
    Ok(())
}
