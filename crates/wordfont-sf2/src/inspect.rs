//! Structural inspection of encoded containers.
//!
//! Walks the chunk tree and reads the INFO strings and pdta records back
//! as raw views. Used by the `inspect` command and by tests that check the
//! encoder's output; it does not rebuild a bank.

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;
use std::io::Cursor;
use thiserror::Error;

use crate::chunk::{CHUNK_HEADER_SIZE, LIST, RIFF, SFBK};
use crate::records::{record_size, NAME_LEN};

/// Errors that stop inspection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InspectError {
    /// The data does not start with a RIFF `sfbk` header.
    #[error("not a RIFF sfbk container (found '{found}')")]
    NotRiff { found: String },

    /// A chunk runs past the end of its parent.
    #[error("chunk at offset {offset} needs {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A pdta table's size is not a multiple of its record width.
    #[error("table '{tag}' is {size} bytes, not a multiple of {record_size}")]
    MisalignedTable {
        tag: String,
        size: usize,
        record_size: usize,
    },
}

/// One chunk in the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkNode {
    /// Four-character tag.
    pub id: String,
    /// Form type, for RIFF and LIST chunks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    /// Offset of the tag from the start of the data.
    pub offset: usize,
    /// Declared size.
    pub size: usize,
    /// Child chunks, for RIFF and LIST chunks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChunkNode>,
}

impl ChunkNode {
    /// Payload bytes, after the form type for RIFF and LIST chunks.
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        let skip = if self.form_type.is_some() { 4 } else { 0 };
        let start = self.offset + CHUNK_HEADER_SIZE + skip;
        let end = self.offset + CHUNK_HEADER_SIZE + self.size;
        &data[start..end]
    }

    /// The first LIST child with this form type.
    pub fn list(&self, form_type: &str) -> Option<&ChunkNode> {
        self.children
            .iter()
            .find(|c| c.id == LIST && c.form_type.as_deref() == Some(form_type))
    }

    /// The first child with this tag.
    pub fn child(&self, id: &str) -> Option<&ChunkNode> {
        self.children.iter().find(|c| c.id == id)
    }
}

/// An INFO sub-record as read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoEntry {
    /// Four-character tag.
    pub tag: String,
    /// Text with the terminator stripped; `ifil` as `"major.minor"`.
    pub value: String,
}

/// Record count of one pdta table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub tag: String,
    /// Payload size in bytes.
    pub size: usize,
    /// `size` divided by the record width, terminator included.
    pub records: usize,
}

/// A `phdr` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetHeaderView {
    pub name: String,
    pub preset: u16,
    pub bank: u16,
    pub bag_index: u16,
}

/// A `pbag` or `ibag` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BagView {
    pub generator_index: u16,
    pub modulator_index: u16,
}

/// A `pgen` or `igen` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeneratorView {
    pub operator: u16,
    /// Raw 16-bit amount; key ranges are `lower | upper << 8`.
    pub amount: u16,
}

/// An `inst` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstrumentView {
    pub name: String,
    pub bag_index: u16,
}

/// The `shdr` fields the reports show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleHeaderView {
    pub name: String,
    pub start: u32,
    pub end: u32,
    pub sample_rate: u32,
    pub original_pitch: u8,
    pub sample_type: u16,
}

/// Everything read back from a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerReport {
    /// The RIFF chunk tree.
    pub root: ChunkNode,
    /// INFO sub-records in file order.
    pub info: Vec<InfoEntry>,
    /// Size of the `smpl` payload in bytes.
    pub sample_data_len: usize,
    pub tables: Vec<TableSummary>,
    pub presets: Vec<PresetHeaderView>,
    pub preset_bags: Vec<BagView>,
    pub preset_generators: Vec<GeneratorView>,
    pub instruments: Vec<InstrumentView>,
    pub instrument_bags: Vec<BagView>,
    pub instrument_generators: Vec<GeneratorView>,
    pub samples: Vec<SampleHeaderView>,
}

impl ContainerReport {
    /// Summary of a pdta table, if present.
    pub fn table(&self, tag: &str) -> Option<&TableSummary> {
        self.tables.iter().find(|t| t.tag == tag)
    }

    /// Value of an INFO sub-record, if present.
    pub fn info_value(&self, tag: &str) -> Option<&str> {
        self.info
            .iter()
            .find(|e| e.tag == tag)
            .map(|e| e.value.as_str())
    }
}

/// Inspect a container.
pub fn inspect(data: &[u8]) -> Result<ContainerReport, InspectError> {
    if data.len() < CHUNK_HEADER_SIZE + 4 {
        return Err(InspectError::NotRiff {
            found: String::from_utf8_lossy(&data[..data.len().min(4)]).into_owned(),
        });
    }
    let (tag, form_type) = (&data[0..4], &data[8..12]);
    if tag != RIFF.as_bytes() || form_type != SFBK.as_bytes() {
        return Err(InspectError::NotRiff {
            found: format!(
                "{}/{}",
                String::from_utf8_lossy(tag),
                String::from_utf8_lossy(form_type)
            ),
        });
    }
    let (root, _) = read_chunk(data, 0, data.len())?;

    let mut report = ContainerReport {
        root,
        info: Vec::new(),
        sample_data_len: 0,
        tables: Vec::new(),
        presets: Vec::new(),
        preset_bags: Vec::new(),
        preset_generators: Vec::new(),
        instruments: Vec::new(),
        instrument_bags: Vec::new(),
        instrument_generators: Vec::new(),
        samples: Vec::new(),
    };

    if let Some(info) = report.root.list("INFO") {
        report.info = info
            .children
            .iter()
            .map(|c| InfoEntry {
                tag: c.id.clone(),
                value: read_info_value(&c.id, c.payload(data)),
            })
            .collect();
    }

    if let Some(smpl) = report.root.list("sdta").and_then(|l| l.child("smpl")) {
        report.sample_data_len = smpl.size;
    }

    if let Some(pdta) = report.root.list("pdta").cloned() {
        for chunk in &pdta.children {
            let Some(width) = record_size(&chunk.id) else {
                continue;
            };
            if chunk.size % width != 0 {
                return Err(InspectError::MisalignedTable {
                    tag: chunk.id.clone(),
                    size: chunk.size,
                    record_size: width,
                });
            }
            report.tables.push(TableSummary {
                tag: chunk.id.clone(),
                size: chunk.size,
                records: chunk.size / width,
            });

            let records = chunk.payload(data).chunks_exact(width);
            match chunk.id.as_str() {
                "phdr" => report.presets = records.map(read_preset_header).collect(),
                "pbag" => report.preset_bags = records.map(read_bag).collect(),
                "pgen" => report.preset_generators = records.map(read_generator).collect(),
                "inst" => report.instruments = records.map(read_instrument).collect(),
                "ibag" => report.instrument_bags = records.map(read_bag).collect(),
                "igen" => report.instrument_generators = records.map(read_generator).collect(),
                "shdr" => report.samples = records.map(read_sample_header).collect(),
                _ => {}
            }
        }
    }

    Ok(report)
}

/// Read the chunk at `offset`, which must end by `limit`. Returns the node
/// and the offset just past it, pad byte included.
fn read_chunk(data: &[u8], offset: usize, limit: usize) -> Result<(ChunkNode, usize), InspectError> {
    if offset + CHUNK_HEADER_SIZE > limit {
        return Err(InspectError::Truncated {
            offset,
            needed: CHUNK_HEADER_SIZE,
            available: limit - offset,
        });
    }
    let id = String::from_utf8_lossy(&data[offset..offset + 4]).into_owned();
    let size = u32::from_le_bytes([
        data[offset + 4],
        data[offset + 5],
        data[offset + 6],
        data[offset + 7],
    ]) as usize;

    let body_start = offset + CHUNK_HEADER_SIZE;
    let body_end = body_start + size;
    if body_end > limit {
        return Err(InspectError::Truncated {
            offset,
            needed: CHUNK_HEADER_SIZE + size,
            available: limit - offset,
        });
    }

    let mut node = ChunkNode {
        id,
        form_type: None,
        offset,
        size,
        children: Vec::new(),
    };

    if (node.id == RIFF || node.id == LIST) && size >= 4 {
        node.form_type = Some(String::from_utf8_lossy(&data[body_start..body_start + 4]).into_owned());
        let mut cursor = body_start + 4;
        while cursor < body_end {
            let (child, next) = read_chunk(data, cursor, body_end)?;
            node.children.push(child);
            cursor = next;
        }
    }

    let next = (body_end + size % 2).min(limit);
    Ok((node, next))
}

fn read_info_value(tag: &str, payload: &[u8]) -> String {
    if tag == "ifil" && payload.len() >= 4 {
        let major = u16::from_le_bytes([payload[0], payload[1]]);
        let minor = u16::from_le_bytes([payload[2], payload[3]]);
        return format!("{}.{:02}", major, minor);
    }
    read_text(payload)
}

/// Bytes up to the first NUL, lossily decoded.
fn read_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

// Record readers get exactly one record, so the reads below cannot run out.

fn read_preset_header(record: &[u8]) -> PresetHeaderView {
    let mut r = Cursor::new(&record[NAME_LEN..]);
    PresetHeaderView {
        name: read_text(&record[..NAME_LEN]),
        preset: r.read_u16::<LittleEndian>().unwrap_or(0),
        bank: r.read_u16::<LittleEndian>().unwrap_or(0),
        bag_index: r.read_u16::<LittleEndian>().unwrap_or(0),
    }
}

fn read_bag(record: &[u8]) -> BagView {
    let mut r = Cursor::new(record);
    BagView {
        generator_index: r.read_u16::<LittleEndian>().unwrap_or(0),
        modulator_index: r.read_u16::<LittleEndian>().unwrap_or(0),
    }
}

fn read_generator(record: &[u8]) -> GeneratorView {
    let mut r = Cursor::new(record);
    GeneratorView {
        operator: r.read_u16::<LittleEndian>().unwrap_or(0),
        amount: r.read_u16::<LittleEndian>().unwrap_or(0),
    }
}

fn read_instrument(record: &[u8]) -> InstrumentView {
    let mut r = Cursor::new(&record[NAME_LEN..]);
    InstrumentView {
        name: read_text(&record[..NAME_LEN]),
        bag_index: r.read_u16::<LittleEndian>().unwrap_or(0),
    }
}

fn read_sample_header(record: &[u8]) -> SampleHeaderView {
    let mut r = Cursor::new(&record[NAME_LEN..]);
    let start = r.read_u32::<LittleEndian>().unwrap_or(0);
    let end = r.read_u32::<LittleEndian>().unwrap_or(0);
    let _loop_start = r.read_u32::<LittleEndian>().unwrap_or(0);
    let _loop_end = r.read_u32::<LittleEndian>().unwrap_or(0);
    let sample_rate = r.read_u32::<LittleEndian>().unwrap_or(0);
    let original_pitch = r.read_u8().unwrap_or(0);
    let _pitch_correction = r.read_i8().unwrap_or(0);
    let _sample_link = r.read_u16::<LittleEndian>().unwrap_or(0);
    let sample_type = r.read_u16::<LittleEndian>().unwrap_or(0);
    SampleHeaderView {
        name: read_text(&record[..NAME_LEN]),
        start,
        end,
        sample_rate,
        original_pitch,
        sample_type,
    }
}
