//! Intermediate representation: a typed chunk-descriptor tree that mirrors
//! the binary container layout.
//!
//! The IR is what a bank looks like just before record packing. It
//! serializes to JSON for inspection and can be fed back to the encoder
//! as an alternate entry point; both paths produce identical bytes.
//!
//! ```json
//! {
//!   "id": "RIFF",
//!   "form_type": "sfbk",
//!   "contents": [
//!     { "id": "LIST", "form_type": "INFO", "contents": { "ifil": { "major": 2, "minor": 1 }, "INAM": "Words" } },
//!     { "id": "LIST", "form_type": "sdta", "contents": { "smpl": { "data": "0100feff" } } },
//!     { "id": "LIST", "form_type": "pdta", "contents": { "phdr": { "entries": [] } } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bank::Bank;
use crate::tables::build_preset_data;

/// Outer container tag.
pub const RIFF_ID: &str = "RIFF";

/// Outer form type for sound banks.
pub const SFBK_FORM: &str = "sfbk";

/// Tag of the three top-level list chunks.
pub const LIST_ID: &str = "LIST";

/// Format version written to `ifil` (2.01).
pub const FORMAT_VERSION: VersionTag = VersionTag { major: 2, minor: 1 };

/// Sound engine written to `isng`.
pub const TARGET_ENGINE: &str = "All";

/// Generator operator codes used by this encoder.
pub mod generator {
    /// Preset generator selecting an instrument.
    pub const INSTRUMENT: u16 = 41;
    /// Key range; amount packs lower key (low byte) and upper key (high byte).
    pub const KEY_RANGE: u16 = 43;
    /// Instrument generator selecting a sample header.
    pub const SAMPLE_ID: u16 = 53;
}

/// Sample type for mono samples.
pub const MONO_SAMPLE_TYPE: u16 = 1;

/// Terminator record names.
pub mod terminator {
    /// Closes the preset header table.
    pub const END_OF_PRESETS: &str = "EOP";
    /// Closes the instrument table.
    pub const END_OF_INSTRUMENTS: &str = "EOI";
    /// Closes the sample header table.
    pub const END_OF_SAMPLES: &str = "EOS";
}

/// Root of the IR: the RIFF `sfbk` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundFontDocument {
    /// Chunk tag, always "RIFF".
    #[serde(default = "default_riff_id")]
    pub id: String,
    /// Form type, always "sfbk".
    #[serde(default = "default_sfbk_form")]
    pub form_type: String,
    /// The INFO, sdta and pdta lists.
    pub contents: Vec<ListChunk>,
}

fn default_riff_id() -> String {
    RIFF_ID.to_string()
}

fn default_sfbk_form() -> String {
    SFBK_FORM.to_string()
}

fn default_list_id() -> String {
    LIST_ID.to_string()
}

/// A top-level LIST chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListChunk {
    /// Chunk tag, always "LIST".
    #[serde(default = "default_list_id")]
    pub id: String,
    /// Form type and contents.
    #[serde(flatten)]
    pub body: ListBody,
}

impl ListChunk {
    /// Wrap a body in a LIST chunk.
    pub fn new(body: ListBody) -> Self {
        Self {
            id: default_list_id(),
            body,
        }
    }
}

/// The three list forms, keyed by `form_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form_type")]
pub enum ListBody {
    /// Bank metadata.
    #[serde(rename = "INFO")]
    Info {
        /// Metadata sub-records.
        contents: InfoContents,
    },
    /// Sample data.
    #[serde(rename = "sdta")]
    SampleData {
        /// The `smpl` sub-chunk.
        contents: SampleDataContents,
    },
    /// Preset, instrument and sample tables.
    #[serde(rename = "pdta")]
    PresetData {
        /// The nine record tables.
        contents: PresetDataContents,
    },
}

impl ListBody {
    /// Four-character form type of this list.
    pub fn form_type(&self) -> &'static str {
        match self {
            ListBody::Info { .. } => "INFO",
            ListBody::SampleData { .. } => "sdta",
            ListBody::PresetData { .. } => "pdta",
        }
    }
}

/// The closed set of INFO sub-records, in container order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InfoField {
    /// `ifil`: format version pair.
    #[serde(rename = "ifil")]
    Version,
    /// `isng`: target sound engine.
    #[serde(rename = "isng")]
    TargetEngine,
    /// `INAM`: bank name.
    #[serde(rename = "INAM")]
    BankName,
    /// `IENG`: author.
    #[serde(rename = "IENG")]
    Author,
    /// `IPRD`: product.
    #[serde(rename = "IPRD")]
    Product,
    /// `ICOP`: copyright.
    #[serde(rename = "ICOP")]
    Copyright,
    /// `ICMT`: comment.
    #[serde(rename = "ICMT")]
    Comment,
    /// `ISFT`: creating tool.
    #[serde(rename = "ISFT")]
    Tool,
}

/// How an INFO sub-record is packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoKind {
    /// Two little-endian u16 values (major, minor).
    VersionPair,
    /// NUL-terminated string, at most 256 bytes before the terminator.
    Text,
}

impl InfoField {
    /// Every field, in the order written to the INFO chunk.
    pub const ALL: [InfoField; 8] = [
        InfoField::Version,
        InfoField::TargetEngine,
        InfoField::BankName,
        InfoField::Author,
        InfoField::Product,
        InfoField::Copyright,
        InfoField::Comment,
        InfoField::Tool,
    ];

    /// Four-character sub-chunk tag.
    pub fn tag(self) -> &'static str {
        match self {
            InfoField::Version => "ifil",
            InfoField::TargetEngine => "isng",
            InfoField::BankName => "INAM",
            InfoField::Author => "IENG",
            InfoField::Product => "IPRD",
            InfoField::Copyright => "ICOP",
            InfoField::Comment => "ICMT",
            InfoField::Tool => "ISFT",
        }
    }

    /// Packing rule for this field.
    pub fn kind(self) -> InfoKind {
        match self {
            InfoField::Version => InfoKind::VersionPair,
            _ => InfoKind::Text,
        }
    }

    /// Look a field up by its sub-chunk tag.
    pub fn from_tag(tag: &str) -> Option<InfoField> {
        InfoField::ALL.into_iter().find(|f| f.tag() == tag)
    }
}

/// Version pair of the `ifil` sub-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTag {
    /// Major version.
    pub major: u16,
    /// Minor version.
    pub minor: u16,
}

impl VersionTag {
    /// Parse `"2.01"`-style text into (2, 1).
    pub fn parse(text: &str) -> Option<VersionTag> {
        let (major, minor) = text.trim().split_once('.')?;
        Some(VersionTag {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }
}

/// Value of an INFO sub-record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoValue {
    /// A version pair.
    Version(VersionTag),
    /// A text value.
    Text(String),
}

/// INFO sub-records keyed by field; iteration follows container order.
pub type InfoContents = BTreeMap<InfoField, InfoValue>;

/// Contents of the sdta list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleDataContents {
    /// Concatenated sample PCM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smpl: Option<SampleChunk>,
}

/// The `smpl` sub-chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleChunk {
    /// Lowercase hex of every sample's PCM bytes in traversal order.
    pub data: String,
}

/// One record table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table<T> {
    /// Records, terminator included.
    pub entries: Vec<T>,
}

impl<T> Table<T> {
    /// Wrap records in a table.
    pub fn new(entries: Vec<T>) -> Self {
        Self { entries }
    }
}

/// The nine pdta tables; a missing table is skipped by the encoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetDataContents {
    /// Preset headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phdr: Option<Table<PresetHeaderEntry>>,
    /// Preset bags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pbag: Option<Table<BagEntry>>,
    /// Preset modulators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmod: Option<Table<ModulatorEntry>>,
    /// Preset generators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pgen: Option<Table<GeneratorEntry>>,
    /// Instrument headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inst: Option<Table<InstrumentEntry>>,
    /// Instrument bags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ibag: Option<Table<BagEntry>>,
    /// Instrument modulators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imod: Option<Table<ModulatorEntry>>,
    /// Instrument generators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub igen: Option<Table<GeneratorEntry>>,
    /// Sample headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shdr: Option<Table<SampleHeaderEntry>>,
}

/// `phdr` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetHeaderEntry {
    /// Preset name, cut to 20 bytes when written.
    pub name: String,
    /// MIDI program number.
    pub preset: u16,
    /// MIDI bank number.
    pub bank: u16,
    /// Index of the preset's first `pbag` record.
    pub bag_index: u16,
    /// Reserved, always 0.
    pub library: u32,
    /// Reserved, always 0.
    pub genre: u32,
    /// Reserved, always 0.
    pub morphology: u32,
}

/// `pbag` / `ibag` record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagEntry {
    /// Index of the zone's first generator.
    pub generator_index: u16,
    /// Index of the zone's first modulator.
    pub modulator_index: u16,
}

/// `pmod` / `imod` record. Only the all-zero record is ever produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulatorEntry {
    /// Source operator.
    pub source: u16,
    /// Destination generator.
    pub destination: u16,
    /// Modulation depth.
    pub amount: i16,
    /// Operator scaling `amount`.
    pub amount_source: u16,
    /// Transform applied to the source.
    pub transform: u16,
}

/// `pgen` / `igen` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorEntry {
    /// Generator operator, see [`generator`].
    pub operator: u16,
    /// Operator argument, resolved to 16 bits by the encoder.
    pub amount: GeneratorAmount,
}

impl GeneratorEntry {
    /// The all-zero record closing a generator table.
    pub fn terminator() -> Self {
        Self {
            operator: 0,
            amount: GeneratorAmount::Value(0),
        }
    }
}

/// Generator amount as written in the IR.
///
/// Key ranges are written as `[lower, upper]`; everything else is a
/// scalar. Anything else is kept verbatim so the encoder can report it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratorAmount {
    /// Scalar amount.
    Value(i64),
    /// Byte pair, or a malformed list.
    List(Vec<i64>),
    /// Any other JSON value.
    Other(serde_json::Value),
}

/// `inst` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentEntry {
    /// Instrument name, cut to 20 bytes when written.
    pub name: String,
    /// Index of the instrument's first `ibag` record.
    pub bag_index: u16,
}

/// `shdr` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleHeaderEntry {
    /// Sample name, cut to 20 bytes when written.
    pub name: String,
    /// First frame in `smpl`.
    pub start: u32,
    /// One past the last frame in `smpl`.
    pub end: u32,
    /// Loop start frame; 0 when unlooped.
    pub loop_start: u32,
    /// Loop end frame; 0 when unlooped.
    pub loop_end: u32,
    /// Frames per second.
    pub sample_rate: u32,
    /// MIDI key of the recorded pitch.
    pub original_pitch: u8,
    /// Pitch correction in cents.
    pub pitch_correction: i8,
    /// Linked stereo partner; 0 for mono.
    pub sample_link: u16,
    /// Sample type; 1 for mono.
    pub sample_type: u16,
}

impl SampleHeaderEntry {
    /// The all-zero `EOS` record closing the sample header table.
    pub fn terminator() -> Self {
        Self {
            name: terminator::END_OF_SAMPLES.to_string(),
            ..Default::default()
        }
    }
}

impl Bank {
    /// Derive the chunk-descriptor tree for this bank.
    ///
    /// Pure and deterministic: the same bank always yields the same tree.
    pub fn to_intermediate_representation(&self) -> SoundFontDocument {
        let text = |value: &str| InfoValue::Text(value.to_string());

        let mut info = InfoContents::new();
        info.insert(InfoField::Version, InfoValue::Version(FORMAT_VERSION));
        info.insert(InfoField::TargetEngine, text(TARGET_ENGINE));
        info.insert(InfoField::BankName, text(&self.info.name));
        info.insert(InfoField::Author, text(&self.info.author));
        info.insert(InfoField::Product, text(&self.info.product));
        info.insert(InfoField::Copyright, text(&self.info.copyright));
        info.insert(InfoField::Comment, text(&self.info.comment));
        info.insert(InfoField::Tool, text(&self.info.product));

        let data: String = self.samples().map(|s| hex::encode(s.pcm())).collect();

        SoundFontDocument {
            id: default_riff_id(),
            form_type: default_sfbk_form(),
            contents: vec![
                ListChunk::new(ListBody::Info { contents: info }),
                ListChunk::new(ListBody::SampleData {
                    contents: SampleDataContents {
                        smpl: Some(SampleChunk { data }),
                    },
                }),
                ListChunk::new(ListBody::PresetData {
                    contents: build_preset_data(self),
                }),
            ],
        }
    }
}
