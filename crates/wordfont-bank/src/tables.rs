//! Derivation of the nine pdta record tables from a bank.
//!
//! One depth-first pass over Preset → Instrument → Zone emits every record.
//! The cross-table indices are carried in [`TableCursor`], so each record
//! sees the running counts of everything emitted before it.

use crate::bank::{Bank, Preset};
use crate::ir::{
    generator, terminator, BagEntry, GeneratorAmount, GeneratorEntry, InstrumentEntry,
    ModulatorEntry, PresetDataContents, PresetHeaderEntry, SampleHeaderEntry, Table,
    MONO_SAMPLE_TYPE,
};

/// Generator records emitted per zone (sample id + key range).
pub const GENERATORS_PER_ZONE: u32 = 2;

/// Running indices threaded through the traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCursor {
    /// Next preset bag.
    pub preset_bag: u32,
    /// Next preset generator.
    pub preset_generator: u32,
    /// Next instrument.
    pub instrument: u32,
    /// Next instrument bag.
    pub instrument_bag: u32,
    /// Next instrument generator.
    pub instrument_generator: u32,
    /// Next sample header.
    pub sample: u32,
    /// Start offset of the next sample, in frames.
    pub sample_offset: u32,
}

#[derive(Debug, Default)]
struct TableSet {
    phdr: Vec<PresetHeaderEntry>,
    pbag: Vec<BagEntry>,
    pgen: Vec<GeneratorEntry>,
    inst: Vec<InstrumentEntry>,
    ibag: Vec<BagEntry>,
    igen: Vec<GeneratorEntry>,
    shdr: Vec<SampleHeaderEntry>,
}

/// Table indices are 16-bit in the container.
fn index(value: u32) -> u16 {
    u16::try_from(value).unwrap_or_else(|_| {
        log::warn!("table index {} exceeds 16 bits; clamped", value);
        u16::MAX
    })
}

fn bag(generator_index: u32) -> BagEntry {
    BagEntry {
        generator_index: index(generator_index),
        modulator_index: 0,
    }
}

/// Build all nine tables, terminators included.
pub fn build_preset_data(bank: &Bank) -> PresetDataContents {
    let mut tables = TableSet::default();
    let cursor = bank
        .presets
        .iter()
        .fold(TableCursor::default(), |cursor, preset| {
            visit_preset(&mut tables, cursor, preset)
        });
    close_tables(tables, cursor)
}

fn visit_preset(
    tables: &mut TableSet,
    mut cursor: TableCursor,
    preset: &Preset,
) -> TableCursor {
    tables.phdr.push(PresetHeaderEntry {
        name: preset.name.clone(),
        preset: preset.preset,
        bank: preset.bank,
        bag_index: index(cursor.preset_bag),
        library: 0,
        genre: 0,
        morphology: 0,
    });
    tables.pbag.push(bag(cursor.preset_generator));
    tables.pgen.push(GeneratorEntry {
        operator: generator::INSTRUMENT,
        amount: GeneratorAmount::Value(cursor.instrument as i64),
    });
    cursor.preset_bag += 1;
    cursor.preset_generator += 1;

    for instrument in &preset.instruments {
        tables.inst.push(InstrumentEntry {
            name: instrument.name.clone(),
            bag_index: index(cursor.instrument_bag),
        });

        for zone in &instrument.zones {
            tables.ibag.push(bag(cursor.instrument_generator));
            tables.igen.push(GeneratorEntry {
                operator: generator::SAMPLE_ID,
                amount: GeneratorAmount::Value(cursor.sample as i64),
            });
            tables.igen.push(GeneratorEntry {
                operator: generator::KEY_RANGE,
                amount: GeneratorAmount::List(vec![
                    zone.lower_key as i64,
                    zone.upper_key as i64,
                ]),
            });

            let sample = &zone.sample;
            let start = cursor.sample_offset;
            let end = start + sample.frame_count();
            tables.shdr.push(SampleHeaderEntry {
                name: sample.name.clone(),
                start,
                end,
                loop_start: 0,
                loop_end: 0,
                sample_rate: sample.sample_rate,
                original_pitch: sample.original_pitch,
                pitch_correction: 0,
                sample_link: 0,
                sample_type: MONO_SAMPLE_TYPE,
            });

            // one-point gap between samples
            cursor.sample_offset = end + 1;
            cursor.sample += 1;
            cursor.instrument_bag += 1;
            cursor.instrument_generator += GENERATORS_PER_ZONE;
        }
        cursor.instrument += 1;
    }

    cursor
}

fn close_tables(mut tables: TableSet, cursor: TableCursor) -> PresetDataContents {
    tables.phdr.push(PresetHeaderEntry {
        name: terminator::END_OF_PRESETS.to_string(),
        bag_index: index(cursor.preset_bag),
        ..Default::default()
    });
    tables.pbag.push(bag(cursor.preset_generator));
    tables.pgen.push(GeneratorEntry::terminator());
    tables.inst.push(InstrumentEntry {
        name: terminator::END_OF_INSTRUMENTS.to_string(),
        bag_index: index(cursor.instrument_bag),
    });
    tables.ibag.push(bag(cursor.instrument_generator));
    tables.igen.push(GeneratorEntry::terminator());
    tables.shdr.push(SampleHeaderEntry::terminator());

    PresetDataContents {
        phdr: Some(Table::new(tables.phdr)),
        pbag: Some(Table::new(tables.pbag)),
        pmod: Some(Table::new(vec![ModulatorEntry::default()])),
        pgen: Some(Table::new(tables.pgen)),
        inst: Some(Table::new(tables.inst)),
        ibag: Some(Table::new(tables.ibag)),
        imod: Some(Table::new(vec![ModulatorEntry::default()])),
        igen: Some(Table::new(tables.igen)),
        shdr: Some(Table::new(tables.shdr)),
    }
}
