//! pdta list packing: the nine record tables.

use std::io;

use wordfont_bank::ir::{generator, GeneratorAmount, GeneratorEntry, PresetDataContents, Table};

use crate::chunk::write_chunk;
use crate::diagnostic::{DiagnosticCode, Diagnostics};
use crate::records::{
    record_size, write_bag, write_generator, write_instrument, write_modulator,
    write_preset_header, write_sample_header,
};

/// Pack the nine tables (without the LIST header) in container order.
///
/// A table absent from the IR is skipped with a diagnostic.
pub fn pack_preset_data(
    contents: &PresetDataContents,
    diagnostics: &mut Diagnostics,
) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();

    pack_table(&mut out, "phdr", contents.phdr.as_ref(), diagnostics, |w, _, e, _| {
        write_preset_header(w, e)
    })?;
    pack_table(&mut out, "pbag", contents.pbag.as_ref(), diagnostics, |w, _, e, _| {
        write_bag(w, e)
    })?;
    pack_table(&mut out, "pmod", contents.pmod.as_ref(), diagnostics, |w, _, e, _| {
        write_modulator(w, e)
    })?;
    pack_table(&mut out, "pgen", contents.pgen.as_ref(), diagnostics, |w, i, e, d| {
        write_generator(w, e.operator, resolve_amount(e, &format!("pdta.pgen[{}]", i), d))
    })?;
    pack_table(&mut out, "inst", contents.inst.as_ref(), diagnostics, |w, _, e, _| {
        write_instrument(w, e)
    })?;
    pack_table(&mut out, "ibag", contents.ibag.as_ref(), diagnostics, |w, _, e, _| {
        write_bag(w, e)
    })?;
    pack_table(&mut out, "imod", contents.imod.as_ref(), diagnostics, |w, _, e, _| {
        write_modulator(w, e)
    })?;
    pack_table(&mut out, "igen", contents.igen.as_ref(), diagnostics, |w, i, e, d| {
        write_generator(w, e.operator, resolve_amount(e, &format!("pdta.igen[{}]", i), d))
    })?;
    pack_table(&mut out, "shdr", contents.shdr.as_ref(), diagnostics, |w, _, e, _| {
        write_sample_header(w, e)
    })?;

    Ok(out)
}

fn pack_table<T, F>(
    out: &mut Vec<u8>,
    tag: &str,
    table: Option<&Table<T>>,
    diagnostics: &mut Diagnostics,
    mut write: F,
) -> io::Result<()>
where
    F: FnMut(&mut Vec<u8>, usize, &T, &mut Diagnostics) -> io::Result<()>,
{
    let Some(table) = table else {
        diagnostics.warn(
            DiagnosticCode::MissingTable,
            format!("'{}' not present, skipped", tag),
            format!("pdta.{}", tag),
        );
        return Ok(());
    };

    let width = record_size(tag).unwrap_or(0);
    let mut payload = Vec::with_capacity(width * table.entries.len());
    for (index, entry) in table.entries.iter().enumerate() {
        write(&mut payload, index, entry, diagnostics)?;
    }

    log::debug!("{}: {} records", tag, table.entries.len());
    write_chunk(out, tag, &payload)
}

/// Resolve a generator amount to its 16-bit wire value.
///
/// Key ranges must be a `[lower, upper]` pair of bytes and pack as
/// `lower | upper << 8`. Every other operator takes a scalar that fits in
/// 16 bits (negative values are written as two's complement). Anything
/// else is written as 0 with a diagnostic.
pub fn resolve_amount(entry: &GeneratorEntry, path: &str, diagnostics: &mut Diagnostics) -> u16 {
    let resolved = match (&entry.amount, entry.operator) {
        (GeneratorAmount::List(pair), generator::KEY_RANGE) => match pair.as_slice() {
            [lower, upper] => match (u8::try_from(*lower), u8::try_from(*upper)) {
                (Ok(lower), Ok(upper)) => Some(u16::from(lower) | (u16::from(upper) << 8)),
                _ => None,
            },
            _ => None,
        },
        (GeneratorAmount::Value(value), operator) if operator != generator::KEY_RANGE => {
            if let Ok(unsigned) = u16::try_from(*value) {
                Some(unsigned)
            } else {
                i16::try_from(*value).ok().map(|signed| signed as u16)
            }
        }
        _ => None,
    };

    resolved.unwrap_or_else(|| {
        diagnostics.warn(
            DiagnosticCode::MalformedAmount,
            format!(
                "amount {} invalid for operator {}, using 0",
                describe(&entry.amount),
                entry.operator
            ),
            path,
        );
        0
    })
}

fn describe(amount: &GeneratorAmount) -> String {
    match amount {
        GeneratorAmount::Value(value) => value.to_string(),
        GeneratorAmount::List(values) => format!("{:?}", values),
        GeneratorAmount::Other(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wordfont_bank::ir::{BagEntry, ModulatorEntry};

    fn entry(operator: u16, amount: GeneratorAmount) -> GeneratorEntry {
        GeneratorEntry { operator, amount }
    }

    fn resolve(operator: u16, amount: GeneratorAmount) -> (u16, usize) {
        let mut diagnostics = Diagnostics::default();
        let value = resolve_amount(&entry(operator, amount), "test", &mut diagnostics);
        (value, diagnostics.into_vec().len())
    }

    #[test]
    fn test_key_range_packing() {
        assert_eq!(
            resolve(generator::KEY_RANGE, GeneratorAmount::List(vec![60, 72])),
            (60 | (72 << 8), 0)
        );
        assert_eq!(
            resolve(generator::KEY_RANGE, GeneratorAmount::List(vec![0, 127])),
            (0x7F00, 0)
        );
    }

    #[test]
    fn test_malformed_key_range_falls_back_to_zero() {
        assert_eq!(
            resolve(generator::KEY_RANGE, GeneratorAmount::List(vec![60])),
            (0, 1)
        );
        assert_eq!(
            resolve(generator::KEY_RANGE, GeneratorAmount::List(vec![60, 300])),
            (0, 1)
        );
        assert_eq!(
            resolve(generator::KEY_RANGE, GeneratorAmount::Value(60)),
            (0, 1)
        );
        assert_eq!(
            resolve(
                generator::KEY_RANGE,
                GeneratorAmount::Other(serde_json::json!("wide"))
            ),
            (0, 1)
        );
    }

    #[test]
    fn test_scalar_amounts() {
        assert_eq!(resolve(generator::SAMPLE_ID, GeneratorAmount::Value(7)), (7, 0));
        assert_eq!(resolve(0, GeneratorAmount::Value(-1)), (0xFFFF, 0));
        assert_eq!(resolve(0, GeneratorAmount::Value(70000)), (0, 1));
        assert_eq!(
            resolve(generator::INSTRUMENT, GeneratorAmount::List(vec![1, 2])),
            (0, 1)
        );
    }

    #[test]
    fn test_missing_tables_skipped() {
        let contents = PresetDataContents {
            pmod: Some(Table::new(vec![ModulatorEntry::default()])),
            ibag: Some(Table::new(vec![BagEntry::default()])),
            ..Default::default()
        };

        let mut diagnostics = Diagnostics::default();
        let out = pack_preset_data(&contents, &mut diagnostics).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"pmod\x0a\x00\x00\x00");
        expected.extend_from_slice(&[0u8; 10]);
        expected.extend_from_slice(b"ibag\x04\x00\x00\x00");
        expected.extend_from_slice(&[0u8; 4]);
        assert_eq!(out, expected);

        let missing: Vec<String> = diagnostics
            .into_vec()
            .into_iter()
            .filter_map(|d| d.path)
            .collect();
        assert_eq!(
            missing,
            vec![
                "pdta.phdr",
                "pdta.pbag",
                "pdta.pgen",
                "pdta.inst",
                "pdta.imod",
                "pdta.igen",
                "pdta.shdr"
            ]
        );
    }

    #[test]
    fn test_generator_table_reports_index() {
        let contents = PresetDataContents {
            igen: Some(Table::new(vec![
                entry(generator::SAMPLE_ID, GeneratorAmount::Value(0)),
                entry(generator::KEY_RANGE, GeneratorAmount::List(vec![1, 2, 3])),
            ])),
            ..Default::default()
        };

        let mut diagnostics = Diagnostics::default();
        pack_preset_data(&contents, &mut diagnostics).unwrap();
        let malformed: Vec<_> = diagnostics
            .into_vec()
            .into_iter()
            .filter(|d| d.code == DiagnosticCode::MalformedAmount)
            .collect();
        assert_eq!(malformed.len(), 1);
        assert_eq!(malformed[0].path.as_deref(), Some("pdta.igen[1]"));
    }
}
