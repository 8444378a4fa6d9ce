//! Opt-in structural checks for a bank.
//!
//! Encoding never runs these: duplicate preset numbers, root keys outside
//! their zone, and name collisions are all encodable. Callers that want
//! to catch them ask for a [`ValidationReport`].

use std::collections::HashSet;

use crate::bank::{Bank, MAX_KEY};
use crate::error::{ValidationReport, ValidationWarning, WarningCode};

/// Width of the name field in preset, instrument and sample records.
pub const NAME_FIELD_LEN: usize = 20;

impl Bank {
    /// Check the bank without changing it.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        validate_presets(self, &mut report);
        validate_instruments(self, &mut report);
        validate_zones(self, &mut report);

        report
    }
}

fn check_name(report: &mut ValidationReport, kind: &str, name: &str, path: &str) {
    if name.len() > NAME_FIELD_LEN {
        report.add_warning(ValidationWarning::with_path(
            WarningCode::NameTruncated,
            format!(
                "{} name '{}' is {} bytes and will be cut to {}",
                kind,
                name,
                name.len(),
                NAME_FIELD_LEN
            ),
            path,
        ));
    }
}

fn validate_presets(bank: &Bank, report: &mut ValidationReport) {
    let mut numbers = HashSet::new();
    let mut names = HashSet::new();

    for (i, preset) in bank.presets.iter().enumerate() {
        let path = format!("presets[{}]", i);

        if !numbers.insert((preset.preset, preset.bank)) {
            report.add_warning(ValidationWarning::with_path(
                WarningCode::DuplicatePresetNumber,
                format!(
                    "preset {} / bank {} is used more than once",
                    preset.preset, preset.bank
                ),
                &path,
            ));
        }
        if !names.insert(preset.name.as_str()) {
            report.add_warning(ValidationWarning::with_path(
                WarningCode::DuplicatePresetName,
                format!("preset name '{}' is used more than once", preset.name),
                &path,
            ));
        }
        if preset.instruments.len() != 1 {
            report.add_warning(ValidationWarning::with_path(
                WarningCode::PresetInstrumentCount,
                format!(
                    "preset '{}' has {} instruments; only the first is selectable",
                    preset.name,
                    preset.instruments.len()
                ),
                &path,
            ));
        }
        check_name(report, "preset", &preset.name, &path);
    }
}

fn validate_instruments(bank: &Bank, report: &mut ValidationReport) {
    let mut names = HashSet::new();

    for (p, preset) in bank.presets.iter().enumerate() {
        for (i, instrument) in preset.instruments.iter().enumerate() {
            let path = format!("presets[{}].instruments[{}]", p, i);
            if !names.insert(instrument.name.as_str()) {
                report.add_warning(ValidationWarning::with_path(
                    WarningCode::DuplicateInstrumentName,
                    format!("instrument name '{}' is used more than once", instrument.name),
                    &path,
                ));
            }
            check_name(report, "instrument", &instrument.name, &path);
        }
    }
}

fn validate_zones(bank: &Bank, report: &mut ValidationReport) {
    for (p, preset) in bank.presets.iter().enumerate() {
        for (i, instrument) in preset.instruments.iter().enumerate() {
            for (z, zone) in instrument.zones.iter().enumerate() {
                let path = format!("presets[{}].instruments[{}].zones[{}]", p, i, z);

                if zone.lower_key > zone.upper_key
                    || zone.upper_key > MAX_KEY
                    || zone.root_key > MAX_KEY
                {
                    report.add_warning(ValidationWarning::with_path(
                        WarningCode::InvalidKeyRange,
                        format!(
                            "key range {}-{} (root {}) is not a valid MIDI range",
                            zone.lower_key, zone.upper_key, zone.root_key
                        ),
                        &path,
                    ));
                } else if zone.root_key < zone.lower_key || zone.root_key > zone.upper_key {
                    report.add_warning(ValidationWarning::with_path(
                        WarningCode::RootKeyOutOfRange,
                        format!(
                            "root key {} outside {}-{}",
                            zone.root_key, zone.lower_key, zone.upper_key
                        ),
                        &path,
                    ));
                }

                let sample = &zone.sample;
                if sample.sample_rate == 0 || sample.frame_count() == 0 {
                    report.add_warning(ValidationWarning::with_path(
                        WarningCode::EmptySample,
                        format!(
                            "sample '{}' has {} frames at {} Hz",
                            sample.name,
                            sample.frame_count(),
                            sample.sample_rate
                        ),
                        &path,
                    ));
                }
                check_name(report, "sample", &sample.name, &path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::{BankInfo, Instrument, Preset, Zone};
    use crate::sample::Sample;
    use pretty_assertions::assert_eq;

    fn tone(name: &str) -> Sample {
        Sample::from_pcm(name, 8000, &[0, 1, 2, 3])
    }

    fn preset_with(name: &str, number: u16, instrument: &str, zones: Vec<Zone>) -> Preset {
        let mut preset = Preset::new(name, number, 0);
        let mut inst = Instrument::new(instrument);
        for zone in zones {
            inst.push_zone(zone);
        }
        preset.push_instrument(inst);
        preset
    }

    #[test]
    fn test_clean_chromatic_bank() {
        let built =
            Bank::chromatic(BankInfo::new("Clean"), vec![tone("a"), tone("b")], 60).unwrap();
        let report = built.bank.validate();
        assert!(report.is_clean(), "warnings: {:?}", report.warnings);
    }

    #[test]
    fn test_duplicate_preset_numbers_and_names() {
        let mut bank = Bank::new(BankInfo::new("Dupes"));
        bank.push_preset(preset_with("same", 3, "i0", vec![]));
        bank.push_preset(preset_with("same", 3, "i1", vec![]));

        let report = bank.validate();
        assert!(report.has(WarningCode::DuplicatePresetNumber));
        assert!(report.has(WarningCode::DuplicatePresetName));
        assert!(!report.has(WarningCode::DuplicateInstrumentName));
    }

    #[test]
    fn test_root_key_outside_range() {
        let mut bank = Bank::new(BankInfo::new("Root"));
        bank.push_preset(preset_with(
            "p",
            0,
            "i",
            vec![Zone::new(tone("a"), 70, 60, 62)],
        ));

        let report = bank.validate();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, WarningCode::RootKeyOutOfRange);
        assert_eq!(
            report.warnings[0].path.as_deref(),
            Some("presets[0].instruments[0].zones[0]")
        );
    }

    #[test]
    fn test_inverted_and_out_of_midi_range() {
        let mut bank = Bank::new(BankInfo::new("Keys"));
        bank.push_preset(preset_with(
            "p",
            0,
            "i",
            vec![
                Zone::new(tone("a"), 60, 64, 60),
                Zone::single_key(tone("b"), 200),
            ],
        ));

        let report = bank.validate();
        let codes: Vec<WarningCode> = report.warnings.iter().map(|w| w.code).collect();
        assert_eq!(
            codes,
            vec![WarningCode::InvalidKeyRange, WarningCode::InvalidKeyRange]
        );
    }

    #[test]
    fn test_instrument_count_and_names() {
        let mut bank = Bank::new(BankInfo::new("Counts"));
        let mut preset = Preset::new("a-very-long-preset-name-indeed", 0, 0);
        preset.push_instrument(Instrument::new("x"));
        preset.push_instrument(Instrument::new("x"));
        bank.push_preset(preset);

        let report = bank.validate();
        assert!(report.has(WarningCode::PresetInstrumentCount));
        assert!(report.has(WarningCode::DuplicateInstrumentName));
        assert!(report.has(WarningCode::NameTruncated));
    }

    #[test]
    fn test_empty_sample() {
        let mut bank = Bank::new(BankInfo::new("Empty"));
        bank.push_preset(preset_with(
            "p",
            0,
            "i",
            vec![Zone::single_key(Sample::from_pcm("silent", 8000, &[]), 60)],
        ));

        assert!(bank.validate().has(WarningCode::EmptySample));
    }
}
