//! The bank tree: Bank → Preset → Instrument → Zone → Sample.

use serde::{Deserialize, Serialize};

use crate::error::BankError;
use crate::sample::Sample;
use crate::tables::GENERATORS_PER_ZONE;

/// Highest MIDI key number.
pub const MAX_KEY: u8 = 127;

/// Bank-level metadata written to the INFO chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankInfo {
    /// Display name; also names the default preset and instrument.
    pub name: String,
    /// Sound designer / engineer.
    pub author: String,
    /// Product the bank is intended for; also recorded as the creating tool.
    pub product: String,
    /// Copyright notice.
    pub copyright: String,
    /// Free-text comment.
    pub comment: String,
}

impl BankInfo {
    /// Metadata with the product set to the bank name and everything else empty.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            product: name.clone(),
            name,
            ..Default::default()
        }
    }
}

/// Key-range-to-sample binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Key at which the sample plays at its recorded pitch.
    pub root_key: u8,
    /// Lowest key of the range (inclusive).
    pub lower_key: u8,
    /// Highest key of the range (inclusive).
    pub upper_key: u8,
    /// The sample this zone plays.
    pub sample: Sample,
}

impl Zone {
    /// Bind a sample to `[lower_key, upper_key]`, pitching it at `root_key`.
    ///
    /// The sample's original pitch is overridden with the root key.
    pub fn new(mut sample: Sample, root_key: u8, lower_key: u8, upper_key: u8) -> Self {
        sample.original_pitch = root_key;
        Self {
            root_key,
            lower_key,
            upper_key,
            sample,
        }
    }

    /// Bind a sample to exactly one key.
    pub fn single_key(sample: Sample, key: u8) -> Self {
        Self::new(sample, key, key, key)
    }

    /// Key range packed as the generator amount: lower key in the low byte.
    pub fn packed_key_range(&self) -> u16 {
        (self.upper_key as u16) << 8 | self.lower_key as u16
    }
}

/// Named collection of zones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    /// Instrument name (20 bytes in the container).
    pub name: String,
    /// Zones in key order of insertion.
    pub zones: Vec<Zone>,
}

impl Instrument {
    /// Create an empty instrument.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zones: Vec::new(),
        }
    }

    /// Append a zone.
    pub fn push_zone(&mut self, zone: Zone) {
        self.zones.push(zone);
    }
}

/// Selectable patch identified by (preset number, bank number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    /// Preset name (20 bytes in the container).
    pub name: String,
    /// MIDI program number.
    pub preset: u16,
    /// MIDI bank number.
    pub bank: u16,
    /// Instruments; the preset generator selects the first.
    pub instruments: Vec<Instrument>,
}

impl Preset {
    /// Create an empty preset.
    pub fn new(name: impl Into<String>, preset: u16, bank: u16) -> Self {
        Self {
            name: name.into(),
            preset,
            bank,
            instruments: Vec::new(),
        }
    }

    /// Append an instrument.
    pub fn push_instrument(&mut self, instrument: Instrument) {
        self.instruments.push(instrument);
    }
}

/// Top-level sound bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    /// Metadata.
    pub info: BankInfo,
    /// Presets in container order.
    pub presets: Vec<Preset>,
}

/// A chromatic bank plus the samples that did not fit on the keyboard.
#[derive(Debug, Clone)]
pub struct ChromaticBank {
    /// The bank, one single-key zone per placed sample.
    pub bank: Bank,
    /// Samples beyond key 127, in input order.
    pub excluded: Vec<Sample>,
}

impl Bank {
    /// Create a bank with no presets.
    pub fn new(info: BankInfo) -> Self {
        Self {
            info,
            presets: Vec::new(),
        }
    }

    /// Create preset 0 / bank 0 holding one instrument, both named after the bank.
    ///
    /// # Errors
    /// [`BankError::AlreadyInitialized`] if the bank already has presets.
    pub fn create_default_preset_and_instrument(&mut self) -> Result<(), BankError> {
        if !self.presets.is_empty() {
            return Err(BankError::AlreadyInitialized);
        }
        let mut preset = Preset::new(self.info.name.clone(), 0, 0);
        preset.push_instrument(Instrument::new(self.info.name.clone()));
        self.presets.push(preset);
        Ok(())
    }

    /// Append a zone to the first instrument of the first preset.
    ///
    /// # Errors
    /// [`BankError::Uninitialized`] if that instrument does not exist yet.
    pub fn add_zone(&mut self, zone: Zone) -> Result<(), BankError> {
        let instrument = self
            .presets
            .first_mut()
            .and_then(|p| p.instruments.first_mut())
            .ok_or(BankError::Uninitialized)?;
        instrument.push_zone(zone);
        Ok(())
    }

    /// Append a preset.
    pub fn push_preset(&mut self, preset: Preset) {
        self.presets.push(preset);
    }

    /// Lay samples out on consecutive keys starting at `start_key`.
    ///
    /// Each sample gets a single-key zone in the default instrument.
    /// Samples that would land above key 127 are returned as excluded.
    pub fn chromatic(
        info: BankInfo,
        samples: Vec<Sample>,
        start_key: u32,
    ) -> Result<ChromaticBank, BankError> {
        if start_key > MAX_KEY as u32 {
            return Err(BankError::InvalidKey(start_key));
        }
        let capacity = (MAX_KEY as u32 - start_key + 1) as usize;

        let mut bank = Bank::new(info);
        bank.create_default_preset_and_instrument()?;

        let mut samples = samples;
        let excluded = if samples.len() > capacity {
            samples.split_off(capacity)
        } else {
            Vec::new()
        };

        for (offset, sample) in samples.into_iter().enumerate() {
            let key = (start_key as usize + offset) as u8;
            bank.add_zone(Zone::single_key(sample, key))?;
        }

        if !excluded.is_empty() {
            log::warn!(
                "{} sample(s) exceed the keyboard and were not included",
                excluded.len()
            );
        }

        Ok(ChromaticBank { bank, excluded })
    }

    /// Check that every index the record tables need is representable.
    ///
    /// # Errors
    /// - [`BankError::Uninitialized`] if there is no preset or the first
    ///   preset has no instrument.
    /// - [`BankError::EmptyPreset`] if a later preset has no instrument.
    /// - [`BankError::IndexOverflow`] if a bag, generator or sample index
    ///   exceeds 16 bits. The terminators hold the largest values.
    pub fn ensure_encodable(&self) -> Result<(), BankError> {
        let first = self.presets.first().ok_or(BankError::Uninitialized)?;
        if first.instruments.is_empty() {
            return Err(BankError::Uninitialized);
        }
        if let Some((index, preset)) = self
            .presets
            .iter()
            .enumerate()
            .find(|(_, p)| p.instruments.is_empty())
        {
            return Err(BankError::EmptyPreset {
                index,
                name: preset.name.clone(),
            });
        }

        let presets = self.presets.len() as u64;
        let instruments = self.instruments().count() as u64;
        let zones = self.zones().count() as u64;
        let limits = [
            ("phdr", presets),
            ("pbag", presets),
            ("pgen", instruments.saturating_sub(1)),
            ("inst", zones),
            ("ibag", zones * GENERATORS_PER_ZONE as u64),
            ("igen", zones.saturating_sub(1)),
        ];
        match limits
            .into_iter()
            .find(|(_, value)| *value > u16::MAX as u64)
        {
            Some((table, value)) => Err(BankError::IndexOverflow { table, value }),
            None => Ok(()),
        }
    }

    /// All instruments in traversal order.
    pub fn instruments(&self) -> impl Iterator<Item = &Instrument> {
        self.presets.iter().flat_map(|p| p.instruments.iter())
    }

    /// All zones in Preset→Instrument→Zone order.
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.instruments().flat_map(|i| i.zones.iter())
    }

    /// All samples in traversal order.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.zones().map(|z| &z.sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tone(name: &str) -> Sample {
        Sample::from_pcm(name, 8000, &[0, 100, -100, 0])
    }

    #[test]
    fn test_default_preset_and_instrument() {
        let mut bank = Bank::new(BankInfo::new("Words"));
        bank.create_default_preset_and_instrument().unwrap();

        assert_eq!(bank.presets.len(), 1);
        assert_eq!(bank.presets[0].name, "Words");
        assert_eq!((bank.presets[0].preset, bank.presets[0].bank), (0, 0));
        assert_eq!(bank.presets[0].instruments.len(), 1);
        assert_eq!(bank.presets[0].instruments[0].name, "Words");
    }

    #[test]
    fn test_default_creation_only_once() {
        let mut bank = Bank::new(BankInfo::new("Words"));
        bank.create_default_preset_and_instrument().unwrap();
        let err = bank.create_default_preset_and_instrument().unwrap_err();
        assert!(matches!(err, BankError::AlreadyInitialized));
        assert_eq!(bank.presets.len(), 1);
    }

    #[test]
    fn test_add_zone_requires_initialization() {
        let mut bank = Bank::new(BankInfo::new("Words"));
        let err = bank.add_zone(Zone::single_key(tone("a"), 60)).unwrap_err();
        assert!(matches!(err, BankError::Uninitialized));
    }

    #[test]
    fn test_zone_overrides_original_pitch() {
        let zone = Zone::new(tone("a"), 64, 60, 70);
        assert_eq!(zone.sample.original_pitch, 64);
        assert_eq!(zone.packed_key_range(), 0x463C);
    }

    #[test]
    fn test_traversal_order() {
        let mut bank = Bank::new(BankInfo::new("Multi"));
        let mut p0 = Preset::new("p0", 0, 0);
        let mut i0 = Instrument::new("i0");
        i0.push_zone(Zone::single_key(tone("a"), 60));
        i0.push_zone(Zone::single_key(tone("b"), 61));
        p0.push_instrument(i0);
        let mut p1 = Preset::new("p1", 1, 0);
        let mut i1 = Instrument::new("i1");
        i1.push_zone(Zone::single_key(tone("c"), 62));
        p1.push_instrument(i1);
        bank.push_preset(p0);
        bank.push_preset(p1);

        let names: Vec<&str> = bank.samples().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(bank.instruments().count(), 2);
    }

    #[test]
    fn test_chromatic_layout() {
        let samples = vec![tone("a"), tone("b"), tone("c")];
        let built = Bank::chromatic(BankInfo::new("Chroma"), samples, 60).unwrap();

        let keys: Vec<(u8, u8, u8)> = built
            .bank
            .zones()
            .map(|z| (z.root_key, z.lower_key, z.upper_key))
            .collect();
        assert_eq!(keys, vec![(60, 60, 60), (61, 61, 61), (62, 62, 62)]);
        assert!(built.excluded.is_empty());
    }

    #[test]
    fn test_chromatic_excludes_overflow() {
        let samples = vec![tone("a"), tone("b"), tone("c")];
        let built = Bank::chromatic(BankInfo::new("Top"), samples, 126).unwrap();

        assert_eq!(built.bank.zones().count(), 2);
        assert_eq!(built.excluded.len(), 1);
        assert_eq!(built.excluded[0].name, "c");
    }

    #[test]
    fn test_encodable_requires_instrument_in_every_preset() {
        assert!(matches!(
            Bank::new(BankInfo::new("x")).ensure_encodable(),
            Err(BankError::Uninitialized)
        ));

        let mut bank = Bank::new(BankInfo::new("Gap"));
        bank.create_default_preset_and_instrument().unwrap();
        bank.add_zone(Zone::single_key(tone("a"), 60)).unwrap();
        assert!(bank.ensure_encodable().is_ok());

        bank.push_preset(Preset::new("hollow", 1, 0));
        let err = bank.ensure_encodable().unwrap_err();
        match err {
            BankError::EmptyPreset { index, name } => {
                assert_eq!(index, 1);
                assert_eq!(name, "hollow");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_encodable_rejects_generator_index_overflow() {
        let mut bank = Bank::new(BankInfo::new("Huge"));
        bank.create_default_preset_and_instrument().unwrap();
        let sample = Sample::from_pcm("w", 8000, &[0]);
        for _ in 0..32767 {
            bank.add_zone(Zone::single_key(sample.clone(), 60)).unwrap();
        }
        // 32767 zones end the ibag table at generator 65534
        assert!(bank.ensure_encodable().is_ok());

        bank.add_zone(Zone::single_key(sample, 60)).unwrap();
        let err = bank.ensure_encodable().unwrap_err();
        assert!(matches!(
            err,
            BankError::IndexOverflow {
                table: "ibag",
                value: 65536
            }
        ));
    }

    #[test]
    fn test_chromatic_rejects_start_above_range() {
        let err = Bank::chromatic(BankInfo::new("x"), vec![tone("a")], 128).unwrap_err();
        assert!(matches!(err, BankError::InvalidKey(128)));
    }
}
