//! Integration tests for building banks from sample files on disk.

use std::path::Path;

use pretty_assertions::assert_eq;
use wordfont_bank::ir::ListBody;
use wordfont_bank::{
    discover_wav_files, load_sample, Bank, BankError, BankInfo, SampleOrder, WarningCode,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn write_wav(path: &Path, channels: u16, frames: &[i16]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &frame in frames {
        for _ in 0..channels {
            writer.write_sample(frame).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn bank_from_dir(dir: &Path, start_key: u32) -> Result<wordfont_bank::ChromaticBank, BankError> {
    let samples = discover_wav_files(dir, SampleOrder::Name)?
        .iter()
        .map(|path| load_sample(path))
        .collect::<Result<Vec<_>, _>>()?;
    Bank::chromatic(BankInfo::new("Dir"), samples, start_key)
}

// =============================================================================
// Directory to Bank
// =============================================================================

#[test]
fn test_directory_becomes_chromatic_bank() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(&dir.path().join("02_world.wav"), 1, &[3, 4, 5]);
    write_wav(&dir.path().join("01_hello.wav"), 1, &[1, 2]);

    let built = bank_from_dir(dir.path(), 60).unwrap();
    assert!(built.excluded.is_empty());

    let zones: Vec<(String, u8, u8, u8, u32)> = built
        .bank
        .zones()
        .map(|z| {
            (
                z.sample.name.clone(),
                z.root_key,
                z.lower_key,
                z.upper_key,
                z.sample.frame_count(),
            )
        })
        .collect();
    assert_eq!(
        zones,
        vec![
            ("01_hello".to_string(), 60, 60, 60, 2),
            ("02_world".to_string(), 61, 61, 61, 3),
        ]
    );
    assert!(built.bank.validate().is_clean());
}

#[test]
fn test_stereo_file_rejects_the_whole_bank() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(&dir.path().join("a.wav"), 1, &[1]);
    write_wav(&dir.path().join("b.wav"), 2, &[1]);

    let err = bank_from_dir(dir.path(), 60).unwrap_err();
    match err {
        BankError::UnsupportedSample { path, .. } => {
            assert_eq!(path.file_name().unwrap(), "b.wav");
        }
        other => panic!("expected UnsupportedSample, got {:?}", other),
    }
}

#[test]
fn test_overflowing_samples_are_excluded() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..4 {
        write_wav(&dir.path().join(format!("w{}.wav", i)), 1, &[i]);
    }

    let built = bank_from_dir(dir.path(), 126).unwrap();
    let keys: Vec<u8> = built.bank.zones().map(|z| z.root_key).collect();
    assert_eq!(keys, vec![126, 127]);
    let excluded: Vec<&str> = built.excluded.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(excluded, vec!["w2", "w3"]);
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        bank_from_dir(dir.path(), 60),
        Err(BankError::NoSamples(_))
    ));
}

// =============================================================================
// Intermediate Representation
// =============================================================================

#[test]
fn test_ir_sample_data_follows_traversal_order() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(&dir.path().join("a.wav"), 1, &[1, -1]);
    write_wav(&dir.path().join("b.wav"), 1, &[256]);

    let built = bank_from_dir(dir.path(), 60).unwrap();
    let document = built.bank.to_intermediate_representation();

    match &document.contents[1].body {
        ListBody::SampleData { contents } => {
            assert_eq!(contents.smpl.as_ref().unwrap().data, "0100ffff0001");
        }
        other => panic!("expected sdta, got {:?}", other),
    }
    match &document.contents[2].body {
        ListBody::PresetData { contents } => {
            let shdr = &contents.shdr.as_ref().unwrap().entries;
            assert_eq!((shdr[0].start, shdr[0].end), (0, 2));
            assert_eq!((shdr[1].start, shdr[1].end), (3, 4));
            assert_eq!(shdr[2].name, "EOS");
        }
        other => panic!("expected pdta, got {:?}", other),
    }
}

#[test]
fn test_ir_is_stable_between_calls() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(&dir.path().join("a.wav"), 1, &[9, 8, 7]);
    let built = bank_from_dir(dir.path(), 60).unwrap();

    let first = serde_json::to_string(&built.bank.to_intermediate_representation()).unwrap();
    let second = serde_json::to_string(&built.bank.to_intermediate_representation()).unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validation_is_opt_in() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(&dir.path().join("a_very_long_word_for_a_sample.wav"), 1, &[1]);
    let built = bank_from_dir(dir.path(), 60).unwrap();

    // building succeeds; the problem only shows up when asked for
    let report = built.bank.validate();
    assert!(report.has(WarningCode::NameTruncated));
    assert_eq!(built.bank.to_intermediate_representation().contents.len(), 3);
}
