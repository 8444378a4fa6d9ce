//! Build command implementation
//!
//! Turns a directory of mono WAV files (or a word-slice manifest) into a
//! bank, writes its IR JSON next to the samples and encodes the SF2.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;

use wordfont_bank::{
    discover_wav_files, load_sample, Bank, BankInfo, ChromaticBank, SampleOrder, WordSlice,
};

use super::reporting;

/// Default author written to IENG.
pub const DEFAULT_AUTHOR: &str = "WordPlay";
/// Default copyright written to ICOP.
pub const DEFAULT_COPYRIGHT: &str = "2024 WordPlay";
/// Default comment written to ICMT.
pub const DEFAULT_COMMENT: &str = "Created by WordPlay";
/// Key of the first sample.
pub const DEFAULT_START_NOTE: u32 = 60;

/// Arguments of the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    /// Directory holding the samples; also receives the IR JSON
    pub samples_dir: PathBuf,
    /// Bank name (default: directory name)
    pub name: Option<String>,
    pub author: Option<String>,
    pub copyright: Option<String>,
    pub comments: Option<String>,
    /// Key of the first sample
    pub start_note: u32,
    /// Keyboard order of discovered samples
    pub order: SampleOrder,
    /// Word-slice manifest used instead of directory discovery
    pub slices: Option<PathBuf>,
    /// JSON file with bank metadata; flags take precedence
    pub info: Option<PathBuf>,
    /// SF2 output path (default: `<samples_dir>/<name>.sf2`)
    pub output: Option<PathBuf>,
    /// Run the opt-in bank checks and print their warnings
    pub validate: bool,
    /// Stop after writing the IR JSON
    pub json_only: bool,
}

/// Files written by a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub json_path: PathBuf,
    pub sf2_path: Option<PathBuf>,
}

/// Run the build command
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(args: &BuildArgs) -> Result<ExitCode> {
    println!(
        "{} {}",
        "Building:".cyan().bold(),
        args.samples_dir.display()
    );

    let output = build(args)?;

    println!("{} {}", "IR:".dimmed(), output.json_path.display());
    match &output.sf2_path {
        Some(path) => println!(
            "\n{} Wrote {}",
            "SUCCESS".green().bold(),
            path.display()
        ),
        None => println!("\n{} Wrote IR only", "SUCCESS".green().bold()),
    }

    Ok(ExitCode::SUCCESS)
}

/// Build, write and (unless `json_only`) encode the bank.
pub fn build(args: &BuildArgs) -> Result<BuildOutput> {
    if !args.samples_dir.is_dir() {
        bail!("Not a directory: {}", args.samples_dir.display());
    }

    let info = resolve_info(args)?;
    let ChromaticBank { bank, excluded } = assemble_bank(args, info)?;

    println!(
        "{} {} sample(s) from key {}",
        "Placed:".dimmed(),
        bank.samples().count(),
        args.start_note
    );
    for sample in &excluded {
        println!(
            "  {} '{}' does not fit on the keyboard; excluded",
            "!".yellow(),
            sample.name
        );
    }

    if args.validate {
        reporting::print_validation(&bank.validate());
    }

    let document = bank.to_intermediate_representation();
    let json_path = args
        .samples_dir
        .join(format!("{}.sf2.json", bank.info.name));
    let json = serde_json::to_string_pretty(&document).context("Failed to serialize IR")?;
    fs::write(&json_path, json)
        .with_context(|| format!("Failed to write IR: {}", json_path.display()))?;
    log::info!("wrote IR to {}", json_path.display());

    if args.json_only {
        return Ok(BuildOutput {
            json_path,
            sf2_path: None,
        });
    }

    let result = wordfont_sf2::encode_bank(&bank).context("Failed to encode bank")?;
    reporting::print_diagnostics(&result.diagnostics);

    let sf2_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.samples_dir.join(format!("{}.sf2", bank.info.name)));
    fs::write(&sf2_path, &result.data)
        .with_context(|| format!("Failed to write SF2: {}", sf2_path.display()))?;
    println!(
        "{} {} bytes, blake3 {}",
        "Encoded:".dimmed(),
        result.data.len(),
        &result.hash[..16]
    );

    Ok(BuildOutput {
        json_path,
        sf2_path: Some(sf2_path),
    })
}

/// Metadata precedence: explicit flag, then `--info` file, then default.
fn resolve_info(args: &BuildArgs) -> Result<BankInfo> {
    let mut info = match &args.info {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read info file: {}", path.display()))?;
            serde_json::from_str::<BankInfo>(&text)
                .with_context(|| format!("Failed to parse info file: {}", path.display()))?
        }
        None => BankInfo::default(),
    };

    pick(&mut info.name, &args.name, &dir_name(&args.samples_dir));
    pick(&mut info.author, &args.author, DEFAULT_AUTHOR);
    pick(&mut info.copyright, &args.copyright, DEFAULT_COPYRIGHT);
    pick(&mut info.comment, &args.comments, DEFAULT_COMMENT);
    if info.product.is_empty() {
        info.product = info.name.clone();
    }
    check_file_stem(&info.name)?;

    Ok(info)
}

/// The bank name names the output files, so it must stay a single plain
/// file name inside the samples directory.
fn check_file_stem(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let plain = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
        && !name.contains(['/', '\\']);
    if !plain {
        bail!(
            "Bank name '{}' cannot be used as a file name; pass --name without path separators",
            name
        );
    }
    Ok(())
}

fn pick(field: &mut String, flag: &Option<String>, default: &str) {
    if let Some(value) = flag {
        *field = value.clone();
    } else if field.is_empty() {
        *field = default.to_string();
    }
}

fn dir_name(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(dir)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bank".to_string())
}

fn assemble_bank(args: &BuildArgs, info: BankInfo) -> Result<ChromaticBank> {
    if let Some(manifest) = &args.slices {
        let text = fs::read_to_string(manifest)
            .with_context(|| format!("Failed to read slices: {}", manifest.display()))?;
        let slices: Vec<WordSlice> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse slices: {}", manifest.display()))?;
        return Bank::from_word_slices(info, &slices, args.start_note)
            .context("Failed to build bank from word slices");
    }

    let files = discover_wav_files(&args.samples_dir, args.order)?;
    let samples = files
        .iter()
        .map(|path| load_sample(path))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to load samples")?;
    Ok(Bank::chromatic(info, samples, args.start_note)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_word(path: &Path, frames: usize) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            writer.write_sample(i as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn args_for(dir: &Path) -> BuildArgs {
        BuildArgs {
            samples_dir: dir.to_path_buf(),
            name: Some("Words".into()),
            start_note: DEFAULT_START_NOTE,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_writes_json_and_sf2() {
        let dir = tempfile::tempdir().unwrap();
        write_word(&dir.path().join("hello.wav"), 100);
        write_word(&dir.path().join("world.wav"), 50);

        let output = build(&args_for(dir.path())).unwrap();
        assert_eq!(output.json_path, dir.path().join("Words.sf2.json"));
        assert_eq!(output.sf2_path, Some(dir.path().join("Words.sf2")));

        let data = fs::read(dir.path().join("Words.sf2")).unwrap();
        let report = wordfont_sf2::inspect(&data).unwrap();
        assert_eq!(report.samples.len(), 3);
        assert_eq!(report.info_value("IENG"), Some(DEFAULT_AUTHOR));

        // the JSON on disk encodes to the same bytes
        let json = fs::read_to_string(&output.json_path).unwrap();
        assert_eq!(wordfont_sf2::encode_json(&json).unwrap().data, data);
    }

    #[test]
    fn test_json_only() {
        let dir = tempfile::tempdir().unwrap();
        write_word(&dir.path().join("a.wav"), 10);

        let output = build(&BuildArgs {
            json_only: true,
            ..args_for(dir.path())
        })
        .unwrap();
        assert_eq!(output.sf2_path, None);
        assert!(output.json_path.exists());
        assert!(!dir.path().join("Words.sf2").exists());
    }

    #[test]
    fn test_metadata_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let info_path = dir.path().join("info.json");
        fs::write(&info_path, r#"{"author": "Ada", "comment": "from file"}"#).unwrap();

        let info = resolve_info(&BuildArgs {
            info: Some(info_path),
            comments: Some("from flag".into()),
            ..args_for(dir.path())
        })
        .unwrap();

        assert_eq!(info.name, "Words");
        assert_eq!(info.author, "Ada");
        assert_eq!(info.copyright, DEFAULT_COPYRIGHT);
        assert_eq!(info.comment, "from flag");
        assert_eq!(info.product, "Words");
    }

    #[test]
    fn test_name_with_path_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let samples = dir.path().join("words");
        fs::create_dir(&samples).unwrap();
        write_word(&samples.join("a.wav"), 10);

        for name in ["../escape", "sub/Words", "..", "a\\b"] {
            let err = build(&BuildArgs {
                name: Some(name.into()),
                ..args_for(&samples)
            })
            .unwrap_err();
            assert!(format!("{:#}", err).contains("cannot be used as a file name"));
        }
        assert!(!dir.path().join("escape.sf2.json").exists());
        assert!(!samples.join("sub").exists());

        assert!(check_file_stem("My Voice.v2").is_ok());
    }

    #[test]
    fn test_name_defaults_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let samples = dir.path().join("MyVoice");
        fs::create_dir(&samples).unwrap();

        let info = resolve_info(&BuildArgs {
            samples_dir: samples,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(info.name, "MyVoice");
    }

    #[test]
    fn test_build_from_slices() {
        let dir = tempfile::tempdir().unwrap();
        let late = dir.path().join("late.wav");
        let early = dir.path().join("early.wav");
        write_word(&late, 5);
        write_word(&early, 5);

        let manifest = dir.path().join("slices.json");
        let slices = serde_json::json!([
            {"word": "late", "start": 2.0, "end": 2.5, "file_path": late},
            {"word": "early", "start": 0.0, "end": 0.5, "file_path": early}
        ]);
        fs::write(&manifest, slices.to_string()).unwrap();

        let output = build(&BuildArgs {
            slices: Some(manifest),
            ..args_for(dir.path())
        })
        .unwrap();

        let data = fs::read(output.sf2_path.unwrap()).unwrap();
        let report = wordfont_sf2::inspect(&data).unwrap();
        let names: Vec<&str> = report.samples.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["early", "late", "EOS"]);
    }

    #[test]
    fn test_stereo_sample_fails_build() {
        let dir = tempfile::tempdir().unwrap();
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(dir.path().join("st.wav"), spec).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();

        let err = build(&args_for(dir.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("channels"));
        assert!(!dir.path().join("Words.sf2.json").exists());
    }
}
