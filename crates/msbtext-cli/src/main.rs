//! Command-line front end: decodes MSB script files to annotated text and
//! extracts MPK archives. All of the algorithmic work lives in the
//! `msbtext` library; this binary is argument handling and file I/O.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use msbtext::{
    CharacterWidth, FontTable, FontVariant, MpkArchive, MsbDocument, PlayerName, ResourceError,
    ScriptDecoder,
};

#[derive(Parser)]
#[command(name = "msbtext", version, about = "MSB dialogue-script decoder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode an MSB script file into annotated text.
    Decode {
        /// The MSB file to decode.
        file: PathBuf,
        /// Character width of the game release the script comes from.
        #[arg(long, value_enum, default_value = "16")]
        width: Width,
        /// Font catalog path; defaults to the two-location search for the
        /// width's variant.
        #[arg(long)]
        font: Option<PathBuf>,
        /// Player-name resource path; defaults to the two-location search,
        /// falling back to a placeholder when absent.
        #[arg(long)]
        names: Option<PathBuf>,
        /// Output path; defaults to the source path with a `.txt` extension.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Extract every entry of an MPK archive.
    Extract {
        /// The MPK archive to extract.
        file: PathBuf,
        /// Output directory; defaults to the archive name without extension.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Character width as a command-line value.
#[derive(Clone, Copy, ValueEnum)]
enum Width {
    /// 2-byte character units (classic releases).
    #[value(name = "16")]
    Sixteen,
    /// 4-byte character units (later releases).
    #[value(name = "32")]
    ThirtyTwo,
}

impl Width {
    fn character_width(self) -> CharacterWidth {
        match self {
            Width::Sixteen => CharacterWidth::Sixteen,
            Width::ThirtyTwo => CharacterWidth::ThirtyTwo,
        }
    }

    fn font_variant(self) -> FontVariant {
        match self {
            Width::Sixteen => FontVariant::Classic,
            Width::ThirtyTwo => FontVariant::Extended,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Decode {
            file,
            width,
            font,
            names,
            output,
        } => decode(&file, width, font.as_deref(), names.as_deref(), output),
        Command::Extract { file, output } => extract(&file, output),
    }
}

fn decode(
    file: &Path,
    width: Width,
    font: Option<&Path>,
    names: Option<&Path>,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let font = match font {
        Some(path) => FontTable::load(path),
        None => FontTable::locate(width.font_variant()),
    }
    .context("loading font table")?;
    let name = load_player_name(names)?;

    let data = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let document = MsbDocument::parse(&data)
        .with_context(|| format!("parsing {}", file.display()))?;
    log::info!(
        "{}: MSB {}.{}, {} entries",
        file.display(),
        document.version().0,
        document.version().1,
        document.entries().len()
    );

    let decoder = ScriptDecoder::new(width.character_width(), &font, &name);
    let mut segments = Vec::new();
    let mut failures = 0usize;
    for (entry, result) in document.decode_all(&decoder) {
        match result {
            Ok(segment) => {
                for warning in &segment.warnings {
                    log::warn!("entry {}: {warning}", entry.index);
                }
                segments.push(segment.text);
            }
            Err(err) => {
                log::error!("entry {}: {err}", entry.index);
                failures += 1;
            }
        }
    }

    let output = output.unwrap_or_else(|| file.with_extension("txt"));
    fs::write(&output, segments.join("\n\n"))
        .with_context(|| format!("writing {}", output.display()))?;
    log::info!(
        "wrote {} segment(s) to {}",
        segments.len(),
        output.display()
    );

    if failures > 0 {
        log::error!("{failures} segment(s) failed to decode");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn load_player_name(names: Option<&Path>) -> Result<PlayerName> {
    match names {
        Some(path) => PlayerName::load(path).context("loading player name"),
        // Absence is not fatal when the caller did not name a file; a
        // malformed resource still is.
        None => match PlayerName::locate() {
            Ok(name) => Ok(name),
            Err(ResourceError::NotFound { .. }) => {
                log::warn!("player-name resource not found; using placeholder");
                Ok(PlayerName::placeholder())
            }
            Err(err) => Err(err).context("loading player name"),
        },
    }
}

fn extract(file: &Path, output: Option<PathBuf>) -> Result<ExitCode> {
    let data = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let archive = MpkArchive::parse(&data)
        .with_context(|| format!("parsing {}", file.display()))?;
    log::info!(
        "{}: MPK {}.{}, {} entries",
        file.display(),
        archive.version().0,
        archive.version().1,
        archive.entries().len()
    );

    let out_dir = output.unwrap_or_else(|| {
        file.file_stem()
            .map_or_else(|| PathBuf::from("extracted"), PathBuf::from)
    });
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    for entry in archive.entries() {
        let target = out_dir.join(&entry.file_name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&target, archive.entry_data(entry))
            .with_context(|| format!("writing {}", target.display()))?;
        log::info!(
            "  {} ({} bytes{})",
            entry.file_name,
            entry.size,
            if entry.compressed { ", compressed" } else { "" }
        );
    }
    Ok(ExitCode::SUCCESS)
}
