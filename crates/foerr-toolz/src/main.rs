//! FoERR headless data converter.
//!
//! Translates one Remains rooms file into an RR location document, or
//! re-pads the cells of an already written document.
//!
//! Usage:
//!   cargo run -p foerr-toolz -- import-locs -i rooms_begin.xml -g GameData.xml \
//!       -d AllData.xml -m materials.json
//!   cargo run -p foerr-toolz -- pad-locs -t technical_tunnels.json -p 4

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;

use foerr_logic::config::{validate_config, ImportConfig};
use foerr_logic::diagnostics::Diagnostics;
use foerr_logic::gamedata::{parse_all_data, parse_game_data};
use foerr_logic::json::{parse_strict, to_nicer_json, to_nicer_string};
use foerr_logic::location::{translate_location, ImportContext, LocationOutcome};
use foerr_logic::materials::MaterialTable;
use foerr_logic::overrides::{parse_overrides, SolidOverrides};
use foerr_logic::padding::repad_document;
use foerr_logic::symbols::SymbolTables;
use foerr_logic::tables;
use foerr_logic::xml::parse_document;

#[derive(Parser)]
#[command(name = "foerr-toolz")]
#[command(about = "Room data converter for FoERR")]
struct Cli {
    /// Log level: 0 off, 1 errors, 2 warnings, 3 info, 4 verbose, 5 debug
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=5))]
    log: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a Remains rooms file into an RR location document
    ImportLocs {
        /// Rooms file in Remains format
        #[arg(short, long)]
        input: PathBuf,
        /// GameData.xml (GameData.as without the code around it)
        #[arg(short, long)]
        gamedata: PathBuf,
        /// AllData.xml (AllData.as without the code around it)
        #[arg(short = 'd', long)]
        alldata: PathBuf,
        /// materials.json
        #[arg(short, long)]
        materials: PathBuf,
        /// Output file, defaults to `<location id>.json`
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pad each cell to this many characters; unpadded when omitted
        #[arg(short, long)]
        pad: Option<usize>,
        /// Per-cell solid overrides
        #[arg(short = 's', long)]
        overrides: Option<PathBuf>,
    },

    /// Re-pad the cells of an RR location document in place
    PadLocs {
        /// Location document to rewrite
        #[arg(short, long)]
        target: PathBuf,
        /// Pad size, 0 strips padding
        #[arg(short, long)]
        pad: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log);

    let result = match cli.command {
        Command::ImportLocs {
            input,
            gamedata,
            alldata,
            materials,
            output,
            pad,
            overrides,
        } => import_locs(&ImportArgs {
            input,
            gamedata,
            alldata,
            materials,
            output,
            overrides,
            config: ImportConfig { pad },
        }),
        Command::PadLocs { target, pad } => pad_locs(&target, pad),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

// ── Logging ─────────────────────────────────────────────────────────────

fn level_filter(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// `[LEVEL] message`, coloured by level. `RUST_LOG` takes precedence.
fn init_logger(level: u8) {
    Builder::new()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(buf, "{style}[{}]{style:#} {}", record.level(), record.args())
        })
        .filter_level(level_filter(level))
        .parse_default_env()
        .init();
}

// ── import-locs ─────────────────────────────────────────────────────────

struct ImportArgs {
    input: PathBuf,
    gamedata: PathBuf,
    alldata: PathBuf,
    materials: PathBuf,
    output: Option<PathBuf>,
    overrides: Option<PathBuf>,
    config: ImportConfig,
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// Location basename: the file name without directories or extension.
fn location_basename(path: &Path) -> Result<&str> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("no usable file name in {}", path.display()))
}

fn import_locs(args: &ImportArgs) -> Result<()> {
    let problems = validate_config(&args.config);
    if let Some(first) = problems.first() {
        bail!("{first}");
    }
    tables::validate().context("built-in tables are inconsistent")?;

    let mut diag = Diagnostics::new();

    let materials = MaterialTable::from_json_str(&read(&args.materials)?)
        .with_context(|| format!("failed to load {}", args.materials.display()))?;
    let symbols = SymbolTables::load(materials, &mut diag)
        .with_context(|| format!("invalid symbol maps in {}", args.materials.display()))?;

    let game_data = parse_document(&read(&args.gamedata)?)
        .with_context(|| format!("failed to parse {}", args.gamedata.display()))?;
    let locations = parse_game_data(&game_data, &mut diag);

    let all_data = parse_document(&read(&args.alldata)?)
        .with_context(|| format!("failed to parse {}", args.alldata.display()))?;
    let layers = parse_all_data(&all_data, &mut diag);

    let overrides: BTreeMap<String, SolidOverrides> = match &args.overrides {
        Some(path) => parse_overrides(&read(path)?)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => BTreeMap::new(),
    };

    let basename = location_basename(&args.input)?;
    let rooms = parse_document(&read(&args.input)?)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    let ctx = ImportContext {
        symbols: &symbols,
        locations: &locations,
        layers: &layers,
        overrides: &overrides,
        config: &args.config,
    };

    let max_cell_len = match translate_location(basename, &rooms, &ctx, &mut diag) {
        LocationOutcome::Translated(location) => {
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("{}.json", location.id)));
            let text = to_nicer_json(&location.document)
                .context("failed to serialize location document")?;
            write(&output, &text)?;
            log::info!(
                "Wrote {} ({} rooms, {} skipped)",
                output.display(),
                location.document.rooms.len(),
                location.skipped_rooms
            );
            location.max_cell_len
        }
        LocationOutcome::Rejected(reason) => {
            bail!("{} was not translated: {reason}", args.input.display())
        }
        LocationOutcome::Untranslated => {
            bail!("{} has no output location, nothing written", args.input.display())
        }
    };

    if args.config.pad.is_none() {
        log::info!("Max cell size was {max_cell_len}");
    }
    log::info!(
        "Finished with {} warnings and {} errors",
        diag.warnings().count(),
        diag.errors().count()
    );
    Ok(())
}

// ── pad-locs ────────────────────────────────────────────────────────────

fn pad_locs(target: &Path, pad: usize) -> Result<()> {
    let mut document = parse_strict(&read(target)?)
        .with_context(|| format!("failed to parse {}", target.display()))?;
    let rows = repad_document(&mut document, pad)
        .with_context(|| format!("failed to re-pad {}", target.display()))?;
    write(target, &to_nicer_string(&document))?;
    log::info!("Re-padded {rows} rows in {}", target.display());
    Ok(())
}
