//! Prints the decoded contents of one or more TZif files.
//!
//! Arguments that are not paths are looked up under `/usr/share/zoneinfo/`.
//! With no arguments, `/etc/localtime` is decoded. The log level is read from
//! `RUST_LOG`.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::{
    eyre::{bail, WrapErr},
    Result,
};
use log::{info, warn, LevelFilter};
use rayon::prelude::*;
use simple_logger::SimpleLogger;
use tzif_rs::{DecodeOptions, DecodedFile, Decoder, Section};

const ZONEINFO_DIR: &str = "/usr/share/zoneinfo/";
const LOCALTIME: &str = "/etc/localtime";

macro_rules! format_line(
    ($a:expr, $b:expr, $c: expr, $d: expr) => {
        println!("{:<25} {:<20} {:<10} {}", $a, $b, $c, $d)
    };
    ($a:expr, $b:expr, $c: expr) => {
        println!("{:<25} {:<20} {}", $a, $b, $c)
    };
    ($a:expr, $b:expr) => {
        println!("{:<25} {}", $a, $b)
    };
);

#[derive(Debug, Parser)]
#[command(name = "tzif-inspect", about, long_about = None)]
struct Args {
    /// Print each file as JSON instead of tables.
    #[arg(long)]
    json: bool,

    /// Reject files that are well formed but internally inconsistent.
    #[arg(long)]
    strict: bool,

    /// Zone identifiers or paths to TZif files.
    #[arg(value_name = "ZONE_OR_PATH")]
    zones: Vec<String>,
}

impl Args {
    /// Returns the files to decode.
    fn paths(&self) -> Vec<PathBuf> {
        if self.zones.is_empty() {
            return vec![PathBuf::from(LOCALTIME)];
        }
        self.zones.iter().map(|zone| resolve(zone)).collect()
    }
}

/// Resolves a zone identifier to a file, leaving explicit paths alone.
fn resolve(zone: &str) -> PathBuf {
    let path = Path::new(zone);
    if path.is_absolute() || zone.starts_with('.') || path.is_file() {
        path.to_path_buf()
    } else {
        Path::new(ZONEINFO_DIR).join(zone)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .wrap_err("could not initialize logging")?;

    let args = Args::parse();
    let paths = args.paths();
    let options = if args.strict {
        DecodeOptions::strict()
    } else {
        DecodeOptions::default()
    };
    let decoder = Decoder::with_options(options);

    info!("decoding {} file(s)", paths.len());
    let results: Vec<_> = paths
        .par_iter()
        .map(|path| (path, decoder.decode_path(path)))
        .collect();

    let mut failures = 0usize;
    for (path, result) in results {
        match result {
            Ok(decoded) if args.json => print_json(path, &decoded)?,
            Ok(decoded) => print_file(path, &decoded),
            Err(err) => {
                warn!("{}: {err}", path.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} file(s) failed to decode", paths.len());
    }
    Ok(())
}

fn print_json(path: &Path, decoded: &DecodedFile) -> Result<()> {
    let value = serde_json::json!({
        "path": path,
        "file": decoded,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_file(path: &Path, decoded: &DecodedFile) {
    println!("{}", path.display());
    format_line!("magic", String::from_utf8_lossy(&decoded.magic));
    format_line!("version", format!("{:?}", decoded.version));
    if let Some(rule) = &decoded.posix_tz_string {
        format_line!("posix_tz_string", format!("{rule:?}"));
    }
    println!();

    print_section("legacy", &decoded.legacy);
    if let Some(extended) = &decoded.extended {
        print_section("extended", extended);
    }
}

fn print_section(name: &str, section: &Section) {
    let header = &section.header;
    println!(
        "{name} section at byte {} ({} byte instants)",
        section.offset,
        section.time_width.bytes()
    );
    format_line!("counts", "transitions / types / chars / leap / wall / utc");
    format_line!(
        "",
        format!(
            "{} / {} / {} / {} / {} / {}",
            header.transition_count,
            header.type_count,
            header.abbrev_char_count,
            header.leap_count,
            header.wall_count,
            header.utc_count
        )
    );
    println!();

    format_line!("Index", "Transition", "Local type", "Designation");
    for (index, transition) in section.transitions().enumerate() {
        let designation = transition
            .local_time_type
            .and_then(|ttinfo| section.abbreviation(ttinfo))
            .unwrap_or_default();
        format_line!(
            format!("transition[{index}]"),
            transition.time,
            transition.type_index,
            designation
        );
    }
    println!();

    format_line!("Index", "UTC offset", "DST", "Designation");
    for (index, ttinfo) in section.local_time_types.iter().enumerate() {
        format_line!(
            format!("local_type[{index}]"),
            ttinfo.gmt_offset,
            ttinfo.is_dst,
            section.abbreviation(ttinfo).unwrap_or_default()
        );
    }
    println!();

    for (offset, designation) in designations(section) {
        format_line!(format!("designations[{offset}]"), designation);
    }
    println!();

    if !section.leap_seconds.is_empty() {
        format_line!("Index", "Occurrence", "Correction");
        for (index, leap) in section.leap_seconds.iter().enumerate() {
            format_line!(
                format!("leap_second[{index}]"),
                leap.occurrence,
                leap.correction
            );
        }
        println!();
    }
}

/// Yields each designation with its byte offset in the designation buffer.
fn designations(section: &Section) -> impl Iterator<Item = (usize, String)> + '_ {
    let buffer = &section.designations;
    let mut offset = 0;
    std::iter::from_fn(move || {
        let rest = buffer.get(offset..).filter(|rest| !rest.is_empty())?;
        let len = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        let item = (offset, String::from_utf8_lossy(&rest[..len]).into_owned());
        offset += len + 1;
        Some(item)
    })
}
