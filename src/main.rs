use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;

use ttf_inspect::{DecodeResult, Font, KnownTable, TableData, TableGroup, Tag};

#[derive(Parser)]
#[command(name = "ttf-inspect", version)]
#[command(about = "Decode OpenType/TrueType tables into JSON")]
#[command(after_help = "Examples:\n  \
    ttf-inspect Inter.ttf --list\n  \
    ttf-inspect Inter.ttf -t fvar -t STAT --pretty\n  \
    RUST_LOG=debug ttf-inspect Inter.ttf -t 'cvt '")]
struct Cli {
    /// Input .ttf or .otf font file
    #[arg(value_name = "FONT")]
    font: PathBuf,
    /// Table tag to decode, e.g. 'OS/2' (repeatable, default: all tables)
    #[arg(short, long = "table", value_name = "TAG")]
    tables: Vec<String>,
    /// Print the table directory instead of decoding tables
    #[arg(short, long)]
    list: bool,
    /// Pretty-print JSON
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Serialize)]
struct DirectoryRow {
    tag: Tag,
    offset: u32,
    length: u32,
    checksum: u32,
    group: Option<TableGroup>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let data = fs::read(&cli.font).with_context(|| format!("failed to read {}", cli.font.display()))?;
    let font = Font::from_data(&data);
    if font.is_error() {
        bail!("{}: {:?}", cli.font.display(), font.status);
    }
    let font = font.data;

    let json = if cli.list {
        let rows: Vec<DirectoryRow> = font
            .directory()
            .entries
            .iter()
            .map(|e| DirectoryRow {
                tag: e.tag,
                offset: e.offset,
                length: e.length,
                checksum: e.checksum,
                group: KnownTable::from_tag(e.tag).map(KnownTable::group),
            })
            .collect();
        to_json(&rows, cli.pretty)?
    } else {
        let tags = requested_tags(&font, &cli.tables)?;
        let decoded: Vec<(Tag, DecodeResult<TableData>)> =
            tags.par_iter().map(|tag| (*tag, font.decode(*tag))).collect();

        let map: IndexMap<String, DecodeResult<TableData>> =
            decoded.into_iter().map(|(tag, result)| (tag.to_string_lossy(), result)).collect();
        to_json(&map, cli.pretty)?
    };

    println!("{}", json);
    Ok(())
}

fn requested_tags(font: &Font, names: &[String]) -> Result<Vec<Tag>> {
    if names.is_empty() {
        return Ok(font.directory().unique_tags().collect());
    }

    let mut tags = Vec::with_capacity(names.len());
    for name in names {
        let tag = match Tag::from_str_padded(name) {
            Some(v) => v,
            None => bail!("'{}' is not a valid table tag", name),
        };

        if !font.has_table(tag) {
            log::warn!("{} is not present in the font", tag);
        }

        tags.push(tag);
    }

    Ok(tags)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    json.context("failed to serialize")
}
