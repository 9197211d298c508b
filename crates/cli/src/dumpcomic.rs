//! dumpcomic - Inspect exported comic structure documents
//!
//! Parses a structural XML document and prints a summary of the tree,
//! the narrative script, or the per-panel transcript.

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use tankobon_core::model::Comic;
use tankobon_core::xml::parse_comic;

/// What to print for each parsed document.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum DumpType {
    /// Per-page structural summary (default)
    #[default]
    Summary,
    /// Narrative script rendered from the stored scenes
    Narrative,
    /// Numbered speech-bubble transcript, panel by panel
    Transcript,
}

/// A command line tool for dumping exported comic structure documents.
#[derive(Parser, Debug)]
#[command(name = "dumpcomic")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more paths to structural XML documents
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// What to dump
    #[arg(short = 't', long = "dump_type", value_enum, default_value = "summary")]
    dump_type: DumpType,
}

fn summary(comic: &Comic) -> String {
    let mut out = format!("Comic: {}\n", comic.name);
    for (i, pair) in comic.page_pairs.iter().enumerate() {
        let side = |page: &Option<tankobon_core::model::Page>| match page {
            Some(p) => format!("page {}", p.index),
            None => "-".to_string(),
        };
        out.push_str(&format!(
            "Pair {}: [{} | {}]\n",
            i + 1,
            side(&pair.left),
            side(&pair.right)
        ));
        for page in pair.pages() {
            for (j, panel) in page.panels.iter().enumerate() {
                out.push_str(&format!(
                    "  page {} panel {}: {} entities, {} bubbles, scene {}\n",
                    page.index,
                    j + 1,
                    panel.entities.len(),
                    panel.speech_bubbles.len(),
                    panel.scene_id,
                ));
            }
        }
    }
    out
}

fn render(comic: &Comic, dump_type: DumpType) -> String {
    match dump_type {
        DumpType::Summary => summary(comic),
        DumpType::Narrative => comic.to_narrative(),
        DumpType::Transcript => {
            let mut out = String::new();
            for page in comic.pages() {
                out.push_str(&format!("Page {}\n", page.index));
                for panel in &page.panels {
                    out.push_str(&panel.transcript());
                }
            }
            out
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(io::stderr)
        .init();

    let mut out: BufWriter<Box<dyn Write>> = BufWriter::new(if args.outfile == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(File::create(&args.outfile).context("cannot create output file")?)
    });

    for path in &args.files {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let comic = parse_comic(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        out.write_all(render(&comic, args.dump_type).as_bytes())?;
    }
    out.flush()?;
    Ok(())
}
