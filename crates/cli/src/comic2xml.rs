//! comic2xml - Build comic structure from detection dumps
//!
//! A command line tool that reads per-page detection results (a JSON
//! dump of the object-detection model's output) and writes the
//! reconstructed document in the structural XML format, or a per-panel
//! transcript of it.

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tankobon_core::assembly::{AssemblyParams, build_comic_with_stats};
use tankobon_core::geometry::Corners;
use tankobon_core::model::Comic;
use tankobon_core::xml::export_comic;

/// Output type for the reconstructed structure.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputType {
    /// Structural XML (default)
    #[default]
    Xml,
    /// Numbered speech-bubble transcript, panel by panel
    Transcript,
}

/// Detection dump for one comic: a name plus one entry per page, in
/// reading order.
#[derive(Debug, Deserialize)]
struct ComicFixture {
    name: Option<String>,
    pages: Vec<PageFixture>,
}

/// One page's raw detections, corner-form boxes with their parallel
/// arrays.
#[derive(Debug, Deserialize)]
struct PageFixture {
    #[serde(default)]
    panels: Vec<[f64; 4]>,
    #[serde(default)]
    entities: Vec<[f64; 4]>,
    #[serde(default)]
    cluster_labels: Vec<i32>,
    #[serde(default)]
    texts: Vec<[f64; 4]>,
    #[serde(default)]
    is_essential_text: Vec<bool>,
    width: Option<f64>,
    height: Option<f64>,
}

fn corners(boxes: &[[f64; 4]]) -> Vec<Corners> {
    boxes.iter().map(|b| (b[0], b[1], b[2], b[3])).collect()
}

impl PageFixture {
    fn into_detections(self) -> tankobon_core::assembly::Detections {
        tankobon_core::assembly::Detections {
            panels: corners(&self.panels),
            entities: corners(&self.entities),
            cluster_labels: self.cluster_labels,
            texts: corners(&self.texts),
            is_essential_text: self.is_essential_text,
            width: self.width,
            height: self.height,
        }
    }
}

/// A command line tool for reconstructing comic structure from raw
/// detection dumps and exporting it as XML.
#[derive(Parser, Debug)]
#[command(name = "comic2xml")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more paths to detection dump files (JSON)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Assembly options ===
    /// Vertical tolerance in pixels when bucketing panels into rows
    #[arg(short = 'Y', long = "y-tolerance", default_value = "50.0")]
    y_tolerance: f64,

    /// IoU above which two entities in a panel count as duplicates
    #[arg(short = 'D', long = "dedup-iou", default_value = "0.6")]
    dedup_iou: f64,

    // === Output options ===
    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Type of output to generate
    #[arg(short = 't', long = "output_type", value_enum, default_value = "xml")]
    output_type: OutputType,
}

fn render(comic: &Comic, output_type: OutputType) -> anyhow::Result<String> {
    match output_type {
        OutputType::Xml => Ok(export_comic(comic)?),
        OutputType::Transcript => {
            let mut out = String::new();
            for page in comic.pages() {
                out.push_str(&format!("Page {}\n", page.index));
                for panel in &page.panels {
                    out.push_str(&panel.transcript());
                }
            }
            Ok(out)
        }
    }
}

/// Checks the flag values before handing them to the asserting
/// constructor, so bad input surfaces as a normal CLI error.
fn assembly_params(y_tolerance: f64, dedup_iou: f64) -> anyhow::Result<AssemblyParams> {
    anyhow::ensure!(
        y_tolerance > 0.0,
        "--y-tolerance must be positive, got {y_tolerance}"
    );
    anyhow::ensure!(
        (0.0..=1.0).contains(&dedup_iou),
        "--dedup-iou must be between 0 and 1, got {dedup_iou}"
    );
    Ok(AssemblyParams::new(y_tolerance, dedup_iou))
}

fn comic_name(fixture_name: Option<String>, path: &Path) -> String {
    fixture_name.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "comic".to_string())
    })
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

    let params = assembly_params(args.y_tolerance, args.dedup_iou)?;

    let mut out: BufWriter<Box<dyn Write>> = BufWriter::new(if args.outfile == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(File::create(&args.outfile).context("cannot create output file")?)
    });

    for path in &args.files {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let fixture: ComicFixture = serde_json::from_str(&raw)
            .with_context(|| format!("malformed detection dump {}", path.display()))?;

        let name = comic_name(fixture.name, path);
        let detections: Vec<_> = fixture
            .pages
            .into_iter()
            .map(PageFixture::into_detections)
            .collect();

        let (comic, stats) = build_comic_with_stats(&name, &detections, &params)?;
        tracing::debug!(
            name,
            entities_dropped = stats.entities.dropped,
            entities_deduplicated = stats.entities.deduplicated,
            bubbles_dropped = stats.speech_bubbles.dropped,
            "assembled comic"
        );

        out.write_all(render(&comic, args.output_type)?.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembly_flags_are_validated() {
        assert!(assembly_params(50.0, 0.6).is_ok());
        assert!(assembly_params(0.0, 0.6).is_err());
        assert!(assembly_params(-10.0, 0.6).is_err());
        assert!(assembly_params(50.0, 2.0).is_err());
        assert!(assembly_params(50.0, -0.1).is_err());
    }
}
