//! Comic ingestion: detector collaborator, page building and spread
//! pairing.

use image::RgbImage;
use rayon::prelude::*;
use tracing::debug;

use crate::assembly::{
    AssemblyParams, AssignOutcome, assemble_panels, assign_entities, assign_speech_bubbles,
};
use crate::error::Result;
use crate::geometry::Corners;
use crate::imaging::attach_images;
use crate::model::{Comic, Page, PagePair, PageType};

/// Raw detection result for one page, as produced by the (external)
/// object-detection model. `cluster_labels` runs parallel to
/// `entities`, `is_essential_text` parallel to `texts`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detections {
    pub panels: Vec<Corners>,
    pub entities: Vec<Corners>,
    pub cluster_labels: Vec<i32>,
    pub texts: Vec<Corners>,
    pub is_essential_text: Vec<bool>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// The detection model behind an explicit seam, so tests can substitute
/// fixed fixtures for the real thing.
pub trait ObjectDetector: Sync {
    fn detect_objects(&self, image: &RgbImage) -> Result<Detections>;
}

/// Aggregated assignment outcomes for a whole ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestStats {
    pub entities: AssignOutcome,
    pub speech_bubbles: AssignOutcome,
}

/// Assembles one page from its detections: panels first, then entity
/// and speech-bubble assignment against the assembled panels.
pub fn assemble_page(
    index: u32,
    detections: &Detections,
    params: &AssemblyParams,
) -> Result<(Page, IngestStats)> {
    let mut page = Page::new(index, PageType::Single);
    page.width = detections.width;
    page.height = detections.height;

    assemble_panels(&detections.panels, &mut page, params)?;
    let entities = assign_entities(
        &detections.entities,
        &detections.cluster_labels,
        &mut page,
        params,
    )?;
    let speech_bubbles = assign_speech_bubbles(
        &detections.texts,
        &detections.is_essential_text,
        &mut page,
        params,
    )?;

    Ok((
        page,
        IngestStats {
            entities,
            speech_bubbles,
        },
    ))
}

/// Pairs assembled pages into spreads: the first page stands alone on
/// the right of a cover pair, the rest are paired two at a time in
/// order, and an odd remainder leaves the final right slot empty. The
/// resulting pair order is the authoritative reading order.
pub fn pair_pages(pages: Vec<Page>) -> Vec<PagePair> {
    let mut pairs = Vec::with_capacity(pages.len() / 2 + 1);
    let mut rest = pages.into_iter();

    let Some(first) = rest.next() else {
        return pairs;
    };
    pairs.push(PagePair::cover(first));

    let mut rest = rest.peekable();
    while let Some(left) = rest.next() {
        pairs.push(PagePair::spread(left, rest.next()));
    }
    pairs
}

/// Builds a comic from per-page detections, assigning page indices in
/// encounter order (1-based).
pub fn build_comic(name: &str, pages: &[Detections], params: &AssemblyParams) -> Result<Comic> {
    build_comic_with_stats(name, pages, params).map(|(comic, _)| comic)
}

/// Like [`build_comic`], also returning the aggregated assignment
/// outcomes for diagnostics.
pub fn build_comic_with_stats(
    name: &str,
    pages: &[Detections],
    params: &AssemblyParams,
) -> Result<(Comic, IngestStats)> {
    let mut stats = IngestStats::default();
    let mut built = Vec::with_capacity(pages.len());
    for (i, detections) in pages.iter().enumerate() {
        let (page, page_stats) = assemble_page(i as u32 + 1, detections, params)?;
        stats.entities.absorb(page_stats.entities);
        stats.speech_bubbles.absorb(page_stats.speech_bubbles);
        built.push(page);
    }

    let mut comic = Comic::new(name);
    comic.page_pairs = pair_pages(built);
    debug!(
        name,
        pages = pages.len(),
        pairs = comic.page_pairs.len(),
        "built comic"
    );
    Ok((comic, stats))
}

/// Reads a comic from page images through a detection collaborator.
pub struct ComicReader<D> {
    detector: D,
    params: AssemblyParams,
}

impl<D: ObjectDetector> ComicReader<D> {
    pub fn new(detector: D) -> Self {
        Self::with_params(detector, AssemblyParams::default())
    }

    pub fn with_params(detector: D, params: AssemblyParams) -> Self {
        Self { detector, params }
    }

    /// Detects and assembles every page, then attaches the page images
    /// and their crops to the finished tree.
    ///
    /// Detection fans out across the rayon pool; results are collected
    /// keyed by input order, so the output is deterministic regardless
    /// of completion order.
    pub fn read_comic(&self, name: &str, images: &[RgbImage]) -> Result<Comic> {
        self.read_comic_with_stats(name, images)
            .map(|(comic, _)| comic)
    }

    pub fn read_comic_with_stats(
        &self,
        name: &str,
        images: &[RgbImage],
    ) -> Result<(Comic, IngestStats)> {
        let detections: Vec<Detections> = images
            .par_iter()
            .map(|image| self.detector.detect_objects(image))
            .collect::<Result<_>>()?;

        let (mut comic, stats) = build_comic_with_stats(name, &detections, &self.params)?;
        attach_images(&mut comic, images)?;
        Ok((comic, stats))
    }
}
