//! tankobon - comic structure reconstruction.
//!
//! Turns raw per-page object detections (panel, character and
//! speech-bubble boxes) into an ordered document tree
//! (Comic → PagePair → Page → Panel → {Entity, SpeechBubble}) and
//! round-trips that tree through a textual interchange format.

pub mod assembly;
pub mod error;
pub mod geometry;
pub mod imaging;
pub mod model;
pub mod xml;

pub use assembly::{AssemblyParams, ComicReader, Detections, ObjectDetector};
pub use error::{ComicError, Result};
pub use geometry::BoundingBox;
pub use model::{
    Comic, Entity, Page, PagePair, PageType, Panel, PanelRef, SpeechBubble, SpeechBubbleKind,
};
