//! Pages and facing-page spreads.

use image::RgbImage;

use crate::error::{ComicError, Result};
use crate::model::panel::Panel;

/// Editorial category of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    Index,
    ChapterHead,
    Single,
    Dual,
    Trivia,
}

impl PageType {
    /// Wire name of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Index => "INDEX",
            Self::ChapterHead => "CHAPTER_HEAD",
            Self::Single => "SINGLE",
            Self::Dual => "DUAL",
            Self::Trivia => "TRIVIA",
        }
    }

    /// Looks a variant up by name, case-insensitively. Unknown names
    /// are a parse error, never a silent default.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "INDEX" => Ok(Self::Index),
            "CHAPTER_HEAD" => Ok(Self::ChapterHead),
            "SINGLE" => Ok(Self::Single),
            "DUAL" => Ok(Self::Dual),
            "TRIVIA" => Ok(Self::Trivia),
            other => Err(ComicError::UnknownPageType(other.to_string())),
        }
    }
}

/// One scanned/rendered page. `index` is 1-based, assigned at
/// ingestion, and stable for the page's lifetime. Panel order reflects
/// reading order once assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub index: u32,
    pub page_type: PageType,
    pub panels: Vec<Panel>,
    /// External pixel buffer; absent for parsed documents until images
    /// are reattached.
    pub image: Option<RgbImage>,
    pub height: Option<f64>,
    pub width: Option<f64>,
}

impl Page {
    pub fn new(index: u32, page_type: PageType) -> Self {
        Self {
            index,
            page_type,
            panels: Vec::new(),
            image: None,
            height: None,
            width: None,
        }
    }
}

/// Two facing pages treated as one reading unit. At least one side is
/// always present; the very first page of a comic is a cover,
/// modeled as `(absent, page)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePair {
    pub left: Option<Page>,
    pub right: Option<Page>,
}

impl PagePair {
    /// The cover convention: first page alone on the right side.
    pub fn cover(page: Page) -> Self {
        Self {
            left: None,
            right: Some(page),
        }
    }

    pub fn spread(left: Page, right: Option<Page>) -> Self {
        Self {
            left: Some(left),
            right,
        }
    }

    /// Pages present in this pair, left before right.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.left.iter().chain(self.right.iter())
    }

    pub fn pages_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        self.left.iter_mut().chain(self.right.iter_mut())
    }
}
