//! Structural writer: walks a comic tree top-down and emits the
//! labeled-tree format with 2-space indentation.

use std::borrow::Cow;
use std::io::Write;

use crate::error::Result;
use crate::geometry::BoundingBox;
use crate::model::{
    Comic, ENTITY_NAME_PLACEHOLDER, Entity, Page, PagePair, Panel, SpeechBubble,
};
use crate::xml::escape::escape_text;

/// Escapes element text content. The escaping-table tokens in bubble
/// text go through this too, so `©` lands on disk as `&amp;copy;` —
/// that double layer is the wire contract.
fn enc(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Serializes a bounding box as a comma-joined `key:value` list, keys
/// in insertion order: the geometric keys, then confidence if present,
/// then pass-through keys.
fn bbox2str(bbox: &BoundingBox) -> String {
    let mut out = format!(
        "x:{},y:{},width:{},height:{}",
        bbox.x, bbox.y, bbox.width, bbox.height
    );
    if let Some(confidence) = bbox.confidence {
        out.push_str(&format!(",confidence:{confidence}"));
    }
    for (key, value) in &bbox.extra {
        out.push_str(&format!(",{key}:{value}"));
    }
    out
}

/// Writes the structural format for a comic tree.
pub struct StructureWriter<W: Write> {
    out: W,
    depth: usize,
}

impl<W: Write> StructureWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    fn line(&mut self, text: &str) -> Result<()> {
        for _ in 0..self.depth {
            self.out.write_all(b"  ")?;
        }
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn open(&mut self, tag: &str) -> Result<()> {
        self.line(&format!("<{tag}>"))?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self, tag: &str) -> Result<()> {
        self.depth -= 1;
        self.line(&format!("</{tag}>"))
    }

    fn leaf(&mut self, tag: &str, text: &str) -> Result<()> {
        self.line(&format!("<{tag}>{text}</{tag}>"))
    }

    pub fn write_comic(&mut self, comic: &Comic) -> Result<()> {
        self.line("<?xml version=\"1.0\" encoding=\"utf-8\"?>")?;
        self.open("Comic")?;
        self.leaf("Name", &enc(&comic.name))?;
        self.open("PagePairs")?;
        for pair in &comic.page_pairs {
            self.write_page_pair(pair)?;
        }
        self.close("PagePairs")?;
        self.close("Comic")?;
        self.out.flush()?;
        Ok(())
    }

    fn write_page_pair(&mut self, pair: &PagePair) -> Result<()> {
        self.open("PagePair")?;
        if let Some(left) = &pair.left {
            self.open("LeftPage")?;
            self.write_page(left)?;
            self.close("LeftPage")?;
        }
        if let Some(right) = &pair.right {
            self.open("RightPage")?;
            self.write_page(right)?;
            self.close("RightPage")?;
        }
        self.close("PagePair")
    }

    fn write_page(&mut self, page: &Page) -> Result<()> {
        self.open("Page")?;
        self.leaf("Index", &page.index.to_string())?;
        self.leaf("Type", page.page_type.as_str())?;
        self.open("Panels")?;
        for panel in &page.panels {
            self.write_panel(panel)?;
        }
        self.close("Panels")?;
        self.close("Page")
    }

    fn write_panel(&mut self, panel: &Panel) -> Result<()> {
        self.open("Panel")?;
        self.leaf("Description", &enc(&panel.description))?;
        self.leaf("Scene_Id", &panel.scene_id.to_string())?;
        self.leaf("Starting_Tag", &panel.starting_tag.to_string())?;
        self.leaf("BoundingBox", &bbox2str(&panel.bounding_box))?;
        self.open("Entities")?;
        for entity in &panel.entities {
            self.write_entity(entity)?;
        }
        self.close("Entities")?;
        self.open("SpeechBubbles")?;
        for bubble in &panel.speech_bubbles {
            self.write_speech_bubble(bubble, panel)?;
        }
        self.close("SpeechBubbles")?;
        self.close("Panel")
    }

    fn write_entity(&mut self, entity: &Entity) -> Result<()> {
        self.open("Entity")?;
        self.leaf("Name", ENTITY_NAME_PLACEHOLDER)?;
        self.leaf("Named_Entity_Id", &entity.cluster_id.to_string())?;
        self.leaf("Active_Tag", &entity.active_tag.to_string())?;
        self.leaf("BoundingBox", &bbox2str(&entity.bounding_box))?;
        self.open("Tags")?;
        for (label, confidence) in &entity.tags {
            self.open("Tag")?;
            self.leaf("Label", &enc(label))?;
            self.leaf("Value", &confidence.to_string())?;
            self.close("Tag")?;
        }
        self.close("Tags")?;
        self.close("Entity")
    }

    /// Speakers are indices into the owning panel's entity list; they
    /// serialize as full entity subtrees for wire compatibility.
    fn write_speech_bubble(&mut self, bubble: &SpeechBubble, panel: &Panel) -> Result<()> {
        self.open("SpeechBubble")?;
        self.leaf("Type", &enc(&bubble.label))?;
        self.leaf("Text", &enc(&escape_text(&bubble.text)))?;
        self.leaf("Speaker_Id", &bubble.speaker_id.to_string())?;
        self.leaf("BoundingBox", &bbox2str(&bubble.bounding_box))?;
        self.open("Speakers")?;
        for speaker in panel.speakers_of(bubble) {
            self.write_entity(speaker)?;
        }
        self.close("Speakers")?;
        self.close("SpeechBubble")
    }
}

/// Exports a comic tree to the structural format as a string.
pub fn export_comic(comic: &Comic) -> Result<String> {
    let mut out = Vec::new();
    StructureWriter::new(&mut out).write_comic(comic)?;
    // The writer only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}
