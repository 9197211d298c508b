//! Structural parser: reconstructs a comic tree from the textual
//! format. Anything that does not match the exact element shape is a
//! fatal parse error carrying the offending element's name; lookup
//! misses during speaker re-linking are the only tolerated gaps.

use roxmltree::{Document, Node};
use tracing::debug;

use crate::error::{ComicError, Result};
use crate::geometry::BoundingBox;
use crate::model::{
    Comic, Entity, Page, PagePair, PageType, Panel, SpeechBubble, SpeechBubbleKind,
};
use crate::xml::escape::unescape_text;

/// Parses a comic tree from the structural format.
///
/// Pixel data is never part of the format; the returned tree has empty
/// image buffers until [`attach_images`](crate::imaging::attach_images)
/// re-slices them from separately obtained page images.
pub fn parse_comic(text: &str) -> Result<Comic> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "Comic" {
        return Err(ComicError::MissingElement {
            element: "document",
            child: "Comic",
        });
    }

    let mut comic = Comic::new(child_text(root, "Comic", "Name")?);
    for pair in elements(child(root, "Comic", "PagePairs")?, "PagePair") {
        comic.page_pairs.push(parse_page_pair(pair)?);
    }
    // The scene view is not part of the wire shape; regroup it from the
    // Scene_Id tags the panels carry.
    comic.rebuild_scenes();
    Ok(comic)
}

fn parse_page_pair(node: Node) -> Result<PagePair> {
    let left = find(node, "LeftPage")
        .map(|n| parse_page(child(n, "LeftPage", "Page")?))
        .transpose()?;
    let right = find(node, "RightPage")
        .map(|n| parse_page(child(n, "RightPage", "Page")?))
        .transpose()?;

    if left.is_none() && right.is_none() {
        return Err(ComicError::MissingElement {
            element: "PagePair",
            child: "LeftPage/RightPage",
        });
    }
    Ok(PagePair { left, right })
}

fn parse_page(node: Node) -> Result<Page> {
    let index = parse_u32("Page", "Index", &child_text(node, "Page", "Index")?)?;
    let page_type = PageType::from_name(&child_text(node, "Page", "Type")?)?;

    let mut page = Page::new(index, page_type);
    for panel in elements(child(node, "Page", "Panels")?, "Panel") {
        let mut panel = parse_panel(panel)?;
        // The wire format does not carry the back-reference; rebuild it.
        panel.page_id = index;
        page.panels.push(panel);
    }
    Ok(page)
}

fn parse_panel(node: Node) -> Result<Panel> {
    let bbox = parse_bounding_box(&child_text(node, "Panel", "BoundingBox")?)?;
    let mut panel = Panel::new(child_text(node, "Panel", "Description")?, bbox);
    panel.scene_id = parse_i32("Panel", "Scene_Id", &child_text(node, "Panel", "Scene_Id")?)?;
    panel.starting_tag = parse_bool("Starting_Tag", &child_text(node, "Panel", "Starting_Tag")?)?;

    for entity in elements(child(node, "Panel", "Entities")?, "Entity") {
        panel.entities.push(parse_entity(entity)?);
    }
    for bubble in elements(child(node, "Panel", "SpeechBubbles")?, "SpeechBubble") {
        let bubble = parse_speech_bubble(bubble, &panel.entities)?;
        panel.speech_bubbles.push(bubble);
    }
    Ok(panel)
}

fn parse_entity(node: Node) -> Result<Entity> {
    let bbox = parse_bounding_box(&child_text(node, "Entity", "BoundingBox")?)?;
    let mut entity = Entity::new(bbox);
    entity.cluster_id = parse_i32(
        "Entity",
        "Named_Entity_Id",
        &child_text(node, "Entity", "Named_Entity_Id")?,
    )?;
    entity.active_tag = parse_bool("Active_Tag", &child_text(node, "Entity", "Active_Tag")?)?;

    for tag in elements(child(node, "Entity", "Tags")?, "Tag") {
        let label = child_text(tag, "Tag", "Label")?;
        let value = child_text(tag, "Tag", "Value")?;
        let confidence = value.parse::<f64>().map_err(|_| ComicError::InvalidNumber {
            element: "Tag",
            key: "Value".to_string(),
            value,
        })?;
        entity.tags.push((label, confidence));
    }
    Ok(entity)
}

fn parse_speech_bubble(node: Node, panel_entities: &[Entity]) -> Result<SpeechBubble> {
    let bbox = parse_bounding_box(&child_text(node, "SpeechBubble", "BoundingBox")?)?;
    let text = unescape_text(&child_text(node, "SpeechBubble", "Text")?).into_owned();

    let mut bubble = SpeechBubble::new(SpeechBubbleKind::Speech, text, bbox);
    bubble.label = child_text(node, "SpeechBubble", "Type")?;
    bubble.kind = SpeechBubbleKind::from_label(&bubble.label);
    bubble.speaker_id = parse_i32(
        "SpeechBubble",
        "Speaker_Id",
        &child_text(node, "SpeechBubble", "Speaker_Id")?,
    )?;

    // Speakers come in as full entity subtrees; re-link them to the
    // panel's own entities by identity (box + cluster id). A speaker
    // that matches nothing is dropped, not fatal.
    for speaker in elements(child(node, "SpeechBubble", "Speakers")?, "Entity") {
        let speaker = parse_entity(speaker)?;
        let linked = panel_entities.iter().position(|e| {
            e.bounding_box == speaker.bounding_box && e.cluster_id == speaker.cluster_id
        });
        match linked {
            Some(i) => bubble.speakers.push(i),
            None => debug!(cluster_id = speaker.cluster_id, "dropped unresolvable speaker"),
        }
    }
    Ok(bubble)
}

/// Parses the comma-joined `key:value` bounding-box form. The four
/// geometric keys and `confidence` must be numeric (an empty value
/// reads as 0.0); unknown keys are retained verbatim as pass-through.
fn parse_bounding_box(text: &str) -> Result<BoundingBox> {
    let mut bbox = BoundingBox::default();
    let (mut have_x, mut have_y, mut have_w, mut have_h) = (false, false, false, false);

    for part in text.split(',') {
        let (key, value) = part.split_once(':').unwrap_or((part, ""));
        match key {
            "x" | "y" | "width" | "height" | "confidence" => {
                let number = parse_bbox_number(key, value)?;
                match key {
                    "x" => (bbox.x, have_x) = (number, true),
                    "y" => (bbox.y, have_y) = (number, true),
                    "width" => (bbox.width, have_w) = (number, true),
                    "height" => (bbox.height, have_h) = (number, true),
                    _ => bbox.confidence = Some(number),
                }
            }
            _ => {
                bbox.extra.insert(key.to_string(), value.to_string());
            }
        }
    }

    for (have, key) in [
        (have_x, "x"),
        (have_y, "y"),
        (have_w, "width"),
        (have_h, "height"),
    ] {
        if !have {
            return Err(ComicError::MissingBBoxKey(key));
        }
    }
    Ok(bbox)
}

fn parse_bbox_number(key: &str, value: &str) -> Result<f64> {
    if value.is_empty() {
        return Ok(0.0);
    }
    value.parse::<f64>().map_err(|_| ComicError::InvalidNumber {
        element: "BoundingBox",
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Boolean literals are exactly `true`/`false`, case-insensitive after
/// trimming; anything else is fatal, never defaulted.
fn parse_bool(element: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ComicError::InvalidBool {
            element,
            value: value.to_string(),
        }),
    }
}

fn parse_i32(element: &'static str, key: &str, value: &str) -> Result<i32> {
    value.trim().parse::<i32>().map_err(|_| ComicError::InvalidNumber {
        element,
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(element: &'static str, key: &str, value: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| ComicError::InvalidNumber {
        element,
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn find<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name(name))
}

fn child<'a, 'input>(
    node: Node<'a, 'input>,
    parent: &'static str,
    name: &'static str,
) -> Result<Node<'a, 'input>> {
    find(node, name).ok_or(ComicError::MissingElement {
        element: parent,
        child: name,
    })
}

fn child_text(node: Node, parent: &'static str, name: &'static str) -> Result<String> {
    Ok(child(node, parent, name)?.text().unwrap_or("").to_string())
}

fn elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |c| c.has_tag_name(name))
}
