//! Document model for reconstructed comics.
//!
//! The ownership tree is Comic → PagePair → Page → Panel →
//! {Entity, SpeechBubble}. Cross-cutting views (speech-bubble speakers,
//! scene groupings) are relation-only references into that tree, never
//! shared ownership.

mod comic;
mod entity;
mod page;
mod panel;
mod speech_bubble;

pub use comic::{Comic, PanelRef};
pub use entity::{ENTITY_NAME_PLACEHOLDER, Entity};
pub use page::{Page, PagePair, PageType};
pub use panel::Panel;
pub use speech_bubble::{SpeechBubble, SpeechBubbleKind};
