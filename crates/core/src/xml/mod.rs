//! Structural serialization: the comic tree to and from its textual
//! interchange format.
//!
//! The element names, the comma-joined `key:value` bounding-box form
//! and the text-escaping table are the wire contract; previously
//! exported documents must keep parsing bit-for-bit.

mod escape;
mod parser;
mod writer;

pub use escape::{escape_text, unescape_text};
pub use parser::parse_comic;
pub use writer::{StructureWriter, export_comic};
