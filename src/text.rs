/// Parsed caption text: raw string, chunks and break offsets.
pub mod data;
/// The line-breaking layout engine and its output types.
pub mod layout;
/// Markup tag parsing.
pub mod tags;
/// Word boundary detection.
pub mod words;

mod color;

pub use color::{Color, DEFAULT_TEXT_COLOR, parse_color};
pub use data::TaggedText;
pub use layout::{
    FloatingImage, HorizontalAlign, ImageSide, SpriteRun, TextLayout, TextLayoutConfig,
    TextLayoutLine, TextRun,
};
pub use tags::{Chunk, Tag, TagKind};
