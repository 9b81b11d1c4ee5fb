use crate::text::{
    tags::{Chunk, parse_markup},
    words::word_boundaries,
};

/// Caption text with its markup resolved.
///
/// Parsing strips the tags into [`Chunk`] annotations over the raw text and
/// records where lines may break. The value is immutable; setting a new
/// caption means parsing a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggedText {
    raw: String,
    chunks: Vec<Chunk>,
    words: Vec<usize>,
}

impl Default for TaggedText {
    fn default() -> Self {
        Self::parse("")
    }
}

impl TaggedText {
    /// Parses markup such as `Hello [b]there[/b] [icon=star]`.
    pub fn parse(source: &str) -> Self {
        let (raw, chunks) = parse_markup(source);
        let words = word_boundaries(&raw);
        Self { raw, chunks, words }
    }

    /// The text with all recognized tags removed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Chunks in document order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Sorted break offsets, starting at `0` and ending at `raw().len()`.
    pub fn words(&self) -> &[usize] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.chunks.is_empty()
    }

    /// Iterates over the `[from, to)` ranges between consecutive breaks.
    pub fn segments(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.words.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tags::TagKind;

    #[test]
    fn test_parse_collects_words() {
        let text = TaggedText::parse("Hello [b]there[/b] [icon=star] friend");
        assert_eq!(text.raw(), "Hello there  friend");
        assert_eq!(text.words(), &[0, 6, 12, 13, 19]);
        assert_eq!(
            text.segments().collect::<Vec<_>>(),
            vec![(0, 6), (6, 12), (12, 13), (13, 19)]
        );
        assert_eq!(
            text.chunks()
                .iter()
                .filter(|chunk| chunk.tag(TagKind::Icon).is_some())
                .count(),
            1
        );
    }

    #[test]
    fn test_default_is_empty() {
        let text = TaggedText::default();
        assert!(text.is_empty());
        assert_eq!(text.words(), &[0, 0]);
        assert_eq!(text.segments().count(), 1);
    }

    #[test]
    fn test_icon_only_is_not_empty() {
        let text = TaggedText::parse("[icon=x]");
        assert!(!text.is_empty());
        assert_eq!(text.raw(), "");
    }
}
