/// Formatting instruction recognized inside `[...]` markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    Bold,
    Italic,
    Font,
    Size,
    Color,
    ImageLeft,
    ImageRight,
    Icon,
    /// The bracketed text did not name a known tag and stays literal.
    Invalid,
}

impl TagKind {
    /// Maps a tag name as written in markup to its kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "b" => Self::Bold,
            "i" => Self::Italic,
            "font" => Self::Font,
            "size" => Self::Size,
            "color" => Self::Color,
            "imgleft" => Self::ImageLeft,
            "imgright" => Self::ImageRight,
            "icon" => Self::Icon,
            _ => Self::Invalid,
        }
    }

    /// Self-closing tags anchor at a single offset and never take an end tag.
    pub fn is_self_closing(self) -> bool {
        matches!(self, Self::ImageLeft | Self::ImageRight | Self::Icon)
    }

    /// Paired tags stay active until the matching `[/name]`.
    pub fn is_paired(self) -> bool {
        matches!(
            self,
            Self::Bold | Self::Italic | Self::Font | Self::Size | Self::Color
        )
    }

    fn takes_value(self) -> bool {
        !matches!(self, Self::Bold | Self::Italic | Self::Invalid)
    }
}

/// A parsed start tag with its value and trailing `key=value` attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    pub value: String,
    pub attributes: Vec<(String, String)>,
}

impl Tag {
    pub fn new(kind: TagKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            attributes: Vec::new(),
        }
    }

    /// Returns the value of the first attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Half-open range `[from, to)` of raw text sharing one set of active tags.
///
/// A chunk with `from == to` is a marker: it carries exactly one self-closing
/// tag anchored at that offset and is not part of the text partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub from: usize,
    pub to: usize,
    pub tags: Vec<Tag>,
}

impl Chunk {
    pub fn is_marker(&self) -> bool {
        self.from == self.to
    }

    /// Returns the active tag of the given kind, if any.
    pub fn tag(&self, kind: TagKind) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.kind == kind)
    }
}

/// Interior of a bracket pair that parsed as a recognized tag.
#[derive(Clone, Debug, PartialEq, Eq)]
enum ParsedTag {
    Start(Tag),
    End(TagKind),
}

impl ParsedTag {
    /// Tokenizes `name[=value][ key=value]*` or `/name`.
    ///
    /// `None` means the bracketed text must be kept as literal text.
    fn parse(body: &str) -> Option<Self> {
        if let Some(name) = body.strip_prefix('/') {
            let kind = TagKind::from_name(name.trim());
            return kind.is_paired().then_some(Self::End(kind));
        }

        let (name, value, mut rest) = next_assignment(body)?;
        let kind = TagKind::from_name(name);
        if kind == TagKind::Invalid {
            return None;
        }

        let value = match (kind.takes_value(), value) {
            (true, Some(value)) if !value.is_empty() => value,
            (false, None) => String::new(),
            _ => return None,
        };

        let mut tag = Tag::new(kind, value);
        while !rest.is_empty() {
            let (key, value, remaining) = next_assignment(rest)?;
            tag.attributes.push((key.to_string(), value?));
            rest = remaining;
        }

        Some(Self::Start(tag))
    }
}

/// Reads one `key` or `key=value` token, where the value may be quoted.
///
/// Returns the key, the optional value and the remaining input with leading
/// whitespace removed.
fn next_assignment(input: &str) -> Option<(&str, Option<String>, &str)> {
    let input = input.trim_start();
    let key_end = input
        .find(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
        .unwrap_or(input.len());
    if key_end == 0 {
        return None;
    }
    let (key, rest) = input.split_at(key_end);

    let Some(rest) = rest.strip_prefix('=') else {
        // a bare key must be followed by whitespace or nothing at all
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        return Some((key, None, rest.trim_start()));
    };

    if let Some(quoted) = rest.strip_prefix('"') {
        let close = quoted.find('"')?;
        let after = &quoted[close + 1..];
        if !after.is_empty() && !after.starts_with(char::is_whitespace) {
            return None;
        }
        return Some((key, Some(quoted[..close].to_string()), after.trim_start()));
    }

    let value_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (value, after) = rest.split_at(value_end);
    Some((key, Some(value.to_string()), after.trim_start()))
}

/// Strips markup from `input`, returning the raw text and its chunks.
///
/// Chunks come out in document order; a marker chunk precedes the text chunk
/// that starts at the same offset.
pub fn parse_markup(input: &str) -> (String, Vec<Chunk>) {
    let mut raw = String::with_capacity(input.len());
    let mut chunks = Vec::new();
    let mut open: Vec<Tag> = Vec::new();
    let mut chunk_from = 0;
    let mut rest = input;

    while let Some(start) = rest.find('[') {
        raw.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find(']') else {
            // unclosed bracket: the remainder is literal text
            raw.push_str(&rest[start..]);
            rest = "";
            break;
        };

        if let Some(nested) = after[..end].find('[') {
            raw.push_str(&rest[start..start + 1 + nested]);
            rest = &after[nested..];
            continue;
        }

        let body = &after[..end];
        rest = &after[end + 1..];

        match ParsedTag::parse(body) {
            Some(ParsedTag::Start(tag)) if tag.kind.is_self_closing() => {
                finalize_chunk(&mut chunks, &open, chunk_from, raw.len());
                chunk_from = raw.len();
                chunks.push(Chunk {
                    from: raw.len(),
                    to: raw.len(),
                    tags: vec![tag],
                });
            }
            Some(ParsedTag::Start(tag)) => {
                finalize_chunk(&mut chunks, &open, chunk_from, raw.len());
                chunk_from = raw.len();
                open.retain(|active| active.kind != tag.kind);
                open.push(tag);
            }
            Some(ParsedTag::End(kind)) => {
                // closing a tag that is not open changes nothing
                if open.iter().any(|active| active.kind == kind) {
                    finalize_chunk(&mut chunks, &open, chunk_from, raw.len());
                    chunk_from = raw.len();
                    open.retain(|active| active.kind != kind);
                }
            }
            None => {
                log::warn!("Unrecognized markup tag `[{}]` kept as text.", body);
                raw.push('[');
                raw.push_str(body);
                raw.push(']');
            }
        }
    }

    raw.push_str(rest);
    finalize_chunk(&mut chunks, &open, chunk_from, raw.len());

    (raw, chunks)
}

fn finalize_chunk(chunks: &mut Vec<Chunk>, open: &[Tag], from: usize, to: usize) {
    if to > from {
        chunks.push(Chunk {
            from,
            to,
            tags: open.to_vec(),
        });
    }
}
