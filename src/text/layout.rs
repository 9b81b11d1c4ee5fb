use std::ops::Range;

use euclid::default::{Box2D, Point2D, Size2D, Vector2D};

use crate::{
    error::LayoutError,
    font_storage::FontMetrics,
    icon::IconRegistry,
    text::{
        color::{Color, DEFAULT_TEXT_COLOR},
        data::TaggedText,
    },
};

/// Configuration knobs used by the text layout pipeline.
///
/// All parameters are honored during a single [`TaggedText::layout`] call so
/// the caller can measure or place captions inside arbitrary widgets.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayoutConfig {
    /// GUI font name used where no `[font]` tag is active.
    pub font: String,
    /// Width of the area text wraps inside; `None` disables wrapping.
    pub max_width: Option<f32>,
    /// Padding kept between the text and the area edges (and floating images).
    pub buffer_zone: f32,
    pub horizontal_align: HorizontalAlign,
    /// Replaces the text height of the first line, which is not preceded by
    /// line spacing.
    pub first_line_height: Option<f32>,
    pub default_color: Color,
}

impl Default for TextLayoutConfig {
    fn default() -> Self {
        Self {
            font: "sans-14".to_string(),
            max_width: None,
            buffer_zone: 0.0,
            horizontal_align: HorizontalAlign::Left,
            first_line_height: None,
            default_color: DEFAULT_TEXT_COLOR,
        }
    }
}

impl TextLayoutConfig {
    /// Checks the preconditions of a layout pass.
    pub fn validate(&self) -> Result<(), LayoutError> {
        fn is_length(value: f32) -> bool {
            value.is_finite() && value >= 0.0
        }

        if self.font.is_empty() {
            return Err(LayoutError::MissingFont);
        }
        if let Some(width) = self.max_width
            && !is_length(width)
        {
            return Err(LayoutError::InvalidWidth(width));
        }
        if !is_length(self.buffer_zone) {
            return Err(LayoutError::InvalidBufferZone(self.buffer_zone));
        }
        if let Some(height) = self.first_line_height
            && !is_length(height)
        {
            return Err(LayoutError::InvalidLineHeight(height));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Horizontal justification applied after each line is assembled.
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Margin a floating image is anchored to.
pub enum ImageSide {
    Left,
    Right,
}

/// Vertical band in which an `[imgleft]`/`[imgright]` image indents text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatingImage {
    pub side: ImageSide,
    pub y_from: f32,
    pub y_to: f32,
    /// Horizontal indentation applied to lines inside the band.
    pub width: f32,
}

impl FloatingImage {
    /// Whether a line starting at `y` is indented by this image.
    pub fn covers(&self, y: f32) -> bool {
        self.y_from <= y && y < self.y_to
    }
}

/// Positioned, styled piece of text ready for the renderer.
///
/// Icons appear as runs with an empty `text` and a `sprite_run` index, so they
/// flow inline like zero-length words.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub position: Point2D<f32>,
    pub size: Size2D<f32>,
    pub text: String,
    pub font: String,
    pub color: Color,
    /// Set when a `[color]` tag supplied `color`.
    pub use_custom_color: bool,
    pub bold: bool,
    pub italic: bool,
    /// Markup never sets this; widgets decorating runs (links) may.
    pub underline: bool,
    /// Index into [`TextLayout::sprite_runs`].
    pub sprite_run: Option<usize>,
}

/// Sprite drawn as part of a caption: inline icons and floating images.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteRun {
    pub area: Box2D<f32>,
    pub sprite: String,
    pub cell_id: Option<u32>,
    pub tooltip: Option<String>,
    pub tooltip_style: Option<String>,
}

/// A committed line of the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayoutLine {
    pub top: f32,
    pub height: f32,
    /// Measured width of the content, before alignment.
    pub width: f32,
    /// Indices into [`TextLayout::text_runs`].
    pub runs: Range<usize>,
}

/// Final layout output produced by [`TaggedText::layout`].
///
/// **Y-axis goes down.** Every run carries final coordinates relative to the
/// top-left corner of the laid-out area.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayout {
    pub text_runs: Vec<TextRun>,
    /// Only ever appended to during a pass so `TextRun::sprite_run` indices
    /// stay valid.
    pub sprite_runs: Vec<SpriteRun>,
    pub lines: Vec<TextLayoutLine>,
    pub floating_images: Vec<FloatingImage>,
    /// Widest line and bottom of the lowest line or floating image.
    pub size: Size2D<f32>,
}

impl TextLayout {
    /// Returns the sprite an icon run refers to.
    pub fn sprite_run_of(&self, run: &TextRun) -> Option<&SpriteRun> {
        run.sprite_run.and_then(|index| self.sprite_runs.get(index))
    }

    pub fn runs_of(&self, line: &TextLayoutLine) -> &[TextRun] {
        self.text_runs.get(line.runs.clone()).unwrap_or(&[])
    }

    /// Lines intersecting the vertical window `[offset, offset + extent)`,
    /// typically a scroll position and the widget height.
    pub fn lines_in_view(
        &self,
        offset: f32,
        extent: f32,
    ) -> impl Iterator<Item = &TextLayoutLine> + '_ {
        self.lines
            .iter()
            .filter(move |line| line.top + line.height > offset && line.top < offset + extent)
    }
}

/// Measurements of a committed line kept until alignment is applied.
struct LineRecord {
    top: f32,
    height: f32,
    width: f32,
    range_from: f32,
    range_to: Option<f32>,
    runs: Range<usize>,
}

impl TaggedText {
    /// Computes the size that [`Self::layout`] would produce.
    pub fn measure(
        &self,
        config: &TextLayoutConfig,
        font_metrics: &mut impl FontMetrics,
        icons: &IconRegistry,
    ) -> Result<Size2D<f32>, LayoutError> {
        self.layout(config, font_metrics, icons)
            .map(|layout| layout.size)
    }

    /// Word-wraps the text into positioned runs.
    ///
    /// The implementation follows a two-stage pipeline:
    /// 1. Every word segment is split along chunk borders into measured
    ///    pieces carrying their resolved style.
    /// 2. Lines are assembled greedily from whole segments. Each line gets the
    ///    width left over by the floating images overlapping it; a segment
    ///    that fits nowhere is placed alone on its line.
    ///
    /// Horizontal alignment is applied once all lines are known so unbounded
    /// layouts can align against the widest line.
    pub fn layout(
        &self,
        config: &TextLayoutConfig,
        font_metrics: &mut impl FontMetrics,
        icons: &IconRegistry,
    ) -> Result<TextLayout, LayoutError> {
        config.validate()?;

        let styles: Vec<_> = self
            .chunks()
            .iter()
            .map(|chunk| layout_utl::RunStyle::resolve(&chunk.tags, config))
            .collect();
        let segments = self.collect_segments(&styles, font_metrics, icons);

        let buffer_zone = config.buffer_zone;
        let mut layout = TextLayout::default();
        let mut records: Vec<LineRecord> = Vec::new();
        let mut float_sprites: Vec<(usize, ImageSide)> = Vec::new();

        let mut y = buffer_zone;
        let mut first_line = true;
        let mut registered = 0;
        let mut i = 0;

        while i < segments.len() {
            // Images anchored in the first segment already indent this line.
            if registered <= i {
                layout_utl::register_floats(
                    &segments[i],
                    y,
                    config,
                    &mut layout,
                    &mut float_sprites,
                );
                registered = i + 1;
            }

            let (range_from, range_to) =
                layout_utl::width_range(&layout.floating_images, y, config);
            let available = range_to.map(|to| to - range_from);

            if let Some(available) = available
                && segments[i].width > available
                && let Some(below) = layout_utl::narrowing_image_end(&layout.floating_images, y)
            {
                y = below;
                continue;
            }

            let mut j = i;
            let mut line_width = 0.0;
            while j < segments.len() {
                let segment = &segments[j];
                if segment.newline {
                    j += 1;
                    break;
                }
                if let Some(available) = available
                    && j != i
                    && line_width + segment.width > available
                {
                    break;
                }
                line_width += segment.width;
                j += 1;
            }

            let height = segments[i..j]
                .iter()
                .flat_map(|segment| &segment.pieces)
                .map(|piece| piece.line_height(first_line, config.first_line_height))
                .fold(0.0, f32::max);

            let run_start = layout.text_runs.len();
            let mut x = range_from;
            for piece in segments[i..j].iter().flat_map(|segment| &segment.pieces) {
                let piece_height = piece.line_height(first_line, config.first_line_height);
                let origin = Point2D::new(x, y + height - piece_height);

                match &piece.kind {
                    layout_utl::PieceKind::Text { text, style } => {
                        let style = &styles[*style];
                        layout.text_runs.push(TextRun {
                            position: origin,
                            size: Size2D::new(piece.size.width, piece_height),
                            text: (*text).to_string(),
                            font: style.font.clone(),
                            color: style.color,
                            use_custom_color: style.use_custom_color,
                            bold: style.bold,
                            italic: style.italic,
                            underline: false,
                            sprite_run: None,
                        });
                    }
                    layout_utl::PieceKind::Icon { icon, tag } => {
                        let displace = tag
                            .attribute("displace")
                            .and_then(layout_utl::parse_displacement)
                            .unwrap_or_else(Vector2D::zero);
                        let sprite_index = layout.sprite_runs.len();
                        layout.sprite_runs.push(SpriteRun {
                            area: Box2D::from_origin_and_size(origin + displace, icon.size),
                            sprite: icon.sprite.clone(),
                            cell_id: icon.cell_id,
                            tooltip: tag.attribute("tooltip").map(str::to_string),
                            tooltip_style: tag.attribute("tooltip_style").map(str::to_string),
                        });
                        layout.text_runs.push(TextRun {
                            position: origin,
                            size: icon.size,
                            text: String::new(),
                            font: config.font.clone(),
                            color: config.default_color,
                            use_custom_color: false,
                            bold: false,
                            italic: false,
                            underline: false,
                            sprite_run: Some(sprite_index),
                        });
                    }
                    layout_utl::PieceKind::Newline | layout_utl::PieceKind::Float { .. } => {}
                }

                x += piece.size.width;
            }

            // Images found later on the line indent the following lines.
            for segment in segments.iter().take(j).skip(registered) {
                layout_utl::register_floats(segment, y, config, &mut layout, &mut float_sprites);
            }
            registered = registered.max(j);

            records.push(LineRecord {
                top: y,
                height,
                width: line_width,
                range_from,
                range_to,
                runs: run_start..layout.text_runs.len(),
            });

            y += height;
            first_line = false;
            i = j;
        }

        let total_width = records
            .iter()
            .map(|record| record.width)
            .fold(0.0, f32::max);

        for record in records {
            let available = record
                .range_to
                .map(|to| to - record.range_from)
                .unwrap_or(total_width);
            let dx = match config.horizontal_align {
                HorizontalAlign::Left => 0.0,
                HorizontalAlign::Center => (available - record.width) / 2.0,
                HorizontalAlign::Right => available - record.width,
            }
            .max(0.0);

            if dx != 0.0 {
                for run in &mut layout.text_runs[record.runs.clone()] {
                    run.position.x += dx;
                    if let Some(sprite) = run
                        .sprite_run
                        .and_then(|index| layout.sprite_runs.get_mut(index))
                    {
                        sprite.area = sprite.area.translate(Vector2D::new(dx, 0.0));
                    }
                }
            }

            layout.lines.push(TextLayoutLine {
                top: record.top,
                height: record.height,
                width: record.width,
                runs: record.runs,
            });
        }

        // Right images hug the right edge, which for unbounded layouts is
        // only known now.
        let content_right = config
            .max_width
            .map(|width| width - buffer_zone)
            .unwrap_or(buffer_zone + total_width);
        let mut bottom = layout
            .lines
            .last()
            .map(|line| line.top + line.height)
            .unwrap_or(0.0);

        for (index, side) in float_sprites {
            let Some(sprite) = layout.sprite_runs.get_mut(index) else {
                continue;
            };
            if side == ImageSide::Right {
                let width = sprite.area.width();
                sprite.area.min.x = content_right - width;
                sprite.area.max.x = content_right;
            }
            bottom = bottom.max(sprite.area.max.y);
        }

        layout.size = Size2D::new(total_width, bottom);
        Ok(layout)
    }

    /// Splits every word segment into measured pieces.
    ///
    /// A marker chunk at offset `o` belongs to the segment `[from, to)` with
    /// `from <= o < to`, or to the last segment when `o` is the end of the
    /// text. Markers after a trailing newline get a segment of their own so
    /// they land on the next line. Segments without pieces are dropped.
    fn collect_segments<'a>(
        &'a self,
        styles: &[layout_utl::RunStyle],
        font_metrics: &mut impl FontMetrics,
        icons: &'a IconRegistry,
    ) -> Vec<layout_utl::WordSegment<'a>> {
        let chunks = self.chunks();
        let trailing_newline = self.raw().ends_with('\n');
        let last_segment = self.words().len().saturating_sub(2);
        let mut cursor = 0;
        let mut segments = Vec::with_capacity(self.words().len());

        for (index, (from, to)) in self.segments().enumerate() {
            let is_last = index == last_segment && !trailing_newline;

            while cursor < chunks.len() {
                let chunk = &chunks[cursor];
                let passed = if chunk.is_marker() {
                    chunk.from < from
                } else {
                    chunk.to <= from
                };
                if !passed {
                    break;
                }
                cursor += 1;
            }

            let mut segment = layout_utl::WordSegment::default();
            for (chunk_index, chunk) in chunks.iter().enumerate().skip(cursor) {
                if chunk.from > to || (chunk.from == to && !(is_last && chunk.is_marker())) {
                    break;
                }

                if chunk.is_marker() {
                    if let Some(piece) = layout_utl::Piece::marker(chunk, icons) {
                        segment.push(piece);
                    }
                    continue;
                }

                let start = from.max(chunk.from);
                let end = to.min(chunk.to);
                if end <= start {
                    continue;
                }

                let font = &styles[chunk_index].font;
                let text = &self.raw()[start..end];
                let spacing = font_metrics.line_spacing(font);
                let piece = if text == "\n" {
                    let height = font_metrics.measure(font, "").height;
                    layout_utl::Piece {
                        kind: layout_utl::PieceKind::Newline,
                        size: Size2D::new(0.0, height),
                        spacing,
                    }
                } else {
                    layout_utl::Piece {
                        kind: layout_utl::PieceKind::Text {
                            text,
                            style: chunk_index,
                        },
                        size: font_metrics.measure(font, text),
                        spacing,
                    }
                };
                segment.push(piece);
            }

            if !segment.pieces.is_empty() {
                segments.push(segment);
            }
        }

        if trailing_newline {
            let end = self.raw().len();
            let mut segment = layout_utl::WordSegment::default();
            for chunk in chunks
                .iter()
                .filter(|chunk| chunk.is_marker() && chunk.from == end)
            {
                if let Some(piece) = layout_utl::Piece::marker(chunk, icons) {
                    segment.push(piece);
                }
            }
            if !segment.pieces.is_empty() {
                segments.push(segment);
            }
        }

        segments
    }
}

mod layout_utl {
    use super::*;
    use crate::{
        font_name::FontName,
        icon::Icon,
        text::{
            color::parse_color,
            tags::{Chunk, Tag, TagKind},
        },
    };

    /// Style of one chunk after applying its active tags to the config.
    #[derive(Clone, Debug)]
    pub struct RunStyle {
        pub font: String,
        pub color: Color,
        pub use_custom_color: bool,
        pub bold: bool,
        pub italic: bool,
    }

    impl RunStyle {
        /// Resolves the tags of a chunk.
        ///
        /// `[b]`, `[i]` and `[size]` rewrite the font name when it follows the
        /// GUI naming scheme; any other name is passed through for the font
        /// collaborator to resolve or replace.
        pub fn resolve(tags: &[Tag], config: &TextLayoutConfig) -> Self {
            let mut style = Self {
                font: config.font.clone(),
                color: config.default_color,
                use_custom_color: false,
                bold: false,
                italic: false,
            };
            let mut size = None;

            for tag in tags {
                match tag.kind {
                    TagKind::Bold => style.bold = true,
                    TagKind::Italic => style.italic = true,
                    TagKind::Font => style.font = tag.value.clone(),
                    TagKind::Size => match parse_size(&tag.value) {
                        Some(value) => size = Some(value),
                        None => log::warn!("Invalid font size `{}` ignored.", tag.value),
                    },
                    TagKind::Color => match parse_color(&tag.value) {
                        Some(color) => {
                            style.color = color;
                            style.use_custom_color = true;
                        }
                        None => log::warn!("Invalid color `{}` ignored.", tag.value),
                    },
                    _ => {}
                }
            }

            if (style.bold || style.italic || size.is_some())
                && let Some(mut name) = FontName::parse(&style.font)
            {
                name.bold |= style.bold;
                name.italic |= style.italic;
                if let Some(size) = size {
                    name.size = size;
                }
                style.font = name.to_string();
            }

            style
        }
    }

    fn parse_size(value: &str) -> Option<u32> {
        let size: f32 = value.trim().parse().ok()?;
        (size.is_finite() && size >= 1.0).then(|| size.round() as u32)
    }

    /// Parses an icon `displace` attribute such as `"0 3"`.
    pub fn parse_displacement(value: &str) -> Option<Vector2D<f32>> {
        let mut parts = value.split_whitespace().map(str::parse::<f32>);
        let x = parts.next()?.ok()?;
        let y = parts.next()?.ok()?;
        if parts.next().is_some() {
            log::warn!("Invalid icon displacement `{}` ignored.", value);
            return None;
        }
        Some(Vector2D::new(x, y))
    }

    pub enum PieceKind<'a> {
        Text { text: &'a str, style: usize },
        Newline,
        Icon { icon: &'a Icon, tag: &'a Tag },
        Float { side: ImageSide, icon: &'a Icon },
    }

    /// A measured part of a word segment.
    pub struct Piece<'a> {
        pub kind: PieceKind<'a>,
        /// Advance width and text height.
        pub size: Size2D<f32>,
        /// Line height used on every line but the first.
        pub spacing: f32,
    }

    impl<'a> Piece<'a> {
        /// Builds the piece for a marker chunk, dropping unknown icons.
        pub fn marker(chunk: &'a Chunk, icons: &'a IconRegistry) -> Option<Self> {
            let tag = chunk.tags.first()?;
            let side = match tag.kind {
                TagKind::Icon => None,
                TagKind::ImageLeft => Some(ImageSide::Left),
                TagKind::ImageRight => Some(ImageSide::Right),
                _ => return None,
            };

            let Some(icon) = icons.get(&tag.value) else {
                log::warn!("Icon `{}` does not exist.", tag.value);
                return None;
            };

            Some(match side {
                None => Self {
                    kind: PieceKind::Icon { icon, tag },
                    size: icon.size,
                    spacing: icon.size.height,
                },
                Some(side) => Self {
                    kind: PieceKind::Float { side, icon },
                    size: Size2D::zero(),
                    spacing: 0.0,
                },
            })
        }

        /// Height this piece needs on its line.
        pub fn line_height(&self, first_line: bool, first_line_height: Option<f32>) -> f32 {
            match self.kind {
                PieceKind::Text { .. } | PieceKind::Newline if first_line => {
                    first_line_height.unwrap_or(self.size.height)
                }
                PieceKind::Text { .. } | PieceKind::Newline => self.spacing,
                PieceKind::Icon { .. } => self.size.height,
                PieceKind::Float { .. } => 0.0,
            }
        }
    }

    /// Pieces between two consecutive word boundaries.
    #[derive(Default)]
    pub struct WordSegment<'a> {
        pub pieces: Vec<Piece<'a>>,
        pub width: f32,
        pub newline: bool,
    }

    impl<'a> WordSegment<'a> {
        pub fn push(&mut self, piece: Piece<'a>) {
            self.width += piece.size.width;
            self.newline |= matches!(piece.kind, PieceKind::Newline);
            self.pieces.push(piece);
        }
    }

    /// Adds the floating images of `segment`, stacking each below earlier
    /// images on the same side.
    pub fn register_floats(
        segment: &WordSegment<'_>,
        y: f32,
        config: &TextLayoutConfig,
        layout: &mut TextLayout,
        float_sprites: &mut Vec<(usize, ImageSide)>,
    ) {
        for piece in &segment.pieces {
            let PieceKind::Float { side, icon } = piece.kind else {
                continue;
            };

            let y_from = layout
                .floating_images
                .iter()
                .filter(|image| image.side == side)
                .map(|image| image.y_to)
                .fold(y, f32::max);

            layout.floating_images.push(FloatingImage {
                side,
                y_from,
                y_to: y_from + icon.size.height + config.buffer_zone,
                width: icon.size.width + config.buffer_zone,
            });

            // right images are moved to the right edge once it is known
            float_sprites.push((layout.sprite_runs.len(), side));
            layout.sprite_runs.push(SpriteRun {
                area: Box2D::from_origin_and_size(
                    Point2D::new(config.buffer_zone, y_from),
                    icon.size,
                ),
                sprite: icon.sprite.clone(),
                cell_id: icon.cell_id,
                tooltip: None,
                tooltip_style: None,
            });
        }
    }

    /// Horizontal range available to a line starting at `y`.
    ///
    /// The end is `None` when wrapping is disabled.
    pub fn width_range(
        images: &[FloatingImage],
        y: f32,
        config: &TextLayoutConfig,
    ) -> (f32, Option<f32>) {
        let indent = |side: ImageSide| {
            images
                .iter()
                .filter(|image| image.side == side && image.covers(y))
                .map(|image| image.width)
                .fold(0.0, f32::max)
        };

        let from = config.buffer_zone + indent(ImageSide::Left);
        let to = config
            .max_width
            .map(|width| (width - config.buffer_zone - indent(ImageSide::Right)).max(from));
        (from, to)
    }

    /// Where the nearest image indenting a line at `y` ends.
    pub fn narrowing_image_end(images: &[FloatingImage], y: f32) -> Option<f32> {
        images
            .iter()
            .filter(|image| image.covers(y))
            .map(|image| image.y_to)
            .reduce(f32::min)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        icon::Icon,
        test_utl::{FixedAdvance, test_icons},
        text::words::word_boundaries,
    };

    fn config(max_width: Option<f32>) -> TextLayoutConfig {
        TextLayoutConfig {
            max_width,
            ..TextLayoutConfig::default()
        }
    }

    fn run_layout(source: &str, config: &TextLayoutConfig) -> TextLayout {
        TaggedText::parse(source)
            .layout(config, &mut FixedAdvance::new(), &test_icons())
            .unwrap()
    }

    fn texts(layout: &TextLayout) -> Vec<&str> {
        layout.text_runs.iter().map(|run| run.text.as_str()).collect()
    }

    #[test]
    fn test_single_line_keeps_both_spaces_around_icon() {
        let layout = run_layout(
            "Hello [b]there[/b] [icon=star] friend",
            &config(Some(1000.0)),
        );

        // six runs, not four: the spaces on each side of the icon are separate words
        assert_eq!(texts(&layout), vec!["Hello ", "there", " ", "", " ", "friend"]);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.size, Size2D::new(200.0, 12.0));

        let bold: Vec<_> = layout.text_runs.iter().map(|run| run.bold).collect();
        assert_eq!(bold, vec![false, true, false, false, false, false]);
        assert_eq!(layout.text_runs[1].font, "sans-bold-14");

        assert_eq!(layout.sprite_runs.len(), 1);
        let icon_run = &layout.text_runs[3];
        assert_eq!(icon_run.sprite_run, Some(0));
        assert_eq!(icon_run.position, Point2D::new(120.0, 2.0));
        assert_eq!(layout.sprite_run_of(icon_run).unwrap().sprite, "star_sprite");

        let xs: Vec<_> = layout.text_runs.iter().map(|run| run.position.x).collect();
        assert_eq!(xs, vec![0.0, 60.0, 110.0, 120.0, 130.0, 140.0]);
    }

    #[test]
    fn test_wraps_at_word_boundaries() {
        let layout = run_layout("aaa bbb ccc", &config(Some(75.0)));

        assert_eq!(layout.lines.len(), 2);
        assert_eq!(texts(&layout), vec!["aaa ", "bbb ", "ccc"]);
        assert_eq!(layout.lines[0].runs, 0..1);
        assert_eq!(layout.lines[1].runs, 1..3);
        assert_eq!(layout.lines[1].top, 12.0);
        assert_eq!(layout.text_runs[1].position, Point2D::new(0.0, 12.0));
        // the first line uses the text height, later lines the line spacing
        assert_eq!(layout.size, Size2D::new(70.0, 28.0));
    }

    #[test]
    fn test_long_word_is_placed_alone() {
        let layout = run_layout("a verylongword b", &config(Some(50.0)));

        let lines: Vec<Vec<&str>> = layout
            .lines
            .iter()
            .map(|line| layout.runs_of(line).iter().map(|run| run.text.as_str()).collect())
            .collect();
        assert_eq!(lines, vec![vec!["a "], vec!["verylongword "], vec!["b"]]);
        assert_eq!(layout.size.width, 130.0);
    }

    #[test]
    fn test_lines_fit_unless_single_word() {
        let sources = [
            "the quick brown fox jumps over the lazy dog",
            "a bb ccc dddd eeeee ffffff ggggggg",
            "one-two-three four\nfive six seven-eight",
            "supercalifragilistic is long",
        ];
        for source in sources {
            for width in [30.0, 55.0, 80.0, 120.0] {
                for buffer_zone in [0.0, 4.0] {
                    let config = TextLayoutConfig {
                        max_width: Some(width),
                        buffer_zone,
                        ..TextLayoutConfig::default()
                    };
                    let layout = run_layout(source, &config);
                    for line in &layout.lines {
                        let runs = layout.runs_of(line);
                        let content: String = runs.iter().map(|run| run.text.as_str()).collect();
                        let single_word = word_boundaries(content.trim_end()).len() <= 2;
                        assert!(
                            line.width <= width - buffer_zone || single_word,
                            "{source:?} at {width}: {content:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_newlines_break_and_are_not_drawn() {
        let layout = run_layout("ab\n\ncd", &config(Some(500.0)));

        assert_eq!(texts(&layout), vec!["ab", "cd"]);
        assert_eq!(layout.lines.len(), 3);
        assert!(layout.lines[1].runs.is_empty());
        assert_eq!(layout.size.height, 12.0 + 16.0 + 16.0);
    }

    #[test]
    fn test_icon_after_trailing_newline_starts_next_line() {
        let layout = run_layout("a\n[icon=star]", &config(Some(500.0)));

        assert_eq!(layout.lines.len(), 2);
        assert!(layout.lines[1].top >= layout.lines[0].top + layout.lines[0].height);
        assert_eq!(layout.sprite_runs.len(), 1);
        assert_eq!(layout.sprite_runs[0].area.min, Point2D::new(0.0, 12.0));
        assert_eq!(layout.size.height, 22.0);

        // same line placement as an icon followed by text
        let with_text = run_layout("a\n[icon=star]b", &config(Some(500.0)));
        assert_eq!(with_text.lines.len(), 2);
        assert_eq!(with_text.sprite_runs[0].area.min.x, 0.0);
    }

    #[test]
    fn test_image_after_trailing_newline_starts_next_line() {
        let layout = run_layout("a\n[imgleft=portrait]", &config(Some(500.0)));

        assert_eq!(layout.lines.len(), 2);
        assert_eq!(layout.floating_images.len(), 1);
        assert_eq!(layout.floating_images[0].y_from, 12.0);
        assert_eq!(layout.sprite_runs[0].area.min, Point2D::new(0.0, 12.0));
        assert_eq!(layout.size.height, 32.0);
    }

    #[test]
    fn test_stray_end_tag_keeps_style() {
        let layout = run_layout("[b]x[/i]y[/b]", &config(Some(500.0)));
        assert_eq!(texts(&layout), vec!["xy"]);
        assert!(layout.text_runs[0].bold);
    }

    #[test]
    fn test_newlines_break_without_width() {
        let layout = run_layout("first line\nsecond", &config(None));
        assert_eq!(layout.lines.len(), 2);
        assert_eq!(layout.size.width, 100.0);
    }

    #[test]
    fn test_horizontal_alignment() {
        let mut config = config(Some(100.0));
        config.horizontal_align = HorizontalAlign::Center;
        assert_eq!(run_layout("ab", &config).text_runs[0].position.x, 40.0);

        config.horizontal_align = HorizontalAlign::Right;
        assert_eq!(run_layout("ab", &config).text_runs[0].position.x, 80.0);

        config.horizontal_align = HorizontalAlign::Center;
        config.buffer_zone = 5.0;
        assert_eq!(run_layout("ab", &config).text_runs[0].position.x, 40.0);
    }

    #[test]
    fn test_alignment_moves_icons() {
        let mut config = config(Some(100.0));
        config.horizontal_align = HorizontalAlign::Right;
        let layout = run_layout("[icon=star]", &config);
        assert_eq!(layout.text_runs[0].position.x, 90.0);
        assert_eq!(layout.sprite_runs[0].area.min.x, 90.0);
    }

    #[test]
    fn test_unbounded_alignment_uses_widest_line() {
        let mut config = config(None);
        config.horizontal_align = HorizontalAlign::Center;
        let layout = run_layout("abcd\nab", &config);
        assert_eq!(layout.text_runs[1].position.x, 10.0);
    }

    #[test]
    fn test_color_tags() {
        let layout = run_layout("[color=\"255 0 0\"]r[/color]g[color=zzz]b", &config(None));

        assert!(layout.text_runs[0].use_custom_color);
        assert_eq!(layout.text_runs[0].color, Color::new(255, 0, 0, 255));
        assert!(!layout.text_runs[1].use_custom_color);
        assert_eq!(layout.text_runs[1].color, DEFAULT_TEXT_COLOR);
        assert!(!layout.text_runs[2].use_custom_color);
    }

    #[test]
    fn test_font_and_size_tags() {
        let layout = run_layout(
            "[size=20]a[/size][size=big]b[/size][font=fancy]c[b]d[/b][/font][i]e",
            &config(None),
        );
        let fonts: Vec<_> = layout.text_runs.iter().map(|run| run.font.as_str()).collect();
        assert_eq!(fonts, vec!["sans-20", "sans-14", "fancy", "fancy", "sans-italic-14"]);
        assert!(layout.text_runs[3].bold);
        assert!(layout.text_runs[4].italic);
    }

    #[test]
    fn test_missing_icon_is_dropped() {
        let layout = run_layout("a[icon=nope]b", &config(None));
        assert_eq!(texts(&layout), vec!["a", "b"]);
        assert!(layout.sprite_runs.is_empty());
    }

    #[test]
    fn test_icon_attributes() {
        let layout = run_layout(
            r#"ab[icon=star displace="2 3" tooltip="A star" tooltip_style=gold]"#,
            &config(None),
        );
        let sprite = &layout.sprite_runs[0];
        assert_eq!(sprite.area.min, Point2D::new(22.0, 5.0));
        assert_eq!(sprite.area.max, Point2D::new(32.0, 15.0));
        assert_eq!(sprite.tooltip.as_deref(), Some("A star"));
        assert_eq!(sprite.tooltip_style.as_deref(), Some("gold"));
    }

    #[test]
    fn test_tall_icon_raises_line_height() {
        let mut icons = test_icons();
        icons.insert("tall", Icon::new("tall_sprite", 10.0, 30.0));
        let layout = TaggedText::parse("a[icon=tall]b")
            .layout(&config(None), &mut FixedAdvance::new(), &icons)
            .unwrap();
        assert_eq!(layout.size.height, 30.0);
        // text is bottom-aligned on the line
        assert_eq!(layout.text_runs[0].position.y, 18.0);
    }

    #[test]
    fn test_left_image_indents_overlapping_lines() {
        let layout = run_layout("[imgleft=portrait]aaa bbb ccc ddd", &config(Some(100.0)));

        assert_eq!(texts(&layout), vec!["aaa ", "bbb ", "ccc ", "ddd"]);
        assert_eq!(layout.lines.len(), 3);
        assert_eq!(layout.text_runs[0].position.x, 30.0);
        assert_eq!(layout.text_runs[1].position, Point2D::new(30.0, 12.0));
        assert_eq!(layout.text_runs[2].position, Point2D::new(0.0, 28.0));

        assert_eq!(layout.floating_images.len(), 1);
        assert_eq!(layout.sprite_runs.len(), 1);
        assert_eq!(layout.sprite_runs[0].area.min, Point2D::new(0.0, 0.0));
        assert_eq!(layout.sprite_runs[0].area.max, Point2D::new(30.0, 20.0));
        assert!(layout.text_runs.iter().all(|run| run.sprite_run.is_none()));
        assert_eq!(layout.size.height, 44.0);
    }

    #[test]
    fn test_right_image_hugs_right_edge() {
        let layout = run_layout("[imgright=portrait]aaa", &config(Some(100.0)));
        assert_eq!(layout.sprite_runs[0].area.min.x, 70.0);
        assert_eq!(layout.sprite_runs[0].area.max.x, 100.0);
        assert_eq!(layout.text_runs[0].position.x, 0.0);
    }

    #[test]
    fn test_images_on_one_side_stack() {
        let layout = run_layout("[imgleft=portrait][imgleft=portrait]x", &config(Some(100.0)));
        assert_eq!(layout.floating_images[1].y_from, 20.0);
        assert_eq!(layout.size.height, 40.0);
    }

    #[test]
    fn test_word_too_wide_beside_image_moves_below() {
        let layout = run_layout("[imgleft=wide]abcdef", &config(Some(100.0)));
        assert_eq!(layout.text_runs[0].position, Point2D::new(0.0, 20.0));
        assert_eq!(layout.lines[0].top, 20.0);
    }

    #[test]
    fn test_first_line_height_override() {
        let mut config = config(Some(100.0));
        config.first_line_height = Some(20.0);
        let layout = run_layout("a\nb", &config);
        assert_eq!(layout.lines[0].height, 20.0);
        assert_eq!(layout.lines[1].height, 16.0);
        assert_eq!(layout.size.height, 36.0);
    }

    #[test]
    fn test_buffer_zone_offsets_first_line() {
        let mut config = config(Some(100.0));
        config.buffer_zone = 3.0;
        let layout = run_layout("a", &config);
        assert_eq!(layout.text_runs[0].position, Point2D::new(3.0, 3.0));
        assert_eq!(layout.size.height, 15.0);
    }

    #[test]
    fn test_empty_text() {
        let layout = run_layout("", &config(Some(100.0)));
        assert!(layout.text_runs.is_empty());
        assert!(layout.lines.is_empty());
        assert_eq!(layout.size, Size2D::zero());
    }

    #[test]
    fn test_layout_is_deterministic() {
        let source = "[imgleft=portrait]Hello [b]there[/b] [icon=star]\nfriend [color=red]of[/color] mine";
        let config = config(Some(90.0));
        assert_eq!(run_layout(source, &config), run_layout(source, &config));
    }

    #[test]
    fn test_lines_in_view() {
        let layout = run_layout("a\nb\nc\nd", &config(None));
        // tops: 0, 12, 28, 44
        let tops: Vec<_> = layout.lines_in_view(13.0, 20.0).map(|line| line.top).collect();
        assert_eq!(tops, vec![12.0, 28.0]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let text = TaggedText::parse("x");
        let mut metrics = FixedAdvance::new();
        let icons = test_icons();

        let mut config = config(None);
        config.font.clear();
        assert_eq!(
            text.layout(&config, &mut metrics, &icons),
            Err(LayoutError::MissingFont)
        );

        let config = TextLayoutConfig {
            max_width: Some(-1.0),
            ..TextLayoutConfig::default()
        };
        assert_eq!(
            text.measure(&config, &mut metrics, &icons),
            Err(LayoutError::InvalidWidth(-1.0))
        );

        let config = TextLayoutConfig {
            buffer_zone: f32::NAN,
            ..TextLayoutConfig::default()
        };
        assert!(matches!(
            text.layout(&config, &mut metrics, &icons),
            Err(LayoutError::InvalidBufferZone(_))
        ));
    }
}
