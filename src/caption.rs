use crate::{
    error::LayoutError,
    font_storage::FontMetrics,
    icon::IconRegistry,
    text::{HorizontalAlign, TaggedText, TextLayout, TextLayoutConfig},
};

/// Caption text owned by a widget, together with its cached layout.
///
/// Changing the text or any layout input marks the caption dirty; the next
/// [`Self::ensure_layout`] call lays it out again. Setting the same text twice
/// keeps the cached layout.
#[derive(Clone, Debug, Default)]
pub struct Caption {
    source: String,
    text: TaggedText,
    config: TextLayoutConfig,
    layout: Option<TextLayout>,
}

impl Caption {
    pub fn new(source: impl Into<String>, config: TextLayoutConfig) -> Self {
        let source = source.into();
        Self {
            text: TaggedText::parse(&source),
            source,
            config,
            layout: None,
        }
    }

    /// The markup as it was set, tags included.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn text(&self) -> &TaggedText {
        &self.text
    }

    pub fn config(&self) -> &TextLayoutConfig {
        &self.config
    }

    pub fn set_text(&mut self, source: impl Into<String>) {
        let source = source.into();
        if source == self.source {
            return;
        }
        self.text = TaggedText::parse(&source);
        self.source = source;
        self.invalidate();
    }

    pub fn set_config(&mut self, config: TextLayoutConfig) {
        if config != self.config {
            self.config = config;
            self.invalidate();
        }
    }

    pub fn set_font(&mut self, font: impl Into<String>) {
        let font = font.into();
        if font != self.config.font {
            self.config.font = font;
            self.invalidate();
        }
    }

    /// Usually called with the widget width whenever the widget is resized.
    pub fn set_max_width(&mut self, max_width: Option<f32>) {
        if max_width != self.config.max_width {
            self.config.max_width = max_width;
            self.invalidate();
        }
    }

    pub fn set_align(&mut self, align: HorizontalAlign) {
        if align != self.config.horizontal_align {
            self.config.horizontal_align = align;
            self.invalidate();
        }
    }

    /// Drops the cached layout, e.g. after fonts or icons were reloaded.
    pub fn invalidate(&mut self) {
        self.layout = None;
    }

    pub fn is_dirty(&self) -> bool {
        self.layout.is_none()
    }

    /// The cached layout, `None` while the caption is dirty.
    pub fn layout(&self) -> Option<&TextLayout> {
        self.layout.as_ref()
    }

    /// Returns the cached layout, laying the caption out first if it is dirty.
    ///
    /// A failed pass leaves the caption dirty.
    pub fn ensure_layout(
        &mut self,
        font_metrics: &mut impl FontMetrics,
        icons: &IconRegistry,
    ) -> Result<&TextLayout, LayoutError> {
        let layout = match self.layout.take() {
            Some(layout) => layout,
            None => {
                let layout = self.text.layout(&self.config, font_metrics, icons)?;
                log::trace!(
                    "Laid out caption of {} bytes into {} lines.",
                    self.text.raw().len(),
                    layout.lines.len()
                );
                layout
            }
        };

        Ok(&*self.layout.insert(layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utl::{FixedAdvance, test_icons};

    #[test]
    fn test_new_caption_is_dirty() {
        let caption = Caption::new("[b]hi[/b]", TextLayoutConfig::default());
        assert!(caption.is_dirty());
        assert!(caption.layout().is_none());
        assert_eq!(caption.source(), "[b]hi[/b]");
        assert_eq!(caption.text().raw(), "hi");
    }

    #[test]
    fn test_ensure_layout_caches() {
        let mut caption = Caption::new("hello world", TextLayoutConfig::default());
        let mut font = FixedAdvance::new();
        let icons = test_icons();

        let width = caption
            .ensure_layout(&mut font, &icons)
            .map(|layout| layout.size.width);
        assert_eq!(width, Ok(110.0));
        assert!(!caption.is_dirty());

        caption.set_text("hello world");
        assert!(!caption.is_dirty());

        // the cached layout is returned without measuring again
        font.advance = 20.0;
        let width = caption
            .ensure_layout(&mut font, &icons)
            .map(|layout| layout.size.width);
        assert_eq!(width, Ok(110.0));

        caption.invalidate();
        let width = caption
            .ensure_layout(&mut font, &icons)
            .map(|layout| layout.size.width);
        assert_eq!(width, Ok(220.0));
    }

    #[test]
    fn test_changes_mark_dirty() {
        let mut caption = Caption::new("hello world", TextLayoutConfig::default());
        let mut font = FixedAdvance::new();
        let icons = test_icons();
        let relayout = |caption: &mut Caption, font: &mut FixedAdvance| {
            assert!(caption.is_dirty());
            assert!(caption.ensure_layout(font, &icons).is_ok());
        };

        relayout(&mut caption, &mut font);
        caption.set_text("other text");
        relayout(&mut caption, &mut font);
        caption.set_max_width(Some(60.0));
        relayout(&mut caption, &mut font);
        assert_eq!(caption.layout().map(|layout| layout.lines.len()), Some(2));

        caption.set_max_width(Some(60.0));
        assert!(!caption.is_dirty());
        caption.set_align(HorizontalAlign::Center);
        relayout(&mut caption, &mut font);
        caption.set_font("serif-12");
        relayout(&mut caption, &mut font);
    }

    #[test]
    fn test_failed_layout_stays_dirty() {
        let mut caption = Caption::new("text", TextLayoutConfig::default());
        caption.set_max_width(Some(-1.0));

        let result = caption
            .ensure_layout(&mut FixedAdvance::new(), &test_icons())
            .map(|layout| layout.size);
        assert_eq!(result, Err(LayoutError::InvalidWidth(-1.0)));
        assert!(caption.is_dirty());
    }
}
