//! Deterministic collaborators shared by unit tests.

use euclid::default::Size2D;

use crate::{
    font_storage::FontMetrics,
    icon::{Icon, IconRegistry},
};

/// Every character is `advance` wide, whatever the font.
pub struct FixedAdvance {
    pub advance: f32,
    pub height: f32,
    pub spacing: f32,
}

impl FixedAdvance {
    pub fn new() -> Self {
        Self {
            advance: 10.0,
            height: 12.0,
            spacing: 16.0,
        }
    }
}

impl FontMetrics for FixedAdvance {
    fn measure(&mut self, _font: &str, text: &str) -> Size2D<f32> {
        Size2D::new(text.chars().count() as f32 * self.advance, self.height)
    }

    fn line_spacing(&mut self, _font: &str) -> f32 {
        self.spacing
    }
}

pub fn test_icons() -> IconRegistry {
    let mut icons = IconRegistry::new();
    icons.insert("star", Icon::new("star_sprite", 10.0, 10.0));
    icons.insert("portrait", Icon::new("portrait_sprite", 30.0, 20.0).with_cell(1));
    icons.insert("wide", Icon::new("wide_sprite", 95.0, 20.0));
    icons
}
