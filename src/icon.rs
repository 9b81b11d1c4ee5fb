use std::collections::HashMap;

use euclid::default::Size2D;

/// Sprite used by `[icon]`, `[imgleft]` and `[imgright]` tags.
#[derive(Clone, Debug, PartialEq)]
pub struct Icon {
    pub size: Size2D<f32>,
    /// Name of the sprite the renderer draws.
    pub sprite: String,
    /// Cell of a sprite sheet, when the sprite is one.
    pub cell_id: Option<u32>,
}

impl Icon {
    pub fn new(sprite: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            size: Size2D::new(width, height),
            sprite: sprite.into(),
            cell_id: None,
        }
    }

    pub fn with_cell(mut self, cell_id: u32) -> Self {
        self.cell_id = Some(cell_id);
        self
    }
}

/// Icons available to markup, keyed by the name used in tags.
#[derive(Clone, Debug, Default)]
pub struct IconRegistry {
    icons: HashMap<String, Icon, fxhash::FxBuildHasher>,
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an icon, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, icon: Icon) -> Option<Icon> {
        self.icons.insert(name.into(), icon)
    }

    pub fn remove(&mut self, name: &str) -> Option<Icon> {
        self.icons.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.icons.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Icon> {
        self.icons.get(name)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn clear(&mut self) {
        self.icons.clear();
    }
}
