use std::{path::PathBuf, sync::Arc};

use euclid::default::Size2D;
use parking_lot::Mutex;

use crate::{
    caption::Caption,
    error::LayoutError,
    font_storage::FontStorage,
    icon::{Icon, IconRegistry},
    text::{TaggedText, TextLayout, TextLayoutConfig},
};

/// High-level entry point shared by every widget of a GUI.
///
/// This struct owns the `FontStorage` used for measuring and the
/// `IconRegistry` consulted by `[icon]` and image tags, and lays out captions
/// with them.
///
/// Use `Mutex` to allow shared mutable access, which is common in UI frameworks.
///
/// The fields are public to allow direct access to the underlying storage when
/// necessary. Lock `font_storage` before `icons` when holding both.
pub struct TextSystem {
    /// The underlying font storage.
    pub font_storage: Mutex<FontStorage>,
    /// Icons available to markup.
    pub icons: Mutex<IconRegistry>,
}

impl Default for TextSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSystem {
    /// Creates a new text system with no fonts and no icons.
    pub fn new() -> Self {
        Self {
            font_storage: Mutex::new(FontStorage::new()),
            icons: Mutex::new(IconRegistry::new()),
        }
    }
}

/// font storage initialization
impl TextSystem {
    /// Loads the system fonts into the storage.
    pub fn load_system_fonts(&self) {
        self.font_storage.lock().load_system_fonts();
    }

    /// Loads a font from binary data.
    pub fn load_font_binary(&self, data: impl Into<Vec<u8>>) {
        self.font_storage.lock().load_font_binary(data);
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_storage.lock().load_font_file(path)
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&self, dir: PathBuf) {
        self.font_storage.lock().load_fonts_dir(dir)
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.font_storage.lock().is_empty()
    }

    /// Binds a GUI font name such as `sans-bold-14` to a face.
    pub fn define_font(&self, name: impl Into<String>, id: fontdb::ID, size: f32) {
        self.font_storage.lock().define_font(name, id, size);
    }

    /// Sets the name used when a requested font cannot be resolved.
    pub fn set_fallback_font(&self, name: impl Into<String>) {
        self.font_storage.lock().set_fallback_font(name);
    }

    /// Queries for a font matching the description.
    pub fn query(&self, query: &fontdb::Query) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        self.font_storage.lock().query(query)
    }
}

/// icons
impl TextSystem {
    /// Registers an icon under the name used in `[icon=name]` tags.
    ///
    /// Captions already laid out keep their runs until invalidated.
    pub fn add_icon(&self, name: impl Into<String>, icon: Icon) -> Option<Icon> {
        self.icons.lock().insert(name, icon)
    }

    pub fn remove_icon(&self, name: &str) -> Option<Icon> {
        self.icons.lock().remove(name)
    }

    pub fn has_icon(&self, name: &str) -> bool {
        self.icons.lock().contains(name)
    }
}

/// text layout
impl TextSystem {
    /// Performs text layout using the fonts and icons in this system.
    pub fn layout_text(
        &self,
        text: &TaggedText,
        config: &TextLayoutConfig,
    ) -> Result<TextLayout, LayoutError> {
        let mut font_storage = self.font_storage.lock();
        if font_storage.is_empty() {
            log::warn!("Text laid out before any font was loaded.");
        }
        text.layout(config, &mut *font_storage, &self.icons.lock())
    }

    /// Computes the size of `text` without keeping the runs.
    pub fn measure_text(
        &self,
        text: &TaggedText,
        config: &TextLayoutConfig,
    ) -> Result<Size2D<f32>, LayoutError> {
        self.layout_text(text, config).map(|layout| layout.size)
    }

    /// Lays out a caption if it is dirty and returns its layout.
    pub fn ensure_layout<'a>(&self, caption: &'a mut Caption) -> Result<&'a TextLayout, LayoutError> {
        let mut font_storage = self.font_storage.lock();
        caption.ensure_layout(&mut *font_storage, &self.icons.lock())
    }
}
