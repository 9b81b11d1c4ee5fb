use std::{collections::HashMap, path::PathBuf, sync::Arc};

use euclid::default::Size2D;

use crate::font_name::FontName;

/// Font measurements needed by the layout engine.
///
/// Implementations must be deterministic for a given font name and string,
/// and must fall back to some default font instead of failing.
pub trait FontMetrics {
    /// Returns the advance width and the text height of `text`.
    fn measure(&mut self, font: &str, text: &str) -> Size2D<f32>;

    /// Returns the distance between the tops of two consecutive lines.
    fn line_spacing(&mut self, font: &str) -> f32;
}

/// A concrete face at a pixel size, as resolved from a GUI font name.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontFace {
    pub id: fontdb::ID,
    pub size: f32,
}

/// Manages font loading and GUI font name resolution using `fontdb` and `fontdue`.
///
/// Faces are queried from the `fontdb` database and lazily loaded with
/// `fontdue` on first use. GUI font names (`sans-bold-14`) are either defined
/// explicitly with [`Self::define_font`] or resolved by querying the database
/// for the family, weight and style encoded in the name.
pub struct FontStorage {
    /// This is the font set that has been loaded by fontdb.
    font_db: fontdb::Database,
    /// This is the font that has been loaded by fontdue.
    /// Not all fonts in fontdb are necessarily loaded here.
    loaded_font: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
    defined: HashMap<String, FontFace, fxhash::FxBuildHasher>,
    /// Cached name resolutions, including failed ones.
    resolved: HashMap<String, Option<FontFace>, fxhash::FxBuildHasher>,
    fallback: String,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Name used when a requested font cannot be resolved.
    pub const DEFAULT_FALLBACK: &'static str = "sans-14";

    /// Creates a new empty font storage.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_font: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            defined: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            resolved: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            fallback: Self::DEFAULT_FALLBACK.to_string(),
        }
    }
}

/// Loading fonts into fontdb and setting up fontdb.
impl FontStorage {
    /// Loads a font from binary data.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
        self.resolved.clear();
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        self.resolved.clear();
        self.font_db.load_font_file(path)
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.font_db.load_fonts_dir(dir);
        self.resolved.clear();
    }

    /// Loads the system fonts.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
        self.resolved.clear();
    }

    /// Removes a face by ID, along with every definition pointing at it.
    pub fn remove_face(&mut self, id: fontdb::ID) {
        self.font_db.remove_face(id);
        self.loaded_font.remove(&id);
        self.defined.retain(|_, face| face.id != id);
        self.resolved.clear();
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Returns the number of loaded faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }

    /// Sets the family name that the GUI family `serif` resolves to.
    pub fn set_serif_family(&mut self, family: impl Into<String>) {
        self.font_db.set_serif_family(family);
        self.resolved.clear();
    }

    /// Sets the family name that the GUI family `sans` resolves to.
    pub fn set_sans_serif_family(&mut self, family: impl Into<String>) {
        self.font_db.set_sans_serif_family(family);
        self.resolved.clear();
    }

    /// Sets the family name that the GUI family `mono` resolves to.
    pub fn set_monospace_family(&mut self, family: impl Into<String>) {
        self.font_db.set_monospace_family(family);
        self.resolved.clear();
    }
}

/// GUI font names
impl FontStorage {
    /// Binds a GUI font name to a face and pixel size.
    ///
    /// Definitions take precedence over name-based queries.
    pub fn define_font(&mut self, name: impl Into<String>, id: fontdb::ID, size: f32) {
        let name = name.into();
        self.resolved.remove(&name);
        self.defined.insert(name, FontFace { id, size });
    }

    /// Sets the name used when a requested font cannot be resolved.
    pub fn set_fallback_font(&mut self, name: impl Into<String>) {
        self.fallback = name.into();
    }

    pub fn fallback_font(&self) -> &str {
        &self.fallback
    }

    /// Resolves a GUI font name to a face, without falling back.
    pub fn resolve(&mut self, name: &str) -> Option<FontFace> {
        if let Some(face) = self.defined.get(name) {
            return Some(*face);
        }
        if let Some(cached) = self.resolved.get(name) {
            return *cached;
        }

        let face = self.query_name(name);
        if face.is_none() {
            log::warn!("Font `{}` could not be resolved.", name);
        }
        self.resolved.insert(name.to_string(), face);
        face
    }

    fn query_name(&self, name: &str) -> Option<FontFace> {
        let font_name = FontName::parse(name)?;
        let families = [match font_name.family.as_str() {
            "sans" => fontdb::Family::SansSerif,
            "serif" => fontdb::Family::Serif,
            "mono" => fontdb::Family::Monospace,
            family => fontdb::Family::Name(family),
        }];

        let query = fontdb::Query {
            families: &families,
            weight: if font_name.bold {
                fontdb::Weight::BOLD
            } else {
                fontdb::Weight::NORMAL
            },
            stretch: fontdb::Stretch::Normal,
            style: if font_name.italic {
                fontdb::Style::Italic
            } else {
                fontdb::Style::Normal
            },
        };

        let id = self.font_db.query(&query)?;
        Some(FontFace {
            id,
            size: font_name.size as f32,
        })
    }

    /// Returns the loaded font and pixel size for `name`, using the fallback
    /// font when `name` is unknown.
    pub fn face_for(&mut self, name: &str) -> Option<(Arc<fontdue::Font>, f32)> {
        let face = match self.resolve(name) {
            Some(face) => face,
            None => {
                let fallback = self.fallback.clone();
                self.resolve(&fallback)?
            }
        };
        self.font(face.id).map(|font| (font, face.size))
    }
}

/// Get `Font`
impl FontStorage {
    /// Queries for a font matching the description.
    ///
    /// Returns the ID and the loaded font if found.
    pub fn query(&mut self, query: &fontdb::Query) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        let id = self.font_db.query(query)?;
        self.font(id).map(|font| (id, font))
    }

    /// Retrieves a loaded font by ID, loading it if necessary.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.loaded_font.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            scale: 40.0,
                            load_substitutions: true,
                        },
                    )
                })?;

                match font_result {
                    Ok(font) => {
                        let r: &mut Arc<fontdue::Font> = entry.insert(Arc::new(font));
                        Some(Arc::clone(r))
                    }
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }
}

impl FontMetrics for FontStorage {
    fn measure(&mut self, font: &str, text: &str) -> Size2D<f32> {
        let Some((font, size)) = self.face_for(font) else {
            return Size2D::zero();
        };

        let height = font
            .horizontal_line_metrics(size)
            .map(|metrics| metrics.ascent - metrics.descent)
            .unwrap_or(size);

        let mut width = 0.0;
        let mut previous: Option<u16> = None;
        for ch in text.chars() {
            let glyph = font.lookup_glyph_index(ch);
            if let Some(previous) = previous {
                width += font
                    .horizontal_kern_indexed(previous, glyph, size)
                    .unwrap_or(0.0);
            }
            width += font.metrics_indexed(glyph, size).advance_width;
            previous = Some(glyph);
        }

        Size2D::new(width, height)
    }

    fn line_spacing(&mut self, font: &str) -> f32 {
        let Some((font, size)) = self.face_for(font) else {
            return 0.0;
        };
        font.horizontal_line_metrics(size)
            .map(|metrics| metrics.new_line_size)
            .unwrap_or(size)
    }
}
