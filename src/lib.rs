//! # Rubric
//!
//! Rich-text captions and scroll bars for game GUIs.
//!
//! ## Overview
//!
//! `Rubric` turns caption markup such as `Hello [b]there[/b] [icon=star]` into
//! positioned, styled runs ready for a renderer to draw, and tracks the scroll
//! state of widgets whose content outgrows them.
//! The core of the library is the [`TextSystem`], which owns the fonts used for
//! measuring and the icons markup can refer to.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rubric::{Caption, Icon, ScrollBar, ScrollBarStyle, TextSystem, text::TextLayoutConfig};
//!
//! // 1. Create a TextSystem
//! let text_system = TextSystem::new();
//! text_system.load_system_fonts();
//! text_system.add_icon("star", Icon::new("icons/star.png", 16.0, 16.0));
//!
//! // 2. Keep captions on widgets
//! let mut caption = Caption::new(
//!     "Hello [b]there[/b] [icon=star] friend",
//!     TextLayoutConfig {
//!         max_width: Some(200.0),
//!         ..Default::default()
//!     },
//! );
//!
//! // 3. Layout when needed
//! let height = text_system
//!     .ensure_layout(&mut caption)
//!     .map(|layout| layout.size.height)
//!     .unwrap_or(0.0);
//!
//! // 4. Scroll content taller than the widget
//! let mut scroll_bar = ScrollBar::vertical(ScrollBarStyle::default());
//! scroll_bar.set_length(120.0);
//! scroll_bar.set_scroll_range(height);
//! scroll_bar.set_scroll_space(120.0);
//! ```
//!
//! ## Features
//!
//! *   **Markup**: Bold, italic, font, size and color tags, inline icons and floating images.
//! *   **Word Wrapping**: Breaks at spaces, hyphens and between CJK ideographs.
//! *   **Font Management**: GUI font names (`sans-bold-14`) resolved through `fontdb`.
//! *   **Scroll Bars**: Position clamping, thumb sizing and pointer interaction.
//! *   **Thread Safety**: Designed with internal locking for safe concurrent use.

pub mod caption;
pub mod error;
pub mod font_name;
pub mod font_storage;
pub mod icon;
pub mod scrollbar;
pub mod text;
pub mod text_system;

#[cfg(test)]
mod test_utl;

// common re-exports
pub use caption::Caption;
pub use error::LayoutError;
pub use font_name::FontName;
pub use font_storage::{FontMetrics, FontStorage};
pub use icon::{Icon, IconRegistry};
pub use scrollbar::{Orientation, ScrollBar, ScrollBarStyle, ScrollEvent};
pub use text::{TaggedText, TextLayout, TextLayoutConfig};
pub use text_system::TextSystem;

// re-export dependencies
pub use euclid;
pub use fontdb;
pub use fontdue;
pub use palette;
pub use parking_lot;
