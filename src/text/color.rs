use palette::{Srgb, Srgba};

/// 8-bit RGBA color attached to text runs.
pub type Color = Srgba<u8>;

/// Opaque white, the color used when no `[color]` tag is active.
pub const DEFAULT_TEXT_COLOR: Color = Srgba::new(255, 255, 255, 255);

/// Parses a `[color]` tag value.
///
/// Accepted forms are decimal channels (`"255 128 0"` or `"255 128 0 200"`),
/// CSS color names (`"red"`) and hex codes (`"#ff8000"`).
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();

    let channels: Vec<&str> = value.split_whitespace().collect();
    if channels.len() == 3 || channels.len() == 4 {
        let mut rgba = [255u8; 4];
        for (slot, channel) in rgba.iter_mut().zip(&channels) {
            *slot = channel.parse().ok()?;
        }
        return Some(Srgba::new(rgba[0], rgba[1], rgba[2], rgba[3]));
    }

    let rgb = palette::named::from_str(&value.to_ascii_lowercase())
        .or_else(|| value.parse::<Srgb<u8>>().ok())?;
    Some(Srgba::new(rgb.red, rgb.green, rgb.blue, 255))
}
