use std::fmt;

/// Structured form of a GUI font name such as `sans-bold-stroke-14`.
///
/// Names follow `family[-bold][-italic][-stroke]-size`. Style tags are applied
/// to a run by rewriting its font name, so `[b]` over `sans-14` measures and
/// renders with `sans-bold-14`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontName {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
    pub stroke: bool,
    pub size: u32,
}

impl FontName {
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            bold: false,
            italic: false,
            stroke: false,
            size,
        }
    }

    /// Returns `None` when `name` does not follow the naming scheme.
    pub fn parse(name: &str) -> Option<Self> {
        let mut parts = name.split('-');
        let family = parts.next().filter(|family| !family.is_empty())?;
        let rest: Vec<&str> = parts.collect();
        let (size, flags) = rest.split_last()?;

        let mut font = Self::new(family, size.parse().ok()?);
        for flag in flags {
            match *flag {
                "bold" => font.bold = true,
                "italic" | "oblique" => font.italic = true,
                "stroke" => font.stroke = true,
                _ => return None,
            }
        }

        Some(font)
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.family)?;
        if self.bold {
            f.write_str("-bold")?;
        }
        if self.italic {
            f.write_str("-italic")?;
        }
        if self.stroke {
            f.write_str("-stroke")?;
        }
        write!(f, "-{}", self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        assert_eq!(FontName::parse("sans-14"), Some(FontName::new("sans", 14)));
    }

    #[test]
    fn test_parse_flags() {
        let font = FontName::parse("sans-bold-stroke-16");
        assert_eq!(
            font,
            Some(FontName {
                family: "sans".into(),
                bold: true,
                italic: false,
                stroke: true,
                size: 16,
            })
        );
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert_eq!(FontName::parse("sans"), None);
        assert_eq!(FontName::parse("-14"), None);
        assert_eq!(FontName::parse("sans-huge-14"), None);
        assert_eq!(FontName::parse("sans-bold"), None);
    }

    #[test]
    fn test_display_is_canonical() {
        let mut font = FontName::parse("mono-italic-10").unwrap_or_else(|| FontName::new("x", 1));
        font.bold = true;
        assert_eq!(font.to_string(), "mono-bold-italic-10");
    }
}
