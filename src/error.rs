/// Precondition failures reported by the layout entry points.
///
/// Bad markup, unknown icons and unparsable tag values are not errors: they
/// are logged and replaced by defaults.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("no font was configured for the layout")]
    MissingFont,
    #[error("layout width must be a finite non-negative number, got {0}")]
    InvalidWidth(f32),
    #[error("buffer zone must be a finite non-negative number, got {0}")]
    InvalidBufferZone(f32),
    #[error("first line height must be a finite non-negative number, got {0}")]
    InvalidLineHeight(f32),
}
