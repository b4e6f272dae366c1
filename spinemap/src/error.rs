use std::fmt;

/// Errors produced while loading, fitting or tracing a backbone.
///
/// Points that cannot be placed on the spine are *not* errors; see
/// [`crate::pose::locate_on_spine`], which returns `None` for them.
#[derive(Debug)]
pub enum SpineError {
    /// A backbone needs at least two points to describe a direction.
    TooFewPoints { count: usize },

    /// The summed point-to-point distance is zero (or too short to trace at
    /// pixel resolution), so the arc-length parameter cannot be normalized.
    DegenerateCurve { total_length: f64 },

    /// Both spline derivatives vanish at a traced sample, so no direction
    /// can be derived there.
    DegenerateTangent { index: usize, parameter: f64 },

    /// The backbone file extension does not name a known format.
    UnsupportedFormat { extension: String },

    /// A backbone or model point document could not be parsed.
    Parse { line: usize, message: String },

    /// A pose string was not of the form `zoom[,shift[,angle]]`.
    PoseParse { input: String, message: String },

    /// The pixel buffer length does not match `width * height`.
    FrameSize { expected: usize, actual: usize },

    Io(std::io::Error),
}

impl fmt::Display for SpineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints { count } => {
                write!(f, "backbone needs at least 2 points, got {count}")
            }
            Self::DegenerateCurve { total_length } => {
                write!(f, "degenerate backbone: total arc length {total_length}")
            }
            Self::DegenerateTangent { index, parameter } => write!(
                f,
                "degenerate tangent at traced point {index} (t = {parameter})"
            ),
            Self::UnsupportedFormat { extension } => {
                write!(f, "unknown backbone data extension '{extension}'")
            }
            Self::Parse { line, message } => write!(f, "parse error on line {line}: {message}"),
            Self::PoseParse { input, message } => {
                write!(f, "invalid pose '{input}': {message}")
            }
            Self::FrameSize { expected, actual } => {
                write!(f, "frame size mismatch: expected {expected}, got {actual}")
            }
            Self::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for SpineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SpineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SpineError>;
