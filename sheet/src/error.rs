use crate::geometry::GeometryError;

pub type Result<T> = std::result::Result<T, SheetError>;

/// Errors that can occur while converting a sprite-sheet plist.
///
/// Every variant is fatal to the conversion of the file being processed.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// The input is not a readable property list.
    #[error("failed to decode plist: {0}")]
    Plist(#[from] plist::Error),

    /// A geometry string contains something other than integers.
    #[error("malformed geometry: {0}")]
    MalformedGeometry(#[from] GeometryError),

    /// A frame or size field is not a string, or has the wrong number of values.
    #[error("invalid {field} for '{owner}': {reason}")]
    InvalidFrameGeometry {
        owner: String,
        field: &'static str,
        reason: String,
    },

    /// Top-level key other than `frames` and `metadata`.
    #[error("unsupported plist key '{0}'")]
    UnsupportedMetadataKey(String),

    /// More than one animation type fell outside the vocabulary in strict mode.
    #[error("more than one unhandled animation type: {}", .0.join(", "))]
    AmbiguousClassification(Vec<String>),

    /// Frame name has too few `_`-separated sections to hold an animation type.
    #[error("cannot infer animation type from frame name '{0}'")]
    UnclassifiableFrameName(String),

    /// Required key is absent.
    #[error("missing '{field}' in {context}")]
    MissingField {
        context: String,
        field: &'static str,
    },

    /// A value has the wrong plist type.
    #[error("expected {expected} for {context}")]
    UnexpectedValue {
        context: String,
        expected: &'static str,
    },
}
