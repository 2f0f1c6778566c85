//! Low-level plist reader.
//!
//! Pulls the raw frame records and sheet metadata out of a decoded property
//! list without interpreting any geometry.

use std::io::Cursor;

use plist::{Dictionary, Value};

use crate::error::{Result, SheetError};

pub const FRAMES_KEY: &str = "frames";
pub const METADATA_KEY: &str = "metadata";

/// One entry of the `frames` dictionary, exactly as stored in the plist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrameEntry {
    /// `{{x,y},{w,h}}` cutting rectangle within the texture.
    pub frame: String,
    /// `{w,h}` size of the untrimmed sprite.
    pub source_size: String,
    pub offset: Option<String>,
    pub rotated: bool,
    pub source_color_rect: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMetadata {
    pub texture_file_name: String,
    /// `{w,h}` size of the whole texture.
    pub size: String,
}

/// A sprite-sheet plist split into its two recognized sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSheet {
    /// Frame entries in document order.
    pub frames: Vec<(String, RawFrameEntry)>,
    pub metadata: RawMetadata,
}

impl RawSheet {
    /// Decode an XML or binary plist from a byte buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let value = Value::from_reader(Cursor::new(data))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let root = dictionary(value, "plist root")?;

        let mut frames = None;
        let mut metadata = None;
        for (key, value) in root.iter() {
            match key.as_str() {
                FRAMES_KEY => frames = Some(read_frames(value)?),
                METADATA_KEY => metadata = Some(read_metadata(value)?),
                other => return Err(SheetError::UnsupportedMetadataKey(other.to_string())),
            }
        }

        Ok(Self {
            frames: frames.ok_or_else(|| missing("plist root", FRAMES_KEY))?,
            metadata: metadata.ok_or_else(|| missing("plist root", METADATA_KEY))?,
        })
    }
}

fn read_frames(value: &Value) -> Result<Vec<(String, RawFrameEntry)>> {
    let frames = dictionary(value, FRAMES_KEY)?;
    frames
        .iter()
        .map(|(name, entry)| Ok((name.clone(), read_frame(name, entry)?)))
        .collect()
}

fn read_frame(name: &str, value: &Value) -> Result<RawFrameEntry> {
    let entry = dictionary(value, &format!("frame '{}'", name))?;

    Ok(RawFrameEntry {
        frame: geometry_field(entry, name, "frame")?,
        source_size: geometry_field(entry, name, "sourceSize")?,
        offset: optional_string(entry, name, "offset")?,
        rotated: match entry.get("rotated") {
            None => false,
            Some(v) => v.as_boolean().ok_or_else(|| SheetError::UnexpectedValue {
                context: format!("'rotated' of frame '{}'", name),
                expected: "a boolean",
            })?,
        },
        source_color_rect: optional_string(entry, name, "sourceColorRect")?,
    })
}

fn read_metadata(value: &Value) -> Result<RawMetadata> {
    let metadata = dictionary(value, METADATA_KEY)?;

    let texture_file_name = metadata
        .get("textureFileName")
        .ok_or_else(|| missing(METADATA_KEY, "textureFileName"))?
        .as_string()
        .ok_or_else(|| SheetError::UnexpectedValue {
            context: "'textureFileName'".to_string(),
            expected: "a string",
        })?
        .to_string();

    Ok(RawMetadata {
        texture_file_name,
        size: geometry_field(metadata, METADATA_KEY, "size")?,
    })
}

/// Geometry fields must be strings; anything else cannot be cut from the sheet.
fn geometry_field(dict: &Dictionary, owner: &str, field: &'static str) -> Result<String> {
    let value = dict.get(field).ok_or_else(|| missing(owner, field))?;
    value
        .as_string()
        .map(str::to_string)
        .ok_or_else(|| SheetError::InvalidFrameGeometry {
            owner: owner.to_string(),
            field,
            reason: "value is not a string".to_string(),
        })
}

fn optional_string(dict: &Dictionary, owner: &str, field: &str) -> Result<Option<String>> {
    match dict.get(field) {
        None => Ok(None),
        Some(v) => v
            .as_string()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| SheetError::UnexpectedValue {
                context: format!("'{}' of frame '{}'", field, owner),
                expected: "a string",
            }),
    }
}

fn dictionary<'a>(value: &'a Value, context: &str) -> Result<&'a Dictionary> {
    value
        .as_dictionary()
        .ok_or_else(|| SheetError::UnexpectedValue {
            context: context.to_string(),
            expected: "a dictionary",
        })
}

fn missing(context: &str, field: &'static str) -> SheetError {
    SheetError::MissingField {
        context: context.to_string(),
        field,
    }
}
