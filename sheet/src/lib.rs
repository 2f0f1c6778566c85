//! Sprite-sheet plist converter.
//!
//! Reads cocos2d-style property lists describing a texture atlas and produces
//! a normalized record of animations, each an ordered list of frame
//! rectangles within the shared texture.
//!
//! # Example
//!
//! ```ignore
//! use sheet::{ConvertOptions, SheetMetadata};
//!
//! let data = std::fs::read("f1_general.plist").unwrap();
//! let sheet = SheetMetadata::from_plist_bytes(&data, &ConvertOptions::default()).unwrap();
//!
//! println!("Texture: {} ({}x{})", sheet.texture_filename, sheet.width, sheet.height);
//! println!("Animations: {:?}", sheet.animation_names());
//! println!("{}", sheet.to_json().unwrap());
//! ```

pub mod classify;
mod error;
pub mod geometry;
pub mod reader;
mod sheet;

pub use classify::{Classification, ClassificationPolicy, DEFAULT_CATEGORY, Vocabulary};
pub use error::{Result, SheetError};
pub use geometry::{GeometryError, GeometryTuple, Rect, Size};
pub use reader::{RawFrameEntry, RawMetadata, RawSheet};
pub use sheet::{
    AnimationGroups, ConvertOptions, FrameDescriptor, SheetMetadata, describe_frame, group_frames,
};
