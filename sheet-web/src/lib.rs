//! WASM bindings for the sprite-sheet converter.
//!
//! Provides a JavaScript/TypeScript API for converting plist sprite sheets
//! and reading frame rectangles for canvas rendering.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use sheet::{ClassificationPolicy, ConvertOptions, DEFAULT_CATEGORY, SheetMetadata, Vocabulary};

/// Summary of one animation (lightweight, no frame data).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnimationSummary<'a> {
    name: &'a str,
    frame_count: usize,
    recognized: bool,
}

/// A converted sprite sheet.
#[wasm_bindgen]
pub struct SheetFile {
    inner: SheetMetadata,
    vocabulary: Vocabulary,
}

#[wasm_bindgen]
impl SheetFile {
    /// Convert a plist from a Uint8Array using the built-in animation types.
    #[wasm_bindgen(constructor)]
    pub fn new(data: &[u8]) -> Result<SheetFile, JsError> {
        Self::convert(data, ConvertOptions::default())
    }

    /// Convert with extra animation types and optional strict classification.
    #[wasm_bindgen(js_name = "withOptions")]
    pub fn with_options(
        data: &[u8],
        animations: Vec<String>,
        strict: bool,
    ) -> Result<SheetFile, JsError> {
        let mut vocabulary = Vocabulary::default();
        vocabulary.extend(animations);
        let policy = if strict {
            ClassificationPolicy::Strict
        } else {
            ClassificationPolicy::Collapse
        };
        Self::convert(data, ConvertOptions { vocabulary, policy })
    }

    /// Texture file the frames are cut from.
    #[wasm_bindgen(getter, js_name = "textureFilename")]
    pub fn texture_filename(&self) -> String {
        self.inner.texture_filename.clone()
    }

    /// Texture width in pixels.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.inner.width as f64
    }

    /// Texture height in pixels.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.inner.height as f64
    }

    /// List all animation names.
    #[wasm_bindgen(js_name = "animationNames")]
    pub fn animation_names(&self) -> Vec<String> {
        self.inner
            .animation_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Number of frames in an animation (0 if it does not exist).
    #[wasm_bindgen(js_name = "frameCount")]
    pub fn frame_count(&self, animation: &str) -> usize {
        self.inner.animation(animation).map_or(0, <[_]>::len)
    }

    /// Frame rectangles of an animation as a flat `[x0, y0, x1, y1, ...]` array.
    #[wasm_bindgen(js_name = "getFrameRects")]
    pub fn get_frame_rects(&self, animation: &str) -> Result<js_sys::Int32Array, JsError> {
        let frames = self
            .inner
            .animation(animation)
            .ok_or_else(|| JsError::new(&format!("animation not found: {}", animation)))?;

        let mut rects = Vec::with_capacity(frames.len() * 4);
        for f in frames {
            for v in [f.x0, f.y0, f.x1, f.y1] {
                let v = i32::try_from(v).map_err(|_| {
                    JsError::new(&format!("frame {} is outside the texture", f.frame_name))
                })?;
                rects.push(v);
            }
        }
        Ok(js_sys::Int32Array::from(&rects[..]))
    }

    /// Get summary info for all animations (useful for building UI lists).
    #[wasm_bindgen(js_name = "getAllAnimationInfo")]
    pub fn get_all_animation_info(&self) -> Result<JsValue, JsError> {
        let summaries: Vec<AnimationSummary> = self
            .inner
            .frames
            .iter()
            .map(|(name, frames)| AnimationSummary {
                name,
                frame_count: frames.len(),
                recognized: self.vocabulary.contains(name),
            })
            .collect();
        to_plain_object(&summaries)
    }

    /// The full normalized record as a plain JS object, same shape as the JSON output.
    #[wasm_bindgen(js_name = "toObject")]
    pub fn to_object(&self) -> Result<JsValue, JsError> {
        to_plain_object(&self.inner)
    }

    /// The full normalized record as compact JSON text.
    #[wasm_bindgen(js_name = "toJson")]
    pub fn to_json(&self) -> Result<String, JsError> {
        self.inner.to_json().map_err(|e| JsError::new(&e.to_string()))
    }
}

impl SheetFile {
    fn convert(data: &[u8], options: ConvertOptions) -> Result<SheetFile, JsError> {
        let inner = SheetMetadata::from_plist_bytes(data, &options)
            .map_err(|e| JsError::new(&e.to_string()))?;

        let file = SheetFile {
            inner,
            vocabulary: options.vocabulary,
        };
        for name in file.unrecognized() {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "unrecognized animation type: {}",
                name
            )));
        }
        Ok(file)
    }

    fn unrecognized(&self) -> Vec<&str> {
        self.inner
            .animation_names()
            .into_iter()
            .filter(|name| *name != DEFAULT_CATEGORY && !self.vocabulary.contains(name))
            .collect()
    }
}

// Maps become plain objects rather than JS `Map`s.
fn to_plain_object<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}
