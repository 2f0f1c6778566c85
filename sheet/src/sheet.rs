//! High-level conversion API.
//!
//! Turns a [`RawSheet`] into a [`SheetMetadata`] record: frames grouped by
//! inferred animation type, each with absolute pixel bounds in the texture.

use std::collections::BTreeSet;

use ordermap::OrderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classify::{ClassificationPolicy, DEFAULT_CATEGORY, Vocabulary};
use crate::error::{Result, SheetError};
use crate::geometry::{GeometryError, GeometryTuple, Rect, Size, parse_tuple};
use crate::reader::{METADATA_KEY, RawFrameEntry, RawSheet};

/// One frame of an animation, cut from the shared texture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDescriptor {
    pub frame_name: String,
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
    /// Untrimmed sprite width.
    pub width: i64,
    /// Untrimmed sprite height.
    pub height: i64,
}

/// Animation name to its frames, in order of first appearance.
pub type AnimationGroups = OrderMap<String, Vec<FrameDescriptor>>;

/// Normalized sprite-sheet record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMetadata {
    pub texture_filename: String,
    pub width: i64,
    pub height: i64,
    pub frames: AnimationGroups,
}

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub vocabulary: Vocabulary,
    pub policy: ClassificationPolicy,
}

impl SheetMetadata {
    /// Decode and convert a plist in one step.
    pub fn from_plist_bytes(data: &[u8], options: &ConvertOptions) -> Result<Self> {
        let raw = RawSheet::from_bytes(data)?;
        Self::from_raw(&raw, options)
    }

    pub fn from_raw(raw: &RawSheet, options: &ConvertOptions) -> Result<Self> {
        let size = parse_size(METADATA_KEY, "size", &raw.metadata.size)?;
        let frames = group_frames(&raw.frames, options)?;

        Ok(Self {
            texture_filename: raw.metadata.texture_file_name.clone(),
            width: size.width,
            height: size.height,
            frames,
        })
    }

    /// List all animation names.
    pub fn animation_names(&self) -> Vec<&str> {
        self.frames.keys().map(String::as_str).collect()
    }

    /// Get the frames of an animation by name.
    pub fn animation(&self, name: &str) -> Option<&[FrameDescriptor]> {
        self.frames.get(name).map(Vec::as_slice)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.values().map(Vec::len).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Group frames by inferred animation type.
///
/// Frames are visited in ascending name order, so both the category order and
/// the frame order within each category are independent of the input order.
pub fn group_frames(
    frames: &[(String, RawFrameEntry)],
    options: &ConvertOptions,
) -> Result<AnimationGroups> {
    let mut sorted: Vec<&(String, RawFrameEntry)> = frames.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut groups = AnimationGroups::new();
    let mut unhandled = BTreeSet::new();

    for (name, entry) in sorted {
        let classification = options
            .vocabulary
            .classify(name)
            .ok_or_else(|| SheetError::UnclassifiableFrameName(name.clone()))?;

        if !classification.recognized {
            unhandled.insert(classification.category.clone());
        }
        debug!(
            frame = %name,
            category = %classification.category,
            recognized = classification.recognized,
            "classified frame"
        );

        let descriptor = describe_frame(name, entry)?;
        groups
            .entry(classification.category)
            .or_default()
            .push(descriptor);
    }

    if options.policy == ClassificationPolicy::Strict && unhandled.len() > 1 {
        return Err(SheetError::AmbiguousClassification(
            unhandled.into_iter().collect(),
        ));
    }

    if unhandled.len() == 1 && groups.len() == 1 {
        if let Some((category, frames)) = groups.pop() {
            debug!(%category, "renaming sole animation to {}", DEFAULT_CATEGORY);
            groups.insert(DEFAULT_CATEGORY.to_string(), frames);
        }
    } else if !unhandled.is_empty() {
        warn!(categories = ?unhandled, "unrecognized animation types kept under their own names");
    }

    Ok(groups)
}

/// Build the descriptor for one frame from its raw geometry strings.
pub fn describe_frame(name: &str, entry: &RawFrameEntry) -> Result<FrameDescriptor> {
    let rect = parse_rect(name, &entry.frame)?;
    let size = parse_size(name, "sourceSize", &entry.source_size)?;
    let (Some(x1), Some(y1)) = (rect.x1(), rect.y1()) else {
        return Err(invalid(
            name,
            "frame",
            format!("rectangle '{}' overflows", entry.frame),
        ));
    };

    Ok(FrameDescriptor {
        frame_name: name.to_string(),
        x0: rect.x,
        y0: rect.y,
        x1,
        y1,
        width: size.width,
        height: size.height,
    })
}

/// A frame rectangle is an origin pair followed by an extent pair.
fn parse_rect(owner: &str, value: &str) -> Result<Rect> {
    let pairs = match value.parse::<GeometryTuple>() {
        Ok(GeometryTuple::Pairs(pairs)) => pairs,
        Ok(GeometryTuple::Flat(values)) => return Err(rect_arity(owner, value, values.len())),
        Err(GeometryError::Unpaired { count, .. }) => return Err(rect_arity(owner, value, count)),
        Err(e) => return Err(e.into()),
    };
    let [[x, y], [width, height]] = pairs[..] else {
        return Err(rect_arity(owner, value, pairs.len() * 2));
    };

    let rect = Rect {
        x,
        y,
        width,
        height,
    };
    if rect.is_degenerate() {
        return Err(invalid(
            owner,
            "frame",
            format!("rectangle '{}' has no area", value),
        ));
    }
    Ok(rect)
}

fn parse_size(owner: &str, field: &'static str, value: &str) -> Result<Size> {
    let values = parse_tuple(value)?;
    let [width, height] = values[..] else {
        return Err(invalid(
            owner,
            field,
            format!("expected 2 values in '{}', found {}", value, values.len()),
        ));
    };
    Ok(Size { width, height })
}

fn rect_arity(owner: &str, value: &str, found: usize) -> SheetError {
    invalid(
        owner,
        "frame",
        format!("expected 4 values in '{}', found {}", value, found),
    )
}

fn invalid(owner: &str, field: &'static str, reason: String) -> SheetError {
    SheetError::InvalidFrameGeometry {
        owner: owner.to_string(),
        field,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(frame: &str) -> RawFrameEntry {
        RawFrameEntry {
            frame: frame.to_string(),
            source_size: "{100,100}".to_string(),
            offset: Some("{0,0}".to_string()),
            rotated: false,
            source_color_rect: Some("{{0,0},{100,100}}".to_string()),
        }
    }

    fn frames(names: &[&str]) -> Vec<(String, RawFrameEntry)> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.to_string(), entry(&format!("{{{{{},0}},{{100,100}}}}", i * 100))))
            .collect()
    }

    fn names(groups: &AnimationGroups, category: &str) -> Vec<String> {
        groups[category].iter().map(|f| f.frame_name.clone()).collect()
    }

    #[test]
    fn test_describe_frame() {
        let descriptor = describe_frame("unit_idle_01", &entry("{{303,101},{100,50}}")).unwrap();
        assert_eq!(
            descriptor,
            FrameDescriptor {
                frame_name: "unit_idle_01".to_string(),
                x0: 303,
                y0: 101,
                x1: 403,
                y1: 151,
                width: 100,
                height: 100,
            }
        );
    }

    #[test]
    fn test_frame_arity_three_is_rejected() {
        let err = describe_frame("unit_idle_01", &entry("{10,20,30}")).unwrap_err();
        assert!(matches!(
            err,
            SheetError::InvalidFrameGeometry { field: "frame", .. }
        ));
    }

    #[test]
    fn test_zero_width_frame_is_rejected() {
        let err = describe_frame("unit_idle_01", &entry("{{10,20},{0,30}}")).unwrap_err();
        assert!(matches!(err, SheetError::InvalidFrameGeometry { .. }));
    }

    #[test]
    fn test_frame_edge_overflow_is_rejected() {
        let err = describe_frame("u_idle_01", &entry("{{9223372036854775807,0},{1,1}}"))
            .unwrap_err();
        match err {
            SheetError::InvalidFrameGeometry { field, reason, .. } => {
                assert_eq!(field, "frame");
                assert!(reason.ends_with("overflows"), "unexpected reason: {}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_flat_four_value_frame_is_accepted() {
        let descriptor = describe_frame("unit_idle_01", &entry("{5,6,10,20}")).unwrap();
        assert_eq!((descriptor.x1, descriptor.y1), (15, 26));
    }

    #[test]
    fn test_frame_arity_six_is_rejected() {
        let err = describe_frame("unit_idle_01", &entry("{{0,0},{1,1},{2,2}}")).unwrap_err();
        assert!(matches!(
            err,
            SheetError::InvalidFrameGeometry { field: "frame", .. }
        ));
    }

    #[test]
    fn test_source_size_arity() {
        let mut bad = entry("{{0,0},{1,1}}");
        bad.source_size = "{100}".to_string();
        let err = describe_frame("unit_idle_01", &bad).unwrap_err();
        assert!(matches!(
            err,
            SheetError::InvalidFrameGeometry {
                field: "sourceSize",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_geometry() {
        let err = describe_frame("unit_idle_01", &entry("{{a,0},{1,1}}")).unwrap_err();
        assert!(matches!(err, SheetError::MalformedGeometry(_)));
    }

    #[test]
    fn test_sole_unhandled_category_collapses() {
        let groups = group_frames(
            &frames(&["fx_hex_shield_02", "fx_hex_shield_01"]),
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["default"]);
        assert_eq!(
            names(&groups, "default"),
            vec!["fx_hex_shield_01", "fx_hex_shield_02"]
        );
    }

    #[test]
    fn test_recognized_beside_unhandled_is_kept() {
        let groups = group_frames(
            &frames(&["unit_idle_01", "unit_glow_01"]),
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["glow", "idle"]);
    }

    #[test]
    fn test_sole_recognized_category_is_kept() {
        let groups =
            group_frames(&frames(&["unit_idle_01", "unit_idle_02"]), &ConvertOptions::default())
                .unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["idle"]);
    }

    #[test]
    fn test_two_unhandled_categories_are_kept() {
        let groups = group_frames(
            &frames(&["unit_glow_01", "unit_spark_01"]),
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["glow", "spark"]);
    }

    #[test]
    fn test_strict_rejects_two_unhandled_categories() {
        let options = ConvertOptions {
            policy: ClassificationPolicy::Strict,
            ..Default::default()
        };
        let err = group_frames(&frames(&["unit_spark_01", "unit_glow_01"]), &options).unwrap_err();
        match err {
            SheetError::AmbiguousClassification(categories) => {
                assert_eq!(categories, vec!["glow", "spark"])
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_strict_still_collapses_single_category() {
        let options = ConvertOptions {
            policy: ClassificationPolicy::Strict,
            ..Default::default()
        };
        let groups = group_frames(&frames(&["fx_hex_shield_01"]), &options).unwrap();
        assert!(groups.contains_key(DEFAULT_CATEGORY));
    }

    #[test]
    fn test_unclassifiable_name() {
        let err = group_frames(&frames(&["single.png"]), &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, SheetError::UnclassifiableFrameName(ref n) if n == "single.png"));
    }

    #[test]
    fn test_frames_sorted_within_groups() {
        let groups = group_frames(
            &frames(&["u_run_03", "u_attack_02", "u_run_01", "u_attack_01", "u_run_02"]),
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["attack", "run"]);
        assert_eq!(names(&groups, "run"), vec!["u_run_01", "u_run_02", "u_run_03"]);
        assert_eq!(names(&groups, "attack"), vec!["u_attack_01", "u_attack_02"]);
    }
}
