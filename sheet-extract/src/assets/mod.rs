//! Game resource tree handling
//!
//! Locates sprite-sheet plists and textures inside a checked-out game
//! repository and mirrors them into an output folder.

use std::io;
use std::path::PathBuf;

pub mod relocate;
pub mod walk;

pub use relocate::*;
pub use walk::*;

/// Location of the asset tree relative to the repository root.
pub const RESOURCES_FOLDER: &str = "app/resources";

/// Top-level resource folders whose plists are not animations (static images,
/// particle effects and the like).
pub const DEFAULT_EXCLUDED_FOLDERS: &[&str] = &[
    "arena",
    "booster_pack_opening",
    "core_gem",
    "loot_crates",
    "maps",
    "matchmaking",
    "particles",
    "prismatic",
    "rift",
    "runes",
    "scenes",
    "tiles",
    "tutorial",
];

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("resources folder not found: {}", .0.display())]
    MissingResources(PathBuf),
    #[error("failed to create folder {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    #[error("{failed} of {total} sprite sheets failed to convert")]
    ConversionFailures { failed: usize, total: usize },
}
