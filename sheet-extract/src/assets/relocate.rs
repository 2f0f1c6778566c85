use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::ExtractError;
use super::walk::files_with_extension;

/// Pair every PNG under `resources` with its mirrored path under `dest`.
pub fn png_moves(resources: &Path, dest: &Path) -> Vec<(PathBuf, PathBuf)> {
    files_with_extension(resources, "png")
        .filter_map(|source| {
            let target = dest.join(source.strip_prefix(resources).ok()?);
            Some((source, target))
        })
        .collect()
}

/// Move PNG textures out of the resource tree, keeping their folder layout.
///
/// Returns the number of files moved.
pub fn move_png_assets(resources: &Path, dest: &Path) -> Result<usize, ExtractError> {
    let moves = png_moves(resources, dest);

    let folders: BTreeSet<&Path> = moves.iter().filter_map(|(_, to)| to.parent()).collect();
    for folder in folders {
        fs::create_dir_all(folder).map_err(|source| ExtractError::CreateDir {
            path: folder.to_path_buf(),
            source,
        })?;
    }

    for (from, to) in &moves {
        debug!(from = %from.display(), to = %to.display(), "moving texture");
        move_file(from, to)?;
    }
    Ok(moves.len())
}

fn move_file(from: &Path, to: &Path) -> Result<(), ExtractError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    // rename cannot cross filesystems
    fs::copy(from, to)
        .and_then(|_| fs::remove_file(from))
        .map_err(|source| ExtractError::Move {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
}
