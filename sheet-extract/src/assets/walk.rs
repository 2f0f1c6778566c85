use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use sheet::{ConvertOptions, SheetMetadata};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// A plist to convert and where its JSON record goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlistJob {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Outcome of converting a batch of plists.
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub converted: usize,
    pub failures: Vec<(PathBuf, anyhow::Error)>,
}

impl ConversionReport {
    pub fn total(&self) -> usize {
        self.converted + self.failures.len()
    }
}

/// Find every plist under `resources` outside the excluded top-level folders.
///
/// Targets mirror the relative path under `dest` with a `.json` extension.
pub fn plist_jobs(resources: &Path, dest: &Path, excluded: &BTreeSet<String>) -> Vec<PlistJob> {
    files_with_extension(resources, "plist")
        .filter_map(|source| {
            let relative = source.strip_prefix(resources).ok()?.to_path_buf();
            if is_excluded(&relative, excluded) {
                debug!(path = %relative.display(), "skipping excluded plist");
                return None;
            }
            Some(PlistJob {
                target: dest.join(&relative).with_extension("json"),
                source,
            })
        })
        .collect()
}

/// Regular files below `root` with the given extension, in file name order.
pub(crate) fn files_with_extension<'a>(
    root: &Path,
    extension: &'a str,
) -> impl Iterator<Item = PathBuf> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(%err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(move |entry| entry.path().extension().is_some_and(|ext| ext == extension))
        .map(|entry| entry.into_path())
}

fn is_excluded(relative: &Path, excluded: &BTreeSet<String>) -> bool {
    match relative.components().next() {
        Some(Component::Normal(top)) => top.to_str().is_some_and(|top| excluded.contains(top)),
        _ => false,
    }
}

/// Convert one plist and write its JSON record.
///
/// Nothing is written unless the whole record converts.
pub fn convert_job(job: &PlistJob, options: &ConvertOptions, pretty: bool) -> Result<SheetMetadata> {
    let data = fs::read(&job.source)
        .with_context(|| format!("failed to read {}", job.source.display()))?;
    let sheet = SheetMetadata::from_plist_bytes(&data, options)
        .with_context(|| format!("failed to convert {}", job.source.display()))?;

    let json = if pretty {
        sheet.to_json_pretty()?
    } else {
        sheet.to_json()?
    };

    if let Some(parent) = job.target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&job.target, json)
        .with_context(|| format!("failed to write {}", job.target.display()))?;

    Ok(sheet)
}

/// Convert all jobs in parallel. A failing file does not stop the others.
pub fn convert_all(jobs: &[PlistJob], options: &ConvertOptions, pretty: bool) -> ConversionReport {
    let results: Vec<(&PlistJob, Result<SheetMetadata>)> = jobs
        .par_iter()
        .map(|job| (job, convert_job(job, options, pretty)))
        .collect();

    let mut report = ConversionReport::default();
    for (job, result) in results {
        match result {
            Ok(sheet) => {
                info!(
                    path = %job.target.display(),
                    animations = sheet.frames.len(),
                    frames = sheet.frame_count(),
                    "converted"
                );
                report.converted += 1;
            }
            Err(err) => {
                error!(path = %job.source.display(), "{:#}", err);
                report.failures.push((job.source.clone(), err));
            }
        }
    }
    report
}
