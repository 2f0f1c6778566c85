//! Sprite-sheet extraction CLI
//!
//! Converts the animation plists of a game resource tree into JSON frame
//! records, optionally moving the textures alongside them.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sheet::{
    ClassificationPolicy, ConvertOptions, DEFAULT_CATEGORY, SheetMetadata, Vocabulary,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod assets;

use assets::{ExtractError, DEFAULT_EXCLUDED_FOLDERS, RESOURCES_FOLDER};

#[derive(Parser)]
#[command(name = "sheet-extract")]
#[command(about = "Convert sprite-sheet plists into per-animation JSON frame records")]
#[command(version)]
struct Cli {
    /// Log every classified frame
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every animation plist in a game repository
    Convert {
        /// Path to the cloned game repository
        #[arg(long)]
        src: PathBuf,

        /// Folder to generate assets in
        #[arg(long, default_value = "assets")]
        dest: PathBuf,

        /// Also move PNG textures into the destination
        #[arg(long, overrides_with = "no_move_png")]
        move_png: bool,

        /// Leave PNG textures in the resource tree (default)
        #[arg(long, overrides_with = "move_png")]
        no_move_png: bool,

        /// Top-level resource folder to skip (repeatable, replaces the built-in list)
        #[arg(long = "exclude", value_name = "FOLDER")]
        exclude: Vec<String>,

        /// Number of worker threads (defaults to one per core)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        classify: ClassifyArgs,
    },

    /// Convert a single plist file
    File {
        /// Plist to convert
        input: PathBuf,

        /// Output JSON path (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        classify: ClassifyArgs,
    },

    /// List the animations found in a plist
    Inspect {
        /// Plist to inspect
        input: PathBuf,

        #[command(flatten)]
        classify: ClassifyArgs,
    },
}

#[derive(Args)]
struct ClassifyArgs {
    /// Extra animation type to recognize (repeatable)
    #[arg(long = "animation", value_name = "NAME")]
    animations: Vec<String>,

    /// File with one animation type per line, replacing the built-in list
    #[arg(long, value_name = "PATH")]
    vocabulary_file: Option<PathBuf>,

    /// Fail on sheets with more than one unrecognized animation type
    #[arg(long)]
    strict: bool,
}

impl ClassifyArgs {
    fn options(&self) -> Result<ConvertOptions> {
        let mut vocabulary = match self.vocabulary_file {
            Some(ref path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read vocabulary {}", path.display()))?;
                Vocabulary::from_lines(&text)
            }
            None => Vocabulary::default(),
        };
        vocabulary.extend(self.animations.iter().cloned());

        Ok(ConvertOptions {
            vocabulary,
            policy: if self.strict {
                ClassificationPolicy::Strict
            } else {
                ClassificationPolicy::Collapse
            },
        })
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "sheet_extract=debug,sheet=debug"
    } else {
        "sheet_extract=info,sheet=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn read_sheet(input: &Path, options: &ConvertOptions) -> Result<SheetMetadata> {
    let data = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    SheetMetadata::from_plist_bytes(&data, options)
        .with_context(|| format!("failed to convert {}", input.display()))
}

/// Human-readable summary of a converted sheet.
fn describe(sheet: &SheetMetadata, vocabulary: &Vocabulary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Texture: {} ({}x{})",
        sheet.texture_filename, sheet.width, sheet.height
    );
    let _ = writeln!(out, "Frames: {}", sheet.frame_count());
    let _ = writeln!(out, "Animations:");
    for (name, frames) in &sheet.frames {
        let note = if name == DEFAULT_CATEGORY {
            " [collapsed]"
        } else if vocabulary.contains(name) {
            ""
        } else {
            " [unrecognized]"
        };
        let _ = writeln!(out, "  {} ({} frames){}", name, frames.len(), note);
    }
    out
}

fn run_convert(
    src: &Path,
    dest: &Path,
    move_png: bool,
    exclude: Vec<String>,
    pretty: bool,
    options: &ConvertOptions,
) -> Result<()> {
    let resources = src.join(RESOURCES_FOLDER);
    if !resources.is_dir() {
        return Err(ExtractError::MissingResources(resources).into());
    }

    if move_png {
        let moved = assets::move_png_assets(&resources, dest)?;
        info!(count = moved, dest = %dest.display(), "moved textures");
    }

    let excluded: BTreeSet<String> = if exclude.is_empty() {
        DEFAULT_EXCLUDED_FOLDERS.iter().map(|s| s.to_string()).collect()
    } else {
        exclude.into_iter().collect()
    };

    let jobs = assets::plist_jobs(&resources, dest, &excluded);
    info!(count = jobs.len(), "found sprite sheets");

    let report = assets::convert_all(&jobs, options, pretty);
    if !report.failures.is_empty() {
        return Err(ExtractError::ConversionFailures {
            failed: report.failures.len(),
            total: report.total(),
        }
        .into());
    }

    info!(count = report.converted, "done");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            src,
            dest,
            move_png,
            no_move_png: _,
            exclude,
            jobs,
            pretty,
            classify,
        } => {
            let options = classify.options()?;
            match jobs {
                Some(threads) => rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?
                    .install(|| run_convert(&src, &dest, move_png, exclude, pretty, &options)),
                None => run_convert(&src, &dest, move_png, exclude, pretty, &options),
            }
        }

        Commands::File {
            input,
            output,
            pretty,
            classify,
        } => {
            let options = classify.options()?;
            let sheet = read_sheet(&input, &options)?;
            let json = if pretty {
                sheet.to_json_pretty()?
            } else {
                sheet.to_json()?
            };

            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "converted");
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    writeln!(stdout, "{}", json)?;
                    stdout.flush()?;
                }
            }
            Ok(())
        }

        Commands::Inspect { input, classify } => {
            let options = classify.options()?;
            let sheet = read_sheet(&input, &options)?;
            print!("{}", describe(&sheet, &options.vocabulary));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheet::FrameDescriptor;

    fn frame(name: &str) -> FrameDescriptor {
        FrameDescriptor {
            frame_name: name.to_string(),
            x0: 0,
            y0: 0,
            x1: 10,
            y1: 10,
            width: 10,
            height: 10,
        }
    }

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "sheet-extract",
            "convert",
            "--src",
            "open-duelyst",
            "--move-png",
            "--exclude",
            "maps",
            "--animation",
            "glow",
            "--strict",
        ])
        .unwrap();

        match cli.command {
            Commands::Convert {
                src,
                dest,
                move_png,
                exclude,
                classify,
                ..
            } => {
                assert_eq!(src, PathBuf::from("open-duelyst"));
                assert_eq!(dest, PathBuf::from("assets"));
                assert!(move_png);
                assert_eq!(exclude, vec!["maps"]);
                let options = classify.options().unwrap();
                assert!(options.vocabulary.contains("glow"));
                assert!(options.vocabulary.contains("idle"));
                assert_eq!(options.policy, ClassificationPolicy::Strict);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_cli_last_move_png_flag_wins() {
        let parse = |flags: &[&str]| {
            let mut args = vec!["sheet-extract", "convert", "--src", "open-duelyst"];
            args.extend_from_slice(flags);
            match Cli::try_parse_from(args).unwrap().command {
                Commands::Convert { move_png, .. } => move_png,
                _ => panic!("expected convert"),
            }
        };

        assert!(!parse(&[]));
        assert!(!parse(&["--no-move-png"]));
        assert!(!parse(&["--move-png", "--no-move-png"]));
        assert!(parse(&["--no-move-png", "--move-png"]));
    }

    #[test]
    fn test_describe_marks_categories() {
        let mut sheet = SheetMetadata {
            texture_filename: "unit.png".to_string(),
            width: 256,
            height: 128,
            frames: Default::default(),
        };
        sheet
            .frames
            .insert("glow".to_string(), vec![frame("unit_glow_01")]);
        sheet.frames.insert(
            "idle".to_string(),
            vec![frame("unit_idle_01"), frame("unit_idle_02")],
        );

        assert_eq!(
            describe(&sheet, &Vocabulary::default()),
            "Texture: unit.png (256x128)\n\
             Frames: 3\n\
             Animations:\n  \
             glow (1 frames) [unrecognized]\n  \
             idle (2 frames)\n"
        );
    }

    #[test]
    fn test_missing_resources_folder() {
        let src = tempfile::tempdir().unwrap();
        let err = run_convert(
            src.path(),
            Path::new("unused"),
            false,
            Vec::new(),
            false,
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("resources folder not found"));
    }
}
