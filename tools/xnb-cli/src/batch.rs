//! Sequential batch driver
//!
//! Converts a single file or every matching file below a directory. A file
//! that fails is logged and skipped; the caller decides what a non-zero
//! failure count means.

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use xnb_extract::convert::{self, Written};
use xnb_extract::{ContainerCodec, ConvertOptions, ImageCodec, TEXT_EXT};

/// Which way files are converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Unpack,
    Pack,
}

impl Direction {
    /// Extension of files this direction reads
    fn source_ext<'c>(self, codec: &'c dyn ContainerCodec) -> &'c str {
        match self {
            Direction::Unpack => codec.extension(),
            Direction::Pack => TEXT_EXT,
        }
    }

    /// Extension of files this direction writes
    fn target_ext<'c>(self, codec: &'c dyn ContainerCodec) -> &'c str {
        match self {
            Direction::Unpack => TEXT_EXT,
            Direction::Pack => codec.extension(),
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            Direction::Unpack => "Unpacked",
            Direction::Pack => "Packed",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Unpack => "unpack",
            Direction::Pack => "pack",
        })
    }
}

/// Outcome of a batch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.converted + self.failed
    }
}

/// Convert `input` (file or directory) into `output`.
///
/// Without an explicit output, files are written next to their input with
/// the target extension.
pub fn run(
    direction: Direction,
    input: &Path,
    output: Option<&Path>,
    codec: &dyn ContainerCodec,
    images: &dyn ImageCodec,
    opts: &ConvertOptions,
) -> Result<Summary> {
    if !input.exists() {
        anyhow::bail!("Input not found: {}", input.display());
    }

    let target_ext = direction.target_ext(codec);
    let jobs: Vec<(PathBuf, PathBuf)> = if input.is_dir() {
        let out_root = output.unwrap_or(input);
        collect_dir(input, direction.source_ext(codec))
            .into_iter()
            .filter_map(|source| {
                let rel = source.strip_prefix(input).ok()?.with_extension(target_ext);
                Some((out_root.join(rel), source))
            })
            .collect()
    } else {
        let target = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| input.with_extension(target_ext));
        vec![(target, input.to_path_buf())]
    };

    if jobs.is_empty() {
        tracing::warn!(
            "No .{} files found in {}",
            direction.source_ext(codec),
            input.display()
        );
    }

    let mut summary = Summary::default();
    for (target, source) in jobs {
        match convert_one(direction, &source, &target, codec, images, opts) {
            Ok(written) => {
                tracing::debug!(
                    "{:?} -> {:?} (+{} sidecars)",
                    source,
                    written.primary,
                    written.sidecars.len()
                );
                summary.converted += 1;
            }
            Err(e) => {
                tracing::error!("{:#}", e);
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

/// Files below `dir` with extension `ext`, in a stable order
fn collect_dir(dir: &Path, ext: &str) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(ext))
        .collect()
}

fn convert_one(
    direction: Direction,
    source: &Path,
    target: &Path,
    codec: &dyn ContainerCodec,
    images: &dyn ImageCodec,
    opts: &ConvertOptions,
) -> Result<Written> {
    let result = match direction {
        Direction::Unpack => convert::unpack_file(source, target, codec, images, opts),
        Direction::Pack => convert::pack_file(source, target, codec, images, opts),
    };
    result.with_context(|| format!("Failed to {} {}", direction, source.display()))
}
