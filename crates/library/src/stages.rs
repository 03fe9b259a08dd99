use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const ORIGINAL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
const MODIFIED_EXTENSIONS: &[&str] = &["png"];

/// An original picture and its altered copy, matched by the number their names start with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImagePairPaths {
    pub number: u32,
    pub original: PathBuf,
    pub modified: PathBuf,
}

/// Pairs `<original_dir>/<N>.<jpg|png>` with `<modified_dir>/<N>-*.png` (or `<N>.png`),
/// ordered by `N`. Originals without a partner are skipped.
pub fn scan_image_pairs<P, Q>(original_dir: P, modified_dir: Q) -> Result<Vec<ImagePairPaths>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let originals = numbered_files(original_dir.as_ref(), ORIGINAL_EXTENSIONS)?;
    let modified = numbered_files(modified_dir.as_ref(), MODIFIED_EXTENSIONS)?;

    let mut pairs = Vec::new();
    for (number, original) in originals {
        match modified.get(&number) {
            Some(partner) => pairs.push(ImagePairPaths {
                number,
                original,
                modified: partner.clone(),
            }),
            None => warn!(number, ?original, "no modified image for stage, skipping"),
        }
    }
    if pairs.is_empty() {
        warn!("no original/modified image pairs found");
    } else {
        info!(count = pairs.len(), "found image pairs");
    }
    Ok(pairs)
}

/// Leading decimal digits of a file stem, when followed by nothing or `-`.
fn number_prefix(stem: &str) -> Option<u32> {
    let digits_end = stem
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(stem.len());
    if digits_end == 0 {
        return None;
    }
    let rest = &stem[digits_end..];
    if !rest.is_empty() && !rest.starts_with('-') {
        return None;
    }
    stem[..digits_end].parse().ok()
}

fn numbered_files(dir: &Path, extensions: &[&str]) -> Result<BTreeMap<u32, PathBuf>> {
    let mut found = BTreeMap::new();
    if !dir.is_dir() {
        warn!(?dir, "image directory not found");
        return Ok(found);
    }
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read image directory {:?}", dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    for path in paths {
        let ext_ok = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false);
        if !ext_ok {
            continue;
        }
        let number = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(number_prefix);
        if let Some(number) = number {
            found.entry(number).or_insert(path);
        }
    }
    Ok(found)
}
