use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey};
use symphonia::core::probe::Hint;

/// Whatever the container tells us without decoding any audio.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackInfo {
    pub title: Option<String>,
    pub duration_ms: Option<u64>,
}

pub fn probe_track<P: AsRef<Path>>(path: P) -> Result<TrackInfo> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).with_context(|| format!("open audio file {:?}", path_ref))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path_ref.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let mut probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .with_context(|| format!("probe audio file {:?}", path_ref))?;

    let mut title = probed
        .metadata
        .get()
        .and_then(|metadata| title_tag(metadata.current()));
    let mut format = probed.format;
    if title.is_none() {
        title = title_tag(format.metadata().current());
    }

    let duration_ms = format.default_track().and_then(|track| {
        let frames = track.codec_params.n_frames?;
        let rate = track.codec_params.sample_rate.filter(|rate| *rate > 0)?;
        Some(frames * 1000 / rate as u64)
    });

    Ok(TrackInfo { title, duration_ms })
}

fn title_tag(revision: Option<&MetadataRevision>) -> Option<String> {
    revision?
        .tags()
        .iter()
        .find(|tag| matches!(tag.std_key, Some(StandardTagKey::TrackTitle)))
        .map(|tag| {
            tag.value
                .to_string()
                .trim_matches(|c: char| c.is_whitespace() || c == '\0')
                .to_string()
        })
        .filter(|title| !title.is_empty())
}
