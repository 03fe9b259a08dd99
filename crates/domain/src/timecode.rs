/// Renders milliseconds as `mm:ss`, truncating to whole seconds.
/// Minutes are not wrapped at the hour.
pub fn format_clock(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// `"mm:ss / mm:ss"` for a position within a track. A zero duration (media not
/// loaded yet) renders as `00:00`.
pub fn format_progress(position_ms: u64, duration_ms: u64) -> String {
    format!("{} / {}", format_clock(position_ms), format_clock(duration_ms))
}
