//! `WATCH_CHANNELS` parsing.

/// Strips `https://t.me/` / `http://t.me/` and a leading `@`. Blank input stays blank.
pub fn normalize_channel_handle(raw: &str) -> String {
    let handle = raw.trim();
    let handle = handle
        .strip_prefix("https://t.me/")
        .or_else(|| handle.strip_prefix("http://t.me/"))
        .unwrap_or(handle);
    handle.strip_prefix('@').unwrap_or(handle).trim().to_string()
}

/// Comma-separated list → normalized handles, blanks dropped, order kept.
pub fn parse_watch_channels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_channel_handle)
        .filter(|h| !h.is_empty())
        .collect()
}
