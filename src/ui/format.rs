/// `M:SS` below one hour, `H:MM:SS` from one hour up.
pub fn format_time(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// File name for menus and the status line, or the whole path if it has none.
pub fn display_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero() {
        assert_eq!(format_time(0), "0:00");
    }

    #[test]
    fn minutes_are_not_padded() {
        assert_eq!(format_time(65_000), "1:05");
        assert_eq!(format_time(59_999), "0:59");
        assert_eq!(format_time(3_599_000), "59:59");
    }

    #[test]
    fn hours_pad_minutes() {
        assert_eq!(format_time(3_600_000), "1:00:00");
        assert_eq!(format_time(3_661_000), "1:01:01");
        assert_eq!(format_time(36_000_000), "10:00:00");
    }

    #[test]
    fn display_name_strips_directories() {
        assert_eq!(display_name("/videos/holiday.mkv"), "holiday.mkv");
        assert_eq!(display_name("clip.mp4"), "clip.mp4");
        assert_eq!(display_name("/"), "/");
    }
}
