use regex::Regex;
use url::Url;

/// Pulls the 11-character video id out of user input: a full YouTube URL
/// (`watch?v=`, `youtu.be/`, `embed/`) or a bare id.
pub fn extract_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let id_pattern = Regex::new(r"^[A-Za-z0-9_-]{11}$").ok()?;

    if id_pattern.is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    let parsed = Url::parse(trimmed).ok()?;
    let host = parsed.host_str()?.trim_start_matches("www.").to_string();

    let candidate = match host.as_str() {
        "youtu.be" => parsed.path_segments()?.next().map(str::to_string),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => {
            if let Some(embedded) = parsed.path().strip_prefix("/embed/") {
                Some(embedded.to_string())
            } else {
                parsed
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())
            }
        }
        _ => None,
    }?;

    if id_pattern.is_match(&candidate) {
        Some(candidate)
    } else {
        None
    }
}

/// Sanitize a track title into a usable filename
pub fn sanitize_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    cleaned.trim_matches(|c| c == '.' || c == ' ').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_from_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_from_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_bare_id() {
        assert_eq!(
            extract_video_id("dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_rejects_other_hosts_and_garbage() {
        assert_eq!(extract_video_id("https://vimeo.com/123456"), None);
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("A/B: C?"), "A_B_ C_");
        assert_eq!(sanitize_filename("  trailing dots..."), "trailing dots");
        assert_eq!(sanitize_filename("normal-name"), "normal-name");
    }
}
