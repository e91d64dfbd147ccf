//! Object key naming
//!
//! Every object lives in one flat bucket namespace. Generated audio is named
//! after a caller-supplied stem or a UTC timestamp; description audio for an
//! uploaded image reuses the image's stem with a `_desc.mp3` suffix.

use crate::models::MediaKind;
use chrono::{DateTime, Utc};

pub const AUDIO_EXTENSION: &str = "mp3";
pub const DESCRIPTION_SUFFIX: &str = "_desc.mp3";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a"];

/// `YYYYmmddHHMMSS`, always 14 digits.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}

/// Key for synthesized speech. The stem is used as given; `.mp3` is always appended.
pub fn audio_key(filename: Option<&str>, now: DateTime<Utc>) -> String {
    match non_blank(filename) {
        Some(stem) => format!("{}.{}", stem, AUDIO_EXTENSION),
        None => format!("audio_{}.{}", timestamp(now), AUDIO_EXTENSION),
    }
}

/// Key for an uploaded image, from its client-side file name when there is one.
pub fn image_key(filename: Option<&str>, now: DateTime<Utc>) -> String {
    let name = non_blank(filename)
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or(name))
        .map(|name| name.split_whitespace().collect::<Vec<_>>().join("_"))
        .filter(|name| !name.is_empty() && name != "." && name != "..");

    match name {
        Some(name) if extension(&name).is_some() => name,
        Some(name) => format!("{}.jpg", name),
        None => format!("image_{}.jpg", timestamp(now)),
    }
}

pub fn description_audio_key(image_key: &str) -> String {
    format!("{}{}", stem(image_key), DESCRIPTION_SUFFIX)
}

pub fn media_kind(key: &str) -> MediaKind {
    match extension(key).map(|ext| ext.to_ascii_lowercase()) {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Image,
        Some(ext) if AUDIO_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Audio,
        _ => MediaKind::Other,
    }
}

pub fn is_image(key: &str) -> bool {
    media_kind(key) == MediaKind::Image
}

pub fn display_name(key: &str) -> String {
    stem(key).to_string()
}

/// Content type implied by the key, for objects stored without one.
pub fn content_type_for(key: &str) -> &'static str {
    match extension(key).map(|ext| ext.to_ascii_lowercase()).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn url_encode(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn extension(key: &str) -> Option<&str> {
    match key.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

fn stem(key: &str) -> &str {
    match key.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem,
        _ => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap()
    }

    #[test]
    fn test_timestamp_is_fourteen_digits() {
        let ts = timestamp(fixed_now());
        assert_eq!(ts, "20240309070502");
        assert_eq!(ts.len(), 14);
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_audio_key_defaults_to_timestamp() {
        assert_eq!(audio_key(None, fixed_now()), "audio_20240309070502.mp3");
        assert_eq!(
            audio_key(Some("   "), fixed_now()),
            "audio_20240309070502.mp3"
        );
    }

    #[test]
    fn test_audio_key_uses_stem_verbatim() {
        assert_eq!(audio_key(Some("foo"), fixed_now()), "foo.mp3");
        assert_eq!(audio_key(Some("foo.mp3"), fixed_now()), "foo.mp3.mp3");
    }

    #[test]
    fn test_image_key_from_upload_name() {
        assert_eq!(image_key(Some("cat.png"), fixed_now()), "cat.png");
        assert_eq!(
            image_key(Some("C:\\Users\\me\\my photo.jpg"), fixed_now()),
            "my_photo.jpg"
        );
        assert_eq!(image_key(Some("scan"), fixed_now()), "scan.jpg");
    }

    #[test]
    fn test_image_key_defaults_to_timestamp() {
        assert_eq!(image_key(None, fixed_now()), "image_20240309070502.jpg");
        assert_eq!(image_key(Some("../"), fixed_now()), "image_20240309070502.jpg");
    }

    #[test]
    fn test_description_audio_key() {
        assert_eq!(description_audio_key("cat.png"), "cat_desc.mp3");
        assert_eq!(
            description_audio_key("image_20240309070502.jpg"),
            "image_20240309070502_desc.mp3"
        );
        assert_eq!(description_audio_key("noext"), "noext_desc.mp3");
    }

    #[test]
    fn test_media_kind_by_extension() {
        assert_eq!(media_kind("a.JPG"), MediaKind::Image);
        assert_eq!(media_kind("a.mp3"), MediaKind::Audio);
        assert_eq!(media_kind("notes.txt"), MediaKind::Other);
        assert_eq!(media_kind(".mp3"), MediaKind::Other);
        assert!(is_image("x.webp"));
        assert!(!is_image("x_desc.mp3"));
    }

    #[test]
    fn test_display_name_strips_extension() {
        assert_eq!(display_name("hello.mp3"), "hello");
        assert_eq!(display_name("archive.tar.gz"), "archive.tar");
        assert_eq!(display_name("README"), "README");
    }

    #[test]
    fn test_url_encode() {
        assert_eq!(url_encode("cat_desc.mp3"), "cat_desc.mp3");
        assert_eq!(url_encode("a b/c?.mp3"), "a%20b%2Fc%3F.mp3");
        assert_eq!(url_encode("café"), "caf%C3%A9");
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.mp3"), "audio/mpeg");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a"), "application/octet-stream");
    }
}
