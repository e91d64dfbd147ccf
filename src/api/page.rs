//! Listing page rendering

use crate::ai::{TTS_MODELS, VOICES};
use crate::gateway::GatewaySettings;
use crate::models::FileEntry;
use crate::Result;
use minijinja::{context, Environment};

pub const INDEX_TEMPLATE: &str = "index.html";

/// Template environment with every page template registered.
pub fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template(INDEX_TEMPLATE, include_str!("../../templates/index.html"))?;
    Ok(env)
}

pub fn render_index(
    env: &Environment<'_>,
    files: &[FileEntry],
    settings: &GatewaySettings,
) -> Result<String> {
    let template = env.get_template(INDEX_TEMPLATE)?;
    let html = template.render(context! {
        files => files,
        voices => VOICES,
        models => TTS_MODELS,
        default_voice => settings.default_voice,
        default_model => settings.default_model,
    })?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;

    fn entry(key: &str, path: &str, kind: MediaKind) -> FileEntry {
        FileEntry {
            key: key.to_string(),
            path: path.to_string(),
            display_name: key.rsplit_once('.').map(|(s, _)| s).unwrap_or(key).to_string(),
            kind,
            is_image: kind == MediaKind::Image,
            size: 10,
            last_modified: None,
            url: format!("http://s3.local/media/{}", path),
        }
    }

    #[test]
    fn test_render_empty_listing() {
        let env = environment().unwrap();
        let html = render_index(&env, &[], &GatewaySettings::default()).unwrap();

        assert!(html.contains("action=\"/generate-audio\""));
        assert!(html.contains("action=\"/analyze-image\""));
        assert!(html.contains("No files yet"));
        for voice in VOICES {
            assert!(html.contains(&format!("value=\"{}\"", voice)));
        }
    }

    #[test]
    fn test_render_listing_rows() {
        let env = environment().unwrap();
        let files = vec![
            entry("my cat.jpg", "my%20cat.jpg", MediaKind::Image),
            entry("my_cat_desc.mp3", "my_cat_desc.mp3", MediaKind::Audio),
        ];
        let html = render_index(&env, &files, &GatewaySettings::default()).unwrap();

        assert!(html.contains("<img class=\"thumb\""));
        assert!(html.contains("my%20cat.jpg\" alt=\"my cat\""));
        assert!(html.contains("src=\"/play-audio/my_cat_desc.mp3\""));
        assert!(html.contains("href=\"/download/my%20cat.jpg\""));
        assert!(html.contains("action=\"/delete_file/my_cat_desc.mp3\""));
        assert!(!html.contains("No files yet"));
    }

    #[test]
    fn test_render_escapes_names() {
        let env = environment().unwrap();
        let files = vec![entry("<b>.mp3", "%3Cb%3E.mp3", MediaKind::Audio)];
        let html = render_index(&env, &files, &GatewaySettings::default()).unwrap();

        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;"));
    }
}
