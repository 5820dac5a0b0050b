use std::{collections::HashMap, env, fs, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub download_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".into(),
            download_dir: None,
        }
    }
}

/// Defaults, then `scribe.toml` in the working directory, then env vars.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("scribe.toml") {
        apply_file_config(&mut settings, &raw);
    }

    if let Ok(v) = env::var("SCRIBE_API_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = env::var("SCRIBE_DOWNLOAD_DIR") {
        settings.download_dir = Some(PathBuf::from(v));
    }

    settings
}

fn apply_file_config(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("api_base_url") {
            settings.api_base_url = v.clone();
        }
        if let Some(v) = file_cfg.get("download_dir") {
            settings.download_dir = Some(PathBuf::from(v));
        }
    }
}

pub fn resolve_download_dir(settings: &Settings) -> PathBuf {
    settings
        .download_dir
        .clone()
        .or_else(dirs::download_dir)
        .unwrap_or_else(env::temp_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_service() {
        let settings = Settings::default();
        assert_eq!(settings.api_base_url, "http://127.0.0.1:8000");
        assert!(settings.download_dir.is_none());
    }

    #[test]
    fn file_config_overrides_defaults() {
        let mut settings = Settings::default();
        apply_file_config(
            &mut settings,
            "api_base_url = \"http://scribe.local:9000\"\ndownload_dir = \"/tmp/out\"\n",
        );
        assert_eq!(settings.api_base_url, "http://scribe.local:9000");
        assert_eq!(settings.download_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut settings = Settings::default();
        apply_file_config(&mut settings, "unrelated = \"value\"\n");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn explicit_download_dir_wins_over_fallbacks() {
        let settings = Settings {
            api_base_url: "http://127.0.0.1:8000".into(),
            download_dir: Some(PathBuf::from("/data/transcripts")),
        };
        assert_eq!(
            resolve_download_dir(&settings),
            PathBuf::from("/data/transcripts")
        );
    }
}
