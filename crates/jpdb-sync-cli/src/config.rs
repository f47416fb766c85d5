use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jpdb_sync::ImportRequest;
use serde::{Deserialize, Serialize};

/// Settings remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub api_key: String,
    /// Local deck imports are written into.
    #[serde(default = "default_deck_name")]
    pub deck_name: String,
    /// Local note type used for imported notes.
    #[serde(default = "default_note_type")]
    pub note_type: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            deck_name: default_deck_name(),
            note_type: default_note_type(),
        }
    }
}

fn default_deck_name() -> String {
    "JPDB Import".into()
}

fn default_note_type() -> String {
    "Basic".into()
}

/// Settings file path: `~/.config/jpdb-sync/settings.toml`
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jpdb-sync").join("settings.toml"))
}

/// Load settings, falling back to defaults if missing.
pub fn load_settings() -> Settings {
    match settings_path() {
        Some(path) => load_from(&path),
        None => Settings::default(),
    }
}

pub fn load_from(path: &Path) -> Settings {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return Settings::default();
    };

    match toml::from_str::<Settings>(&contents) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(
                "failed to parse settings at {}, using defaults: {e}",
                path.display()
            );
            Settings::default()
        }
    }
}

/// Settings to persist before an import: the deck name and note type the
/// run will use. Returns `None` when nothing changed or the deck name is
/// blank. The stored key is kept as is, so a key passed for one run is
/// never written.
pub fn remembered(settings: &Settings, request: &ImportRequest) -> Option<Settings> {
    let deck_name = request.target_deck.trim();
    if deck_name.is_empty() {
        return None;
    }

    let updated = Settings {
        api_key: settings.api_key.clone(),
        deck_name: deck_name.to_owned(),
        note_type: request.note_type.clone(),
    };
    (updated != *settings).then_some(updated)
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let path = settings_path().context("could not determine config directory")?;
    save_to(&path, settings)
}

pub fn save_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory: {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(settings).context("failed to serialize settings")?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write settings: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_fresh_install() {
        let settings = Settings::default();
        assert_eq!(settings.api_key, "");
        assert_eq!(settings.deck_name, "JPDB Import");
        assert_eq!(settings.note_type, "Basic");
    }

    #[test]
    fn parse_full_settings_from_toml() {
        let toml_str = r#"
api_key = "abc123"
deck_name = "Mining"
note_type = "Vocab"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.api_key, "abc123");
        assert_eq!(settings.deck_name, "Mining");
        assert_eq!(settings.note_type, "Vocab");
    }

    #[test]
    fn missing_keys_default_individually() {
        let settings: Settings = toml::from_str(r#"api_key = "abc123""#).unwrap();
        assert_eq!(settings.api_key, "abc123");
        assert_eq!(settings.deck_name, "JPDB Import");
        assert_eq!(settings.note_type, "Basic");
    }

    fn import_request(deck: &str, note_type: &str) -> ImportRequest {
        ImportRequest {
            deck_id: 1,
            target_deck: deck.into(),
            note_type: note_type.into(),
        }
    }

    #[test]
    fn blank_deck_name_is_never_remembered() {
        let settings = Settings::default();
        assert_eq!(remembered(&settings, &import_request("", "Vocab")), None);
        assert_eq!(remembered(&settings, &import_request("   ", "Vocab")), None);
    }

    #[test]
    fn unchanged_settings_are_not_saved_again() {
        let settings = Settings::default();
        let request = import_request("  JPDB Import ", "Basic");
        assert_eq!(remembered(&settings, &request), None);
    }

    #[test]
    fn new_deck_and_note_type_are_remembered_with_stored_key() {
        let settings = Settings {
            api_key: "stored-key".into(),
            ..Settings::default()
        };

        // The run itself used a key from --api-key; only the stored one is kept.
        let updated = remembered(&settings, &import_request(" Mining ", "Vocab")).unwrap();
        assert_eq!(updated.api_key, "stored-key");
        assert_eq!(updated.deck_name, "Mining");
        assert_eq!(updated.note_type, "Vocab");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("jpdb-sync-missing-settings.toml");
        assert_eq!(load_from(&path), Settings::default());
    }

    #[test]
    fn unparsable_file_uses_defaults() {
        let dir = std::env::temp_dir().join(format!("jpdb-sync-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "api_key = [not toml").unwrap();

        assert_eq!(load_from(&path), Settings::default());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn saved_settings_are_loaded_back() {
        let dir = std::env::temp_dir().join(format!("jpdb-sync-save-{}", std::process::id()));
        let path = dir.join("nested").join("settings.toml");
        let settings = Settings {
            api_key: "key".into(),
            deck_name: "日本語".into(),
            note_type: "Basic".into(),
        };

        save_to(&path, &settings).unwrap();
        assert_eq!(load_from(&path), settings);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
