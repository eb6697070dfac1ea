use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::error::PlayerError;

/// Player configuration, fixed once the widget is constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Address of the video to play.
    #[serde(rename = "videoUrl")]
    pub source: String,
    /// Selector of the element the controls are inserted into.
    #[serde(rename = "videoPlayerContainer")]
    pub container: String,
    pub volume: f64,
    #[serde(rename = "playbackRate")]
    pub playback_rate: f64,
    /// Seconds added on a forward skip.
    #[serde(rename = "skipNext")]
    pub skip_next: f64,
    /// Seconds added on a backward skip, usually negative.
    #[serde(rename = "skipPrev")]
    pub skip_prev: f64,
}

/// The settings every player starts from.
pub fn defaults() -> Settings {
    Settings {
        source: String::new(),
        container: ".myplayer".to_string(),
        volume: 1.0,
        playback_rate: 1.0,
        skip_next: 2.0,
        skip_prev: -2.0,
    }
}

impl Default for Settings {
    fn default() -> Self {
        defaults()
    }
}

impl Settings {
    /// Defaults with every field present in `overrides` replaced.
    pub fn with_overrides(overrides: SettingsOverrides) -> Self {
        defaults().merge(overrides)
    }

    pub fn merge(self, overrides: SettingsOverrides) -> Self {
        Settings {
            source: overrides.source.unwrap_or(self.source),
            container: overrides.container.unwrap_or(self.container),
            volume: overrides.volume.unwrap_or(self.volume),
            playback_rate: overrides.playback_rate.unwrap_or(self.playback_rate),
            skip_next: overrides.skip_next.unwrap_or(self.skip_next),
            skip_prev: overrides.skip_prev.unwrap_or(self.skip_prev),
        }
    }
}

/// Caller-supplied settings. Absent fields keep their default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SettingsOverrides {
    #[serde(rename = "videoUrl", alias = "source")]
    pub source: Option<String>,
    #[serde(rename = "videoPlayerContainer", alias = "container")]
    pub container: Option<String>,
    pub volume: Option<f64>,
    #[serde(rename = "playbackRate")]
    pub playback_rate: Option<f64>,
    #[serde(rename = "skipNext")]
    pub skip_next: Option<f64>,
    #[serde(rename = "skipPrev")]
    pub skip_prev: Option<f64>,
}

impl SettingsOverrides {
    pub fn from_json(json: &str) -> Result<Self, PlayerError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, PlayerError> {
        let json = std::fs::read_to_string(path).map_err(|source| PlayerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded player settings from {}", path.display());
        Self::from_json(&json)
    }

    /// Layers `other` on top of `self`; fields set in `other` win.
    pub fn then(self, other: SettingsOverrides) -> Self {
        SettingsOverrides {
            source: other.source.or(self.source),
            container: other.container.or(self.container),
            volume: other.volume.or(self.volume),
            playback_rate: other.playback_rate.or(self.playback_rate),
            skip_next: other.skip_next.or(self.skip_next),
            skip_prev: other.skip_prev.or(self.skip_prev),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.source, "");
        assert_eq!(settings.container, ".myplayer");
        assert_eq!(settings.volume, 1.0);
        assert_eq!(settings.playback_rate, 1.0);
        assert_eq!(settings.skip_next, 2.0);
        assert_eq!(settings.skip_prev, -2.0);
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let settings = Settings::with_overrides(SettingsOverrides {
            source: Some("video/mov_bbb.mp4".to_string()),
            skip_next: Some(5.0),
            ..Default::default()
        });
        assert_eq!(settings.source, "video/mov_bbb.mp4");
        assert_eq!(settings.skip_next, 5.0);
        assert_eq!(settings.container, ".myplayer");
        assert_eq!(settings.skip_prev, -2.0);
    }

    #[test]
    fn test_json_uses_browser_option_names() {
        let overrides = SettingsOverrides::from_json(
            r#"{"videoUrl": "a.mp4", "videoPlayerContainer": "body", "playbackRate": 1.5, "skipPrev": -5}"#,
        )
        .unwrap();
        let settings = Settings::with_overrides(overrides);
        assert_eq!(settings.source, "a.mp4");
        assert_eq!(settings.container, "body");
        assert_eq!(settings.playback_rate, 1.5);
        assert_eq!(settings.skip_prev, -5.0);
        assert_eq!(settings.volume, 1.0);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = SettingsOverrides::from_json(r#"{"volume": "loud"}"#).unwrap_err();
        assert!(matches!(err, PlayerError::InvalidSettings(_)));
    }

    #[test]
    fn test_layering_prefers_later_values() {
        let file = SettingsOverrides {
            volume: Some(0.3),
            container: Some("body".to_string()),
            ..Default::default()
        };
        let cli = SettingsOverrides {
            volume: Some(0.8),
            ..Default::default()
        };
        let merged = file.then(cli);
        assert_eq!(merged.volume, Some(0.8));
        assert_eq!(merged.container.as_deref(), Some("body"));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"source": "clip.webm", "skipNext": 10}}"#).unwrap();
        let overrides = SettingsOverrides::from_path(file.path()).unwrap();
        assert_eq!(overrides.source.as_deref(), Some("clip.webm"));
        assert_eq!(overrides.skip_next, Some(10.0));

        let missing = SettingsOverrides::from_path(Path::new("/nonexistent/settings.json"));
        assert!(matches!(missing, Err(PlayerError::Io { .. })));
    }
}
