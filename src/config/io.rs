use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::models::AppConfig;
use super::tables::ConfigTables;
use crate::playback::{MAX_TTS_RATE, MIN_TTS_RATE};

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    let tables: ConfigTables = toml::from_str(contents)?;
    let mut config = AppConfig::from(tables);
    clamp_config(&mut config);
    Ok(config)
}

pub fn serialize_config(config: &AppConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&ConfigTables::from(config))
}

/// Pull out-of-range values back into the ranges the playback layer accepts.
pub fn clamp_config(config: &mut AppConfig) {
    let rate = config.tts_rate.clamp(MIN_TTS_RATE, MAX_TTS_RATE);
    if rate != config.tts_rate {
        warn!(
            requested = config.tts_rate,
            clamped = rate,
            "tts rate out of range"
        );
        config.tts_rate = rate;
    }
    if config.poll_interval_ms == 0 {
        warn!("poll interval must be at least 1ms");
        config.poll_interval_ms = 1;
    }
    if config.base_word_duration_ms == 0 {
        warn!("base word duration must be at least 1ms");
        config.base_word_duration_ms = 1;
    }
    if config.window_size == Some(0) {
        warn!("window size 0 treated as full history");
        config.window_size = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn empty_input_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.tts_rate, 1.0);
        assert_eq!(config.poll_interval_ms, 30);
        assert_eq!(config.boundary_grace_ms, 200);
        assert!(config.cumulative_display);
        assert_eq!(config.window_size, None);
        assert_eq!(config.sheets.range, "Sheet1!A:E");
    }

    #[test]
    fn grouped_tables_map_onto_the_flat_config() {
        let config = parse_config(
            r#"
[logging]
log_level = "debug"

[tts]
rate = 1.5
voice = "en-US-Neural2-F"
api_key = "secret"

[tracking]
poll_interval_ms = 50

[study]
cumulative_display = false
window_size = 3

[sheets]
spreadsheet_id = "abc123"
"#,
        )
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.tts_rate, 1.5);
        assert_eq!(config.tts_voice, "en-US-Neural2-F");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.poll_interval_ms, 50);
        assert!(!config.cumulative_display);
        assert_eq!(config.window_size, Some(3));
        assert_eq!(config.sheets.spreadsheet_id, "abc123");
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse_config(
            r#"
[tts]
rate = 99.0

[tracking]
poll_interval_ms = 0

[study]
window_size = 0
"#,
        )
        .unwrap();
        assert_eq!(config.tts_rate, MAX_TTS_RATE);
        assert_eq!(config.poll_interval_ms, 1);
        assert_eq!(config.window_size, None);
    }

    #[test]
    fn serialization_round_trips() {
        let mut config = AppConfig::default();
        config.tts_rate = 1.25;
        config.window_size = Some(4);
        let text = serialize_config(&config).unwrap();
        let reparsed = parse_config(&text).unwrap();
        assert_eq!(reparsed.tts_rate, 1.25);
        assert_eq!(reparsed.window_size, Some(4));
    }
}
