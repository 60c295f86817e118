use super::defaults;
use super::models::{AppConfig, LogLevel, SheetsConfig};
use serde::Deserialize;

/// On-disk layout: settings grouped into TOML tables by concern. The flat
/// `AppConfig` stays the in-memory shape.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    tts: TtsConfig,
    #[serde(default)]
    tracking: TrackingConfig,
    #[serde(default)]
    study: StudyConfig,
    #[serde(default)]
    storage: StorageConfig,
    #[serde(default)]
    sheets: SheetsConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            log_level: tables.logging.log_level,
            tts_rate: tables.tts.rate,
            tts_voice: tables.tts.voice,
            api_key: tables.tts.api_key,
            poll_interval_ms: tables.tracking.poll_interval_ms,
            boundary_grace_ms: tables.tracking.boundary_grace_ms,
            base_word_duration_ms: tables.tracking.base_word_duration_ms,
            cumulative_display: tables.study.cumulative_display,
            window_size: tables.study.window_size,
            data_dir: tables.storage.data_dir,
            sheets: tables.sheets,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            logging: LoggingConfig {
                log_level: config.log_level,
            },
            tts: TtsConfig {
                rate: config.tts_rate,
                voice: config.tts_voice.clone(),
                api_key: config.api_key.clone(),
            },
            tracking: TrackingConfig {
                poll_interval_ms: config.poll_interval_ms,
                boundary_grace_ms: config.boundary_grace_ms,
                base_word_duration_ms: config.base_word_duration_ms,
            },
            study: StudyConfig {
                cumulative_display: config.cumulative_display,
                window_size: config.window_size,
            },
            storage: StorageConfig {
                data_dir: config.data_dir.clone(),
            },
            sheets: config.sheets.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct TtsConfig {
    #[serde(default = "defaults::default_tts_rate")]
    rate: f32,
    #[serde(default = "defaults::default_tts_voice")]
    voice: String,
    #[serde(default)]
    api_key: Option<String>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        TtsConfig {
            rate: defaults::default_tts_rate(),
            voice: defaults::default_tts_voice(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct TrackingConfig {
    #[serde(default = "defaults::default_poll_interval_ms")]
    poll_interval_ms: u64,
    #[serde(default = "defaults::default_boundary_grace_ms")]
    boundary_grace_ms: u64,
    #[serde(default = "defaults::default_base_word_duration_ms")]
    base_word_duration_ms: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        TrackingConfig {
            poll_interval_ms: defaults::default_poll_interval_ms(),
            boundary_grace_ms: defaults::default_boundary_grace_ms(),
            base_word_duration_ms: defaults::default_base_word_duration_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct StudyConfig {
    #[serde(default = "defaults::default_cumulative_display")]
    cumulative_display: bool,
    #[serde(default)]
    window_size: Option<usize>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        StudyConfig {
            cumulative_display: defaults::default_cumulative_display(),
            window_size: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct StorageConfig {
    #[serde(default = "defaults::default_data_dir")]
    data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: defaults::default_data_dir(),
        }
    }
}
