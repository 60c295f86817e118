use serde::Deserialize;

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "crate::config::defaults::default_tts_rate")]
    pub tts_rate: f32,
    #[serde(default = "crate::config::defaults::default_tts_voice")]
    pub tts_voice: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "crate::config::defaults::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_boundary_grace_ms")]
    pub boundary_grace_ms: u64,
    #[serde(default = "crate::config::defaults::default_base_word_duration_ms")]
    pub base_word_duration_ms: u64,
    #[serde(default = "crate::config::defaults::default_cumulative_display")]
    pub cumulative_display: bool,
    /// Sentences shown in cumulative mode; `None` means everything so far.
    #[serde(default)]
    pub window_size: Option<usize>,
    #[serde(default = "crate::config::defaults::default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub sheets: SheetsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: crate::config::defaults::default_log_level(),
            tts_rate: crate::config::defaults::default_tts_rate(),
            tts_voice: crate::config::defaults::default_tts_voice(),
            api_key: None,
            poll_interval_ms: crate::config::defaults::default_poll_interval_ms(),
            boundary_grace_ms: crate::config::defaults::default_boundary_grace_ms(),
            base_word_duration_ms: crate::config::defaults::default_base_word_duration_ms(),
            cumulative_display: crate::config::defaults::default_cumulative_display(),
            window_size: None,
            data_dir: crate::config::defaults::default_data_dir(),
            sheets: SheetsConfig::default(),
        }
    }
}

/// Where imported articles come from.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default = "crate::config::defaults::default_sheets_range")]
    pub range: String,
    #[serde(default = "crate::config::defaults::default_sheets_has_header")]
    pub has_header: bool,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        SheetsConfig {
            spreadsheet_id: String::new(),
            range: crate::config::defaults::default_sheets_range(),
            has_header: crate::config::defaults::default_sheets_has_header(),
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
