pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}

pub(crate) fn default_tts_rate() -> f32 {
    1.0
}

pub(crate) fn default_tts_voice() -> String {
    "en-US-Neural2-C".to_string()
}

pub(crate) fn default_poll_interval_ms() -> u64 {
    30
}

pub(crate) fn default_boundary_grace_ms() -> u64 {
    200
}

pub(crate) fn default_base_word_duration_ms() -> u64 {
    400
}

pub(crate) fn default_cumulative_display() -> bool {
    true
}

pub(crate) fn default_data_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_sheets_range() -> String {
    "Sheet1!A:E".to_string()
}

pub(crate) fn default_sheets_has_header() -> bool {
    true
}
