//! Speech playback control.
//!
//! `PlaybackController` owns at most one speech session at a time and is the
//! only place sessions are created or torn down. Callers drive it with a
//! periodic `tick`; between ticks it holds the active voice and its boundary
//! tracker.

pub mod cloud;
pub mod engine;
mod tracker;

pub use engine::{MutedEngine, RawBoundary, SpeechEngine, SpeechError, Voice};
pub use tracker::{BoundaryCallback, EndCallback};

use crate::config::AppConfig;
use crate::timing::{word_timeline_with_base, DEFAULT_BASE_WORD_MS};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use tracker::Tracker;

/// Slowest speaking rate the engines accept.
pub const MIN_TTS_RATE: f32 = 0.6;
/// Fastest speaking rate the engines accept.
pub const MAX_TTS_RATE: f32 = 3.0;

const DEFAULT_BOUNDARY_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Speaking,
    Paused,
    Ended,
}

/// Knobs for a controller, normally taken from the loaded config.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackTuning {
    pub rate: f32,
    pub boundary_grace: Duration,
    pub base_word_ms: u64,
}

impl Default for PlaybackTuning {
    fn default() -> Self {
        PlaybackTuning {
            rate: 1.0,
            boundary_grace: DEFAULT_BOUNDARY_GRACE,
            base_word_ms: DEFAULT_BASE_WORD_MS,
        }
    }
}

impl PlaybackTuning {
    pub fn from_config(config: &AppConfig) -> Self {
        PlaybackTuning {
            rate: config.tts_rate,
            boundary_grace: Duration::from_millis(config.boundary_grace_ms),
            base_word_ms: config.base_word_duration_ms,
        }
    }
}

/// Per-utterance options for `speak_with_highlight`.
#[derive(Default)]
pub struct SpeakOptions {
    /// Speak only from the first occurrence of this text onward. Boundary
    /// offsets are still reported against the full text.
    pub start_from: Option<String>,
    /// Invoked with `(char_index, char_len)` for each highlighted word.
    pub on_boundary: Option<BoundaryCallback>,
    /// Invoked exactly once if playback completes naturally. Never invoked
    /// after `stop`.
    pub on_end: Option<EndCallback>,
}

struct Active {
    voice: Box<dyn Voice>,
    tracker: Tracker,
}

pub struct PlaybackController {
    engine: Box<dyn SpeechEngine>,
    tuning: PlaybackTuning,
    state: PlaybackState,
    active: Option<Active>,
}

impl PlaybackController {
    pub fn new(engine: Box<dyn SpeechEngine>, tuning: PlaybackTuning) -> Self {
        PlaybackController {
            engine,
            tuning,
            state: PlaybackState::Idle,
            active: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn rate(&self) -> f32 {
        self.tuning.rate
    }

    pub fn is_speaking(&self) -> bool {
        match &self.active {
            Some(active) => !active.voice.finished(),
            None => false,
        }
    }

    /// Speak `text` with no highlight callbacks.
    pub fn speak(&mut self, text: &str, now: Instant) -> Result<(), SpeechError> {
        self.speak_with_highlight(text, SpeakOptions::default(), now)
    }

    /// Start a new speech session, tearing down any session already running.
    /// On failure no session exists and the controller is idle.
    pub fn speak_with_highlight(
        &mut self,
        text: &str,
        opts: SpeakOptions,
        now: Instant,
    ) -> Result<(), SpeechError> {
        self.stop();

        let offset = match &opts.start_from {
            Some(needle) => match text.find(needle.as_str()) {
                Some(pos) => pos,
                None => {
                    warn!("start position not found in text; speaking from the beginning");
                    0
                }
            },
            None => 0,
        };
        let scoped = &text[offset..];
        if scoped.trim().is_empty() {
            debug!("nothing to speak");
            return Ok(());
        }

        let voice = self.engine.start(scoped, self.tuning.rate)?;
        let timeline = word_timeline_with_base(scoped, self.tuning.rate, self.tuning.base_word_ms);
        info!(words = timeline.len(), offset, "speech session started");
        let tracker = Tracker::new(
            timeline,
            offset,
            self.tuning.boundary_grace,
            voice.supports_boundaries(),
            opts.on_boundary,
            opts.on_end,
            now,
        );
        self.active = Some(Active { voice, tracker });
        self.state = PlaybackState::Speaking;
        Ok(())
    }

    /// Advance the active session. Call on every poll interval.
    pub fn tick(&mut self, now: Instant) {
        if self.state != PlaybackState::Speaking {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.tracker.tick(active.voice.as_mut(), now) {
            info!("speech session finished");
            self.active = None;
            self.state = PlaybackState::Ended;
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if self.state != PlaybackState::Speaking {
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.voice.pause();
            active.tracker.pause(now);
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.state != PlaybackState::Paused {
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.voice.resume();
            active.tracker.resume(now);
            self.state = PlaybackState::Speaking;
        }
    }

    /// Tear down the active session, if any. The session's `on_end` callback
    /// never fires after a stop.
    pub fn stop(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.voice.stop();
        }
        self.state = PlaybackState::Idle;
    }

    /// Change the speaking rate, clamped to the supported range. The live
    /// voice (if any) picks up the new rate, but its word schedule keeps the
    /// rate it was built with.
    pub fn set_rate(&mut self, rate: f32) {
        let clamped = rate.clamp(MIN_TTS_RATE, MAX_TTS_RATE);
        if clamped != rate {
            debug!(requested = rate, clamped, "speech rate clamped");
        }
        self.tuning.rate = clamped;
        if let Some(active) = self.active.as_mut() {
            active.voice.set_rate(clamped);
        }
    }
}
