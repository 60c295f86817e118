//! Speech engine seam.
//!
//! The tracker is designed to work against two engine shapes: a local engine
//! that reports genuine per-word boundary events, and a network synthesizer
//! that returns a finished audio clip whose playback clock is authoritative
//! for elapsed time. `Voice` covers both: boundary polling and the position
//! clock are each optional, and the tracker picks its strategy from what the
//! voice actually provides.

use std::time::Duration;
use thiserror::Error;

/// Failures surfaced to the caller before or during a speech session.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("no TTS credential configured")]
    ConfigMissing,
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("audio playback failed: {0}")]
    Playback(String),
}

/// A boundary event as reported by an engine, with offsets relative to the
/// text the engine was started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBoundary {
    pub char_index: usize,
    pub char_len: usize,
}

/// One in-flight utterance. Dropped or stopped when the session ends;
/// acquiring a new voice always releases the previous one first.
pub trait Voice {
    /// Whether this engine claims to deliver authoritative boundary events.
    /// A claim is only trusted until the grace window expires without one.
    fn supports_boundaries(&self) -> bool {
        false
    }

    /// Drain the next pending authoritative boundary event, if any.
    fn poll_boundary(&mut self) -> Option<RawBoundary> {
        None
    }

    /// Authoritative playback position, when the engine has its own clock
    /// (e.g. an audio clip). `None` means the tracker keeps wall time itself.
    fn position(&self) -> Option<Duration> {
        None
    }

    /// Whether the engine positively reports playback complete.
    fn finished(&self) -> bool;

    fn pause(&mut self);
    fn resume(&mut self);
    fn set_rate(&mut self, rate: f32);
    fn stop(&mut self);
}

pub trait SpeechEngine {
    /// Begin speaking `text` at `rate`. Failure must leave no audio resource
    /// behind; the controller stays idle in that case.
    fn start(&mut self, text: &str, rate: f32) -> Result<Box<dyn Voice>, SpeechError>;
}

/// Engine that produces no audio at all: the estimated timeline drives the
/// whole session. Used by the console runner when no credential is
/// configured, and by tests that need deterministic timing.
pub struct MutedEngine;

struct MutedVoice;

impl Voice for MutedVoice {
    fn finished(&self) -> bool {
        false
    }

    fn pause(&mut self) {}
    fn resume(&mut self) {}
    fn set_rate(&mut self, _rate: f32) {}
    fn stop(&mut self) {}
}

impl SpeechEngine for MutedEngine {
    fn start(&mut self, _text: &str, _rate: f32) -> Result<Box<dyn Voice>, SpeechError> {
        Ok(Box::new(MutedVoice))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Shared script controlling a fake engine from inside a test.
    pub(crate) struct ScriptState {
        pub queue: VecDeque<RawBoundary>,
        pub finished: bool,
        pub supports_boundaries: bool,
        pub position: Option<Duration>,
        pub started_texts: Vec<String>,
        pub stop_count: usize,
    }

    impl ScriptState {
        pub(crate) fn shared(supports_boundaries: bool) -> Rc<RefCell<ScriptState>> {
            Rc::new(RefCell::new(ScriptState {
                queue: VecDeque::new(),
                finished: false,
                supports_boundaries,
                position: None,
                started_texts: Vec::new(),
                stop_count: 0,
            }))
        }
    }

    pub(crate) struct ScriptedEngine {
        pub state: Rc<RefCell<ScriptState>>,
    }

    struct ScriptedVoice {
        state: Rc<RefCell<ScriptState>>,
    }

    impl SpeechEngine for ScriptedEngine {
        fn start(&mut self, text: &str, _rate: f32) -> Result<Box<dyn Voice>, SpeechError> {
            self.state.borrow_mut().started_texts.push(text.to_string());
            Ok(Box::new(ScriptedVoice {
                state: Rc::clone(&self.state),
            }))
        }
    }

    impl Voice for ScriptedVoice {
        fn supports_boundaries(&self) -> bool {
            self.state.borrow().supports_boundaries
        }

        fn poll_boundary(&mut self) -> Option<RawBoundary> {
            self.state.borrow_mut().queue.pop_front()
        }

        fn position(&self) -> Option<Duration> {
            self.state.borrow().position
        }

        fn finished(&self) -> bool {
            self.state.borrow().finished
        }

        fn pause(&mut self) {}
        fn resume(&mut self) {}
        fn set_rate(&mut self, _rate: f32) {}

        fn stop(&mut self) {
            self.state.borrow_mut().stop_count += 1;
        }
    }
}
