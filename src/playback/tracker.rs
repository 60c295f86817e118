//! Word-boundary tracking for one speech session.
//!
//! The tracker turns an advancing playback position into a monotonic stream
//! of word-boundary callbacks. Two sources feed it: authoritative events
//! polled from the engine voice, and the estimated timeline built from the
//! spoken text. Engines that claim boundary support get a short grace window
//! to prove it; if nothing arrives in time the estimator takes over for the
//! rest of the session. Once a genuine event fires, estimator output is
//! suppressed for good.

use super::engine::{RawBoundary, Voice};
use crate::timing::WordTiming;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

pub type BoundaryCallback = Box<dyn FnMut(usize, usize)>;
pub type EndCallback = Box<dyn FnOnce()>;

enum SourceMode {
    /// Waiting to see whether the engine's boundary claim holds.
    Undecided { deadline: Instant },
    EventDriven,
    Estimated,
}

pub(super) struct Tracker {
    /// Byte shift from scoped-text offsets back into the caller's full text.
    offset: usize,
    timeline: Vec<WordTiming>,
    total: Duration,
    mode: SourceMode,
    started_at: Instant,
    accumulated_pause: Duration,
    pause_started: Option<Instant>,
    last_word: Option<usize>,
    on_boundary: Option<BoundaryCallback>,
    on_end: Option<EndCallback>,
}

impl Tracker {
    pub(super) fn new(
        timeline: Vec<WordTiming>,
        offset: usize,
        grace: Duration,
        engine_claims_boundaries: bool,
        on_boundary: Option<BoundaryCallback>,
        on_end: Option<EndCallback>,
        now: Instant,
    ) -> Self {
        let total = timeline.last().map(|w| w.end).unwrap_or(Duration::ZERO);
        let mode = if engine_claims_boundaries {
            SourceMode::Undecided {
                deadline: now + grace,
            }
        } else {
            SourceMode::Estimated
        };
        Tracker {
            offset,
            timeline,
            total,
            mode,
            started_at: now,
            accumulated_pause: Duration::ZERO,
            pause_started: None,
            last_word: None,
            on_boundary,
            on_end,
        }
    }

    pub(super) fn pause(&mut self, now: Instant) {
        if self.pause_started.is_none() {
            self.pause_started = Some(now);
        }
    }

    /// Shift the time accounting forward by the pause interval so elapsed
    /// stays continuous across the gap.
    pub(super) fn resume(&mut self, now: Instant) {
        if let Some(paused_at) = self.pause_started.take() {
            self.accumulated_pause += now.saturating_duration_since(paused_at);
        }
    }

    /// Advance the session. Returns true when playback completed naturally,
    /// in which case `on_end` has already been invoked.
    pub(super) fn tick(&mut self, voice: &mut dyn Voice, now: Instant) -> bool {
        while let Some(raw) = voice.poll_boundary() {
            if !matches!(self.mode, SourceMode::EventDriven) {
                trace!("authoritative boundary signal detected");
                self.mode = SourceMode::EventDriven;
            }
            self.emit_authoritative(raw);
        }

        if let SourceMode::Undecided { deadline } = self.mode {
            if now >= deadline {
                debug!("no boundary event within grace window; using estimated timeline");
                self.mode = SourceMode::Estimated;
            }
        }

        let mut past_end = false;
        if matches!(self.mode, SourceMode::Estimated) {
            let elapsed = voice.position().unwrap_or_else(|| self.wall_elapsed(now));
            past_end = elapsed >= self.total;
            if let Some(idx) = self
                .timeline
                .iter()
                .position(|w| elapsed >= w.start && elapsed < w.end)
            {
                self.emit(idx, self.timeline[idx].word.len());
            }
        }

        // An engine with its own clock owns the end of the session; a pure
        // estimator session ends when the timeline is exhausted.
        let ended = voice.finished()
            || (matches!(self.mode, SourceMode::Estimated) && voice.position().is_none() && past_end);
        if ended {
            if let Some(on_end) = self.on_end.take() {
                on_end();
            }
        }
        ended
    }

    fn wall_elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
            .saturating_sub(self.accumulated_pause)
    }

    fn emit_authoritative(&mut self, raw: RawBoundary) {
        // Resolve the containing word so the monotonicity guarantee holds
        // even if the engine reports an offset we have already passed.
        let after = self
            .timeline
            .partition_point(|w| w.char_offset <= raw.char_index);
        if after == 0 {
            return;
        }
        let idx = after - 1;
        let char_len = if raw.char_len > 0 {
            raw.char_len
        } else {
            self.timeline[idx].word.len()
        };
        self.emit(idx, char_len);
    }

    /// Emit at most once per word, strictly in increasing word order.
    fn emit(&mut self, idx: usize, char_len: usize) {
        if self.last_word.is_some_and(|last| idx <= last) {
            return;
        }
        self.last_word = Some(idx);
        if let Some(on_boundary) = self.on_boundary.as_mut() {
            on_boundary(self.timeline[idx].char_offset + self.offset, char_len);
        }
    }
}
