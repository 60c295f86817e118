//! Google Cloud Text-to-Speech engine.
//!
//! Synthesis returns a complete MP3 clip rather than a live event stream, so
//! the voice reports no boundary events; it instead exposes the sink's
//! playback position as the authoritative clock and the estimated timeline
//! does the word scheduling.

use std::io::Cursor;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rodio::{Decoder, OutputStream, Sink};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::engine::{SpeechEngine, SpeechError, Voice};
use crate::config::AppConfig;
use crate::segmenter::normalize_for_speech;

const SYNTHESIZE_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

#[derive(Deserialize)]
struct SynthesizeResponse {
    #[serde(rename = "audioContent")]
    audio_content: String,
}

pub struct CloudEngine {
    api_key: Option<String>,
    voice: String,
    client: reqwest::blocking::Client,
}

impl CloudEngine {
    pub fn new(api_key: Option<String>, voice: impl Into<String>) -> Self {
        CloudEngine {
            api_key,
            voice: voice.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.api_key.clone(), config.tts_voice.clone())
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.api_key = api_key;
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn synthesize(&self, text: &str, rate: f32) -> Result<Vec<u8>, SpeechError> {
        let api_key = self.api_key.as_deref().ok_or(SpeechError::ConfigMissing)?;

        let body = json!({
            "input": { "text": normalize_for_speech(text) },
            "voice": {
                "languageCode": "en-US",
                "name": self.voice,
            },
            "audioConfig": {
                "audioEncoding": "MP3",
                "pitch": 0,
                "speakingRate": rate,
            },
        });

        debug!(voice = %self.voice, chars = text.len(), "requesting synthesis");
        let response = self
            .client
            .post(SYNTHESIZE_URL)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SpeechError::Synthesis(format!(
                "synthesis request returned {}",
                response.status()
            )));
        }

        let parsed: SynthesizeResponse = response
            .json()
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;
        BASE64
            .decode(parsed.audio_content)
            .map_err(|e| SpeechError::Synthesis(format!("invalid audio payload: {e}")))
    }
}

impl SpeechEngine for CloudEngine {
    fn start(&mut self, text: &str, rate: f32) -> Result<Box<dyn Voice>, SpeechError> {
        let audio = self.synthesize(text, rate)?;
        info!(bytes = audio.len(), "synthesized clip received");

        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| SpeechError::Playback(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| SpeechError::Playback(e.to_string()))?;
        let source =
            Decoder::new(Cursor::new(audio)).map_err(|e| SpeechError::Playback(e.to_string()))?;
        sink.append(source);

        Ok(Box::new(ClipVoice {
            _stream: stream,
            sink,
            synth_rate: rate,
        }))
    }
}

/// A playing audio clip. The synthesis request already baked the speaking
/// rate into the clip, so `set_rate` adjusts the sink speed relative to it.
struct ClipVoice {
    _stream: OutputStream,
    sink: Sink,
    synth_rate: f32,
}

impl Voice for ClipVoice {
    fn position(&self) -> Option<Duration> {
        Some(self.sink.get_pos())
    }

    fn finished(&self) -> bool {
        self.sink.empty()
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn resume(&mut self) {
        self.sink.play();
    }

    fn set_rate(&mut self, rate: f32) {
        self.sink.set_speed(rate / self.synth_rate.max(0.01));
    }

    fn stop(&mut self) {
        self.sink.stop();
    }
}
