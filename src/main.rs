//! Console runner for sentence study.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Import the given text file as an article and store it.
//! - Walk the article sentence by sentence, speaking each one and printing
//!   the word highlight as it moves.

use std::cell::Cell;
use std::env;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

use sentence_study::article::Article;
use sentence_study::config::{AppConfig, load_config};
use sentence_study::playback::cloud::CloudEngine;
use sentence_study::playback::{
    MutedEngine, PlaybackController, PlaybackState, PlaybackTuning, SpeakOptions, SpeechEngine,
};
use sentence_study::projector::WordMap;
use sentence_study::session::{LearningSession, Window};
use sentence_study::store::{ArticleStore, FileStore};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let text_path = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        path = %text_path.display(),
        level = %config.log_level,
        "Starting sentence study"
    );

    let article = import_article(&text_path, &config)?;
    info!(
        title = %article.title,
        sentences = article.sentences.len(),
        "Article imported"
    );

    let window = match config.window_size {
        Some(n) => Window::Sentences(n),
        None => Window::Full,
    };
    let mut session = LearningSession::new(article, config.cumulative_display, window);

    let engine = build_engine(&config);
    let mut controller = PlaybackController::new(engine, PlaybackTuning::from_config(&config));

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("installing interrupt handler")?;

    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    loop {
        let (current, total) = session.progress();
        println!("\n[{current}/{total}]");
        study_sentence(&mut controller, &session, &interrupted, poll_interval)?;
        if interrupted.load(Ordering::SeqCst) || !session.next() {
            break;
        }
    }
    controller.stop();
    info!("Session finished");
    Ok(())
}

/// Speak the current display text and print each word as it is highlighted.
fn study_sentence(
    controller: &mut PlaybackController,
    session: &LearningSession,
    interrupted: &AtomicBool,
    poll_interval: Duration,
) -> Result<()> {
    let display = session.display_text();
    if display.is_empty() {
        return Ok(());
    }
    println!("{display}");

    let map = WordMap::new(&display);
    let ended = Rc::new(Cell::new(false));
    let ended_flag = Rc::clone(&ended);
    // In cumulative mode only the newest sentence is narrated; the rest of
    // the window stays on screen as context.
    let start_from = if session.is_cumulative() {
        session.current_sentence().map(|s| s.text.clone())
    } else {
        None
    };

    controller
        .speak_with_highlight(
            &display,
            SpeakOptions {
                start_from,
                on_boundary: Some(Box::new(move |char_index, _len| {
                    if let Some(idx) = map.word_index_for(char_index) {
                        if let Some(word) = map.token(idx) {
                            println!("  > {word}");
                        }
                    }
                })),
                on_end: Some(Box::new(move || ended_flag.set(true))),
            },
            Instant::now(),
        )
        .context("starting speech")?;

    while !ended.get() && controller.state() == PlaybackState::Speaking {
        if interrupted.load(Ordering::SeqCst) {
            controller.stop();
            warn!("Interrupted; stopping playback");
            break;
        }
        controller.tick(Instant::now());
        std::thread::sleep(poll_interval);
    }
    Ok(())
}

fn import_article(path: &Path, config: &AppConfig) -> Result<Article> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string());
    let article = Article::from_text(
        format!("article-{}", Utc::now().timestamp_millis()),
        title,
        content,
    );

    let store = FileStore::new(&config.data_dir)?;
    store.put_article(&article)?;
    Ok(article)
}

fn build_engine(config: &AppConfig) -> Box<dyn SpeechEngine> {
    if config.api_key.is_some() {
        info!(voice = %config.tts_voice, "Using cloud speech synthesis");
        Box::new(CloudEngine::from_config(config))
    } else {
        info!("No API key configured; running silently on estimated timing");
        Box::new(MutedEngine)
    }
}

fn parse_args() -> Result<PathBuf> {
    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| anyhow!("Usage: sentence-study <path-to-text-file>"))?;

    let path = PathBuf::from(path);
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.display()));
    }
    Ok(path)
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
