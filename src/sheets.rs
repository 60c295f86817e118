//! Article import from a Google Sheets spreadsheet.
//!
//! The sheet layout is one article per row with columns No, Topic, Content,
//! Difficulty and Length. Fetching uses the Sheets v4 values endpoint with an
//! OAuth bearer token; parsing is separate from fetching so it can be tested
//! without network access.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::article::Article;
use crate::config::SheetsConfig;
use crate::segmenter;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Default)]
pub struct SheetsClient {
    client: reqwest::blocking::Client,
}

impl SheetsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the raw cell grid for the configured range.
    pub fn fetch_rows(&self, token: &str, config: &SheetsConfig) -> Result<Vec<Vec<String>>> {
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{}",
            config.spreadsheet_id, config.range
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .context("requesting spreadsheet values")?;

        match response.status().as_u16() {
            200 => {}
            401 => bail!("spreadsheet access token is expired or invalid"),
            403 => bail!("no permission to read this spreadsheet"),
            404 => bail!("spreadsheet not found; check the spreadsheet id"),
            status => bail!("spreadsheet request failed with status {status}"),
        }

        let range: ValueRange = response.json().context("parsing spreadsheet response")?;
        info!(rows = range.values.len(), "fetched spreadsheet rows");
        Ok(range.values)
    }
}

/// Turn fetched rows into articles. Rows without content are skipped; the
/// optional header row is dropped per the config.
pub fn articles_from_rows(rows: &[Vec<String>], config: &SheetsConfig) -> Vec<Article> {
    let sheet_name = config.range.split('!').next().map(str::to_string);
    let data_rows = if config.has_header && !rows.is_empty() {
        &rows[1..]
    } else {
        rows
    };

    let now = Utc::now();
    let mut articles = Vec::new();
    for (row_idx, row) in data_rows.iter().enumerate() {
        let cell = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or_default();
        let content = cell(2);
        if content.is_empty() {
            warn!(row = row_idx, "skipping row without content");
            continue;
        }

        let number = cell(0).parse::<u32>().ok();
        let topic = cell(1);
        let title = {
            let joined = format!("{} {}", cell(0), topic);
            let trimmed = joined.trim().to_string();
            if trimmed.is_empty() {
                "No Topic".to_string()
            } else {
                trimmed
            }
        };

        articles.push(Article {
            id: format!("article-{}-{row_idx}", now.timestamp_millis()),
            number,
            topic: (!topic.is_empty()).then(|| topic.to_string()),
            title,
            difficulty: (!cell(3).is_empty()).then(|| cell(3).to_string()),
            length_label: (!cell(4).is_empty()).then(|| cell(4).to_string()),
            content: content.to_string(),
            sentences: segmenter::segment(content),
            sheet_name: sheet_name.clone(),
            created_at: now,
            last_accessed: now,
        });
    }
    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SheetsConfig {
        SheetsConfig {
            spreadsheet_id: "sheet-id".to_string(),
            range: "Sheet1!A:E".to_string(),
            has_header: true,
        }
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn parses_rows_into_articles() {
        let rows = vec![
            row(&["No", "Topic", "Content", "Difficulty", "Length"]),
            row(&["1", "The Sun", "It rises. It sets.", "Easy", "Short"]),
            row(&["2", "The Moon", "It glows at night.", "", ""]),
        ];
        let articles = articles_from_rows(&rows, &config());
        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.number, Some(1));
        assert_eq!(first.title, "1 The Sun");
        assert_eq!(first.topic.as_deref(), Some("The Sun"));
        assert_eq!(first.difficulty.as_deref(), Some("Easy"));
        assert_eq!(first.sentences.len(), 2);
        assert_eq!(first.sheet_name.as_deref(), Some("Sheet1"));

        assert_eq!(articles[1].difficulty, None);
        assert_ne!(articles[0].id, articles[1].id);
    }

    #[test]
    fn rows_without_content_are_skipped() {
        let rows = vec![
            row(&["No", "Topic", "Content"]),
            row(&["1", "Empty", ""]),
            row(&["2"]),
            row(&["3", "Real", "Some text."]),
        ];
        let articles = articles_from_rows(&rows, &config());
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "3 Real");
    }

    #[test]
    fn untitled_rows_get_a_placeholder_title() {
        let rows = vec![
            row(&["No", "Topic", "Content"]),
            row(&["", "", "Just content here."]),
        ];
        let articles = articles_from_rows(&rows, &config());
        assert_eq!(articles[0].title, "No Topic");
        assert_eq!(articles[0].number, None);
    }

    #[test]
    fn one_client_serves_sequential_fetches() {
        // fetch_rows borrows the client immutably, so a single instance with
        // its connection pool can serve repeated imports.
        let client = SheetsClient::new();
        let cfg = config();
        let fetch = |token: &str| client.fetch_rows(token, &cfg);
        let again = |token: &str| client.fetch_rows(token, &cfg);
        let _ = (fetch, again);
    }

    #[test]
    fn header_handling_follows_the_config() {
        let rows = vec![row(&["1", "First", "Content one."])];
        let mut cfg = config();
        cfg.has_header = false;
        assert_eq!(articles_from_rows(&rows, &cfg).len(), 1);
        assert!(articles_from_rows(&rows, &config()).is_empty());
    }
}
