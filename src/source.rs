use std::fs;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::config::DataSource;
use crate::demo_feed;
use crate::model::Dataset;
use crate::state::Delta;

static CLIENT: OnceCell<Client> = OnceCell::new();

fn http_client(timeout: Duration) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")
    })
}

/// Parses the scores document. `null` or an empty body is an empty dataset.
pub fn parse_dataset_json(raw: &str) -> Result<Dataset> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Dataset::empty());
    }
    serde_json::from_str::<Dataset>(trimmed).context("invalid scores json")
}

pub fn fetch_dataset(url: &str, timeout: Duration) -> Result<Dataset> {
    let client = http_client(timeout)?;
    let resp = client
        .get(url)
        .header(USER_AGENT, concat!("fpl_leagues/", env!("CARGO_PKG_VERSION")))
        .header(ACCEPT, "application/json")
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {status}"));
    }
    parse_dataset_json(&body)
}

pub fn read_dataset(path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    parse_dataset_json(&raw)
}

pub fn load_dataset(source: &DataSource, timeout: Duration) -> Result<Dataset> {
    match source {
        DataSource::Url(url) => fetch_dataset(url, timeout),
        DataSource::File(path) => read_dataset(path),
        DataSource::Demo { managers } => {
            Ok(demo_feed::generate(*managers, &mut rand::thread_rng()))
        }
    }
}

/// Single load attempt that never fails: errors degrade to an empty dataset.
pub fn load_or_empty(source: &DataSource, timeout: Duration) -> (Dataset, Option<String>) {
    match load_dataset(source, timeout) {
        Ok(dataset) => (dataset, None),
        Err(err) => (Dataset::empty(), Some(format!("{err:#}"))),
    }
}

/// Loads on a background thread and reports once through `tx`.
pub fn spawn_loader(source: DataSource, timeout: Duration, tx: Sender<Delta>) {
    thread::spawn(move || {
        let (dataset, error) = load_or_empty(&source, timeout);
        if let Some(err) = error {
            let _ = tx.send(Delta::Log(format!(
                "[WARN] Loading {} failed: {err}",
                source.label()
            )));
        }
        let _ = tx.send(Delta::DatasetLoaded(dataset));
    });
}
