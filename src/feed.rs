use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::config::SlateConfig;
use crate::http_client::{fetch_json, http_client};
use crate::model::SlateResponse;
use crate::slate::{CfbdFeed, SlateFeed, serve_slate};
use crate::state::{Delta, ProviderCommand};

/// Where the dashboard gets its slate: a running slate server, or an
/// in-process build against the upstream feeds.
#[derive(Clone)]
pub enum SlateSource {
    Remote(String),
    Local(Arc<dyn SlateFeed>),
}

impl SlateSource {
    pub fn from_config(cfg: &SlateConfig) -> Self {
        match cfg.slate_url.clone() {
            Some(url) => SlateSource::Remote(url),
            None => SlateSource::Local(Arc::new(CfbdFeed::new(cfg.clone()))),
        }
    }

    pub fn label(&self) -> String {
        match self {
            SlateSource::Remote(url) => url.clone(),
            SlateSource::Local(_) => "in-process".to_string(),
        }
    }
}

pub fn spawn_provider(source: SlateSource, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let _ = tx.send(Delta::Log(format!(
            "[INFO] Slate source: {}",
            source.label()
        )));
        refresh(&source, &tx);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Refresh => refresh(&source, &tx),
            }
        }
    });
}

fn refresh(source: &SlateSource, tx: &Sender<Delta>) {
    let _ = tx.send(Delta::Loading);
    match load_slate(source) {
        Ok(slate) => {
            let _ = tx.send(Delta::SetSlate(slate));
        }
        Err(err) => {
            let _ = tx.send(Delta::LoadFailed(format!("{err:#}")));
        }
    }
}

pub fn load_slate(source: &SlateSource) -> Result<SlateResponse> {
    match source {
        SlateSource::Remote(url) => fetch_remote_slate(url),
        SlateSource::Local(feed) => Ok(serve_slate(feed.as_ref(), Utc::now())),
    }
}

pub fn fetch_remote_slate(url: &str) -> Result<SlateResponse> {
    let client = http_client()?;
    let body = fetch_json(client, url, None, &[]).context("slate request failed")?;
    serde_json::from_value(body).context("invalid slate json")
}

pub fn parse_slate_json(raw: &str) -> Result<SlateResponse> {
    serde_json::from_str(raw.trim()).context("invalid slate json")
}
