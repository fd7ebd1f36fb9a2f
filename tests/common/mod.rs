#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use logo_fetcher::config::RequestConfig;
use logo_fetcher::errors::{AppError, AppResult};
use logo_fetcher::logo_assets::{CacheIndexStore, LogoAssetStorage};
use logo_fetcher::resolver::LogoResolver;
use logo_fetcher::services::{LogoDownloader, LogoFetchPipeline};
use logo_fetcher::utils::{DelayPolicy, FetchedBody, HeaderProfile, HttpFetcher};

pub const ICON_SERVICE: &str = "https://icons.test/logos";

#[derive(Clone)]
enum Reply {
    Text(String),
    Bytes(Vec<u8>, String),
}

/// In-memory fetcher answering from a fixed URL table
///
/// Unknown URLs fail like a 404. Every call is recorded.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, url: &str, body: &str) -> Self {
        self.routes.insert(url.to_string(), Reply::Text(body.to_string()));
        self
    }

    pub fn bytes(mut self, url: &str, body: &[u8], content_type: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Reply::Bytes(body.to_vec(), content_type.to_string()),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    fn reply(&self, url: &str) -> AppResult<Reply> {
        self.calls.lock().unwrap().push(url.to_string());
        self.routes
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::network(url, "HTTP 404 Not Found"))
    }
}

#[async_trait]
impl HttpFetcher for ScriptedFetcher {
    async fn fetch_text(&self, url: &str, _profile: &HeaderProfile) -> AppResult<String> {
        match self.reply(url)? {
            Reply::Text(body) => Ok(body),
            Reply::Bytes(bytes, _) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }

    async fn fetch_bytes(&self, url: &str, _profile: &HeaderProfile) -> AppResult<FetchedBody> {
        match self.reply(url)? {
            Reply::Text(body) => Ok(FetchedBody {
                bytes: body.into_bytes(),
                content_type: Some("text/html".to_string()),
            }),
            Reply::Bytes(bytes, content_type) => Ok(FetchedBody {
                bytes,
                content_type: Some(content_type),
            }),
        }
    }
}

pub fn request_config(max_retries: u32) -> RequestConfig {
    RequestConfig {
        max_retries,
        icon_service_base: ICON_SERVICE.to_string(),
        ..RequestConfig::default()
    }
}

/// Pipeline over `dir/source` and `dir/source.json` with every delay disabled
pub async fn build_pipeline(
    dir: &Path,
    fetcher: Arc<ScriptedFetcher>,
    max_retries: u32,
) -> LogoFetchPipeline {
    let request = request_config(max_retries);
    let fetcher: Arc<dyn HttpFetcher> = fetcher;
    let index = CacheIndexStore::load(dir.join("source.json")).await.unwrap();
    LogoFetchPipeline::new(
        LogoAssetStorage::new(dir.join("source")),
        index,
        LogoResolver::new(fetcher.clone(), &request, DelayPolicy::disabled()),
        LogoDownloader::new(fetcher, &request, DelayPolicy::disabled()),
        DelayPolicy::disabled(),
    )
}

pub fn domains(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
