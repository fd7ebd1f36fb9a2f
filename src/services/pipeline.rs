//! Per-domain fetch workflow
//!
//! Domains are handled strictly one at a time, in list order. Every domain
//! ends in exactly one of [`DomainOutcome`]'s states; no error raised while
//! handling one domain stops the run.

use tracing::{error, info, warn};

use crate::errors::{AppError, AppResult};
use crate::logo_assets::{CacheIndexStore, LogoAssetStorage};
use crate::models::{DomainOutcome, RunStats};
use crate::resolver::LogoResolver;
use crate::services::downloader::LogoDownloader;
use crate::utils::jitter::{DelayKind, DelayPolicy};

pub struct LogoFetchPipeline {
    storage: LogoAssetStorage,
    index: CacheIndexStore,
    resolver: LogoResolver,
    downloader: LogoDownloader,
    delays: DelayPolicy,
}

impl LogoFetchPipeline {
    pub fn new(
        storage: LogoAssetStorage,
        index: CacheIndexStore,
        resolver: LogoResolver,
        downloader: LogoDownloader,
        delays: DelayPolicy,
    ) -> Self {
        Self {
            storage,
            index,
            resolver,
            downloader,
            delays,
        }
    }

    pub fn index(&self) -> &CacheIndexStore {
        &self.index
    }

    pub fn storage(&self) -> &LogoAssetStorage {
        &self.storage
    }

    /// Process every domain and return the run counters
    pub async fn run(&mut self, domains: &[String]) -> RunStats {
        let mut stats = RunStats::default();
        let total = domains.len();
        info!("Starting logo fetch for {} domains", total);

        for (i, domain) in domains.iter().enumerate() {
            info!("Processing {} ({}/{})", domain, i + 1, total);
            let is_last = i + 1 == total;

            let (outcome, pause) = match self.process_domain(domain).await {
                Ok(step) => step,
                Err(e) => {
                    error!("Unexpected error while processing {}: {}", domain, e);
                    (DomainOutcome::Failed, DelayKind::Error)
                }
            };
            stats.record(outcome);

            if !is_last {
                self.delays.wait(pause).await;
            }
        }

        info!("Logo fetch finished: {}", stats);
        stats
    }

    /// Drive one domain to a terminal state
    ///
    /// Returns the outcome with the pause to apply before the next domain.
    /// Resolver and downloader failures are folded into `Failed` here; only
    /// storage and index errors escape.
    async fn process_domain(&mut self, domain: &str) -> AppResult<(DomainOutcome, DelayKind)> {
        if self.index.has(domain, &self.storage).await {
            info!("Using cached logo for {}", domain);
            return Ok((DomainOutcome::Cached, DelayKind::CacheHit));
        }

        let resolved = match self.resolver.resolve(domain).await {
            Ok(resolved) => resolved,
            Err(AppError::NotFound { .. }) => {
                warn!("No logo found for {}", domain);
                return Ok((DomainOutcome::Failed, DelayKind::Retry));
            }
            Err(e) => return Err(e),
        };
        info!("Resolved {} via {}: {}", domain, resolved.source, resolved.url);

        self.delays.wait(DelayKind::PreDownload).await;

        match self.downloader.fetch(domain, &resolved.url).await {
            Ok(asset) => {
                let path = self.storage.save_logo(domain, &asset).await?;
                self.index.record(domain, &asset.format).await?;
                info!("Saved logo for {} to {}", domain, path.display());
                Ok((DomainOutcome::Succeeded, DelayKind::NextDomain))
            }
            Err(e) => {
                warn!("Failed to download logo for {}: {}", domain, e);
                Ok((DomainOutcome::Failed, DelayKind::NextDomain))
            }
        }
    }
}
