//! Persistent cache index mapping each domain to its stored logo
//!
//! The index and the logo files are written separately with no transaction
//! between them, so the index alone is never trusted: a domain only counts
//! as cached when its entry exists *and* the backing file is on disk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::logo_assets::storage::LogoAssetStorage;
use crate::models::CacheEntry;

/// Domain -> entry mapping as stored in the index file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheIndex {
    entries: BTreeMap<String, CacheEntry>,
}

impl CacheIndex {
    pub fn get(&self, domain: &str) -> Option<&CacheEntry> {
        self.entries.get(domain)
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.entries.contains_key(domain)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace the entry for `domain`, stamped with the current time
    pub fn upsert(&mut self, domain: &str, format: &str) -> CacheEntry {
        let entry = CacheEntry::new(format);
        self.entries.insert(domain.to_string(), entry.clone());
        entry
    }
}

/// Cache index bound to its backing file
///
/// Loaded once per run; every mutation rewrites the whole file through a
/// temporary sibling and a rename so a crash never leaves it truncated.
#[derive(Debug)]
pub struct CacheIndexStore {
    path: PathBuf,
    index: CacheIndex,
}

impl CacheIndexStore {
    /// Read the index file
    ///
    /// A missing file is an empty index. A file that exists but does not
    /// parse fails with [`AppError::CorruptIndex`] so the operator decides
    /// what to do with it.
    pub async fn load<P: Into<PathBuf>>(path: P) -> AppResult<Self> {
        let path = path.into();

        if !fs::try_exists(&path).await? {
            info!(
                "No cache index at {}, starting with an empty index",
                path.display()
            );
            return Ok(Self {
                path,
                index: CacheIndex::default(),
            });
        }

        let contents = fs::read(&path).await?;
        let index: CacheIndex =
            serde_json::from_slice(&contents).map_err(|source| AppError::CorruptIndex {
                path: path.clone(),
                source,
            })?;
        info!(
            "Loaded cache index with {} entries from {}",
            index.len(),
            path.display()
        );
        Ok(Self { path, index })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn index(&self) -> &CacheIndex {
        &self.index
    }

    /// True only if the domain has an entry and `<domain>.<format>` exists in storage
    pub async fn has(&self, domain: &str, storage: &LogoAssetStorage) -> bool {
        match self.index.get(domain) {
            Some(entry) => {
                let present = storage.exists(domain, &entry.format).await;
                if !present {
                    debug!(
                        "Index entry for {} points at missing file {}",
                        domain,
                        entry.file_name(domain)
                    );
                }
                present
            }
            None => false,
        }
    }

    /// Upsert `{format, lastUpdated: now}` for `domain` and persist the full index
    pub async fn record(&mut self, domain: &str, format: &str) -> AppResult<CacheEntry> {
        let entry = self.index.upsert(domain, format);
        self.persist().await?;
        Ok(entry)
    }

    /// Upsert several entries and persist once
    pub async fn record_many<'a, I>(&mut self, items: I) -> AppResult<usize>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut count = 0;
        for (domain, format) in items {
            self.index.upsert(domain, format);
            count += 1;
        }
        if count > 0 {
            self.persist().await?;
        }
        Ok(count)
    }

    async fn persist(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(&self.index)?;
        let tmp_path = self.temp_path();
        fs::write(&tmp_path, &json).await?;
        fs::rename(&tmp_path, &self.path).await?;

        debug!(
            "Persisted {} index entries to {}",
            self.index.len(),
            self.path.display()
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "index.json".to_string());
        self.path.with_file_name(format!(".{file_name}.tmp"))
    }
}
