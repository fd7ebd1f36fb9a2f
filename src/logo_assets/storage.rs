use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::errors::AppResult;
use crate::models::DownloadedAsset;

/// A logo file found in the storage directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLogo {
    pub domain: String,
    pub format: String,
    pub path: PathBuf,
}

/// Storage directory holding one `<domain>.<format>` file per cached logo
#[derive(Debug, Clone)]
pub struct LogoAssetStorage {
    logo_dir: PathBuf,
}

impl LogoAssetStorage {
    pub fn new<P: Into<PathBuf>>(logo_dir: P) -> Self {
        Self {
            logo_dir: logo_dir.into(),
        }
    }

    pub fn logo_dir(&self) -> &Path {
        &self.logo_dir
    }

    pub async fn ensure_storage_dir(&self) -> AppResult<()> {
        if !fs::try_exists(&self.logo_dir).await? {
            fs::create_dir_all(&self.logo_dir).await?;
            debug!("Created logo directory {}", self.logo_dir.display());
        }
        Ok(())
    }

    pub fn file_path(&self, domain: &str, format: &str) -> PathBuf {
        self.logo_dir.join(format!("{domain}.{format}"))
    }

    /// Whether `<domain>.<format>` is present as a regular file
    pub async fn exists(&self, domain: &str, format: &str) -> bool {
        fs::metadata(self.file_path(domain, format))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    /// Write a downloaded logo as `<domain>.<format>`, replacing any previous file
    ///
    /// Files left for the same domain under another format are removed, so a
    /// domain never has more than one logo on disk.
    pub async fn save_logo(&self, domain: &str, asset: &DownloadedAsset) -> AppResult<PathBuf> {
        self.ensure_storage_dir().await?;

        let file_path = self.file_path(domain, &asset.format);
        fs::write(&file_path, &asset.bytes).await?;
        debug!(
            "Saved {} bytes to {}",
            asset.bytes.len(),
            file_path.display()
        );

        for stale in self
            .list_logos()
            .await?
            .into_iter()
            .filter(|logo| logo.domain == domain && logo.format != asset.format)
        {
            fs::remove_file(&stale.path).await?;
            debug!("Removed stale logo {}", stale.path.display());
        }
        Ok(file_path)
    }

    /// Every logo file in the storage directory, sorted by file name
    ///
    /// Files without an extension are ignored. A missing directory yields an
    /// empty list.
    pub async fn list_logos(&self) -> AppResult<Vec<StoredLogo>> {
        if !fs::try_exists(&self.logo_dir).await? {
            return Ok(Vec::new());
        }

        let mut logos = Vec::new();
        let mut entries = fs::read_dir(&self.logo_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let (Some(stem), Some(ext)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.extension().and_then(|s| s.to_str()),
            ) else {
                continue;
            };
            logos.push(StoredLogo {
                domain: stem.to_string(),
                format: ext.to_string(),
                path: path.clone(),
            });
        }

        logos.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(logos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn asset(format: &str, bytes: &[u8]) -> DownloadedAsset {
        DownloadedAsset {
            bytes: bytes.to_vec(),
            format: format.to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LogoAssetStorage::new(temp_dir.path().join("source"));

        let path = storage
            .save_logo("github.com", &asset("svg", b"<svg/>"))
            .await
            .unwrap();

        assert_eq!(path, temp_dir.path().join("source").join("github.com.svg"));
        assert!(storage.exists("github.com", "svg").await);
        assert!(!storage.exists("github.com", "png").await);
        assert_eq!(std::fs::read(path).unwrap(), b"<svg/>");
    }

    #[tokio::test]
    async fn test_save_in_new_format_removes_old_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LogoAssetStorage::new(temp_dir.path());
        storage.save_logo("github.com", &asset("png", b"png")).await.unwrap();
        storage.save_logo("github.io", &asset("jpg", b"jpg")).await.unwrap();

        storage.save_logo("github.com", &asset("svg", b"<svg/>")).await.unwrap();

        assert!(storage.exists("github.com", "svg").await);
        assert!(!storage.exists("github.com", "png").await);
        assert!(storage.exists("github.io", "jpg").await);
        assert_eq!(storage.list_logos().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_logos_parses_domain_and_format() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LogoAssetStorage::new(temp_dir.path());
        storage.save_logo("docs.rs", &asset("png", b"png")).await.unwrap();
        storage.save_logo("github.com", &asset("svg", b"svg")).await.unwrap();
        std::fs::write(temp_dir.path().join("README"), b"no extension").unwrap();
        std::fs::create_dir(temp_dir.path().join("nested.dir")).unwrap();

        let logos = storage.list_logos().await.unwrap();
        let names: Vec<(&str, &str)> = logos
            .iter()
            .map(|l| (l.domain.as_str(), l.format.as_str()))
            .collect();
        assert_eq!(names, vec![("docs.rs", "png"), ("github.com", "svg")]);
    }

    #[tokio::test]
    async fn test_list_logos_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LogoAssetStorage::new(temp_dir.path().join("absent"));
        assert!(storage.list_logos().await.unwrap().is_empty());
    }
}
