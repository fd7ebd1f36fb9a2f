//! Maintenance checks over the storage directory and the cache index

use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::logo_assets::{CacheIndexStore, LogoAssetStorage};

const RASTER_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// A stored raster logo below the size threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmallImage {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// Domains with no stored logo file, in input order
pub async fn find_uncached(domains: &[String], storage: &LogoAssetStorage) -> AppResult<Vec<String>> {
    let stored: HashSet<String> = storage
        .list_logos()
        .await?
        .into_iter()
        .map(|logo| logo.domain)
        .collect();

    let uncached: Vec<String> = domains
        .iter()
        .filter(|domain| !stored.contains(domain.as_str()))
        .cloned()
        .collect();
    info!(
        "{} of {} domains have no stored logo",
        uncached.len(),
        domains.len()
    );
    Ok(uncached)
}

/// Add an index entry for every stored file whose domain has none
///
/// The file extension becomes the entry's format. Existing entries are left
/// alone. Returns the domains that were added.
pub async fn sync_index_from_storage(
    storage: &LogoAssetStorage,
    index: &mut CacheIndexStore,
) -> AppResult<Vec<String>> {
    let missing: Vec<(String, String)> = storage
        .list_logos()
        .await?
        .into_iter()
        .filter(|logo| !index.index().contains(&logo.domain))
        .map(|logo| (logo.domain, logo.format))
        .collect();

    for (domain, format) in &missing {
        info!("Adding index entry for {}.{}", domain, format);
    }
    index
        .record_many(missing.iter().map(|(d, f)| (d.as_str(), f.as_str())))
        .await?;

    Ok(missing.into_iter().map(|(domain, _)| domain).collect())
}

/// Raster logos whose width or height is below `threshold`
///
/// SVG files are never reported. Files that cannot be read as images are
/// skipped.
pub async fn find_small_images(
    storage: &LogoAssetStorage,
    threshold: u32,
) -> AppResult<Vec<SmallImage>> {
    let candidates: Vec<(String, PathBuf)> = storage
        .list_logos()
        .await?
        .into_iter()
        .filter(|logo| RASTER_EXTENSIONS.contains(&logo.format.to_ascii_lowercase().as_str()))
        .map(|logo| (format!("{}.{}", logo.domain, logo.format), logo.path))
        .collect();

    let small = tokio::task::spawn_blocking(move || {
        candidates
            .into_iter()
            .filter_map(|(file_name, path)| match image::image_dimensions(&path) {
                Ok((width, height)) => Some(SmallImage {
                    file_name,
                    width,
                    height,
                }),
                Err(e) => {
                    debug!("Skipping unreadable image {}: {}", path.display(), e);
                    None
                }
            })
            .filter(|img| img.width < threshold || img.height < threshold)
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| AppError::Io(std::io::Error::other(e)))?;

    info!("Found {} images smaller than {}px", small.len(), threshold);
    Ok(small)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DownloadedAsset;
    use tempfile::TempDir;

    fn png(width: u32, height: u32) -> DownloadedAsset {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        DownloadedAsset {
            bytes,
            format: "png".to_string(),
        }
    }

    fn svg() -> DownloadedAsset {
        DownloadedAsset {
            bytes: b"<svg width=\"1\" height=\"1\"/>".to_vec(),
            format: "svg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_uncached_keeps_input_order() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LogoAssetStorage::new(temp_dir.path());
        storage.save_logo("b.com", &svg()).await.unwrap();

        let domains: Vec<String> = ["c.com", "b.com", "a.com"].iter().map(|s| s.to_string()).collect();
        let uncached = find_uncached(&domains, &storage).await.unwrap();
        assert_eq!(uncached, vec!["c.com", "a.com"]);
    }

    #[tokio::test]
    async fn test_sync_index_adds_only_missing_entries() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LogoAssetStorage::new(temp_dir.path().join("source"));
        storage.save_logo("known.com", &svg()).await.unwrap();
        storage.save_logo("orphan.com", &png(4, 4)).await.unwrap();

        let mut index = CacheIndexStore::load(temp_dir.path().join("source.json"))
            .await
            .unwrap();
        index.record("known.com", "svg").await.unwrap();
        let before = index.index().get("known.com").cloned();

        let added = sync_index_from_storage(&storage, &mut index).await.unwrap();
        assert_eq!(added, vec!["orphan.com"]);
        assert_eq!(index.index().get("orphan.com").unwrap().format, "png");
        assert_eq!(index.index().get("known.com").cloned(), before);

        let reloaded = CacheIndexStore::load(index.path()).await.unwrap();
        assert_eq!(reloaded.index().len(), 2);

        let added = sync_index_from_storage(&storage, &mut index).await.unwrap();
        assert!(added.is_empty());
    }

    #[tokio::test]
    async fn test_find_small_images() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LogoAssetStorage::new(temp_dir.path());
        storage.save_logo("tiny.com", &png(32, 32)).await.unwrap();
        storage.save_logo("wide.com", &png(300, 40)).await.unwrap();
        storage.save_logo("big.com", &png(128, 128)).await.unwrap();
        storage.save_logo("vector.com", &svg()).await.unwrap();
        std::fs::write(temp_dir.path().join("broken.com.png"), b"not a png").unwrap();

        let small = find_small_images(&storage, 100).await.unwrap();
        assert_eq!(
            small,
            vec![
                SmallImage {
                    file_name: "tiny.com.png".to_string(),
                    width: 32,
                    height: 32
                },
                SmallImage {
                    file_name: "wide.com.png".to_string(),
                    width: 300,
                    height: 40
                },
            ]
        );
    }
}
