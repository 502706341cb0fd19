use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use image::{DynamicImage, ImageReader};
use reqwest::Url;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use crate::config::{self, ImageConfig};
use crate::error::{Error, Result};

/// Does `host` match an allow-list entry? `*.example.com` matches exactly one
/// subdomain level, anything else must match the whole host.
pub fn host_matches(pattern: &str, host: &str) -> bool {
    let pattern = pattern.trim().to_lowercase();
    let host = host.to_lowercase();

    match pattern.strip_prefix("*.") {
        Some(suffix) => host
            .strip_suffix(suffix)
            .and_then(|rest| rest.strip_suffix('.'))
            .is_some_and(|label| !label.is_empty() && !label.contains('.')),
        None => host == pattern,
    }
}

/// Poster cache: decoded images in memory, raw downloads on disk under a SHA-256 key.
#[derive(Clone)]
pub struct ImageCache {
    cache_dir: PathBuf,
    allowed_hosts: Vec<String>,
    client: reqwest::Client,
    memory_cache: Arc<Mutex<HashMap<String, DynamicImage>>>,
}

impl ImageCache {
    pub fn new(config: &ImageConfig) -> Result<Self> {
        let cache_dir = config::cache_dir()?.join("images");
        Self::with_dir(cache_dir, config.allowed_hosts.clone())
    }

    pub fn with_dir(cache_dir: PathBuf, allowed_hosts: Vec<String>) -> Result<Self> {
        if !cache_dir.exists() {
            std::fs::create_dir_all(&cache_dir)?;
        }

        Ok(Self {
            cache_dir,
            allowed_hosts,
            client: reqwest::Client::new(),
            memory_cache: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Only https URLs on an allowed host may be fetched.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        if parsed.scheme() != "https" {
            return false;
        }

        parsed.host_str().is_some_and(|host| {
            self.allowed_hosts
                .iter()
                .any(|pattern| host_matches(pattern, host))
        })
    }

    pub fn get(&self, url: &str) -> Option<DynamicImage> {
        let key = self.hash_url(url);

        if let Ok(cache) = self.memory_cache.lock() {
            if let Some(img) = cache.get(&key) {
                return Some(img.clone());
            }
        }

        let path = self.cache_dir.join(&key);
        if !path.exists() {
            return None;
        }

        let img_result = ImageReader::open(&path)
            .map_err(Error::from)
            .and_then(|r| r.with_guessed_format().map_err(Error::from))
            .and_then(|r| r.decode().map_err(Error::from));

        match img_result {
            Ok(img) => {
                if let Ok(mut cache) = self.memory_cache.lock() {
                    cache.insert(key, img.clone());
                }
                Some(img)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load cached image");
                None
            }
        }
    }

    pub async fn download(&self, url: &str) -> Result<()> {
        if !self.is_allowed(url) {
            debug!(url, "Skipping poster from disallowed host");
            return Err(Error::ImageHostNotAllowed(url.to_string()));
        }

        let path = self.cache_dir.join(self.hash_url(url));
        if path.exists() {
            return Ok(());
        }

        info!(url, "Downloading poster");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        let mut file = fs::File::create(&path).await?;
        file.write_all(&bytes).await?;

        Ok(())
    }

    fn hash_url(&self, url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url);
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn cache_in(dir: &tempfile::TempDir) -> ImageCache {
        let hosts = ImageConfig::default().allowed_hosts;
        ImageCache::with_dir(dir.path().join("images"), hosts).unwrap()
    }

    #[test]
    fn test_host_patterns() {
        assert!(host_matches("placehold.co", "placehold.co"));
        assert!(!host_matches("placehold.co", "evil.placehold.co"));
        assert!(host_matches("*.samehadaku.how", "v2.samehadaku.how"));
        assert!(!host_matches("*.samehadaku.how", "samehadaku.how"));
        assert!(!host_matches("*.samehadaku.how", "a.b.samehadaku.how"));
        assert!(!host_matches("*.samehadaku.how", "notsamehadaku.how"));
    }

    #[test]
    fn test_allow_list_requires_https() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);

        assert!(cache.is_allowed("https://v1.samehadaku.how/wp-content/poster.jpg"));
        assert!(cache.is_allowed("https://www.sankavollerei.com/img.png"));
        assert!(!cache.is_allowed("http://v1.samehadaku.how/poster.jpg"));
        assert!(!cache.is_allowed("https://example.com/poster.jpg"));
        assert!(!cache.is_allowed("not a url"));
    }

    #[tokio::test]
    async fn test_download_rejects_disallowed_host() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);

        let err = cache.download("https://example.com/p.jpg").await.unwrap_err();
        assert!(matches!(err, Error::ImageHostNotAllowed(_)));
    }

    #[test]
    fn test_get_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);
        let url = "https://placehold.co/2x2.png";

        assert!(cache.get(url).is_none());

        let path = dir.path().join("images").join(cache.hash_url(url));
        DynamicImage::ImageRgb8(RgbImage::new(2, 2))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let img = cache.get(url).unwrap();
        assert_eq!(img.width(), 2);
    }
}
