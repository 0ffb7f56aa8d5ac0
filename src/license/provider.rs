use log::{info, warn};
use reqwest::Client;

use super::cache::LicenseCache;
use super::spdx::clean_license_id;
use crate::registry::spdx::fetch_license_text;

/// Canonical license text lookup: local cache first, then the SPDX license list.
/// A successful fetch is written back to the cache.
pub struct LicenseTextProvider<C> {
    cache: C,
    client: Option<Client>,
    base_url: String,
}

impl<C: LicenseCache> LicenseTextProvider<C> {
    /// Never touches the network.
    pub fn offline(cache: C) -> Self {
        Self {
            cache,
            client: None,
            base_url: String::new(),
        }
    }

    pub fn online(cache: C, client: Client, base_url: impl Into<String>) -> Self {
        Self {
            cache,
            client: Some(client),
            base_url: base_url.into(),
        }
    }

    /// `None` when the text is neither cached nor retrievable. Never fails.
    pub async fn license_text(&self, raw_id: &str) -> Option<String> {
        let id = clean_license_id(raw_id);
        if id.is_empty() {
            return None;
        }
        if let Some(text) = self.cache.get(&id) {
            return Some(text);
        }

        let client = self.client.as_ref()?;
        info!("Fetching license {} from {}", id, self.base_url);
        match fetch_license_text(client, &self.base_url, &id).await {
            Ok(Some(text)) => {
                if let Err(err) = self.cache.put(&id, &text) {
                    warn!("Could not cache license {}: {:#}", id, err);
                }
                Some(text)
            }
            Ok(None) => {
                warn!("No license text published for {}", id);
                None
            }
            Err(err) => {
                warn!("Could not fetch license {}: {:#}", id, err);
                None
            }
        }
    }

    /// Look up each identifier once, in the given order.
    pub async fn resolve_all<I, S>(&self, ids: I) -> Vec<(String, Option<String>)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved: Vec<(String, Option<String>)> = Vec::new();
        for id in ids {
            let id = id.as_ref();
            if resolved.iter().any(|(seen, _)| seen == id) {
                continue;
            }
            let text = self.license_text(id).await;
            resolved.push((id.to_string(), text));
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::cache::DirCache;
    use tempfile::TempDir;

    fn cache_with_mit(tmp: &TempDir) -> DirCache {
        let cache = DirCache::new(tmp.path());
        cache.put("MIT", "MIT License text").unwrap();
        cache
    }

    #[tokio::test]
    async fn test_cached_text_is_returned() {
        let tmp = TempDir::new().unwrap();
        let provider = LicenseTextProvider::offline(cache_with_mit(&tmp));
        assert_eq!(
            provider.license_text("MIT */").await.as_deref(),
            Some("MIT License text")
        );
    }

    #[tokio::test]
    async fn test_offline_miss_degrades_to_none() {
        let tmp = TempDir::new().unwrap();
        let provider = LicenseTextProvider::offline(cache_with_mit(&tmp));
        assert_eq!(provider.license_text("BSL-1.0").await, None);
        assert_eq!(provider.license_text("  ").await, None);
    }

    #[tokio::test]
    async fn test_resolve_all_skips_repeats() {
        let tmp = TempDir::new().unwrap();
        let provider = LicenseTextProvider::offline(cache_with_mit(&tmp));
        let resolved = provider.resolve_all(["MIT", "Zlib", "MIT"]).await;
        assert_eq!(
            resolved,
            vec![
                ("MIT".to_string(), Some("MIT License text".to_string())),
                ("Zlib".to_string(), None),
            ]
        );
    }
}
