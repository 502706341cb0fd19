use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

/// How long a response may be reused before it is fetched again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    Revalidate(Duration),
    NoStore,
}

impl CachePolicy {
    pub const HOURLY: CachePolicy = CachePolicy::Revalidate(Duration::from_secs(3600));

    /// Value for the outgoing `Cache-Control` header
    pub fn header_value(&self) -> String {
        match self {
            CachePolicy::Revalidate(ttl) => format!("max-age={}", ttl.as_secs()),
            CachePolicy::NoStore => "no-store".to_string(),
        }
    }
}

struct CachedBody {
    body: Arc<str>,
    stored_at: Instant,
}

/// Response bodies keyed by request URL.
#[derive(Clone, Default)]
pub struct ResponseCache {
    entries: Arc<Mutex<HashMap<String, CachedBody>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str, policy: CachePolicy) -> Option<Arc<str>> {
        self.get_at(url, policy, Instant::now())
    }

    fn get_at(&self, url: &str, policy: CachePolicy, now: Instant) -> Option<Arc<str>> {
        let CachePolicy::Revalidate(ttl) = policy else {
            return None;
        };

        let mut entries = self.entries.lock().ok()?;
        let fresh = entries
            .get(url)
            .map(|entry| now.saturating_duration_since(entry.stored_at) < ttl)?;

        if fresh {
            debug!(url = %url, "Response cache hit");
            entries.get(url).map(|entry| Arc::clone(&entry.body))
        } else {
            entries.remove(url);
            None
        }
    }

    pub fn put(&self, url: &str, body: Arc<str>, policy: CachePolicy) {
        self.put_at(url, body, policy, Instant::now());
    }

    /// Stores `body` and drops every entry older than the policy's lifetime.
    fn put_at(&self, url: &str, body: Arc<str>, policy: CachePolicy, now: Instant) {
        let CachePolicy::Revalidate(ttl) = policy else {
            return;
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|_, entry| now.saturating_duration_since(entry.stored_at) < ttl);
            entries.insert(
                url.to_string(),
                CachedBody {
                    body,
                    stored_at: now,
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}
