use tokio::sync::Mutex;

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_size")]
    pub size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: Self::default_size(),
        }
    }
}

impl Config {
    fn default_size() -> usize {
        1000
    }
}

impl Config {
    pub fn build(self) -> TrieCacheService {
        TrieCacheService::new(self.size)
    }
}

/// Seam over the answer cache. Only A-record payloads are ever stored, per
/// the dispatcher's cache-probe rule (AAAA answers are never cached).
#[async_trait::async_trait]
pub trait CacheService {
    async fn get(&self, qname: &str) -> Option<[u8; 4]>;
    async fn insert(&self, qname: &str, addr: [u8; 4]);
}

pub struct TrieCacheService {
    inner: Mutex<donos_cache::Cache<[u8; 4]>>,
}

impl TrieCacheService {
    fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(donos_cache::Cache::new(capacity)),
        }
    }
}

#[async_trait::async_trait]
impl CacheService for TrieCacheService {
    #[tracing::instrument(skip(self))]
    async fn get(&self, qname: &str) -> Option<[u8; 4]> {
        let mut inner = self.inner.lock().await;
        inner.get(qname).copied()
    }

    #[tracing::instrument(skip(self))]
    async fn insert(&self, qname: &str, addr: [u8; 4]) {
        let mut inner = self.inner.lock().await;
        inner.insert(qname, addr);
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockCacheService {
    inner: std::sync::Mutex<std::collections::HashMap<String, [u8; 4]>>,
}

#[cfg(test)]
impl MockCacheService {
    pub fn with_record(self, qname: &str, addr: [u8; 4]) -> Self {
        self.inner.lock().unwrap().insert(qname.to_string(), addr);
        self
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl CacheService for MockCacheService {
    async fn get(&self, qname: &str) -> Option<[u8; 4]> {
        self.inner.lock().unwrap().get(qname).copied()
    }

    async fn insert(&self, qname: &str, addr: [u8; 4]) {
        self.inner.lock().unwrap().insert(qname.to_string(), addr);
    }
}
