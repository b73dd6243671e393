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
    pub fn build(self) -> TrieBlocklistService {
        TrieBlocklistService::new(self.size)
    }
}

/// Seam over the blocklist. A blocked domain has no associated value; the
/// cache is used only for its membership test, never for lookup.
#[async_trait::async_trait]
pub trait BlocklistService {
    async fn is_blocked(&self, qname: &str) -> bool;
    async fn block(&self, qname: &str);
}

pub struct TrieBlocklistService {
    inner: Mutex<donos_cache::Cache<()>>,
}

impl TrieBlocklistService {
    fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(donos_cache::Cache::new(capacity)),
        }
    }
}

#[async_trait::async_trait]
impl BlocklistService for TrieBlocklistService {
    #[tracing::instrument(skip(self))]
    async fn is_blocked(&self, qname: &str) -> bool {
        let mut inner = self.inner.lock().await;
        inner.get(qname).is_some()
    }

    #[tracing::instrument(skip(self))]
    async fn block(&self, qname: &str) {
        let mut inner = self.inner.lock().await;
        inner.insert(qname, ());
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryBlocklistService {
    inner: std::sync::Mutex<std::collections::HashSet<String>>,
}

#[cfg(test)]
impl MemoryBlocklistService {
    pub fn with_domain<D: Into<String>>(self, domain: D) -> Self {
        self.inner.lock().unwrap().insert(domain.into());
        self
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl BlocklistService for MemoryBlocklistService {
    async fn is_blocked(&self, qname: &str) -> bool {
        self.inner.lock().unwrap().contains(qname)
    }

    async fn block(&self, qname: &str) {
        self.inner.lock().unwrap().insert(qname.to_string());
    }
}
