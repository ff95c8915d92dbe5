//! Server configuration
//!
//! Defines the bind address, pagination bounds and store limits. Values come
//! from environment variables with defaults suited to local development.

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to (e.g., "0.0.0.0:3000")
    pub bind_addr: String,

    /// Page size used when a list request has no `limit`
    pub default_page_size: usize,

    /// Upper bound applied to any requested `limit`
    pub max_page_size: usize,

    /// Maximum number of userIDs accepted in one batch
    pub max_batch_size: usize,

    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,

    /// Total entries the store may hold; `None` means unbounded
    pub max_entries: Option<usize>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(bind_addr: String) -> Self {
        Self {
            bind_addr,
            default_page_size: 100,
            max_page_size: 1000,
            max_batch_size: 10_000,
            max_body_bytes: 16 * 1024 * 1024,
            max_entries: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognized environment variables:
    /// - FLOWLOG_BIND_ADDR (optional, default: 0.0.0.0:3000)
    /// - FLOWLOG_DEFAULT_PAGE_SIZE (optional, default: 100)
    /// - FLOWLOG_MAX_PAGE_SIZE (optional, default: 1000)
    /// - FLOWLOG_MAX_BATCH_SIZE (optional, default: 10000)
    /// - FLOWLOG_MAX_BODY_BYTES (optional, default: 16 MiB)
    /// - FLOWLOG_MAX_ENTRIES (optional, unbounded when unset)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("FLOWLOG_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let mut config = Self::new(bind_addr);

        if let Some(size) = env_usize("FLOWLOG_DEFAULT_PAGE_SIZE")? {
            config.default_page_size = size;
        }

        if let Some(size) = env_usize("FLOWLOG_MAX_PAGE_SIZE")? {
            config.max_page_size = size;
        }

        if let Some(size) = env_usize("FLOWLOG_MAX_BATCH_SIZE")? {
            config.max_batch_size = size;
        }

        if let Some(bytes) = env_usize("FLOWLOG_MAX_BODY_BYTES")? {
            config.max_body_bytes = bytes;
        }

        config.max_entries = env_usize("FLOWLOG_MAX_ENTRIES")?;

        Ok(config)
    }

    /// Sets the request body cap
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Sets the store capacity
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.default_page_size == 0 {
            anyhow::bail!("default_page_size must be greater than 0");
        }

        if self.max_page_size < self.default_page_size {
            anyhow::bail!("max_page_size must be at least default_page_size");
        }

        if self.max_batch_size == 0 {
            anyhow::bail!("max_batch_size must be greater than 0");
        }

        if self.max_body_bytes == 0 {
            anyhow::bail!("max_body_bytes must be greater than 0");
        }

        if self.max_entries == Some(0) {
            anyhow::bail!("max_entries must be greater than 0 when set");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("0.0.0.0:3000".to_string())
    }
}

fn env_usize(name: &str) -> anyhow::Result<Option<usize>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<usize>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} must be a non-negative integer: {}", name, e)),
        Err(_) => Ok(None),
    }
}
