use std::net::SocketAddr;
use std::path::PathBuf;

/// Server composition settings, resolved once at startup.
///
/// Everything here is injected explicitly into the pieces that need it;
/// nothing reads the environment after boot.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address for the HTTP surface
    pub bind: SocketAddr,

    /// Root directory of the filesystem artifact store
    pub data_dir: PathBuf,

    /// Report workers to run inside this process
    pub worker_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: ([0, 0, 0, 0], 3000).into(),
            data_dir: PathBuf::from("data/artifacts"),
            worker_count: 2,
        }
    }
}

impl ServerConfig {
    /// Load overrides from `QUILL_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(bind) = std::env::var("QUILL_BIND").ok().and_then(|v| v.parse().ok()) {
            config.bind = bind;
        }
        if let Ok(dir) = std::env::var("QUILL_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(count) = std::env::var("QUILL_WORKER_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.worker_count = count;
        }
        config
    }
}
