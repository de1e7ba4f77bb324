//! API server configuration.

use std::path::PathBuf;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// Directory holding `index.html`, `script.js` and `style.css`.
    pub public_dir: PathBuf,
}

impl ApiConfig {
    /// Listen on `127.0.0.1:<port>`.
    pub fn for_port(port: u16, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: format!("127.0.0.1:{port}"),
            public_dir: public_dir.into(),
        }
    }
}

impl Default for ApiConfig {
    /// | Field        | Default          |
    /// |--------------|------------------|
    /// | `bind_addr`  | `127.0.0.1:3000` |
    /// | `public_dir` | `public`         |
    fn default() -> Self {
        Self::for_port(3000, "public")
    }
}
