use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Endpoint returning the full movie catalog
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Endpoint returning the current user's reviews
    #[serde(default = "default_reviews_api_url")]
    pub reviews_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin allowed by the CORS layer (the web frontend)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Maximum number of ranked (non-favorite) results per request
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// The local catalog service runs with a self-signed certificate
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,

    /// Timeout applied to every upstream fetch
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_catalog_api_url() -> String {
    "https://localhost:7119/api/movies".to_string()
}

fn default_reviews_api_url() -> String {
    "https://localhost:7119/api/reviews/my-reviews".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_top_n() -> usize {
    20
}

fn default_accept_invalid_certs() -> bool {
    true
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_api_url: default_catalog_api_url(),
            reviews_api_url: default_reviews_api_url(),
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            top_n: default_top_n(),
            accept_invalid_certs: default_accept_invalid_certs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
