/// API service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3170). Env var: `API_PORT`.
    pub api_port: u16,
    /// Absolute base URL used in pagination links, short links and media
    /// URLs (default "http://localhost:3170"). Env var: `PUBLIC_BASE_URL`.
    pub public_base_url: String,
    /// Directory where uploaded images are stored (default "./media").
    /// Env var: `MEDIA_ROOT`.
    pub media_root: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3170),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3170".to_owned()),
            media_root: std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_owned()),
        }
    }
}
