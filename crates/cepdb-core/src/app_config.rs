use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which geocoding provider response shape the resolver should expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeProviderKind {
    OpenCage,
    GoogleMaps,
}

impl std::fmt::Display for GeocodeProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeocodeProviderKind::OpenCage => write!(f, "opencage"),
            GeocodeProviderKind::GoogleMaps => write!(f, "google-maps"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub geocode_provider: GeocodeProviderKind,
    pub geocode_base_url: String,
    pub geocode_api_key: String,
    pub geocode_timeout_secs: u64,
    pub search_radius_km: f64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("geocode_provider", &self.geocode_provider)
            .field("geocode_base_url", &self.geocode_base_url)
            .field("geocode_api_key", &"[redacted]")
            .field("geocode_timeout_secs", &self.geocode_timeout_secs)
            .field("search_radius_km", &self.search_radius_km)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
