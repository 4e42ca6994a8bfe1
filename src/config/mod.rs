use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible storage like MinIO.
    pub endpoint: Option<String>,
    /// Base URL that uploaded objects are publicly reachable under.
    pub public_base_url: String,
    /// Substring that identifies asset URLs hosted by our own bucket.
    /// Externally hosted URLs never match and are never cleaned up.
    pub url_marker: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// The single shared dashboard password, injected via configuration.
    pub admin_password: String,
    pub token_secret: String,
    #[serde(default = "default_expiry_hours")]
    pub token_expiry_hours: u64,
}

impl AuthConfig {
    /// The one place the login gate compares passwords.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.admin_password == candidate
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

fn default_expiry_hours() -> u64 {
    24
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "postgres://localhost/kidzone_admin")?
            .set_default("database.max_connections", 10)?
            .set_default("storage.bucket", "kidzone-media")?
            .set_default("storage.region", "us-east-1")?
            .set_default(
                "storage.public_base_url",
                "https://kidzone-media.s3.us-east-1.amazonaws.com",
            )?
            .set_default("storage.url_marker", "kidzone-media.s3")?
            .set_default("auth.admin_password", "admin123")?
            .set_default("auth.token_secret", "development-secret-change-in-production")?
            .set_default("auth.token_expiry_hours", 24)?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthConfig {
        AuthConfig {
            admin_password: "letmein".to_string(),
            token_secret: "secret".to_string(),
            token_expiry_hours: 24,
        }
    }

    #[test]
    fn password_comparison_is_exact() {
        assert!(auth().password_matches("letmein"));
        assert!(!auth().password_matches("Letmein"));
        assert!(!auth().password_matches(""));
    }
}
