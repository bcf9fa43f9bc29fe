use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub billing: BillingConfig,
    pub moderation: ModerationConfig,
    pub docs: DocsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Shared secret for verifying platform-issued session tokens.
    /// Always set from AUTH_JWT_SECRET; an empty value rejects all tokens.
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base URL of the object-storage service, e.g. https://files.example.com/storage/v1
    pub base_url: String,
    /// Secret used to sign storage URL tokens. Distinct from the session secret.
    pub signing_secret: String,
    pub audio_bucket: String,
    pub image_bucket: String,
    pub avatar_bucket: String,
    pub archive_bucket: String,
    pub upload_url_ttl_secs: u64,
    pub download_url_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    pub api_base: String,
    pub secret_key: String,
    /// Path appended to the caller's origin when building portal return URLs.
    pub portal_return_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Directory the allow-listed documentation files are read from, so the
    /// binary serves them regardless of its working directory.
    pub root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Freshness window for the cached review-required flag.
    pub settings_cache_ttl_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Security overrides
        if let Ok(v) = env::var("AUTH_JWT_SECRET") {
            self.security.jwt_secret = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs =
                v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Storage overrides
        if let Ok(v) = env::var("STORAGE_URL") {
            self.storage.base_url = v;
        }
        if let Ok(v) = env::var("STORAGE_SIGNING_SECRET") {
            self.storage.signing_secret = v;
        }
        if let Ok(v) = env::var("STORAGE_AUDIO_BUCKET") {
            self.storage.audio_bucket = v;
        }
        if let Ok(v) = env::var("STORAGE_IMAGE_BUCKET") {
            self.storage.image_bucket = v;
        }
        if let Ok(v) = env::var("STORAGE_AVATAR_BUCKET") {
            self.storage.avatar_bucket = v;
        }
        if let Ok(v) = env::var("STORAGE_ARCHIVE_BUCKET") {
            self.storage.archive_bucket = v;
        }
        if let Ok(v) = env::var("STORAGE_UPLOAD_URL_TTL_SECS") {
            self.storage.upload_url_ttl_secs =
                v.parse().unwrap_or(self.storage.upload_url_ttl_secs);
        }
        if let Ok(v) = env::var("STORAGE_DOWNLOAD_URL_TTL_SECS") {
            self.storage.download_url_ttl_secs =
                v.parse().unwrap_or(self.storage.download_url_ttl_secs);
        }

        // Billing overrides
        if let Ok(v) = env::var("BILLING_API_BASE") {
            self.billing.api_base = v;
        }
        if let Ok(v) = env::var("BILLING_SECRET_KEY") {
            self.billing.secret_key = v;
        }
        if let Ok(v) = env::var("BILLING_PORTAL_RETURN_PATH") {
            self.billing.portal_return_path = v;
        }

        // Docs overrides
        if let Ok(v) = env::var("SIDESTAGE_DOCS_DIR") {
            self.docs.root = v;
        }

        // Moderation overrides
        if let Ok(v) = env::var("MODERATION_CACHE_TTL_SECS") {
            self.moderation.settings_cache_ttl_secs =
                v.parse().unwrap_or(self.moderation.settings_cache_ttl_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            security: SecurityConfig {
                jwt_secret: String::new(),
            },
            database: DatabaseConfig {
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            storage: StorageConfig {
                base_url: "http://localhost:54321/storage/v1".to_string(),
                signing_secret: String::new(),
                audio_bucket: "tracks".to_string(),
                image_bucket: "covers".to_string(),
                avatar_bucket: "avatars".to_string(),
                archive_bucket: "archives".to_string(),
                upload_url_ttl_secs: 600,
                download_url_ttl_secs: 3600,
            },
            billing: BillingConfig {
                api_base: "https://api.stripe.com".to_string(),
                secret_key: String::new(),
                portal_return_path: "/account".to_string(),
            },
            moderation: ModerationConfig {
                settings_cache_ttl_secs: 60,
            },
            docs: DocsConfig {
                root: ".".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            security: SecurityConfig {
                jwt_secret: String::new(),
            },
            database: DatabaseConfig {
                max_connections: 50,
                connect_timeout_secs: 5,
            },
            storage: StorageConfig {
                base_url: "https://files.sidestage.example/storage/v1".to_string(),
                signing_secret: String::new(),
                audio_bucket: "tracks".to_string(),
                image_bucket: "covers".to_string(),
                avatar_bucket: "avatars".to_string(),
                archive_bucket: "archives".to_string(),
                upload_url_ttl_secs: 300,
                download_url_ttl_secs: 3600,
            },
            billing: BillingConfig {
                api_base: "https://api.stripe.com".to_string(),
                secret_key: String::new(),
                portal_return_path: "/account".to_string(),
            },
            moderation: ModerationConfig {
                settings_cache_ttl_secs: 60,
            },
            docs: DocsConfig {
                root: ".".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_profile_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.moderation.settings_cache_ttl_secs, 60);
        assert_eq!(config.storage.audio_bucket, "tracks");
        assert_eq!(config.docs.root, ".");
        assert!(config.security.jwt_secret.is_empty());
    }

    #[test]
    fn production_profile_tightens_database() {
        let config = AppConfig::production();
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.database.connect_timeout_secs, 5);
        assert_eq!(config.storage.upload_url_ttl_secs, 300);
    }

    #[test]
    fn portal_return_path_has_default() {
        let config = AppConfig::development();
        assert_eq!(config.billing.portal_return_path, "/account");
    }
}
