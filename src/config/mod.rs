use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    pub vendors: VendorConfig,
    pub access: AccessConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub public_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection URL. `None` selects the in-memory store (development only).
    #[serde(skip_serializing)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub session_cookie: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub cookie_name: String,
    pub session_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorConfig {
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub chat_model: String,
    pub chat_max_tokens: u32,
    pub chat_temperature: f64,
    #[serde(skip_serializing)]
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub default_voice_id: String,
    pub tts_model_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    pub allowed_domains: Vec<String>,
    pub trial_days: i64,
    pub ip_requests_per_hour: u32,
    pub email_requests_per_day: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub chat_daily_limit: u32,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    pub enabled: bool,
    pub deny_list: Vec<String>,
}

/// Brand and internal strings that must never leak into demo payloads.
pub const DEFAULT_DEMO_DENY_LIST: &[&str] = &[
    "DurhamLawPriya",
    "MyDurhamLawPriya",
    "DurmahLawPriya",
    "MyDurhamLaw",
    "casewaylaw.internal",
];

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(v) = env::var("CASEWAY_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("PUBLIC_BASE_URL") {
            self.server.public_base_url = v.trim_end_matches('/').to_string();
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Auth overrides
        if let Ok(v) = env::var("SUPABASE_JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Ok(v) = env::var("SUPABASE_JWT_AUDIENCE") {
            self.auth.jwt_audience = v;
        }
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            self.auth.session_cookie = v;
        }

        // Admin overrides
        self.admin.username = non_empty_env("ADMIN_USERNAME").or(self.admin.username);
        self.admin.password = non_empty_env("ADMIN_PASSWORD").or(self.admin.password);

        // Vendor overrides
        self.vendors.openai_api_key = non_empty_env("OPENAI_API_KEY").or(self.vendors.openai_api_key);
        if let Ok(v) = env::var("OPENAI_BASE_URL") {
            self.vendors.openai_base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("OPENAI_CHAT_MODEL") {
            self.vendors.chat_model = v;
        }
        self.vendors.elevenlabs_api_key =
            non_empty_env("ELEVENLABS_API_KEY").or(self.vendors.elevenlabs_api_key);
        if let Ok(v) = env::var("ELEVENLABS_BASE_URL") {
            self.vendors.elevenlabs_base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("ELEVENLABS_VOICE_ID") {
            self.vendors.default_voice_id = v;
        }
        if let Ok(v) = env::var("ELEVENLABS_MODEL_ID") {
            self.vendors.tts_model_id = v;
        }

        // Access overrides
        if let Ok(v) = env::var("ACCESS_ALLOWED_DOMAINS") {
            self.access.allowed_domains = split_list(&v);
        }
        if let Ok(v) = env::var("ACCESS_TRIAL_DAYS") {
            self.access.trial_days = v.parse().unwrap_or(self.access.trial_days);
        }

        // API overrides
        if let Ok(v) = env::var("CHAT_DAILY_LIMIT") {
            self.api.chat_daily_limit = v.parse().unwrap_or(self.api.chat_daily_limit);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }

        // Demo overrides
        if let Ok(v) = env::var("DEMO_MODE") {
            self.demo.enabled = v.parse().unwrap_or(self.demo.enabled);
        }
        if let Ok(v) = env::var("DEMO_DENY_LIST") {
            self.demo.deny_list = split_list(&v);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                public_base_url: "http://localhost:3000".to_string(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                jwt_audience: "authenticated".to_string(),
                session_cookie: "sb-access-token".to_string(),
            },
            admin: AdminConfig {
                username: None,
                password: None,
                cookie_name: "admin_session".to_string(),
                session_hours: 8,
            },
            vendors: VendorConfig::defaults(),
            access: AccessConfig::defaults(),
            api: ApiConfig {
                chat_daily_limit: 15,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                secure_cookies: false,
            },
            demo: DemoConfig {
                enabled: true,
                deny_list: default_deny_list(),
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                public_base_url: "https://staging.casewaylaw.ai".to_string(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                jwt_audience: "authenticated".to_string(),
                session_cookie: "sb-access-token".to_string(),
            },
            admin: AdminConfig {
                username: None,
                password: None,
                cookie_name: "admin_session".to_string(),
                session_hours: 8,
            },
            vendors: VendorConfig::defaults(),
            access: AccessConfig::defaults(),
            api: ApiConfig {
                chat_daily_limit: 15,
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.casewaylaw.ai".to_string()],
                secure_cookies: true,
            },
            demo: DemoConfig {
                enabled: true,
                deny_list: default_deny_list(),
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                public_base_url: "https://casewaylaw.ai".to_string(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                jwt_audience: "authenticated".to_string(),
                session_cookie: "sb-access-token".to_string(),
            },
            admin: AdminConfig {
                username: None,
                password: None,
                cookie_name: "admin_session".to_string(),
                session_hours: 4,
            },
            vendors: VendorConfig::defaults(),
            access: AccessConfig::defaults(),
            api: ApiConfig {
                chat_daily_limit: 15,
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://casewaylaw.ai".to_string()],
                secure_cookies: true,
            },
            demo: DemoConfig {
                enabled: false,
                deny_list: default_deny_list(),
            },
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self.environment, Environment::Development)
    }
}

impl VendorConfig {
    fn defaults() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            chat_max_tokens: 1500,
            chat_temperature: 0.7,
            elevenlabs_api_key: None,
            elevenlabs_base_url: "https://api.elevenlabs.io".to_string(),
            default_voice_id: "pNInz6obpgDQGcFmaJgB".to_string(),
            tts_model_id: "eleven_monolingual_v1".to_string(),
        }
    }
}

impl AccessConfig {
    fn defaults() -> Self {
        Self {
            allowed_domains: vec!["durham.ac.uk".to_string()],
            trial_days: 30,
            ip_requests_per_hour: 5,
            email_requests_per_day: 3,
        }
    }
}

fn default_deny_list() -> Vec<String> {
    DEFAULT_DEMO_DENY_LIST.iter().map(|s| s.to_string()).collect()
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
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
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.demo.enabled);
        assert!(config.database.url.is_none());
        assert!(!config.security.secure_cookies);
        assert_eq!(config.auth.session_cookie, "sb-access-token");
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.demo.enabled);
        assert!(config.security.secure_cookies);
        assert_eq!(config.admin.session_hours, 4);
    }

    #[test]
    fn splits_comma_lists() {
        assert_eq!(
            split_list(" durham.ac.uk, ,ox.ac.uk "),
            vec!["durham.ac.uk".to_string(), "ox.ac.uk".to_string()]
        );
    }
}
