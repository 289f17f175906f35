use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Runtime configuration, layered as defaults → `config.toml` → environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub storage: StorageConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Base64 key material for the private cookie jar, at least 64 decoded bytes.
    pub cookie_key: Option<String>,
    pub insecure_cookie: bool,
    pub bcrypt_cost: u32,
    pub session_ttl_hours: i64,
    pub session_sweep_secs: u64,
    pub body_limit_bytes: usize,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:celebrate.sqlite".to_string(),
            loglevel: "info".to_string(),
            cookie_key: None,
            insecure_cookie: false,
            bcrypt_cost: 10,
            session_ttl_hours: 24,
            session_sweep_secs: 60 * 60,
            body_limit_bytes: 30 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub public_prefix: String,
    pub placeholder_image: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("public/uploads"),
            public_prefix: "/uploads".to_string(),
            placeholder_image: "/placeholder.jpg".to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub admin_email: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            username: None,
            password: None,
            admin_email: None,
        }
    }
}

// Keeps the SMTP password out of startup logs.
impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("admin_email", &self.admin_email)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("CELEBRATE_").split("__"))
            .merge(legacy_env())
    }
}

/// Unprefixed variable names the deployment already uses.
fn legacy_env() -> Env {
    Env::raw().filter_map(|key| {
        if key == "DATABASE_URL" {
            Some("basic.database_url".into())
        } else if key == "EMAIL_USER" {
            Some("mail.username".into())
        } else if key == "EMAIL_PASS" {
            Some("mail.password".into())
        } else if key == "ADMIN_EMAIL" {
            Some("mail.admin_email".into())
        } else {
            None
        }
    })
}
