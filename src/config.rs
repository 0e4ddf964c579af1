// src/config.rs
use std::env;

/// Runtime configuration, read once at boot from environment variables.
/// Everything has a local-dev default except the third-party credentials,
/// which degrade gracefully when absent (see `Geocoding`, `GoogleOauth`,
/// `Mail`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub db_path: String,
    pub upload_dir: String,
    pub geocoding: Option<Geocoding>,
    pub google: Option<GoogleOauth>,
    pub mail: Option<Mail>,
}

#[derive(Debug, Clone)]
pub struct Geocoding {
    pub api_key: String,
    /// Base URL of the geocode endpoint. Overridable so tests can point at
    /// a local stub.
    pub endpoint: String,
}

#[derive(Debug, Clone)]
pub struct GoogleOauth {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

#[derive(Debug, Clone)]
pub struct Mail {
    pub brevo_api_key: String,
    pub sender_email: String,
    pub sender_name: String,
    /// Absolute base used when building links in emails.
    pub base_url: String,
}

const DEFAULT_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DEFAULT_GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

impl AppConfig {
    pub fn from_env() -> Self {
        let geocoding = env::var("GEOCODING_API_KEY").ok().map(|api_key| Geocoding {
            api_key,
            endpoint: env::var("GEOCODING_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GEOCODE_ENDPOINT.to_string()),
        });

        let google = match (
            env::var("GOOGLE_CLIENT_ID"),
            env::var("GOOGLE_CLIENT_SECRET"),
        ) {
            (Ok(client_id), Ok(client_secret)) => Some(GoogleOauth {
                client_id,
                client_secret,
                redirect_url: env::var("GOOGLE_REDIRECT_URL").unwrap_or_else(|_| {
                    "http://localhost:3000/oauth/google/callback".to_string()
                }),
                auth_url: env::var("GOOGLE_AUTH_URL")
                    .unwrap_or_else(|_| DEFAULT_GOOGLE_AUTH_URL.to_string()),
                token_url: env::var("GOOGLE_TOKEN_URL")
                    .unwrap_or_else(|_| DEFAULT_GOOGLE_TOKEN_URL.to_string()),
                userinfo_url: env::var("GOOGLE_USERINFO_URL")
                    .unwrap_or_else(|_| DEFAULT_GOOGLE_USERINFO_URL.to_string()),
            }),
            _ => None,
        };

        let mail = env::var("BREVO_API_KEY").ok().map(|brevo_api_key| Mail {
            brevo_api_key,
            sender_email: env::var("MAIL_SENDER_EMAIL")
                .unwrap_or_else(|_| "noreply@localhost".to_string()),
            sender_name: env::var("MAIL_SENDER_NAME")
                .unwrap_or_else(|_| "House Marketplace".to_string()),
            base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        });

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "marketplace.sqlite3".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            geocoding,
            google,
            mail,
        }
    }
}
