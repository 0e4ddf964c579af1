// src/app.rs
use crate::auth::oauth::GoogleClient;
use crate::config::AppConfig;
use crate::db::Database;
use crate::geocode::Geocoder;
use crate::mailer::BrevoMailer;
use crate::storage::ImageStore;

/// Everything a request handler needs, built once at boot and shared across
/// the worker threads. No globals; the router gets a reference.
pub struct App {
    pub db: Database,
    pub images: ImageStore,
    pub geocoder: Option<Geocoder>,
    pub google: Option<GoogleClient>,
    pub mailer: Option<BrevoMailer>,
    /// Absolute base for links that leave the site (reset emails).
    pub base_url: String,
}

impl App {
    pub fn from_config(config: &AppConfig) -> Self {
        let geocoder = config.geocoding.clone().map(Geocoder::new);
        let google = config.google.clone().map(GoogleClient::new);
        let (mailer, base_url) = match &config.mail {
            Some(mail) => (
                Some(BrevoMailer::new(
                    mail.brevo_api_key.clone(),
                    mail.sender_email.clone(),
                    mail.sender_name.clone(),
                )),
                mail.base_url.clone(),
            ),
            None => (None, format!("http://{}", config.bind_addr)),
        };

        Self {
            db: Database::new(config.db_path.clone()),
            images: ImageStore::new(config.upload_dir.clone()),
            geocoder,
            google,
            mailer,
            base_url,
        }
    }
}
