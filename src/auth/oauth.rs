// src/auth/oauth.rs
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

use crate::config::GoogleOauth;
use crate::errors::ServerError;

pub const STATE_COOKIE: &str = "oauth_state";

/// The server-side Google sign-in flow: build the consent URL, then turn the
/// callback code into a verified identity (sub + email + name).
pub struct GoogleClient {
    cfg: GoogleOauth,
    client: Client,
}

#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    pub sub: String,
    pub email: String,
    pub name: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    sub: String,
    email: String,
    name: Option<String>,
}

impl GoogleClient {
    pub fn new(cfg: GoogleOauth) -> Self {
        Self {
            cfg,
            client: Client::new(),
        }
    }

    /// Where to send the browser. `state` is a per-request random token the
    /// callback must echo back.
    pub fn authorize_url(&self, state: &str) -> Result<String, ServerError> {
        let mut url = Url::parse(&self.cfg.auth_url)
            .map_err(|e| ServerError::ExternalError(format!("bad oauth auth url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.cfg.client_id)
            .append_pair("redirect_uri", &self.cfg.redirect_url)
            .append_pair("response_type", "code")
            .append_pair("scope", "openid email profile")
            .append_pair("state", state);
        Ok(url.into())
    }

    /// Exchange the callback code for tokens, then fetch the user's profile.
    pub fn exchange_code(&self, code: &str) -> Result<GoogleIdentity, ServerError> {
        let token: TokenResponse = self
            .client
            .post(&self.cfg.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.cfg.client_id.as_str()),
                ("client_secret", self.cfg.client_secret.as_str()),
                ("redirect_uri", self.cfg.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .map_err(|e| ServerError::ExternalError(format!("token exchange failed: {e}")))?
            .error_for_status()
            .map_err(|e| ServerError::ExternalError(format!("token exchange rejected: {e}")))?
            .json()
            .map_err(|e| ServerError::ExternalError(format!("bad token response: {e}")))?;

        let info: UserInfo = self
            .client
            .get(&self.cfg.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .map_err(|e| ServerError::ExternalError(format!("userinfo fetch failed: {e}")))?
            .error_for_status()
            .map_err(|e| ServerError::ExternalError(format!("userinfo rejected: {e}")))?
            .json()
            .map_err(|e| ServerError::ExternalError(format!("bad userinfo response: {e}")))?;

        let name = info
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| info.email.clone());

        Ok(GoogleIdentity {
            sub: info.sub,
            email: info.email,
            name,
        })
    }
}
