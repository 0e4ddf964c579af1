// src/mailer.rs

use reqwest::blocking::Client;
use serde::Serialize;

use crate::errors::ServerError;

pub struct BrevoMailer {
    api_key: String,
    sender_email: String,
    sender_name: String,
    client: Client,
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: String,
}

impl BrevoMailer {
    pub fn new(api_key: String, sender_email: String, sender_name: String) -> Self {
        Self {
            api_key,
            sender_email,
            sender_name,
            client: Client::new(),
        }
    }

    pub fn send_password_reset(
        &self,
        recipient_email: &str,
        reset_link: &str,
    ) -> Result<(), ServerError> {
        let subject = "Reset your password";
        let html_content = format!(
            r#"
            <h1>Reset your House Marketplace password</h1>
            <p>Click the link below to choose a new password. This link will expire in 15 minutes.</p>
            <p><a href="{}">Reset password</a></p>
            <p>If you did not request this link, you can safely ignore this email.</p>
        "#,
            reset_link
        );

        let payload = BrevoPayload {
            sender: BrevoSender {
                name: &self.sender_name,
                email: &self.sender_email,
            },
            to: vec![BrevoRecipient {
                email: recipient_email,
            }],
            subject,
            html_content,
        };

        let resp = self
            .client
            .post("https://api.brevo.com/v3/smtp/email")
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| ServerError::ExternalError(format!("send email failed: {e}")))?;

        if !resp.status().is_success() {
            let error_body = resp.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ServerError::ExternalError(format!(
                "Failed to send email: {}",
                error_body
            )));
        }

        Ok(())
    }
}
