//! Mailjet v3.1 send-API client.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::error::MailError;
use crate::sender::{EmailSender, InvitationEmail};
use crate::template::{invitation_subject, render_invitation};

const MAILJET_SEND_URL: &str = "https://api.mailjet.com/v3.1/send";

/// Mailjet credentials and sender identity.
#[derive(Debug, Clone)]
pub struct MailjetConfig {
    /// API key (Basic auth username).
    pub api_key: String,

    /// Secret key (Basic auth password).
    pub secret_key: String,

    /// Sender address, must be validated with Mailjet.
    pub sender_email: String,

    /// Sender display name.
    pub sender_name: String,
}

impl MailjetConfig {
    /// Validate that credentials are present.
    ///
    /// Missing mail credentials fail startup rather than deferring to a
    /// no-op sender.
    pub fn validate(&self) -> Result<(), MailError> {
        if self.api_key.is_empty() || self.secret_key.is_empty() {
            return Err(MailError::Configuration(
                "Mailjet API key and secret key are required".to_string(),
            ));
        }
        if self.sender_email.is_empty() {
            return Err(MailError::Configuration(
                "Mailjet sender email is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SendRequest {
    #[serde(rename = "Messages")]
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    #[serde(rename = "From")]
    from: Address,
    #[serde(rename = "To")]
    to: Vec<Address>,
    #[serde(rename = "Subject")]
    subject: String,
    #[serde(rename = "HTMLPart")]
    html_part: String,
}

#[derive(Serialize)]
struct Address {
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Name")]
    name: String,
}

/// Sends mail through the Mailjet REST API.
pub struct MailjetSender {
    config: MailjetConfig,
    client: reqwest::Client,
    send_url: String,
}

impl MailjetSender {
    /// Create a sender; fails fast on invalid configuration.
    pub fn new(config: MailjetConfig) -> Result<Self, MailError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MailError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            send_url: MAILJET_SEND_URL.to_string(),
        })
    }

    /// Override the API endpoint (tests).
    #[must_use]
    pub fn with_send_url(mut self, url: impl Into<String>) -> Self {
        self.send_url = url.into();
        self
    }

    fn build_request(&self, email: &InvitationEmail) -> SendRequest {
        SendRequest {
            messages: vec![Message {
                from: Address {
                    email: self.config.sender_email.clone(),
                    name: self.config.sender_name.clone(),
                },
                to: vec![Address {
                    email: email.to_email.clone(),
                    name: email.to_email.clone(),
                }],
                subject: invitation_subject(&email.tenant_name),
                html_part: render_invitation(email),
            }],
        }
    }
}

#[async_trait]
impl EmailSender for MailjetSender {
    async fn send_invitation(&self, email: &InvitationEmail) -> Result<(), MailError> {
        let body = self.build_request(email);

        let response = self
            .client
            .post(&self.send_url)
            .basic_auth(&self.config.api_key, Some(&self.config.secret_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                to = %email.to_email,
                status = status.as_u16(),
                "Mailjet rejected invitation email"
            );
            return Err(MailError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::info!(to = %email.to_email, "Invitation email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailjetConfig {
        MailjetConfig {
            api_key: "key".to_string(),
            secret_key: "secret".to_string(),
            sender_email: "no-reply@example.com".to_string(),
            sender_name: "Ombrelle".to_string(),
        }
    }

    fn email() -> InvitationEmail {
        InvitationEmail {
            to_email: "b@example.com".to_string(),
            tenant_name: "Acme".to_string(),
            inviter_name: "Jane Doe".to_string(),
            invitation_link: "https://app.example.com/invitations/accept?token=tok".to_string(),
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(config().validate().is_ok());

        let mut c = config();
        c.api_key = String::new();
        assert!(matches!(c.validate(), Err(MailError::Configuration(_))));

        let mut c = config();
        c.sender_email = String::new();
        assert!(matches!(c.validate(), Err(MailError::Configuration(_))));
    }

    #[test]
    fn test_new_rejects_missing_credentials() {
        let mut c = config();
        c.secret_key = String::new();
        assert!(MailjetSender::new(c).is_err());
    }

    #[test]
    fn test_payload_shape_matches_mailjet_v3_1() {
        let sender = MailjetSender::new(config()).unwrap();
        let request = sender.build_request(&email());
        let json = serde_json::to_value(&request).unwrap();

        let message = &json["Messages"][0];
        assert_eq!(message["From"]["Email"], "no-reply@example.com");
        assert_eq!(message["From"]["Name"], "Ombrelle");
        assert_eq!(message["To"][0]["Email"], "b@example.com");
        assert_eq!(message["Subject"], "Invitation to join Acme");
        assert!(message["HTMLPart"]
            .as_str()
            .unwrap()
            .contains("token=tok"));
    }
}
