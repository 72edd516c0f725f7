//! Mail error types.

use thiserror::Error;

/// Errors produced while sending email.
#[derive(Debug, Error)]
pub enum MailError {
    /// The sender is misconfigured (missing credentials, bad URL).
    #[error("Mail configuration error: {0}")]
    Configuration(String),

    /// The HTTP request to the provider failed.
    #[error("Mail request failed: {0}")]
    Request(String),

    /// The provider rejected the send.
    #[error("Mail provider rejected the message: HTTP {status}")]
    Rejected { status: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = MailError::Rejected { status: 401 };
        assert_eq!(err.to_string(), "Mail provider rejected the message: HTTP 401");
    }
}
