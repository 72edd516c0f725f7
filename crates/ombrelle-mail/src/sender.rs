//! The `EmailSender` trait and the mock implementation.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::MailError;

/// Everything needed to render and address an invitation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationEmail {
    /// Recipient address.
    pub to_email: String,

    /// Display name of the tenant the recipient is invited to.
    pub tenant_name: String,

    /// Display name of the inviting user.
    pub inviter_name: String,

    /// Acceptance link with the raw token embedded.
    pub invitation_link: String,
}

/// Outbound email collaborator.
///
/// Implementations must not retry internally: the invitation service
/// treats a failure as final and rolls back the invitation it just
/// created.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send an invitation email. Awaited on the invitation-create path.
    async fn send_invitation(&self, email: &InvitationEmail) -> Result<(), MailError>;
}

/// In-memory sender for tests: records every send, optionally fails.
#[derive(Default)]
pub struct MockEmailSender {
    sent: Mutex<Vec<InvitationEmail>>,
    fail_next: AtomicBool,
}

impl MockEmailSender {
    /// Create a mock that accepts every send.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.fail_next.store(failing, Ordering::SeqCst);
    }

    /// Emails recorded so far.
    pub fn sent(&self) -> Vec<InvitationEmail> {
        self.sent.lock().expect("mock sender lock poisoned").clone()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send_invitation(&self, email: &InvitationEmail) -> Result<(), MailError> {
        if self.fail_next.load(Ordering::SeqCst) {
            return Err(MailError::Request("mock failure".to_string()));
        }
        self.sent
            .lock()
            .expect("mock sender lock poisoned")
            .push(email.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> InvitationEmail {
        InvitationEmail {
            to_email: "b@example.com".to_string(),
            tenant_name: "Acme".to_string(),
            inviter_name: "Jane Doe".to_string(),
            invitation_link: "https://app.example.com/invitations/accept?token=tok".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_records_sends() {
        let sender = MockEmailSender::new();
        sender.send_invitation(&email()).await.unwrap();
        sender.send_invitation(&email()).await.unwrap();
        assert_eq!(sender.sent().len(), 2);
        assert_eq!(sender.sent()[0].to_email, "b@example.com");
    }

    #[tokio::test]
    async fn test_mock_failure_records_nothing() {
        let sender = MockEmailSender::new();
        sender.set_failing(true);
        assert!(sender.send_invitation(&email()).await.is_err());
        assert!(sender.sent().is_empty());

        sender.set_failing(false);
        sender.send_invitation(&email()).await.unwrap();
        assert_eq!(sender.sent().len(), 1);
    }
}
