//! Transactional email for ombrelle.
//!
//! The invitation lifecycle treats mail delivery as a synchronous,
//! best-effort collaborator behind the [`EmailSender`] trait: the caller
//! awaits the send and compensates (deletes the invitation) on failure.
//! Production uses [`MailjetSender`]; tests inject [`MockEmailSender`].

pub mod error;
pub mod mailjet;
pub mod sender;
pub mod template;

pub use error::MailError;
pub use mailjet::{MailjetConfig, MailjetSender};
pub use sender::{EmailSender, InvitationEmail, MockEmailSender};
