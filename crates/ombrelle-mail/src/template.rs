//! Invitation email rendering.

use crate::sender::InvitationEmail;

/// Subject line for an invitation email.
#[must_use]
pub fn invitation_subject(tenant_name: &str) -> String {
    format!("Invitation to join {tenant_name}")
}

/// Render the invitation HTML body.
///
/// Values are HTML-escaped; the tenant name and inviter name are
/// user-controlled input.
#[must_use]
pub fn render_invitation(email: &InvitationEmail) -> String {
    let tenant = escape(&email.tenant_name);
    let inviter = escape(&email.inviter_name);
    let link = escape(&email.invitation_link);

    format!(
        r#"<html>
<body style="font-family: sans-serif; color: #1f2933;">
  <h2>You have been invited to join {tenant}</h2>
  <p>{inviter} has invited you to join the <strong>{tenant}</strong> workspace.</p>
  <p>
    <a href="{link}" style="display: inline-block; padding: 10px 20px; background: #2563eb; color: #ffffff; text-decoration: none; border-radius: 4px;">
      Accept invitation
    </a>
  </p>
  <p>This invitation expires in 24 hours.</p>
  <p>If you were not expecting this invitation, you can safely ignore this email.</p>
</body>
</html>"#
    )
}

fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
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

    #[test]
    fn test_subject_includes_tenant_name() {
        assert_eq!(invitation_subject("Acme"), "Invitation to join Acme");
    }

    #[test]
    fn test_body_includes_inviter_and_link() {
        let html = render_invitation(&email());
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("token=tok"));
        assert!(html.contains("24 hours"));
    }

    #[test]
    fn test_body_escapes_html() {
        let mut e = email();
        e.tenant_name = "<script>alert(1)</script>".to_string();
        let html = render_invitation(&e);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
