//! Invitation lifecycle service.
//!
//! State machine per invitation: created → accepted (terminal), or
//! expired (computed from the clock at read time), or cancelled (hard
//! delete, afterwards indistinguishable from never-existed).
//!
//! Creation sends the invitation email synchronously and compensates by
//! deleting the freshly created record when delivery fails: no
//! invitation may exist that its recipient was never notified of.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use ombrelle_core::{TenantId, TenantScoped};
use ombrelle_db::models::{CreateInvitation, Invitation, Membership, Tenant, TenantRole, User};
use ombrelle_mail::{EmailSender, InvitationEmail};

use crate::error::TenantError;
use crate::services::authorize::{require_admin, require_membership};

/// Invitation validity window.
const EXPIRY_HOURS: i64 = 24;

/// Generate a cryptographically secure invitation token.
///
/// 32 bytes of OS randomness, URL-safe base64 without padding: safe to
/// embed verbatim in acceptance links.
fn generate_invitation_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Outcome of a successful acceptance.
#[derive(Debug, Clone)]
pub struct AcceptedInvitation {
    pub user: User,
    pub tenant: Tenant,
    pub role: TenantRole,
}

/// Public pre-acceptance view of an invitation.
#[derive(Debug, Clone)]
pub struct InvitationDetails {
    pub invitation: Invitation,
    pub tenant_name: String,
    pub inviter_name: String,
}

/// Orchestrates the invitation lifecycle over the tenant directory, the
/// invitation store, and the mail collaborator.
#[derive(Clone)]
pub struct InvitationService {
    pool: PgPool,
    email_sender: Arc<dyn EmailSender>,
    invitation_base_url: String,
}

impl InvitationService {
    /// Create a new invitation service.
    ///
    /// `invitation_base_url` is the client page the emailed link points
    /// at; the token is appended as a query parameter.
    pub fn new(
        pool: PgPool,
        email_sender: Arc<dyn EmailSender>,
        invitation_base_url: String,
    ) -> Self {
        Self {
            pool,
            email_sender,
            invitation_base_url,
        }
    }

    /// Issue an invitation and send the invitation email.
    pub async fn create_invitation(
        &self,
        tenant_id: Uuid,
        email: &str,
        role: TenantRole,
        invited_by: Uuid,
    ) -> Result<Invitation, TenantError> {
        let caller =
            require_membership(Membership::find(&self.pool, invited_by, tenant_id).await?)?;
        require_admin(&caller)?;

        let tenant = Tenant::find_by_id(&self.pool, tenant_id)
            .await?
            .ok_or(TenantError::TenantNotFound(tenant_id))?;

        let normalized_email = email.to_lowercase();

        // An email that already maps to a member needs no invitation.
        if let Some(existing_user) = User::find_by_email(&self.pool, &normalized_email).await? {
            if Membership::find(&self.pool, existing_user.id, tenant_id)
                .await?
                .is_some()
            {
                return Err(TenantError::UserAlreadyMember);
            }
        }

        if Invitation::find_active_by_email(&self.pool, tenant_id, &normalized_email)
            .await?
            .is_some()
        {
            return Err(TenantError::PendingInvitationExists);
        }

        let token = generate_invitation_token();
        let expires_at = Utc::now() + Duration::hours(EXPIRY_HOURS);

        let invitation = Invitation::create(
            &self.pool,
            &CreateInvitation {
                email: &normalized_email,
                token: &token,
                role,
                expires_at,
                tenant_id,
                invited_by,
            },
        )
        .await?;

        let inviter_name = match User::find_by_id(&self.pool, invited_by).await? {
            Some(inviter) => inviter.display_name(),
            None => "Unknown".to_string(),
        };

        let message = InvitationEmail {
            to_email: normalized_email.clone(),
            tenant_name: tenant.name.clone(),
            inviter_name,
            invitation_link: format!("{}?token={}", self.invitation_base_url, token),
        };

        if let Err(err) = self.email_sender.send_invitation(&message).await {
            // No invitation may outlive a failed notification.
            tracing::warn!(
                tenant_id = %tenant_id,
                invitation_id = %invitation.id,
                error = %err,
                "Invitation email failed, rolling back invitation"
            );
            Invitation::delete(&self.pool, invitation.id).await?;
            return Err(TenantError::InvitationSendFailed);
        }

        tracing::info!(
            tenant_id = %tenant_id,
            invitation_id = %invitation.id,
            email = %invitation.email,
            role = %invitation.role,
            invited_by = %invited_by,
            "Invitation created"
        );

        Ok(invitation)
    }

    /// List a tenant's pending invitations, newest first. Requires OWNER
    /// or ADMIN.
    pub async fn list_invitations(
        &self,
        tenant_id: Uuid,
        caller_id: Uuid,
    ) -> Result<Vec<Invitation>, TenantError> {
        let caller =
            require_membership(Membership::find(&self.pool, caller_id, tenant_id).await?)?;
        require_admin(&caller)?;

        Ok(Invitation::list_pending_for_tenant(&self.pool, tenant_id).await?)
    }

    /// Cancel (hard-delete) a pending invitation. Requires OWNER or
    /// ADMIN.
    pub async fn cancel_invitation(
        &self,
        tenant_id: Uuid,
        invitation_id: Uuid,
        caller_id: Uuid,
    ) -> Result<(), TenantError> {
        let caller =
            require_membership(Membership::find(&self.pool, caller_id, tenant_id).await?)?;
        require_admin(&caller)?;

        let invitation = Invitation::find_by_id(&self.pool, invitation_id)
            .await?
            .ok_or(TenantError::InvitationNotFound)?;

        if invitation.tenant_id() != TenantId::from_uuid(tenant_id) {
            return Err(TenantError::InvitationNotBelongToTenant);
        }

        if invitation.accepted {
            return Err(TenantError::CannotCancelAccepted);
        }

        // The conditional delete re-checks `accepted`: losing a race
        // against a concurrent accept deletes nothing.
        let deleted = Invitation::delete_pending(&self.pool, invitation_id).await?;
        if deleted == 0 {
            match Invitation::find_by_id(&self.pool, invitation_id).await? {
                Some(inv) if inv.accepted => return Err(TenantError::CannotCancelAccepted),
                _ => return Err(TenantError::InvitationNotFound),
            }
        }

        tracing::info!(
            tenant_id = %tenant_id,
            invitation_id = %invitation_id,
            cancelled_by = %caller_id,
            "Invitation cancelled"
        );

        Ok(())
    }

    /// Public pre-acceptance lookup by token.
    ///
    /// NotFound, AlreadyAccepted, and Expired are distinct terminal
    /// answers so the client page can explain each.
    pub async fn get_invitation_by_token(
        &self,
        token: &str,
    ) -> Result<InvitationDetails, TenantError> {
        let invitation = Invitation::find_by_token(&self.pool, token)
            .await?
            .ok_or(TenantError::InvitationNotFound)?;

        if invitation.accepted {
            return Err(TenantError::InvitationAlreadyAccepted);
        }
        if invitation.is_expired() {
            return Err(TenantError::InvitationExpired);
        }

        let tenant_name = Tenant::find_by_id(&self.pool, invitation.tenant_id)
            .await?
            .map(|t| t.name)
            .unwrap_or_default();

        let inviter_name = match User::find_by_id(&self.pool, invitation.invited_by).await? {
            Some(inviter) => inviter.display_name(),
            None => "Unknown".to_string(),
        };

        Ok(InvitationDetails {
            invitation,
            tenant_name,
            inviter_name,
        })
    }

    /// Accept an invitation by token.
    ///
    /// Resolves or lazily creates the local user for the invitation's
    /// email, then — in one transaction, under a row lock on the
    /// invitation — re-checks state, upserts the membership to the
    /// invitation's role, and marks the invitation accepted. A
    /// concurrent cancel or accept that commits first leaves this call
    /// observing not-found or already-accepted.
    pub async fn accept_invitation(
        &self,
        token: &str,
    ) -> Result<AcceptedInvitation, TenantError> {
        // Fast-path checks outside the transaction give precise errors
        // without holding locks.
        let invitation = Invitation::find_by_token(&self.pool, token)
            .await?
            .ok_or(TenantError::InvitationNotFound)?;

        if invitation.accepted {
            return Err(TenantError::InvitationAlreadyAccepted);
        }
        if invitation.is_expired() {
            return Err(TenantError::InvitationExpired);
        }

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Re-read under lock: the authoritative state check.
        let invitation = Invitation::find_by_token_for_update_in(&mut *tx, token)
            .await?
            .ok_or(TenantError::InvitationNotFound)?;

        if invitation.accepted {
            return Err(TenantError::InvitationAlreadyAccepted);
        }
        if invitation.is_expired() {
            return Err(TenantError::InvitationExpired);
        }

        let user = User::find_or_create_by_email_in(&mut *tx, &invitation.email).await?;

        let membership =
            Membership::upsert_in(&mut *tx, user.id, invitation.tenant_id, invitation.role)
                .await?;

        Invitation::mark_accepted_in(&mut *tx, invitation.id)
            .await?
            .ok_or(TenantError::InvitationAlreadyAccepted)?;

        tx.commit().await.map_err(db_err)?;

        let tenant = Tenant::find_by_id(&self.pool, invitation.tenant_id)
            .await?
            .ok_or(TenantError::TenantNotFound(invitation.tenant_id))?;

        tracing::info!(
            tenant_id = %tenant.id,
            invitation_id = %invitation.id,
            user_id = %user.id,
            role = %membership.role,
            "Invitation accepted"
        );

        Ok(AcceptedInvitation {
            user,
            tenant,
            role: membership.role,
        })
    }
}

fn db_err(err: sqlx::Error) -> TenantError {
    TenantError::Database(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length() {
        // 32 bytes in URL-safe base64 without padding is 43 characters.
        assert_eq!(generate_invitation_token().len(), 43);
    }

    #[test]
    fn test_token_uniqueness() {
        let a = generate_invitation_token();
        let b = generate_invitation_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = generate_invitation_token();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
