//! Invitation model.
//!
//! An invitation offers a named email a specific role in a specific
//! tenant, through a time-boxed single-use token. Lifecycle: created →
//! accepted (terminal), or expired (computed from the clock at read time,
//! never stored), or cancelled (hard delete).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use ombrelle_core::{InvitationId, TenantId, TenantScoped};

use super::TenantRole;
use crate::DbError;

/// A tenant invitation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Invitation {
    /// Unique invitation identifier.
    pub id: Uuid,

    /// Invitee email address (not necessarily a registered user).
    pub email: String,

    /// Opaque unique token, embedded verbatim in the acceptance link.
    /// Immutable after creation.
    pub token: String,

    /// Role granted on acceptance.
    pub role: TenantRole,

    /// Expiry timestamp (24 hours after creation).
    pub expires_at: DateTime<Utc>,

    /// Whether the invitation has been accepted. Once true the record is
    /// immutable and can no longer be cancelled.
    pub accepted: bool,

    /// Owning tenant.
    pub tenant_id: Uuid,

    /// User who issued the invitation.
    pub invited_by: Uuid,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create an invitation.
#[derive(Debug)]
pub struct CreateInvitation<'a> {
    pub email: &'a str,
    pub token: &'a str,
    pub role: TenantRole,
    pub expires_at: DateTime<Utc>,
    pub tenant_id: Uuid,
    pub invited_by: Uuid,
}

impl TenantScoped for Invitation {
    fn tenant_id(&self) -> TenantId {
        TenantId::from_uuid(self.tenant_id)
    }
}

impl Invitation {
    /// The strongly typed invitation ID.
    #[must_use]
    pub fn invitation_id(&self) -> InvitationId {
        InvitationId::from_uuid(self.id)
    }

    /// True when the expiry timestamp has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// True when the invitation can still be accepted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.accepted && !self.is_expired()
    }

    /// True when not yet accepted, regardless of expiration.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.accepted
    }

    /// Insert a new invitation record.
    pub async fn create(
        pool: &PgPool,
        data: &CreateInvitation<'_>,
    ) -> Result<Self, DbError> {
        sqlx::query_as(
            r"
            INSERT INTO invitations (email, token, role, expires_at, tenant_id, invited_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(data.email)
        .bind(data.token)
        .bind(data.role)
        .bind(data.expires_at)
        .bind(data.tenant_id)
        .bind(data.invited_by)
        .fetch_one(pool)
        .await
        .map_err(DbError::from)
    }

    /// Find an invitation by its token.
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Self>, DbError> {
        sqlx::query_as("SELECT * FROM invitations WHERE token = $1")
            .bind(token)
            .fetch_optional(pool)
            .await
            .map_err(DbError::from)
    }

    /// Find an invitation by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, DbError> {
        sqlx::query_as("SELECT * FROM invitations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(DbError::from)
    }

    /// Find an invitation by token inside an open transaction, taking a
    /// row lock.
    ///
    /// Acceptance re-checks state under this lock so that concurrent
    /// accept/cancel on the same token serialize: the loser observes the
    /// already-changed row (or its absence) instead of silently winning.
    pub async fn find_by_token_for_update_in(
        conn: &mut PgConnection,
        token: &str,
    ) -> Result<Option<Self>, DbError> {
        sqlx::query_as("SELECT * FROM invitations WHERE token = $1 FOR UPDATE")
            .bind(token)
            .fetch_optional(conn)
            .await
            .map_err(DbError::from)
    }

    /// List a tenant's pending (not accepted) invitations, newest first.
    ///
    /// Expiration does not remove an invitation from this listing;
    /// administrators see expired entries until they cancel them.
    pub async fn list_pending_for_tenant(
        pool: &PgPool,
        tenant_id: Uuid,
    ) -> Result<Vec<Self>, DbError> {
        sqlx::query_as(
            r"
            SELECT * FROM invitations
            WHERE tenant_id = $1 AND accepted = FALSE
            ORDER BY created_at DESC
            ",
        )
        .bind(tenant_id)
        .fetch_all(pool)
        .await
        .map_err(DbError::from)
    }

    /// Find the active (not accepted, not expired) invitation for an
    /// email within a tenant, if any. Used to prevent duplicate
    /// outstanding invites.
    pub async fn find_active_by_email(
        pool: &PgPool,
        tenant_id: Uuid,
        email: &str,
    ) -> Result<Option<Self>, DbError> {
        sqlx::query_as(
            r"
            SELECT * FROM invitations
            WHERE tenant_id = $1 AND email = $2 AND accepted = FALSE AND expires_at > NOW()
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(DbError::from)
    }

    /// Mark an invitation accepted inside an open transaction.
    ///
    /// The `accepted = FALSE` guard makes the transition idempotent under
    /// concurrency: a second acceptance matches no row and returns `None`.
    pub async fn mark_accepted_in(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Self>, DbError> {
        sqlx::query_as(
            r"
            UPDATE invitations
            SET accepted = TRUE, updated_at = NOW()
            WHERE id = $1 AND accepted = FALSE
            RETURNING *
            ",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(DbError::from)
    }

    /// Hard-delete an invitation, refusing accepted ones.
    ///
    /// Returns the number of deleted rows; 0 means the invitation was
    /// absent or already accepted — callers re-read to tell the two
    /// apart. Cancellation and the mail-failure rollback both land here.
    pub async fn delete_pending(pool: &PgPool, id: Uuid) -> Result<u64, DbError> {
        let result =
            sqlx::query("DELETE FROM invitations WHERE id = $1 AND accepted = FALSE")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Hard-delete an invitation unconditionally (compensating rollback
    /// for a failed invitation email).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invitation(accepted: bool, expires_in: Duration) -> Invitation {
        Invitation {
            id: Uuid::new_v4(),
            email: "b@example.com".to_string(),
            token: "tok".to_string(),
            role: TenantRole::Member,
            expires_at: Utc::now() + expires_in,
            accepted,
            tenant_id: Uuid::new_v4(),
            invited_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_fresh_invitation_is_valid_and_pending() {
        let inv = invitation(false, Duration::hours(24));
        assert!(!inv.is_expired());
        assert!(inv.is_valid());
        assert!(inv.is_pending());
    }

    #[test]
    fn test_expired_invitation_is_pending_but_not_valid() {
        let inv = invitation(false, Duration::hours(-1));
        assert!(inv.is_expired());
        assert!(!inv.is_valid());
        assert!(inv.is_pending());
    }

    #[test]
    fn test_accepted_invitation_is_neither_valid_nor_pending() {
        let inv = invitation(true, Duration::hours(24));
        assert!(!inv.is_valid());
        assert!(!inv.is_pending());
    }

    #[test]
    fn test_accepted_and_expired_is_not_valid() {
        let inv = invitation(true, Duration::hours(-1));
        assert!(!inv.is_valid());
    }
}
