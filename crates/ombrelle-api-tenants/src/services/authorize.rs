//! Pure membership authorization rules.
//!
//! Side-effect-free decision functions applied uniformly by every
//! tenant-scoped operation. The membership check always precedes the
//! role check, so a non-member probing another tenant learns nothing
//! about its roles.

use ombrelle_db::models::Membership;

use crate::error::TenantError;

/// Require that the caller has *some* membership in the target tenant.
pub fn require_membership(
    membership: Option<Membership>,
) -> Result<Membership, TenantError> {
    membership.ok_or(TenantError::AccessDenied)
}

/// Require a role allowed to perform tenant-admin actions (OWNER or
/// ADMIN).
pub fn require_admin(membership: &Membership) -> Result<(), TenantError> {
    if membership.is_admin_or_owner() {
        Ok(())
    } else {
        Err(TenantError::InsufficientPermissions("OWNER or ADMIN"))
    }
}

/// Require the OWNER role (tenant deletion).
pub fn require_owner(membership: &Membership) -> Result<(), TenantError> {
    if membership.is_owner() {
        Ok(())
    } else {
        Err(TenantError::InsufficientPermissions("OWNER"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ombrelle_db::models::TenantRole;
    use uuid::Uuid;

    fn membership(role: TenantRole) -> Membership {
        Membership {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_membership_is_access_denied() {
        let result = require_membership(None);
        assert!(matches!(result, Err(TenantError::AccessDenied)));
    }

    #[test]
    fn test_membership_passes_through() {
        let m = membership(TenantRole::Member);
        let id = m.id;
        let result = require_membership(Some(m)).unwrap();
        assert_eq!(result.id, id);
    }

    #[test]
    fn test_admin_check_accepts_owner_and_admin() {
        assert!(require_admin(&membership(TenantRole::Owner)).is_ok());
        assert!(require_admin(&membership(TenantRole::Admin)).is_ok());
    }

    #[test]
    fn test_admin_check_rejects_member() {
        let result = require_admin(&membership(TenantRole::Member));
        assert!(matches!(
            result,
            Err(TenantError::InsufficientPermissions("OWNER or ADMIN"))
        ));
    }

    #[test]
    fn test_owner_check_rejects_admin_and_member() {
        assert!(require_owner(&membership(TenantRole::Owner)).is_ok());
        assert!(matches!(
            require_owner(&membership(TenantRole::Admin)),
            Err(TenantError::InsufficientPermissions("OWNER"))
        ));
        assert!(matches!(
            require_owner(&membership(TenantRole::Member)),
            Err(TenantError::InsufficientPermissions("OWNER"))
        ));
    }
}
