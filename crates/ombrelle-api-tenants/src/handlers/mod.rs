//! HTTP handlers for the tenant API.

pub mod invitations;
pub mod members;
pub mod tenants;

pub use invitations::{
    accept_invitation_handler, cancel_invitation_handler, create_invitation_handler,
    get_invitation_by_token_handler, list_invitations_handler,
};
pub use members::{
    add_member_handler, list_members_handler, remove_member_handler, update_member_role_handler,
};
pub use tenants::{
    create_tenant_handler, delete_tenant_handler, get_tenant_handler, list_tenants_handler,
    update_tenant_handler,
};
