use uuid::Uuid;

use crate::identity::Identity;

/// Whether a request only reads state or mutates it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Request-level role check. Reads are open to any authenticated caller;
/// writes are too, unless the route is admin-gated. Admins pass everything,
/// the unauthenticated pass nothing.
pub fn permits_request(identity: Option<&Identity>, access: Access, admin_only: bool) -> bool {
    let Some(identity) = identity else {
        return false;
    };
    if identity.is_admin {
        return true;
    }
    match access {
        Access::Read => true,
        Access::Write => !admin_only,
    }
}

/// Object-level ownership check. Reads are always permitted; mutation
/// requires the acting identity to be the object's owning identity.
/// Admins pass.
pub fn permits_object(identity: &Identity, owner: Uuid, access: Access) -> bool {
    match access {
        Access::Read => true,
        Access::Write => identity.is_admin || identity.id == owner,
    }
}
