// Property tests for the access-policy predicates.

use proptest::prelude::*;
use uuid::Uuid;

use ripple_server::identity::Identity;
use ripple_server::policy::{permits_object, permits_request, Access};

fn access(read: bool) -> Access {
    if read {
        Access::Read
    } else {
        Access::Write
    }
}

proptest! {
    #[test]
    fn unauthenticated_callers_never_pass(read in any::<bool>(), admin_only in any::<bool>()) {
        prop_assert!(!permits_request(None, access(read), admin_only));
    }

    #[test]
    fn authenticated_reads_always_pass(
        id in any::<[u8; 16]>(),
        is_admin in any::<bool>(),
        admin_only in any::<bool>(),
    ) {
        let identity = Identity { id: Uuid::from_bytes(id), is_admin };
        prop_assert!(permits_request(Some(&identity), Access::Read, admin_only));
    }

    #[test]
    fn admin_gated_writes_admit_admins_only(id in any::<[u8; 16]>(), is_admin in any::<bool>()) {
        let identity = Identity { id: Uuid::from_bytes(id), is_admin };
        prop_assert_eq!(
            permits_request(Some(&identity), Access::Write, true),
            is_admin
        );
    }

    #[test]
    fn object_reads_are_open(
        actor in any::<[u8; 16]>(),
        owner in any::<[u8; 16]>(),
        is_admin in any::<bool>(),
    ) {
        let identity = Identity { id: Uuid::from_bytes(actor), is_admin };
        prop_assert!(permits_object(&identity, Uuid::from_bytes(owner), Access::Read));
    }

    #[test]
    fn object_writes_require_the_owner_unless_admin(
        actor in any::<[u8; 16]>(),
        owner in any::<[u8; 16]>(),
        is_admin in any::<bool>(),
    ) {
        let actor_id = Uuid::from_bytes(actor);
        let owner_id = Uuid::from_bytes(owner);
        let identity = Identity { id: actor_id, is_admin };
        prop_assert_eq!(
            permits_object(&identity, owner_id, Access::Write),
            is_admin || actor_id == owner_id
        );
    }
}
