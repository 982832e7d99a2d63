use serde::{Deserialize, Serialize};

pub type UserId = u64;

/// Marketplace roles resolved by the external identity context.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Provider,
    Admin,
}

/// The authenticated caller for a single request.
///
/// The identity context resolves credentials upstream; the core trusts this
/// pair completely and passes it explicitly into every operation. There is no
/// ambient "current user" state.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn client(id: UserId) -> Self {
        Self::new(id, Role::Client)
    }

    pub fn provider(id: UserId) -> Self {
        Self::new(id, Role::Provider)
    }

    pub fn admin(id: UserId) -> Self {
        Self::new(id, Role::Admin)
    }
}
