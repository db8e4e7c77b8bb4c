use serde::{Deserialize, Serialize};
use super::role::Role;

/// The authenticated caller, as loaded from the session before any of
/// the authorization machinery is invoked.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct UserToken {
    pub id: String,
    pub tenant_id: String,
    pub role: Role,
    pub name: String,
}

impl UserToken {
    pub fn new(
        id: impl Into<String>,
        tenant_id: impl Into<String>,
        role: Role,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            tenant_id: tenant_id.into(),
            role,
        }
    }
}
