use evscore::{
    ac::{
        Action,
        Resource,
        Role,
    },
    error::BackendError,
};
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("Misconfiguration: {0}")]
    Misconfiguration(&'static str),
    #[error(transparent)]
    Rbac(#[from] evsrbac::error::Error),
}

/// The details of a denial, kept for the audit log.  None of it is part
/// of the error message so that callers can't learn why they were denied.
#[derive(Clone, Debug, PartialEq)]
pub struct Denial {
    pub tenant_id: String,
    pub user_id: String,
    pub role: Role,
    pub resource: Resource,
    pub action: Action,
    pub id: Option<String>,
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("{field} must be provided")]
    Validation { field: &'static str },
    #[error("forbidden")]
    Forbidden(Denial),
    #[error("not found")]
    NotFound,
    #[error("entity not issued by the organization")]
    ExternalEntity,
    #[error("{field} already in use")]
    AlreadyExists { field: &'static str },
    #[error(transparent)]
    System(#[from] BackendError),
    #[error(transparent)]
    Rbac(evsrbac::error::Error),
}

impl From<evsrbac::error::Error> for AccessError {
    fn from(error: evsrbac::error::Error) -> Self {
        match error {
            evsrbac::error::Error::Backend(e) => AccessError::System(e),
            e => AccessError::Rbac(e),
        }
    }
}

impl From<serde_json::Error> for AccessError {
    fn from(error: serde_json::Error) -> Self {
        AccessError::System(BackendError::from(error))
    }
}

impl AccessError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AccessError::Forbidden(_))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn forbidden_reveals_nothing() {
        let err = AccessError::Forbidden(Denial {
            tenant_id: "t1".into(),
            user_id: "u1".into(),
            role: Role::Basic,
            resource: Resource::Site,
            action: Action::Update,
            id: Some("s2".into()),
        });
        assert_eq!(err.to_string(), "forbidden");
        assert!(err.is_forbidden());
    }

    #[test]
    fn backend_errors_stay_system_errors() {
        let err = AccessError::from(evsrbac::error::Error::Backend(BackendError::Unknown));
        assert!(matches!(err, AccessError::System(BackendError::Unknown)));
        let err = AccessError::from(evsrbac::error::Error::PolicyRequired);
        assert!(matches!(err, AccessError::Rbac(_)));
    }
}
