//! Dynamic authorization for the evs platform.
//!
//! Authorization is computed in two phases.  The static phase resolves
//! the `Grant` the caller's role holds for the resource and action from
//! the `PolicyDefinition`; without one the caller is denied outright.
//! The dynamic phase resolves the grant's condition against the caller's
//! relationships (the data sources), producing the storage filter that
//! narrows what may be fetched and the asserts that are checked against
//! the fetched entity.

use evscore::ac::{
    Action,
    Resource,
    Role,
};

pub mod assert;
pub mod builder;
#[cfg(feature = "casbin")]
pub mod casbin;
pub mod engine;
pub mod error;
pub mod filter;
pub mod policy;
pub mod source;

pub use builder::Builder;
pub use engine::{
    AuthorizationContext,
    AuthorizationEngine,
    AuthorizationFilter,
};
pub use policy::PolicyDefinition;
pub use source::DataSources;

/// Static enforcement, answering whether a role ever holds the action
/// on the resource.
pub trait Enforcer: Send + Sync {
    fn enforce(
        &self,
        role: Role,
        resource: Resource,
        action: Action,
    ) -> Result<bool, error::Error>;
}
