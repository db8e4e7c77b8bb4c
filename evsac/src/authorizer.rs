use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::Arc,
};
use evscore::{
    ac::{
        Action,
        Resource,
        user::UserToken,
    },
    filter::Filter,
    platform::TenantPlatform,
};
use evsrbac::{
    AuthorizationContext,
    AuthorizationEngine,
    AuthorizationFilter,
    DataSources,
};

mod batch;
mod gates;
mod impls;

/// Options accepted by the entity access gates.
#[derive(Clone, Debug)]
pub struct GateOptions {
    /// Further narrows the fetch; never widens it.
    pub additional_filters: Filter,
    /// Restrict the returned entity to the attributes the caller's grant
    /// permits.  Callers intending to write the entity back need the
    /// full entity and should leave this off.
    pub apply_project_fields: bool,
    /// Refuse entities mirrored from external organizations.
    pub check_issuer: bool,
    pub context: AuthorizationContext,
}

/// Authorization for a single request.
///
/// All checks made through the same `Authorizer` share one data source
/// memo, so a relationship of the caller is looked up at most once no
/// matter how many entities are checked.  An `Authorizer` must not be
/// shared between requests.
pub struct Authorizer {
    engine: Arc<AuthorizationEngine>,
    tenant: Arc<dyn TenantPlatform>,
    user: UserToken,
    data_sources: DataSources,
    evaluations: Mutex<HashMap<(Resource, Action), AuthorizationFilter>>,
}
