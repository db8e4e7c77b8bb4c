use std::sync::Arc;
use evscore::{
    ac::Resource,
    filter::Filter,
};
use crate::{
    Enforcer,
    assert::{
        AssertMode,
        StagedAssert,
    },
    policy::PolicyDefinition,
    source::DataSources,
};

mod impls;

/// Hints about the entity being accessed, e.g. the site a new site area
/// is to be created under.  A hint outside of what the caller's dynamic
/// filters allow denies the request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthorizationContext {
    pub site_id: Option<String>,
    pub company_id: Option<String>,
    pub user_id: Option<String>,
}

/// The outcome of an evaluation.
///
/// When `authorized`, the `filters` must be applied to every storage
/// query made on behalf of the caller, and documents fetched with them
/// must also satisfy the staged asserts, see [`permits`].
///
/// [`permits`]: AuthorizationFilter::permits
#[derive(Clone, Debug)]
pub struct AuthorizationFilter {
    pub authorized: bool,
    pub filters: Filter,
    pub project_fields: Vec<String>,
    pub data_sources: DataSources,
    pub(crate) resource: Resource,
    pub(crate) asserts: Vec<StagedAssert>,
    pub(crate) assert_mode: AssertMode,
}

pub struct AuthorizationEngine {
    policy: Arc<PolicyDefinition>,
    enforcer: Option<Box<dyn Enforcer>>,
}
