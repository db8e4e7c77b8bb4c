//! Policy definition
//!
//! The policy is the static half of authorization: for every role, the
//! grants it holds on each resource, optionally qualified by a dynamic
//! condition which is only resolved at evaluation time.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use evscore::ac::{
    Action,
    Resource,
    Role,
};
use crate::{
    assert::{
        AssertMode,
        DynamicAssertName,
    },
    filter::DynamicFilterName,
};

mod default;
mod impls;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DynamicCondition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<DynamicFilterName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asserts: Vec<DynamicAssertName>,
    #[serde(default)]
    pub assert_mode: AssertMode,
}

/// Permission for a set of actions on a resource.
///
/// The attributes are the fields the role may see on the resource; an
/// empty list leaves the projection unrestricted.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Grant {
    pub resource: Resource,
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<DynamicCondition>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RoleDefinition {
    #[serde(default)]
    pub grants: Vec<Grant>,
    /// Roles whose grants are inherited; consulted only after the role's
    /// own grants, in the listed order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<Role>,
}

/// The serialized form of a policy.
pub type PolicyTable = BTreeMap<Role, RoleDefinition>;

/// The role definitions together with the resolution index built from
/// them, mapping every reachable `(role, resource, action)` to the role
/// and position of the grant that answers it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(from = "PolicyTable", into = "PolicyTable")]
pub struct PolicyDefinition {
    roles: HashMap<Role, RoleDefinition>,
    index: HashMap<(Role, Resource, Action), (Role, usize)>,
}
