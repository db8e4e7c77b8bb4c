use std::collections::{HashMap, HashSet};
use evscore::ac::{
    Action,
    Resource,
    Role,
};
use crate::{
    Enforcer,
    assert::{
        AssertMode,
        DynamicAssertName,
    },
    error::Error,
    filter::DynamicFilterName,
};
use super::*;

impl Grant {
    pub fn new(resource: Resource, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            resource,
            actions: actions.into_iter().collect(),
            attributes: Vec::new(),
            condition: None,
        }
    }

    pub fn attributes(mut self, attributes: &[&str]) -> Self {
        self.attributes = attributes.iter()
            .map(|s| s.to_string())
            .collect();
        self
    }

    pub fn filters(mut self, filters: &[DynamicFilterName]) -> Self {
        self.condition
            .get_or_insert_with(Default::default)
            .filters
            .extend_from_slice(filters);
        self
    }

    pub fn asserts(mut self, asserts: &[DynamicAssertName]) -> Self {
        self.condition
            .get_or_insert_with(Default::default)
            .asserts
            .extend_from_slice(asserts);
        self
    }

    pub fn assert_mode(mut self, mode: AssertMode) -> Self {
        self.condition
            .get_or_insert_with(Default::default)
            .assert_mode = mode;
        self
    }

    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        self.resource == resource && self.actions.contains(&action)
    }

    pub fn is_conditional(&self) -> bool {
        self.condition.as_ref()
            .map(|c| !c.filters.is_empty() || !c.asserts.is_empty())
            .unwrap_or(false)
    }
}

impl RoleDefinition {
    pub fn new(grants: Vec<Grant>) -> Self {
        Self { grants, extends: Vec::new() }
    }

    pub fn extends(mut self, role: Role) -> Self {
        self.extends.push(role);
        self
    }
}

impl PolicyDefinition {
    /// A policy consisting of only the provided roles.
    pub fn new(roles: impl IntoIterator<Item = (Role, RoleDefinition)>) -> Self {
        let roles = roles.into_iter().collect::<HashMap<_, _>>();
        let mut index = HashMap::new();
        for role in roles.keys() {
            let mut visited = HashSet::new();
            Self::index_role(&roles, &mut index, &mut visited, *role, *role);
        }
        Self { roles, index }
    }

    // Own grants first so they take precedence, then the extended roles
    // depth-first; roles already visited are skipped so cycles terminate.
    fn index_role(
        roles: &HashMap<Role, RoleDefinition>,
        index: &mut HashMap<(Role, Resource, Action), (Role, usize)>,
        visited: &mut HashSet<Role>,
        target: Role,
        current: Role,
    ) {
        if !visited.insert(current) {
            return;
        }
        let Some(definition) = roles.get(&current) else {
            log::warn!("role {target} extends undefined role {current}");
            return;
        };
        for (pos, grant) in definition.grants.iter().enumerate() {
            for action in grant.actions.iter() {
                index.entry((target, grant.resource, *action))
                    .or_insert((current, pos));
            }
        }
        for parent in definition.extends.iter() {
            Self::index_role(roles, index, visited, target, *parent);
        }
    }

    pub fn from_json(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The grant answering the role's request for the action on the
    /// resource, if any.
    pub fn resolve_grant(
        &self,
        role: Role,
        resource: Resource,
        action: Action,
    ) -> Option<&Grant> {
        let (source, pos) = self.index.get(&(role, resource, action))?;
        self.roles.get(source)?.grants.get(*pos)
    }

    pub fn role(&self, role: Role) -> Option<&RoleDefinition> {
        self.roles.get(&role)
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        let mut roles = self.roles.keys().copied().collect::<Vec<_>>();
        roles.sort();
        roles.into_iter()
    }

    /// Every `(resource, action)` the role may be granted, inherited ones
    /// included, in a stable order.
    pub fn permissions(&self, role: Role) -> Vec<(Resource, Action)> {
        let mut result = self.index.keys()
            .filter(|(r, _, _)| *r == role)
            .map(|(_, resource, action)| (*resource, *action))
            .collect::<Vec<_>>();
        result.sort();
        result
    }

    /// The role's own grants flattened into `role, resource, action`
    /// rules, for enforcers that handle inheritance by themselves.
    pub fn rules(&self) -> Vec<Vec<String>> {
        let mut result = self.roles.iter()
            .flat_map(|(role, definition)| definition.grants.iter()
                .flat_map(move |grant| grant.actions.iter()
                    .map(move |action| vec![
                        role.to_string(),
                        grant.resource.to_string(),
                        action.to_string(),
                    ])
                )
            )
            .collect::<Vec<_>>();
        result.sort();
        result.dedup();
        result
    }

    /// The `(role, parent)` inheritance pairs.
    pub fn extensions(&self) -> Vec<(Role, Role)> {
        let mut result = self.roles.iter()
            .flat_map(|(role, definition)| definition.extends.iter()
                .map(move |parent| (*role, *parent))
            )
            .collect::<Vec<_>>();
        result.sort();
        result
    }
}

impl Default for PolicyDefinition {
    fn default() -> Self {
        default::default_policy()
    }
}

impl From<PolicyTable> for PolicyDefinition {
    fn from(table: PolicyTable) -> Self {
        Self::new(table)
    }
}

impl From<PolicyDefinition> for PolicyTable {
    fn from(policy: PolicyDefinition) -> Self {
        policy.roles.into_iter().collect()
    }
}

impl Enforcer for PolicyDefinition {
    fn enforce(
        &self,
        role: Role,
        resource: Resource,
        action: Action,
    ) -> Result<bool, Error> {
        Ok(self.resolve_grant(role, resource, action).is_some())
    }
}
