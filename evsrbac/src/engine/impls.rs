use serde_json::Value;
use std::sync::Arc;
use evscore::{
    ac::{
        Action,
        Resource,
        Role,
        user::UserToken,
    },
    filter::{
        Condition,
        Document,
        Filter,
        Op,
    },
    platform::TenantPlatform,
};
use crate::{
    Enforcer,
    assert::{
        AssertMode,
        StagedAssert,
    },
    error::Error,
    filter::{
        ContextKey,
        FilterFragment,
    },
    policy::{
        DynamicCondition,
        Grant,
        PolicyDefinition,
    },
    source::DataSources,
};
use super::*;

impl AuthorizationContext {
    pub fn for_site(site_id: impl Into<String>) -> Self {
        Self { site_id: Some(site_id.into()), ..Default::default() }
    }

    pub fn for_company(company_id: impl Into<String>) -> Self {
        Self { company_id: Some(company_id.into()), ..Default::default() }
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self { user_id: Some(user_id.into()), ..Default::default() }
    }

    pub fn value(&self, key: ContextKey) -> Option<&str> {
        match key {
            ContextKey::Site => self.site_id.as_deref(),
            ContextKey::Company => self.company_id.as_deref(),
            ContextKey::User => self.user_id.as_deref(),
        }
    }
}

impl AuthorizationFilter {
    fn denied(resource: Resource, data_sources: DataSources) -> Self {
        Self {
            authorized: false,
            filters: Filter::new(),
            project_fields: Vec::new(),
            data_sources,
            resource,
            asserts: Vec::new(),
            assert_mode: AssertMode::All,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn has_asserts(&self) -> bool {
        !self.asserts.is_empty()
    }

    /// Whether the storage filter restricts on anything beyond the issuer.
    pub fn is_restricted(&self) -> bool {
        self.filters.conditions()
            .iter()
            .any(|condition| condition.property != "issuer")
    }

    pub fn asserts_pass(&self, doc: &Document) -> bool {
        if self.asserts.is_empty() {
            return true;
        }
        match self.assert_mode {
            AssertMode::All => self.asserts.iter()
                .all(|staged| staged.check(self.resource, doc)),
            AssertMode::Any => self.asserts.iter()
                .any(|staged| staged.check(self.resource, doc)),
        }
    }

    /// Whether the document may be acted on under this evaluation.
    pub fn permits(&self, doc: &Document) -> bool {
        self.authorized
            && self.filters.matches(doc)
            && self.asserts_pass(doc)
    }

    fn deny(&mut self) {
        self.authorized = false;
        self.filters = Filter::new();
        self.project_fields.clear();
        self.asserts.clear();
    }
}

// Fragments for a single property are unioned, the properties conjoined.
fn merge_fragments(fragments: Vec<FilterFragment>) -> Vec<FilterFragment> {
    let mut result: Vec<FilterFragment> = Vec::new();
    for fragment in fragments.into_iter() {
        match result.iter_mut().find(|f| f.property == fragment.property) {
            Some(merged) => {
                for value in fragment.values.into_iter() {
                    if !merged.values.contains(&value) {
                        merged.values.push(value);
                    }
                }
                merged.context_key = merged.context_key.or(fragment.context_key);
            }
            None => result.push(fragment),
        }
    }
    result
}

impl AuthorizationEngine {
    pub fn new(
        policy: PolicyDefinition,
        enforcer: Option<Box<dyn Enforcer>>,
    ) -> Self {
        Self {
            policy: Arc::new(policy),
            enforcer,
        }
    }

    pub fn policy(&self) -> &PolicyDefinition {
        &self.policy
    }

    /// The grant held by the role for the action on the resource.  No
    /// data is consulted.
    pub fn resolve_static(
        &self,
        role: Role,
        resource: Resource,
        action: Action,
    ) -> Result<Option<&Grant>, Error> {
        if let Some(enforcer) = self.enforcer.as_ref() {
            if !enforcer.enforce(role, resource, action)? {
                return Ok(None);
            }
        }
        Ok(self.policy.resolve_grant(role, resource, action))
    }

    /// Evaluate whether the user may perform the action on the resource,
    /// resolving whatever data sources the governing grant requires.
    pub async fn evaluate(
        &self,
        platform: &dyn TenantPlatform,
        user: &UserToken,
        resource: Resource,
        action: Action,
        context: &AuthorizationContext,
        data_sources: &DataSources,
    ) -> Result<AuthorizationFilter, Error> {
        let mut result = AuthorizationFilter::denied(resource, data_sources.clone());
        let Some(grant) = self.resolve_static(user.role, resource, action)? else {
            log::trace!("role {} holds no grant to {action} on {resource}", user.role);
            return Ok(result);
        };
        result.authorized = true;
        result.project_fields = grant.attributes.clone();
        if let Some(condition) = grant.condition.as_ref() {
            self.apply_condition(&mut result, platform, user, condition, context).await?;
        }
        log::trace!(
            "evaluated {action} on {resource} for user {}: authorized={} filters={:?}",
            user.id,
            result.authorized,
            result.filters,
        );
        Ok(result)
    }

    async fn apply_condition(
        &self,
        result: &mut AuthorizationFilter,
        platform: &dyn TenantPlatform,
        user: &UserToken,
        condition: &DynamicCondition,
        context: &AuthorizationContext,
    ) -> Result<(), Error> {
        let resource = result.resource;
        let mut fragments = Vec::new();
        for name in condition.filters.iter() {
            let data = match name.data_source() {
                Some(source) => Some(
                    result.data_sources.resolve(platform, user, source).await?
                ),
                None => None,
            };
            match name.build(resource, data.as_ref()) {
                Some(fragment) => fragments.push(fragment),
                None => {
                    log::warn!("dynamic filter {name:?} cannot be applied to {resource}");
                    result.deny();
                    return Ok(());
                }
            }
        }

        for fragment in merge_fragments(fragments).into_iter() {
            if fragment.values.is_empty() {
                log::trace!("no values for {resource} property {}", fragment.property);
                result.deny();
                return Ok(());
            }
            if let Some(hint) = fragment.context_key.and_then(|key| context.value(key)) {
                if !fragment.values.iter().any(|v| v.as_str() == Some(hint)) {
                    log::trace!("context {hint} outside of {resource} property {}", fragment.property);
                    result.deny();
                    return Ok(());
                }
            }
            let op = match fragment.values.as_slice() {
                [Value::Bool(value)] => Op::Eq(Value::Bool(*value)),
                _ => Op::In(fragment.values),
            };
            result.filters.push(Condition {
                property: fragment.property.to_string(),
                op,
            });
        }

        for name in condition.asserts.iter() {
            let data = result.data_sources
                .resolve(platform, user, name.data_source())
                .await?;
            result.asserts.push(StagedAssert { name: *name, data });
        }
        result.assert_mode = condition.assert_mode;
        Ok(())
    }

    /// Whether the user may perform the action on the given document.
    pub async fn can_perform_action(
        &self,
        platform: &dyn TenantPlatform,
        user: &UserToken,
        resource: Resource,
        action: Action,
        doc: &Document,
        data_sources: &DataSources,
    ) -> Result<bool, Error> {
        Ok(self.evaluate(
            platform,
            user,
            resource,
            action,
            &AuthorizationContext::default(),
            data_sources,
        ).await?.permits(doc))
    }
}
