use serde_json::Value;
use std::sync::Arc;
use evscore::{
    ac::{
        Action,
        Resource,
        user::UserToken,
    },
    entity::Entity,
    error::BackendError,
    filter::{
        Document,
        Filter,
        Pagination,
        Projection,
    },
    platform::TenantPlatform,
};
use evsrbac::{
    AuthorizationContext,
    AuthorizationEngine,
    AuthorizationFilter,
    DataSources,
};

use crate::{
    authorized::{
        ActionFlags,
        Authorized,
    },
    error::{
        AccessError,
        Denial,
    },
};

use super::*;

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            additional_filters: Filter::new(),
            apply_project_fields: false,
            check_issuer: true,
            context: AuthorizationContext::default(),
        }
    }
}

impl GateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn additional_filters(mut self, val: Filter) -> Self {
        self.additional_filters = val;
        self
    }

    pub fn apply_project_fields(mut self, val: bool) -> Self {
        self.apply_project_fields = val;
        self
    }

    pub fn check_issuer(mut self, val: bool) -> Self {
        self.check_issuer = val;
        self
    }

    pub fn context(mut self, val: AuthorizationContext) -> Self {
        self.context = val;
        self
    }
}

pub(crate) fn doc_id(doc: &Document) -> Option<String> {
    match doc.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn to_document<T: Entity>(entity: &T) -> Result<Document, AccessError> {
    match serde_json::to_value(entity)? {
        Value::Object(doc) => Ok(doc),
        _ => Err(AccessError::System(BackendError::AppInvariantViolation(format!(
            "{} did not serialize into a document", T::RESOURCE,
        )))),
    }
}

pub(crate) fn from_document<T: Entity>(doc: Document) -> Result<T, AccessError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

impl Authorizer {
    pub fn new(
        engine: Arc<AuthorizationEngine>,
        tenant: Arc<dyn TenantPlatform>,
        user: UserToken,
    ) -> Self {
        Self {
            engine,
            tenant,
            user,
            data_sources: DataSources::new(),
            evaluations: Mutex::new(HashMap::new()),
        }
    }

    pub fn user(&self) -> &UserToken {
        &self.user
    }

    pub fn tenant(&self) -> &dyn TenantPlatform {
        self.tenant.as_dyn()
    }

    pub fn data_sources(&self) -> &DataSources {
        &self.data_sources
    }

    pub(crate) fn denial(
        &self,
        resource: Resource,
        action: Action,
        id: Option<&str>,
    ) -> AccessError {
        log::warn!(
            "forbidden: user {} (role {}) of tenant {} to {action} {resource} {}",
            self.user.id,
            self.user.role,
            self.user.tenant_id,
            id.unwrap_or("*"),
        );
        AccessError::Forbidden(Denial {
            tenant_id: self.user.tenant_id.clone(),
            user_id: self.user.id.clone(),
            role: self.user.role,
            resource,
            action,
            id: id.map(str::to_string),
        })
    }

    fn external(&self, resource: Resource, action: Action, id: &str) -> AccessError {
        log::warn!(
            "user {} of tenant {} to {action} external {resource} {id}",
            self.user.id,
            self.user.tenant_id,
        );
        AccessError::ExternalEntity
    }

    // external entities are refused even when outside of the caller's reach
    async fn is_external(
        &self,
        resource: Resource,
        id: &str,
        options: &GateOptions,
    ) -> Result<bool, AccessError> {
        if !resource.has_issuer() {
            return Ok(false);
        }
        let filter = Filter::new()
            .eq("id", id)
            .and(options.additional_filters.clone())
            .eq("issuer", false);
        Ok(self.tenant.find_document(
            resource,
            &filter,
            &Projection::fields(["id", "issuer"]),
        ).await?.is_some())
    }

    pub async fn evaluate(
        &self,
        resource: Resource,
        action: Action,
        context: &AuthorizationContext,
    ) -> Result<AuthorizationFilter, AccessError> {
        Ok(self.engine.evaluate(
            self.tenant.as_dyn(),
            &self.user,
            resource,
            action,
            context,
            &self.data_sources,
        ).await?)
    }

    // evaluations without context hints are reused for the whole request
    pub(crate) async fn evaluate_cached(
        &self,
        resource: Resource,
        action: Action,
    ) -> Result<AuthorizationFilter, AccessError> {
        let cached = self.evaluations.lock()
            .get(&(resource, action))
            .cloned();
        if let Some(result) = cached {
            return Ok(result);
        }
        let result = self.evaluate(resource, action, &AuthorizationContext::default()).await?;
        self.evaluations.lock().insert((resource, action), result.clone());
        Ok(result)
    }

    /// Whether the action may be performed on the loaded document.
    pub async fn can_perform_action(
        &self,
        resource: Resource,
        action: Action,
        doc: &Document,
    ) -> Result<bool, AccessError> {
        Ok(self.evaluate_cached(resource, action).await?.permits(doc))
    }

    pub(crate) async fn action_flags(
        &self,
        resource: Resource,
        doc: &Document,
    ) -> Result<ActionFlags, AccessError> {
        let mut flags = ActionFlags::default();
        for action in resource.flag_actions() {
            flags.set(*action, self.can_perform_action(resource, *action, doc).await?);
        }
        Ok(flags)
    }

    /// The entity access gate: fetch the entity identified by `id` if the
    /// caller may perform the action on it.
    pub async fn check_and_get<T: Entity>(
        &self,
        id: &str,
        action: Action,
        options: &GateOptions,
    ) -> Result<Authorized<T>, AccessError> {
        if id.is_empty() {
            return Err(AccessError::Validation { field: "id" });
        }
        let resource = T::RESOURCE;
        let auth = self.evaluate(resource, action, &options.context).await?;
        if !auth.authorized {
            return Err(self.denial(resource, action, Some(id)));
        }

        // external entities have to be found to be reported as such
        let restriction = if options.check_issuer {
            auth.filters.clone().without("issuer")
        } else {
            auth.filters.clone()
        };
        let filter = Filter::new()
            .eq("id", id)
            .and(options.additional_filters.clone())
            .and(restriction);
        let projection = if options.apply_project_fields {
            Projection::from_fields(&auth.project_fields)
                .with_fields(resource.authorization_fields())
        } else {
            Projection::all()
        };

        let Some(doc) = self.tenant.find_document(resource, &filter, &projection).await? else {
            if options.check_issuer && self.is_external(resource, id, options).await? {
                return Err(self.external(resource, action, id));
            }
            if auth.is_restricted() {
                return Err(self.denial(resource, action, Some(id)));
            }
            log::debug!("{resource} {id} not found for user {}", self.user.id);
            return Err(AccessError::NotFound);
        };

        let entity: T = from_document(doc.clone())?;
        if options.check_issuer && !entity.issuer() {
            return Err(self.external(resource, action, id));
        }
        let flags = self.action_flags(resource, &doc).await?;
        if !auth.permits(&doc) {
            return Err(self.denial(resource, action, Some(id)));
        }
        Ok(Authorized::new(entity, flags))
    }

    /// The entities the caller may list, narrowed by the filter.
    pub async fn list<T: Entity>(
        &self,
        filter: Filter,
        pagination: &Pagination,
    ) -> Result<Vec<Authorized<T>>, AccessError> {
        let resource = T::RESOURCE;
        let auth = self.evaluate_cached(resource, Action::List).await?;
        if !auth.authorized {
            return Err(self.denial(resource, Action::List, None));
        }
        let filter = filter.and(auth.filters.clone());
        let projection = Projection::from_fields(&auth.project_fields)
            .with_fields(resource.authorization_fields());
        let docs = self.tenant.find_documents(
            resource,
            &filter,
            &projection,
            pagination,
        ).await?;
        let mut result = Vec::with_capacity(docs.len());
        for doc in docs.into_iter() {
            if !auth.asserts_pass(&doc) {
                continue;
            }
            let flags = self.action_flags(resource, &doc).await?;
            result.push(Authorized::new(from_document(doc)?, flags));
        }
        Ok(result)
    }

    /// Store a new entity.  The context carries the hints for the parent
    /// entities, e.g. the site of a new site area.  Existing entities are
    /// never replaced; that goes through [`update`](Self::update).
    pub async fn create<T: Entity>(
        &self,
        entity: &T,
        context: &AuthorizationContext,
    ) -> Result<(), AccessError> {
        let resource = T::RESOURCE;
        let id = entity.id();
        if id.is_empty() {
            return Err(AccessError::Validation { field: "id" });
        }
        let doc = to_document(entity)?;
        let auth = self.evaluate(resource, Action::Create, context).await?;
        if !auth.permits(&doc) {
            return Err(self.denial(resource, Action::Create, Some(&id)));
        }
        if !self.tenant.insert_document(resource, &id, &doc).await? {
            log::warn!(
                "user {} of tenant {} to create existing {resource} {id}",
                self.user.id,
                self.user.tenant_id,
            );
            return Err(AccessError::AlreadyExists { field: "id" });
        }
        Ok(())
    }

    /// Replace a stored entity; both the stored and the new version must
    /// be updatable by the caller.
    pub async fn update<T: Entity>(
        &self,
        entity: &T,
    ) -> Result<(), AccessError> {
        let resource = T::RESOURCE;
        let id = entity.id();
        self.check_and_get::<T>(&id, Action::Update, &GateOptions::default()).await?;
        let doc = to_document(entity)?;
        if !self.can_perform_action(resource, Action::Update, &doc).await? {
            return Err(self.denial(resource, Action::Update, Some(&id)));
        }
        self.tenant.save_document(resource, &id, &doc).await?;
        Ok(())
    }

    pub async fn delete<T: Entity>(
        &self,
        id: &str,
    ) -> Result<(), AccessError> {
        self.check_and_get::<T>(id, Action::Delete, &GateOptions::default()).await?;
        if !self.tenant.delete_document(T::RESOURCE, id).await? {
            return Err(AccessError::NotFound);
        }
        Ok(())
    }
}
