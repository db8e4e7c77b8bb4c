use evscore::{
    ac::user::UserToken,
    platform::{
        StoragePlatform,
        TenantPlatform,
    },
};
use evsrbac::{
    AuthorizationEngine,
    Builder as EvsRbacBuilder,
};
use std::sync::Arc;

use crate::{
    authorizer::Authorizer,
    error::Error,
};

use super::*;

impl Builder {
    pub fn new() -> Self {
        Self {
            rbac_builder: EvsRbacBuilder::new(),
            .. Default::default()
        }
    }

    pub fn storage(mut self, val: Arc<dyn StoragePlatform>) -> Self {
        self.storage = Some(val);
        self
    }

    pub fn storage_platform(self, val: impl StoragePlatform + 'static) -> Self {
        self.storage(Arc::new(val))
    }

    pub fn rbac_builder(mut self, val: EvsRbacBuilder) -> Self {
        self.rbac_builder = val;
        self
    }

    pub async fn build(self) -> Result<Platform, Error> {
        let storage = self.storage
            .ok_or(Error::Misconfiguration("missing required argument storage"))?;
        let engine = self.rbac_builder.build().await?;
        Ok(Platform(Arc::new(PlatformInner {
            storage,
            engine: Arc::new(engine),
        })))
    }
}

impl Platform {
    pub fn storage(&self) -> &dyn StoragePlatform {
        self.0.storage.as_ref()
    }

    pub fn engine(&self) -> &AuthorizationEngine {
        &self.0.engine
    }

    pub fn tenant(&self, tenant_id: &str) -> Arc<dyn TenantPlatform> {
        self.0.storage.tenant(tenant_id)
    }

    /// A request scoped authorizer for the user, bound to the user's
    /// tenant.
    pub fn authorizer(&self, user: UserToken) -> Authorizer {
        let tenant = self.tenant(&user.tenant_id);
        Authorizer::new(self.0.engine.clone(), tenant, user)
    }
}
