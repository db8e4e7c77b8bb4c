use evscore::platform::StoragePlatform;
use evsrbac::{
    AuthorizationEngine,
    Builder as EvsRbacBuilder,
};
use std::sync::Arc;

#[derive(Default)]
pub struct Builder {
    storage: Option<Arc<dyn StoragePlatform>>,
    rbac_builder: EvsRbacBuilder,
}

/// The process wide access control platform: storage and the policy
/// shared by every request.
#[derive(Clone)]
pub struct Platform(Arc<PlatformInner>);

struct PlatformInner {
    storage: Arc<dyn StoragePlatform>,
    engine: Arc<AuthorizationEngine>,
}

mod impls;
