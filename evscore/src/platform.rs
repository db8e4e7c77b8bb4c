use async_trait::async_trait;
use std::sync::Arc;
use crate::{
    ac::{
        Resource,
        traits::AssignmentBackend,
    },
    error::BackendError,
    filter::{
        Document,
        Filter,
        Pagination,
        Projection,
    },
};

mod connector;
pub use connector::ConnectorOption;

pub trait PlatformUrl {
    fn url(&self) -> &str;
}

/// Filtered and projected access to the stored entities of a single
/// tenant.
#[async_trait]
pub trait EntityBackend {
    async fn find_documents(
        &self,
        resource: Resource,
        filter: &Filter,
        projection: &Projection,
        pagination: &Pagination,
    ) -> Result<Vec<Document>, BackendError>;
    async fn find_document(
        &self,
        resource: Resource,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Option<Document>, BackendError>;
    /// Store a new document; false if the id is already taken, in which
    /// case nothing is written.
    async fn insert_document(
        &self,
        resource: Resource,
        id: &str,
        doc: &Document,
    ) -> Result<bool, BackendError>;
    async fn save_document(
        &self,
        resource: Resource,
        id: &str,
        doc: &Document,
    ) -> Result<(), BackendError>;
    async fn delete_document(
        &self,
        resource: Resource,
        id: &str,
    ) -> Result<bool, BackendError>;
}

/// TenantPlatform - a storage handle already scoped to one tenant.
///
/// Nothing reachable through this trait accepts a tenant identifier, so
/// a caller holding the handle for one tenant has no way to address the
/// data of another.
///
/// This trait is applicable to everything that correctly implements the
/// relevant backends that compose this trait.
pub trait TenantPlatform: EntityBackend
    + AssignmentBackend

    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn TenantPlatform;
}

pub trait DefaultTenantPlatform: TenantPlatform {}

impl<P: EntityBackend
    + AssignmentBackend

    + DefaultTenantPlatform

    + Send
    + Sync
> TenantPlatform for P {
    fn as_dyn(&self) -> &(dyn TenantPlatform) {
        self
    }
}

/// The process-wide storage, from which tenant scoped handles are taken.
pub trait StoragePlatform: PlatformUrl + Send + Sync {
    fn tenant(&self, tenant_id: &str) -> Arc<dyn TenantPlatform>;
}
