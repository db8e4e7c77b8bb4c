use async_trait::async_trait;
use mockall::mock;
use evscore::{
    ac::{
        Resource,
        traits::{
            AssignmentBackend,
            SiteRelation,
            SiteUserRole,
        },
    },
    error::BackendError,
    filter::{
        Document,
        Filter,
        Pagination,
        Projection,
    },
    platform::{
        DefaultTenantPlatform,
        EntityBackend,
    },
};

mock! {
    pub Tenant {}

    #[async_trait]
    impl EntityBackend for Tenant {
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

    #[async_trait]
    impl AssignmentBackend for Tenant {
        async fn assign_site_user(
            &self,
            site_id: &str,
            user_id: &str,
            role: SiteUserRole,
        ) -> Result<bool, BackendError>;
        async fn unassign_site_user(
            &self,
            site_id: &str,
            user_id: &str,
        ) -> Result<bool, BackendError>;
        async fn get_site_ids_for_user(
            &self,
            user_id: &str,
            relation: Option<SiteRelation>,
        ) -> Result<Vec<String>, BackendError>;
        async fn get_company_ids_for_sites(
            &self,
            site_ids: &[String],
        ) -> Result<Vec<String>, BackendError>;
        async fn get_user_ids_for_sites(
            &self,
            site_ids: &[String],
        ) -> Result<Vec<String>, BackendError>;
    }
}

impl DefaultTenantPlatform for MockTenant {}
