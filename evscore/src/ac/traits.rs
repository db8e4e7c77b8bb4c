use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::BackendError;

/// The relationship a user holds with a site.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum SiteRelation {
    Admin,
    Owner,
}

/// The flags recorded for a user assigned to a site.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SiteUserRole {
    pub site_admin: bool,
    pub site_owner: bool,
}

/// Queries and mutations for the user to site assignments, which the
/// dynamic data sources are resolved from.  Implementations are already
/// scoped to a single tenant.
#[async_trait]
pub trait AssignmentBackend {
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
    /// Site ids the user is assigned to; restricted to the sites where
    /// the user holds the relation if one is provided.
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
