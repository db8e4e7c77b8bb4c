//! Dynamic data sources
//!
//! A data source names a relationship of the caller that is looked up from
//! the assignment backend, e.g. the sites the caller administers.  The
//! results are memoized in `DataSources` for the lifetime of a request so
//! that any number of filters and asserts may share them.

use futures::lock::Mutex as AsyncMutex;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt,
    future::Future,
    sync::Arc,
};
use evscore::{
    ac::{
        traits::SiteRelation,
        user::UserToken,
    },
    error::BackendError,
    platform::TenantPlatform,
};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum DataSourceName {
    /// Sites where the caller is a site admin.
    SitesAdmin,
    /// Sites where the caller is a site owner.
    SitesOwner,
    /// Every site the caller is assigned to.
    AssignedSites,
    /// Companies owning the caller's assigned sites.
    AssignedSitesCompanies,
    /// Users assigned to any site the caller administers.
    SitesAdminUsers,
    /// The caller's own user id.
    OwnUser,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum DataSourceData {
    SiteIds(Vec<String>),
    CompanyIds(Vec<String>),
    UserIds(Vec<String>),
    UserId(String),
}

type Slot = Arc<AsyncMutex<Option<DataSourceData>>>;

#[derive(Default)]
struct Memo {
    slots: Mutex<HashMap<DataSourceName, Slot>>,
    fetched: Mutex<Vec<DataSourceName>>,
}

/// The request scoped data source memo.
///
/// Clones share the same underlying memo.  Every source is fetched at
/// most once, even when it is requested concurrently: the later callers
/// wait on the per-source slot for the first fetch to complete.
#[derive(Clone, Default)]
pub struct DataSources(Arc<Memo>);

impl DataSourceName {
    pub const ALL: [DataSourceName; 6] = [
        DataSourceName::SitesAdmin,
        DataSourceName::SitesOwner,
        DataSourceName::AssignedSites,
        DataSourceName::AssignedSitesCompanies,
        DataSourceName::SitesAdminUsers,
        DataSourceName::OwnUser,
    ];
}

impl DataSourceData {
    pub fn ids(&self) -> &[String] {
        match self {
            DataSourceData::SiteIds(ids)
            | DataSourceData::CompanyIds(ids)
            | DataSourceData::UserIds(ids) => ids,
            DataSourceData::UserId(id) => std::slice::from_ref(id),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids().iter().any(|v| v == id)
    }
}

impl DataSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sources fetched so far, in the order they were first requested.
    pub fn fetched(&self) -> Vec<DataSourceName> {
        self.0.fetched.lock().clone()
    }

    /// The memoized value, if the source has been fetched and no fetch is
    /// currently in flight for it.
    pub fn get(&self, name: DataSourceName) -> Option<DataSourceData> {
        let slot = self.0.slots.lock().get(&name)?.clone();
        let data = slot.try_lock()?.clone();
        data
    }

    /// Resolve the named source for the user, fetching it through the
    /// platform only if it hasn't been already.
    pub async fn resolve(
        &self,
        platform: &dyn TenantPlatform,
        user: &UserToken,
        name: DataSourceName,
    ) -> Result<DataSourceData, BackendError> {
        match name {
            DataSourceName::AssignedSitesCompanies => self.memoize(name, async {
                let sites = self.resolve_direct(
                    platform, user, DataSourceName::AssignedSites).await?;
                Ok(DataSourceData::CompanyIds(
                    platform.get_company_ids_for_sites(sites.ids()).await?
                ))
            }).await,
            DataSourceName::SitesAdminUsers => self.memoize(name, async {
                let sites = self.resolve_direct(
                    platform, user, DataSourceName::SitesAdmin).await?;
                Ok(DataSourceData::UserIds(
                    platform.get_user_ids_for_sites(sites.ids()).await?
                ))
            }).await,
            _ => self.resolve_direct(platform, user, name).await,
        }
    }

    // sources that are fetched without depending on other sources
    async fn resolve_direct(
        &self,
        platform: &dyn TenantPlatform,
        user: &UserToken,
        name: DataSourceName,
    ) -> Result<DataSourceData, BackendError> {
        self.memoize(name, async {
            Ok(match name {
                DataSourceName::SitesAdmin => DataSourceData::SiteIds(
                    platform.get_site_ids_for_user(
                        &user.id, Some(SiteRelation::Admin)).await?
                ),
                DataSourceName::SitesOwner => DataSourceData::SiteIds(
                    platform.get_site_ids_for_user(
                        &user.id, Some(SiteRelation::Owner)).await?
                ),
                DataSourceName::AssignedSites => DataSourceData::SiteIds(
                    platform.get_site_ids_for_user(&user.id, None).await?
                ),
                DataSourceName::OwnUser => DataSourceData::UserId(user.id.clone()),
                DataSourceName::AssignedSitesCompanies
                | DataSourceName::SitesAdminUsers => return Err(
                    BackendError::AppInvariantViolation(format!(
                        "data source {name:?} depends on another source"
                    ))
                ),
            })
        }).await
    }

    async fn memoize(
        &self,
        name: DataSourceName,
        fetch: impl Future<Output = Result<DataSourceData, BackendError>>,
    ) -> Result<DataSourceData, BackendError> {
        let slot = self.0.slots.lock()
            .entry(name)
            .or_default()
            .clone();
        let mut guard = slot.lock().await;
        if let Some(data) = guard.as_ref() {
            log::trace!("data source {name:?} memoized");
            return Ok(data.clone());
        }
        {
            let mut fetched = self.0.fetched.lock();
            if !fetched.contains(&name) {
                fetched.push(name);
            }
        }
        log::debug!("fetching data source {name:?}");
        let data = fetch.await?;
        *guard = Some(data.clone());
        Ok(data)
    }
}

impl fmt::Debug for DataSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DataSources")
            .field(&self.fetched())
            .finish()
    }
}
