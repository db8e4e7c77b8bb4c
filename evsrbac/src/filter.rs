//! Dynamic filters
//!
//! A dynamic filter turns the output of a data source into a restriction
//! on a document property of the resource being accessed.  Which property
//! that is comes from the resource type (see `Resource::site_property` and
//! friends), so the same filter name works across every resource that
//! belongs to a site, company or user.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use evscore::ac::Resource;
use crate::source::{
    DataSourceData,
    DataSourceName,
};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum DynamicFilterName {
    SitesAdmin,
    SitesOwner,
    AssignedSites,
    AssignedSitesCompanies,
    SitesAdminUsers,
    OwnUser,
    /// Restricts to entities issued by the local organization.
    LocalIssuer,
}

/// Which of the entity hints of an `AuthorizationContext` a fragment is
/// checked against.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContextKey {
    Site,
    Company,
    User,
}

/// The restriction produced by a single dynamic filter: the property must
/// hold one of the values.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterFragment {
    pub property: &'static str,
    pub values: Vec<Value>,
    pub context_key: Option<ContextKey>,
}

impl DynamicFilterName {
    /// The data source this filter is built from, if any.
    pub fn data_source(&self) -> Option<DataSourceName> {
        match self {
            DynamicFilterName::SitesAdmin => Some(DataSourceName::SitesAdmin),
            DynamicFilterName::SitesOwner => Some(DataSourceName::SitesOwner),
            DynamicFilterName::AssignedSites => Some(DataSourceName::AssignedSites),
            DynamicFilterName::AssignedSitesCompanies =>
                Some(DataSourceName::AssignedSitesCompanies),
            DynamicFilterName::SitesAdminUsers => Some(DataSourceName::SitesAdminUsers),
            DynamicFilterName::OwnUser => Some(DataSourceName::OwnUser),
            DynamicFilterName::LocalIssuer => None,
        }
    }

    /// Build the fragment for the resource from the resolved data.
    ///
    /// Returns `None` when the resource has no property this filter can
    /// be applied to.
    pub fn build(
        &self,
        resource: Resource,
        data: Option<&DataSourceData>,
    ) -> Option<FilterFragment> {
        let (property, context_key) = match self {
            DynamicFilterName::LocalIssuer => {
                return resource.has_issuer().then(|| FilterFragment {
                    property: "issuer",
                    values: vec![Value::Bool(true)],
                    context_key: None,
                })
            }
            DynamicFilterName::SitesAdmin
            | DynamicFilterName::SitesOwner
            | DynamicFilterName::AssignedSites =>
                (resource.site_property()?, ContextKey::Site),
            DynamicFilterName::AssignedSitesCompanies =>
                (resource.company_property()?, ContextKey::Company),
            DynamicFilterName::SitesAdminUsers
            | DynamicFilterName::OwnUser =>
                (resource.user_property()?, ContextKey::User),
        };
        let values = data
            .map(|data| data.ids()
                .iter()
                .map(|id| Value::String(id.clone()))
                .collect()
            )
            .unwrap_or_default();
        Some(FilterFragment {
            property,
            values,
            context_key: Some(context_key),
        })
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use super::*;

    fn sites() -> DataSourceData {
        DataSourceData::SiteIds(vec!["s1".into(), "s2".into()])
    }

    #[test]
    fn site_property_by_resource() {
        let data = sites();
        let fragment = DynamicFilterName::SitesAdmin
            .build(Resource::Site, Some(&data))
            .expect("site has a site property");
        assert_eq!(fragment.property, "id");
        assert_eq!(fragment.values, [json!("s1"), json!("s2")]);
        assert_eq!(fragment.context_key, Some(ContextKey::Site));

        let fragment = DynamicFilterName::AssignedSites
            .build(Resource::ChargingStation, Some(&data))
            .expect("charging station has a site property");
        assert_eq!(fragment.property, "siteID");
    }

    #[test]
    fn misconfigured() {
        let data = sites();
        assert_eq!(DynamicFilterName::SitesAdmin.build(Resource::User, Some(&data)), None);
        assert_eq!(DynamicFilterName::OwnUser.build(Resource::Site, None), None);
        assert_eq!(DynamicFilterName::LocalIssuer.build(Resource::Car, None), None);
    }

    #[test]
    fn local_issuer() {
        let fragment = DynamicFilterName::LocalIssuer
            .build(Resource::Site, None)
            .expect("site has issuer");
        assert_eq!(fragment.property, "issuer");
        assert_eq!(fragment.values, [json!(true)]);
        assert_eq!(fragment.context_key, None);
        assert_eq!(DynamicFilterName::LocalIssuer.data_source(), None);
    }

    #[test]
    fn empty_source() {
        let data = DataSourceData::SiteIds(vec![]);
        let fragment = DynamicFilterName::SitesOwner
            .build(Resource::SiteArea, Some(&data))
            .expect("site area has a site property");
        assert!(fragment.values.is_empty());
    }
}
