//! Dynamic asserts
//!
//! Unlike filters, asserts can't be expressed as a storage query and are
//! instead checked against the fetched document.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use evscore::{
    ac::Resource,
    entity::CarType,
    filter::Document,
};
use crate::source::{
    DataSourceData,
    DataSourceName,
};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum DynamicAssertName {
    /// The entity belongs to the caller.
    OwnUser,
    /// The entity is a pool car of one of the caller's assigned sites.
    PoolCar,
}

/// How the asserts of a grant are combined.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub enum AssertMode {
    #[default]
    All,
    Any,
}

/// An assert with its data source already resolved, ready to be checked.
#[derive(Clone, Debug, PartialEq)]
pub struct StagedAssert {
    pub name: DynamicAssertName,
    pub data: DataSourceData,
}

impl DynamicAssertName {
    pub fn data_source(&self) -> DataSourceName {
        match self {
            DynamicAssertName::OwnUser => DataSourceName::OwnUser,
            DynamicAssertName::PoolCar => DataSourceName::AssignedSites,
        }
    }

    pub fn check(
        &self,
        resource: Resource,
        data: &DataSourceData,
        doc: &Document,
    ) -> bool {
        match self {
            DynamicAssertName::OwnUser => resource.user_property()
                .and_then(|property| doc.get(property))
                .and_then(Value::as_str)
                .map(|user_id| data.contains(user_id))
                .unwrap_or(false),
            DynamicAssertName::PoolCar => {
                resource == Resource::Car
                    && doc.get("type")
                        .and_then(|v| serde_json::from_value::<CarType>(v.clone()).ok())
                        == Some(CarType::PoolCar)
                    && doc.get("siteIDs")
                        .and_then(Value::as_array)
                        .map(|sites| sites.iter()
                            .filter_map(Value::as_str)
                            .any(|site_id| data.contains(site_id))
                        )
                        .unwrap_or(false)
            }
        }
    }
}

impl StagedAssert {
    pub fn check(&self, resource: Resource, doc: &Document) -> bool {
        self.name.check(resource, &self.data, doc)
    }
}
