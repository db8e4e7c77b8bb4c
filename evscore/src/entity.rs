//! The organizational entities guarded by the access gates.
//!
//! All fields default so that a projected document still deserializes;
//! the JSON names follow the stored document layout.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use crate::ac::Resource;

/// Ties a typed entity to its resource kind.
pub trait Entity: DeserializeOwned + Serialize + Send + Sync {
    const RESOURCE: Resource;

    fn id(&self) -> String;

    /// Whether the entity is owned by the local organization, as opposed
    /// to mirrored from an external roaming partner.
    fn issuer(&self) -> bool {
        true
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub address1: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub issuer: bool,
    pub address: Option<Address>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    #[serde(rename = "companyID")]
    pub company_id: Option<String>,
    pub issuer: bool,
    pub public: bool,
    pub auto_user_site_assignment: bool,
    pub address: Option<Address>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteArea {
    pub id: String,
    pub name: String,
    #[serde(rename = "siteID")]
    pub site_id: Option<String>,
    pub issuer: bool,
    pub maximum_power: Option<f64>,
    pub access_control: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChargingStation {
    pub id: String,
    #[serde(rename = "siteAreaID")]
    pub site_area_id: Option<String>,
    #[serde(rename = "siteID")]
    pub site_id: Option<String>,
    #[serde(rename = "companyID")]
    pub company_id: Option<String>,
    pub issuer: bool,
    pub public: bool,
    pub inactive: bool,
    pub charge_point_vendor: Option<String>,
    pub charge_point_model: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub enum UserStatus {
    #[default]
    Pending,
    Active,
    Inactive,
    Blocked,
    Locked,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<crate::ac::Role>,
    pub status: UserStatus,
    pub issuer: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub enum CarType {
    #[default]
    Private,
    PoolCar,
    Company,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Car {
    pub id: String,
    pub vin: String,
    pub license_plate: String,
    #[serde(rename = "carCatalogID")]
    pub car_catalog_id: Option<i64>,
    #[serde(rename = "type")]
    pub car_type: CarType,
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    /// Sites whose members may share a pool car.
    #[serde(rename = "siteIDs")]
    pub site_ids: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarCatalog {
    pub id: i64,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_model_version: Option<String>,
    pub battery_capacity_full: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    #[serde(rename = "visualID")]
    pub visual_id: Option<String>,
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    pub issuer: bool,
    pub active: bool,
    pub default: bool,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationToken {
    pub id: String,
    pub description: Option<String>,
    #[serde(rename = "siteAreaID")]
    pub site_area_id: Option<String>,
    #[serde(rename = "siteID")]
    pub site_id: Option<String>,
    pub expiration_ts: Option<i64>,
    pub revocation_ts: Option<i64>,
}

mod impls;
