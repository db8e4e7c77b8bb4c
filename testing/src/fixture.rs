//! A small tenant for exercising the authorization rules.
//!
//! Sites `s1` and `s2` are local while `s3` is mirrored from a roaming
//! partner (`issuer` is false), as is everything below it.
//!
//! | user    | role      | sites                      |
//! |---------|-----------|----------------------------|
//! | `u1`    | Basic     | `s1`                       |
//! | `u2`    | Basic     | `s1`                       |
//! | `u3`    | Basic     | `s2`                       |
//! | `u4`    | SiteAdmin | `s1` (admin), `s3` (admin) |
//! | `u5`    | SiteOwner | `s2` (owner)               |
//! | `admin` | Admin     |                            |
//! | `demo`  | Demo      |                            |

use serde_json::{json, Value};
use evscore::{
    ac::{
        Resource,
        role::Role,
        traits::SiteUserRole,
        user::UserToken,
    },
    error::BackendError,
    filter::Document,
    platform::TenantPlatform,
};

pub const TENANT: &str = "t1";

pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("fixture documents must be objects"),
    }
}

pub fn user(id: &str, role: Role) -> UserToken {
    UserToken::new(id, TENANT, role)
}

pub fn users() -> Vec<(&'static str, Role)> {
    vec![
        ("u1", Role::Basic),
        ("u2", Role::Basic),
        ("u3", Role::Basic),
        ("u4", Role::SiteAdmin),
        ("u5", Role::SiteOwner),
        ("admin", Role::Admin),
        ("demo", Role::Demo),
    ]
}

fn entities() -> Vec<(Resource, Value)> {
    let mut result = vec![
        (Resource::Company, json!({"id": "c1", "name": "Company 1", "issuer": true})),
        (Resource::Company, json!({"id": "c2", "name": "Company 2", "issuer": true})),
        (Resource::Site, json!({
            "id": "s1", "name": "Site 1", "companyID": "c1", "issuer": true,
            "address": {"city": "Auckland", "country": "NZ"},
        })),
        (Resource::Site, json!({
            "id": "s2", "name": "Site 2", "companyID": "c2", "issuer": true,
        })),
        (Resource::Site, json!({
            "id": "s3", "name": "Site 3", "companyID": "c1", "issuer": false,
        })),
        (Resource::SiteArea, json!({"id": "sa1", "name": "Area 1", "siteID": "s1", "issuer": true})),
        (Resource::SiteArea, json!({"id": "sa2", "name": "Area 2", "siteID": "s2", "issuer": true})),
        (Resource::SiteArea, json!({"id": "sa3", "name": "Area 3", "siteID": "s3", "issuer": false})),
        (Resource::ChargingStation, json!({
            "id": "cs1", "siteAreaID": "sa1", "siteID": "s1", "companyID": "c1", "issuer": true,
            "chargePointVendor": "ABB",
        })),
        (Resource::ChargingStation, json!({
            "id": "cs2", "siteAreaID": "sa1", "siteID": "s1", "companyID": "c1", "issuer": true,
        })),
        (Resource::ChargingStation, json!({
            "id": "cs3", "siteAreaID": "sa2", "siteID": "s2", "companyID": "c2", "issuer": true,
        })),
        (Resource::ChargingStation, json!({
            "id": "cs4", "siteAreaID": "sa3", "siteID": "s3", "companyID": "c1", "issuer": false,
        })),
        (Resource::Car, json!({
            "id": "car1", "vin": "VIN1", "type": "Private", "userID": "u1",
        })),
        (Resource::Car, json!({
            "id": "car2", "vin": "VIN2", "type": "PoolCar", "userID": "u2", "siteIDs": ["s1"],
        })),
        (Resource::Car, json!({
            "id": "car3", "vin": "VIN3", "type": "PoolCar", "userID": "u3", "siteIDs": ["s2"],
        })),
        (Resource::CarCatalog, json!({
            "id": 1001, "vehicleMake": "Tesla", "vehicleModel": "Model 3",
        })),
        (Resource::Tag, json!({"id": "tag1", "visualID": "V1", "userID": "u1", "issuer": true})),
        (Resource::Tag, json!({"id": "tag2", "visualID": "V2", "userID": "u2", "issuer": true})),
        (Resource::Tag, json!({"id": "tag3", "visualID": "V3", "userID": "u3", "issuer": true})),
        (Resource::RegistrationToken, json!({
            "id": "rt1", "description": "Area 1", "siteAreaID": "sa1", "siteID": "s1",
        })),
        (Resource::RegistrationToken, json!({
            "id": "rt2", "description": "Area 2", "siteAreaID": "sa2", "siteID": "s2",
        })),
    ];
    result.extend(users().into_iter().map(|(id, role)| (Resource::User, json!({
        "id": id,
        "name": format!("User {id}"),
        "email": format!("{id}@example.com"),
        "role": role,
        "status": "Active",
        "issuer": true,
    }))));
    result
}

fn assignments() -> Vec<(&'static str, &'static str, SiteUserRole)> {
    let plain = SiteUserRole::default();
    let admin = SiteUserRole { site_admin: true, site_owner: false };
    let owner = SiteUserRole { site_admin: false, site_owner: true };
    vec![
        ("s1", "u1", plain),
        ("s1", "u2", plain),
        ("s2", "u3", plain),
        ("s1", "u4", admin),
        ("s3", "u4", admin),
        ("s2", "u5", owner),
    ]
}

/// Populate the tenant with the fixture.
pub async fn seed(tenant: &dyn TenantPlatform) -> Result<(), BackendError> {
    for (resource, value) in entities().into_iter() {
        let id = match value.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => continue,
        };
        tenant.save_document(resource, &id, &doc(value)).await?;
    }
    for (site_id, user_id, role) in assignments().into_iter() {
        tenant.assign_site_user(site_id, user_id, role).await?;
    }
    Ok(())
}
