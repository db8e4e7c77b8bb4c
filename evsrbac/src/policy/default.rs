use evscore::ac::{
    Action,
    Resource,
    Role,
};
use crate::{
    assert::{
        AssertMode,
        DynamicAssertName as A,
    },
    filter::DynamicFilterName as F,
};
use super::{
    Grant,
    PolicyDefinition,
    RoleDefinition,
};

use Action::*;

const COMPANY: &[&str] = &[
    "id", "name", "issuer", "address.city", "address.country",
];
const COMPANY_BASIC: &[&str] = &["id", "name", "issuer"];
const SITE: &[&str] = &[
    "id", "name", "companyID", "issuer", "public", "autoUserSiteAssignment",
    "address.city", "address.country",
];
const SITE_AREA: &[&str] = &[
    "id", "name", "siteID", "issuer", "maximumPower", "accessControl",
];
const CHARGING_STATION: &[&str] = &[
    "id", "siteAreaID", "siteID", "companyID", "issuer", "public",
    "inactive", "chargePointVendor", "chargePointModel",
];
const USER: &[&str] = &[
    "id", "name", "firstName", "email", "role", "status", "issuer",
];
const CAR: &[&str] = &[
    "id", "vin", "licensePlate", "carCatalogID", "type", "userID", "siteIDs",
];
const CAR_CATALOG: &[&str] = &[
    "id", "vehicleMake", "vehicleModel", "vehicleModelVersion",
    "batteryCapacityFull",
];
const TAG: &[&str] = &[
    "id", "visualID", "userID", "issuer", "active", "default", "description",
];
const REGISTRATION_TOKEN: &[&str] = &[
    "id", "description", "siteAreaID", "siteID", "expirationTs", "revocationTs",
];

fn super_admin() -> RoleDefinition {
    RoleDefinition::new(vec![
        Grant::new(Resource::User, [List, Read]).attributes(USER),
        Grant::new(Resource::User, [Create, Update, Delete]),
        Grant::new(Resource::CarCatalog, [List, Read]).attributes(CAR_CATALOG),
        Grant::new(Resource::CarCatalog, [Create, Update, Delete]),
    ])
}

fn admin() -> RoleDefinition {
    RoleDefinition::new(vec![
        Grant::new(Resource::Company, [List, Read]).attributes(COMPANY),
        Grant::new(Resource::Company, [Create]),
        Grant::new(Resource::Company, [Update, Delete])
            .filters(&[F::LocalIssuer]),
        Grant::new(Resource::Site, [List, Read]).attributes(SITE),
        Grant::new(Resource::Site, [Create]),
        Grant::new(Resource::Site, [Update, Delete, Assign, Unassign])
            .filters(&[F::LocalIssuer]),
        Grant::new(Resource::SiteArea, [List, Read]).attributes(SITE_AREA),
        Grant::new(Resource::SiteArea, [Create]),
        Grant::new(Resource::SiteArea, [Update, Delete, Assign, Unassign])
            .filters(&[F::LocalIssuer]),
        Grant::new(Resource::ChargingStation, [List, Read])
            .attributes(CHARGING_STATION),
        Grant::new(Resource::ChargingStation, [Update, Delete, ChangeAvailability, Reset])
            .filters(&[F::LocalIssuer]),
        Grant::new(Resource::User, [List, Read]).attributes(USER),
        Grant::new(Resource::User, [Create]),
        Grant::new(Resource::User, [Update, Delete])
            .filters(&[F::LocalIssuer]),
        Grant::new(Resource::Car, [List, Read]).attributes(CAR),
        Grant::new(Resource::Car, [Create, Update, Delete]),
        Grant::new(Resource::CarCatalog, [List, Read]).attributes(CAR_CATALOG),
        Grant::new(Resource::Tag, [List, Read]).attributes(TAG),
        Grant::new(Resource::Tag, [Create]),
        Grant::new(Resource::Tag, [Update, Delete])
            .filters(&[F::LocalIssuer]),
        Grant::new(Resource::RegistrationToken, [List, Read])
            .attributes(REGISTRATION_TOKEN),
        Grant::new(Resource::RegistrationToken, [Create, Update, Delete]),
    ])
}

fn basic() -> RoleDefinition {
    RoleDefinition::new(vec![
        Grant::new(Resource::Company, [List, Read])
            .attributes(COMPANY_BASIC)
            .filters(&[F::AssignedSitesCompanies]),
        Grant::new(Resource::Site, [List, Read])
            .attributes(SITE)
            .filters(&[F::AssignedSites]),
        Grant::new(Resource::SiteArea, [List, Read])
            .attributes(SITE_AREA)
            .filters(&[F::AssignedSites]),
        Grant::new(Resource::ChargingStation, [List, Read])
            .attributes(CHARGING_STATION)
            .filters(&[F::AssignedSites]),
        Grant::new(Resource::User, [List])
            .attributes(USER)
            .filters(&[F::OwnUser]),
        Grant::new(Resource::User, [Read])
            .attributes(USER)
            .filters(&[F::OwnUser])
            .asserts(&[A::OwnUser]),
        Grant::new(Resource::User, [Update])
            .filters(&[F::OwnUser, F::LocalIssuer])
            .asserts(&[A::OwnUser]),
        // pool cars are listed to whoever may read them
        Grant::new(Resource::Car, [List, Read])
            .attributes(CAR)
            .asserts(&[A::OwnUser, A::PoolCar])
            .assert_mode(AssertMode::Any),
        Grant::new(Resource::Car, [Create])
            .asserts(&[A::OwnUser]),
        Grant::new(Resource::Car, [Update, Delete])
            .asserts(&[A::OwnUser]),
        Grant::new(Resource::CarCatalog, [List, Read]).attributes(CAR_CATALOG),
        Grant::new(Resource::Tag, [List, Read])
            .attributes(TAG)
            .filters(&[F::OwnUser]),
        Grant::new(Resource::Tag, [Update])
            .filters(&[F::OwnUser, F::LocalIssuer]),
    ])
}

fn demo() -> RoleDefinition {
    RoleDefinition::new(vec![
        Grant::new(Resource::Company, [List, Read]).attributes(COMPANY_BASIC),
        Grant::new(Resource::Site, [List, Read]).attributes(SITE),
        Grant::new(Resource::SiteArea, [List, Read]).attributes(SITE_AREA),
        Grant::new(Resource::ChargingStation, [List, Read])
            .attributes(CHARGING_STATION),
        Grant::new(Resource::User, [Read])
            .attributes(USER)
            .filters(&[F::OwnUser])
            .asserts(&[A::OwnUser]),
        Grant::new(Resource::CarCatalog, [List, Read]).attributes(CAR_CATALOG),
    ])
}

fn site_admin() -> RoleDefinition {
    RoleDefinition::new(vec![
        Grant::new(Resource::Site, [Update, Assign, Unassign])
            .filters(&[F::SitesAdmin, F::LocalIssuer]),
        Grant::new(Resource::SiteArea, [Create, Update, Delete, Assign, Unassign])
            .filters(&[F::SitesAdmin, F::LocalIssuer]),
        Grant::new(Resource::ChargingStation, [Update, Delete, ChangeAvailability, Reset])
            .filters(&[F::SitesAdmin, F::LocalIssuer]),
        Grant::new(Resource::User, [List, Read])
            .attributes(USER)
            .filters(&[F::SitesAdminUsers]),
        Grant::new(Resource::Tag, [List, Read])
            .attributes(TAG)
            .filters(&[F::SitesAdminUsers]),
        Grant::new(Resource::RegistrationToken, [List, Read])
            .attributes(REGISTRATION_TOKEN)
            .filters(&[F::SitesAdmin]),
        Grant::new(Resource::RegistrationToken, [Create, Update, Delete])
            .filters(&[F::SitesAdmin]),
    ]).extends(Role::Basic)
}

fn site_owner() -> RoleDefinition {
    RoleDefinition::new(vec![
        Grant::new(Resource::Site, [Update])
            .filters(&[F::SitesOwner, F::LocalIssuer]),
        Grant::new(Resource::SiteArea, [Update])
            .filters(&[F::SitesOwner, F::LocalIssuer]),
        Grant::new(Resource::ChargingStation, [ChangeAvailability, Reset])
            .filters(&[F::SitesOwner, F::LocalIssuer]),
    ]).extends(Role::Basic)
}

pub(super) fn default_policy() -> PolicyDefinition {
    PolicyDefinition::new([
        (Role::SuperAdmin, super_admin()),
        (Role::Admin, admin()),
        (Role::Basic, basic()),
        (Role::Demo, demo()),
        (Role::SiteAdmin, site_admin()),
        (Role::SiteOwner, site_owner()),
    ])
}
