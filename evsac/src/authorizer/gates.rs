use evscore::{
    ac::Action,
    entity::{
        Car,
        CarCatalog,
        ChargingStation,
        Company,
        RegistrationToken,
        Site,
        SiteArea,
        Tag,
        User,
    },
};

use crate::{
    authorized::Authorized,
    error::AccessError,
};

use super::*;

macro_rules! gate {
    ($( $(#[$meta:meta])* $name:ident => $entity:ty; )*) => {
        impl Authorizer {
            $(
                $(#[$meta])*
                pub async fn $name(
                    &self,
                    id: &str,
                    action: Action,
                    options: &GateOptions,
                ) -> Result<Authorized<$entity>, AccessError> {
                    self.check_and_get::<$entity>(id, action, options).await
                }
            )*
        }
    };
}

gate! {
    check_and_get_company_authorization => Company;
    check_and_get_site_authorization => Site;
    check_and_get_site_area_authorization => SiteArea;
    check_and_get_charging_station_authorization => ChargingStation;
    check_and_get_user_authorization => User;
    /// Cars carry no issuer; a pool car is reachable by the members of
    /// the sites it is shared with.
    check_and_get_car_authorization => Car;
    /// Catalog ids are numeric; pass them in their decimal form.
    check_and_get_car_catalog_authorization => CarCatalog;
    check_and_get_tag_authorization => Tag;
    check_and_get_registration_token_authorization => RegistrationToken;
}
