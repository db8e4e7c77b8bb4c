use crate::ac::Resource;
use super::*;

macro_rules! issued_entity {
    ($($ty:ident),*) => {
        $(
            impl Entity for $ty {
                const RESOURCE: Resource = Resource::$ty;

                fn id(&self) -> String {
                    self.id.clone()
                }

                fn issuer(&self) -> bool {
                    self.issuer
                }
            }
        )*
    }
}

macro_rules! local_entity {
    ($($ty:ident),*) => {
        $(
            impl Entity for $ty {
                const RESOURCE: Resource = Resource::$ty;

                fn id(&self) -> String {
                    self.id.to_string()
                }
            }
        )*
    }
}

issued_entity!(Company, Site, SiteArea, ChargingStation, User, Tag);
local_entity!(Car, CarCatalog, RegistrationToken);
