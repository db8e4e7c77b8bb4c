use serde::{Deserialize, Serialize};

/// The kinds of entity guarded by the authorization engine.
///
/// Besides naming the entity, this type is the registration table that
/// ties each kind to the document properties the dynamic filters and
/// asserts operate on, see the accessors in the `impls` module.
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum Resource {
    Company,
    Site,
    SiteArea,
    ChargingStation,
    User,
    Car,
    CarCatalog,
    Tag,
    RegistrationToken,
}

mod impls;
