use serde::{Deserialize, Serialize};

/// The role a user holds within a tenant.  A user has exactly one role
/// per tenant membership.
#[non_exhaustive]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum Role {
    // catch-all for whenever infallable conversion is needed
    #[default]
    Undefined,
    SuperAdmin,
    Admin,
    Basic,
    Demo,
    SiteAdmin,
    SiteOwner,
}

mod impls;
