use serde::{Deserialize, Serialize};

/// An operation that may be performed against a resource.
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum Action {
    List,
    Read,
    Create,
    Update,
    Delete,
    Assign,
    Unassign,
    ChangeAvailability,
    Reset,
}

mod impls;
