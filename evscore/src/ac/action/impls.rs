use std::{
    fmt,
    str::FromStr,
};
use crate::error::ValueError;
use super::Action;

impl From<Action> for &'static str {
    fn from(action: Action) -> &'static str {
        match action {
            Action::List => "List",
            Action::Read => "Read",
            Action::Create => "Create",
            Action::Update => "Update",
            Action::Delete => "Delete",
            Action::Assign => "Assign",
            Action::Unassign => "Unassign",
            Action::ChangeAvailability => "ChangeAvailability",
            Action::Reset => "Reset",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(<&'static str>::from(*self))
    }
}

impl FromStr for Action {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "List" => Ok(Action::List),
            "Read" => Ok(Action::Read),
            "Create" => Ok(Action::Create),
            "Update" => Ok(Action::Update),
            "Delete" => Ok(Action::Delete),
            "Assign" => Ok(Action::Assign),
            "Unassign" => Ok(Action::Unassign),
            "ChangeAvailability" => Ok(Action::ChangeAvailability),
            "Reset" => Ok(Action::Reset),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

impl Action {
    /// The name of the transient flag attached to entities for this
    /// action, e.g. `canUpdate`.
    pub fn flag_name(&self) -> String {
        format!("can{self}")
    }
}
