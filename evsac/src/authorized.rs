use serde::{
    Serialize,
    Serializer,
    ser::SerializeMap,
};
use std::{
    collections::BTreeMap,
    ops::Deref,
};
use evscore::ac::Action;

/// The actions the caller may take on an entity, serialized as the
/// `canRead`, `canUpdate`... fields expected by API consumers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionFlags(BTreeMap<Action, bool>);

/// An entity together with the caller's action flags.
///
/// The flags only exist on this wrapper; storage accepts the bare entity,
/// so there is no way for them to be persisted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Authorized<T> {
    #[serde(flatten)]
    pub entity: T,
    #[serde(flatten)]
    pub flags: ActionFlags,
}

impl ActionFlags {
    pub fn set(&mut self, action: Action, allowed: bool) {
        self.0.insert(action, allowed);
    }

    /// Whether the flag is set; actions not evaluated are false.
    pub fn can(&self, action: Action) -> bool {
        self.0.get(&action).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, bool)> + '_ {
        self.0.iter().map(|(action, allowed)| (*action, *allowed))
    }
}

impl FromIterator<(Action, bool)> for ActionFlags {
    fn from_iter<I: IntoIterator<Item = (Action, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for ActionFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (action, allowed) in self.0.iter() {
            map.serialize_entry(&action.flag_name(), allowed)?;
        }
        map.end()
    }
}

impl<T> Authorized<T> {
    pub fn new(entity: T, flags: ActionFlags) -> Self {
        Self { entity, flags }
    }

    pub fn can(&self, action: Action) -> bool {
        self.flags.can(action)
    }

    pub fn into_inner(self) -> T {
        self.entity
    }
}

impl<T> Deref for Authorized<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.entity
    }
}
