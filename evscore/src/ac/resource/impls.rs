use std::{
    fmt,
    str::FromStr,
};
use crate::{
    ac::Action,
    error::ValueError,
};
use super::Resource;

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Company,
        Resource::Site,
        Resource::SiteArea,
        Resource::ChargingStation,
        Resource::User,
        Resource::Car,
        Resource::CarCatalog,
        Resource::Tag,
        Resource::RegistrationToken,
    ];

    /// The property that identifies the site the entity belongs to.
    pub fn site_property(&self) -> Option<&'static str> {
        match self {
            Resource::Site => Some("id"),
            Resource::SiteArea
            | Resource::ChargingStation
            | Resource::RegistrationToken => Some("siteID"),
            _ => None,
        }
    }

    /// The property that identifies the company the entity belongs to.
    pub fn company_property(&self) -> Option<&'static str> {
        match self {
            Resource::Company => Some("id"),
            Resource::Site
            | Resource::ChargingStation => Some("companyID"),
            _ => None,
        }
    }

    /// The property that identifies the user the entity belongs to.
    pub fn user_property(&self) -> Option<&'static str> {
        match self {
            Resource::User => Some("id"),
            Resource::Car
            | Resource::Tag => Some("userID"),
            _ => None,
        }
    }

    /// Whether the entity carries the `issuer` flag; entities without it
    /// are always local to the organization.
    pub fn has_issuer(&self) -> bool {
        matches!(
            self,
            Resource::Company
                | Resource::Site
                | Resource::SiteArea
                | Resource::ChargingStation
                | Resource::User
                | Resource::Tag
        )
    }

    /// Fields that must survive any projection so the filters, asserts
    /// and the issuer check can still be evaluated on the document.
    pub fn authorization_fields(&self) -> Vec<&'static str> {
        let mut fields = vec!["id"];
        if self.has_issuer() {
            fields.push("issuer");
        }
        fields.extend(
            [self.site_property(), self.company_property(), self.user_property()]
                .into_iter()
                .flatten()
        );
        if *self == Resource::Car {
            fields.extend(["type", "siteIDs"]);
        }
        fields.sort_unstable();
        fields.dedup();
        fields
    }

    /// Actions for which a `can*` flag gets attached to returned entities.
    pub fn flag_actions(&self) -> &'static [Action] {
        match self {
            Resource::Site
            | Resource::SiteArea => &[
                Action::Read,
                Action::Update,
                Action::Delete,
                Action::Assign,
                Action::Unassign,
            ],
            Resource::ChargingStation => &[
                Action::Read,
                Action::Update,
                Action::Delete,
                Action::ChangeAvailability,
                Action::Reset,
            ],
            Resource::CarCatalog => &[Action::Read],
            Resource::Company
            | Resource::User
            | Resource::Car
            | Resource::Tag
            | Resource::RegistrationToken => &[
                Action::Read,
                Action::Update,
                Action::Delete,
            ],
        }
    }
}

impl From<Resource> for &'static str {
    fn from(resource: Resource) -> &'static str {
        match resource {
            Resource::Company => "Company",
            Resource::Site => "Site",
            Resource::SiteArea => "SiteArea",
            Resource::ChargingStation => "ChargingStation",
            Resource::User => "User",
            Resource::Car => "Car",
            Resource::CarCatalog => "CarCatalog",
            Resource::Tag => "Tag",
            Resource::RegistrationToken => "RegistrationToken",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(<&'static str>::from(*self))
    }
}

impl FromStr for Resource {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL.into_iter()
            .find(|r| <&'static str>::from(*r) == s)
            .ok_or_else(|| ValueError::Unsupported(s.to_string()))
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use super::*;

    #[test]
    fn conversions() -> anyhow::Result<()> {
        assert_eq!(Resource::SiteArea.to_string(), "SiteArea");
        assert_eq!(Resource::RegistrationToken, Resource::from_str("RegistrationToken")?);
        assert!(Resource::from_str("Tenant").is_err());
        Ok(())
    }

    #[test]
    fn authorization_fields() {
        assert_eq!(
            Resource::Site.authorization_fields(),
            vec!["companyID", "id", "issuer"],
        );
        assert_eq!(
            Resource::Car.authorization_fields(),
            vec!["id", "siteIDs", "type", "userID"],
        );
        assert_eq!(
            Resource::CarCatalog.authorization_fields(),
            vec!["id"],
        );
    }
}
