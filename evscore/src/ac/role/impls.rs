use std::{
    fmt,
    str::FromStr,
};
use crate::error::ValueError;
use super::Role;

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Basic,
        Role::Demo,
        Role::SiteAdmin,
        Role::SiteOwner,
    ];
}

impl From<Role> for &'static str {
    fn from(role: Role) -> &'static str {
        match role {
            Role::Undefined => "Undefined",
            Role::SuperAdmin => "SuperAdmin",
            Role::Admin => "Admin",
            Role::Basic => "Basic",
            Role::Demo => "Demo",
            Role::SiteAdmin => "SiteAdmin",
            Role::SiteOwner => "SiteOwner",
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> String {
        <&'static str>::from(role).to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(<&'static str>::from(*self))
    }
}

impl FromStr for Role {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SuperAdmin" => Ok(Role::SuperAdmin),
            "Admin" => Ok(Role::Admin),
            "Basic" => Ok(Role::Basic),
            "Demo" => Ok(Role::Demo),
            "SiteAdmin" => Ok(Role::SiteAdmin),
            "SiteOwner" => Ok(Role::SiteOwner),
            // Undefined,
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use super::Role;
    use crate::error::ValueError;

    #[test]
    fn smoke() -> anyhow::Result<()> {
        // sample of standard conversions
        assert_eq!(Role::SiteAdmin.to_string(), "SiteAdmin");
        assert_eq!(Role::SiteAdmin, Role::from_str("SiteAdmin")?);
        assert_eq!(Role::Basic.to_string(), "Basic");
        assert_eq!(Role::Basic, Role::from_str("Basic")?);

        // error conversion
        assert!(Role::from_str("Undefined").is_err());
        assert!(matches!(
            Role::from_str("no_such_role")
                .expect_err("should be an error"),
            ValueError::Unsupported(s) if s == "no_such_role".to_string(),
        ));

        // infallable conversion
        assert_eq!(
            Role::from_str("no_such_role")
                .unwrap_or_default(),
            Role::Undefined,
        );
        Ok(())
    }

    #[test]
    fn all_roles_round_trip() {
        for role in Role::ALL {
            assert_eq!(Ok(role), Role::from_str(&role.to_string()));
        }
    }
}
