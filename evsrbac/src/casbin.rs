use casbin::{
    CoreApi,
    DefaultModel,
    MemoryAdapter,
    MgmtApi,
};
use evscore::ac::{
    Action,
    Resource,
    Role,
};

use crate::{
    Enforcer,
    builder::{Kind, Builder},
    error::Error,
    policy::PolicyDefinition,
};

/// The casbin model for the evs roles.  Role inheritance is expressed
/// through the `g` grouping, so a role matches its own policies and
/// those of every role it extends.
const DEFAULT_MODEL: &str = "\
[request_definition]
r = sub, res, act

[policy_definition]
p = sub, res, act

[role_definition]
g = _, _

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = g(r.sub, p.sub) && r.res == p.res && r.act == p.act
";

/// Builds a casbin backed static enforcer.
///
/// This only covers the static phase of authorization; the dynamic
/// conditions of the grants are still resolved from the policy.
#[derive(Clone, Debug, Default)]
pub struct CasbinBuilder {
    pub(crate) default_model: Box<str>,
}

impl From<CasbinBuilder> for Builder {
    fn from(builder: CasbinBuilder) -> Self {
        Self {
            policy: Some(PolicyDefinition::default()),
            kind: Kind::Casbin(builder),
        }
    }
}

impl Builder {
    pub fn casbin(mut self, val: CasbinBuilder) -> Self {
        self.kind = Kind::Casbin(val);
        self
    }
}

impl CasbinBuilder {
    pub fn new() -> Self {
        Self {
            default_model: DEFAULT_MODEL.into(),
        }
    }

    pub fn default_model(mut self, val: &str) -> Self {
        self.default_model = val.into();
        self
    }

    pub async fn build(
        &self,
        policy: &PolicyDefinition,
    ) -> Result<CasbinEnforcer, casbin::Error> {
        CasbinEnforcer::new(&self.default_model, policy).await
    }
}

pub struct CasbinEnforcer {
    enforcer: casbin::Enforcer,
}

impl CasbinEnforcer {
    pub async fn new(
        model: &str,
        policy: &PolicyDefinition,
    ) -> Result<Self, casbin::Error> {
        let m = DefaultModel::from_str(model).await?;
        let a = MemoryAdapter::default();
        let mut enforcer = casbin::Enforcer::new(m, a).await?;
        let rules = policy.rules();
        let n = rules.len();
        if n > 0 {
            enforcer.add_named_policies("p", rules).await?;
        }
        for (role, parent) in policy.extensions().into_iter() {
            enforcer.add_named_grouping_policy("g", vec![
                role.into(),
                parent.into(),
            ]).await?;
        }
        log::debug!("new CasbinEnforcer set up with {n} policies");
        Ok(Self { enforcer })
    }

    fn casbin_enforce(
        &self,
        role: &str,
        resource: &str,
        action: &str,
    ) -> Result<bool, casbin::Error> {
        self.enforcer.enforce((role, resource, action))
    }
}

impl Enforcer for CasbinEnforcer {
    fn enforce(
        &self,
        role: Role,
        resource: Resource,
        action: Action,
    ) -> Result<bool, Error> {
        Ok(self.casbin_enforce(role.into(), resource.into(), action.into())?)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        policy::{
            Grant,
            RoleDefinition,
        },
    };
    use super::*;

    #[tokio::test]
    async fn empty() -> anyhow::Result<()> {
        let enforcer = CasbinBuilder::new()
            .build(&PolicyDefinition::new([]))
            .await?;
        assert!(!enforcer.enforce(Role::Admin, Resource::Site, Action::Read)?);
        Ok(())
    }

    #[tokio::test]
    async fn default_policy() -> anyhow::Result<()> {
        let policy = PolicyDefinition::default();
        let enforcer = CasbinBuilder::new().build(&policy).await?;
        for role in Role::ALL {
            for resource in Resource::ALL {
                for action in [
                    Action::List,
                    Action::Read,
                    Action::Create,
                    Action::Update,
                    Action::Delete,
                    Action::Assign,
                    Action::Unassign,
                    Action::ChangeAvailability,
                    Action::Reset,
                ] {
                    assert_eq!(
                        enforcer.enforce(role, resource, action)?,
                        policy.enforce(role, resource, action)?,
                        "{role} {resource} {action}",
                    );
                }
            }
        }
        Ok(())
    }

    #[tokio::test]
    async fn inherited() -> anyhow::Result<()> {
        let policy = PolicyDefinition::new([
            (Role::Basic, RoleDefinition::new(vec![
                Grant::new(Resource::Tag, [Action::Read]),
            ])),
            (Role::SiteOwner, RoleDefinition::new(vec![]).extends(Role::Basic)),
        ]);
        let engine = Builder::default()
            .policy(policy)
            .casbin(CasbinBuilder::new())
            .build()
            .await?;
        assert!(engine.resolve_static(Role::SiteOwner, Resource::Tag, Action::Read)?.is_some());
        assert!(engine.resolve_static(Role::SiteOwner, Resource::Tag, Action::Update)?.is_none());
        Ok(())
    }
}
