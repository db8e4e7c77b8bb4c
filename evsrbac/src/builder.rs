use crate::{
    Enforcer,
    engine::AuthorizationEngine,
    error::Error,
    policy::PolicyDefinition,
};
#[cfg(feature = "casbin")]
use crate::casbin::CasbinBuilder;

#[derive(Clone, Debug, Default)]
pub(crate) enum Kind {
    #[default]
    Policy,
    #[cfg(feature = "casbin")]
    Casbin(CasbinBuilder),
}

/// Builds the authorization engine.
///
/// Methods can be chained in order to set the configuration values.
/// The `AuthorizationEngine` is constructed by calling [`build`].
///
/// New instances of the builder can be obtained via `Builder::default`
/// or `Builder::new`.  The former provides nothing while the latter
/// provides the default policy.
///
/// [`build`]: Builder::build
#[derive(Clone, Debug, Default)]
pub struct Builder {
    pub(crate) policy: Option<PolicyDefinition>,
    pub(crate) kind: Kind,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            policy: Some(PolicyDefinition::default()),
            .. Default::default()
        }
    }

    pub fn policy(mut self, val: PolicyDefinition) -> Self {
        self.policy = Some(val);
        self
    }

    pub fn policy_json(self, val: &str) -> Result<Self, Error> {
        Ok(self.policy(PolicyDefinition::from_json(val)?))
    }

    pub async fn build(&self) -> Result<AuthorizationEngine, Error> {
        log::trace!("building an AuthorizationEngine with a {}Enforcer", self.kind);
        let policy = self.policy
            .clone()
            .ok_or(Error::PolicyRequired)?;
        let enforcer: Option<Box<dyn Enforcer>> = match &self.kind {
            Kind::Policy => None,
            #[cfg(feature = "casbin")]
            Kind::Casbin(builder) => Some(Box::new(builder.build(&policy).await?)),
        };
        Ok(AuthorizationEngine::new(policy, enforcer))
    }
}

mod display {
    use std::fmt::{Display, Formatter, Result};
    use super::Kind;

    impl Display for Kind {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            match self {
                Kind::Policy => f.write_str("Policy"),
                #[cfg(feature = "casbin")]
                Kind::Casbin(..) => f.write_str("Casbin"),
            }
        }
    }
}
