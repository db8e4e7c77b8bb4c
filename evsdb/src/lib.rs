use evscore::platform::{ConnectorOption, StoragePlatform};
#[cfg(feature = "sqlite")]
use evsdb_sqlite::SqliteBackend;
use std::sync::Arc;

pub struct Backend;

#[derive(Clone, Debug, PartialEq)]
pub struct Error(String);

#[derive(Debug)]
enum BackendKind {
    Sqlite,
}

mod display {
    use super::{BackendKind, Error};
    use std::fmt::{Display, Formatter, Result};

    impl Display for BackendKind {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            match self {
                Self::Sqlite => "sqlite".fmt(f),
            }
        }
    }

    impl Display for Error {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            self.0.fmt(f)
        }
    }

    impl std::error::Error for Error {}
}

impl TryFrom<&str> for BackendKind {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.split(':').next() {
            Some("sqlite") => Ok(BackendKind::Sqlite),
            _ => Err(Error(format!("The connection string {s:?} is unsupported.")))
        }
    }
}

impl Backend {
    /// Connect to the storage identified by the url, with the schema
    /// brought up to date.
    pub async fn connect(
        opts: impl Into<ConnectorOption>,
    ) -> Result<Arc<dyn StoragePlatform>, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let opts = opts.into();
        match BackendKind::try_from(opts.url.as_str()) {
            #[cfg(feature = "sqlite")]
            Ok(BackendKind::Sqlite) => Ok(Arc::new(
                SqliteBackend::connect(opts)
                    .await?
                    .run_migration()
                    .await?
            )),
            #[cfg(not(feature = "sqlite"))]
            Ok(s) => Err(Box::new(Error(format!(
                "The feature {s:?} must be enabled for evsdb in order to connect to {:?}",
                opts.url,
            )))),
            Err(e) => Err(Box::new(e)),
        }
    }
}

#[cfg(test)]
mod testing {
    use crate::Backend;

    #[async_std::test]
    async fn smoke() {
        assert!(Backend::connect("unsupported").await.is_err());
    }

    #[cfg(feature = "sqlite")]
    #[async_std::test]
    async fn smoke_sqlite() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        use evscore::{
            ac::traits::{AssignmentBackend, SiteUserRole},
            platform::PlatformUrl,
        };
        let platform = Backend::connect("sqlite::memory:").await?;
        assert_eq!(platform.url(), "sqlite::memory:");
        let tenant = platform.tenant("t1");
        assert!(tenant.assign_site_user("s1", "u1", SiteUserRole::default()).await?);
        assert_eq!(tenant.get_site_ids_for_user("u1", None).await?, ["s1"]);
        Ok(())
    }
}
