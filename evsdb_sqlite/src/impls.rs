use evscore::platform::{
    ConnectorOption,
    PlatformUrl,
    StoragePlatform,
    TenantPlatform,
};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

use crate::{
    SqliteBackend,
    SqliteTenant,
};

impl PlatformUrl for SqliteBackend {
    fn url(&self) -> &str {
        self.url.as_ref()
    }
}

impl SqliteBackend {
    pub async fn connect(opts: ConnectorOption) -> Result<SqliteBackend, sqlx::Error> {
        if opts.create_db && !Sqlite::database_exists(&opts.url).await.unwrap_or(false) {
            log::warn!("sqlite database {} does not exist; creating...", &opts.url);
            Sqlite::create_database(&opts.url).await?
        }

        let pool = SqlitePool::connect(&opts.url).await?;
        Ok(SqliteBackend {
            pool: Arc::new(pool),
            url: opts.url,
        })
    }

    pub async fn from_url(url: &str) -> Result<SqliteBackend, sqlx::Error> {
        Self::connect(url.into()).await
    }

    pub async fn run_migration(self) -> Result<Self, sqlx::Error> {
        sqlx::migrate!("./migrations").run(&*self.pool).await?;
        Ok(self)
    }

    pub fn tenant_backend(&self, tenant_id: impl Into<String>) -> SqliteTenant {
        SqliteTenant {
            pool: self.pool.clone(),
            tenant_id: tenant_id.into(),
        }
    }
}

impl SqliteTenant {
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }
}

impl StoragePlatform for SqliteBackend {
    fn tenant(&self, tenant_id: &str) -> Arc<dyn TenantPlatform> {
        Arc::new(self.tenant_backend(tenant_id))
    }
}

mod assignment;
mod entity;

mod default_impl {
    use evscore::platform::DefaultTenantPlatform;
    use crate::SqliteTenant;

    impl DefaultTenantPlatform for SqliteTenant {}
}
