use evsdb_sqlite::SqliteBackend;
use evscore::platform::StoragePlatform;
use crate::fixture;

pub async fn create_sqlite_backend() -> anyhow::Result<SqliteBackend> {
    Ok(SqliteBackend::from_url("sqlite::memory:")
        .await?
        .run_migration()
        .await?)
}

/// A backend with the fixture loaded into the tenant `fixture::TENANT`.
pub async fn create_seeded_backend() -> anyhow::Result<SqliteBackend> {
    let backend = create_sqlite_backend().await?;
    fixture::seed(backend.tenant(fixture::TENANT).as_dyn()).await?;
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use evscore::{
        ac::{
            Resource,
            traits::AssignmentBackend,
        },
        filter::{
            Filter,
            Pagination,
            Projection,
        },
        platform::{
            EntityBackend,
            StoragePlatform,
        },
    };
    use super::*;

    #[async_std::test]
    async fn smoke_test_seeded() -> anyhow::Result<()> {
        let backend = create_seeded_backend().await?;
        let tenant = backend.tenant(fixture::TENANT);
        let sites = tenant.find_documents(
            Resource::Site,
            &Filter::new(),
            &Projection::all(),
            &Pagination::default(),
        ).await?;
        assert_eq!(sites.len(), 3);
        assert_eq!(tenant.get_site_ids_for_user("u4", None).await?, ["s1", "s3"]);
        Ok(())
    }
}
