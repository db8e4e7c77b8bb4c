use async_trait::async_trait;
use evscore::{
    ac::traits::{
        AssignmentBackend,
        SiteRelation,
        SiteUserRole,
    },
    error::BackendError,
};
use sqlx::{QueryBuilder, Sqlite};

use crate::SqliteTenant;

async fn assign_site_user_sqlite(
    tenant: &SqliteTenant,
    site_id: &str,
    user_id: &str,
    role: SiteUserRole,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(
        r#"
INSERT INTO site_user (
    tenant_id,
    site_id,
    user_id,
    site_admin,
    site_owner
)
VALUES ( ?1, ?2, ?3, ?4, ?5 )
ON CONFLICT (tenant_id, site_id, user_id) DO UPDATE SET
    site_admin = excluded.site_admin,
    site_owner = excluded.site_owner
        "#,
    )
    .bind(tenant.tenant_id.as_str())
    .bind(site_id)
    .bind(user_id)
    .bind(role.site_admin)
    .bind(role.site_owner)
    .execute(&*tenant.pool)
    .await?
    .rows_affected();
    Ok(rows_affected > 0)
}

async fn unassign_site_user_sqlite(
    tenant: &SqliteTenant,
    site_id: &str,
    user_id: &str,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(
        r#"
DELETE FROM
    site_user
WHERE
    tenant_id = ?1
    AND site_id = ?2
    AND user_id = ?3
        "#,
    )
    .bind(tenant.tenant_id.as_str())
    .bind(site_id)
    .bind(user_id)
    .execute(&*tenant.pool)
    .await?
    .rows_affected();
    Ok(rows_affected > 0)
}

async fn get_site_ids_for_user_sqlite(
    tenant: &SqliteTenant,
    user_id: &str,
    relation: Option<SiteRelation>,
) -> Result<Vec<String>, BackendError> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT site_id FROM site_user WHERE tenant_id = "
    );
    qb.push_bind(tenant.tenant_id.clone());
    qb.push(" AND user_id = ");
    qb.push_bind(user_id.to_string());
    match relation {
        Some(SiteRelation::Admin) => { qb.push(" AND site_admin = 1"); }
        Some(SiteRelation::Owner) => { qb.push(" AND site_owner = 1"); }
        None => (),
    }
    qb.push(" ORDER BY site_id");
    let recs = qb.build_query_scalar::<String>()
        .fetch_all(&*tenant.pool)
        .await?;
    Ok(recs)
}

async fn get_company_ids_for_sites_sqlite(
    tenant: &SqliteTenant,
    site_ids: &[String],
) -> Result<Vec<String>, BackendError> {
    if site_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT DISTINCT json_extract(doc, '$.companyID') FROM entity WHERE tenant_id = "
    );
    qb.push_bind(tenant.tenant_id.clone());
    qb.push(" AND kind = 'Site' AND json_extract(doc, '$.companyID') IS NOT NULL AND id IN (");
    let mut separated = qb.separated(", ");
    for site_id in site_ids {
        separated.push_bind(site_id.clone());
    }
    separated.push_unseparated(") ORDER BY 1");
    let recs = qb.build_query_scalar::<String>()
        .fetch_all(&*tenant.pool)
        .await?;
    Ok(recs)
}

async fn get_user_ids_for_sites_sqlite(
    tenant: &SqliteTenant,
    site_ids: &[String],
) -> Result<Vec<String>, BackendError> {
    if site_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT DISTINCT user_id FROM site_user WHERE tenant_id = "
    );
    qb.push_bind(tenant.tenant_id.clone());
    qb.push(" AND site_id IN (");
    let mut separated = qb.separated(", ");
    for site_id in site_ids {
        separated.push_bind(site_id.clone());
    }
    separated.push_unseparated(") ORDER BY user_id");
    let recs = qb.build_query_scalar::<String>()
        .fetch_all(&*tenant.pool)
        .await?;
    Ok(recs)
}

#[async_trait]
impl AssignmentBackend for SqliteTenant {
    async fn assign_site_user(
        &self,
        site_id: &str,
        user_id: &str,
        role: SiteUserRole,
    ) -> Result<bool, BackendError> {
        assign_site_user_sqlite(
            &self,
            site_id,
            user_id,
            role,
        ).await
    }

    async fn unassign_site_user(
        &self,
        site_id: &str,
        user_id: &str,
    ) -> Result<bool, BackendError> {
        unassign_site_user_sqlite(
            &self,
            site_id,
            user_id,
        ).await
    }

    async fn get_site_ids_for_user(
        &self,
        user_id: &str,
        relation: Option<SiteRelation>,
    ) -> Result<Vec<String>, BackendError> {
        get_site_ids_for_user_sqlite(
            &self,
            user_id,
            relation,
        ).await
    }

    async fn get_company_ids_for_sites(
        &self,
        site_ids: &[String],
    ) -> Result<Vec<String>, BackendError> {
        get_company_ids_for_sites_sqlite(
            &self,
            site_ids,
        ).await
    }

    async fn get_user_ids_for_sites(
        &self,
        site_ids: &[String],
    ) -> Result<Vec<String>, BackendError> {
        get_user_ids_for_sites_sqlite(
            &self,
            site_ids,
        ).await
    }
}
