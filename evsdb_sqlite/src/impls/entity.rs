use async_trait::async_trait;
use evscore::{
    ac::Resource,
    error::BackendError,
    filter::{
        Document,
        Filter,
        Op,
        Pagination,
        Projection,
    },
    platform::EntityBackend,
};
use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite};

use crate::SqliteTenant;

fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
    // json_each yields booleans as integers
    match value {
        Value::Bool(b) => qb.push_bind(*b as i64),
        Value::Number(n) => match n.as_i64() {
            Some(i) => qb.push_bind(i),
            None => qb.push_bind(n.as_f64()),
        },
        Value::String(s) => qb.push_bind(s.clone()),
        Value::Null => qb.push_bind(None::<String>),
        other => qb.push_bind(other.to_string()),
    };
}

fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &Filter) {
    for condition in filter.conditions() {
        qb.push(" AND ");
        let values = match &condition.op {
            Op::Eq(value) => std::slice::from_ref(value),
            Op::In(values) => values.as_slice(),
        };
        if values.is_empty() {
            qb.push("0");
            continue;
        }
        if condition.property == "id" {
            qb.push("entity.id IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                qb.push_bind(id_text(value));
            }
            qb.push(")");
        } else {
            qb.push("EXISTS (SELECT 1 FROM json_each(entity.doc, ");
            qb.push_bind(format!("$.{}", condition.property));
            qb.push(") WHERE json_each.value IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                push_value(qb, value);
            }
            qb.push("))");
        }
    }
}

fn select<'a>(
    tenant: &SqliteTenant,
    resource: Resource,
    filter: &Filter,
) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new(
        "SELECT entity.doc FROM entity WHERE entity.tenant_id = "
    );
    qb.push_bind(tenant.tenant_id.clone());
    qb.push(" AND entity.kind = ");
    qb.push_bind(resource.to_string());
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY entity.id");
    qb
}

fn decode(doc: String, projection: &Projection) -> Result<Document, BackendError> {
    Ok(projection.apply(serde_json::from_str(&doc)?))
}

async fn find_documents_sqlite(
    tenant: &SqliteTenant,
    resource: Resource,
    filter: &Filter,
    projection: &Projection,
    pagination: &Pagination,
) -> Result<Vec<Document>, BackendError> {
    let mut qb = select(tenant, resource, filter);
    qb.push(" LIMIT ");
    qb.push_bind(pagination.limit.map(|v| v as i64).unwrap_or(-1));
    qb.push(" OFFSET ");
    qb.push_bind(pagination.skip as i64);
    log::trace!("{}", qb.sql());
    let recs = qb.build_query_scalar::<String>()
        .fetch_all(&*tenant.pool)
        .await?;
    recs.into_iter()
        .map(|doc| decode(doc, projection))
        .collect()
}

async fn find_document_sqlite(
    tenant: &SqliteTenant,
    resource: Resource,
    filter: &Filter,
    projection: &Projection,
) -> Result<Option<Document>, BackendError> {
    let mut qb = select(tenant, resource, filter);
    qb.push(" LIMIT 1");
    log::trace!("{}", qb.sql());
    let rec = qb.build_query_scalar::<String>()
        .fetch_optional(&*tenant.pool)
        .await?;
    rec.map(|doc| decode(doc, projection))
        .transpose()
}

async fn insert_document_sqlite(
    tenant: &SqliteTenant,
    resource: Resource,
    id: &str,
    doc: &Document,
) -> Result<bool, BackendError> {
    let doc = serde_json::to_string(doc)?;
    let rows_affected = sqlx::query(
        r#"
INSERT INTO entity (
    tenant_id,
    kind,
    id,
    doc
)
VALUES ( ?1, ?2, ?3, ?4 )
ON CONFLICT (tenant_id, kind, id) DO NOTHING
        "#,
    )
    .bind(tenant.tenant_id.as_str())
    .bind(resource.to_string())
    .bind(id)
    .bind(doc)
    .execute(&*tenant.pool)
    .await?
    .rows_affected();
    Ok(rows_affected > 0)
}

async fn save_document_sqlite(
    tenant: &SqliteTenant,
    resource: Resource,
    id: &str,
    doc: &Document,
) -> Result<(), BackendError> {
    let doc = serde_json::to_string(doc)?;
    sqlx::query(
        r#"
INSERT INTO entity (
    tenant_id,
    kind,
    id,
    doc
)
VALUES ( ?1, ?2, ?3, ?4 )
ON CONFLICT (tenant_id, kind, id) DO UPDATE SET
    doc = excluded.doc
        "#,
    )
    .bind(tenant.tenant_id.as_str())
    .bind(resource.to_string())
    .bind(id)
    .bind(doc)
    .execute(&*tenant.pool)
    .await?;
    Ok(())
}

async fn delete_document_sqlite(
    tenant: &SqliteTenant,
    resource: Resource,
    id: &str,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(
        r#"
DELETE FROM
    entity
WHERE
    tenant_id = ?1
    AND kind = ?2
    AND id = ?3
        "#,
    )
    .bind(tenant.tenant_id.as_str())
    .bind(resource.to_string())
    .bind(id)
    .execute(&*tenant.pool)
    .await?
    .rows_affected();
    Ok(rows_affected > 0)
}

#[async_trait]
impl EntityBackend for SqliteTenant {
    async fn find_documents(
        &self,
        resource: Resource,
        filter: &Filter,
        projection: &Projection,
        pagination: &Pagination,
    ) -> Result<Vec<Document>, BackendError> {
        find_documents_sqlite(
            &self,
            resource,
            filter,
            projection,
            pagination,
        ).await
    }

    async fn find_document(
        &self,
        resource: Resource,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Option<Document>, BackendError> {
        find_document_sqlite(
            &self,
            resource,
            filter,
            projection,
        ).await
    }

    async fn insert_document(
        &self,
        resource: Resource,
        id: &str,
        doc: &Document,
    ) -> Result<bool, BackendError> {
        insert_document_sqlite(
            &self,
            resource,
            id,
            doc,
        ).await
    }

    async fn save_document(
        &self,
        resource: Resource,
        id: &str,
        doc: &Document,
    ) -> Result<(), BackendError> {
        save_document_sqlite(
            &self,
            resource,
            id,
            doc,
        ).await
    }

    async fn delete_document(
        &self,
        resource: Resource,
        id: &str,
    ) -> Result<bool, BackendError> {
        delete_document_sqlite(
            &self,
            resource,
            id,
        ).await
    }
}
