use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteBackend {
    pub(crate) pool: Arc<SqlitePool>,
    pub(crate) url: String,
}

/// A handle on the `SqliteBackend` bound to a single tenant; every query
/// issued through it is restricted to the rows of that tenant.
#[derive(Clone)]
pub struct SqliteTenant {
    pub(crate) pool: Arc<SqlitePool>,
    pub(crate) tenant_id: String,
}

mod impls;
