//! Postgres-backed bill store.
//!
//! Each bill is kept as a JSONB document next to the columns it is looked up
//! by. The document is the bill's own serde form, so reading it back yields
//! exactly the figures that were written.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | Any other | `Database` |
//! | PoolClosed | N/A | `Unavailable` |
//! | Other | N/A | `Database` |

use std::sync::Arc;

use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use tracing::instrument;

use retail_billing::Bill;
use retail_core::BillId;

use super::r#trait::{BillStore, StoreError, newest_first, stamp};

/// Postgres-backed bill store.
#[derive(Debug, Clone)]
pub struct PostgresBillStore {
    pool: Arc<PgPool>,
}

impl PostgresBillStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `bills` table and its customer index if they are missing.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bills (
                id UUID PRIMARY KEY,
                customer_identity TEXT NOT NULL,
                bill_date TIMESTAMPTZ NOT NULL,
                document JSONB NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS bills_customer_identity_idx ON bills (customer_identity, bill_date DESC)",
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl BillStore for PostgresBillStore {
    #[instrument(skip(self, bill), fields(customer = %bill.customer().identity), err)]
    async fn insert(&self, bill: Bill) -> Result<Bill, StoreError> {
        let id = BillId::new();
        let stored = stamp(bill, id)?;

        let document = serde_json::to_value(&stored)
            .map_err(|e| StoreError::Serialization(format!("failed to encode bill: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO bills (id, customer_identity, bill_date, document)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id.as_uuid())
        .bind(&stored.customer().identity)
        .bind(stored.bill_date())
        .bind(&document)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        Ok(stored)
    }

    #[instrument(skip(self), fields(bill_id = %id), err)]
    async fn find_one(&self, id: BillId) -> Result<Option<Bill>, StoreError> {
        let row = sqlx::query("SELECT document FROM bills WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_one", e))?;

        row.map(|r| decode_row(&r)).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_customer(&self, identity: &str) -> Result<Vec<Bill>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT document
            FROM bills
            WHERE customer_identity = $1
            ORDER BY bill_date DESC, id DESC
            "#,
        )
        .bind(identity)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_customer", e))?;

        let mut bills = rows.iter().map(decode_row).collect::<Result<Vec<_>, _>>()?;
        // The column keeps microseconds; the document keeps full precision.
        newest_first(&mut bills);
        Ok(bills)
    }
}

fn decode_row(row: &sqlx::postgres::PgRow) -> Result<Bill, StoreError> {
    let document: JsonValue = row
        .try_get("document")
        .map_err(|e| StoreError::Serialization(format!("failed to read bill row: {e}")))?;
    serde_json::from_value(document)
        .map_err(|e| StoreError::Serialization(format!("failed to decode bill: {e}")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {operation}"))
        }
        _ => StoreError::Database(format!("sqlx error in {operation}: {err}")),
    }
}
