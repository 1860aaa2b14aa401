//! Postgres-backed order repository.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError | Scenario |
//! |------------|----------------------|-----------------|----------|
//! | Database (unique violation) | `23505` | `DuplicateControlNumber` | Control number already stored, or repeated in the batch |
//! | Database (other) | Any other | `Backend` | Check constraint, syntax, ... |
//! | PoolClosed | N/A | `Backend` | Connection pool was closed |
//! | Other | N/A | `Backend` | Network errors, connection failures, etc. |
//!
//! ## Atomicity
//!
//! `save_all` inserts the batch inside one transaction. Any failure drops the
//! transaction before commit, which rolls the whole batch back.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use pedidos_core::OrderId;
use pedidos_orders::{NewOrder, Order, OrderRecord};

use super::{OrderRepository, RepositoryError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS pedidos (
    id BIGSERIAL PRIMARY KEY,
    numero_controle TEXT NOT NULL UNIQUE,
    data_cadastro TIMESTAMP NOT NULL,
    nome TEXT NOT NULL,
    valor_unitario NUMERIC NOT NULL CHECK (valor_unitario >= 0),
    quantidade INTEGER NOT NULL CHECK (quantidade >= 1),
    codigo_cliente BIGINT NOT NULL CHECK (codigo_cliente BETWEEN 1 AND 10),
    valor_total NUMERIC NOT NULL
)
"#;

const CREATE_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS pedidos_data_cadastro_idx ON pedidos (data_cadastro)";

const SELECT_COLUMNS: &str = "SELECT id, numero_controle, data_cadastro, nome, valor_unitario, \
     quantidade, codigo_cliente, valor_total FROM pedidos";

/// Postgres-backed order repository.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; clone-free sharing goes
/// through `Arc<PostgresOrderRepository>`.
#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `pedidos` table and its indexes if they are missing.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_table", e))?;
        sqlx::query(CREATE_DATE_INDEX)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_index", e))?;
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[instrument(skip(self), err)]
    async fn find_by_control_number(
        &self,
        control_number: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE numero_controle = $1"))
            .bind(control_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_control_number", e))?;

        row.as_ref().map(order_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_registered_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE data_cadastro BETWEEN $1 AND $2 ORDER BY id ASC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_registered_between", e))?;

        rows.iter().map(order_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(order_from_row).collect()
    }

    #[instrument(skip(self, orders), fields(order_count = orders.len()), err)]
    async fn save_all(&self, orders: Vec<NewOrder>) -> Result<Vec<Order>, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let mut saved = Vec::with_capacity(orders.len());
        for order in orders {
            let row = sqlx::query(
                r#"
                INSERT INTO pedidos (
                    numero_controle,
                    data_cadastro,
                    nome,
                    valor_unitario,
                    quantidade,
                    codigo_cliente,
                    valor_total
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
                "#,
            )
            .bind(order.control_number.as_str())
            .bind(order.registered_at)
            .bind(order.customer_name.as_str())
            .bind(order.unit_price)
            .bind(order.quantity)
            .bind(order.customer_code.value())
            .bind(order.total_price)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_insert_error(order.control_number.as_str(), e))?;

            let id: i64 = row
                .try_get("id")
                .map_err(|e| map_sqlx_error("save_all", e))?;
            saved.push(order.into_order(OrderId::from_i64(id)));
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit", e))?;

        Ok(saved)
    }
}

fn order_from_row(row: &PgRow) -> Result<Order, RepositoryError> {
    let record = OrderRecord {
        id: get(row, "id")?,
        control_number: get(row, "numero_controle")?,
        registered_at: get::<NaiveDateTime>(row, "data_cadastro")?,
        customer_name: get(row, "nome")?,
        unit_price: get::<Decimal>(row, "valor_unitario")?,
        quantity: get(row, "quantidade")?,
        customer_code: get(row, "codigo_cliente")?,
        total_price: get::<Decimal>(row, "valor_total")?,
    };
    Ok(Order::try_from(record)?)
}

fn get<T>(row: &PgRow, column: &str) -> Result<T, RepositoryError>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| RepositoryError::Backend(format!("failed to read column {column}: {e}")))
}

fn map_insert_error(control_number: &str, err: sqlx::Error) -> RepositoryError {
    if is_unique_violation(&err) {
        return RepositoryError::DuplicateControlNumber(control_number.to_string());
    }
    map_sqlx_error("save_all", err)
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => RepositoryError::Backend(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            RepositoryError::Backend(format!("connection pool closed in {operation}"))
        }
        _ => RepositoryError::Backend(format!("sqlx error in {operation}: {err}")),
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}
